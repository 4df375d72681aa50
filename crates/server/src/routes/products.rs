//! Product route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use swarmcart_core::Product;

use crate::catalog::ScoredProduct;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /api/products
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<ScoredProduct>> {
    Json(state.catalog().scored())
}

/// GET /api/products/search?q=
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Product>> {
    Json(state.catalog().search(&params.q).into_iter().cloned().collect())
}
