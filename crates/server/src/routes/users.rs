//! User route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use swarmcart_core::UserId;

use crate::directory::User;
use crate::error::Result;
use crate::models::view::CartView;
use crate::state::AppState;

/// GET /api/users
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.directory().all().to_vec())
}

/// GET /api/users/{id}/carts
#[instrument(skip(state))]
pub async fn carts(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<CartView>>> {
    let carts = state.service().user_carts(&id).await?;
    Ok(Json(carts))
}
