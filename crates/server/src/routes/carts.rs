//! Cart route handlers.
//!
//! All bodies are camelCase JSON. Handlers delegate to the cart service
//! and translate nothing themselves; error mapping lives on `AppError`.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use swarmcart_core::{CartId, ItemId, ProductId, SuggestionId, UserId};

use crate::error::Result;
use crate::models::suggestion::Suggestion;
use crate::models::view::CartView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartRequest {
    pub owner_id: UserId,
    pub cart_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinCartRequest {
    pub invite_code: String,
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub user_id: UserId,
}

const fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub user_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyMergeRequest {
    pub suggestion_id: SuggestionId,
    pub accepted_product_id: ProductId,
    pub user_id: UserId,
}

/// POST /api/carts
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateCartRequest>,
) -> Result<Json<CartView>> {
    let cart = state
        .service()
        .create_cart(body.owner_id, &body.cart_name)
        .await?;
    Ok(Json(cart))
}

/// GET /api/carts/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CartId>,
) -> Result<Json<CartView>> {
    let cart = state.service().get_cart(&id).await?;
    Ok(Json(cart))
}

/// POST /api/carts/join
#[instrument(skip(state))]
pub async fn join(
    State(state): State<AppState>,
    Json(body): Json<JoinCartRequest>,
) -> Result<Json<CartView>> {
    let cart = state
        .service()
        .join_cart(&body.invite_code, body.user_id)
        .await?;
    Ok(Json(cart))
}

/// POST /api/carts/{id}/items
#[instrument(skip(state))]
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<CartId>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let cart = state
        .service()
        .add_item(&id, &body.product_id, body.quantity, body.user_id)
        .await?;
    Ok(Json(cart))
}

/// DELETE /api/carts/{id}/items/{item_id}
#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(CartId, ItemId)>,
    body: Option<Json<RemoveItemRequest>>,
) -> Result<Json<CartView>> {
    let user_id = body.and_then(|Json(body)| body.user_id);
    let cart = state.service().remove_item(&id, &item_id, user_id).await?;
    Ok(Json(cart))
}

/// POST /api/carts/{id}/merge
#[instrument(skip(state))]
pub async fn apply_merge(
    State(state): State<AppState>,
    Path(id): Path<CartId>,
    Json(body): Json<ApplyMergeRequest>,
) -> Result<Json<CartView>> {
    let cart = state
        .service()
        .apply_merge(
            &id,
            &body.suggestion_id,
            &body.accepted_product_id,
            body.user_id,
        )
        .await?;
    Ok(Json(cart))
}

/// GET /api/carts/{id}/optimize
#[instrument(skip(state))]
pub async fn optimize(
    State(state): State<AppState>,
    Path(id): Path<CartId>,
) -> Result<Json<Vec<Suggestion>>> {
    let suggestions = state.service().optimize(&id).await?;
    Ok(Json(suggestions))
}
