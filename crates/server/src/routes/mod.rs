//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check
//!
//! # Users
//! GET  /api/users                     - User directory
//! GET  /api/users/{id}/carts          - Carts the user belongs to
//!
//! # Products
//! GET  /api/products                  - Scored catalog
//! GET  /api/products/search?q=        - Case-insensitive search
//!
//! # Carts
//! POST   /api/carts                   - Create a cart
//! GET    /api/carts/{id}              - Fetch one cart
//! POST   /api/carts/join              - Join via invite code
//! POST   /api/carts/{id}/items        - Add an item
//! DELETE /api/carts/{id}/items/{itemId} - Remove an item
//! POST   /api/carts/{id}/merge        - Accept a merge suggestion
//! GET    /api/carts/{id}/optimize     - Recompute suggestions (read-only)
//!
//! # Realtime
//! GET  /ws                            - WebSocket channel
//! ```

pub mod carts;
pub mod products;
pub mod users;
pub mod ws;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde_json::json;

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(carts::create))
        .route("/join", post(carts::join))
        .route("/{id}", get(carts::show))
        .route("/{id}/items", post(carts::add_item))
        .route("/{id}/items/{item_id}", delete(carts::remove_item))
        .route("/{id}/merge", post(carts::apply_merge))
        .route("/{id}/optimize", get(carts::optimize))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/search", get(products::search))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/{id}/carts", get(users::carts))
}

/// Create the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/carts", cart_routes())
        .nest("/api/products", product_routes())
        .nest("/api/users", user_routes())
        .route("/ws", get(ws::upgrade))
}

/// Liveness check.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness check. The catalog and directory are seeded in-process, so
/// a live server is always ready to serve.
async fn readiness() -> Json<serde_json::Value> {
    Json(json!({ "status": "ready" }))
}
