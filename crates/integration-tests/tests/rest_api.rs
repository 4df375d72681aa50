//! HTTP surface tests.
//!
//! The full router is exercised in-process through `tower::ServiceExt::oneshot`
//! so status codes and wire shapes are verified exactly as a client sees them.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use swarmcart_server::config::ServerConfig;
use swarmcart_server::routes;
use swarmcart_server::state::AppState;
use swarmcart_server::store::MemoryStore;

fn app() -> Router {
    let state = AppState::new(ServerConfig::default(), Arc::new(MemoryStore::new()));
    routes::router().with_state(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();
    let response = app.clone().oneshot(get("/health")).await.expect("send");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/health/ready")).await.expect("send");
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Users and Products
// =============================================================================

#[tokio::test]
async fn test_user_directory_lists_fixed_users() {
    let response = app().oneshot(get("/api/users")).await.expect("send");
    assert_eq!(response.status(), StatusCode::OK);

    let users = body_json(response).await;
    let users = users.as_array().expect("array");
    assert_eq!(users.len(), 4);
    assert_eq!(users[0]["id"], "user1");
    assert_eq!(users[0]["name"], "Sanjay");
    assert!(users[0]["color"].as_str().expect("color").starts_with('#'));
}

#[tokio::test]
async fn test_products_carry_composite_scores() {
    let response = app().oneshot(get("/api/products")).await.expect("send");
    assert_eq!(response.status(), StatusCode::OK);

    let products = body_json(response).await;
    let products = products.as_array().expect("array");
    assert!(!products.is_empty());
    for product in products {
        assert!(product["compositeScore"].is_number(), "flattened score");
        assert!(product["vestoScore"].is_number(), "health under its wire name");
        assert!(product["priceHistory"].is_array());
    }
}

#[tokio::test]
async fn test_product_search() {
    let response = app()
        .oneshot(get("/api/products/search?q=YOGURT"))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);

    let hits = body_json(response).await;
    assert_eq!(hits.as_array().expect("array").len(), 1);
    assert_eq!(hits[0]["id"], "d1");
}

// =============================================================================
// Cart Lifecycle over HTTP
// =============================================================================

#[tokio::test]
async fn test_create_join_add_over_http() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post(
            "/api/carts",
            &json!({"ownerId": "user1", "cartName": "Groceries"}),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);
    let cart = body_json(response).await;
    let cart_id = cart["id"].as_str().expect("id").to_owned();
    let invite = cart["inviteCode"].as_str().expect("invite").to_owned();
    assert_eq!(cart["optimizationScore"], 100);
    assert_eq!(cart["members"][0]["id"], "user1");

    let response = app
        .clone()
        .oneshot(post(
            "/api/carts/join",
            &json!({"inviteCode": invite, "userId": "user2"}),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);
    let joined = body_json(response).await;
    assert_eq!(joined["members"].as_array().expect("members").len(), 2);

    let response = app
        .clone()
        .oneshot(post(
            &format!("/api/carts/{cart_id}/items"),
            &json!({"productId": "d1", "quantity": 2, "userId": "user2"}),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await;
    assert_eq!(view["items"][0]["quantity"], 2);
    assert_eq!(view["items"][0]["product"]["name"], "Greek Yogurt Plain");
    assert_eq!(view["items"][0]["addedBy"], "user2");
    assert_eq!(view["activity"][0]["type"], "item_added");
}

#[tokio::test]
async fn test_add_item_defaults_quantity_to_one() {
    let app = app();
    let cart = body_json(
        app.clone()
            .oneshot(post(
                "/api/carts",
                &json!({"ownerId": "user1", "cartName": "Groceries"}),
            ))
            .await
            .expect("send"),
    )
    .await;
    let cart_id = cart["id"].as_str().expect("id");

    let response = app
        .oneshot(post(
            &format!("/api/carts/{cart_id}/items"),
            &json!({"productId": "b3", "userId": "user1"}),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await;
    assert_eq!(view["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_remove_item_over_http() {
    let app = app();
    let cart = body_json(
        app.clone()
            .oneshot(post(
                "/api/carts",
                &json!({"ownerId": "user1", "cartName": "Groceries"}),
            ))
            .await
            .expect("send"),
    )
    .await;
    let cart_id = cart["id"].as_str().expect("id").to_owned();

    let view = body_json(
        app.clone()
            .oneshot(post(
                &format!("/api/carts/{cart_id}/items"),
                &json!({"productId": "s1", "userId": "user1"}),
            ))
            .await
            .expect("send"),
    )
    .await;
    let item_id = view["items"][0]["id"].as_str().expect("item id");

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/carts/{cart_id}/items/{item_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await;
    assert!(view["items"].as_array().expect("items").is_empty());
    assert_eq!(view["activity"][0]["type"], "item_removed");
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn test_missing_cart_is_404() {
    let response = app()
        .oneshot(get("/api/carts/no-such-cart"))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().expect("error").contains("no-such-cart"));
}

#[tokio::test]
async fn test_unknown_owner_is_404() {
    let response = app()
        .oneshot(post(
            "/api/carts",
            &json!({"ownerId": "user99", "cartName": "Groceries"}),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zero_quantity_is_400() {
    let app = app();
    let cart = body_json(
        app.clone()
            .oneshot(post(
                "/api/carts",
                &json!({"ownerId": "user1", "cartName": "Groceries"}),
            ))
            .await
            .expect("send"),
    )
    .await;
    let cart_id = cart["id"].as_str().expect("id");

    let response = app
        .oneshot(post(
            &format!("/api/carts/{cart_id}/items"),
            &json!({"productId": "d1", "quantity": 0, "userId": "user1"}),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_invite_code_is_404() {
    let response = app()
        .oneshot(post(
            "/api/carts/join",
            &json!({"inviteCode": "ZZZZZZ", "userId": "user1"}),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
