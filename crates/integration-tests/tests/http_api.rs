//! Integration tests for the HTTP API.
//!
//! Requests go through the full router (tracing, request IDs, handlers) with
//! `tower::ServiceExt::oneshot`; no socket is opened.

#![allow(clippy::unwrap_used)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use order_desk_integration_tests::{add_customer, add_item, rows, send, test_app};
use order_desk_server::db::Table;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let (app, _pool) = test_app().await;

    for uri in ["/health", "/health/ready"] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}

// ============================================================================
// Customers
// ============================================================================

#[tokio::test]
async fn test_customer_lifecycle() {
    let (app, _pool) = test_app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/customers/",
        Some(json!({"name": "Ada", "phone": "5550000001"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["customer_id"].as_i64().unwrap();

    let (status, fetched) = send(&app, Method::GET, &format!("/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/customers/{id}"),
        Some(json!({"customer_id": id, "name": "Ada L.", "phone": "5550000001"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ada L.");

    let (status, body) = send(&app, Method::DELETE, &format!("/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"detail": "1 row(s) affected"}));

    let (status, body) = send(&app, Method::GET, &format!("/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], format!("Customer ID {id} not found"));
}

#[tokio::test]
async fn test_customer_id_rules() {
    let (app, pool) = test_app().await;
    let id = add_customer(&pool, "Ada", "111").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/customers",
        Some(json!({"customer_id": 7, "name": "Bob", "phone": "222"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Customer ID should not be passed!");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/customers/{id}"),
        Some(json!({"customer_id": 42, "name": "Ada", "phone": "111"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/customers/404",
        Some(json!({"customer_id": 404, "name": "Nobody", "phone": "0"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_phone_is_conflict() {
    let (app, pool) = test_app().await;
    add_customer(&pool, "Ada", "111").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/customers/",
        Some(json!({"name": "Bob", "phone": "111"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Mobile Number already exists");
    assert_eq!(rows(&pool, Table::Customers).await, 1);
}

// ============================================================================
// Items
// ============================================================================

#[tokio::test]
async fn test_item_create_and_validation() {
    let (app, _pool) = test_app().await;

    let (status, item) = send(
        &app,
        Method::POST,
        "/items/",
        Some(json!({"name": "Tea", "price": 2.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["price"], json!(2.5));

    let (status, body) = send(
        &app,
        Method::POST,
        "/items/",
        Some(json!({"name": "Tea", "price": 3.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Item already exists");

    let (status, _) = send(
        &app,
        Method::POST,
        "/items/",
        Some(json!({"name": "Refund", "price": -1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/items/1",
        Some(json!({"name": "Tea", "price": 2.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_order_lifecycle() {
    let (app, pool) = test_app().await;
    let customer = add_customer(&pool, "Ada", "111").await;
    let tea = add_item(&pool, "Tea", 250).await;
    let scone = add_item(&pool, "Scone", 350).await;

    let (status, placed) = send(
        &app,
        Method::POST,
        "/orders/",
        Some(json!({
            "notes": "table 4",
            "customer_id": customer.as_i64(),
            "items": [tea.as_i64(), scone.as_i64()]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(placed["detail"], "Order placed");
    let order_id = placed["order_id"].as_i64().unwrap();

    let (status, order) = send(&app, Method::GET, &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["notes"], "table 4");
    assert_eq!(order["customer_id"], customer.as_i64());
    assert!(order["timestamp"].as_i64().unwrap() > 0);
    assert_eq!(
        order["items"],
        json!([
            {"item_id": tea.as_i64(), "name": "Tea", "price": 2.5},
            {"item_id": scone.as_i64(), "name": "Scone", "price": 3.5}
        ])
    );

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/orders/{order_id}"),
        Some(json!({
            "order_id": order_id,
            "notes": "table 5",
            "customer_id": customer.as_i64(),
            "items": [scone.as_i64()]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({"detail": "Order updated", "order_id": order_id}));
    assert_eq!(rows(&pool, Table::OrderList).await, 1);

    let (status, body) = send(&app, Method::DELETE, &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "1 row(s) affected");
    assert_eq!(rows(&pool, Table::OrderList).await, 0);
}

#[tokio::test]
async fn test_order_with_unknown_item_is_not_found_and_rolled_back() {
    let (app, pool) = test_app().await;
    let customer = add_customer(&pool, "Ada", "111").await;
    let tea = add_item(&pool, "Tea", 250).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/orders/",
        Some(json!({
            "notes": "",
            "customer_id": customer.as_i64(),
            "items": [tea.as_i64(), 999]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Item ID 999 not found");
    assert_eq!(rows(&pool, Table::Orders).await, 0);
    assert_eq!(rows(&pool, Table::OrderList).await, 0);
}

#[tokio::test]
async fn test_order_id_rules() {
    let (app, pool) = test_app().await;
    let customer = add_customer(&pool, "Ada", "111").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"order_id": 1, "notes": "", "customer_id": customer.as_i64(), "items": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/orders/1",
        Some(json!({"order_id": 2, "notes": "", "customer_id": customer.as_i64(), "items": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/orders/3",
        Some(json!({"order_id": 3, "notes": "", "customer_id": customer.as_i64(), "items": []})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Order ID 3 not found");

    let (status, _) = send(&app, Method::DELETE, "/orders/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
