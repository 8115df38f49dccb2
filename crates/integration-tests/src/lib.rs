//! Integration tests for the order desk.
//!
//! Tests run against a private in-memory `SQLite` database with the real
//! schema, or a database file in a temporary directory when several
//! connections are needed. No external services are required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p order-desk-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_transactions` - Atomicity and line replacement of the order service
//! - `repositories` - Constraint mapping of the customer and item repositories
//! - `http_api` - Status codes and bodies through the full router

use std::path::Path;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use order_desk_core::{CustomerId, ItemId, Price};
use order_desk_server::db::{self, CustomerRepository, ItemRepository, Table};
use order_desk_server::models::{CustomerInput, ItemInput};
use order_desk_server::routes;
use order_desk_server::state::AppState;

/// Create an in-memory database with all tables.
///
/// # Panics
///
/// Panics if the database cannot be created.
pub async fn test_pool() -> SqlitePool {
    let pool = db::create_memory_pool()
        .await
        .expect("Failed to create in-memory pool");
    db::init_schema(&pool)
        .await
        .expect("Failed to create schema");
    pool
}

/// Create a database file inside `dir` with all tables.
///
/// Unlike [`test_pool`], the pool holds several connections, so transactions
/// on different connections contend for the file lock as they do in production.
///
/// # Panics
///
/// Panics if the database cannot be created.
pub async fn file_pool(dir: &Path, max_connections: u32) -> SqlitePool {
    let url = format!("sqlite://{}", dir.join("orders.sqlite").display());
    let pool = db::create_pool(&url, max_connections)
        .await
        .expect("Failed to create database file");
    db::init_schema(&pool)
        .await
        .expect("Failed to create schema");
    pool
}

/// Build the full application router over a fresh database.
///
/// The returned pool shares the router's database.
///
/// # Panics
///
/// Panics if the database cannot be created.
pub async fn test_app() -> (Router, SqlitePool) {
    let pool = test_pool().await;
    let app = routes::app(AppState::new(pool.clone()));
    (app, pool)
}

/// Insert a customer and return its ID.
///
/// # Panics
///
/// Panics if the insert fails.
pub async fn add_customer(pool: &SqlitePool, name: &str, phone: &str) -> CustomerId {
    CustomerRepository::new(pool)
        .create(CustomerInput {
            name: name.to_string(),
            phone: phone.to_string(),
        })
        .await
        .expect("Failed to create customer")
        .customer_id
}

/// Insert an item priced in cents and return its ID.
///
/// # Panics
///
/// Panics if the insert fails.
pub async fn add_item(pool: &SqlitePool, name: &str, cents: i64) -> ItemId {
    ItemRepository::new(pool)
        .create(ItemInput {
            name: name.to_string(),
            price: Price::new(Decimal::new(cents, 2)).expect("Price is non-negative"),
        })
        .await
        .expect("Failed to create item")
        .item_id
}

/// Count the rows of a table.
///
/// # Panics
///
/// Panics if the query fails.
pub async fn rows(pool: &SqlitePool, table: Table) -> i64 {
    db::count_rows(pool, table)
        .await
        .expect("Failed to count rows")
}

/// Send one request through the router and decode the JSON response body.
///
/// # Panics
///
/// Panics if the request cannot be built or the body is not JSON.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&bytes).expect("Response body is not JSON");
    (status, json)
}
