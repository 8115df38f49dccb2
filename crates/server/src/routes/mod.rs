//! HTTP route handlers for the order desk API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (database reachable)
//!
//! # Customers
//! POST   /customers/           - Create customer
//! GET    /customers/{id}       - Customer detail
//! PUT    /customers/{id}       - Replace customer
//! DELETE /customers/{id}       - Delete customer
//!
//! # Items
//! POST   /items/               - Create item
//! GET    /items/{id}           - Item detail
//! PUT    /items/{id}           - Replace item
//! DELETE /items/{id}           - Delete item
//!
//! # Orders
//! POST   /orders/              - Place order
//! GET    /orders/{id}          - Order with resolved items
//! PUT    /orders/{id}          - Replace notes and lines
//! DELETE /orders/{id}          - Delete order and its lines
//! ```
//!
//! Collection routes are served with and without the trailing slash.
//! Every error response has the shape `{"detail": "<message>"}`.

pub mod customers;
pub mod health;
pub mod items;
pub mod orders;

use std::time::Duration;

use axum::{Router, routing::get};
use serde::Serialize;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Body returned by every delete endpoint.
#[derive(Debug, Serialize)]
pub struct RowsAffected {
    pub detail: String,
}

impl RowsAffected {
    #[must_use]
    pub fn new(rows: u64) -> Self {
        Self {
            detail: format!("{rows} row(s) affected"),
        }
    }
}

/// Build the entity routers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(customers::router())
        .merge(items::router())
        .merge(orders::router())
}

/// Build the complete application: health checks, entity routes, request
/// tracing and request IDs.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
