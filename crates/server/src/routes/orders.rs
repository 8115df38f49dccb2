//! Order route handlers.
//!
//! Placement and update run through [`OrderService`], which keeps the order
//! row and its lines consistent.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use order_desk_core::{CustomerId, ItemId, OrderId};

use super::RowsAffected;
use crate::error::{AppError, Result};
use crate::models::{NewOrder, OrderDetail, OrderUpdate};
use crate::services::OrderService;
use crate::state::AppState;

/// Build the order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/", post(create_order))
        .route(
            "/orders/{order_id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}

/// Order request body.
///
/// `customer_id` is only used on placement; an update never moves an order to
/// another customer.
#[derive(Debug, Deserialize)]
pub struct OrderBody {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub notes: String,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub items: Vec<ItemId>,
}

/// Acknowledgement for placement and update.
#[derive(Debug, Serialize)]
pub struct OrderAck {
    pub detail: &'static str,
    pub order_id: OrderId,
}

/// Place an order.
///
/// POST /orders/
#[instrument(skip(state, body), fields(customer_id = %body.customer_id))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<OrderBody>,
) -> Result<Json<OrderAck>> {
    if body.order_id.is_some() {
        return Err(AppError::BadRequest(
            "Order ID should not be passed!".to_string(),
        ));
    }

    let order = NewOrder {
        customer_id: body.customer_id,
        notes: body.notes,
        items: body.items,
    };
    let order_id = OrderService::new(state.pool()).create(&order).await?;

    Ok(Json(OrderAck {
        detail: "Order placed",
        order_id,
    }))
}

/// Get an order with its items.
///
/// GET /orders/{order_id}
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderDetail>> {
    let detail = OrderService::new(state.pool())
        .get(OrderId::new(order_id))
        .await?;
    Ok(Json(detail))
}

/// Replace the notes and lines of an order. The body must carry the same ID
/// as the path.
///
/// PUT /orders/{order_id}
#[instrument(skip(state, body))]
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    Json(body): Json<OrderBody>,
) -> Result<Json<OrderAck>> {
    let order_id = OrderId::new(order_id);
    if body.order_id != Some(order_id) {
        return Err(AppError::BadRequest("Invalid Order ID".to_string()));
    }

    let update = OrderUpdate {
        notes: body.notes,
        items: body.items,
    };
    let order_id = OrderService::new(state.pool())
        .update(order_id, &update)
        .await?;

    Ok(Json(OrderAck {
        detail: "Order updated",
        order_id,
    }))
}

/// Delete an order and its lines.
///
/// DELETE /orders/{order_id}
#[instrument(skip(state))]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<RowsAffected>> {
    let rows = OrderService::new(state.pool())
        .delete(OrderId::new(order_id))
        .await?;
    Ok(Json(RowsAffected::new(rows)))
}
