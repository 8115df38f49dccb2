//! Catalog item route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use order_desk_core::{ItemId, Price};

use super::RowsAffected;
use crate::db::ItemRepository;
use crate::error::{AppError, Result};
use crate::models::{Item, ItemInput};
use crate::state::AppState;

/// Build the item router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", post(create_item))
        .route("/items/", post(create_item))
        .route(
            "/items/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

/// Item request body. The ID is server-generated.
///
/// The price is taken as a plain number and validated here so that a negative
/// price is reported as a bad request.
#[derive(Debug, Deserialize)]
pub struct ItemBody {
    #[serde(default)]
    pub item_id: Option<ItemId>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl ItemBody {
    fn into_input(self) -> Result<ItemInput> {
        let price = Price::new(self.price).map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(ItemInput {
            name: self.name,
            price,
        })
    }
}

/// Create an item.
///
/// POST /items/
#[instrument(skip(state, body))]
pub async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<ItemBody>,
) -> Result<Json<Item>> {
    if body.item_id.is_some() {
        return Err(AppError::BadRequest(
            "Item ID should not be passed!".to_string(),
        ));
    }

    let item = ItemRepository::new(state.pool())
        .create(body.into_input()?)
        .await?;
    tracing::info!(item_id = %item.item_id, "Item created");
    Ok(Json(item))
}

/// Get an item.
///
/// GET /items/{item_id}
#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Json<Item>> {
    let item = ItemRepository::new(state.pool())
        .get(ItemId::new(item_id))
        .await?;
    Ok(Json(item))
}

/// Replace an item. The body must carry the same ID as the path.
///
/// Orders referencing the item show the new name and price from now on.
///
/// PUT /items/{item_id}
#[instrument(skip(state, body))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(body): Json<ItemBody>,
) -> Result<Json<Item>> {
    let item_id = ItemId::new(item_id);
    if body.item_id != Some(item_id) {
        return Err(AppError::BadRequest("Invalid Item ID".to_string()));
    }

    let item = ItemRepository::new(state.pool())
        .update(item_id, body.into_input()?)
        .await?;
    tracing::info!("Item updated");
    Ok(Json(item))
}

/// Delete an item.
///
/// DELETE /items/{item_id}
#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Json<RowsAffected>> {
    let rows = ItemRepository::new(state.pool())
        .delete(ItemId::new(item_id))
        .await?;
    tracing::info!(rows, "Item deleted");
    Ok(Json(RowsAffected::new(rows)))
}
