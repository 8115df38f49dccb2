//! Order domain types.
//!
//! An order owns its lines: lines are created and destroyed only together with
//! the order's create, update and delete.

use serde::{Deserialize, Serialize};

use order_desk_core::{CustomerId, ItemId, OrderId, OrderLineId};

use super::Item;

/// An order row, without its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Store-generated order ID.
    pub order_id: OrderId,
    /// Free-form notes.
    pub notes: String,
    /// Customer who placed the order.
    pub customer_id: CustomerId,
    /// Server-assigned epoch seconds of the last create or update.
    pub timestamp: i64,
}

/// One (order, item) association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// Store-generated line ID.
    pub order_list_id: OrderLineId,
    /// Owning order.
    pub order_id: OrderId,
    /// Referenced item.
    pub item_id: ItemId,
}

/// An order with its lines resolved to the current item records.
///
/// Item names and prices are read at query time, so a later price change is
/// reflected when the order is read again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetail {
    /// Store-generated order ID.
    pub order_id: OrderId,
    /// Free-form notes.
    pub notes: String,
    /// Server-assigned epoch seconds of the last create or update.
    pub timestamp: i64,
    /// Customer who placed the order.
    pub customer_id: CustomerId,
    /// One entry per order line, in insertion order.
    pub items: Vec<Item>,
}

/// Input for placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewOrder {
    /// Customer placing the order; must exist.
    pub customer_id: CustomerId,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Items to order. Duplicates produce one line each.
    #[serde(default)]
    pub items: Vec<ItemId>,
}

/// Input for updating an order. Lines are fully replaced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderUpdate {
    /// Replacement notes.
    #[serde(default)]
    pub notes: String,
    /// Replacement item list.
    #[serde(default)]
    pub items: Vec<ItemId>,
}
