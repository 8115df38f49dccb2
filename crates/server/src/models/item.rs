//! Catalog item domain types.

use serde::{Deserialize, Serialize};

use order_desk_core::{ItemId, Price};

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Store-generated item ID.
    pub item_id: ItemId,
    /// Item name, unique across the catalog.
    pub name: String,
    /// Current price.
    pub price: Price,
}

/// Mutable fields of an item, used for create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemInput {
    /// Item name, unique across the catalog.
    pub name: String,
    /// Current price.
    pub price: Price,
}

impl ItemInput {
    /// Attach an ID to produce the stored representation.
    #[must_use]
    pub fn with_id(self, item_id: ItemId) -> Item {
        Item {
            item_id,
            name: self.name,
            price: self.price,
        }
    }
}
