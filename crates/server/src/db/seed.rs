//! Bulk import of historical orders.
//!
//! Used by `order-desk seed` to bootstrap a fresh store from a JSON export.
//! Unlike orders placed through the API, seeded orders keep the timestamp they
//! were recorded with.

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};

use order_desk_core::{CustomerId, ItemId, Price};

use super::{RepositoryError, customers, items, orders};
use crate::models::{CustomerInput, ItemInput};

/// One historical order as found in a seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedOrder {
    /// Customer name.
    pub name: String,
    /// Customer phone number, used to de-duplicate customers.
    pub phone: String,
    /// Order notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Epoch seconds the order was recorded at.
    pub timestamp: i64,
    /// Ordered items.
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

/// One ordered item as found in a seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedItem {
    /// Item name, used to de-duplicate items.
    pub name: String,
    /// Item price.
    pub price: Price,
}

/// Row counts written by a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Customers inserted (existing phone numbers are reused).
    pub customers: usize,
    /// Items inserted (existing names are reused).
    pub items: usize,
    /// Orders inserted.
    pub orders: usize,
    /// Order lines inserted.
    pub lines: usize,
}

/// Keys in first-seen order, values from the last occurrence.
struct LastWins<V> {
    order: Vec<String>,
    values: HashMap<String, V>,
}

impl<V> LastWins<V> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            values: HashMap::new(),
        }
    }

    fn insert(&mut self, key: &str, value: V) {
        if self.values.insert(key.to_owned(), value).is_none() {
            self.order.push(key.to_owned());
        }
    }

    fn into_entries(mut self) -> Vec<(String, V)> {
        self.order
            .into_iter()
            .filter_map(|key| self.values.remove(&key).map(|value| (key, value)))
            .collect()
    }
}

/// Import historical orders in a single transaction.
///
/// Customers are de-duplicated by phone and items by name; when a key appears
/// more than once, the last occurrence provides the name or price. Rows that
/// already exist in the store are reused as they are.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any write fails; nothing is persisted
/// in that case.
pub async fn seed(
    pool: &SqlitePool,
    records: &[SeedOrder],
) -> Result<SeedSummary, RepositoryError> {
    let mut tx = super::begin_write(pool).await?;
    let summary = seed_on(&mut tx, records).await?;
    tx.commit().await?;

    tracing::info!(
        customers = summary.customers,
        items = summary.items,
        orders = summary.orders,
        lines = summary.lines,
        "Seed committed"
    );
    Ok(summary)
}

async fn seed_on(
    conn: &mut SqliteConnection,
    records: &[SeedOrder],
) -> Result<SeedSummary, RepositoryError> {
    let mut summary = SeedSummary::default();

    let mut names_by_phone = LastWins::new();
    let mut prices_by_name = LastWins::new();
    for record in records {
        names_by_phone.insert(&record.phone, record.name.clone());
        for item in &record.items {
            prices_by_name.insert(&item.name, item.price);
        }
    }

    let mut customer_ids: HashMap<String, CustomerId> = HashMap::new();
    for (phone, name) in names_by_phone.into_entries() {
        let id = match customers::find_id_by_phone(conn, &phone).await? {
            Some(id) => id,
            None => {
                summary.customers += 1;
                let input = CustomerInput {
                    name,
                    phone: phone.clone(),
                };
                customers::insert(conn, &input).await?
            }
        };
        customer_ids.insert(phone, id);
    }

    let mut item_ids: HashMap<String, ItemId> = HashMap::new();
    for (name, price) in prices_by_name.into_entries() {
        let id = match items::find_id_by_name(conn, &name).await? {
            Some(id) => id,
            None => {
                summary.items += 1;
                let input = ItemInput {
                    name: name.clone(),
                    price,
                };
                items::insert(conn, &input).await?
            }
        };
        item_ids.insert(name, id);
    }

    for record in records {
        let customer_id = customer_ids.get(&record.phone).copied().ok_or_else(|| {
            RepositoryError::DataCorruption(format!("no customer for phone {}", record.phone))
        })?;
        let notes = record.notes.as_deref().unwrap_or_default();
        let order_id = orders::insert_order(conn, customer_id, notes, record.timestamp).await?;
        summary.orders += 1;

        for item in &record.items {
            let item_id = item_ids.get(&item.name).copied().ok_or_else(|| {
                RepositoryError::DataCorruption(format!("no item named {}", item.name))
            })?;
            if orders::insert_line_if_item_exists(conn, order_id, item_id).await? {
                summary.lines += 1;
            }
        }
        tracing::debug!(%order_id, %customer_id, lines = record.items.len(), "Seeded order");
    }

    Ok(summary)
}
