//! Order transaction manager.
//!
//! Placing and updating an order touches `ORDERS` and `ORDER_LIST` and checks
//! `CUSTOMERS` and `ITEMS` along the way. Each of these runs inside a single
//! transaction: it commits after the last line is written, and any failure
//! (unknown customer, unknown item, store error) rolls back every write made
//! earlier in the same call. Write transactions take the database write lock
//! up front (`BEGIN IMMEDIATE`), so concurrent placements wait for each other
//! instead of failing.
//!
//! # Invariants
//!
//! - The order timestamp is always taken from the server clock.
//! - Lines are fully replaced on update, never merged.
//! - Each entry of the item list becomes its own line; duplicates are kept.
//! - An empty item list is valid and yields an order without lines.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::instrument;

use order_desk_core::{CustomerId, ItemId, OrderId};

use crate::db::{self, Entity, RepositoryError, customers, orders};
use crate::models::{NewOrder, OrderDetail, OrderUpdate};

/// Current server time as epoch seconds.
fn now_epoch_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Service for order operations that must stay consistent across tables.
pub struct OrderService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown customer or item; no
    /// order or line is persisted in that case.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, order), fields(customer_id = %order.customer_id, lines = order.items.len()))]
    pub async fn create(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let mut tx = db::begin_write(self.pool).await?;
        let result = place(&mut tx, order, now_epoch_seconds()).await;
        let order_id = finish(tx, result).await?;

        tracing::info!(%order_id, "Order placed");
        Ok(order_id)
    }

    /// Replace the notes and lines of an order and refresh its timestamp.
    ///
    /// The customer of an order never changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown order or item; the
    /// order is left exactly as it was in that case.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, update), fields(lines = update.items.len()))]
    pub async fn update(
        &self,
        order_id: OrderId,
        update: &OrderUpdate,
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = db::begin_write(self.pool).await?;
        let result = replace(&mut tx, order_id, update, now_epoch_seconds()).await;
        finish(tx, result).await?;

        tracing::info!("Order updated");
        Ok(order_id)
    }

    /// Get an order with its lines resolved to current item records.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, order_id: OrderId) -> Result<OrderDetail, RepositoryError> {
        // Both reads share one transaction so they see the same snapshot.
        let mut tx = self.pool.begin().await?;

        let order = orders::fetch_order(&mut tx, order_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(Entity::Order, order_id))?;
        let items = orders::fetch_line_items(&mut tx, order_id).await?;

        tx.commit().await?;

        Ok(OrderDetail {
            order_id: order.order_id,
            notes: order.notes,
            timestamp: order.timestamp,
            customer_id: order.customer_id,
            items,
        })
    }

    /// Delete an order together with its lines.
    ///
    /// # Returns
    ///
    /// Returns the number of order rows deleted (always 1 on success).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, order_id: OrderId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        match orders::delete_order(&mut conn, order_id).await? {
            0 => Err(RepositoryError::not_found(Entity::Order, order_id)),
            n => {
                tracing::info!("Order deleted");
                Ok(n)
            }
        }
    }
}

/// Commit on success, roll back on failure.
///
/// A failed rollback is logged but never replaces the error that caused it.
async fn finish<T>(
    tx: Transaction<'static, Sqlite>,
    result: Result<T, RepositoryError>,
) -> Result<T, RepositoryError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::error!(error = %rollback, "Rollback failed");
            }
            tracing::warn!(error = %e, "Order transaction rolled back");
            Err(e)
        }
    }
}

/// Write a new order and its lines. Runs inside the caller's transaction.
async fn place(
    conn: &mut SqliteConnection,
    order: &NewOrder,
    timestamp: i64,
) -> Result<OrderId, RepositoryError> {
    ensure_customer(conn, order.customer_id).await?;

    let order_id = orders::insert_order(conn, order.customer_id, &order.notes, timestamp).await?;
    tracing::debug!(%order_id, timestamp, "Order row inserted");

    insert_lines(conn, order_id, &order.items).await?;
    Ok(order_id)
}

/// Overwrite an order and its lines. Runs inside the caller's transaction.
async fn replace(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    update: &OrderUpdate,
    timestamp: i64,
) -> Result<(), RepositoryError> {
    if orders::refresh_order(conn, order_id, &update.notes, timestamp).await? == 0 {
        return Err(RepositoryError::not_found(Entity::Order, order_id));
    }

    let removed = orders::delete_lines(conn, order_id).await?;
    tracing::debug!(%order_id, removed, "Previous lines removed");

    insert_lines(conn, order_id, &update.items).await
}

async fn ensure_customer(
    conn: &mut SqliteConnection,
    customer_id: CustomerId,
) -> Result<(), RepositoryError> {
    if customers::exists(conn, customer_id).await? {
        Ok(())
    } else {
        Err(RepositoryError::not_found(Entity::Customer, customer_id))
    }
}

/// Insert one line per entry, stopping at the first item that does not exist.
async fn insert_lines(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    items: &[ItemId],
) -> Result<(), RepositoryError> {
    for &item_id in items {
        if !orders::insert_line_if_item_exists(conn, order_id, item_id).await? {
            return Err(RepositoryError::not_found(Entity::Item, item_id));
        }
        tracing::debug!(%order_id, %item_id, "Line inserted");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use order_desk_core::Price;

    use super::*;
    use crate::db::{CustomerRepository, ItemRepository, create_memory_pool, init_schema};
    use crate::models::{CustomerInput, ItemInput};

    async fn setup() -> (SqlitePool, CustomerId, Vec<ItemId>) {
        let pool = create_memory_pool().await.unwrap();
        init_schema(&pool).await.unwrap();

        let customer = CustomerRepository::new(&pool)
            .create(CustomerInput {
                name: "Ada".to_owned(),
                phone: "5550000001".to_owned(),
            })
            .await
            .unwrap();

        let mut items = Vec::new();
        for (name, cents) in [("Tea", 200), ("Scone", 350)] {
            let item = ItemRepository::new(&pool)
                .create(ItemInput {
                    name: name.to_owned(),
                    price: Price::new(Decimal::new(cents, 2)).unwrap(),
                })
                .await
                .unwrap();
            items.push(item.item_id);
        }

        (pool, customer.customer_id, items)
    }

    #[tokio::test]
    async fn test_duplicate_items_produce_separate_lines() {
        let (pool, customer_id, items) = setup().await;
        let service = OrderService::new(&pool);

        let order_id = service
            .create(&NewOrder {
                customer_id,
                notes: "twice".to_owned(),
                items: vec![items[0], items[0]],
            })
            .await
            .unwrap();

        let detail = service.get(order_id).await.unwrap();
        assert_eq!(detail.items.len(), 2);
        assert!(detail.items.iter().all(|item| item.item_id == items[0]));
    }

    #[tokio::test]
    async fn test_empty_item_list_is_valid() {
        let (pool, customer_id, _) = setup().await;
        let service = OrderService::new(&pool);

        let order_id = service
            .create(&NewOrder {
                customer_id,
                notes: String::new(),
                items: Vec::new(),
            })
            .await
            .unwrap();

        let detail = service.get(order_id).await.unwrap();
        assert!(detail.items.is_empty());
        assert_eq!(detail.customer_id, customer_id);
    }

    #[tokio::test]
    async fn test_timestamp_is_server_assigned() {
        let (pool, customer_id, items) = setup().await;
        let service = OrderService::new(&pool);

        let before = now_epoch_seconds();
        let order_id = service
            .create(&NewOrder {
                customer_id,
                notes: String::new(),
                items: vec![items[1]],
            })
            .await
            .unwrap();
        let after = now_epoch_seconds();

        let timestamp = service.get(order_id).await.unwrap().timestamp;
        assert!((before..=after).contains(&timestamp));
    }

    #[tokio::test]
    async fn test_update_missing_order_writes_nothing() {
        let (pool, _, items) = setup().await;
        let service = OrderService::new(&pool);

        let err = service
            .update(
                OrderId::new(77),
                &OrderUpdate {
                    notes: "ghost".to_owned(),
                    items: vec![items[0]],
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::NotFound {
                entity: Entity::Order,
                id: 77
            }
        ));
        assert!(orders::list_lines(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_order() {
        let (pool, _, _) = setup().await;
        let err = OrderService::new(&pool)
            .delete(OrderId::new(1))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Order ID 1 not found");
    }

    #[tokio::test]
    async fn test_failed_rollback_keeps_original_error() {
        let (pool, _, _) = setup().await;
        let mut tx = db::begin_write(&pool).await.unwrap();
        // End the transaction behind sqlx's back so the rollback itself fails.
        sqlx::query("ROLLBACK").execute(&mut *tx).await.unwrap();

        let err = finish::<()>(tx, Err(RepositoryError::not_found(Entity::Order, 5)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Order ID 5 not found");
    }
}
