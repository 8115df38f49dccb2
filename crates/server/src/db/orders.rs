//! Order and order line queries.
//!
//! Every function takes a `&mut SqliteConnection` so that callers can compose
//! several of them inside one transaction (`&mut *tx`) or run a single one on a
//! pooled connection. Transaction boundaries are owned by
//! [`OrderService`](crate::services::OrderService).

use sqlx::{SqliteConnection, SqlitePool};

use order_desk_core::{CustomerId, ItemId, OrderId, OrderLineId};

use super::RepositoryError;
use super::items::ItemRow;
use crate::models::{Item, Order, OrderLine};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_id: OrderId,
    notes: Option<String>,
    customer_id: CustomerId,
    timestamp: i64,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            order_id: row.order_id,
            notes: row.notes.unwrap_or_default(),
            customer_id: row.customer_id,
            timestamp: row.timestamp,
        }
    }
}

/// Internal row type for order line queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    order_list_id: OrderLineId,
    order_id: OrderId,
    item_id: ItemId,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            order_list_id: row.order_list_id,
            order_id: row.order_id,
            item_id: row.item_id,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Insert an order row and return its generated ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails (including a
/// foreign-key violation for an unknown customer).
pub(crate) async fn insert_order(
    conn: &mut SqliteConnection,
    customer_id: CustomerId,
    notes: &str,
    timestamp: i64,
) -> Result<OrderId, RepositoryError> {
    let result = sqlx::query("INSERT INTO ORDERS (notes, timestamp, customer_id) VALUES (?, ?, ?)")
        .bind(notes)
        .bind(timestamp)
        .bind(customer_id)
        .execute(conn)
        .await?;

    Ok(OrderId::new(result.last_insert_rowid()))
}

/// Replace the notes and timestamp of an order.
///
/// # Returns
///
/// Returns the number of rows updated (0 if the order does not exist).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn refresh_order(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    notes: &str,
    timestamp: i64,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("UPDATE ORDERS SET notes = ?, timestamp = ? WHERE order_id = ?")
        .bind(notes)
        .bind(timestamp)
        .bind(order_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// Fetch an order row without its lines.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn fetch_order(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<Option<Order>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT order_id, notes, customer_id, timestamp FROM ORDERS WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Into::into))
}

/// Delete an order. Its lines go with it through `ON DELETE CASCADE`.
///
/// # Returns
///
/// Returns the number of order rows deleted.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn delete_order(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM ORDERS WHERE order_id = ?")
        .bind(order_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// List all orders ordered by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_orders(pool: &SqlitePool) -> Result<Vec<Order>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT order_id, notes, customer_id, timestamp FROM ORDERS ORDER BY order_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

// =============================================================================
// Order Lines
// =============================================================================

/// Insert one order line, but only if the item exists.
///
/// # Returns
///
/// Returns `false` if no item has this ID, in which case nothing was written.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn insert_line_if_item_exists(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    item_id: ItemId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        INSERT INTO ORDER_LIST (order_id, item_id)
        SELECT ?, ? WHERE EXISTS (SELECT 1 FROM ITEMS WHERE item_id = ?)
        ",
    )
    .bind(order_id)
    .bind(item_id)
    .bind(item_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Delete every line of an order.
///
/// # Returns
///
/// Returns the number of lines deleted.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn delete_lines(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM ORDER_LIST WHERE order_id = ?")
        .bind(order_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// Resolve the lines of an order to the current item records.
///
/// Returns one item per line in insertion order, so an item ordered twice
/// appears twice.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn fetch_line_items(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<Vec<Item>, RepositoryError> {
    let rows = sqlx::query_as::<_, ItemRow>(
        r"
        SELECT i.item_id, i.name, i.price
        FROM ORDER_LIST l
        INNER JOIN ITEMS i ON i.item_id = l.item_id
        WHERE l.order_id = ?
        ORDER BY l.order_list_id
        ",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;

    rows.into_iter().map(Item::try_from).collect()
}

/// List the raw lines of one order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_lines_for_order(
    pool: &SqlitePool,
    order_id: OrderId,
) -> Result<Vec<OrderLine>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderLineRow>(
        r"
        SELECT order_list_id, order_id, item_id
        FROM ORDER_LIST
        WHERE order_id = ?
        ORDER BY order_list_id
        ",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// List every order line ordered by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_lines(pool: &SqlitePool) -> Result<Vec<OrderLine>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderLineRow>(
        "SELECT order_list_id, order_id, item_id FROM ORDER_LIST ORDER BY order_list_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}
