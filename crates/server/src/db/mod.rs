//! Database operations for the order desk `SQLite` store.
//!
//! # Database: single file (default `db.sqlite`)
//!
//! ## Tables
//!
//! - `CUSTOMERS` - Customers, unique by phone number
//! - `ITEMS` - Catalog items, unique by name
//! - `ORDERS` - Orders, each referencing one customer
//! - `ORDER_LIST` - Order lines (order -> item), cascade-deleted with their order
//!
//! # Bootstrap
//!
//! The schema is created idempotently on server start-up and via:
//! ```bash
//! cargo run -p order-desk-cli -- init
//! ```
//!
//! # Connections
//!
//! Every connection enables `PRAGMA foreign_keys`, which `SQLite` leaves off by
//! default. Repositories acquire a pooled connection per call; the connection
//! returns to the pool when dropped, on success and error paths alike.

pub mod customers;
pub mod items;
pub mod orders;
pub mod seed;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::{Sqlite, SqlitePool, Transaction};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use customers::CustomerRepository;
pub use items::ItemRepository;

/// DDL for all tables. Every statement is `CREATE TABLE IF NOT EXISTS`.
const SCHEMA: &str = include_str!("schema.sql");

/// Entity kinds that can be reported as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Customer,
    Item,
    Order,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Customer => "Customer",
            Self::Item => "Item",
            Self::Order => "Order",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested or referenced entity was not found.
    #[error("{entity} ID {id} not found")]
    NotFound {
        /// Kind of the missing row.
        entity: Entity,
        /// Identifier that was looked up.
        id: i64,
    },

    /// Constraint violation (e.g., unique phone, item still referenced).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Shorthand for a missing row.
    #[must_use]
    pub fn not_found(entity: Entity, id: impl Into<i64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Open a transaction that holds the write lock from its first statement.
///
/// A deferred `BEGIN` that reads before writing cannot upgrade its lock while
/// another connection does the same; `SQLite` then fails one of them with
/// `SQLITE_BUSY` without waiting. `BEGIN IMMEDIATE` queues writers on the busy
/// timeout instead.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the lock cannot be taken before the
/// busy timeout expires.
pub async fn begin_write(
    pool: &SqlitePool,
) -> Result<Transaction<'static, Sqlite>, RepositoryError> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Create a `SQLite` connection pool for a database file.
///
/// The file is created if it does not exist yet.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g. `sqlite://db.sqlite`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the file cannot be opened.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a pool over a private in-memory database.
///
/// The pool holds exactly one connection that never expires, since an
/// in-memory database lives only as long as its connection.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Create all tables if they do not exist.
///
/// # Errors
///
/// Returns `sqlx::Error` if any DDL statement fails.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    tracing::debug!("Schema ready");
    Ok(())
}

/// Count the rows of a table. Used by bootstrap tooling and tests.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count_rows(pool: &SqlitePool, table: Table) -> Result<i64, RepositoryError> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(count)
}

/// The tables of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Customers,
    Items,
    Orders,
    OrderList,
}

impl Table {
    /// SQL name of the table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customers => "CUSTOMERS",
            Self::Items => "ITEMS",
            Self::Orders => "ORDERS",
            Self::OrderList => "ORDER_LIST",
        }
    }
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}

/// Map a foreign-key violation to `Conflict`, anything else to `Database`.
pub(crate) fn conflict_on_reference(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}
