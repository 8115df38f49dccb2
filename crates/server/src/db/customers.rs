//! Customer repository for database operations.

use sqlx::{SqliteConnection, SqlitePool};

use order_desk_core::CustomerId;

use super::{Entity, RepositoryError, conflict_on_reference, conflict_on_unique};
use crate::models::{Customer, CustomerInput};

const DUPLICATE_PHONE: &str = "Mobile Number already exists";
const CUSTOMER_HAS_ORDERS: &str = "Customer still has orders";

/// Internal row type for customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    customer_id: CustomerId,
    name: String,
    phone: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            customer_id: row.customer_id,
            name: row.name,
            phone: row.phone,
        }
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone number already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: CustomerInput) -> Result<Customer, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let customer_id = insert(&mut conn, &input).await?;
        Ok(input.with_id(customer_id))
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no customer has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CustomerId) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT customer_id, name, phone FROM CUSTOMERS WHERE customer_id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found(Entity::Customer, id))?;

        Ok(row.into())
    }

    /// List all customers ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT customer_id, name, phone FROM CUSTOMERS ORDER BY customer_id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Replace every mutable field of a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no customer has this ID.
    /// Returns `RepositoryError::Conflict` if the new phone belongs to another customer.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CustomerId,
        input: CustomerInput,
    ) -> Result<Customer, RepositoryError> {
        let result = sqlx::query("UPDATE CUSTOMERS SET name = ?, phone = ? WHERE customer_id = ?")
            .bind(&input.name)
            .bind(&input.phone)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_PHONE))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Entity::Customer, id));
        }

        Ok(input.with_id(id))
    }

    /// Delete a customer.
    ///
    /// Orders are not cascaded: a customer that still has orders cannot be
    /// deleted while foreign keys are enforced.
    ///
    /// # Returns
    ///
    /// Returns the number of rows deleted (always 1 on success).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no customer has this ID.
    /// Returns `RepositoryError::Conflict` if orders still reference the customer.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CustomerId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM CUSTOMERS WHERE customer_id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| conflict_on_reference(e, CUSTOMER_HAS_ORDERS))?;

        match result.rows_affected() {
            0 => Err(RepositoryError::not_found(Entity::Customer, id)),
            n => Ok(n),
        }
    }
}

/// Insert a customer on an existing connection and return its generated ID.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the phone number already exists.
pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    input: &CustomerInput,
) -> Result<CustomerId, RepositoryError> {
    let result = sqlx::query("INSERT INTO CUSTOMERS (name, phone) VALUES (?, ?)")
        .bind(&input.name)
        .bind(&input.phone)
        .execute(conn)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_PHONE))?;

    Ok(CustomerId::new(result.last_insert_rowid()))
}

/// Whether a customer row exists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn exists(
    conn: &mut SqliteConnection,
    id: CustomerId,
) -> Result<bool, RepositoryError> {
    let found: Option<CustomerId> =
        sqlx::query_scalar("SELECT customer_id FROM CUSTOMERS WHERE customer_id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?;

    Ok(found.is_some())
}

/// Look up a customer ID by phone number.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn find_id_by_phone(
    conn: &mut SqliteConnection,
    phone: &str,
) -> Result<Option<CustomerId>, RepositoryError> {
    let id = sqlx::query_scalar("SELECT customer_id FROM CUSTOMERS WHERE phone = ?")
        .bind(phone)
        .fetch_optional(conn)
        .await?;

    Ok(id)
}
