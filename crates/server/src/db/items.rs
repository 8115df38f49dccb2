//! Catalog item repository for database operations.
//!
//! Prices are stored as `REAL`; rows are converted back to [`Price`] on read and
//! a value that is not a valid price is reported as data corruption.

use sqlx::{SqliteConnection, SqlitePool};

use order_desk_core::{ItemId, Price};

use super::{Entity, RepositoryError, conflict_on_reference, conflict_on_unique};
use crate::models::{Item, ItemInput};

const DUPLICATE_NAME: &str = "Item already exists";
const ITEM_IN_USE: &str = "Item is referenced by an order";

/// Internal row type for item queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ItemRow {
    pub(crate) item_id: ItemId,
    pub(crate) name: String,
    pub(crate) price: f64,
}

impl TryFrom<ItemRow> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let price = Price::from_f64(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for item {}: {e}", row.item_id))
        })?;

        Ok(Self {
            item_id: row.item_id,
            name: row.name,
            price,
        })
    }
}

/// The input with its price as a later read will return it.
fn as_stored(input: ItemInput) -> Result<ItemInput, RepositoryError> {
    let price = input.price.as_stored().map_err(|e| {
        RepositoryError::DataCorruption(format!("price {} cannot be stored: {e}", input.price))
    })?;
    Ok(ItemInput { price, ..input })
}

/// Repository for catalog item database operations.
pub struct ItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an item with this name exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: ItemInput) -> Result<Item, RepositoryError> {
        let input = as_stored(input)?;
        let mut conn = self.pool.acquire().await?;
        let item_id = insert(&mut conn, &input).await?;
        Ok(input.with_id(item_id))
    }

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no item has this ID.
    /// Returns `RepositoryError::DataCorruption` if the stored price is invalid.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ItemId) -> Result<Item, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            "SELECT item_id, name, price FROM ITEMS WHERE item_id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found(Entity::Item, id))?;

        row.try_into()
    }

    /// List all items ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, ItemRow>("SELECT item_id, name, price FROM ITEMS ORDER BY item_id")
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(Item::try_from).collect()
    }

    /// Replace every mutable field of an item.
    ///
    /// Orders that reference the item see the new name and price the next time
    /// they are read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no item has this ID.
    /// Returns `RepositoryError::Conflict` if the new name belongs to another item.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: ItemId, input: ItemInput) -> Result<Item, RepositoryError> {
        let input = as_stored(input)?;
        let result = sqlx::query("UPDATE ITEMS SET name = ?, price = ? WHERE item_id = ?")
            .bind(&input.name)
            .bind(input.price.to_f64())
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Entity::Item, id));
        }

        Ok(input.with_id(id))
    }

    /// Delete an item.
    ///
    /// # Returns
    ///
    /// Returns the number of rows deleted (always 1 on success).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no item has this ID.
    /// Returns `RepositoryError::Conflict` if an order line references the item.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ItemId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM ITEMS WHERE item_id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| conflict_on_reference(e, ITEM_IN_USE))?;

        match result.rows_affected() {
            0 => Err(RepositoryError::not_found(Entity::Item, id)),
            n => Ok(n),
        }
    }
}

/// Insert an item on an existing connection and return its generated ID.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if an item with this name exists.
pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    input: &ItemInput,
) -> Result<ItemId, RepositoryError> {
    let result = sqlx::query("INSERT INTO ITEMS (name, price) VALUES (?, ?)")
        .bind(&input.name)
        .bind(input.price.to_f64())
        .execute(conn)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))?;

    Ok(ItemId::new(result.last_insert_rowid()))
}

/// Look up an item ID by name.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn find_id_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<ItemId>, RepositoryError> {
    let id = sqlx::query_scalar("SELECT item_id FROM ITEMS WHERE name = ?")
        .bind(name)
        .fetch_optional(conn)
        .await?;

    Ok(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::{create_memory_pool, init_schema};

    async fn setup() -> SqlitePool {
        let pool = create_memory_pool().await.unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    fn input(name: &str, cents: i64) -> ItemInput {
        ItemInput {
            name: name.to_owned(),
            price: Price::new(Decimal::new(cents, 2)).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_keeps_price() {
        let pool = setup().await;
        let repo = ItemRepository::new(&pool);

        let created = repo.create(input("Espresso", 250)).await.unwrap();
        let fetched = repo.get(created.item_id).await.unwrap();

        assert_eq!(fetched.name, "Espresso");
        assert_eq!(fetched.price.amount(), Decimal::new(250, 2));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let pool = setup().await;
        let repo = ItemRepository::new(&pool);
        repo.create(input("Espresso", 250)).await.unwrap();

        let err = repo.create(input("Espresso", 300)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let pool = setup().await;
        let err = ItemRepository::new(&pool)
            .get(ItemId::new(9))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Item ID 9 not found");
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let pool = setup().await;
        let repo = ItemRepository::new(&pool);
        let item = repo.create(input("Espresso", 250)).await.unwrap();

        repo.update(item.item_id, input("Double Espresso", 375))
            .await
            .unwrap();

        let fetched = repo.get(item.item_id).await.unwrap();
        assert_eq!(fetched.name, "Double Espresso");
        assert_eq!(fetched.price.amount(), Decimal::new(375, 2));
    }

    #[tokio::test]
    async fn test_create_and_update_return_the_stored_price() {
        let pool = setup().await;
        let repo = ItemRepository::new(&pool);
        let precise = ItemInput {
            name: "Ristretto".to_owned(),
            price: Price::new("1.0000000000000001".parse().unwrap()).unwrap(),
        };

        let created = repo.create(precise.clone()).await.unwrap();
        let fetched = repo.get(created.item_id).await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(created.price.amount(), Decimal::ONE);

        let updated = repo.update(created.item_id, precise).await.unwrap();
        assert_eq!(updated, repo.get(created.item_id).await.unwrap());
    }
}
