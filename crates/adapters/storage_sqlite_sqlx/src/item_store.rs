//! `SQLite` implementation of [`ItemStore`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use inventory_app::ports::ItemStore;
use inventory_domain::error::InventoryError;
use inventory_domain::id::ItemId;
use inventory_domain::item::Item;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Item);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Item> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;

        Ok(Self(Item {
            id: Some(ItemId::new(id)),
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
        }))
    }
}

const SELECT_ALL_ORDERED_BY_NAME: &str =
    "SELECT id, name, price, quantity FROM items ORDER BY name ASC";
const SELECT_BY_ID: &str = "SELECT id, name, price, quantity FROM items WHERE id = ?";

// Only an identity collision is ignored; other constraint failures propagate.
const INSERT_IGNORE_ON_CONFLICT: &str = r"
    INSERT INTO items (id, name, price, quantity)
    VALUES (?, ?, ?, ?)
    ON CONFLICT (id) DO NOTHING
    RETURNING id
";

const UPDATE: &str = "UPDATE items SET name = ?, price = ?, quantity = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM items WHERE id = ?";

/// `SQLite`-backed item store.
#[derive(Clone)]
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ItemStore for SqliteItemStore {
    fn select_all_ordered_by_name(
        &self,
    ) -> impl Future<Output = Result<Vec<Item>, InventoryError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL_ORDERED_BY_NAME)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn select_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<Option<Item>, InventoryError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn insert_ignore_on_conflict(
        &self,
        item: Item,
    ) -> impl Future<Output = Result<Option<Item>, InventoryError>> + Send {
        let pool = self.pool.clone();
        async move {
            let assigned: Option<i64> = sqlx::query_scalar(INSERT_IGNORE_ON_CONFLICT)
                .bind(item.id.map(ItemId::get))
                .bind(&item.name)
                .bind(item.price)
                .bind(item.quantity)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(assigned.map(|id| item.with_id(ItemId::new(id))))
        }
    }

    fn update_replace(
        &self,
        item: Item,
    ) -> impl Future<Output = Result<bool, InventoryError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Some(id) = item.id else {
                return Ok(false);
            };

            let result = sqlx::query(UPDATE)
                .bind(&item.name)
                .bind(item.price)
                .bind(item.quantity)
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn delete_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<bool, InventoryError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }
}
