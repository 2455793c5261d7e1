//! Record store port — the fixed set of query shapes against the `items` table.
//!
//! Implementations execute exactly one row operation per call and report
//! whether it touched a row. Absence and identity conflicts are reported as
//! values, never as errors; only store-level failures return `Err`.

use std::future::Future;

use inventory_domain::error::InventoryError;
use inventory_domain::id::ItemId;
use inventory_domain::item::Item;

/// One-shot access to the persisted `items` table.
pub trait ItemStore {
    /// Every row, ordered by `name` ascending using the store's collation.
    ///
    /// Ties are returned in a stable, storage-defined order.
    fn select_all_ordered_by_name(
        &self,
    ) -> impl Future<Output = Result<Vec<Item>, InventoryError>> + Send;

    /// The row matching `id`, if any.
    fn select_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<Option<Item>, InventoryError>> + Send;

    /// Insert `item`, assigning an id when it has none.
    ///
    /// Returns the stored row (with its id), or `None` when a row with the
    /// same id already exists; that row is left untouched.
    fn insert_ignore_on_conflict(
        &self,
        item: Item,
    ) -> impl Future<Output = Result<Option<Item>, InventoryError>> + Send;

    /// Overwrite every field of the row matching `item.id`.
    ///
    /// Returns `false` when no row matched (or `item.id` is unset).
    fn update_replace(
        &self,
        item: Item,
    ) -> impl Future<Output = Result<bool, InventoryError>> + Send;

    /// Remove the row matching `id`. Returns `false` when there was none.
    fn delete_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<bool, InventoryError>> + Send;
}

impl<T: ItemStore + Send + Sync> ItemStore for std::sync::Arc<T> {
    fn select_all_ordered_by_name(
        &self,
    ) -> impl Future<Output = Result<Vec<Item>, InventoryError>> + Send {
        (**self).select_all_ordered_by_name()
    }

    fn select_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<Option<Item>, InventoryError>> + Send {
        (**self).select_by_id(id)
    }

    fn insert_ignore_on_conflict(
        &self,
        item: Item,
    ) -> impl Future<Output = Result<Option<Item>, InventoryError>> + Send {
        (**self).insert_ignore_on_conflict(item)
    }

    fn update_replace(
        &self,
        item: Item,
    ) -> impl Future<Output = Result<bool, InventoryError>> + Send {
        (**self).update_replace(item)
    }

    fn delete_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<bool, InventoryError>> + Send {
        (**self).delete_by_id(id)
    }
}
