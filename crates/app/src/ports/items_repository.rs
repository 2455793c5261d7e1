//! Repository port — the storage-agnostic item API application code depends on.
//!
//! Swapping the storage technology (or substituting an in-memory fake in
//! tests) never touches callers of this trait.

use std::future::Future;

use inventory_domain::error::InventoryError;
use inventory_domain::id::ItemId;
use inventory_domain::item::Item;

use crate::live_query::LiveQuery;

/// Live reads and async writes over the stored items.
pub trait ItemsRepository {
    /// Live snapshot of every item, ordered by name ascending.
    ///
    /// The first emission is the current snapshot; every committed insert,
    /// update or delete re-emits the whole collection. The sequence never
    /// completes on its own.
    fn stream_all(&self) -> LiveQuery<Vec<Item>>;

    /// Live view of the item with `id`; `None` while no such row exists.
    fn stream(&self, id: ItemId) -> LiveQuery<Option<Item>>;

    /// Insert `item`, ignoring it when its id is already taken.
    ///
    /// Resolves to the id of the created row, or `None` when ignored.
    fn insert(
        &self,
        item: Item,
    ) -> impl Future<Output = Result<Option<ItemId>, InventoryError>> + Send;

    /// Replace the stored row matching `item.id`; a missing row is a no-op.
    ///
    /// Resolves to whether a row was replaced.
    fn update(&self, item: Item) -> impl Future<Output = Result<bool, InventoryError>> + Send;

    /// Delete the stored row matching `item.id`; a missing row is a no-op.
    ///
    /// Resolves to whether a row was removed.
    fn delete(&self, item: Item) -> impl Future<Output = Result<bool, InventoryError>> + Send;
}

impl<T: ItemsRepository + Send + Sync> ItemsRepository for std::sync::Arc<T> {
    fn stream_all(&self) -> LiveQuery<Vec<Item>> {
        (**self).stream_all()
    }

    fn stream(&self, id: ItemId) -> LiveQuery<Option<Item>> {
        (**self).stream(id)
    }

    fn insert(
        &self,
        item: Item,
    ) -> impl Future<Output = Result<Option<ItemId>, InventoryError>> + Send {
        (**self).insert(item)
    }

    fn update(&self, item: Item) -> impl Future<Output = Result<bool, InventoryError>> + Send {
        (**self).update(item)
    }

    fn delete(&self, item: Item) -> impl Future<Output = Result<bool, InventoryError>> + Send {
        (**self).delete(item)
    }
}
