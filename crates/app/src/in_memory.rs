//! In-memory [`ItemStore`] keyed by id.
//!
//! Mirrors the `SQLite` adapter's observable behaviour closely enough to stand
//! in for it in tests: an unset id becomes one more than the highest id
//! currently stored (so deleting the highest row frees its id again), names
//! sort byte-wise (the default `BINARY` collation), and ties keep id order.
//! Once `i64::MAX` is taken, the lowest unused positive id is picked instead.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use inventory_domain::error::InventoryError;
use inventory_domain::id::ItemId;
use inventory_domain::item::Item;

use crate::ports::ItemStore;

/// Returned by every operation once the store has been closed.
#[derive(Debug, thiserror::Error)]
#[error("item store is closed")]
pub struct StoreClosed;

/// Returned by an insert without id when no positive id is left to assign.
#[derive(Debug, thiserror::Error)]
#[error("no unused item id left")]
pub struct IdSpaceExhausted;

#[derive(Debug, Default)]
struct State {
    rows: BTreeMap<ItemId, Item>,
    closed: bool,
}

impl State {
    fn next_id(&self) -> Result<ItemId, IdSpaceExhausted> {
        let Some(highest) = self.rows.keys().next_back() else {
            return Ok(ItemId::new(1));
        };
        if let Some(next) = highest.get().checked_add(1) {
            return Ok(ItemId::new(next));
        }
        let mut candidate: i64 = 1;
        for id in self.rows.keys().copied().map(ItemId::get).filter(|id| *id >= 1) {
            if id != candidate {
                break;
            }
            candidate = candidate.checked_add(1).ok_or(IdSpaceExhausted)?;
        }
        Ok(ItemId::new(candidate))
    }
}

/// A process-local item table.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    state: Mutex<State>,
}

impl InMemoryItemStore {
    /// Reject every subsequent operation with a storage error.
    pub fn close(&self) {
        self.lock().closed = true;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open(&self) -> Result<MutexGuard<'_, State>, InventoryError> {
        let state = self.lock();
        if state.closed {
            return Err(InventoryError::storage(StoreClosed));
        }
        Ok(state)
    }
}

impl ItemStore for InMemoryItemStore {
    fn select_all_ordered_by_name(
        &self,
    ) -> impl Future<Output = Result<Vec<Item>, InventoryError>> + Send {
        let result = self.open().map(|state| {
            let mut items: Vec<Item> = state.rows.values().cloned().collect();
            items.sort_by(|a, b| a.name.cmp(&b.name));
            items
        });
        async { result }
    }

    fn select_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<Option<Item>, InventoryError>> + Send {
        let result = self.open().map(|state| state.rows.get(&id).cloned());
        async { result }
    }

    fn insert_ignore_on_conflict(
        &self,
        item: Item,
    ) -> impl Future<Output = Result<Option<Item>, InventoryError>> + Send {
        let result = self.open().and_then(|mut state| {
            let id = match item.id {
                Some(id) => id,
                None => state.next_id().map_err(InventoryError::storage)?,
            };
            if state.rows.contains_key(&id) {
                return Ok(None);
            }
            let stored = item.with_id(id);
            state.rows.insert(id, stored.clone());
            Ok(Some(stored))
        });
        async { result }
    }

    fn update_replace(
        &self,
        item: Item,
    ) -> impl Future<Output = Result<bool, InventoryError>> + Send {
        let result = self.open().map(|mut state| {
            match item.id.and_then(|id| state.rows.get_mut(&id)) {
                Some(row) => {
                    *row = item;
                    true
                }
                None => false,
            }
        });
        async { result }
    }

    fn delete_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<bool, InventoryError>> + Send {
        let result = self.open().map(|mut state| state.rows.remove(&id).is_some());
        async { result }
    }
}
