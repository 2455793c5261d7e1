//! Query gateway — the only operations permitted against the record store.
//!
//! Reads come back as [`LiveQuery`]s; writes go to the store and, when they
//! actually touched a row, are published on the [`ChangeFeed`] so every
//! affected live query re-reads. Publishing happens after the store reports
//! the commit, which keeps per-identity emissions in commit order.

use std::sync::Arc;

use tokio::sync::broadcast;

use inventory_domain::change::ItemChange;
use inventory_domain::error::InventoryError;
use inventory_domain::id::ItemId;
use inventory_domain::item::Item;

use crate::change_feed::ChangeFeed;
use crate::config::LiveQueryConfig;
use crate::live_query::{self, AllByName, ById, LiveQuery};
use crate::ports::ItemStore;

/// Live reads and change-publishing writes over an [`ItemStore`].
pub struct ItemGateway<S> {
    store: Arc<S>,
    feed: ChangeFeed,
    observer_buffer: usize,
}

impl<S> Clone for ItemGateway<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            feed: self.feed.clone(),
            observer_buffer: self.observer_buffer,
        }
    }
}

impl<S> ItemGateway<S>
where
    S: ItemStore + Send + Sync + 'static,
{
    /// Wrap `store` with default buffer sizes.
    pub fn new(store: S) -> Self {
        Self::with_config(store, LiveQueryConfig::default())
    }

    /// Wrap `store` using the given buffer sizes.
    pub fn with_config(store: S, config: LiveQueryConfig) -> Self {
        Self {
            store: Arc::new(store),
            feed: ChangeFeed::new(config.feed_capacity),
            observer_buffer: config.observer_buffer,
        }
    }

    /// Build a gateway over a store and feed shared with other handles.
    ///
    /// Every gateway writing to the same table must publish on the same
    /// feed, otherwise their observers miss each other's writes.
    pub fn from_parts(store: Arc<S>, feed: ChangeFeed, observer_buffer: usize) -> Self {
        Self {
            store,
            feed,
            observer_buffer,
        }
    }

    /// Borrow the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Subscribe to raw committed changes.
    #[must_use]
    pub fn changes(&self) -> broadcast::Receiver<ItemChange> {
        self.feed.subscribe()
    }

    /// Live list of every item, ordered by name ascending.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn select_all_ordered_by_name(&self) -> LiveQuery<Vec<Item>> {
        live_query::spawn(
            Arc::clone(&self.store),
            &self.feed,
            AllByName,
            self.observer_buffer,
        )
    }

    /// Live view of at most one item.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn select_by_id(&self, id: ItemId) -> LiveQuery<Option<Item>> {
        live_query::spawn(
            Arc::clone(&self.store),
            &self.feed,
            ById(id),
            self.observer_buffer,
        )
    }

    /// Insert `item` unless its id is already taken.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn insert_ignore_on_conflict(
        &self,
        item: Item,
    ) -> Result<Option<ItemId>, InventoryError> {
        let inserted = self.store.insert_ignore_on_conflict(item).await?;
        match inserted.and_then(|row| row.id) {
            Some(id) => {
                self.feed.publish(ItemChange::inserted(id));
                Ok(Some(id))
            }
            None => {
                tracing::debug!("insert ignored, identity already present");
                Ok(None)
            }
        }
    }

    /// Overwrite the row matching `item.id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn update_replace(&self, item: Item) -> Result<bool, InventoryError> {
        let Some(id) = item.id else {
            tracing::debug!("update skipped, item has no id");
            return Ok(false);
        };
        let updated = self.store.update_replace(item).await?;
        if updated {
            self.feed.publish(ItemChange::updated(id));
        }
        Ok(updated)
    }

    /// Remove the row matching `id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn delete_by_id(&self, id: ItemId) -> Result<bool, InventoryError> {
        let deleted = self.store.delete_by_id(id).await?;
        if deleted {
            self.feed.publish(ItemChange::deleted(id));
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryItemStore;
    use inventory_domain::change::ChangeKind;
    use tokio::sync::broadcast::error::TryRecvError;

    fn gateway() -> ItemGateway<InMemoryItemStore> {
        ItemGateway::new(InMemoryItemStore::default())
    }

    fn item(id: i64, name: &str) -> Item {
        Item::builder()
            .id(ItemId::new(id))
            .name(name)
            .price(1.0)
            .quantity(1)
            .build()
    }

    #[tokio::test]
    async fn should_publish_insert_when_row_created() {
        let gw = gateway();
        let mut changes = gw.changes();

        let id = gw.insert_ignore_on_conflict(item(1, "Bolt")).await.unwrap();

        assert_eq!(id, Some(ItemId::new(1)));
        assert_eq!(changes.try_recv().unwrap(), ItemChange::inserted(ItemId::new(1)));
    }

    #[tokio::test]
    async fn should_return_assigned_id_when_item_has_none() {
        let gw = gateway();
        let unset = Item::builder().name("Washer").build();

        let id = gw.insert_ignore_on_conflict(unset).await.unwrap();

        assert_eq!(id, Some(ItemId::new(1)));
    }

    #[tokio::test]
    async fn should_not_publish_when_insert_ignored() {
        let gw = gateway();
        gw.insert_ignore_on_conflict(item(1, "Bolt")).await.unwrap();
        let mut changes = gw.changes();

        let id = gw.insert_ignore_on_conflict(item(1, "Nut")).await.unwrap();

        assert_eq!(id, None);
        assert!(matches!(changes.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn should_publish_update_and_delete_only_when_row_exists() {
        let gw = gateway();
        gw.insert_ignore_on_conflict(item(1, "Bolt")).await.unwrap();
        let mut changes = gw.changes();

        assert!(!gw.update_replace(item(2, "Ghost")).await.unwrap());
        assert!(!gw.delete_by_id(ItemId::new(2)).await.unwrap());
        assert!(gw.update_replace(item(1, "Bolt M6")).await.unwrap());
        assert!(gw.delete_by_id(ItemId::new(1)).await.unwrap());

        assert_eq!(changes.try_recv().unwrap().kind, ChangeKind::Updated);
        assert_eq!(changes.try_recv().unwrap().kind, ChangeKind::Deleted);
        assert!(matches!(changes.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn should_skip_update_when_item_has_no_id() {
        let gw = gateway();
        let updated = gw
            .update_replace(Item::builder().name("Bolt").build())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn should_keep_collection_sorted_at_every_emission() {
        let gw = gateway();
        let mut all = gw.select_all_ordered_by_name();
        assert!(all.recv().await.unwrap().unwrap().is_empty());

        for (id, name) in [(1, "Washer"), (2, "Anchor"), (3, "Nut"), (4, "Bolt")] {
            gw.insert_ignore_on_conflict(item(id, name)).await.unwrap();
            let snapshot = all.recv().await.unwrap().unwrap();
            assert!(snapshot.windows(2).all(|w| w[0].name <= w[1].name));
        }
    }

    #[tokio::test]
    async fn should_propagate_store_failure_on_write() {
        let gw = gateway();
        let mut changes = gw.changes();
        gw.store().close();

        let result = gw.insert_ignore_on_conflict(item(1, "Bolt")).await;

        assert!(matches!(result, Err(InventoryError::Storage(_))));
        assert!(matches!(changes.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn should_share_feed_between_clones() {
        let gw = gateway();
        let clone = gw.clone();
        let mut point = gw.select_by_id(ItemId::new(1));
        assert_eq!(point.recv().await.unwrap().unwrap(), None);

        clone.insert_ignore_on_conflict(item(1, "Bolt")).await.unwrap();

        let seen = point.recv().await.unwrap().unwrap();
        assert_eq!(seen.map(|i| i.name), Some("Bolt".to_string()));
    }

    fn shared_pair() -> (ItemGateway<InMemoryItemStore>, ItemGateway<InMemoryItemStore>) {
        let store = Arc::new(InMemoryItemStore::default());
        let feed = ChangeFeed::new(16);
        let reader = ItemGateway::from_parts(Arc::clone(&store), feed.clone(), 4);
        let writer = ItemGateway::from_parts(store, feed, 4);
        (reader, writer)
    }

    #[tokio::test]
    async fn should_notify_observers_of_other_gateway_over_shared_parts() {
        let (reader, writer) = shared_pair();
        let mut all = reader.select_all_ordered_by_name();
        assert!(all.recv().await.unwrap().unwrap().is_empty());

        writer.insert_ignore_on_conflict(item(1, "Bolt")).await.unwrap();

        let snapshot = all.recv().await.unwrap().unwrap();
        assert_eq!(snapshot, vec![item(1, "Bolt")]);
    }

    #[tokio::test]
    async fn should_keep_live_query_after_creating_gateway_dropped() {
        let (reader, writer) = shared_pair();
        let mut point = reader.select_by_id(ItemId::new(1));
        assert_eq!(point.recv().await.unwrap().unwrap(), None);
        drop(reader);

        writer.insert_ignore_on_conflict(item(1, "Bolt")).await.unwrap();

        assert_eq!(point.recv().await.unwrap().unwrap(), Some(item(1, "Bolt")));
    }
}
