//! Offline item repository — the [`ItemsRepository`] backed by a local store.
//!
//! A thin pass-through over [`ItemGateway`]: it holds no state of its own and
//! preserves the gateway's semantics verbatim. It exists so callers depend on
//! the storage-agnostic trait rather than on a particular store.

use inventory_domain::error::InventoryError;
use inventory_domain::id::ItemId;
use inventory_domain::item::Item;

use crate::gateway::ItemGateway;
use crate::live_query::LiveQuery;
use crate::ports::{ItemStore, ItemsRepository};

/// Repository over any local [`ItemStore`].
pub struct OfflineItemsRepository<S> {
    gateway: ItemGateway<S>,
}

impl<S> Clone for OfflineItemsRepository<S> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<S> OfflineItemsRepository<S>
where
    S: ItemStore + Send + Sync + 'static,
{
    /// Create a repository over `store` with default live-query settings.
    pub fn new(store: S) -> Self {
        Self::from_gateway(ItemGateway::new(store))
    }

    /// Wrap an existing gateway, sharing its change feed.
    pub fn from_gateway(gateway: ItemGateway<S>) -> Self {
        Self { gateway }
    }

    /// Borrow the gateway, e.g. to watch raw changes.
    #[must_use]
    pub fn gateway(&self) -> &ItemGateway<S> {
        &self.gateway
    }
}

impl<S> ItemsRepository for OfflineItemsRepository<S>
where
    S: ItemStore + Send + Sync + 'static,
{
    #[tracing::instrument(skip(self))]
    fn stream_all(&self) -> LiveQuery<Vec<Item>> {
        self.gateway.select_all_ordered_by_name()
    }

    #[tracing::instrument(skip(self))]
    fn stream(&self, id: ItemId) -> LiveQuery<Option<Item>> {
        self.gateway.select_by_id(id)
    }

    #[tracing::instrument(skip(self, item), fields(item_id = ?item.id, name = %item.name))]
    async fn insert(&self, item: Item) -> Result<Option<ItemId>, InventoryError> {
        self.gateway.insert_ignore_on_conflict(item).await
    }

    #[tracing::instrument(skip(self, item), fields(item_id = ?item.id))]
    async fn update(&self, item: Item) -> Result<bool, InventoryError> {
        self.gateway.update_replace(item).await
    }

    #[tracing::instrument(skip(self, item), fields(item_id = ?item.id))]
    async fn delete(&self, item: Item) -> Result<bool, InventoryError> {
        match item.id {
            Some(id) => self.gateway.delete_by_id(id).await,
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change_feed::ChangeFeed;
    use crate::in_memory::InMemoryItemStore;
    use std::sync::Arc;
    use std::time::Duration;

    const QUIET: Duration = Duration::from_millis(100);

    fn make_repo() -> OfflineItemsRepository<InMemoryItemStore> {
        OfflineItemsRepository::new(InMemoryItemStore::default())
    }

    fn bolt() -> Item {
        Item::builder()
            .id(ItemId::new(1))
            .name("Bolt")
            .price(0.50)
            .quantity(100)
            .build()
    }

    async fn next<T>(live: &mut LiveQuery<T>) -> T {
        live.recv().await.expect("sequence ended").expect("store failed")
    }

    async fn assert_quiet<T: std::fmt::Debug>(live: &mut LiveQuery<T>) {
        let emitted = tokio::time::timeout(QUIET, live.recv()).await;
        assert!(emitted.is_err(), "unexpected emission: {emitted:?}");
    }

    #[tokio::test]
    async fn should_stream_inserted_item_when_subscribed_after_insert() {
        let repo = make_repo();
        repo.insert(bolt()).await.unwrap();

        let mut point = repo.stream(ItemId::new(1));

        assert_eq!(next(&mut point).await, Some(bolt()));
    }

    #[tokio::test]
    async fn should_keep_first_item_and_stay_quiet_when_insert_conflicts() {
        let repo = make_repo();
        repo.insert(bolt()).await.unwrap();
        let mut point = repo.stream(ItemId::new(1));
        let mut all = repo.stream_all();
        next(&mut point).await;
        next(&mut all).await;

        let nut = Item::builder()
            .id(ItemId::new(1))
            .name("Nut")
            .price(0.10)
            .quantity(50)
            .build();
        let ignored = repo.insert(nut).await.unwrap();

        assert_eq!(ignored, None);
        assert_quiet(&mut point).await;
        assert_quiet(&mut all).await;
        let mut current = repo.stream(ItemId::new(1));
        assert_eq!(next(&mut current).await, Some(bolt()));
    }

    #[tokio::test]
    async fn should_emit_new_values_to_point_and_collection_when_updated() {
        let repo = make_repo();
        repo.insert(bolt()).await.unwrap();
        let mut point = repo.stream(ItemId::new(1));
        let mut all = repo.stream_all();
        next(&mut point).await;
        next(&mut all).await;

        let mut changed = bolt();
        changed.price = 0.75;
        changed.quantity = 90;
        assert!(repo.update(changed.clone()).await.unwrap());

        assert_eq!(next(&mut point).await, Some(changed.clone()));
        assert_eq!(next(&mut all).await, vec![changed]);
    }

    #[tokio::test]
    async fn should_emit_absent_and_shrink_collection_when_deleted() {
        let repo = make_repo();
        repo.insert(bolt()).await.unwrap();
        let nut = Item::builder().id(ItemId::new(2)).name("Nut").build();
        repo.insert(nut.clone()).await.unwrap();
        let mut point = repo.stream(ItemId::new(1));
        let mut all = repo.stream_all();
        next(&mut point).await;
        assert_eq!(next(&mut all).await.len(), 2);

        assert!(repo.delete(bolt()).await.unwrap());

        assert_eq!(next(&mut point).await, None);
        assert_eq!(next(&mut all).await, vec![nut]);
    }

    #[tokio::test]
    async fn should_stay_quiet_when_update_or_delete_targets_missing_row() {
        let repo = make_repo();
        let mut point = repo.stream(ItemId::new(7));
        let mut all = repo.stream_all();
        assert_eq!(next(&mut point).await, None);
        assert!(next(&mut all).await.is_empty());

        let ghost = Item::builder().id(ItemId::new(7)).name("Ghost").build();
        assert!(!repo.update(ghost.clone()).await.unwrap());
        assert!(!repo.delete(ghost).await.unwrap());

        assert_quiet(&mut point).await;
        assert_quiet(&mut all).await;
    }

    #[tokio::test]
    async fn should_not_emit_to_point_observer_of_other_id() {
        let repo = make_repo();
        let mut point = repo.stream(ItemId::new(1));
        assert_eq!(next(&mut point).await, None);

        repo.insert(Item::builder().id(ItemId::new(2)).name("Nut").build())
            .await
            .unwrap();

        assert_quiet(&mut point).await;
    }

    #[tokio::test]
    async fn should_deliver_current_snapshot_to_every_new_subscriber() {
        let repo = make_repo();
        repo.insert(bolt()).await.unwrap();

        let mut first = repo.stream_all();
        let mut second = repo.stream_all();

        assert_eq!(next(&mut first).await, vec![bolt()]);
        assert_eq!(next(&mut second).await, vec![bolt()]);
    }

    #[tokio::test]
    async fn should_follow_bolt_scenario_end_to_end() {
        let repo = make_repo();
        let mut point = repo.stream(ItemId::new(1));
        let mut all = repo.stream_all();
        assert_eq!(next(&mut point).await, None);
        assert!(next(&mut all).await.is_empty());

        repo.insert(bolt()).await.unwrap();
        assert_eq!(next(&mut point).await, Some(bolt()));
        assert_eq!(next(&mut all).await, vec![bolt()]);

        let nut = Item::builder()
            .id(ItemId::new(1))
            .name("Nut")
            .price(0.10)
            .quantity(50)
            .build();
        repo.insert(nut).await.unwrap();

        let restocked = Item::builder()
            .id(ItemId::new(1))
            .name("Bolt")
            .price(0.75)
            .quantity(90)
            .build();
        repo.update(restocked.clone()).await.unwrap();
        assert_eq!(next(&mut point).await, Some(restocked.clone()));
        assert_eq!(next(&mut all).await, vec![restocked.clone()]);

        repo.delete(restocked).await.unwrap();
        assert_eq!(next(&mut point).await, None);
        assert!(next(&mut all).await.is_empty());
    }

    #[tokio::test]
    async fn should_work_through_shared_arc() {
        let repo = Arc::new(make_repo());
        repo.insert(bolt()).await.unwrap();
        let mut all = ItemsRepository::stream_all(&repo);
        assert_eq!(next(&mut all).await, vec![bolt()]);
    }

    fn shared_repos() -> (
        OfflineItemsRepository<InMemoryItemStore>,
        OfflineItemsRepository<InMemoryItemStore>,
    ) {
        let store = Arc::new(InMemoryItemStore::default());
        let feed = ChangeFeed::new(16);
        let reader = ItemGateway::from_parts(Arc::clone(&store), feed.clone(), 4);
        let writer = ItemGateway::from_parts(store, feed, 4);
        (
            OfflineItemsRepository::from_gateway(reader),
            OfflineItemsRepository::from_gateway(writer),
        )
    }

    #[tokio::test]
    async fn should_emit_writes_made_through_another_repository() {
        let (reader, writer) = shared_repos();
        let mut all = reader.stream_all();
        assert!(next(&mut all).await.is_empty());

        writer.insert(bolt()).await.unwrap();

        assert_eq!(next(&mut all).await, vec![bolt()]);
    }

    #[tokio::test]
    async fn should_keep_streaming_after_creating_repository_dropped() {
        let (reader, writer) = shared_repos();
        let mut point = reader.stream(ItemId::new(1));
        assert_eq!(next(&mut point).await, None);
        drop(reader);

        writer.insert(bolt()).await.unwrap();

        assert_eq!(next(&mut point).await, Some(bolt()));
    }

    #[tokio::test]
    async fn should_not_end_sequence_when_only_repository_dropped() {
        let repo = make_repo();
        let mut all = repo.stream_all();
        next(&mut all).await;

        drop(repo);

        assert_quiet(&mut all).await;
    }
}
