//! In-process change feed backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use inventory_domain::change::ItemChange;

/// Fan-out of committed [`ItemChange`]s to every live observer.
///
/// Publishing succeeds even when there are no active subscribers
/// (the change is simply dropped).
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ItemChange>,
}

impl ChangeFeed {
    /// Create a new feed buffering up to `capacity` changes per subscriber.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to changes on this feed.
    ///
    /// Returns a receiver that will get all changes published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ItemChange> {
        self.sender.subscribe()
    }

    /// Publish a committed change to all current subscribers.
    pub fn publish(&self, change: ItemChange) {
        // broadcast::send fails only when there are zero receivers,
        // which is fine — we simply ignore the error.
        let delivered = self.sender.send(change).unwrap_or(0);
        tracing::debug!(id = %change.id, kind = ?change.kind, delivered, "published item change");
    }

    /// Number of receivers currently subscribed.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
