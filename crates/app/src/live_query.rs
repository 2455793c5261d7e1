//! Live queries — subscriptions that re-emit a snapshot after every relevant change.
//!
//! Each [`LiveQuery`] is driven by one worker task:
//! 1. it subscribes to the [`ChangeFeed`] *before* reading, so no commit slips
//!    between the first snapshot and the first notification;
//! 2. it reads the snapshot from the store and hands it to the observer;
//! 3. it waits for a change its query shape cares about, then repeats.
//!
//! The worker keeps its own handle on the feed, so a live query outlives the
//! repository or gateway that created it. Dropping the [`LiveQuery`]
//! unsubscribes: the worker notices the closed channel and exits without
//! touching the store again. A store failure is delivered as a final `Err`
//! and ends the sequence.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::Stream;

use inventory_domain::change::ItemChange;
use inventory_domain::error::InventoryError;
use inventory_domain::id::ItemId;
use inventory_domain::item::Item;

use crate::change_feed::ChangeFeed;
use crate::ports::ItemStore;

/// A live, continuously-updating read result.
///
/// Yields `Ok(snapshot)` once immediately and again after every relevant
/// committed write. Ends only after yielding an `Err` from the store.
#[derive(Debug)]
pub struct LiveQuery<T> {
    receiver: mpsc::Receiver<Result<T, InventoryError>>,
}

impl<T> LiveQuery<T> {
    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the sequence has ended.
    pub async fn recv(&mut self) -> Option<Result<T, InventoryError>> {
        self.receiver.recv().await
    }

    /// Unsubscribe. No further snapshots are produced for this observer.
    pub fn close(self) {
        drop(self);
    }
}

impl<T> Stream for LiveQuery<T> {
    type Item = Result<T, InventoryError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

/// A query shape the gateway knows how to keep live.
pub(crate) trait LiveShape: Send + Sync + 'static {
    type Output: Send + 'static;

    /// Read the current snapshot from the store.
    fn fetch<S: ItemStore + Sync>(
        &self,
        store: &S,
    ) -> impl Future<Output = Result<Self::Output, InventoryError>> + Send;

    /// Whether `change` can alter this shape's snapshot.
    fn is_affected_by(&self, change: &ItemChange) -> bool;
}

/// Every item ordered by name.
pub(crate) struct AllByName;

impl LiveShape for AllByName {
    type Output = Vec<Item>;

    fn fetch<S: ItemStore + Sync>(
        &self,
        store: &S,
    ) -> impl Future<Output = Result<Self::Output, InventoryError>> + Send {
        store.select_all_ordered_by_name()
    }

    fn is_affected_by(&self, _change: &ItemChange) -> bool {
        true
    }
}

/// The single item with a given id.
pub(crate) struct ById(pub(crate) ItemId);

impl LiveShape for ById {
    type Output = Option<Item>;

    fn fetch<S: ItemStore + Sync>(
        &self,
        store: &S,
    ) -> impl Future<Output = Result<Self::Output, InventoryError>> + Send {
        store.select_by_id(self.0)
    }

    fn is_affected_by(&self, change: &ItemChange) -> bool {
        change.affects(self.0)
    }
}

/// Register an observer for `shape` and start its worker task.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
pub(crate) fn spawn<S, Q>(
    store: Arc<S>,
    feed: &ChangeFeed,
    shape: Q,
    buffer: usize,
) -> LiveQuery<Q::Output>
where
    S: ItemStore + Send + Sync + 'static,
    Q: LiveShape,
{
    let changes = feed.subscribe();
    let (sender, receiver) = mpsc::channel(buffer.max(1));
    tokio::spawn(run(store, feed.clone(), changes, shape, sender));
    LiveQuery { receiver }
}

async fn run<S, Q>(
    store: Arc<S>,
    _feed: ChangeFeed,
    mut changes: broadcast::Receiver<ItemChange>,
    shape: Q,
    sender: mpsc::Sender<Result<Q::Output, InventoryError>>,
) where
    S: ItemStore + Send + Sync,
    Q: LiveShape,
{
    loop {
        let snapshot = shape.fetch(store.as_ref()).await;
        let failed = snapshot.is_err();
        if let Err(err) = &snapshot {
            tracing::error!(error = ?err, "live query terminated by store failure");
        }
        if sender.send(snapshot).await.is_err() || failed {
            return;
        }
        if !wait_for_change(&mut changes, &shape, &sender).await {
            return;
        }
    }
}

/// Block until a change relevant to `shape` arrives.
///
/// Returns `false` when the observer unsubscribed or the feed closed.
async fn wait_for_change<Q, T>(
    changes: &mut broadcast::Receiver<ItemChange>,
    shape: &Q,
    sender: &mpsc::Sender<T>,
) -> bool
where
    Q: LiveShape,
{
    loop {
        tokio::select! {
            () = sender.closed() => return false,
            received = changes.recv() => match received {
                Ok(change) if shape.is_affected_by(&change) => return true,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "live query observer lagged, re-reading snapshot");
                    return true;
                }
                Err(RecvError::Closed) => return false,
            },
        }
    }
}
