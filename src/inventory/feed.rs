//! Change notifications for anything that mirrors the store: the WebSocket
//! clients, and any in-process view that wants to re-render on change.

use prime_common::PhoneListing;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::models::MirrorRecord;

/// Buffered events per subscriber before slow ones start lagging.
const FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StoreEvent {
    ListingCreated { listing: PhoneListing },
    ListingUpdated { listing: PhoneListing },
    ListingDeleted { listing_id: i64 },
    MirrorMinted { record: MirrorRecord },
}

#[derive(Clone)]
pub struct StoreFeed {
    tx: broadcast::Sender<StoreEvent>,
}

impl Default for StoreFeed {
    fn default() -> Self {
        Self::new(FEED_CAPACITY)
    }
}

impl StoreFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver an event to every current subscriber. Having none is fine.
    pub fn publish(&self, event: StoreEvent) {
        match self.tx.send(event) {
            Ok(receivers) => tracing::debug!(receivers, "Published store event"),
            Err(_) => tracing::trace!("Store event dropped: no subscribers"),
        }
    }

    /// Raw receiver, for loops that already multiplex other sources.
    pub fn receiver(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Call `on_change` for every event published from now on, until the
    /// returned handle is dropped or [`Unsubscribe::unsubscribe`]d.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe<F>(&self, mut on_change: F) -> Unsubscribe
    where
        F: FnMut(StoreEvent) + Send + 'static,
    {
        let mut rx = self.tx.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => on_change(event),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Store subscriber lagged; events skipped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Unsubscribe { handle }
    }
}

/// Stops a [`StoreFeed::subscribe`] callback when dropped.
#[must_use = "dropping the handle unsubscribes immediately"]
pub struct Unsubscribe {
    handle: JoinHandle<()>,
}

impl Unsubscribe {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Unsubscribe {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
