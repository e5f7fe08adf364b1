//! Remote-change notifications.
//!
//! The replication backend applies rows from the remote replica directly to
//! the local store and then calls [`RemoteChangeFeed::notify`]. Anything that
//! needs to react to those writes subscribes to the feed.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 32;

/// A batch of remote rows has been applied to the local store.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteChange {
    pub received_at: DateTime<Utc>,
    /// Meals touched by the batch, if the backend knows them.
    pub meal_ids: Vec<Uuid>,
}

impl RemoteChange {
    pub fn new(meal_ids: Vec<Uuid>) -> Self {
        Self {
            received_at: Utc::now(),
            meal_ids,
        }
    }
}

/// Broadcast channel for [`RemoteChange`] events.
///
/// Cloning shares the underlying channel.
#[derive(Debug, Clone)]
pub struct RemoteChangeFeed {
    sender: broadcast::Sender<RemoteChange>,
}

impl RemoteChangeFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a change. Returns how many subscribers received it.
    pub fn notify(&self, change: RemoteChange) -> usize {
        let count = change.meal_ids.len();
        match self.sender.send(change) {
            Ok(receivers) => {
                tracing::debug!("Remote change ({} meals) sent to {} listeners", count, receivers);
                receivers
            }
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RemoteChange> {
        self.sender.subscribe()
    }
}

impl Default for RemoteChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
