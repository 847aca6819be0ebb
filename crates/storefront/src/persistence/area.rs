//! Shared storage area with storage-changed notifications.
//!
//! A [`StorageArea`] is what every context of one profile shares: a backend
//! and a broadcast channel. Each context talks to it through its own
//! [`StorageHandle`], which tags writes with the context id. A
//! [`Subscription`] delivers change events for one key, skipping the ones
//! its own context caused.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, trace};

use storefront_core::ContextId;

use super::storage::{StorageBackend, StorageError};

/// Capacity of the notification channel. Slow subscribers that fall further
/// behind observe a lag, which is reported as a change.
const EVENT_CAPACITY: usize = 64;

/// A storage-changed notification.
///
/// Carries no value: consumers re-read the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Key that was written or removed.
    pub key: String,
    /// Context that made the change.
    pub origin: ContextId,
}

/// Storage shared by every context of one profile.
pub struct StorageArea {
    backend: Box<dyn StorageBackend>,
    events: broadcast::Sender<StorageEvent>,
}

impl std::fmt::Debug for StorageArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageArea")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

impl StorageArea {
    /// Wrap a backend in a shareable area.
    #[must_use]
    pub fn new(backend: impl StorageBackend + 'static) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            backend: Box::new(backend),
            events,
        })
    }

    /// Open a new context on this area with a fresh id.
    #[must_use]
    pub fn handle(self: &Arc<Self>) -> StorageHandle {
        StorageHandle {
            area: Arc::clone(self),
            context: ContextId::new(),
        }
    }

    fn notify(&self, key: &str, origin: ContextId) {
        // No subscribers is not an error
        let delivered = self
            .events
            .send(StorageEvent {
                key: key.to_owned(),
                origin,
            })
            .unwrap_or(0);
        trace!(key, %origin, delivered, "Storage change broadcast");
    }
}

/// One context's view of a [`StorageArea`].
///
/// Cloning yields another handle for the same context.
#[derive(Debug, Clone)]
pub struct StorageHandle {
    area: Arc<StorageArea>,
    context: ContextId,
}

impl StorageHandle {
    /// The context this handle writes as.
    #[must_use]
    pub const fn context(&self) -> ContextId {
        self.context
    }

    /// Read a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.area.backend.get_item(key)
    }

    /// Write a key and notify every other context.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written. No notification
    /// is sent in that case.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.area.backend.set_item(key, value)?;
        self.area.notify(key, self.context);
        Ok(())
    }

    /// Remove a key and notify every other context.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.area.backend.remove_item(key)?;
        self.area.notify(key, self.context);
        Ok(())
    }

    /// Register for changes to `key` made by other contexts.
    #[must_use]
    pub fn subscribe(&self, key: &str) -> Subscription {
        debug!(key, context = %self.context, "Subscribing to storage changes");
        Subscription {
            receiver: self.area.events.subscribe(),
            key: key.to_owned(),
            context: self.context,
        }
    }
}

/// Registration for storage-changed events on one key.
///
/// Dropping the subscription unregisters it.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<StorageEvent>,
    key: String,
    context: ContextId,
}

impl Subscription {
    /// Key this subscription watches.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Take the next pending foreign change without waiting.
    ///
    /// Returns `None` when nothing relevant is queued.
    pub fn try_next(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.is_relevant(&event) {
                        return Some(event);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => return Some(self.lagged(skipped)),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next foreign change.
    ///
    /// Returns `None` once the area has been dropped.
    pub async fn next(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if self.is_relevant(&event) {
                        return Some(event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => return Some(self.lagged(skipped)),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Drain every pending foreign change, returning how many there were.
    pub fn drain(&mut self) -> usize {
        std::iter::from_fn(|| self.try_next()).count()
    }

    /// Release the registration.
    pub fn unsubscribe(self) {
        debug!(key = %self.key, context = %self.context, "Unsubscribed from storage changes");
    }

    fn is_relevant(&self, event: &StorageEvent) -> bool {
        event.origin != self.context && event.key == self.key
    }

    /// Missed events may have included changes to our key, so report one.
    fn lagged(&self, skipped: u64) -> StorageEvent {
        debug!(key = %self.key, skipped, "Storage subscription lagged");
        StorageEvent {
            key: self.key.clone(),
            origin: self.context,
        }
    }
}
