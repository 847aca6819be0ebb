//! Persistence bridge between a [`CartStore`] and durable storage.
//!
//! # Architecture
//!
//! - The durable slot (key `cart` by default) holds a JSON array of
//!   [`CartItem`]s. It is the source of truth read at hydration.
//! - [`PersistenceBridge::hydrate`] reads the slot and replaces the store
//!   through [`CartStore::set_cart`]. A missing or empty slot leaves the
//!   store as it was. A malformed slot is erased, and the store is also
//!   left as it was.
//! - [`PersistenceBridge::persist`] writes the full item sequence. Store
//!   operations never call it; callers decide when to persist.
//! - Writes notify every other context sharing the [`StorageArea`]. Those
//!   contexts re-hydrate; the writer does not hear its own change.
//!
//! Across contexts the last write wins. A read-modify-write is not atomic,
//! so concurrent writers can lose each other's updates.

mod area;
mod storage;

pub use area::{StorageArea, StorageEvent, StorageHandle, Subscription};
pub use storage::{FileBackend, MemoryBackend, StorageBackend, StorageError};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use storefront_core::CartItem;

use crate::cart::CartStore;

/// Default durable slot key.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Errors from the persistence bridge.
///
/// Malformed slot content is not an error: it is recovered locally and
/// reported as [`HydrationOutcome::Discarded`].
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart could not be serialized.
    #[error("failed to encode cart: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Hydration lifecycle of one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Never hydrated.
    #[default]
    Uninitialized,
    /// Reading the durable slot.
    Hydrating,
    /// Steady state; store operations apply directly.
    Ready,
}

/// Result of one hydration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationOutcome {
    /// Slot was empty; store untouched.
    Absent,
    /// Store replaced with this many lines.
    Restored { items: usize },
    /// Slot held malformed data and was erased; store untouched.
    Discarded { reason: String },
}

/// Serialize cart lines into the durable slot format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_items(items: &[CartItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Parse the durable slot format.
///
/// # Errors
///
/// Returns an error if `raw` is not a JSON array of cart lines.
pub fn decode_items(raw: &str) -> Result<Vec<CartItem>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Keeps one context's [`CartStore`] consistent with the durable slot.
#[derive(Debug, Clone)]
pub struct PersistenceBridge {
    storage: StorageHandle,
    key: String,
    state: SyncState,
}

impl PersistenceBridge {
    /// Create a bridge for `key` on the given storage handle.
    #[must_use]
    pub fn new(storage: StorageHandle, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            state: SyncState::Uninitialized,
        }
    }

    /// Durable slot key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Storage handle this bridge writes through.
    #[must_use]
    pub const fn storage(&self) -> &StorageHandle {
        &self.storage
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Read the slot, erasing it if malformed.
    ///
    /// Returns `Ok(None)` when the slot is absent or was just erased.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend fails.
    pub fn load(&self) -> Result<Option<Vec<CartItem>>, PersistenceError> {
        Ok(match self.read()? {
            Snapshot::Absent | Snapshot::Malformed(_) => None,
            Snapshot::Items(items) => Some(items),
        })
    }

    /// Replace the store's contents with the durable snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend fails. Malformed slot
    /// content is erased and reported as [`HydrationOutcome::Discarded`].
    #[instrument(skip(self, store), fields(key = %self.key))]
    pub fn hydrate(&mut self, store: &mut CartStore) -> Result<HydrationOutcome, PersistenceError> {
        self.state = SyncState::Hydrating;
        let snapshot = self.read();
        // A failed read still leaves the store usable
        self.state = SyncState::Ready;

        let outcome = match snapshot? {
            Snapshot::Absent => HydrationOutcome::Absent,
            Snapshot::Items(items) => {
                let count = items.len();
                store.set_cart(items);
                HydrationOutcome::Restored { items: count }
            }
            Snapshot::Malformed(reason) => HydrationOutcome::Discarded { reason },
        };

        debug!(?outcome, "Hydrated cart");
        Ok(outcome)
    }

    /// Write the full item sequence to the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    #[instrument(skip(self, items), fields(key = %self.key, count = items.len()))]
    pub fn persist(&self, items: &[CartItem]) -> Result<(), PersistenceError> {
        let raw = encode_items(items).map_err(PersistenceError::Encode)?;
        self.storage.set_item(&self.key, &raw)?;
        debug!("Persisted cart");
        Ok(())
    }

    /// Erase the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn erase(&self) -> Result<(), PersistenceError> {
        self.storage.remove_item(&self.key)?;
        Ok(())
    }

    /// Register for changes to the slot made by other contexts.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        self.storage.subscribe(&self.key)
    }

    fn read(&self) -> Result<Snapshot, PersistenceError> {
        // An empty slot counts as never written
        let Some(raw) = self
            .storage
            .get_item(&self.key)?
            .filter(|raw| !raw.is_empty())
        else {
            return Ok(Snapshot::Absent);
        };

        match decode_items(&raw) {
            Ok(items) => Ok(Snapshot::Items(items)),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding malformed cart snapshot");
                self.storage.remove_item(&self.key)?;
                Ok(Snapshot::Malformed(e.to_string()))
            }
        }
    }
}

/// Parsed slot content.
enum Snapshot {
    Absent,
    Items(Vec<CartItem>),
    Malformed(String),
}
