//! Per-context cart session.
//!
//! A [`CartSession`] is what a cart-aware view holds: the context's
//! [`CartStore`], the [`PersistenceBridge`] to durable storage and, while
//! mounted, a [`Subscription`] to changes made by other contexts. It is
//! passed around explicitly; there is no global cart.
//!
//! All methods take `&mut self`, so hydration and user operations on one
//! session are serialized.

use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use storefront_core::{CartItem, ItemId, Product};

use crate::cart::{CartError, CartStore};
use crate::persistence::{
    HydrationOutcome, PersistenceBridge, PersistenceError, StorageHandle, Subscription, SyncState,
};

/// One context's cart: store, bridge and change subscription.
#[derive(Debug)]
pub struct CartSession {
    store: CartStore,
    bridge: PersistenceBridge,
    subscription: Option<Subscription>,
}

impl CartSession {
    /// Create an unmounted session with an empty cart.
    #[must_use]
    pub fn new(storage: StorageHandle, key: impl Into<String>) -> Self {
        Self {
            store: CartStore::new(),
            bridge: PersistenceBridge::new(storage, key),
            subscription: None,
        }
    }

    /// Hydrate from durable storage and start listening for external
    /// changes.
    ///
    /// Calling `mount` again re-hydrates and keeps the existing
    /// subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails. The subscription is
    /// still registered in that case.
    #[instrument(skip(self), fields(context = %self.bridge.storage().context()))]
    pub fn mount(&mut self) -> Result<HydrationOutcome, PersistenceError> {
        if self.subscription.is_none() {
            self.subscription = Some(self.bridge.subscribe());
        }
        self.bridge.hydrate(&mut self.store)
    }

    /// Stop listening for external changes. The store keeps its contents.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Whether the session is listening for external changes.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Hydration lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.bridge.state()
    }

    /// The cart.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// The bridge to durable storage.
    #[must_use]
    pub const fn bridge(&self) -> &PersistenceBridge {
        &self.bridge
    }

    /// Cart total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.store.total()
    }

    /// Append a line. Not persisted.
    pub fn add_item(&mut self, item: CartItem) {
        self.store.add_item(item);
    }

    /// Change a line's quantity. Not persisted.
    ///
    /// # Errors
    ///
    /// See [`CartStore::update_quantity`].
    pub fn update_quantity(&mut self, id: &ItemId, quantity: i64) -> Result<(), CartError> {
        self.store.update_quantity(id, quantity)
    }

    /// Remove a line. Not persisted.
    ///
    /// # Errors
    ///
    /// See [`CartStore::remove_item`].
    pub fn remove_item(&mut self, id: &ItemId) -> Result<CartItem, CartError> {
        self.store.remove_item(id)
    }

    /// Empty the cart. Not persisted.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Write the current cart to durable storage, notifying other contexts.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn persist(&self) -> Result<(), PersistenceError> {
        self.bridge.persist(self.store.items())
    }

    /// Apply queued external changes.
    ///
    /// Any number of pending notifications collapse into one re-hydration.
    /// Returns `None` if nothing was pending or the session is unmounted.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn sync_pending(&mut self) -> Result<Option<HydrationOutcome>, PersistenceError> {
        let pending = self.subscription.as_mut().map_or(0, Subscription::drain);
        if pending == 0 {
            return Ok(None);
        }
        debug!(pending, "External cart changes pending");
        self.bridge.hydrate(&mut self.store).map(Some)
    }

    /// Wait for the next external change and re-hydrate.
    ///
    /// Returns `None` when unmounted or when the storage area is gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub async fn next_external_change(
        &mut self,
    ) -> Result<Option<HydrationOutcome>, PersistenceError> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Ok(None);
        };
        if subscription.next().await.is_none() {
            return Ok(None);
        }
        // Collapse a burst of writes into one read
        subscription.drain();
        self.bridge.hydrate(&mut self.store).map(Some)
    }

    /// Add a product to the cart the way the product page does.
    ///
    /// Reads the durable snapshot (absent or malformed reads as empty),
    /// appends a line built from `product` with the quantity clamped to
    /// stock, writes the whole sequence back and adopts it locally. This is
    /// a read-modify-write on shared storage: a concurrent writer in another
    /// context can be overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails or the cart cannot be
    /// serialized.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_product(
        &mut self,
        product: &Product,
        requested_quantity: u32,
    ) -> Result<CartItem, PersistenceError> {
        let item = product.to_cart_item(requested_quantity);
        let mut items = self.bridge.load()?.unwrap_or_default();
        items.push(item.clone());

        self.bridge.persist(&items)?;
        self.store.set_cart(items);

        info!(
            name = %item.name,
            quantity = item.quantity,
            "Added to cart"
        );
        Ok(item)
    }
}

impl Drop for CartSession {
    fn drop(&mut self) {
        self.unmount();
    }
}
