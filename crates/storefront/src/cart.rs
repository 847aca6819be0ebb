//! In-memory cart store.
//!
//! The store owns the canonical cart for one context. Every operation here
//! is a pure in-memory mutation: nothing in this module reads or writes the
//! durable slot. Callers persist explicitly through
//! [`PersistenceBridge::persist`](crate::persistence::PersistenceBridge::persist).
//!
//! # Duplicate ids
//!
//! [`CartStore::add_item`] appends without merging, so two lines can share
//! an id. [`CartStore::update_quantity`] and [`CartStore::remove_item`] act
//! on the first matching line in insertion order.

use rust_decimal::Decimal;
use thiserror::Error;

use storefront_core::{CartItem, ItemId};

/// Rejected cart operations.
///
/// Both variants leave the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity below one.
    #[error("invalid quantity {requested}: must be at least 1")]
    InvalidQuantity { requested: i64 },

    /// No line with this id.
    #[error("item not found in cart: {id}")]
    ItemNotFound { id: ItemId },
}

/// Ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    items: Vec<CartItem>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Replace every line.
    ///
    /// Used by hydration. No validation is performed and nothing is
    /// written back to storage.
    pub fn set_cart(&mut self, items: Vec<CartItem>) {
        self.items = items;
    }

    /// Append a line as supplied. Existing lines with the same id are left
    /// alone.
    pub fn add_item(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Set the quantity of the first line with this id.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity < 1`
    /// - [`CartError::ItemNotFound`] if no line has this id
    pub fn update_quantity(&mut self, id: &ItemId, quantity: i64) -> Result<(), CartError> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(CartError::InvalidQuantity {
                requested: quantity,
            })?;

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == *id)
            .ok_or_else(|| CartError::ItemNotFound { id: id.clone() })?;

        item.quantity = quantity;
        Ok(())
    }

    /// Remove the first line with this id and return it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has this id.
    pub fn remove_item(&mut self, id: &ItemId) -> Result<CartItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == *id)
            .ok_or_else(|| CartError::ItemNotFound { id: id.clone() })?;

        Ok(self.items.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the store, returning its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<CartItem>> for CartStore {
    fn from(items: Vec<CartItem>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::Price;

    use super::*;

    fn mug(quantity: u32) -> CartItem {
        CartItem::new(1, "Mug", Price::from_whole(1000), "x.png", quantity)
    }

    fn pen(quantity: u32) -> CartItem {
        CartItem::new(2, "Pen", Price::from_whole(50), "p.png", quantity)
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = CartStore::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_mug_scenario() {
        let mut cart = CartStore::new();
        cart.add_item(mug(2));
        assert_eq!(cart.total(), Decimal::from(2000));

        let err = cart.update_quantity(&ItemId::Number(1), 0).unwrap_err();
        assert_eq!(err, CartError::InvalidQuantity { requested: 0 });
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total(), Decimal::from(2000));

        cart.remove_item(&ItemId::Number(1)).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_total_counts_duplicate_lines() {
        let mut cart = CartStore::new();
        cart.add_item(mug(1));
        cart.add_item(pen(3));
        cart.add_item(mug(2));

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total(), Decimal::from(1000 + 150 + 2000));
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_total_with_fractional_prices() {
        let mut cart = CartStore::new();
        let price = Price::new(Decimal::new(1999, 2)).unwrap();
        cart.add_item(CartItem::new("tea", "Tea", price, "t.png", 3));
        assert_eq!(cart.total(), Decimal::new(5997, 2));
    }

    #[test]
    fn test_negative_quantity_rejected_everywhere() {
        let mut cart = CartStore::from(vec![mug(2), pen(3)]);
        let before = cart.clone();

        for id in [ItemId::Number(1), ItemId::Number(2), ItemId::Number(99)] {
            assert!(matches!(
                cart.update_quantity(&id, -4),
                Err(CartError::InvalidQuantity { requested: -4 })
            ));
        }
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = CartStore::from(vec![mug(2), pen(3)]);
        cart.update_quantity(&ItemId::Number(2), 7).unwrap();
        assert_eq!(cart.items()[1].quantity, 7);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_update_quantity_overflowing_u32_is_rejected() {
        let mut cart = CartStore::from(vec![mug(2)]);
        let huge = i64::from(u32::MAX) + 1;
        assert!(matches!(
            cart.update_quantity(&ItemId::Number(1), huge),
            Err(CartError::InvalidQuantity { .. })
        ));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_update_quantity_missing_item() {
        let mut cart = CartStore::from(vec![mug(2)]);
        let err = cart.update_quantity(&ItemId::Number(5), 3).unwrap_err();
        assert_eq!(
            err,
            CartError::ItemNotFound {
                id: ItemId::Number(5)
            }
        );
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_remove_missing_item_keeps_order() {
        let mut cart = CartStore::from(vec![mug(2), pen(3), mug(1)]);
        let before = cart.items().to_vec();

        assert!(cart.remove_item(&ItemId::from("nope")).is_err());
        assert_eq!(cart.items(), before.as_slice());
    }

    #[test]
    fn test_duplicate_ids_update_first_match() {
        let mut cart = CartStore::from(vec![mug(1), pen(3), mug(4)]);
        cart.update_quantity(&ItemId::Number(1), 9).unwrap();

        assert_eq!(cart.items()[0].quantity, 9);
        assert_eq!(cart.items()[2].quantity, 4);
    }

    #[test]
    fn test_duplicate_ids_remove_first_match() {
        let mut cart = CartStore::from(vec![mug(1), pen(3), mug(4)]);
        let removed = cart.remove_item(&ItemId::Number(1)).unwrap();

        assert_eq!(removed.quantity, 1);
        assert_eq!(cart.items(), &[pen(3), mug(4)]);
    }

    #[test]
    fn test_numeric_and_text_ids_are_distinct() {
        let mut cart = CartStore::from(vec![mug(1)]);
        assert!(cart.remove_item(&ItemId::from("1")).is_err());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_set_cart_replaces_everything() {
        let mut cart = CartStore::from(vec![mug(1)]);
        cart.set_cart(vec![pen(3)]);
        assert_eq!(cart.items(), &[pen(3)]);
        assert_eq!(cart.total(), Decimal::from(150));
    }

    #[test]
    fn test_clear() {
        let mut cart = CartStore::from(vec![mug(1), pen(2)]);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
