//! Integration tests for the storefront cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storefront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_sync` - Several contexts sharing one in-memory storage area
//! - `file_storage` - Contexts in separate storage areas over one directory
//! - `cart_properties` - Generated carts checked against the store's laws
//!
//! This crate only holds shared fixtures.

use std::sync::Arc;

use storefront::persistence::{DEFAULT_CART_KEY, MemoryBackend, StorageArea};
use storefront::CartSession;
use storefront_core::{CartItem, ItemId, Price, Product};

/// A storage area backed by memory, shared by the tabs of one test.
#[must_use]
pub fn memory_area() -> Arc<StorageArea> {
    StorageArea::new(MemoryBackend::new())
}

/// Open and mount a new tab on `area`.
///
/// # Panics
///
/// Panics if hydration fails, which a memory backend never does.
#[must_use]
pub fn open_tab(area: &Arc<StorageArea>) -> CartSession {
    let mut tab = CartSession::new(area.handle(), DEFAULT_CART_KEY);
    tab.mount().expect("memory hydration cannot fail");
    tab
}

/// The mug line used throughout the tests.
#[must_use]
pub fn mug(quantity: u32) -> CartItem {
    CartItem::new(1, "Mug", Price::from_whole(1000), "x.png", quantity)
}

/// The pen line used throughout the tests.
#[must_use]
pub fn pen(quantity: u32) -> CartItem {
    CartItem::new(2, "Pen", Price::from_whole(50), "p.png", quantity)
}

/// A catalog product with limited stock.
#[must_use]
pub fn lamp() -> Product {
    Product {
        id: ItemId::Number(7),
        name: "Lamp".to_string(),
        price: Price::from_whole(12_000),
        images: vec!["lamp-1.png".to_string(), "lamp-2.png".to_string()],
        stock: 3,
        color: Some("Brass".to_string()),
        category: Some("Lighting".to_string()),
        description: Some("Desk lamp".to_string()),
    }
}
