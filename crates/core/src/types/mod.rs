//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::CartItem;
pub use id::{ContextId, ItemId};
pub use price::{CurrencyCode, Price, PriceError};
pub use product::Product;
