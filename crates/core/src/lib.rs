//! Storefront Core - Shared types library.
//!
//! This crate provides the types shared by every storefront component:
//! - `storefront` - Cart store, persistence bridge and catalog
//! - `storefront-cli` - Command-line front end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! async runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Item ids, prices, cart lines and catalog products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
