//! Storefront cart library.
//!
//! This crate provides the client-side cart core as a library, allowing it
//! to be driven by any presentation layer and tested without one.
//!
//! # Architecture
//!
//! - [`cart`] - In-memory cart store. Pure mutations, never touches storage.
//! - [`persistence`] - Durable slot codec, storage backends, storage-changed
//!   notifications and the hydration bridge.
//! - [`session`] - Per-context owner tying a store to a bridge.
//! - [`catalog`] - Read-only product list from a static JSON file.
//! - [`config`] - Environment configuration.
//! - [`error`] - Application-level error type.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod persistence;
pub mod session;

pub use cart::{CartError, CartStore};
pub use catalog::{Catalog, CatalogError};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{AppError, Result};
pub use persistence::{
    FileBackend, HydrationOutcome, MemoryBackend, PersistenceBridge, PersistenceError,
    StorageArea, StorageBackend, StorageError, StorageEvent, StorageHandle, Subscription,
    SyncState,
};
pub use session::CartSession;
