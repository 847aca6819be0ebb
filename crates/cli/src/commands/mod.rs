//! CLI command implementations.
//!
//! Every invocation is its own storage context: it opens the file storage
//! area, mounts a fresh [`CartSession`] (hydrating from disk), applies one
//! command and persists explicitly.

pub mod cart;
pub mod products;
pub mod watch;

use storefront::persistence::{FileBackend, StorageArea};
use storefront::{CartSession, Catalog, StorefrontConfig};
use tracing::debug;

/// Everything a command needs.
pub struct Context {
    pub config: StorefrontConfig,
    pub catalog: Catalog,
    pub session: CartSession,
}

impl Context {
    /// Load configuration, open storage and mount the cart session.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or storage cannot be
    /// opened or read.
    pub fn load() -> storefront::Result<Self> {
        let config = StorefrontConfig::from_env()?;
        debug!(?config, "Loaded configuration");

        let backend = FileBackend::open(&config.data_dir)?;
        let area = StorageArea::new(backend);
        let mut session = CartSession::new(area.handle(), config.cart_key.clone());
        let outcome = session.mount()?;
        debug!(?outcome, "Mounted cart session");

        let catalog = Catalog::new(&config.catalog_path, config.catalog_ttl);

        Ok(Self {
            config,
            catalog,
            session,
        })
    }
}
