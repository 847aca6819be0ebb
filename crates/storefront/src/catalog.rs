//! Static product catalog.
//!
//! The catalog is a JSON array of [`Product`] records read from disk. It is
//! loaded lazily and cached with `moka`, so repeated lookups within the TTL
//! do not touch the filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use storefront_core::Product;

/// Default time a loaded catalog stays cached.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(300);

const CACHE_KEY: &str = "products";

/// Errors that can occur when loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not a JSON array of products.
    #[error("failed to parse catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only product catalog.
///
/// Cheaply cloneable; clones share the cache.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    path: PathBuf,
    cache: Cache<String, Arc<[Product]>>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("path", &self.inner.path)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Create a catalog backed by the JSON file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Self {
            inner: Arc::new(CatalogInner {
                path: path.into(),
                cache,
            }),
        }
    }

    /// Path of the catalog file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// All products, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. Failures are
    /// not cached.
    pub async fn products(&self) -> Result<Arc<[Product]>, Arc<CatalogError>> {
        let path = self.inner.path.clone();
        self.inner
            .cache
            .try_get_with(CACHE_KEY.to_string(), load(path))
            .await
    }

    /// Find a product by the string form of its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    #[instrument(skip(self))]
    pub async fn find(&self, id: &str) -> Result<Option<Product>, Arc<CatalogError>> {
        let products = self.products().await?;
        let found = products.iter().find(|p| p.id.matches_str(id)).cloned();
        debug!(found = found.is_some(), "Catalog lookup");
        Ok(found)
    }

    /// Drop the cached catalog so the next call re-reads the file.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(CACHE_KEY).await;
    }
}

async fn load(path: PathBuf) -> Result<Arc<[Product]>, CatalogError> {
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;

    let products: Vec<Product> =
        serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.clone(),
            source,
        })?;

    debug!(path = %path.display(), count = products.len(), "Loaded catalog");
    Ok(products.into())
}
