//! Unified error handling.
//!
//! Provides an `AppError` type for front ends that drive the cart. Library
//! modules keep their own error enums; this type only aggregates them.

use std::sync::Arc;

use thiserror::Error;

use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persistence::{PersistenceError, StorageError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] Arc<CatalogError>),

    /// Durable storage failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// A cart operation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::Persistence(PersistenceError::Storage(err))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use storefront_core::ItemId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::from(CartError::InvalidQuantity { requested: 0 });
        assert_eq!(
            err.to_string(),
            "Cart error: invalid quantity 0: must be at least 1"
        );

        let err = AppError::from(CartError::ItemNotFound {
            id: ItemId::Number(4),
        });
        assert_eq!(err.to_string(), "Cart error: item not found in cart: 4");
    }

    #[test]
    fn test_storage_error_wraps_as_persistence() {
        let err = AppError::from(StorageError::InvalidKey("../x".to_string()));
        assert!(matches!(
            err,
            AppError::Persistence(PersistenceError::Storage(_))
        ));
    }
}
