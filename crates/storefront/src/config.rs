//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_DATA_DIR` - Directory holding the durable storage slots (default: .storefront)
//! - `STOREFRONT_CATALOG_PATH` - Product catalog JSON file (default: public/Products/products.json)
//! - `STOREFRONT_CART_KEY` - Storage key of the cart slot (default: cart)
//! - `STOREFRONT_CURRENCY` - Display currency code (default: NGN)
//! - `STOREFRONT_CATALOG_TTL_SECS` - Catalog cache lifetime in seconds (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use storefront_core::CurrencyCode;

use crate::catalog::DEFAULT_CATALOG_TTL;
use crate::persistence::DEFAULT_CART_KEY;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory for the file storage backend
    pub data_dir: PathBuf,
    /// Product catalog file
    pub catalog_path: PathBuf,
    /// Durable slot key for the cart
    pub cart_key: String,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// How long a loaded catalog is cached
    pub catalog_ttl: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".storefront"),
            catalog_path: PathBuf::from("public/Products/products.json"),
            cart_key: DEFAULT_CART_KEY.to_string(),
            currency: CurrencyCode::default(),
            catalog_ttl: DEFAULT_CATALOG_TTL,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an explicit variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cart_key = lookup("STOREFRONT_CART_KEY").unwrap_or(defaults.cart_key);
        if cart_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let currency = match lookup("STOREFRONT_CURRENCY") {
            Some(value) => value
                .parse::<CurrencyCode>()
                .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_CURRENCY".to_string(), e))?,
            None => defaults.currency,
        };

        let catalog_ttl = match lookup("STOREFRONT_CATALOG_TTL_SECS") {
            Some(value) => value.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_CATALOG_TTL_SECS".to_string(), e.to_string())
            })?,
            None => defaults.catalog_ttl,
        };

        Ok(Self {
            data_dir: lookup("STOREFRONT_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            catalog_path: lookup("STOREFRONT_CATALOG_PATH")
                .map_or(defaults.catalog_path, PathBuf::from),
            cart_key,
            currency,
            catalog_ttl,
        })
    }
}
