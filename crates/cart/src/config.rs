//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARTWHEEL_INVENTORY_URL` - Base URL of the inventory service
//!
//! ## Optional
//! - `CARTWHEEL_STORAGE_KEY` - Blob-store key for the cart (default: `@cartwheel:cart`)
//! - `CARTWHEEL_STORAGE_DIR` - Directory for the file-backed blob store; when
//!   absent the embedding application picks the backend (e.g., in-memory)
//! - `CARTWHEEL_HTTP_TIMEOUT_SECS` - Inventory request timeout (default: 10)
//! - `CARTWHEEL_CURRENCY` - ISO 4217 code attached to catalog prices (default: USD)

use std::path::PathBuf;
use std::time::Duration;

use cartwheel_core::CurrencyCode;
use thiserror::Error;
use url::Url;

/// Default blob-store key holding the serialized cart.
pub const DEFAULT_STORAGE_KEY: &str = "@cartwheel:cart";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Inventory service configuration.
    pub inventory: InventoryConfig,
    /// Blob-store key under which the cart is persisted.
    pub storage_key: String,
    /// Directory for the file-backed blob store, if configured.
    pub storage_dir: Option<PathBuf>,
}

/// Inventory service configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL of the inventory service (e.g., <http://localhost:3333>).
    pub base_url: Url,
    /// Request timeout for stock and catalog lookups.
    pub timeout: Duration,
    /// Currency attached to catalog prices.
    pub currency: CurrencyCode,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let inventory = InventoryConfig::from_env()?;
        let storage_key = get_env_or_default("CARTWHEEL_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        let storage_dir = get_optional_env("CARTWHEEL_STORAGE_DIR").map(PathBuf::from);

        Ok(Self {
            inventory,
            storage_key,
            storage_dir,
        })
    }
}

impl InventoryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_url(
            "CARTWHEEL_INVENTORY_URL",
            &get_required_env("CARTWHEEL_INVENTORY_URL")?,
        )?;
        let timeout = parse_timeout_secs(
            "CARTWHEEL_HTTP_TIMEOUT_SECS",
            &get_env_or_default(
                "CARTWHEEL_HTTP_TIMEOUT_SECS",
                &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
            ),
        )?;
        let currency = parse_currency(
            "CARTWHEEL_CURRENCY",
            &get_env_or_default("CARTWHEEL_CURRENCY", CurrencyCode::default().code()),
        )?;

        Ok(Self {
            base_url,
            timeout,
            currency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    value
        .parse::<Url>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}

fn parse_timeout_secs(var_name: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}

fn parse_currency(var_name: &str, value: &str) -> Result<CurrencyCode, ConfigError> {
    value
        .parse::<CurrencyCode>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}
