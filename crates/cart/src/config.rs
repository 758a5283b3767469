//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `COFFEE_STORAGE_DIR` - Directory holding cart snapshots (default: .coffee-delivery)
//! - `COFFEE_CART_KEY` - Snapshot key (default: @ignite-coffee-delivery:products-state-1.0.0)
//! - `COFFEE_DELIVERY_FEE` - Flat delivery fee added at checkout (default: 3.50)
//! - `COFFEE_CURRENCY` - ISO 4217 code for totals (default: BRL)
//! - `VIACEP_BASE_URL` - Postal code lookup endpoint (default: <https://viacep.com.br/ws>)
//! - `VIACEP_TIMEOUT_SECS` - Lookup request timeout (default: 10)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use coffee_delivery_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use crate::persistence::DEFAULT_CART_KEY;

const DEFAULT_STORAGE_DIR: &str = ".coffee-delivery";
const DEFAULT_DELIVERY_FEE: &str = "3.50";
const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";
const DEFAULT_VIACEP_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart and checkout configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory for the file-backed snapshot store
    pub storage_dir: PathBuf,
    /// Key the cart snapshot is stored under
    pub cart_key: String,
    /// Checkout pricing
    pub checkout: CheckoutConfig,
    /// Postal code lookup service
    pub postal_lookup: PostalLookupConfig,
}

/// Checkout pricing configuration.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutConfig {
    /// Flat fee added to every order
    pub delivery_fee: Decimal,
    /// Currency of all totals
    pub currency: CurrencyCode,
}

/// Postal code lookup configuration.
#[derive(Debug, Clone)]
pub struct PostalLookupConfig {
    /// Base URL; requests go to `{base_url}/{cep}/json/`
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::new(350, 2),
            currency: CurrencyCode::BRL,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let storage_dir = PathBuf::from(env.or_default("COFFEE_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let cart_key = env.or_default("COFFEE_CART_KEY", DEFAULT_CART_KEY);

        let delivery_fee: Decimal = env.parse("COFFEE_DELIVERY_FEE", DEFAULT_DELIVERY_FEE)?;
        let delivery_fee = Price::validate_amount(delivery_fee).map_err(|e| {
            ConfigError::InvalidEnvVar("COFFEE_DELIVERY_FEE".to_string(), e.to_string())
        })?;
        let currency: CurrencyCode = env.parse("COFFEE_CURRENCY", CurrencyCode::BRL.code())?;

        let base_url: Url = env.parse("VIACEP_BASE_URL", DEFAULT_VIACEP_BASE_URL)?;
        let timeout_secs: u64 = env.parse("VIACEP_TIMEOUT_SECS", DEFAULT_VIACEP_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VIACEP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            storage_dir,
            cart_key,
            checkout: CheckoutConfig {
                delivery_fee,
                currency,
            },
            postal_lookup: PostalLookupConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}
