//! Marketplace configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable | Default |
//! |---|---|
//! | `BAZAAR_TOKEN_LENGTH` | 20 |
//! | `BAZAAR_ENFORCE_STORE_OWNERSHIP` | true |
//! | `BAZAAR_UNIQUE_STORE_NAMES` | true |
//! | `BAZAAR_DECREMENT_STOCK_ON_PURCHASE` | false |
//! | `BAZAAR_HASH_MEMORY_KIB` | 19456 |
//! | `BAZAAR_HASH_ITERATIONS` | 2 |

use std::env;
use std::str::FromStr;

use bazaar_core::DEFAULT_TOKEN_LENGTH;
use serde::{Deserialize, Serialize};

/// Shortest token length accepted from configuration.
pub const MIN_TOKEN_LENGTH: usize = 8;

/// Longest token length accepted from configuration.
pub const MAX_TOKEN_LENGTH: usize = 128;

/// Marketplace configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Length of issued access tokens
    pub token_length: usize,

    /// Reject product/stock/transfer operations on stores the caller does not own
    pub enforce_store_ownership: bool,

    /// Reject a store whose name is already taken
    pub unique_store_names: bool,

    /// Purchases consume stock and fail when stock is short
    pub decrement_stock_on_purchase: bool,

    /// Argon2 memory cost in KiB
    pub hash_memory_kib: u32,

    /// Argon2 iteration count
    pub hash_iterations: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            token_length: DEFAULT_TOKEN_LENGTH,
            enforce_store_ownership: true,
            unique_store_names: true,
            decrement_stock_on_purchase: false,
            hash_memory_kib: argon2::Params::DEFAULT_M_COST,
            hash_iterations: argon2::Params::DEFAULT_T_COST,
        }
    }
}

impl MarketConfig {
    /// Legacy rules: no ownership or name-uniqueness checks, purchases
    /// never touch stock.
    pub fn compat() -> Self {
        MarketConfig {
            enforce_store_ownership: false,
            unique_store_names: false,
            decrement_stock_on_purchase: false,
            ..MarketConfig::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = MarketConfig::default();

        let config = MarketConfig {
            token_length: parse_or(&lookup, "BAZAAR_TOKEN_LENGTH", defaults.token_length)?,
            enforce_store_ownership: parse_or(
                &lookup,
                "BAZAAR_ENFORCE_STORE_OWNERSHIP",
                defaults.enforce_store_ownership,
            )?,
            unique_store_names: parse_or(
                &lookup,
                "BAZAAR_UNIQUE_STORE_NAMES",
                defaults.unique_store_names,
            )?,
            decrement_stock_on_purchase: parse_or(
                &lookup,
                "BAZAAR_DECREMENT_STOCK_ON_PURCHASE",
                defaults.decrement_stock_on_purchase,
            )?,
            hash_memory_kib: parse_or(&lookup, "BAZAAR_HASH_MEMORY_KIB", defaults.hash_memory_kib)?,
            hash_iterations: parse_or(&lookup, "BAZAAR_HASH_ITERATIONS", defaults.hash_iterations)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that parsing alone cannot catch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).contains(&self.token_length) {
            return Err(ConfigError::OutOfRange {
                key: "BAZAAR_TOKEN_LENGTH",
                min: MIN_TOKEN_LENGTH as u64,
                max: MAX_TOKEN_LENGTH as u64,
            });
        }

        if self.hash_iterations == 0 {
            return Err(ConfigError::OutOfRange {
                key: "BAZAAR_HASH_ITERATIONS",
                min: 1,
                max: u32::MAX as u64,
            });
        }

        if self.hash_memory_kib < argon2::Params::MIN_M_COST {
            return Err(ConfigError::OutOfRange {
                key: "BAZAAR_HASH_MEMORY_KIB",
                min: argon2::Params::MIN_M_COST as u64,
                max: u32::MAX as u64,
            });
        }

        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{key} must be between {min} and {max}")]
    OutOfRange { key: &'static str, min: u64, max: u64 },
}
