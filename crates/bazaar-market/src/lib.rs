//! # bazaar-market
//!
//! In-memory marketplace: users, stores, products, stock, search and a
//! sale ledger, behind a single facade.
//!
//! ## Modules
//! - [`marketplace`] - The `Marketplace` facade
//! - [`credentials`] - Password hashing and token generation collaborators
//! - [`config`] - Environment-driven `MarketConfig`
//! - [`shared`] - `SharedMarketplace`, a coarse-lock handle for threads
//!
//! ## Example
//! ```rust
//! use bazaar_market::{MarketConfig, Marketplace};
//!
//! let config = MarketConfig { hash_memory_kib: 64, hash_iterations: 1, ..MarketConfig::default() };
//! let mut market = Marketplace::new(config).unwrap();
//!
//! market.register("João", "joao@x.com", "123456").unwrap();
//! let token = market.login("joao@x.com", "123456").unwrap();
//! let bodega = market.create_store(&token, "Bodega").unwrap();
//! let leite = market.add_product(&token, bodega, "Leite", "8.40".parse().unwrap()).unwrap();
//! assert_eq!(market.add_stock(&token, bodega, leite, 10).unwrap(), 10);
//! ```

pub mod config;
pub mod credentials;
pub mod marketplace;
pub mod shared;

pub use config::{ConfigError, MarketConfig};
pub use credentials::{AlphanumericTokens, Argon2Hasher, CredentialHasher, TokenGenerator};
pub use marketplace::Marketplace;
pub use shared::SharedMarketplace;
