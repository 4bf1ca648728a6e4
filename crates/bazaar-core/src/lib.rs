//! # bazaar-core: Pure Domain Model for Bazaar
//!
//! This crate holds the entities, money type, validators and error taxonomy
//! shared by the marketplace facade. Nothing here touches randomness,
//! hashing or logging.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 bazaar-market (Marketplace facade)              │   │
//! │  │   register, login, create_store, add_product, purchase, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │  Store    │  │   Money   │  │MarketError│  │   rules   │  │   │
//! │  │   │  Sale     │  │           │  │ ErrorKind │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO RANDOMNESS • PURE FUNCTIONS                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (User, Store, Product, Sale, AccessToken) and id newtypes
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let price: Money = "8.40".parse().unwrap();
//! assert_eq!(price.cents(), 840);
//! assert_eq!(price.checked_mul_quantity(2).unwrap().to_string(), "16.80");
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{ErrorKind, MarketError, MarketResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Length of freshly issued access tokens unless configured otherwise.
pub const DEFAULT_TOKEN_LENGTH: usize = 20;

/// Maximum length of product and store names.
pub const MAX_NAME_LENGTH: usize = 200;
