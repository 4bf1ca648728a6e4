//! # Shared Marketplace
//!
//! Thread-safe handle for callers that need one marketplace from several
//! threads.
//!
//! ## Thread Safety
//! Uses `Arc<Mutex<Marketplace>>`: every operation, read or write, runs
//! under one coarse lock. That keeps the product and sale counters
//! linearizable without any per-store locking.
//!
//! ```text
//!   thread A ──┐
//!   thread B ──┼──► Mutex<Marketplace> ──► one operation at a time
//!   thread C ──┘
//! ```

use std::sync::{Arc, Mutex};

use bazaar_core::{MarketError, MarketResult};

use crate::marketplace::Marketplace;

/// Cloneable, lock-protected marketplace handle.
#[derive(Debug, Clone)]
pub struct SharedMarketplace {
    market: Arc<Mutex<Marketplace>>,
}

impl SharedMarketplace {
    pub fn new(market: Marketplace) -> Self {
        SharedMarketplace {
            market: Arc::new(Mutex::new(market)),
        }
    }

    /// Executes a function with read access to the marketplace.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let stores = shared.with_market(|m| m.list_stores())?;
    /// ```
    pub fn with_market<F, R>(&self, f: F) -> MarketResult<R>
    where
        F: FnOnce(&Marketplace) -> R,
    {
        let market = self.market.lock().map_err(|_| poisoned())?;
        Ok(f(&market))
    }

    /// Executes a marketplace operation under the lock.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let sale = shared.with_market_mut(|m| m.purchase(&token, product_id, 1))?;
    /// ```
    pub fn with_market_mut<F, R>(&self, f: F) -> MarketResult<R>
    where
        F: FnOnce(&mut Marketplace) -> MarketResult<R>,
    {
        let mut market = self.market.lock().map_err(|_| poisoned())?;
        f(&mut market)
    }
}

impl From<Marketplace> for SharedMarketplace {
    fn from(market: Marketplace) -> Self {
        SharedMarketplace::new(market)
    }
}

fn poisoned() -> MarketError {
    MarketError::Internal("Marketplace mutex poisoned".to_string())
}
