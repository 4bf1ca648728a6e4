//! # Money Module
//!
//! Provides the `Money` type for unit prices and sale totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  As f32:  8.40 is stored as 8.3999996185302734375                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "8.40" parses to 840 cents, and the sale ledger records 840         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let leite = Money::from_cents(840);
//! let parsed: Money = "8.40".parse().unwrap();
//! assert_eq!(leite, parsed);
//!
//! let total = leite.checked_mul_quantity(3).unwrap();
//! assert_eq!(total.to_string(), "25.20");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed; prices themselves are validated to be non-negative before they
/// enter a store. Arithmetic is checked and yields `None` on overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(5840).cents(), 5840);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let picanha = Money::from_cents(5840);
    /// assert_eq!(picanha.checked_mul_quantity(2).map(|m| m.cents()), Some(11680));
    /// assert_eq!(picanha.checked_mul_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal amounts such as `"8.40"`, `"8.4"`, `"12"` or `"-3.05"`.
///
/// More than two fractional digits is rejected rather than rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (major_str, minor_str) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits before the decimal point"));
        }
        if minor_str.len() > 2 || !minor_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected at most two decimal digits"));
        }

        let major: i64 = major_str
            .parse()
            .map_err(|_| invalid("amount is too large"))?;
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid("bad cents"))? * 10,
            _ => minor_str.parse().map_err(|_| invalid("bad cents"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering, no currency symbol: `8.40`, `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
