//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazaar-core errors (this file)                                        │
//! │  ├── MarketError      - Every failure a marketplace operation reports  │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorKind        - Coarse category of a MarketError               │
//! │                                                                         │
//! │  bazaar-market errors (separate crate)                                 │
//! │  └── ConfigError      - Invalid environment configuration              │
//! │                                                                         │
//! │  Flow: ValidationError → MarketError::InvalidArgument → caller         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is an ordinary outcome the caller must match on. There is
//! no fatal/recoverable split apart from `Internal`.

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a [`MarketError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    AlreadyExists,
    InvalidArgument,
    Internal,
}

// =============================================================================
// Market Error
// =============================================================================

/// Errors returned by marketplace operations.
#[derive(Debug, Error)]
pub enum MarketError {
    /// The access token (or the email/password pair) did not identify a user.
    ///
    /// ## When This Occurs
    /// - Token was never issued or has been revoked
    /// - Login with an unknown email
    /// - Login with a wrong password
    ///
    /// Login deliberately returns the same variant for unknown email and
    /// wrong password.
    #[error("Invalid credentials or access token")]
    Unauthorized,

    /// The caller is authenticated but does not own the store.
    #[error("User {user_id} does not own store {store_id}")]
    Forbidden { user_id: u64, store_id: u64 },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness rule was violated.
    #[error("{field} '{value}' already exists")]
    AlreadyExists { field: &'static str, value: String },

    /// Stock cannot cover a purchase.
    ///
    /// Only raised when stock decrement on purchase is enabled.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: u64,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// A collaborator failed (hashing backend, poisoned lock).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    /// Shorthand for a [`MarketError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        MarketError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Collapses the error into its [`ErrorKind`].
    ///
    /// `Forbidden` counts as `Unauthorized` and `InsufficientStock` as
    /// `InvalidArgument`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::Unauthorized | MarketError::Forbidden { .. } => ErrorKind::Unauthorized,
            MarketError::NotFound { .. } => ErrorKind::NotFound,
            MarketError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            MarketError::InsufficientStock { .. } | MarketError::InvalidArgument(_) => {
                ErrorKind::InvalidArgument
            }
            MarketError::Internal(_) => ErrorKind::Internal,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. email without '@', unparsable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Transfer source and destination are the same store.
    #[error("source and destination store must differ (both {store_id})")]
    SameStore { store_id: u64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with MarketError.
pub type MarketResult<T> = Result<T, MarketError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MarketError::InsufficientStock {
            product_id: 4,
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 4: available 3, requested 5"
        );

        let err = MarketError::not_found("Store", 7);
        assert_eq!(err.to_string(), "Store not found: 7");
    }

    #[test]
    fn test_validation_converts_to_market_error() {
        let validation_err = ValidationError::Required {
            field: "email".to_string(),
        };
        let err: MarketError = validation_err.into();
        assert!(matches!(err, MarketError::InvalidArgument(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_kind_collapses_variants() {
        assert_eq!(MarketError::Unauthorized.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            MarketError::Forbidden {
                user_id: 2,
                store_id: 1
            }
            .kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            MarketError::AlreadyExists {
                field: "email",
                value: "a@b.c".to_string()
            }
            .kind(),
            ErrorKind::AlreadyExists
        );
        assert_eq!(
            MarketError::InsufficientStock {
                product_id: 0,
                available: 0,
                requested: 1
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            MarketError::Internal("boom".to_string()).kind(),
            ErrorKind::Internal
        );
    }
}
