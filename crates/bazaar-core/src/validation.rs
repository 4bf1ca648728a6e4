//! # Validation Module
//!
//! Input checks run by the marketplace before it touches any state.
//!
//! ## Usage
//! ```rust
//! use bazaar_core::validation::{validate_email, validate_purchase_quantity};
//!
//! assert!(validate_email("joao@x.com").is_ok());
//! assert!(validate_purchase_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::StoreId;
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest address accepted by `validate_email` (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must contain exactly one '@' with text on both sides
/// - At most 254 characters
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
        });
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected local@domain".to_string(),
        }),
    }
}

/// Validates a user's display name.
pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a store name.
pub fn validate_store_name(name: &str) -> ValidationResult<()> {
    validate_name("store name", name)
}

/// Validates a product name.
///
/// ```rust
/// use bazaar_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Picanha Maturada").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("product name", name)
}

/// Validates a plaintext password. Only emptiness is checked.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the quantity of a purchase (must be > 0).
pub fn validate_purchase_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates the store pair of a transfer.
pub fn validate_transfer(src: StoreId, dst: StoreId) -> ValidationResult<()> {
    if src == dst {
        return Err(ValidationError::SameStore { store_id: src.get() });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("joao@x.com").is_ok());
        assert!(validate_email("maria@gmail.com").is_ok());

        assert!(matches!(
            validate_email(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_email("joao").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("joao@").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email(&format!("{}@x.com", "a".repeat(300))).is_err());
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_display_name("João").is_ok());
        assert!(validate_store_name("Bodega").is_ok());
        assert!(validate_product_name("Coca cola 250ml").is_ok());

        assert!(validate_store_name("").is_err());
        assert!(validate_product_name("  ").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
        // counted in characters, not bytes
        assert!(validate_product_name(&"ã".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(840)).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_purchase_quantity() {
        assert!(validate_purchase_quantity(1).is_ok());
        assert!(validate_purchase_quantity(0).is_err());
        assert!(validate_purchase_quantity(-2).is_err());
    }

    #[test]
    fn test_validate_transfer() {
        assert!(validate_transfer(StoreId::new(1), StoreId::new(2)).is_ok());
        assert_eq!(
            validate_transfer(StoreId::new(3), StoreId::new(3)),
            Err(ValidationError::SameStore { store_id: 3 })
        );
    }
}
