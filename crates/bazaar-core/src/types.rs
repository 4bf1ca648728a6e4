//! # Domain Types
//!
//! Entities held by the marketplace.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │      Store      │   │     Product     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (1, 2, ..)  │   │  id (1, 2, ..)  │   │  id (0, 1, ..)  │       │
//! │  │  email (unique) │   │  name           │   │  name           │       │
//! │  │  name           │   │  owner snapshot │   │  price (Money)  │       │
//! │  │  password_hash  │   │  products ──────┼──►│  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      Sale       │   │   AccessToken   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  id (0, 1, ..)  │   │  token          │                             │
//! │  │  buyer/store/   │   │  user_id        │                             │
//! │  │  product ids    │   │  issued_at      │                             │
//! │  │  unit_price     │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! User and store ids are sequential from 1 (nothing is ever deleted).
//! Product and sale ids come from global counters starting at 0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[inline]
            pub const fn new(raw: u64) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// User identifier, assigned as `user_count + 1`.
    UserId
);
id_type!(
    /// Store identifier, assigned as `store_count + 1`.
    StoreId
);
id_type!(
    /// Product identifier, drawn from a counter shared by every store.
    ProductId
);
id_type!(
    /// Sale identifier, drawn from the ledger counter.
    SaleId
);

// =============================================================================
// User
// =============================================================================

/// A registered marketplace user.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique lookup key.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Salted one-way digest (PHC string).
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Store
// =============================================================================

/// Owner details frozen into a store when it is created.
///
/// A copy, not a live reference: later changes to the user (none exist
/// today) would not show up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOwner {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for StoreOwner {
    fn from(user: &User) -> Self {
        StoreOwner {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A named collection of products owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub owner: StoreOwner,
    /// Products in insertion order.
    pub products: Vec<Product>,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// Checks whether `user_id` owns this store.
    #[inline]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner.id == user_id
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn product_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// Detaches a product from this store, preserving the order of the rest.
    pub fn take_product(&mut self, id: ProductId) -> Option<Product> {
        let idx = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(idx))
    }

    /// Products whose name contains `partial` (case-sensitive).
    pub fn matching_products<'a>(&'a self, partial: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.name.contains(partial))
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product listed in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price, never negative.
    pub price: Money,
    /// Stock on hand. Starts at 0 and is not floored.
    pub quantity: i64,
}

impl Product {
    /// Creates a product with no stock.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Product {
            id,
            name: name.into(),
            price,
            quantity: 0,
        }
    }

    /// Checks if stock covers `quantity`.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable ledger entry.
/// Uses snapshot pattern to freeze the unit price at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub buyer_id: UserId,
    /// Store that held the product when it was bought.
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Unit price × quantity, `None` if it does not fit in `Money`.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Access Token
// =============================================================================

/// Proof of a successful login. Never expires; can be revoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> Store {
        let mut leite = Product::new(ProductId::new(0), "Leite", Money::from_cents(840));
        leite.quantity = 15;
        Store {
            id: StoreId::new(1),
            name: "Bodega".to_string(),
            owner: StoreOwner {
                id: UserId::new(1),
                name: "João".to_string(),
                email: "joao@x.com".to_string(),
            },
            products: vec![
                leite,
                Product::new(ProductId::new(1), "Arroz", Money::from_cents(2200)),
                Product::new(ProductId::new(2), "Leite em pó", Money::from_cents(1590)),
            ],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_id_display_and_order() {
        assert_eq!(StoreId::new(7).to_string(), "7");
        assert!(ProductId::new(0) < ProductId::new(1));
        assert_eq!(UserId::new(3).get(), 3);
    }

    #[test]
    fn test_new_product_has_no_stock() {
        let product = Product::new(ProductId::new(9), "Oleo", Money::from_cents(969));
        assert_eq!(product.quantity, 0);
        assert!(product.can_sell(0));
        assert!(!product.can_sell(1));
    }

    #[test]
    fn test_store_product_lookup() {
        let mut store = sample_store();
        assert!(store.is_owned_by(UserId::new(1)));
        assert!(!store.is_owned_by(UserId::new(2)));

        assert_eq!(store.product(ProductId::new(0)).map(|p| p.quantity), Some(15));
        assert!(store.product(ProductId::new(42)).is_none());

        if let Some(p) = store.product_mut(ProductId::new(1)) {
            p.quantity += 4;
        }
        assert_eq!(store.product(ProductId::new(1)).map(|p| p.quantity), Some(4));
    }

    #[test]
    fn test_take_product_preserves_order() {
        let mut store = sample_store();
        let taken = store.take_product(ProductId::new(1)).map(|p| p.name);
        assert_eq!(taken.as_deref(), Some("Arroz"));

        let ids: Vec<u64> = store.products.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![0, 2]);
        assert!(store.take_product(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_matching_products_is_case_sensitive() {
        let store = sample_store();
        let names: Vec<&str> = store.matching_products("Leite").map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Leite", "Leite em pó"]);
        assert_eq!(store.matching_products("leite").count(), 0);
        assert_eq!(store.matching_products("").count(), 3);
    }

    #[test]
    fn test_sale_line_total() {
        let sale = Sale {
            id: SaleId::new(0),
            buyer_id: UserId::new(1),
            store_id: StoreId::new(1),
            product_id: ProductId::new(0),
            quantity: 3,
            unit_price: Money::from_cents(840),
            created_at: Utc::now(),
        };
        assert_eq!(sale.line_total(), Some(Money::from_cents(2520)));

        let huge = Sale {
            quantity: i64::MAX,
            ..sale
        };
        assert_eq!(huge.line_total(), None);
    }

    #[test]
    fn test_user_hash_is_not_serialized() {
        let user = User {
            id: UserId::new(1),
            email: "joao@x.com".to_string(),
            name: "João".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"id\":1"));

        let owner = StoreOwner::from(&user);
        assert_eq!(owner.id, user.id);
        assert_eq!(owner.email, "joao@x.com");
    }
}
