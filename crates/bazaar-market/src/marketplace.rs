//! # Marketplace Facade
//!
//! The single owner of every piece of marketplace state.
//!
//! ## State Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Marketplace                                    │
//! │                                                                         │
//! │  users   BTreeMap<email, User>          register / login               │
//! │  stores  BTreeMap<StoreId, Store>       create_store, add_product, ... │
//! │  tokens  HashMap<token, AccessToken>    login / verify / revoke        │
//! │  sales   Vec<Sale>                      purchase (append-only)         │
//! │                                                                         │
//! │  next_product_id ──► shared by every store                             │
//! │  next_sale_id    ──► ledger position                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Authorization
//! Every mutating store operation resolves the token first (`Unauthorized`
//! when unknown). With `enforce_store_ownership` on, the resolved user must
//! also own each store involved (`Forbidden` otherwise).
//!
//! Searches and listings need no token and return cloned snapshots.

use std::collections::{BTreeMap, HashMap};

use bazaar_core::validation::{
    validate_display_name, validate_email, validate_password, validate_price,
    validate_product_name, validate_purchase_quantity, validate_store_name, validate_transfer,
};
use bazaar_core::{
    AccessToken, MarketError, MarketResult, Money, Product, ProductId, Sale, SaleId, Store,
    StoreId, StoreOwner, User, UserId, ValidationError,
};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::MarketConfig;
use crate::credentials::{AlphanumericTokens, Argon2Hasher, CredentialHasher, TokenGenerator};

/// Regeneration attempts before giving up on a token collision.
const MAX_TOKEN_ATTEMPTS: usize = 8;

/// In-memory marketplace.
pub struct Marketplace {
    config: MarketConfig,
    hasher: Box<dyn CredentialHasher>,
    token_gen: Box<dyn TokenGenerator>,

    users: BTreeMap<String, User>,
    stores: BTreeMap<StoreId, Store>,
    tokens: HashMap<String, AccessToken>,
    sales: Vec<Sale>,

    next_product_id: u64,
    next_sale_id: u64,
}

impl std::fmt::Debug for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marketplace")
            .field("config", &self.config)
            .field("users", &self.users.len())
            .field("stores", &self.stores.len())
            .field("tokens", &"[REDACTED]")
            .field("sales", &self.sales.len())
            .finish()
    }
}

impl Marketplace {
    /// Create a marketplace using Argon2 hashing and random alphanumeric tokens.
    pub fn new(config: MarketConfig) -> MarketResult<Self> {
        let hasher = Argon2Hasher::from_config(&config)?;
        Self::with_collaborators(config, hasher, AlphanumericTokens)
    }

    /// Create a marketplace with explicit collaborators.
    ///
    /// `config` is validated here as well, so hand-built configurations get
    /// the same range checks as ones loaded from the environment.
    pub fn with_collaborators<H, T>(config: MarketConfig, hasher: H, tokens: T) -> MarketResult<Self>
    where
        H: CredentialHasher + 'static,
        T: TokenGenerator + 'static,
    {
        config
            .validate()
            .map_err(|e| MarketError::Internal(format!("Invalid configuration: {}", e)))?;

        Ok(Marketplace {
            config,
            hasher: Box::new(hasher),
            token_gen: Box::new(tokens),
            users: BTreeMap::new(),
            stores: BTreeMap::new(),
            tokens: HashMap::new(),
            sales: Vec::new(),
            next_product_id: 0,
            next_sale_id: 0,
        })
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    // =========================================================================
    // Users & Access
    // =========================================================================

    /// Register a new user.
    ///
    /// The email is trimmed before it is stored, so `" joao@x.com "` and
    /// `"joao@x.com"` name the same account.
    ///
    /// ## Errors
    /// - `AlreadyExists` when the email is taken (existing user untouched)
    /// - `InvalidArgument` for an empty name/password or malformed email
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> MarketResult<UserId> {
        validate_display_name(name)?;
        validate_email(email)?;
        validate_password(password)?;
        let email = email.trim();

        if self.users.contains_key(email) {
            warn!(email = %email, "Registration rejected: email already in use");
            return Err(MarketError::AlreadyExists {
                field: "email",
                value: email.to_string(),
            });
        }

        let password_hash = self.hasher.hash(password)?;
        // No deletion exists, so count + 1 never repeats.
        let id = UserId::new(self.users.len() as u64 + 1);

        self.users.insert(
            email.to_string(),
            User {
                id,
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
                created_at: Utc::now(),
            },
        );

        info!(user_id = %id, email = %email, "User registered");
        Ok(id)
    }

    /// Log in and receive a fresh access token.
    ///
    /// Unknown email and wrong password both yield `Unauthorized`. A user
    /// may hold any number of tokens at once.
    pub fn login(&mut self, email: &str, password: &str) -> MarketResult<String> {
        let email = email.trim();
        let user_id = match self.users.get(email) {
            Some(user) if self.hasher.verify(password, &user.password_hash) => user.id,
            Some(_) => {
                warn!(email = %email, "Login rejected: wrong password");
                return Err(MarketError::Unauthorized);
            }
            None => {
                warn!(email = %email, "Login rejected: unknown email");
                return Err(MarketError::Unauthorized);
            }
        };

        let token = self.fresh_token()?;
        self.tokens.insert(
            token.clone(),
            AccessToken {
                token: token.clone(),
                user_id,
                issued_at: Utc::now(),
            },
        );

        info!(user_id = %user_id, "Access token issued");
        Ok(token)
    }

    fn fresh_token(&self) -> MarketResult<String> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = self.token_gen.generate(self.config.token_length);
            if !self.tokens.contains_key(&token) {
                return Ok(token);
            }
            debug!("Token collision, regenerating");
        }

        Err(MarketError::Internal(
            "Could not generate a unique access token".to_string(),
        ))
    }

    /// Resolve a token to its user.
    pub fn verify_token(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).map(|t| t.user_id)
    }

    /// Invalidate a token. Returns whether it was active.
    pub fn revoke_token(&mut self, token: &str) -> bool {
        match self.tokens.remove(token) {
            Some(revoked) => {
                info!(user_id = %revoked.user_id, "Access token revoked");
                true
            }
            None => false,
        }
    }

    /// Active tokens, ordered by user id then issue time.
    pub fn tokens(&self) -> Vec<AccessToken> {
        let mut tokens: Vec<AccessToken> = self.tokens.values().cloned().collect();
        tokens.sort_by(|a, b| {
            a.user_id
                .cmp(&b.user_id)
                .then(a.issued_at.cmp(&b.issued_at))
        });
        tokens
    }

    pub fn user_by_id(&self, id: UserId) -> Option<User> {
        self.users.values().find(|u| u.id == id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn authenticate(&self, token: &str) -> MarketResult<UserId> {
        self.verify_token(token).ok_or_else(|| {
            warn!("Rejected unknown access token");
            MarketError::Unauthorized
        })
    }

    fn ensure_owner(&self, store: &Store, user_id: UserId) -> MarketResult<()> {
        if self.config.enforce_store_ownership && !store.is_owned_by(user_id) {
            warn!(user_id = %user_id, store_id = %store.id, "Rejected: store not owned by caller");
            return Err(MarketError::Forbidden {
                user_id: user_id.get(),
                store_id: store.id.get(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Stores & Products
    // =========================================================================

    /// Create a store owned by the token's user.
    ///
    /// ## Errors
    /// - `Unauthorized` for an unknown token
    /// - `AlreadyExists` for a taken name (when `unique_store_names` is on)
    pub fn create_store(&mut self, token: &str, name: &str) -> MarketResult<StoreId> {
        let user_id = self.authenticate(token)?;
        validate_store_name(name)?;

        if self.config.unique_store_names && self.stores.values().any(|s| s.name == name) {
            warn!(name = %name, "Store creation rejected: name already in use");
            return Err(MarketError::AlreadyExists {
                field: "store name",
                value: name.to_string(),
            });
        }

        let owner = self
            .users
            .values()
            .find(|u| u.id == user_id)
            .map(StoreOwner::from)
            .ok_or_else(|| MarketError::not_found("User", user_id))?;

        let id = StoreId::new(self.stores.len() as u64 + 1);
        self.stores.insert(
            id,
            Store {
                id,
                name: name.to_string(),
                owner,
                products: Vec::new(),
                created_at: Utc::now(),
            },
        );

        info!(store_id = %id, owner_id = %user_id, name = %name, "Store created");
        Ok(id)
    }

    /// Add a product (quantity 0) to a store.
    ///
    /// ## Errors
    /// - `Unauthorized` for an unknown token
    /// - `NotFound` for an unknown store
    /// - `Forbidden` when the caller does not own the store (if enforced)
    /// - `InvalidArgument` for a negative price or empty name
    pub fn add_product(
        &mut self,
        token: &str,
        store_id: StoreId,
        name: &str,
        price: Money,
    ) -> MarketResult<ProductId> {
        let user_id = self.authenticate(token)?;
        validate_product_name(name)?;
        validate_price(price)?;

        let store = self
            .stores
            .get(&store_id)
            .ok_or_else(|| MarketError::not_found("Store", store_id))?;
        self.ensure_owner(store, user_id)?;

        let id = ProductId::new(self.next_product_id);
        self.next_product_id += 1;

        if let Some(store) = self.stores.get_mut(&store_id) {
            store.products.push(Product::new(id, name, price));
        }

        debug!(store_id = %store_id, product_id = %id, price = %price, "Product added");
        Ok(id)
    }

    /// Adjust stock of a product in a store and return the new quantity.
    ///
    /// `delta` may be negative; the quantity is not floored at zero. A delta
    /// that would overflow the quantity is rejected and stock is left as is.
    pub fn add_stock(
        &mut self,
        token: &str,
        store_id: StoreId,
        product_id: ProductId,
        delta: i64,
    ) -> MarketResult<i64> {
        let user_id = self.authenticate(token)?;

        let store = self
            .stores
            .get(&store_id)
            .ok_or_else(|| MarketError::not_found("Store", store_id))?;
        self.ensure_owner(store, user_id)?;

        let product = self
            .stores
            .get_mut(&store_id)
            .and_then(|s| s.product_mut(product_id))
            .ok_or_else(|| MarketError::not_found("Product", product_id))?;

        product.quantity = product
            .quantity
            .checked_add(delta)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: i64::MIN,
                max: i64::MAX,
            })?;

        debug!(
            store_id = %store_id,
            product_id = %product_id,
            delta = delta,
            quantity = product.quantity,
            "Stock updated"
        );
        Ok(product.quantity)
    }

    /// Move a product, with its stock, from one store to another.
    ///
    /// ## Errors
    /// - `Unauthorized` for an unknown token
    /// - `InvalidArgument` when `src == dst`
    /// - `NotFound` for an unknown store or a product not listed in `src`
    /// - `Forbidden` when either store belongs to someone else (if enforced)
    pub fn transfer_product(
        &mut self,
        token: &str,
        src: StoreId,
        dst: StoreId,
        product_id: ProductId,
    ) -> MarketResult<()> {
        let user_id = self.authenticate(token)?;
        validate_transfer(src, dst)?;

        let src_store = self
            .stores
            .get(&src)
            .ok_or_else(|| MarketError::not_found("Store", src))?;
        let dst_store = self
            .stores
            .get(&dst)
            .ok_or_else(|| MarketError::not_found("Store", dst))?;
        self.ensure_owner(src_store, user_id)?;
        self.ensure_owner(dst_store, user_id)?;

        let product = self
            .stores
            .get_mut(&src)
            .and_then(|s| s.take_product(product_id))
            .ok_or_else(|| MarketError::not_found("Product", product_id))?;

        match self.stores.get_mut(&dst) {
            Some(store) => store.products.push(product),
            None => return Err(MarketError::not_found("Store", dst)),
        }

        info!(src = %src, dst = %dst, product_id = %product_id, "Product transferred");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Products whose name contains `partial` (case-sensitive), across all
    /// stores in ascending store id order.
    pub fn search_products(&self, partial: &str) -> Vec<Product> {
        let found: Vec<Product> = self
            .stores
            .values()
            .flat_map(|s| s.matching_products(partial))
            .cloned()
            .collect();

        debug!(query = %partial, count = found.len(), "Product search");
        found
    }

    /// Same as [`Marketplace::search_products`], limited to one store.
    /// An unknown store yields no results.
    pub fn search_products_in_store(&self, partial: &str, store_id: StoreId) -> Vec<Product> {
        self.stores
            .get(&store_id)
            .map(|s| s.matching_products(partial).cloned().collect())
            .unwrap_or_default()
    }

    /// Stores whose name contains `partial`.
    pub fn search_stores(&self, partial: &str) -> Vec<Store> {
        self.stores
            .values()
            .filter(|s| s.name.contains(partial))
            .cloned()
            .collect()
    }

    /// Every store, ascending by id.
    pub fn list_stores(&self) -> Vec<Store> {
        self.stores.values().cloned().collect()
    }

    pub fn store(&self, id: StoreId) -> Option<Store> {
        self.stores.get(&id).cloned()
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Record a purchase and return the new sale id.
    ///
    /// The sale captures the store currently holding the product and its
    /// current unit price. Stock is only consumed when
    /// `decrement_stock_on_purchase` is enabled.
    ///
    /// ## Errors
    /// - `Unauthorized` for an unknown token
    /// - `InvalidArgument` when `quantity <= 0`
    /// - `NotFound` when no store lists the product
    /// - `InsufficientStock` when decrementing and stock is short
    pub fn purchase(
        &mut self,
        token: &str,
        product_id: ProductId,
        quantity: i64,
    ) -> MarketResult<SaleId> {
        let buyer_id = self.authenticate(token)?;
        validate_purchase_quantity(quantity)?;

        let decrement = self.config.decrement_stock_on_purchase;
        let (store_id, product) = self
            .stores
            .values_mut()
            .find_map(|s| {
                let store_id = s.id;
                s.product_mut(product_id).map(|p| (store_id, p))
            })
            .ok_or_else(|| MarketError::not_found("Product", product_id))?;

        if decrement {
            if !product.can_sell(quantity) {
                return Err(MarketError::InsufficientStock {
                    product_id: product_id.get(),
                    available: product.quantity,
                    requested: quantity,
                });
            }
            product.quantity = product
                .quantity
                .checked_sub(quantity)
                .ok_or_else(|| ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: i64::MIN,
                    max: i64::MAX,
                })?;
        }
        let unit_price = product.price;

        let id = SaleId::new(self.next_sale_id);
        self.next_sale_id += 1;

        self.sales.push(Sale {
            id,
            buyer_id,
            store_id,
            product_id,
            quantity,
            unit_price,
            created_at: Utc::now(),
        });

        info!(
            sale_id = %id,
            buyer_id = %buyer_id,
            store_id = %store_id,
            product_id = %product_id,
            quantity = quantity,
            unit_price = %unit_price,
            "Sale recorded"
        );
        Ok(id)
    }

    /// The sale ledger in recording order.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn sale(&self, id: SaleId) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
