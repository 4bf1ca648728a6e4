//! # Seed Session
//!
//! Replays a sample marketplace session against a fresh in-memory
//! marketplace and logs every step.
//!
//! ## Usage
//! ```bash
//! cargo run -p bazaar-market --bin seed
//!
//! # Legacy rules (no ownership or store-name checks)
//! cargo run -p bazaar-market --bin seed -- --compat
//!
//! # More detail
//! RUST_LOG=debug cargo run -p bazaar-market --bin seed
//! ```
//!
//! Settings not covered by flags come from `BAZAAR_*` environment variables.

use std::env;

use bazaar_core::Money;
use bazaar_market::{MarketConfig, Marketplace};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// (name, email, password)
const USERS: &[(&str, &str, &str)] = &[
    ("João", "joao@gmail.com", "123456"),
    ("Maria", "maria@gmail.com", "654321"),
];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bazaar=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let compat = env::args().skip(1).any(|a| a == "--compat");
    let mut config = MarketConfig::load()?;
    if compat {
        config = MarketConfig {
            token_length: config.token_length,
            hash_memory_kib: config.hash_memory_kib,
            hash_iterations: config.hash_iterations,
            ..MarketConfig::compat()
        };
    }
    info!(?config, "Starting seed session");

    let mut market = Marketplace::new(config)?;

    for (name, email, password) in USERS {
        market.register(name, email, password)?;
    }
    // Second registration with a taken email must fail.
    if let Err(e) = market.register("João Clone", "joao@gmail.com", "000000") {
        info!(error = %e, "Duplicate registration rejected as expected");
    }

    let joao = market.login("joao@gmail.com", "123456")?;
    let maria = market.login("maria@gmail.com", "654321")?;
    if let Err(e) = market.login("joao@gmail.com", "wrong") {
        info!(error = %e, "Bad password rejected as expected");
    }

    let bodega_joao = market.create_store(&joao, "Bodega do João")?;
    let acougue_joao = market.create_store(&joao, "Açougue do João")?;
    let bodega_maria = market.create_store(&maria, "Bodega da Maria")?;

    let price = |s: &str| s.parse::<Money>();

    let leite = market.add_product(&joao, bodega_joao, "Leite", price("8.40")?)?;
    market.add_stock(&joao, bodega_joao, leite, 10)?;
    market.add_stock(&joao, bodega_joao, leite, 5)?;

    let arroz = market.add_product(&joao, bodega_joao, "Arroz", price("22.00")?)?;
    market.add_stock(&joao, bodega_joao, arroz, 40)?;

    let coca = market.add_product(&joao, bodega_joao, "Coca cola 250ml", price("2.40")?)?;
    market.add_stock(&joao, bodega_joao, coca, 15)?;

    // Picanha listed in the grocery; moved to the butcher below.
    let picanha = market.add_product(&joao, bodega_joao, "Picanha Maturada", price("58.40")?)?;
    market.add_stock(&joao, bodega_joao, picanha, 5)?;

    let picanha_suina =
        market.add_product(&joao, acougue_joao, "Picanha Suína", price("78.40")?)?;
    market.add_stock(&joao, acougue_joao, picanha_suina, 8)?;

    market.transfer_product(&joao, bodega_joao, acougue_joao, picanha)?;

    for product in [picanha, coca, arroz, leite] {
        market.purchase(&joao, product, 1)?;
    }
    market.purchase(&maria, picanha_suina, 2)?;

    match market.add_product(&maria, bodega_maria, "Oleo", price("9.69")?) {
        Ok(oleo) => {
            market.add_stock(&maria, bodega_maria, oleo, 5)?;
        }
        Err(e) => error!(error = %e, "Maria could not list Oleo"),
    }

    let picanhas = market.search_products("Picanha");
    info!(count = picanhas.len(), "Picanhas found");
    if let Some(first) = picanhas.first() {
        market.purchase(&maria, first.id, 1)?;
    }

    let bodegas = market.search_stores("Bodega");
    info!(count = bodegas.len(), "Bodegas found");
    if let Some(bodega) = bodegas.first() {
        let cocas = market.search_products_in_store("Coca", bodega.id);
        match cocas.first() {
            Some(c) => {
                market.purchase(&maria, c.id, 1)?;
            }
            None => warn!(store = %bodega.name, "No Coca in the first Bodega"),
        }
    }

    for token in market.tokens() {
        info!(user_id = %token.user_id, issued_at = %token.issued_at, "Active token");
    }

    for store in market.list_stores() {
        let products: Vec<String> = store
            .products
            .iter()
            .map(|p| format!("{} x{} @ {}", p.name, p.quantity, p.price))
            .collect();
        info!(store = %store.name, owner = %store.owner.name, ?products, "Store");
    }

    let revenue = market
        .sales()
        .iter()
        .try_fold(Money::zero(), |acc, s| s.line_total().and_then(|t| acc.checked_add(t)))
        .ok_or("revenue does not fit in Money")?;
    info!(sales = market.sales().len(), revenue = %revenue, "Seed session complete");

    Ok(())
}
