//! Shared fixtures for the Pikabu checkout integration tests.
//!
//! The checkout core is pure, so the fixtures here stand in for the
//! external collaborators: a small authoritative catalog (the price
//! snapshot a database read would produce) and sample cart data.

use std::collections::HashMap;
use std::sync::Once;

use rust_decimal::Decimal;

use pikabu_checkout::CartLine;
use pikabu_core::{Gender, ProductId, Size};

static INIT_TRACING: Once = Once::new();

/// Initialise tracing once for the whole test binary.
///
/// Respects `RUST_LOG`; defaults to `warn` so rejection paths show up when
/// a test fails.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Parse a decimal literal; panics on bad fixture data.
///
/// # Panics
///
/// Panics if `s` is not a valid decimal.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// The authoritative price snapshot for the sample catalog.
#[must_use]
pub fn sample_catalog() -> HashMap<ProductId, Decimal> {
    HashMap::from([
        (ProductId::new(1), dec("19.99")),
        (ProductId::new(2), dec("45.00")),
        (ProductId::new(3), dec("12.50")),
    ])
}

/// A cart line for a product in [`sample_catalog`].
///
/// The unit price is the shopper's snapshot and may deliberately disagree
/// with the catalog in tampering tests.
#[must_use]
pub fn cart_line(product: i32, size: Size, quantity: u32, unit_price: &str) -> CartLine {
    CartLine {
        product_id: ProductId::new(product),
        size: Some(size),
        quantity,
        unit_price: dec(unit_price),
        title: format!("Sample Product {product}"),
        image: format!("product-{product}.webp"),
        gender: Gender::Unisex,
    }
}
