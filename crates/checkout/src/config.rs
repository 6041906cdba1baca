//! Checkout policy loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PIKABU_TAX_RATE` - sales tax rate as a decimal fraction (default: 0)
//! - `PIKABU_MIN_ITEM_QUANTITY` - lower bound per cart line (default: 1)
//! - `PIKABU_MAX_ITEM_QUANTITY` - upper bound per cart line (default: 10)

use std::str::FromStr;

use pikabu_core::TaxRate;

const TAX_RATE_VAR: &str = "PIKABU_TAX_RATE";
const MIN_QUANTITY_VAR: &str = "PIKABU_MIN_ITEM_QUANTITY";
const MAX_QUANTITY_VAR: &str = "PIKABU_MAX_ITEM_QUANTITY";

/// Configuration errors that can occur during loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Per-line quantity bounds.
///
/// A caller-side policy, not a ledger invariant: the storefront clamps the
/// requested quantity before calling
/// [`CartLedger::set_quantity`](crate::cart::CartLedger::set_quantity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityLimits {
    /// Smallest allowed quantity per line. Never below 1.
    pub min: u32,
    /// Largest allowed quantity per line.
    pub max: u32,
}

impl Default for QuantityLimits {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl QuantityLimits {
    /// Clamp a requested quantity into `[min, max]`.
    #[must_use]
    pub const fn clamp(&self, quantity: u32) -> u32 {
        if quantity < self.min {
            self.min
        } else if quantity > self.max {
            self.max
        } else {
            quantity
        }
    }
}

/// Checkout policy for the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Sales tax rate folded into summaries and recomputed totals.
    pub tax_rate: TaxRate,
    /// Per-line quantity bounds applied by callers.
    pub quantity_limits: QuantityLimits,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_rate: TaxRate::ZERO,
            quantity_limits: QuantityLimits::default(),
        }
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present. Unset
    /// variables fall back to defaults: no tax, quantities in `[1, 10]`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but unparseable, the tax
    /// rate is out of range, or the quantity bounds are inconsistent
    /// (`min < 1` or `min > max`).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let tax_rate = parse_or_default(TAX_RATE_VAR, TaxRate::ZERO)?;
        let min = parse_or_default(MIN_QUANTITY_VAR, 1u32)?;
        let max = parse_or_default(MAX_QUANTITY_VAR, 10u32)?;

        if min < 1 {
            return Err(ConfigError::InvalidEnvVar(
                MIN_QUANTITY_VAR.to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if min > max {
            return Err(ConfigError::InvalidEnvVar(
                MAX_QUANTITY_VAR.to_string(),
                format!("must be >= {MIN_QUANTITY_VAR} (got {max} < {min})"),
            ));
        }

        Ok(Self {
            tax_rate,
            quantity_limits: QuantityLimits { min, max },
        })
    }
}

/// Parse an optional environment variable, falling back to a default.
fn parse_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
