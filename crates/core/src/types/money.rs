//! Money helpers built on decimal arithmetic.
//!
//! All monetary amounts in Pikabu are [`rust_decimal::Decimal`] values in the
//! currency's standard unit (dollars, not cents). Decimal arithmetic keeps
//! cent-denominated sums exact, so totals can be compared with plain
//! equality - no epsilon band, no float drift.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round a monetary amount to two decimal places, half-up.
///
/// This is the single rounding point in the checkout flow: it is applied to
/// the final authoritative order total only, never per line.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an amount in the standard unit to minor units (cents).
///
/// Returns `None` if the amount does not fit in an `i64` after scaling.
/// The amount is rounded half-up to whole cents first.
#[must_use]
pub fn to_cents(amount: Decimal) -> Option<i64> {
    (round_to_cents(amount) * Decimal::ONE_HUNDRED).to_i64()
}

/// Convert an amount in minor units (cents) to the standard unit.
#[must_use]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Errors that can occur when constructing a [`TaxRate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxRateError {
    /// The rate is below zero.
    #[error("tax rate cannot be negative (got {0})")]
    Negative(Decimal),
    /// The rate is above 1.0 (100%).
    #[error("tax rate cannot exceed 1.0 (got {0})")]
    TooLarge(Decimal),
    /// The input string is not a decimal number.
    #[error("tax rate is not a valid decimal: {0}")]
    Unparseable(String),
}

/// A sales tax rate expressed as a fraction of the subtotal.
///
/// ## Constraints
///
/// - Range: `0.0 ..= 1.0` (a 15% rate is `0.15`)
///
/// ## Examples
///
/// ```
/// use pikabu_core::TaxRate;
/// use rust_decimal::Decimal;
///
/// let rate = TaxRate::new(Decimal::new(15, 2)).unwrap();
/// assert_eq!(rate.tax_on(Decimal::new(2000, 2)), Decimal::new(300, 2));
/// assert_eq!(rate.gross(Decimal::new(2000, 2)), Decimal::new(2300, 2));
///
/// assert!(TaxRate::new(Decimal::NEGATIVE_ONE).is_err());
/// assert!(TaxRate::new(Decimal::TWO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// A zero tax rate.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a `TaxRate` from a decimal fraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is negative or above `1.0`.
    pub fn new(rate: Decimal) -> Result<Self, TaxRateError> {
        if rate < Decimal::ZERO {
            return Err(TaxRateError::Negative(rate));
        }
        if rate > Decimal::ONE {
            return Err(TaxRateError::TooLarge(rate));
        }
        Ok(Self(rate))
    }

    /// The rate as a decimal fraction.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Tax owed on a subtotal: `sub_total * rate`.
    #[must_use]
    pub fn tax_on(&self, sub_total: Decimal) -> Decimal {
        sub_total * self.0
    }

    /// Gross amount for a subtotal: `sub_total * (1 + rate)`. Unrounded.
    #[must_use]
    pub fn gross(&self, sub_total: Decimal) -> Decimal {
        sub_total * (Decimal::ONE + self.0)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaxRate {
    type Err = TaxRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate: Decimal = s
            .trim()
            .parse()
            .map_err(|_| TaxRateError::Unparseable(s.to_owned()))?;
        Self::new(rate)
    }
}
