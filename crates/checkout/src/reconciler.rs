//! Order validation and payment settlement.
//!
//! The reconciler gatekeeps two boundaries where client-held state meets
//! money:
//!
//! 1. **Creation** - a proposed order is re-priced from the authoritative
//!    catalog snapshot and rejected if the client-claimed total disagrees
//!    with the recomputed one.
//! 2. **Settlement** - a payment confirmation from the gateway is accepted
//!    only if its amount equals the stored order total exactly, and only
//!    once per order.
//!
//! All comparisons are exact decimal equality after a single half-up
//! rounding of the final total. The caller is responsible for handing in a
//! price snapshot read atomically with order persistence (one read
//! transaction); the reconciler assumes the snapshot is consistent.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{instrument, warn};

use pikabu_core::{OrderId, ProductId, TaxRate, round_to_cents};

use crate::cart::CartSummary;
use crate::order::{Order, OrderLine, PricedOrder, SettledOrder};

/// Why a proposed order was rejected at creation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    /// A line references a product absent from the authoritative catalog.
    #[error("product {0} does not exist; please verify the cart")]
    UnknownProduct(ProductId),

    /// The client-claimed total disagrees with the recomputed total.
    #[error("claimed total {claimed} does not match the priced total {actual}")]
    PriceMismatch {
        /// Total the client submitted.
        claimed: Decimal,
        /// Total recomputed from authoritative prices.
        actual: Decimal,
    },
}

/// Why a payment confirmation was rejected at settlement.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// The order is already paid; a second confirmation is reported, not
    /// re-processed.
    #[error("order {0} is already paid")]
    AlreadyPaid(OrderId),

    /// The gateway amount disagrees with the stored order total. The order
    /// stays unpaid; resolution is an operations concern.
    #[error("gateway amount {received} does not match total {expected} for order {order_id}")]
    PaymentMismatch {
        order_id: OrderId,
        /// The frozen order total.
        expected: Decimal,
        /// The amount the gateway reports as charged.
        received: Decimal,
    },
}

/// Validates proposed orders and settles confirmed payments.
///
/// Holds the tax rate used to recompute totals; everything else arrives as
/// already-resolved data from collaborators.
#[derive(Debug, Clone, Copy)]
pub struct OrderReconciler {
    tax_rate: TaxRate,
}

impl OrderReconciler {
    /// Create a reconciler for the given tax rate.
    #[must_use]
    pub const fn new(tax_rate: TaxRate) -> Self {
        Self { tax_rate }
    }

    /// The tax rate applied when recomputing totals.
    #[must_use]
    pub const fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Re-price a proposed order from authoritative catalog prices.
    ///
    /// Each line's unit price is replaced by the catalog price for its
    /// product; the subtotal and total are recomputed from those prices,
    /// with the total rounded half-up to cents. The rounded total must
    /// equal the client-claimed total exactly, otherwise the order is not
    /// created. The returned [`PricedOrder`] carries only server-derived
    /// amounts.
    ///
    /// # Errors
    ///
    /// - [`OrderValidationError::UnknownProduct`] when a line's product is
    ///   missing from `prices`.
    /// - [`OrderValidationError::PriceMismatch`] when the claimed total
    ///   disagrees with the recomputed total.
    #[instrument(skip_all, fields(lines = lines.len(), claimed = %claimed_total))]
    pub fn validate_and_price(
        &self,
        lines: &[OrderLine],
        claimed_total: Decimal,
        prices: &HashMap<ProductId, Decimal>,
    ) -> Result<PricedOrder, OrderValidationError> {
        let mut priced_lines = Vec::with_capacity(lines.len());
        let mut sub_total = Decimal::ZERO;

        for line in lines {
            let unit_price = *prices
                .get(&line.product_id)
                .ok_or(OrderValidationError::UnknownProduct(line.product_id))?;

            sub_total += unit_price * Decimal::from(line.quantity);
            priced_lines.push(OrderLine {
                unit_price,
                ..line.clone()
            });
        }

        // The single rounding point: the final authoritative total.
        let actual = round_to_cents(self.tax_rate.gross(sub_total));
        let claimed = round_to_cents(claimed_total);

        if claimed != actual {
            warn!(%claimed, %actual, "rejecting order: claimed total does not match");
            return Err(OrderValidationError::PriceMismatch { claimed, actual });
        }

        let summary = CartSummary {
            item_count: lines.iter().map(|line| line.quantity).sum(),
            sub_total,
            tax: self.tax_rate.tax_on(sub_total),
            total: actual,
        };

        Ok(PricedOrder::new(priced_lines, summary))
    }

    /// Settle an order against an external payment confirmation.
    ///
    /// The gateway must echo the exact charged amount; anything other than
    /// strict equality with the frozen order total leaves the order unpaid.
    /// Settlement is one-way: a paid order can never be confirmed again and
    /// no API un-pays it.
    ///
    /// # Errors
    ///
    /// - [`SettlementError::AlreadyPaid`] when the order is already settled.
    /// - [`SettlementError::PaymentMismatch`] when `external_amount` differs
    ///   from the order total.
    #[instrument(skip_all, fields(order_id = %order.id, amount = %external_amount))]
    pub fn confirm_payment(
        &self,
        mut order: Order,
        external_amount: Decimal,
        external_transaction_id: &str,
    ) -> Result<SettledOrder, SettlementError> {
        if order.is_paid {
            warn!(order_id = %order.id, "duplicate payment confirmation");
            return Err(SettlementError::AlreadyPaid(order.id));
        }

        if external_amount != order.summary.total {
            warn!(
                expected = %order.summary.total,
                received = %external_amount,
                "rejecting settlement: gateway amount does not match order total"
            );
            return Err(SettlementError::PaymentMismatch {
                order_id: order.id,
                expected: order.summary.total,
                received: external_amount,
            });
        }

        order.is_paid = true;
        order.paid_at = Some(Utc::now());
        order.transaction_id = Some(external_transaction_id.to_owned());

        Ok(SettledOrder::new(order))
    }
}
