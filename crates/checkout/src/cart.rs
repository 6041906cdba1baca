//! The cart ledger: line items and their derived summary.
//!
//! Lines are merged by `(product_id, size)` - the same product in two sizes
//! is two lines. The summary is recomputed before any mutating call returns,
//! so callers can never observe a summary that is stale relative to the
//! lines. Persistence (cookies, session storage) is a collaborator concern;
//! the ledger only owns the in-memory state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pikabu_core::{Gender, ProductId, Size, TaxRate};

/// One product+size+quantity entry in the cart.
///
/// `unit_price` is a snapshot taken when the line was added; the order
/// reconciler replaces it with the authoritative catalog price at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    /// `None` until the shopper picks a size; required before checkout.
    pub size: Option<Size>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub title: String,
    pub image: String,
    pub gender: Gender,
}

impl CartLine {
    /// Price of this line: `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// The identity used for merging lines.
    const fn merge_key(&self) -> (ProductId, Option<Size>) {
        (self.product_id, self.size)
    }
}

/// Derived aggregate over the cart lines.
///
/// Always a pure function of the line list and the tax rate; it is never
/// mutated independently of the lines it summarizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    /// Total number of units across all lines.
    pub item_count: u32,
    /// `sum(unit_price * quantity)` over all lines.
    pub sub_total: Decimal,
    /// `sub_total * tax_rate`.
    pub tax: Decimal,
    /// `sub_total * (1 + tax_rate)`. Unrounded on the cart side; rounding
    /// happens once, on the authoritative total at order validation.
    pub total: Decimal,
}

impl CartSummary {
    /// The summary of an empty cart.
    pub const EMPTY: Self = Self {
        item_count: 0,
        sub_total: Decimal::ZERO,
        tax: Decimal::ZERO,
        total: Decimal::ZERO,
    };

    /// Fold the given lines into a summary at the given tax rate.
    #[must_use]
    pub fn compute(lines: &[CartLine], tax_rate: TaxRate) -> Self {
        let item_count = lines.iter().map(|line| line.quantity).sum();
        let sub_total = lines
            .iter()
            .fold(Decimal::ZERO, |acc, line| acc + line.line_total());

        Self {
            item_count,
            sub_total,
            tax: tax_rate.tax_on(sub_total),
            total: tax_rate.gross(sub_total),
        }
    }
}

/// An owned cart: the line items plus their current summary.
///
/// Every mutating operation ([`add`](Self::add),
/// [`set_quantity`](Self::set_quantity), [`remove`](Self::remove),
/// [`clear`](Self::clear)) recomputes the summary before returning.
/// Mutation goes through `&mut self`, so concurrent writers serialize
/// through whatever owns the ledger - there is no interior mutability.
#[derive(Debug, Clone)]
pub struct CartLedger {
    lines: Vec<CartLine>,
    summary: CartSummary,
    tax_rate: TaxRate,
}

impl CartLedger {
    /// Create an empty ledger with the given tax rate.
    #[must_use]
    pub const fn new(tax_rate: TaxRate) -> Self {
        Self {
            lines: Vec::new(),
            summary: CartSummary::EMPTY,
            tax_rate,
        }
    }

    /// Rebuild a ledger from previously stored lines (e.g., a cart cookie).
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>, tax_rate: TaxRate) -> Self {
        let mut ledger = Self {
            lines,
            summary: CartSummary::EMPTY,
            tax_rate,
        };
        ledger.recompute_summary();
        ledger
    }

    /// Add a line to the cart.
    ///
    /// If a line with the same `(product_id, size)` already exists, the
    /// incoming quantity is added to it; otherwise the line is appended.
    /// A zero-quantity line is rejected as a no-op so the `quantity >= 1`
    /// invariant holds for every stored line.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }

        let key = line.merge_key();
        match self.lines.iter_mut().find(|l| l.merge_key() == key) {
            Some(existing) => existing.quantity += line.quantity,
            None => self.lines.push(line),
        }
        self.recompute_summary();
    }

    /// Replace the quantity of the matching line; no-op when absent.
    ///
    /// Callers are expected to clamp `quantity` to their policy bounds first
    /// (see [`QuantityLimits`](crate::config::QuantityLimits)). A quantity of
    /// zero removes the line - entries below one are never kept.
    pub fn set_quantity(&mut self, product_id: ProductId, size: Option<Size>, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id, size);
            return;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.merge_key() == (product_id, size))
        {
            line.quantity = quantity;
            self.recompute_summary();
        }
    }

    /// Delete the matching line; no-op when absent.
    pub fn remove(&mut self, product_id: ProductId, size: Option<Size>) {
        let before = self.lines.len();
        self.lines.retain(|l| l.merge_key() != (product_id, size));
        if self.lines.len() != before {
            self.recompute_summary();
        }
    }

    /// Empty the cart and zero the summary. Used once an order is created.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.summary = CartSummary::EMPTY;
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Current summary; consistent with [`lines`](Self::lines) at all times.
    #[must_use]
    pub const fn summary(&self) -> &CartSummary {
        &self.summary
    }

    /// The tax rate this ledger folds into its summary.
    #[must_use]
    pub const fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn recompute_summary(&mut self) {
        self.summary = CartSummary::compute(&self.lines, self.tax_rate);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn rate(s: &str) -> TaxRate {
        TaxRate::new(dec(s)).unwrap()
    }

    fn shirt(size: Option<Size>, quantity: u32, unit_price: &str) -> CartLine {
        CartLine {
            product_id: ProductId::new(1),
            size,
            quantity,
            unit_price: dec(unit_price),
            title: "Logo Tee".to_string(),
            image: "logo-tee.webp".to_string(),
            gender: Gender::Unisex,
        }
    }

    #[test]
    fn test_add_merges_same_product_and_size() {
        let mut ledger = CartLedger::new(TaxRate::ZERO);
        ledger.add(shirt(Some(Size::M), 2, "10"));
        ledger.add(shirt(Some(Size::M), 3, "10"));

        assert_eq!(ledger.lines().len(), 1);
        assert_eq!(ledger.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_accumulation_over_many_calls() {
        let mut ledger = CartLedger::new(TaxRate::ZERO);
        for qty in [1, 2, 3, 4] {
            ledger.add(shirt(Some(Size::L), qty, "10"));
        }
        assert_eq!(ledger.lines()[0].quantity, 10);
        assert_eq!(ledger.summary().item_count, 10);
    }

    #[test]
    fn test_add_keeps_sizes_as_separate_lines() {
        let mut ledger = CartLedger::new(TaxRate::ZERO);
        ledger.add(shirt(Some(Size::M), 1, "10"));
        ledger.add(shirt(Some(Size::L), 1, "10"));
        ledger.add(shirt(None, 1, "10"));

        assert_eq!(ledger.lines().len(), 3);
    }

    #[test]
    fn test_add_zero_quantity_is_rejected() {
        let mut ledger = CartLedger::new(TaxRate::ZERO);
        ledger.add(shirt(Some(Size::M), 0, "10"));

        assert!(ledger.is_empty());
        assert_eq!(*ledger.summary(), CartSummary::EMPTY);
    }

    #[test]
    fn test_summary_matches_spec_example() {
        // price 10 x qty 2 at 10% tax => 2 items, 20 subtotal, 2 tax, 22 total
        let mut ledger = CartLedger::new(rate("0.1"));
        ledger.add(shirt(Some(Size::M), 2, "10"));

        let summary = ledger.summary();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.sub_total, dec("20"));
        assert_eq!(summary.tax, dec("2.0"));
        assert_eq!(summary.total, dec("22.0"));
    }

    #[test]
    fn test_summary_recomputed_after_every_mutation() {
        let mut ledger = CartLedger::new(rate("0.1"));
        ledger.add(shirt(Some(Size::M), 2, "10"));
        assert_eq!(ledger.summary().item_count, 2);

        ledger.set_quantity(ProductId::new(1), Some(Size::M), 4);
        assert_eq!(ledger.summary().item_count, 4);
        assert_eq!(ledger.summary().sub_total, dec("40"));

        ledger.remove(ProductId::new(1), Some(Size::M));
        assert_eq!(*ledger.summary(), CartSummary::EMPTY);
    }

    #[test]
    fn test_summary_is_idempotent_on_unchanged_lines() {
        let mut ledger = CartLedger::new(rate("0.15"));
        ledger.add(shirt(Some(Size::M), 3, "19.99"));

        let first = ledger.summary().clone();
        let second = CartSummary::compute(ledger.lines(), ledger.tax_rate());
        assert_eq!(first, second);
    }

    #[test]
    fn test_set_quantity_unknown_line_is_noop() {
        let mut ledger = CartLedger::new(TaxRate::ZERO);
        ledger.add(shirt(Some(Size::M), 2, "10"));

        ledger.set_quantity(ProductId::new(99), Some(Size::M), 5);
        ledger.set_quantity(ProductId::new(1), Some(Size::S), 5);

        assert_eq!(ledger.lines()[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut ledger = CartLedger::new(TaxRate::ZERO);
        ledger.add(shirt(Some(Size::M), 2, "10"));
        ledger.set_quantity(ProductId::new(1), Some(Size::M), 0);

        assert!(ledger.is_empty());
        assert_eq!(ledger.summary().item_count, 0);
    }

    #[test]
    fn test_remove_absent_line_is_noop() {
        let mut ledger = CartLedger::new(TaxRate::ZERO);
        ledger.add(shirt(Some(Size::M), 2, "10"));
        ledger.remove(ProductId::new(1), Some(Size::L));

        assert_eq!(ledger.lines().len(), 1);
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let mut ledger = CartLedger::new(rate("0.1"));
        ledger.add(shirt(Some(Size::M), 2, "10"));
        ledger.clear();

        assert!(ledger.is_empty());
        let summary = ledger.summary();
        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.sub_total, Decimal::ZERO);
        assert_eq!(summary.tax, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn test_cart_line_serde_roundtrip() {
        let line = shirt(Some(Size::Xxl), 2, "19.99");
        let json = serde_json::to_string(&line).unwrap();
        let parsed: CartLine = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, line);
    }

    #[test]
    fn test_from_lines_restores_summary() {
        let lines = vec![
            shirt(Some(Size::M), 2, "10"),
            shirt(Some(Size::L), 1, "15.50"),
        ];
        let ledger = CartLedger::from_lines(lines, rate("0.1"));

        assert_eq!(ledger.summary().item_count, 3);
        assert_eq!(ledger.summary().sub_total, dec("35.50"));
    }
}
