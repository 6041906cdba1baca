//! Order value types and the unpaid-to-paid lifecycle.
//!
//! An [`Order`] is created unpaid from a validated cart snapshot and a
//! shipping address. Its summary is frozen at creation and the only fields
//! that ever change afterwards are the settlement fields (`is_paid`,
//! `paid_at`, `transaction_id`), which flip exactly once when the
//! reconciler confirms a matching external payment.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pikabu_core::{Gender, OrderId, ProductId, ShippingAddress, Size, UserId};

use crate::cart::{CartLine, CartSummary};

/// A cart line whose size selection is mandatory.
///
/// Orders never carry size-less lines; converting from a [`CartLine`] fails
/// with [`MissingSize`] when the shopper has not picked one yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub size: Size,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub title: String,
    pub image: String,
    pub gender: Gender,
}

impl OrderLine {
    /// Price of this line: `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A cart line reached checkout without a size selection.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("cart line for product {0} has no size selected")]
pub struct MissingSize(pub ProductId);

impl TryFrom<CartLine> for OrderLine {
    type Error = MissingSize;

    fn try_from(line: CartLine) -> Result<Self, Self::Error> {
        let size = line.size.ok_or(MissingSize(line.product_id))?;
        Ok(Self {
            product_id: line.product_id,
            size,
            quantity: line.quantity,
            unit_price: line.unit_price,
            title: line.title,
            image: line.image,
            gender: line.gender,
        })
    }
}

/// A proposed order that passed validation against authoritative prices.
///
/// Only the reconciler can build one, and its summary is always the
/// server-derived recomputation - the client-claimed summary never survives
/// into an order. Fields are read-only so the guarantee cannot be undone
/// between validation and persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedOrder {
    items: Vec<OrderLine>,
    summary: CartSummary,
}

impl PricedOrder {
    pub(crate) const fn new(items: Vec<OrderLine>, summary: CartSummary) -> Self {
        Self { items, summary }
    }

    /// The re-priced line items.
    #[must_use]
    pub fn items(&self) -> &[OrderLine] {
        &self.items
    }

    /// The server-derived summary.
    #[must_use]
    pub const fn summary(&self) -> &CartSummary {
        &self.summary
    }

    /// Freeze this priced snapshot into an unpaid [`Order`].
    ///
    /// The persistence collaborator calls this inside the same transaction
    /// that read the price snapshot, so prices cannot move between
    /// validation and the write.
    #[must_use]
    pub fn into_order(self, user: UserId, shipping_address: ShippingAddress) -> Order {
        Order {
            id: OrderId::generate(),
            user,
            items: self.items,
            shipping_address,
            summary: self.summary,
            is_paid: false,
            paid_at: None,
            transaction_id: None,
            created_at: Utc::now(),
        }
    }
}

/// A customer order.
///
/// Created unpaid; settles to paid at most once via
/// [`OrderReconciler::confirm_payment`](crate::reconciler::OrderReconciler::confirm_payment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// The one user who owns this order.
    pub user: UserId,
    pub items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    /// Frozen at creation; always server-derived.
    pub summary: CartSummary,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    /// Gateway transaction reference, set at settlement.
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Proof that an order has been settled.
///
/// Only [`OrderReconciler::confirm_payment`](crate::reconciler::OrderReconciler::confirm_payment)
/// constructs this, so holding one means the wrapped order is paid, has a
/// settlement timestamp, and carries the gateway transaction reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettledOrder(Order);

impl SettledOrder {
    pub(crate) const fn new(order: Order) -> Self {
        Self(order)
    }

    /// The settled order.
    #[must_use]
    pub const fn order(&self) -> &Order {
        &self.0
    }

    /// Unwrap into the plain [`Order`], e.g. for persistence.
    #[must_use]
    pub fn into_inner(self) -> Order {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pikabu_core::TaxRate;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn cart_line(size: Option<Size>) -> CartLine {
        CartLine {
            product_id: ProductId::new(7),
            size,
            quantity: 2,
            unit_price: dec("12.50"),
            title: "Track Pants".to_string(),
            image: "track-pants.webp".to_string(),
            gender: Gender::Men,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            address: "1 Navy Yard".to_string(),
            address2: Some("Bldg 3".to_string()),
            zip: "22201".to_string(),
            city: "Arlington".to_string(),
            country: "USA".to_string(),
            phone: "+1 555 0100".to_string(),
        }
    }

    #[test]
    fn test_order_line_requires_size() {
        let err = OrderLine::try_from(cart_line(None)).unwrap_err();
        assert_eq!(err, MissingSize(ProductId::new(7)));

        let line = OrderLine::try_from(cart_line(Some(Size::L))).unwrap();
        assert_eq!(line.size, Size::L);
        assert_eq!(line.line_total(), dec("25.00"));
    }

    #[test]
    fn test_priced_order_freezes_into_unpaid_order() {
        let line = OrderLine::try_from(cart_line(Some(Size::M))).unwrap();
        let summary = CartSummary::compute(
            &[cart_line(Some(Size::M))],
            TaxRate::new(dec("0.1")).unwrap(),
        );
        let priced = PricedOrder::new(vec![line], summary.clone());

        let order = priced.into_order(UserId::new(3), address());
        assert!(!order.is_paid);
        assert!(order.paid_at.is_none());
        assert!(order.transaction_id.is_none());
        assert_eq!(order.user, UserId::new(3));
        assert_eq!(order.summary, summary);
    }

    #[test]
    fn test_order_ids_are_unique_per_creation() {
        let line = OrderLine::try_from(cart_line(Some(Size::M))).unwrap();
        let summary = CartSummary::compute(&[cart_line(Some(Size::M))], TaxRate::ZERO);

        let a = PricedOrder::new(vec![line.clone()], summary.clone()).into_order(
            UserId::new(1),
            address(),
        );
        let b = PricedOrder::new(vec![line], summary).into_order(UserId::new(1), address());
        assert_ne!(a.id, b.id);
    }
}
