//! Pikabu Checkout - cart ledger and order reconciliation.
//!
//! This crate holds the business rules of the checkout path:
//!
//! - [`cart`] - the client-held cart: line items merged by product and size,
//!   with a summary derived after every mutation
//! - [`order`] - order value types and the one-way unpaid-to-paid lifecycle
//! - [`reconciler`] - gatekeeping: orders are re-priced from authoritative
//!   catalog prices before creation, and settled only against a matching
//!   external payment confirmation
//! - [`config`] - checkout policy (tax rate, quantity limits) from the
//!   environment
//!
//! Everything here is synchronous and free of I/O. Collaborators resolve
//! prices, persist orders, and talk to the payment gateway; this crate only
//! judges the data they hand it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod order;
pub mod reconciler;

pub use cart::{CartLedger, CartLine, CartSummary};
pub use config::{CheckoutConfig, ConfigError, QuantityLimits};
pub use order::{MissingSize, Order, OrderLine, PricedOrder, SettledOrder};
pub use reconciler::{OrderReconciler, OrderValidationError, SettlementError};
