//! Core types for Pikabu.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod catalog;
pub mod id;
pub mod money;

pub use address::ShippingAddress;
pub use catalog::{Gender, Size};
pub use id::*;
pub use money::{TaxRate, TaxRateError, from_cents, round_to_cents, to_cents};
