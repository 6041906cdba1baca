//! Pikabu Core - Shared types library.
//!
//! This crate provides common types used across all Pikabu components:
//! - `checkout` - Cart ledger and order reconciliation logic
//! - the (external) storefront and admin services that persist and render
//!   the values defined here
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money helpers, catalog
//!   enums, and the shipping address

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
