//! Owl Shoes Core - Shared domain types and pure helpers.
//!
//! This crate provides the pieces shared by the webhook handlers and the
//! provisioning CLI:
//! - [`identity`] - Parsing of the `x-identity` request header
//! - [`confirmation`] - Order-confirmation digit normalization and matching
//! - [`pricing`] - Discount-aware price computation
//! - [`records`] - Serde structs for the external record-store tables
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Everything that talks to the outside world lives in the `store`,
//! `webhooks`, and `deploy` crates.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod confirmation;
pub mod identity;
pub mod pricing;
pub mod records;

pub use confirmation::{ConfirmationError, match_order, normalize_digits};
pub use identity::{Identity, IdentityError, LookupField};
pub use records::*;
