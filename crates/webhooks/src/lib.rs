//! Owl Shoes Webhooks - HTTP handlers the assistant platform calls as tools.
//!
//! Each route is a small, stateless unit: validate input, perform one or two
//! record-store operations, shape a JSON (or TwiML) response. There is no
//! shared in-process state across requests beyond the store handle itself,
//! no retries, and no caching.
//!
//! The binary lives in `main.rs`; everything else is a library so the
//! integration-tests crate can drive the router in-process against the
//! in-memory store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod voice;

pub use config::{StoreBackend, VoiceConfig, WebhooksConfig};
pub use error::AppError;
pub use state::AppState;
