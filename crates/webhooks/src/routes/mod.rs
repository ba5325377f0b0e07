//! HTTP route handlers for the assistant's tools.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//!
//! # Assistant tools
//! GET  /tools/customer-lookup         - Resolve the caller to a customer
//! GET  /tools/order-lookup            - Find an order by confirmation digits
//! GET  /tools/products                - Product catalog
//! POST /tools/place-order             - One-click reorder of a product
//! POST /tools/return-order            - Initiate a return for a delivered order
//! POST /tools/create-survey           - Record the post-call survey
//! GET  /tools/send-to-flex            - Escalate the live call to a human
//!
//! # Front-end (demo web shop)
//! POST /front-end/create-customer     - Create (or fetch) a customer by email
//! POST /front-end/create-order        - Create an order from a cart
//!
//! # Telephony
//! POST /channels/voice/incoming-call  - Inbound call entry point (TwiML)
//! ```
//!
//! # Response convention
//!
//! Real HTTP status codes, JSON bodies. Success bodies carry a payload key
//! (`customer`, `order`, `products`, `order_details`) and a `message` where
//! one exists; failures carry `error` plus contextual keys (see
//! [`crate::error::AppError`]). The voice entry point is the one exception:
//! it always answers 200 with TwiML, even on internal failure.

pub mod customers;
pub mod frontend;
pub mod orders;
pub mod products;
pub mod surveys;
pub mod voice;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Create the assistant tool routes router.
fn tool_routes() -> Router<AppState> {
    Router::new()
        .route("/customer-lookup", get(customers::lookup))
        .route("/order-lookup", get(orders::lookup))
        .route("/products", get(products::list))
        .route("/place-order", post(orders::place))
        .route("/return-order", post(orders::initiate_return))
        .route("/create-survey", post(surveys::create))
        .route("/send-to-flex", get(voice::transfer))
}

/// Create the front-end routes router.
fn frontend_routes() -> Router<AppState> {
    Router::new()
        .route("/create-customer", post(frontend::create_customer))
        .route("/create-order", post(frontend::create_order))
}

/// Create the telephony routes router.
fn voice_routes() -> Router<AppState> {
    Router::new().route("/incoming-call", post(voice::incoming_call))
}

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/tools", tool_routes())
        .nest("/front-end", frontend_routes())
        .nest("/channels/voice", voice_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
