//! End-to-end handler tests for the Owl Shoes webhooks.
//!
//! Tests drive the full axum router in-process with `tower::ServiceExt::
//! oneshot` against the in-memory record store, so they need no network, no
//! external store, and no running server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p owl-shoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `tool_handlers` - Assistant tool routes (lookup, order, survey)
//! - `returns` - Return eligibility, duplicates, and compensation
//! - `frontend` - Web-shop signup and checkout
//! - `voice` - Inbound-call TwiML and live-call transfer

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use owl_shoes_store::MemoryStore;
use owl_shoes_webhooks::{
    AppState, routes,
    config::{StoreBackend, WebhooksConfig},
};

/// Identity header for the seeded customer, by email.
pub const SARAH_EMAIL_IDENTITY: &str = "email:sarah@example.com";

/// Identity header for the seeded customer, by phone.
pub const SARAH_PHONE_IDENTITY: &str = "phone:+14155550100";

/// A router wired to a fresh in-memory store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    router: Router,
}

impl TestContext {
    /// Empty store, no voice credentials.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::with_parts(test_config(), store.clone(), None);
        let router = routes::router(state);
        Self { store, router }
    }

    /// Store seeded with one customer, three products, and two orders
    /// (one delivered, one pending).
    pub async fn seeded() -> Self {
        let ctx = Self::new();

        ctx.store
            .seed(
                "customers",
                vec![json!({
                    "id": "42",
                    "first_name": "Sarah",
                    "last_name": "Chen",
                    "email": "sarah@example.com",
                    "phone": "+14155550100",
                    "address": "800 Oak Ave",
                    "city": "Portland",
                    "state": "OR",
                    "zip_code": "97201",
                })],
            )
            .await;

        ctx.store
            .seed(
                "products",
                vec![
                    json!({
                        "id": "p-100",
                        "name": "Trail Runner 5",
                        "price": 100.0,
                        "size": "10",
                        "color": "Moss",
                        "category": "running",
                        "brand": "Owl Shoes",
                        "current_discount": "20",
                    }),
                    json!({
                        "id": "p-200",
                        "name": "City Loafer",
                        "price": 59.99,
                        "brand": "Owl Shoes",
                    }),
                    json!({
                        "id": "p-300",
                        "name": "Court Classic",
                        "price": 100.0,
                        "brand": "Owl Shoes",
                        "current_discount": "abc",
                    }),
                ],
            )
            .await;

        let items = json!([{
            "id": "p-200",
            "name": "City Loafer",
            "price": 59.99,
            "quantity": 1,
        }]);
        ctx.store
            .seed(
                "orders",
                vec![
                    json!({
                        "id": "981234",
                        "customer_id": "42",
                        "email": "sarah@example.com",
                        "phone": "+14155550100",
                        "items": items.to_string(),
                        "total_amount": 59.99,
                        "shipping_status": "delivered",
                    }),
                    json!({
                        "id": "555678",
                        "customer_id": "42",
                        "email": "sarah@example.com",
                        "phone": "+14155550100",
                        "total_amount": 100.0,
                        "shipping_status": "pending",
                    }),
                ],
            )
            .await;

        ctx
    }

    /// GET a route, optionally with an `x-identity` header.
    pub async fn get(&self, path: &str, identity: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(identity) = identity {
            builder = builder.header("x-identity", identity);
        }
        let request = builder.body(Body::empty()).expect("request");
        self.send_json(request).await
    }

    /// GET a route with an `x-session-id` header (transfer tool).
    pub async fn get_with_session(&self, path: &str, session_id: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header("x-session-id", session_id)
            .body(Body::empty())
            .expect("request");
        self.send_json(request).await
    }

    /// POST a JSON body, optionally with an `x-identity` header.
    pub async fn post_json(
        &self,
        path: &str,
        identity: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(identity) = identity {
            builder = builder.header("x-identity", identity);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send_json(request).await
    }

    /// POST a form body and return the raw response text (TwiML routes).
    pub async fn post_form(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .expect("request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, body)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config() -> WebhooksConfig {
    WebhooksConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        store: StoreBackend::Airtable {
            api_key: SecretString::from("test-key"),
            base_id: "appTEST".to_owned(),
        },
        assistant_id: Some("aia_test".to_owned()),
        voice: None,
        sentry_dsn: None,
    }
}
