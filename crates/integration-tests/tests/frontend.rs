//! Tests for the front-end routes: customer signup and cart checkout.

use axum::http::StatusCode;
use owl_shoes_integration_tests::TestContext;
use serde_json::json;

fn signup_body() -> serde_json::Value {
    json!({
        "first_name": "Ben",
        "last_name": "Okafor",
        "email": "ben@example.com",
        "phone": "+14155550111",
        "address": "12 Pine St",
        "city": "Eugene",
        "state": "OR",
        "zip_code": "97401",
    })
}

#[tokio::test]
async fn create_customer_persists_the_record() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post_json("/front-end/create-customer", None, signup_body())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], json!("ben@example.com"));
    assert!(body["created_at"].is_string());
    assert_eq!(ctx.store.len("customers").await, 1);
}

#[tokio::test]
async fn create_customer_rejects_missing_fields_by_name() {
    let ctx = TestContext::new();
    let mut body = signup_body();
    body.as_object_mut().expect("object").remove("zip_code");

    let (status, response) = ctx.post_json("/front-end/create-customer", None, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], json!("Missing required field: zip_code"));
    assert!(ctx.store.is_empty("customers").await);
}

#[tokio::test]
async fn create_customer_with_existing_email_returns_the_existing_record() {
    let ctx = TestContext::seeded().await;
    let mut body = signup_body();
    body["email"] = json!("sarah@example.com");

    let (status, response) = ctx.post_json("/front-end/create-customer", None, body).await;

    assert_eq!(status, StatusCode::OK);
    // The original record comes back untouched; no duplicate is created.
    assert_eq!(response["first_name"], json!("Sarah"));
    assert_eq!(ctx.store.len("customers").await, 1);
}

#[tokio::test]
async fn create_order_end_to_end() {
    let ctx = TestContext::seeded().await;
    let items = json!([
        { "id": "p-200", "name": "City Loafer", "price": 59.99, "quantity": 1 }
    ]);

    let (status, body) = ctx
        .post_json(
            "/front-end/create-order",
            None,
            json!({
                "customer_id": "42",
                "items": items,
                "total_amount": 59.99,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Order created successfully"));
    assert!(body["order_id"].is_string());

    let details = &body["order_details"];
    assert_eq!(details["customer"]["name"], json!("Sarah Chen"));
    assert_eq!(
        details["customer"]["shipping_address"]["address"],
        json!("800 Oak Ave")
    );
    assert_eq!(details["customer"]["shipping_address"]["city"], json!("Portland"));
    assert_eq!(details["items"], items);
    assert_eq!(details["total_amount"], json!(59.99));

    assert_eq!(ctx.store.len("orders").await, 3);
}

#[tokio::test]
async fn create_order_accepts_a_numeric_customer_id() {
    let ctx = TestContext::seeded().await;

    let (status, _) = ctx
        .post_json(
            "/front-end/create-order",
            None,
            json!({
                "customer_id": 42,
                "items": [],
                "total_amount": 10.0,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_order_requires_all_fields() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .post_json(
            "/front-end/create-order",
            None,
            json!({ "customer_id": "42" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(ctx.store.len("orders").await, 2);
}

#[tokio::test]
async fn create_order_for_unknown_customer_is_not_found() {
    let ctx = TestContext::seeded().await;

    let (status, _) = ctx
        .post_json(
            "/front-end/create-order",
            None,
            json!({
                "customer_id": "999",
                "items": [],
                "total_amount": 10.0,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
