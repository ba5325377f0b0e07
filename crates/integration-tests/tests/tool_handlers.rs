//! Tests for the assistant tool routes: customer lookup, order lookup,
//! product inventory, place-order, and survey submission.

use axum::http::StatusCode;
use owl_shoes_integration_tests::{SARAH_EMAIL_IDENTITY, SARAH_PHONE_IDENTITY, TestContext};
use serde_json::json;

// ============================================================================
// Customer lookup
// ============================================================================

#[tokio::test]
async fn customer_lookup_resolves_email_identity() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .get("/tools/customer-lookup", Some(SARAH_EMAIL_IDENTITY))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["first_name"], json!("Sarah"));
    assert_eq!(body["customer"]["email"], json!("sarah@example.com"));
}

#[tokio::test]
async fn customer_lookup_resolves_phone_and_whatsapp_identities() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .get("/tools/customer-lookup", Some(SARAH_PHONE_IDENTITY))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["last_name"], json!("Chen"));

    // whatsapp identities resolve through the phone column
    let (status, body) = ctx
        .get("/tools/customer-lookup", Some("whatsapp:+14155550100"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["last_name"], json!("Chen"));
}

#[tokio::test]
async fn customer_lookup_without_identity_header_is_rejected() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx.get("/tools/customer-lookup", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn customer_lookup_rejects_unrecognized_identity_prefix() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .get("/tools/customer-lookup", Some("telegram:@sarah"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn customer_lookup_unknown_customer_is_not_found() {
    let ctx = TestContext::seeded().await;

    let (status, _) = ctx
        .get("/tools/customer-lookup", Some("email:nobody@example.com"))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Product inventory
// ============================================================================

#[tokio::test]
async fn products_lists_the_catalog() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx.get("/tools/products", None).await;

    assert_eq!(status, StatusCode::OK);
    let products = body["products"].as_array().expect("products array");
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn empty_catalog_is_not_found() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/tools/products", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("No products found in the database"));
}

// ============================================================================
// Order lookup
// ============================================================================

#[tokio::test]
async fn order_lookup_matches_on_last_four_digits() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .get(
            "/tools/order-lookup?order_confirmation_digits=1234",
            Some(SARAH_EMAIL_IDENTITY),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["id"], json!("981234"));
    assert_eq!(body["message"], json!("Order found successfully"));
}

#[tokio::test]
async fn order_lookup_normalizes_noisy_digits() {
    let ctx = TestContext::seeded().await;

    // Whitespace and punctuation around the digits are stripped; longer
    // strings are cut down to their last four characters.
    let (status, body) = ctx
        .get(
            "/tools/order-lookup?order_confirmation_digits=%20981234%20",
            Some(SARAH_EMAIL_IDENTITY),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["id"], json!("981234"));
}

#[tokio::test]
async fn order_lookup_with_no_match_is_not_found() {
    let ctx = TestContext::seeded().await;

    let (status, _) = ctx
        .get(
            "/tools/order-lookup?order_confirmation_digits=0000",
            Some(SARAH_EMAIL_IDENTITY),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_lookup_with_multiple_matches_is_a_conflict() {
    let ctx = TestContext::seeded().await;
    ctx.store
        .seed(
            "orders",
            vec![json!({
                "id": "771234",
                "customer_id": "42",
                "email": "sarah@example.com",
                "total_amount": 30.0,
                "shipping_status": "shipped",
            })],
        )
        .await;

    let (status, _) = ctx
        .get(
            "/tools/order-lookup?order_confirmation_digits=1234",
            Some(SARAH_EMAIL_IDENTITY),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn order_lookup_requires_digits() {
    let ctx = TestContext::seeded().await;

    let (status, _) = ctx
        .get("/tools/order-lookup", Some(SARAH_EMAIL_IDENTITY))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_lookup_only_sees_the_callers_orders() {
    let ctx = TestContext::seeded().await;
    // Another customer's order with the same trailing digits must not match
    // or make the caller's lookup ambiguous.
    ctx.store
        .seed(
            "customers",
            vec![json!({
                "id": "43",
                "first_name": "Ben",
                "last_name": "Okafor",
                "email": "ben@example.com",
                "phone": "+14155550111",
                "address": "12 Pine St",
                "city": "Eugene",
                "state": "OR",
                "zip_code": "97401",
            })],
        )
        .await;
    ctx.store
        .seed(
            "orders",
            vec![json!({
                "id": "111234",
                "customer_id": "43",
                "email": "ben@example.com",
                "total_amount": 45.0,
                "shipping_status": "delivered",
            })],
        )
        .await;

    let (status, body) = ctx
        .get(
            "/tools/order-lookup?order_confirmation_digits=1234",
            Some(SARAH_EMAIL_IDENTITY),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["id"], json!("981234"));
}

// ============================================================================
// Place order
// ============================================================================

#[tokio::test]
async fn place_order_applies_a_numeric_discount() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .post_json(
            "/tools/place-order",
            Some(SARAH_EMAIL_IDENTITY),
            json!({ "product_id": "p-100" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let product = &body["order_details"]["product"];
    assert_eq!(product["price"], json!(80.0));
    assert_eq!(product["original_price"], json!(100.0));
    assert_eq!(product["discount_applied"], json!("20"));
    assert!(body["order_id"].is_string());
    assert_eq!(ctx.store.len("orders").await, 3);
}

#[tokio::test]
async fn place_order_ignores_a_non_numeric_discount() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .post_json(
            "/tools/place-order",
            Some(SARAH_EMAIL_IDENTITY),
            json!({ "product_id": "p-300" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_details"]["product"]["price"], json!(100.0));
}

#[tokio::test]
async fn place_order_echoes_the_shipping_address() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .post_json(
            "/tools/place-order",
            Some(SARAH_EMAIL_IDENTITY),
            json!({ "product_id": "p-200" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let customer = &body["order_details"]["customer"];
    assert_eq!(customer["name"], json!("Sarah Chen"));
    assert_eq!(customer["shipping_address"]["address"], json!("800 Oak Ave"));
    assert_eq!(customer["shipping_address"]["zip_code"], json!("97201"));
}

#[tokio::test]
async fn place_order_requires_a_product_id() {
    let ctx = TestContext::seeded().await;

    let (status, _) = ctx
        .post_json("/tools/place-order", Some(SARAH_EMAIL_IDENTITY), json!({}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn place_order_with_unknown_product_is_not_found() {
    let ctx = TestContext::seeded().await;

    let (status, _) = ctx
        .post_json(
            "/tools/place-order",
            Some(SARAH_EMAIL_IDENTITY),
            json!({ "product_id": "p-999" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Customer survey
// ============================================================================

#[tokio::test]
async fn survey_records_rating_and_feedback() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .post_json(
            "/tools/create-survey",
            Some(SARAH_EMAIL_IDENTITY),
            json!({ "rating": 5, "feedback": "Quick and friendly" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Survey submitted successfully"));
    assert!(body["survey_id"].is_string());
    assert_eq!(ctx.store.len("surveys").await, 1);
}

#[tokio::test]
async fn survey_requires_a_rating() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .post_json(
            "/tools/create-survey",
            Some(SARAH_EMAIL_IDENTITY),
            json!({ "feedback": "no rating given" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Rating is required"));
}

#[tokio::test]
async fn survey_rejects_out_of_range_and_non_numeric_ratings() {
    let ctx = TestContext::seeded().await;

    for rating in [json!(0), json!(9), json!("five")] {
        let (status, body) = ctx
            .post_json(
                "/tools/create-survey",
                Some(SARAH_EMAIL_IDENTITY),
                json!({ "rating": rating }),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            json!("Rating must be a number between 1 and 5")
        );
    }
    assert!(ctx.store.is_empty("surveys").await);
}
