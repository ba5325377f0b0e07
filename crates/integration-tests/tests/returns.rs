//! Tests for return initiation: eligibility, duplicates, and the
//! compensation path when the order update fails after the return row is
//! created.

use axum::http::StatusCode;
use owl_shoes_integration_tests::TestContext;
use owl_shoes_store::{Filter, RecordStore};
use serde_json::json;

#[tokio::test]
async fn delivered_order_can_be_returned() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .post_json(
            "/tools/return-order",
            None,
            json!({ "order_id": "981234", "return_reason": "Wrong size" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Return initiated successfully"));
    let return_id = body["return_id"].as_str().expect("return_id").to_owned();

    // The return row holds the reason and a refund of the order total.
    let return_row = ctx
        .store
        .select_one("returns", &Filter::new().eq("order_id", "981234"))
        .await
        .expect("select")
        .expect("return row");
    assert_eq!(return_row.fields["reason"], json!("Wrong size"));
    assert_eq!(return_row.fields["status"], json!("submitted"));
    assert_eq!(return_row.fields["refund_amount"], json!(59.99));

    // The order is stamped with the return id.
    let order = ctx
        .store
        .select_one("orders", &Filter::new().eq("id", "981234"))
        .await
        .expect("select")
        .expect("order row");
    assert_eq!(order.fields["return_id"], json!(return_id));
}

#[tokio::test]
async fn pending_order_is_not_eligible() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .post_json(
            "/tools/return-order",
            None,
            json!({ "order_id": "555678", "return_reason": "Changed my mind" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["current_status"], json!("pending"));
    assert!(ctx.store.is_empty("returns").await);
}

#[tokio::test]
async fn missing_fields_are_rejected_with_one_message() {
    let ctx = TestContext::seeded().await;

    for body in [
        json!({}),
        json!({ "order_id": "981234" }),
        json!({ "return_reason": "Wrong size" }),
    ] {
        let (status, response) = ctx.post_json("/tools/return-order", None, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response["error"],
            json!("Missing required fields: order_id and return_reason")
        );
    }
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let ctx = TestContext::seeded().await;

    let (status, _) = ctx
        .post_json(
            "/tools/return-order",
            None,
            json!({ "order_id": "000000", "return_reason": "Wrong size" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn second_return_for_the_same_order_is_a_conflict() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx
        .post_json(
            "/tools/return-order",
            None,
            json!({ "order_id": "981234", "return_reason": "Wrong size" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let first_return_id = body["return_id"].clone();

    let (status, body) = ctx
        .post_json(
            "/tools/return-order",
            None,
            json!({ "order_id": "981234", "return_reason": "Still wrong size" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["existing_return_id"], first_return_id);
    assert_eq!(ctx.store.len("returns").await, 1);
}

#[tokio::test]
async fn failed_order_update_rolls_the_return_back() {
    let ctx = TestContext::seeded().await;
    ctx.store.fail_updates_on("orders").await;

    let (status, body) = ctx
        .post_json(
            "/tools/return-order",
            None,
            json!({ "order_id": "981234", "return_reason": "Wrong size" }),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().expect("error message");
    assert!(error.contains("rolled back"), "unexpected error: {error}");

    // The compensating delete removed the just-created return.
    assert!(ctx.store.is_empty("returns").await);

    // The order is untouched and a later retry can succeed.
    let order = ctx
        .store
        .select_one("orders", &Filter::new().eq("id", "981234"))
        .await
        .expect("select")
        .expect("order row");
    assert!(order.fields.get("return_id").is_none());
}
