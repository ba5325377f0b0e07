//! Order handlers: lookup by confirmation digits, one-click ordering, and
//! return initiation.

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use chrono::Utc;
use owl_shoes_core::{
    Customer, LineItem, Order, OrderReturn, Product, ShippingStatus, confirmation, pricing,
};
use owl_shoes_store::{Filter, Record, RecordStore, id_value_to_string};
use rand::Rng;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::routes::customers::{find_customer, identity_from_headers};
use crate::state::AppState;

/// Query parameters for order lookup.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    order_confirmation_digits: Option<String>,
}

/// `GET /tools/order-lookup`
///
/// The caller confirms the last four characters of their order number; the
/// handler fetches that customer's orders and suffix-matches client-side.
/// Zero matches is a 404, more than one a 409 - ambiguity is never guessed
/// away.
#[instrument(skip_all)]
pub async fn lookup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Value>> {
    let raw_digits = query
        .order_confirmation_digits
        .ok_or_else(|| AppError::Validation("Missing order confirmation digits.".to_owned()))?;
    let digits = confirmation::normalize_digits(&raw_digits)?;
    tracing::debug!(%digits, "normalized confirmation digits");

    let identity = identity_from_headers(&headers)?;
    let filter = Filter::new().eq(identity.field.as_str(), identity.value.clone());
    let records = state.store().select("orders", &filter, None).await?;

    if records.is_empty() {
        return Err(AppError::NotFound(format!(
            "No orders found for {}: {}",
            identity.field, identity.value
        )));
    }

    let orders = records
        .iter()
        .map(Record::decode::<Order>)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let order = confirmation::match_order(&orders, &digits)?;
    tracing::info!(order_id = %order.id, "order found");

    Ok(Json(json!({
        "order": order,
        "message": "Order found successfully",
    })))
}

/// Request body for one-click ordering.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    product_id: Option<String>,
}

/// `POST /tools/place-order`
///
/// Reorders a single product for the identified customer: applies the
/// product's current discount, synthesizes a quantity-1 line item, and
/// persists a pending order under a fresh six-digit id.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<Json<Value>> {
    let identity = identity_from_headers(&headers)?;
    let product_id = request
        .product_id
        .ok_or_else(|| AppError::Validation("Missing product_id in request body".to_owned()))?;

    let customer_record = find_customer(state.store(), &identity).await?;
    let customer: Customer = customer_record.decode()?;
    let customer_id = customer
        .id
        .clone()
        .unwrap_or_else(|| customer_record.id.clone());

    let product_record = state
        .store()
        .select_one("products", &Filter::new().eq("id", product_id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No product found with id: {product_id}")))?;
    let product: Product = product_record.decode()?;

    let final_price = pricing::apply_discount_field(product.price, product.current_discount.as_ref());

    let line_item = LineItem {
        id: product.id.clone(),
        name: product.name.clone(),
        price: final_price,
        quantity: 1,
        image_url: product.image_url.clone(),
        size: product.size.clone(),
        color: product.color.clone(),
        category: product.category.clone(),
        brand: product.brand.clone(),
    };
    let items = serde_json::to_string(&vec![line_item])
        .map_err(|e| AppError::Internal(format!("Failed to serialize line items: {e}")))?;

    let order_id = rand::rng().random_range(100_000..1_000_000).to_string();
    let order = Order {
        id: order_id.clone(),
        customer_id,
        email: Some(customer.email.clone()),
        phone: Some(customer.phone.clone()),
        items: Some(items),
        total_amount: final_price,
        shipping_status: ShippingStatus::Pending,
        return_id: None,
        created_at: Some(Utc::now().to_rfc3339()),
    };
    let fields = serde_json::to_value(&order)
        .map_err(|e| AppError::Internal(format!("Failed to serialize order: {e}")))?;

    state.store().insert("orders", fields).await?;
    tracing::info!(%order_id, product_id = %product.id, "order placed");

    Ok(Json(json!({
        "message": "Order created successfully",
        "order_id": order_id,
        "order_details": {
            "customer": {
                "name": customer.full_name(),
                "email": customer.email,
                "shipping_address": {
                    "address": customer.address,
                    "city": customer.city,
                    "state": customer.state,
                    "zip_code": customer.zip_code,
                },
            },
            "product": {
                "name": product.name,
                "price": final_price,
                "original_price": product.price,
                "discount_applied": product.current_discount.unwrap_or_else(|| json!("0")),
            },
        },
    })))
}

/// Request body for return initiation.
#[derive(Debug, Deserialize)]
pub struct ReturnRequest {
    order_id: Option<String>,
    return_reason: Option<String>,
}

/// `POST /tools/return-order`
///
/// Two dependent writes: insert the Return, then stamp its id onto the
/// Order. Neither backend offers a transaction across its REST surface, so
/// a failed order update is compensated by deleting the just-created
/// Return; only if that delete also fails is the inconsistency surfaced
/// (with the return id, for manual reconciliation).
#[instrument(skip_all)]
pub async fn initiate_return(
    State(state): State<AppState>,
    Json(request): Json<ReturnRequest>,
) -> Result<Json<Value>> {
    let (Some(order_id), Some(return_reason)) = (request.order_id, request.return_reason) else {
        return Err(AppError::Validation(
            "Missing required fields: order_id and return_reason".to_owned(),
        ));
    };

    let order_record = state
        .store()
        .select_one("orders", &Filter::new().eq("id", order_id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No order found with ID: {order_id}")))?;
    let order: Order = order_record.decode()?;

    if order.shipping_status != ShippingStatus::Delivered {
        return Err(AppError::ReturnNotEligible {
            current_status: order.shipping_status,
        });
    }

    // Check-then-insert: racy under concurrent requests, same as the store's
    // own uniqueness story (none).
    if let Some(existing) = state
        .store()
        .select_one("returns", &Filter::new().eq("order_id", order.id.clone()))
        .await?
    {
        let existing_id = existing
            .fields
            .get("id")
            .and_then(id_value_to_string)
            .unwrap_or(existing.id);
        return Err(AppError::Conflict {
            message: "Return already exists for this order".to_owned(),
            extra: Some(json!({ "existing_return_id": existing_id })),
        });
    }

    let now = Utc::now().to_rfc3339();
    let order_return = OrderReturn {
        id: None,
        order_id: order.id.clone(),
        customer_id: order.customer_id.clone(),
        reason: return_reason,
        status: "submitted".to_owned(),
        refund_amount: order.total_amount,
        created_at: Some(now.clone()),
        updated_at: Some(now),
    };
    let fields = serde_json::to_value(&order_return)
        .map_err(|e| AppError::Internal(format!("Failed to serialize return: {e}")))?;

    let created = state.store().insert("returns", fields).await?;
    let return_id = created
        .fields
        .get("id")
        .and_then(id_value_to_string)
        .unwrap_or_else(|| created.id.clone());

    if let Err(update_err) = state
        .store()
        .update("orders", &order_record.id, json!({ "return_id": return_id }))
        .await
    {
        tracing::warn!(
            order_id = %order.id,
            %return_id,
            error = %update_err,
            "order update failed after return creation, compensating"
        );

        if let Err(delete_err) = state.store().delete("returns", &created.id).await {
            tracing::error!(
                %return_id,
                error = %delete_err,
                "compensating delete failed, return is orphaned"
            );
            return Err(AppError::ReturnOrphaned {
                return_id,
                message: update_err.to_string(),
            });
        }

        return Err(AppError::Internal(format!(
            "Failed to update order with return ID; the return was rolled back: {update_err}"
        )));
    }

    tracing::info!(order_id = %order.id, %return_id, "return initiated");
    Ok(Json(json!({
        "message": "Return initiated successfully",
        "return_id": return_id,
        "status": "success",
    })))
}
