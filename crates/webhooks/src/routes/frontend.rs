//! Front-end handlers backing the demo web shop: customer signup and cart
//! checkout.

use axum::{Json, extract::State};
use chrono::Utc;
use owl_shoes_core::Customer;
use owl_shoes_store::{Filter, id_value_to_string};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Fields the create-customer form must supply.
const REQUIRED_CUSTOMER_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "phone",
    "address",
    "city",
    "state",
    "zip_code",
];

/// `POST /front-end/create-customer`
///
/// Lookup-before-insert keyed on email: signing up twice hands back the
/// existing record instead of creating a duplicate. (Uniqueness is not a
/// store constraint; concurrent signups can still race.)
#[instrument(skip_all)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    for field in REQUIRED_CUSTOMER_FIELDS {
        let present = body
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|v| !v.is_empty());
        if !present {
            return Err(AppError::Validation(format!(
                "Missing required field: {field}"
            )));
        }
    }

    let mut customer: Customer = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid customer payload: {e}")))?;

    let existing = state
        .store()
        .select_one("customers", &Filter::new().eq("email", customer.email.clone()))
        .await?;
    if let Some(record) = existing {
        tracing::info!(email = %customer.email, "customer already exists");
        return Ok(Json(record.fields));
    }

    customer.id = None;
    customer.created_at = Some(Utc::now().to_rfc3339());
    let fields = serde_json::to_value(&customer)
        .map_err(|e| AppError::Internal(format!("Failed to serialize customer: {e}")))?;

    let created = state.store().insert("customers", fields).await?;
    tracing::info!(customer_id = %created.id, "customer created");
    Ok(Json(created.fields))
}

/// Request body for cart checkout.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// String or numeric id, depending on the backend.
    customer_id: Option<Value>,
    items: Option<Value>,
    total_amount: Option<Decimal>,
}

/// `POST /front-end/create-order`
///
/// Persists a cart as a pending order and echoes the customer's name and
/// shipping address back for the confirmation page.
#[instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<Value>> {
    let (Some(customer_id), Some(items), Some(total_amount)) = (
        request.customer_id.as_ref().and_then(id_value_to_string),
        request.items,
        request.total_amount,
    ) else {
        return Err(AppError::Validation(
            "Missing required fields: customer_id, items, or total_amount".to_owned(),
        ));
    };

    let customer_record = state
        .store()
        .select_one("customers", &Filter::new().eq("id", customer_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_owned()))?;
    let customer: Customer = customer_record.decode()?;
    let customer_id = customer
        .id
        .clone()
        .unwrap_or_else(|| customer_record.id.clone());

    let fields = json!({
        "customer_id": customer_id,
        "email": customer.email,
        "phone": customer.phone,
        // The spreadsheet backend cannot hold nested objects.
        "items": items.to_string(),
        "total_amount": total_amount,
        "shipping_status": "pending",
        "created_at": Utc::now().to_rfc3339(),
    });

    let created = state.store().insert("orders", fields).await?;
    let order_id = created
        .fields
        .get("id")
        .and_then(id_value_to_string)
        .unwrap_or_else(|| created.id.clone());
    tracing::info!(%order_id, "order created");

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
            "items": items,
            "total_amount": total_amount,
        },
    })))
}
