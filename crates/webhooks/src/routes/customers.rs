//! Customer lookup handler and shared identity helpers.

use axum::{Json, extract::State, http::HeaderMap};
use owl_shoes_core::{Identity, IdentityError};
use owl_shoes_store::{Filter, Record, RecordStore};
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Parse the `x-identity` header out of the request headers.
pub(crate) fn identity_from_headers(headers: &HeaderMap) -> Result<Identity> {
    let header = headers
        .get("x-identity")
        .and_then(|v| v.to_str().ok())
        .ok_or(IdentityError::Missing)?;
    Ok(Identity::parse(header)?)
}

/// Look up the customer a parsed identity refers to.
pub(crate) async fn find_customer(store: &dyn RecordStore, identity: &Identity) -> Result<Record> {
    let filter = Filter::new().eq(identity.field.as_str(), identity.value.clone());
    store
        .select_one("customers", &filter)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No customer found for {}: {}",
                identity.field, identity.value
            ))
        })
}

/// `GET /tools/customer-lookup`
///
/// Resolves the `x-identity` header to a customer record so the assistant
/// can personalize the conversation.
#[instrument(skip_all)]
pub async fn lookup(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>> {
    let identity = identity_from_headers(&headers)?;
    tracing::info!(field = %identity.field, "customer lookup");

    let record = find_customer(state.store(), &identity).await?;
    Ok(Json(json!({ "customer": record.fields })))
}
