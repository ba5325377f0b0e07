//! Product catalog handler.

use axum::{Json, extract::State};
use owl_shoes_store::Filter;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /tools/products`
///
/// The full catalog, used by the assistant for recommendations. The catalog
/// is small enough to return whole; an empty catalog is a 404 so the
/// assistant tells the caller nothing is available rather than inventing
/// products.
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let records = state.store().select("products", &Filter::new(), None).await?;

    if records.is_empty() {
        return Err(AppError::NotFound(
            "No products found in the database".to_owned(),
        ));
    }

    tracing::info!(count = records.len(), "products listed");
    let products: Vec<Value> = records.into_iter().map(|r| r.fields).collect();
    Ok(Json(json!({ "products": products })))
}
