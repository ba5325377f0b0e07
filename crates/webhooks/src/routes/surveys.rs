//! Post-call survey handler.

use axum::{Json, extract::State, http::HeaderMap};
use chrono::Utc;
use owl_shoes_core::Survey;
use owl_shoes_store::id_value_to_string;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::routes::customers::{find_customer, identity_from_headers};
use crate::state::AppState;

/// Request body for survey submission.
#[derive(Debug, Deserialize)]
pub struct CreateSurveyRequest {
    /// Accepted as raw JSON so a missing rating and a malformed rating
    /// produce different error messages.
    rating: Option<Value>,
    feedback: Option<String>,
}

/// `POST /tools/create-survey`
///
/// Records the 1-5 rating (and optional free-text feedback) the assistant
/// collected at the end of the conversation.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateSurveyRequest>,
) -> Result<Json<Value>> {
    let identity = identity_from_headers(&headers)?;

    let rating_value = request
        .rating
        .ok_or_else(|| AppError::Validation("Rating is required".to_owned()))?;
    let rating = rating_value
        .as_u64()
        .and_then(|r| u8::try_from(r).ok())
        .filter(|r| Survey::RATING_RANGE.contains(r))
        .ok_or_else(|| {
            AppError::Validation("Rating must be a number between 1 and 5".to_owned())
        })?;

    let customer_record = find_customer(state.store(), &identity).await?;
    let customer_id = customer_record
        .fields
        .get("id")
        .and_then(id_value_to_string)
        .unwrap_or_else(|| customer_record.id.clone());

    let survey = Survey {
        id: None,
        customer_id,
        rating,
        feedback: request.feedback,
        created_at: Some(Utc::now().to_rfc3339()),
    };
    let fields = serde_json::to_value(&survey)
        .map_err(|e| AppError::Internal(format!("Failed to serialize survey: {e}")))?;

    let created = state.store().insert("surveys", fields).await?;
    tracing::info!(survey_id = %created.id, rating, "survey recorded");

    Ok(Json(json!({
        "message": "Survey submitted successfully",
        "survey_id": created.id,
    })))
}
