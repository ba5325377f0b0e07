//! Telephony handlers: the inbound-call entry point and live-call transfer.

use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use owl_shoes_core::Customer;
use owl_shoes_store::Filter;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::voice::{
    connect_assistant_twiml, escalation_twiml, parse_voice_call_sid, welcome_greeting,
};

/// Inbound call webhook parameters (form-encoded by the telephony provider).
#[derive(Debug, Deserialize)]
pub struct IncomingCallForm {
    #[serde(rename = "From")]
    from: Option<String>,
}

/// `POST /channels/voice/incoming-call`
///
/// Answers every inbound call with TwiML connecting the assistant. Known
/// callers get a personalized greeting; everything else - unknown numbers,
/// store outages, missing configuration - falls back to the generic
/// greeting. The caller never hears an error.
#[instrument(skip_all)]
pub async fn incoming_call(
    State(state): State<AppState>,
    Form(form): Form<IncomingCallForm>,
) -> Response {
    let assistant_id = state.config().assistant_id.clone().unwrap_or_default();

    let first_name = match caller_first_name(&state, form.from.as_deref()).await {
        Ok(name) => name,
        Err(err) => {
            tracing::error!(error = %err, "caller lookup failed, using generic greeting");
            None
        }
    };

    let greeting = welcome_greeting(first_name.as_deref());
    let twiml = connect_assistant_twiml(&assistant_id, &greeting);
    xml_response(twiml)
}

/// Resolve the caller's first name from the customers table, if the number
/// is known.
async fn caller_first_name(state: &AppState, from: Option<&str>) -> Result<Option<String>> {
    let Some(phone) = from else {
        return Err(AppError::Validation(
            "No caller phone number provided".to_owned(),
        ));
    };

    let record = state
        .store()
        .select_one("customers", &Filter::new().eq("phone", phone))
        .await?;

    Ok(record
        .and_then(|r| r.decode::<Customer>().ok())
        .map(|c| c.first_name))
}

fn xml_response(twiml: String) -> Response {
    ([(header::CONTENT_TYPE, "text/xml")], twiml).into_response()
}

/// `GET /tools/send-to-flex`
///
/// Escalates the live call to a human: rewrites the call's TwiML to speak
/// an escalation message and dial the fallback number. Only voice sessions
/// can be transferred.
#[instrument(skip_all)]
pub async fn transfer(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>> {
    let session_id = headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Validation("Missing x-session-id header".to_owned()))?;

    let call_sid = parse_voice_call_sid(session_id).ok_or_else(|| {
        AppError::Validation("Invalid session type. Only voice sessions are handled.".to_owned())
    })?;

    let voice = state.voice().ok_or_else(|| {
        AppError::Config("Voice credentials are not configured; cannot transfer calls".to_owned())
    })?;

    let fallback = state
        .config()
        .voice
        .as_ref()
        .map_or("+111-222-3333", |v| v.fallback_number.as_str());

    voice
        .update_call(call_sid, &escalation_twiml(fallback))
        .await?;
    tracing::info!(%call_sid, "call transferred to human agent");

    Ok(Json(json!({ "message": "Call forwarded" })))
}
