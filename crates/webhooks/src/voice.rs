//! TwiML construction and the Calls API client for live-call transfer.
//!
//! The voice entry point answers every inbound call with a `<Connect>` to
//! the assistant resource; the transfer tool rewrites a live call's TwiML to
//! speak an escalation message and dial a human. Greeting text is
//! interpolated into XML attribute position, so values are escaped.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;

use crate::config::VoiceConfig;

const CALLS_API_URL: &str = "https://api.twilio.com/2010-04-01";
const ASSISTANT_VOICE: &str = "en-US-Journey-O";

/// Errors from the Calls API.
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Calls API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Calls API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Escape a string for XML attribute or text position.
#[must_use]
pub fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// The welcome greeting, personalized when the caller is a known customer.
#[must_use]
pub fn welcome_greeting(first_name: Option<&str>) -> String {
    match first_name {
        Some(name) => format!("Hi {name}, thanks for calling Owl Shoes, How can I help you?"),
        None => "Thanks for calling Owl Shoes, How can I help you?".to_owned(),
    }
}

/// TwiML connecting the caller to the assistant with a greeting.
#[must_use]
pub fn connect_assistant_twiml(assistant_id: &str, greeting: &str) -> String {
    format!(
        "<Response><Connect><Assistant id=\"{}\" welcomeGreeting=\"{}\" voice=\"{ASSISTANT_VOICE}\"></Assistant></Connect></Response>",
        xml_escape(assistant_id),
        xml_escape(greeting),
    )
}

/// TwiML that announces escalation and dials the fallback number.
#[must_use]
pub fn escalation_twiml(fallback_number: &str) -> String {
    format!(
        "<Response><Say>Escalating to a human agent.</Say><Dial>{}</Dial></Response>",
        xml_escape(fallback_number),
    )
}

/// Extract the call SID from an `x-session-id` header.
///
/// Voice sessions are formatted `voice:<call-sid>/<suffix>`; any other kind
/// of session returns `None`.
#[must_use]
pub fn parse_voice_call_sid(session_id: &str) -> Option<&str> {
    let rest = session_id.strip_prefix("voice:")?;
    let sid = rest.split('/').next().unwrap_or(rest);
    if sid.is_empty() { None } else { Some(sid) }
}

/// Minimal Calls API client: only the live-call TwiML update is needed.
pub struct VoiceClient {
    client: reqwest::Client,
    account_sid: String,
    auth_token: SecretString,
}

impl VoiceClient {
    /// Create a client from voice credentials.
    #[must_use]
    pub fn new(config: &VoiceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
        }
    }

    /// Replace a live call's TwiML.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Api`] when the Calls API rejects the update
    /// (e.g. the call has already ended).
    #[instrument(skip(self, twiml), fields(call_sid = %call_sid))]
    pub async fn update_call(&self, call_sid: &str, twiml: &str) -> Result<(), VoiceError> {
        let url = format!(
            "{CALLS_API_URL}/Accounts/{}/Calls/{call_sid}.json",
            self.account_sid
        );

        let response = self
            .client
            .post(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&[("Twiml", twiml)])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_else(|e| e.to_string());
        Err(VoiceError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
