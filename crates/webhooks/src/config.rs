//! Webhook server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RECORD_STORE` - Which backend holds the retail tables: `airtable` or
//!   `supabase`
//! - `AIRTABLE_API_KEY` / `AIRTABLE_BASE_ID` - Airtable credentials (when
//!   `RECORD_STORE=airtable`)
//! - `SUPABASE_URL` / `SUPABASE_KEY` - Supabase project URL and service key
//!   (when `RECORD_STORE=supabase`)
//!
//! ## Optional
//! - `WEBHOOKS_HOST` - Bind address (default: 127.0.0.1)
//! - `WEBHOOKS_PORT` - Listen port (default: 3000)
//! - `ASSISTANT_ID` - Assistant resource id, interpolated into voice TwiML
//! - `TWILIO_ACCOUNT_SID` / `TWILIO_AUTH_TOKEN` - Voice API credentials for
//!   live-call transfer
//! - `FLEX_FALLBACK_NUMBER` - Number dialed when escalating to a human
//!   (default: +111-222-3333)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Webhook server configuration.
#[derive(Debug, Clone)]
pub struct WebhooksConfig {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Record-store backend selection and credentials.
    pub store: StoreBackend,
    /// Assistant resource id used by the voice entry point.
    pub assistant_id: Option<String>,
    /// Voice API credentials for live-call transfer; transfer is disabled
    /// when absent.
    pub voice: Option<VoiceConfig>,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

/// Which concrete backend holds the retail tables.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Airtable {
        api_key: SecretString,
        base_id: String,
    },
    Supabase {
        project_url: String,
        service_key: SecretString,
    },
}

/// Credentials for the telephony provider's Calls API.
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub account_sid: String,
    pub auth_token: SecretString,
    /// Number dialed when a call is escalated to a human.
    pub fallback_number: String,
}

impl WebhooksConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("WEBHOOKS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WEBHOOKS_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("WEBHOOKS_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WEBHOOKS_PORT".to_owned(), e.to_string()))?;

        Ok(Self {
            host,
            port,
            store: StoreBackend::from_env()?,
            assistant_id: get_optional_env("ASSISTANT_ID"),
            voice: VoiceConfig::from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StoreBackend {
    fn from_env() -> Result<Self, ConfigError> {
        let backend = get_required_env("RECORD_STORE")?;
        Self::from_name(&backend, |key| get_required_env(key))
    }

    /// Build a backend selection from a name and a variable lookup.
    ///
    /// Split out of [`Self::from_env`] so selection logic is testable
    /// without touching the process environment.
    fn from_name(
        name: &str,
        mut lookup: impl FnMut(&str) -> Result<String, ConfigError>,
    ) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "airtable" => Ok(Self::Airtable {
                api_key: SecretString::from(lookup("AIRTABLE_API_KEY")?),
                base_id: lookup("AIRTABLE_BASE_ID")?,
            }),
            "supabase" => Ok(Self::Supabase {
                project_url: lookup("SUPABASE_URL")?,
                service_key: SecretString::from(lookup("SUPABASE_KEY")?),
            }),
            other => Err(ConfigError::InvalidEnvVar(
                "RECORD_STORE".to_owned(),
                format!("unknown backend '{other}' (expected 'airtable' or 'supabase')"),
            )),
        }
    }
}

impl VoiceConfig {
    fn from_env() -> Option<Self> {
        Some(Self {
            account_sid: get_optional_env("TWILIO_ACCOUNT_SID")?,
            auth_token: SecretString::from(get_optional_env("TWILIO_AUTH_TOKEN")?),
            fallback_number: get_env_or_default("FLEX_FALLBACK_NUMBER", "+111-222-3333"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &HashMap<&str, &str>) -> impl FnMut(&str) -> Result<String, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| {
            vars.get(key)
                .cloned()
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
        }
    }

    #[test]
    fn selects_airtable_backend() {
        let vars = HashMap::from([("AIRTABLE_API_KEY", "key"), ("AIRTABLE_BASE_ID", "app123")]);
        let backend =
            StoreBackend::from_name("airtable", lookup_from(&vars)).expect("should select");
        assert!(matches!(backend, StoreBackend::Airtable { .. }));
    }

    #[test]
    fn selects_supabase_backend_case_insensitively() {
        let vars = HashMap::from([
            ("SUPABASE_URL", "https://proj.supabase.co"),
            ("SUPABASE_KEY", "key"),
        ]);
        let backend =
            StoreBackend::from_name("Supabase", lookup_from(&vars)).expect("should select");
        assert!(matches!(backend, StoreBackend::Supabase { .. }));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let vars = HashMap::new();
        let err = StoreBackend::from_name("dynamo", lookup_from(&vars)).expect_err("should fail");
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn missing_credentials_surface_the_variable_name() {
        let vars = HashMap::from([("AIRTABLE_API_KEY", "key")]);
        let err = StoreBackend::from_name("airtable", lookup_from(&vars)).expect_err("should fail");
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "AIRTABLE_BASE_ID"));
    }
}
