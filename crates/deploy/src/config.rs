//! Provisioning configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TWILIO_ACCOUNT_SID` / `TWILIO_AUTH_TOKEN` - Management API credentials
//! - `WEBHOOK_BASE_URL` - Public base URL of the webhook server; every tool
//!   URL is registered under it
//!
//! ## Optional
//! - `ASSISTANT_NAME` - Assistant display name (default: "Retail Demo
//!   Assistant - Owl Shoes")
//! - `ASSISTANT_PROMPT_PATH` - Personality prompt file (default:
//!   `prompts/assistant-prompt.md`)
//! - `INTELLIGENCE_UNIQUE_NAME` - Unique name for the call-analytics service
//!   (default: `ai-assistant-owl-shoes`)
//! - `DEPLOY_ENV_FILE` - Env file the pipeline writes resource ids back into
//!   (default: `.env`)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use crate::error::DeployError;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Provisioning configuration.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Management API account SID.
    pub account_sid: String,
    /// Management API auth token.
    pub auth_token: SecretString,
    /// Public base URL of the webhook server, without a trailing slash.
    pub webhook_base_url: String,
    /// Assistant display name; also the idempotency key for reruns.
    pub assistant_name: String,
    /// Path to the personality prompt file.
    pub prompt_path: PathBuf,
    /// Unique name for the call-analytics service.
    pub intelligence_unique_name: String,
    /// Env file to persist resource ids into.
    pub env_file: PathBuf,
}

impl DeployConfig {
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

        let webhook_base_url = get_required_env("WEBHOOK_BASE_URL")?;
        if !webhook_base_url.starts_with("http://") && !webhook_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidEnvVar(
                "WEBHOOK_BASE_URL".to_owned(),
                format!("'{webhook_base_url}' is not an http(s) URL"),
            ));
        }

        Ok(Self {
            account_sid: get_required_env("TWILIO_ACCOUNT_SID")?,
            auth_token: SecretString::from(get_required_env("TWILIO_AUTH_TOKEN")?),
            webhook_base_url: webhook_base_url.trim_end_matches('/').to_owned(),
            assistant_name: get_env_or_default("ASSISTANT_NAME", "Retail Demo Assistant - Owl Shoes"),
            prompt_path: PathBuf::from(get_env_or_default(
                "ASSISTANT_PROMPT_PATH",
                "prompts/assistant-prompt.md",
            )),
            intelligence_unique_name: get_env_or_default(
                "INTELLIGENCE_UNIQUE_NAME",
                "ai-assistant-owl-shoes",
            ),
            env_file: PathBuf::from(get_env_or_default("DEPLOY_ENV_FILE", ".env")),
        })
    }

    /// Read the personality prompt from [`Self::prompt_path`].
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Io` if the prompt file cannot be read.
    pub fn personality_prompt(&self) -> Result<String, DeployError> {
        std::fs::read_to_string(&self.prompt_path).map_err(|source| DeployError::Io {
            path: self.prompt_path.display().to_string(),
            source,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
