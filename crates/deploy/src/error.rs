//! Error types for the provisioning CLI.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while provisioning the assistant.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The management API rejected a request.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API, or the raw body when it is not JSON.
        message: String,
    },

    /// Failed to parse an API response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The webhook deployment did not answer its health check.
    #[error("webhook deployment unreachable at {url}: {reason}")]
    WebhooksUnreachable {
        /// Health check URL that was probed.
        url: String,
        /// Connection error or unexpected status.
        reason: String,
    },

    /// A local file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File the operation touched.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
