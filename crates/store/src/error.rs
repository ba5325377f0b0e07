//! Record-store error type.

use thiserror::Error;

/// Errors returned by any [`RecordStore`](crate::RecordStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend credentials or URL were malformed at construction time.
    #[error("Store configuration error: {0}")]
    Config(String),

    /// Transport-level failure talking to the backend.
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Store API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The backend answered successfully but the body was not what the
    /// adapter expected.
    #[error("Failed to decode store response: {0}")]
    Decode(String),
}
