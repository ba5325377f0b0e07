//! Unified error handling with Sentry integration.
//!
//! Every handler is one guarded region returning `Result<T, AppError>`;
//! nothing is retried and nothing panics the invocation. Server-class errors
//! are captured to Sentry before the response is built. The response
//! convention is real HTTP status codes plus a JSON body: failures carry an
//! `error` key plus contextual keys where the caller needs them
//! (`current_status`, `existing_return_id`, `return_id`).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use owl_shoes_core::{ConfirmationError, IdentityError, ShippingStatus};
use owl_shoes_store::StoreError;
use serde_json::json;
use thiserror::Error;

use crate::voice::VoiceError;

/// Application-level error type for the webhook handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Record-store call failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Live-call update failed.
    #[error("Voice error: {0}")]
    Voice(#[from] VoiceError),

    /// Missing or malformed required input.
    #[error("{0}")]
    Validation(String),

    /// No matching record.
    #[error("{0}")]
    NotFound(String),

    /// Ambiguous match or duplicate resource.
    #[error("{message}")]
    Conflict {
        message: String,
        /// Extra keys merged into the response body (e.g.
        /// `existing_return_id`).
        extra: Option<serde_json::Value>,
    },

    /// Return requested for an order that is not delivered.
    #[error("Cannot process return - order must be in delivered status")]
    ReturnNotEligible { current_status: ShippingStatus },

    /// A return was created but the order update failed and the
    /// compensating delete failed too; the return id is surfaced so an
    /// operator can reconcile.
    #[error("Return created but failed to update order with return ID")]
    ReturnOrphaned { return_id: String, message: String },

    /// A required piece of configuration is absent at request time.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Conflict without extra body keys.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            extra: None,
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::ReturnNotEligible { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Store(_)
            | Self::Voice(_)
            | Self::ReturnOrphaned { .. }
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = match &self {
            Self::ReturnNotEligible { current_status } => json!({
                "error": self.to_string(),
                "current_status": current_status,
            }),
            Self::ReturnOrphaned { return_id, message } => json!({
                "error": self.to_string(),
                "detail": message,
                "return_id": return_id,
            }),
            Self::Conflict { message, extra } => {
                let mut body = json!({ "error": message });
                if let (Some(map), Some(extra)) = (body.as_object_mut(), extra.as_ref()) {
                    if let Some(extra) = extra.as_object() {
                        for (key, value) in extra {
                            map.insert(key.clone(), value.clone());
                        }
                    }
                }
                body
            }
            _ => json!({ "error": self.to_string() }),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ConfirmationError> for AppError {
    fn from(err: ConfirmationError) -> Self {
        match err {
            ConfirmationError::InvalidDigits => Self::Validation(err.to_string()),
            ConfirmationError::NoMatch { .. } => Self::NotFound(err.to_string()),
            ConfirmationError::Ambiguous => Self::conflict(err.to_string()),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(
            status_of(AppError::Validation("missing field".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::NotFound("no customer".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::conflict("duplicate")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::ReturnNotEligible {
                current_status: ShippingStatus::Pending
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn identity_errors_become_validation() {
        let err: AppError = IdentityError::UnrecognizedPrefix.into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn confirmation_errors_split_across_the_taxonomy() {
        assert!(matches!(
            AppError::from(ConfirmationError::InvalidDigits),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(ConfirmationError::NoMatch {
                digits: "1234".to_owned()
            }),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(ConfirmationError::Ambiguous),
            AppError::Conflict { .. }
        ));
    }
}
