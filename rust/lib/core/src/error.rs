use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Devices and monitoring match on these, never on the message text.

/// Stable error code constants.
///
/// Error bodies look like `{"code": "NOT_FOUND", "message": "..."}`.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_IDENTIFIER: &str = "INVALID_IDENTIFIER";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Error type shared by the resolver, the responder and the HTTP layer.
///
/// Each variant maps to a stable error code (see [`error_code`]) and an
/// HTTP status code:
///
/// ```json
/// {"code": "NOT_FOUND", "message": "no firmware for type 'sensorA'"}
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No firmware matches the lookup. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// A firmware identifier in the request path is not a number. HTTP 400.
    #[error("{0}")]
    InvalidIdentifier(String),

    /// Request input was rejected by the boundary sanitizer. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// The firmware database could not answer. HTTP 503.
    #[error("{0}")]
    StorageUnavailable(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::InvalidIdentifier(_) => error_code::INVALID_IDENTIFIER,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::StorageUnavailable(_) => error_code::STORAGE_UNAVAILABLE,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
