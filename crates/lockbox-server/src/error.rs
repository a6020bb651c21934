//! HTTP error types.
//!
//! Maps domain and storage errors into HTTP responses. Every error variant
//! produces a JSON body with a machine-readable `error` field and a
//! human-readable `message`. Internal causes are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lockbox_core::error::TokenError;
use lockbox_storage::StoreError;

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Missing, malformed, or invalid identity token.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The resource already exists (duplicate login).
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Client sent invalid input (wrong password, empty fields).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal error (storage failure, signing failure).
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for VaultError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, "unauthenticated", msg),
            Self::AlreadyExists(msg) => (StatusCode::CONFLICT, "already_exists", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, "invalid_argument", msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_owned(),
                )
            }
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for VaultError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists => Self::AlreadyExists("resource already exists".to_owned()),
            StoreError::NotFound => Self::NotFound("record not found".to_owned()),
            StoreError::Backend(msg) => Self::Internal(msg),
        }
    }
}

impl From<TokenError> for VaultError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Sign(msg) => Self::Internal(msg),
            TokenError::Verify(_) => Self::Unauthenticated("invalid or expired token".to_owned()),
        }
    }
}
