//! Error types for the notewise server.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response}
};
use errors::{NoteError, ProviderError, RelayError, RelayErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for server startup.
pub type Result<T> = std::result::Result<T, ServerError>;

pub const TOO_SHORT_MESSAGE: &str = "Text must be at least 10 characters long";
pub const TOO_LONG_MESSAGE: &str = "Text exceeds maximum length of 10000 characters";
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const QUOTA_MESSAGE: &str = "Insufficient API credits. Please check your Groq account.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate summary. Please try again.";

/// Errors that stop the server from starting or serving.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Server error: {0}")]
    Server(String)
}

/// Errors returned from request handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Note(#[from] NoteError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Authentication required")]
    Unauthenticated
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

/// Error response body for HTTP endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String
}

fn relay_response(err: &RelayError) -> (StatusCode, &'static str, &'static str) {
    match err.kind() {
        RelayErrorKind::Validation => {
            let message = match err {
                RelayError::TextTooLong { .. } => TOO_LONG_MESSAGE,
                _ => TOO_SHORT_MESSAGE
            };
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
        }
        RelayErrorKind::RateLimit => (
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
            RATE_LIMIT_MESSAGE
        ),
        RelayErrorKind::Quota => (
            StatusCode::PAYMENT_REQUIRED,
            "QUOTA_EXHAUSTED",
            QUOTA_MESSAGE
        ),
        RelayErrorKind::Configuration => {
            tracing::error!(error = %err, "Summarizer is misconfigured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                GENERIC_FAILURE_MESSAGE
            )
        }
        RelayErrorKind::Upstream => {
            tracing::error!(error = %err, "Summarization failed upstream");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_ERROR",
                GENERIC_FAILURE_MESSAGE
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Relay(e) | Self::Note(NoteError::Relay(e)) => {
                let (status, code, message) = relay_response(e);
                (status, code, message.to_string())
            }
            Self::Note(NoteError::EmptyTitle | NoteError::EmptyContent) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string()
            ),
            Self::Note(NoteError::NotFound { .. }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Note not found".to_string()
            ),
            Self::Note(NoteError::Provider(ProviderError::Unauthorized { .. })) | Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Authentication required".to_string()
            ),
            Self::Note(NoteError::Provider(e)) => {
                tracing::error!(error = %e, "Provider request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    "Note storage is unavailable".to_string()
                )
            }
            Self::InvalidBody(detail) => {
                tracing::debug!(detail = %detail, "Rejected request body");
                (
                    StatusCode::BAD_REQUEST,
                    "INVALID_BODY",
                    "Invalid request body".to_string()
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string()
        };

        (status, Json(body)).into_response()
    }
}
