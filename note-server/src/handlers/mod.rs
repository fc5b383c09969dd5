//! HTTP request handlers for the notewise server.

pub mod health;
pub mod note_api;
pub mod signout;
pub mod summarize;

pub use health::{health, metrics};
pub use signout::sign_out;
pub use summarize::summarize;

use axum::{Json, http::StatusCode};

use crate::error::ErrorResponse;

/// Fallback for paths this server does not serve.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
            code: "NOT_FOUND".to_string()
        })
    )
}
