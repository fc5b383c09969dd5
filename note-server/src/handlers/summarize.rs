use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::telemetry::{Telemetry, UpstreamTimer};

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// Missing or null counts as empty, which fails the length check.
    #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String
}

/// POST /api/summarize
///
/// Length is checked here before the summarizer is touched, so rejected
/// text never costs an upstream call.
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>
) -> Result<Json<SummarizeResponse>, ApiError> {
    let Json(request) = payload?;
    let text = request.text.unwrap_or_default();

    if let Err(e) = relay::validate_text(&text) {
        Telemetry::record_summarize(&e.kind().to_string());
        return Err(e.into());
    }

    let timer = UpstreamTimer::start();
    let result = state.summarizer.summarize(&text).await;
    timer.finish();

    match result {
        Ok(summary) => {
            Telemetry::record_summarize("ok");
            tracing::debug!(
                input_chars = relay::text_length(&text),
                summary_chars = summary.chars().count(),
                "Summary generated"
            );
            Ok(Json(SummarizeResponse { summary }))
        }
        Err(e) => {
            Telemetry::record_summarize(&e.kind().to_string());
            Err(e.into())
        }
    }
}
