use async_trait::async_trait;
use config::RelayConfig;
use errors::RelayError;
use note_core::Summarizer;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::schema::{ChatCompletionRequest, ChatCompletionResponse};
use crate::validation::validate_text;

/// Upstream error bodies are logged, but only this much of them.
const MAX_LOGGED_BODY: usize = 512;

/// Single-shot client for an OpenAI-compatible chat-completions endpoint.
///
/// The underlying `reqwest::Client` pools connections and is cheap to clone;
/// build one relay at startup and share it.
#[derive(Clone)]
pub struct ChatCompletionRelay {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String
}

impl std::fmt::Debug for ChatCompletionRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionRelay")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .finish()
    }
}

impl ChatCompletionRelay {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| RelayError::Configuration {
                message: format!("failed to build HTTP client: {e}")
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone()
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validates `text`, issues one upstream call and returns the trimmed
    /// summary.
    pub async fn summarize(&self, text: &str) -> Result<String, RelayError> {
        validate_text(text)?;

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RelayError::Configuration {
                message: "summarization API key not configured".to_string()
            })?;

        let request = ChatCompletionRequest::summarize(&self.model, text);
        debug!(endpoint = %self.endpoint, model = %self.model, "Requesting summary");

        let started = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %truncate(&body, MAX_LOGGED_BODY),
                "Summarization API returned an error"
            );
            return Err(classify_status(status));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        let envelope: ChatCompletionResponse =
            serde_json::from_slice(&bytes).map_err(|e| RelayError::MalformedResponse {
                reason: format!("invalid JSON: {e}")
            })?;
        let summary = envelope.into_summary()?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            summary_chars = summary.chars().count(),
            "Summary generated"
        );
        Ok(summary)
    }
}

#[async_trait]
impl Summarizer for ChatCompletionRelay {
    async fn summarize(&self, text: &str) -> Result<String, RelayError> {
        ChatCompletionRelay::summarize(self, text).await
    }
}

fn classify_status(status: StatusCode) -> RelayError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => RelayError::RateLimited,
        StatusCode::PAYMENT_REQUIRED => RelayError::QuotaExhausted,
        other => RelayError::UpstreamStatus {
            status: other.as_u16()
        }
    }
}

fn transport_error(e: reqwest::Error) -> RelayError {
    let reason = if e.is_timeout() {
        "request timed out".to_string()
    } else {
        e.to_string()
    };
    RelayError::Transport { reason }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            RelayError::RateLimited
        );
        assert_eq!(
            classify_status(StatusCode::PAYMENT_REQUIRED),
            RelayError::QuotaExhausted
        );
        assert_eq!(
            classify_status(StatusCode::BAD_GATEWAY),
            RelayError::UpstreamStatus { status: 502 }
        );
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            RelayError::UpstreamStatus { status: 401 }
        );
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let relay = ChatCompletionRelay::new(&RelayConfig {
            api_url: "https://api.example.com/openai/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            relay.endpoint(),
            "https://api.example.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let relay = ChatCompletionRelay::new(&RelayConfig {
            api_key: Some("gsk_secret".to_string()),
            ..Default::default()
        })
        .unwrap();
        let rendered = format!("{relay:?}");
        assert!(!rendered.contains("gsk_secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
