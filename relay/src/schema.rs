//! Wire types for the chat-completions API.
//!
//! Only the fields the relay reads are modelled on the response side; every
//! one of them is optional so that a structurally incomplete payload decodes
//! and is then rejected by [`ChatCompletionResponse::into_summary`] with a
//! named error.

use errors::RelayError;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{MAX_TOKENS, SYSTEM_PROMPT, TEMPERATURE, TOP_P};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32
}

impl ChatCompletionRequest {
    /// The fixed two-message summarization conversation for `text`.
    pub fn summarize(model: &str, text: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: ChatRole::System,
                    content: SYSTEM_PROMPT.to_string()
                },
                ChatMessage {
                    role: ChatRole::User,
                    content: user_message(text)
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P
        }
    }
}

pub fn user_message(text: &str) -> String {
    format!("Text to summarize:\n\n{text}")
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>
}

impl ChatCompletionResponse {
    /// Extracts the trimmed generated text of the first choice.
    pub fn into_summary(self) -> Result<String, RelayError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| malformed("response has no choices"))?;
        let message = choice
            .message
            .ok_or_else(|| malformed("first choice has no message"))?;
        let content = message
            .content
            .ok_or_else(|| malformed("message has no content"))?;

        let summary = content.trim();
        if summary.is_empty() {
            return Err(malformed("message content is empty"));
        }
        Ok(summary.to_string())
    }
}

fn malformed(reason: &str) -> RelayError {
    RelayError::MalformedResponse {
        reason: reason.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = ChatCompletionRequest::summarize("llama-3.1-8b-instant", "Some long text");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "llama-3.1-8b-instant");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(
            value["messages"][1]["content"],
            "Text to summarize:\n\nSome long text"
        );
        assert_eq!(value["max_tokens"], 150);
        assert!((value["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert!((value["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_into_summary_trims() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "  Foo bar.  " } }]
        }))
        .unwrap();
        assert_eq!(response.into_summary().unwrap(), "Foo bar.");
    }

    #[test]
    fn test_missing_pieces_are_named() {
        let cases = [
            (json!({}), "response has no choices"),
            (json!({ "choices": [] }), "response has no choices"),
            (json!({ "choices": [{}] }), "first choice has no message"),
            (json!({ "choices": [{ "message": {} }] }), "message has no content"),
            (
                json!({ "choices": [{ "message": { "content": null } }] }),
                "message has no content"
            ),
            (
                json!({ "choices": [{ "message": { "content": " \n " } }] }),
                "message content is empty"
            ),
        ];

        for (payload, reason) in cases {
            let response: ChatCompletionResponse = serde_json::from_value(payload).unwrap();
            assert_eq!(
                response.into_summary(),
                Err(RelayError::MalformedResponse {
                    reason: reason.to_string()
                })
            );
        }
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(ChatRole::Assistant.to_string(), "assistant");
    }
}
