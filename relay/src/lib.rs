//! # Summarization Relay
//!
//! Converts user-authored text into a short summary by forwarding a single
//! chat-completion request to an external inference API.
//!
//! ## Contract
//! - Text shorter than [`MIN_TEXT_LENGTH`] or longer than
//!   [`MAX_TEXT_LENGTH`] characters is rejected before any network call
//! - A missing API key is a configuration failure, reported per request
//! - Exactly one upstream call per accepted request; no retries, no caching
//! - Upstream 429 and 402 are classified; every other failure, including a
//!   success payload without generated text, is a generic upstream failure
//!
//! The relay is stateless. Two identical concurrent requests are two
//! upstream calls.

pub mod client;
pub mod schema;
pub mod validation;

pub use client::ChatCompletionRelay;
pub use schema::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole};
pub use validation::{MAX_TEXT_LENGTH, MIN_TEXT_LENGTH, text_length, validate_text};

/// Instruction sent as the system message of every request.
pub const SYSTEM_PROMPT: &str = "Generate a concise 2-3 sentence summary of the provided text. \
                                 Focus on the main ideas and key points. Be direct and factual.";

/// Low randomness keeps summaries factual.
pub const TEMPERATURE: f32 = 0.3;

pub const TOP_P: f32 = 0.9;

/// Enough for two or three sentences.
pub const MAX_TOKENS: u32 = 150;
