//! # notewise errors
//!
//! Structured error definitions shared by every crate in the workspace.
//!
//! - Uses `thiserror` for the `Display` and `Error` implementations
//! - Named fields everywhere so messages stay stable when variants grow
//! - HTTP mapping lives in the server crate; this crate only classifies

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Summarization relay errors.
///
/// Every variant belongs to exactly one [`RelayErrorKind`], which is what
/// callers branch on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Text must be at least {min} characters long (got {length})")]
    TextTooShort { length: usize, min: usize },

    #[error("Text exceeds maximum length of {max} characters (got {length})")]
    TextTooLong { length: usize, max: usize },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Upstream rate limit exceeded")]
    RateLimited,

    #[error("Upstream credits exhausted")]
    QuotaExhausted,

    #[error("Upstream request failed with status {status}")]
    UpstreamStatus { status: u16 },

    #[error("Malformed upstream response: {reason}")]
    MalformedResponse { reason: String },

    #[error("Upstream transport error: {reason}")]
    Transport { reason: String }
}

/// Coarse classification of a [`RelayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelayErrorKind {
    Validation,
    Configuration,
    RateLimit,
    Quota,
    Upstream
}

impl RelayError {
    pub fn kind(&self) -> RelayErrorKind {
        match self {
            Self::TextTooShort { .. } | Self::TextTooLong { .. } => RelayErrorKind::Validation,
            Self::Configuration { .. } => RelayErrorKind::Configuration,
            Self::RateLimited => RelayErrorKind::RateLimit,
            Self::QuotaExhausted => RelayErrorKind::Quota,
            Self::UpstreamStatus { .. }
            | Self::MalformedResponse { .. }
            | Self::Transport { .. } => RelayErrorKind::Upstream
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == RelayErrorKind::Validation
    }
}

/// Errors raised while talking to the auth/data provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider rejected credentials: {reason}")]
    Unauthorized { reason: String },

    #[error("Provider API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Provider transport error: {reason}")]
    Transport { reason: String },

    #[error("Failed to decode provider payload: {reason}")]
    Decode { reason: String },

    #[error("Provider configuration error: {message}")]
    Configuration { message: String }
}

/// Note operation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoteError {
    #[error("Note title must not be empty")]
    EmptyTitle,

    #[error("Note content must not be empty")]
    EmptyContent,

    #[error("Note not found: {id}")]
    NotFound { id: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Relay(#[from] RelayError)
}
