//! # Configuration Structures
//!
//! All configuration structures use `serde` defaults so that partial files
//! deserialize, and `validator` rules so that bad values are rejected at
//! startup rather than on the first request.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Top-level configuration for the notewise server.
///
/// ## Fields
/// - `server`: bind address and cookie policy
/// - `relay`: upstream inference API used for summaries
/// - `provider`: auth/data provider (Supabase-compatible) endpoint
/// - `observability`: logging level and metrics toggle
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    #[serde(default)]
    #[validate(nested)]
    pub relay: RelayConfig,

    #[serde(default)]
    #[validate(nested)]
    pub provider: ProviderConfig,

    #[serde(default)]
    #[validate(nested)]
    pub observability: ObservabilityConfig
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    #[validate(length(min = 1, max = 255))]
    pub host: String,

    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    /// Adds `Secure` to cookies the server writes. Enable behind TLS.
    #[serde(default)]
    pub secure_cookies: bool
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secure_cookies: false
        }
    }
}

/// Upstream chat-completions API used by the summarization relay.
///
/// A missing `api_key` is not a startup error: the relay reports a
/// configuration failure per request instead.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct RelayConfig {
    #[serde(default = "default_relay_api_url")]
    #[validate(url)]
    pub api_url: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub api_key: Option<String>,

    #[serde(default = "default_relay_model")]
    #[validate(length(min = 1, max = 255))]
    pub model: String,

    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64
}

fn default_relay_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_relay_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_url: default_relay_api_url(),
            api_key: None,
            model: default_relay_model(),
            timeout_seconds: default_timeout_seconds()
        }
    }
}

/// Auth and data provider (Supabase-compatible REST endpoints).
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_url")]
    #[validate(url)]
    pub url: String,

    #[serde(default)]
    pub anon_key: String,

    /// Used to derive the session cookie names `sb-<project_id>-*`.
    #[serde(default = "default_project_id")]
    #[validate(length(min = 1, max = 64), custom(function = "validate_project_id"))]
    pub project_id: String,

    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64
}

fn default_provider_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_project_id() -> String {
    "local".to_string()
}

fn validate_project_id(project_id: &str) -> Result<(), ValidationError> {
    if project_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_project_id"))
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: default_provider_url(),
            anon_key: String::new(),
            project_id: default_project_id(),
            timeout_seconds: default_timeout_seconds()
        }
    }
}

impl ProviderConfig {
    pub fn auth_cookie_name(&self) -> String {
        format!("sb-{}-auth-token", self.project_id)
    }

    pub fn session_cookie_name(&self) -> String {
        format!("sb-{}-session", self.project_id)
    }
}

/// Logging and metrics.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ObservabilityConfig {
    #[serde(default = "default_logging_level")]
    #[validate(custom(function = "validate_logging_level"))]
    pub logging_level: String,

    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool
}

fn default_logging_level() -> String {
    "info".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

fn validate_logging_level(level: &str) -> Result<(), ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_logging_level"))
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            logging_level: default_logging_level(),
            metrics_enabled: default_metrics_enabled()
        }
    }
}
