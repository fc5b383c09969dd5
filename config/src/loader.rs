//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles. Unset variables fall back to defaults; set but unparsable
//! variables are an error.
//!
//! ## Environment Variables
//! ### Server
//! - `NOTEWISE_HOST`: bind host (default: "0.0.0.0")
//! - `NOTEWISE_PORT`: bind port (default: 3000)
//! - `NOTEWISE_SECURE_COOKIES`: add `Secure` to written cookies (default: false)
//!
//! ### Relay
//! - `GROQ_API_KEY`: bearer credential for the inference API (optional)
//! - `GROQ_API_URL`: API base URL (default: "https://api.groq.com/openai/v1")
//! - `GROQ_MODEL`: model identifier (default: "llama-3.1-8b-instant")
//! - `GROQ_TIMEOUT_SECONDS`: upstream request timeout (default: 30)
//!
//! ### Provider
//! - `SUPABASE_URL`: provider base URL (default: "http://localhost:54321")
//! - `SUPABASE_ANON_KEY`: public API key sent as `apikey`
//! - `SUPABASE_PROJECT_ID`: project reference used in cookie names
//! - `SUPABASE_TIMEOUT_SECONDS`: provider request timeout (default: 30)
//!
//! ### Observability
//! - `NOTEWISE_LOG_LEVEL`: trace/debug/info/warn/error (default: "info")
//! - `NOTEWISE_METRICS_ENABLED`: expose `/metrics` (default: true)

use crate::config::{Config, ObservabilityConfig, ProviderConfig, RelayConfig, ServerConfig};
use std::env;
use std::str::FromStr;

/// Names a TOML/YAML file layered beneath environment variables.
pub const CONFIG_PATH_VAR: &str = "NOTEWISE_CONFIG";

#[derive(Debug, thiserror::Error)]
#[error("Invalid value for {key}: {reason}")]
pub struct EnvError {
    pub key: String,
    pub reason: String
}

pub fn load_from_env() -> Result<Config, EnvError> {
    Ok(Config {
        server: load_server_from_env()?,
        relay: load_relay_from_env()?,
        provider: load_provider_from_env()?,
        observability: load_observability_from_env()?
    })
}

fn load_server_from_env() -> Result<ServerConfig, EnvError> {
    let defaults = ServerConfig::default();
    Ok(ServerConfig {
        host: env::var("NOTEWISE_HOST").unwrap_or(defaults.host),
        port: parse_env("NOTEWISE_PORT")?.unwrap_or(defaults.port),
        secure_cookies: parse_bool_env("NOTEWISE_SECURE_COOKIES")?
            .unwrap_or(defaults.secure_cookies)
    })
}

fn load_relay_from_env() -> Result<RelayConfig, EnvError> {
    let defaults = RelayConfig::default();
    Ok(RelayConfig {
        api_url: env::var("GROQ_API_URL").unwrap_or(defaults.api_url),
        api_key: env::var("GROQ_API_KEY").ok().filter(|k| !k.trim().is_empty()),
        model: env::var("GROQ_MODEL").unwrap_or(defaults.model),
        timeout_seconds: parse_env("GROQ_TIMEOUT_SECONDS")?.unwrap_or(defaults.timeout_seconds)
    })
}

fn load_provider_from_env() -> Result<ProviderConfig, EnvError> {
    let defaults = ProviderConfig::default();
    Ok(ProviderConfig {
        url: env::var("SUPABASE_URL").unwrap_or(defaults.url),
        anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or(defaults.anon_key),
        project_id: env::var("SUPABASE_PROJECT_ID").unwrap_or(defaults.project_id),
        timeout_seconds: parse_env("SUPABASE_TIMEOUT_SECONDS")?
            .unwrap_or(defaults.timeout_seconds)
    })
}

fn load_observability_from_env() -> Result<ObservabilityConfig, EnvError> {
    let defaults = ObservabilityConfig::default();
    Ok(ObservabilityConfig {
        logging_level: env::var("NOTEWISE_LOG_LEVEL").unwrap_or(defaults.logging_level),
        metrics_enabled: parse_bool_env("NOTEWISE_METRICS_ENABLED")?
            .unwrap_or(defaults.metrics_enabled)
    })
}

fn parse_env<T>(key: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| EnvError {
            key: key.to_string(),
            reason: e.to_string()
        }),
        Err(_) => Ok(None)
    }
}

fn parse_bool_env(key: &str) -> Result<Option<bool>, EnvError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            other => Err(EnvError {
                key: key.to_string(),
                reason: format!("expected a boolean, got {other:?}")
            })
        },
        Err(_) => Ok(None)
    }
}
