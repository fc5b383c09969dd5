//! # Configuration System
//!
//! Centralized configuration for the notewise server.
//!
//! This crate provides:
//! - Configuration structures for the server, relay, provider and
//!   observability
//! - Environment variable loading (12-factor app principles)
//! - Configuration file loading (TOML/YAML)
//! - Configuration precedence (env > file > defaults)
//! - Configuration validation via the `validator` crate

pub mod config;
pub mod file_loader;
pub mod loader;
pub mod precedence;
pub mod validation;

pub use config::{Config, ObservabilityConfig, ProviderConfig, RelayConfig, ServerConfig};
pub use file_loader::{ConfigFileError, load_from_file, load_from_toml, load_from_yaml};
pub use loader::{CONFIG_PATH_VAR, EnvError, load_from_env};
pub use precedence::merge_configs;
pub use validation::validate;

/// Errors from [`load`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    File(#[from] ConfigFileError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ::validator::ValidationErrors)
}

/// Loads the effective configuration: defaults, then the file named by
/// `NOTEWISE_CONFIG` (if set), then environment variables. The result is
/// validated before it is returned.
pub fn load() -> Result<Config, ConfigError> {
    let from_file = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => load_from_file(std::path::Path::new(&path))?,
        Err(_) => Config::default()
    };
    let from_env = load_from_env()?;

    let config = merge_configs(Config::default(), from_file, "file", from_env, "env");
    validate(&config)?;
    Ok(config)
}
