//! # Configuration Validation
//!
//! ## Validation Rules
//! ### Server
//! - `host`: 1-255 characters
//! - `port`: 1-65535
//!
//! ### Relay
//! - `api_url`: a valid URL
//! - `api_key`: non-empty when present
//! - `model`: 1-255 characters
//! - `timeout_seconds`: 1-300
//!
//! ### Provider
//! - `url`: a valid URL
//! - `project_id`: 1-64 characters of `[A-Za-z0-9_-]`
//! - `timeout_seconds`: 1-300
//!
//! ### Observability
//! - `logging_level`: must be "trace", "debug", "info", "warn", or "error"

use crate::config::Config;
use validator::Validate;

pub fn validate(config: &Config) -> Result<(), validator::ValidationErrors> {
    config.validate()
}
