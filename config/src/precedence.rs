//! # Configuration Precedence
//!
//! Merges configuration from multiple sources.
//!
//! # Precedence Order
//! 1. Environment variables (highest priority)
//! 2. Configuration file
//! 3. Default values (lowest priority)
//!
//! A field in a source overrides the accumulated value only when it differs
//! from that field's default, so an unset environment variable never masks a
//! file value.

use crate::config::{Config, ObservabilityConfig, ProviderConfig, RelayConfig, ServerConfig};

pub fn merge_configs(
    defaults: Config,
    file_config: Config,
    file_source_name: &str,
    env_config: Config,
    env_source_name: &str
) -> Config {
    let config = merge_with_logging(defaults, file_config, file_source_name);
    merge_with_logging(config, env_config, env_source_name)
}

fn merge_with_logging(mut base: Config, overlay: Config, source_name: &str) -> Config {
    let mut changes = Vec::new();

    merge_server(&mut base.server, overlay.server, &mut changes);
    merge_relay(&mut base.relay, overlay.relay, &mut changes);
    merge_provider(&mut base.provider, overlay.provider, &mut changes);
    merge_observability(&mut base.observability, overlay.observability, &mut changes);

    if !changes.is_empty() {
        tracing::info!(source = source_name, ?changes, "Configuration overrides applied");
    }

    base
}

fn apply<T: PartialEq>(
    target: &mut T,
    value: T,
    default: &T,
    label: &str,
    redact: bool,
    changes: &mut Vec<String>
) where
    T: std::fmt::Debug
{
    if value != *default && value != *target {
        if redact {
            changes.push(format!("{label} = ***"));
        } else {
            changes.push(format!("{label} = {value:?}"));
        }
        *target = value;
    }
}

fn merge_server(base: &mut ServerConfig, overlay: ServerConfig, changes: &mut Vec<String>) {
    let d = ServerConfig::default();
    apply(&mut base.host, overlay.host, &d.host, "server.host", false, changes);
    apply(&mut base.port, overlay.port, &d.port, "server.port", false, changes);
    apply(
        &mut base.secure_cookies,
        overlay.secure_cookies,
        &d.secure_cookies,
        "server.secure_cookies",
        false,
        changes
    );
}

fn merge_relay(base: &mut RelayConfig, overlay: RelayConfig, changes: &mut Vec<String>) {
    let d = RelayConfig::default();
    apply(&mut base.api_url, overlay.api_url, &d.api_url, "relay.api_url", false, changes);
    apply(&mut base.api_key, overlay.api_key, &d.api_key, "relay.api_key", true, changes);
    apply(&mut base.model, overlay.model, &d.model, "relay.model", false, changes);
    apply(
        &mut base.timeout_seconds,
        overlay.timeout_seconds,
        &d.timeout_seconds,
        "relay.timeout_seconds",
        false,
        changes
    );
}

fn merge_provider(base: &mut ProviderConfig, overlay: ProviderConfig, changes: &mut Vec<String>) {
    let d = ProviderConfig::default();
    apply(&mut base.url, overlay.url, &d.url, "provider.url", false, changes);
    apply(
        &mut base.anon_key,
        overlay.anon_key,
        &d.anon_key,
        "provider.anon_key",
        true,
        changes
    );
    apply(
        &mut base.project_id,
        overlay.project_id,
        &d.project_id,
        "provider.project_id",
        false,
        changes
    );
    apply(
        &mut base.timeout_seconds,
        overlay.timeout_seconds,
        &d.timeout_seconds,
        "provider.timeout_seconds",
        false,
        changes
    );
}

fn merge_observability(
    base: &mut ObservabilityConfig,
    overlay: ObservabilityConfig,
    changes: &mut Vec<String>
) {
    let d = ObservabilityConfig::default();
    apply(
        &mut base.logging_level,
        overlay.logging_level,
        &d.logging_level,
        "observability.logging_level",
        false,
        changes
    );
    apply(
        &mut base.metrics_enabled,
        overlay.metrics_enabled,
        &d.metrics_enabled,
        "observability.metrics_enabled",
        false,
        changes
    );
}
