//! Server setup and lifecycle for the notewise server.

use config::Config;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, ServerError};
use crate::routes::create_router;
use crate::state::AppState;

/// The notewise HTTP server.
pub struct NoteServer {
    state: Arc<AppState>
}

impl NoteServer {
    /// Creates a new server instance with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let metrics_enabled = config.observability.metrics_enabled;
        let mut state = AppState::new(config)?;

        if metrics_enabled {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| ServerError::Configuration(format!("Failed to install metrics recorder: {e}")))?;
            state = state.with_metrics(handle);
        }

        Ok(Self {
            state: Arc::new(state)
        })
    }

    /// Creates a server instance from an existing `AppState`.
    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Runs the HTTP server.
    ///
    /// This method blocks until the server is shut down (e.g., via Ctrl+C).
    pub async fn run(self) -> Result<()> {
        let server = &self.state.config.server;
        let addr: SocketAddr = format!("{}:{}", server.host, server.port)
            .parse()
            .map_err(|e| ServerError::Configuration(format!("Invalid address: {e}")))?;

        let router = create_router(self.state.clone());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind to {addr}: {e}")))?;

        tracing::info!(%addr, "notewise server starting");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {e}")))?;

        tracing::info!("notewise server stopped");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}

/// Signal handler for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        () = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}

/// `RUST_LOG` wins when set; otherwise the configured level applies.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Entry point for running the server from configuration.
pub async fn run_server(config: Config) -> Result<()> {
    let server = NoteServer::new(config)?;
    server.run().await
}

/// Entry point for running the server from environment variables and the
/// optional `NOTEWISE_CONFIG` file.
pub async fn run_from_env() -> Result<()> {
    let config = config::load().map_err(|e| ServerError::Configuration(e.to_string()))?;
    init_tracing(&config.observability.logging_level);
    run_server(config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_without_metrics() {
        let mut config = Config::default();
        config.observability.metrics_enabled = false;
        let server = NoteServer::new(config).unwrap();
        assert!(server.state().metrics.is_none());
    }

    #[tokio::test]
    async fn test_invalid_address_is_configuration_error() {
        let mut config = Config::default();
        config.server.host = "not an address".to_string();
        config.observability.metrics_enabled = false;
        let err = NoteServer::new(config).unwrap().run().await.unwrap_err();
        assert!(matches!(err, ServerError::Configuration(_)));
    }
}
