//! Application state for the notewise server.

use adapters::SupabaseClient;
use config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use note_core::{AuthProvider, NoteStore, Summarizer};
use notes::NoteService;
use relay::ChatCompletionRelay;
use std::sync::Arc;

use crate::error::{Result, ServerError};

/// Shared application state for Axum handlers.
///
/// Collaborators are built once and held behind trait objects so tests can
/// swap in fakes through [`AppState::with_parts`].
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<dyn AuthProvider>,
    pub summarizer: Arc<dyn Summarizer>,
    pub notes: NoteService,
    /// Present when a Prometheus recorder is installed.
    pub metrics: Option<PrometheusHandle>
}

impl AppState {
    /// Builds the provider and relay clients described by `config`.
    pub fn new(config: Config) -> Result<Self> {
        let provider = Arc::new(
            SupabaseClient::new(&config.provider, config.server.secure_cookies)
                .map_err(|e| ServerError::Configuration(e.to_string()))?
        );
        let relay = Arc::new(
            ChatCompletionRelay::new(&config.relay)
                .map_err(|e| ServerError::Configuration(e.to_string()))?
        );

        if config.relay.api_key.is_none() {
            tracing::warn!("GROQ_API_KEY is not set; summarization requests will fail");
        }

        Ok(Self::with_parts(config, provider.clone(), provider, relay))
    }

    /// Creates application state from existing collaborators (useful for
    /// testing).
    #[must_use]
    pub fn with_parts(
        config: Config,
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn NoteStore>,
        summarizer: Arc<dyn Summarizer>
    ) -> Self {
        Self {
            config: Arc::new(config),
            auth,
            notes: NoteService::new(store, summarizer.clone()),
            summarizer,
            metrics: None
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn secure_cookies(&self) -> bool {
        self.config.server.secure_cookies
    }
}
