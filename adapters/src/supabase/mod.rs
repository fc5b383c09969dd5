//! Supabase-compatible provider client.
//!
//! - `session`: cookie session reader, token refresh and sign-out
//!   (`/auth/v1/*`)
//! - `notes`: the `notes` table through PostgREST (`/rest/v1/notes`)

mod notes;
mod session;

pub use session::StoredSession;

use config::ProviderConfig;
use errors::ProviderError;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    auth_cookie: String,
    session_cookie: String,
    secure_cookies: bool
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .field("auth_cookie", &self.auth_cookie)
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    pub fn new(config: &ProviderConfig, secure_cookies: bool) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Configuration {
                message: format!("failed to build HTTP client: {e}")
            })?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            auth_cookie: config.auth_cookie_name(),
            session_cookie: config.session_cookie_name(),
            secure_cookies
        })
    }

    pub fn auth_cookie_name(&self) -> &str {
        &self.auth_cookie
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1{}", self.base_url, path)
    }

    /// Attaches the project key and, when given, the caller's bearer token.
    fn authorize(&self, builder: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let builder = builder
            .header("apikey", &self.anon_key)
            .header("Accept", "application/json");
        match access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder.bearer_auth(&self.anon_key)
        }
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    ProviderError::Transport {
        reason: if e.is_timeout() {
            "request timed out".to_string()
        } else {
            e.to_string()
        }
    }
}

/// Maps a non-success response onto [`ProviderError`]; passes success
/// through.
async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ProviderError::Unauthorized { reason: message });
    }
    Err(ProviderError::Api {
        status: status.as_u16(),
        message
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode {
        reason: e.to_string()
    })
}
