use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use errors::ProviderError;
use note_core::{AuthContext, AuthProvider, AuthUser, CookieJar, ResponseCookie, SameSite, SessionState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{SupabaseClient, check_status, decode, transport_error};

/// Refresh this many seconds before the provider's expiry.
const EXPIRY_MARGIN_SECS: i64 = 10;

/// Lifetime of the session cookie written after a refresh (400 days, the
/// browser maximum).
const SESSION_COOKIE_MAX_AGE: i64 = 400 * 24 * 60 * 60;

/// Marks a cookie value holding base64url (unpadded) JSON rather than raw
/// or percent-encoded JSON.
const BASE64_PREFIX: &str = "base64-";

/// Session as serialized into the auth cookie by the provider's SSR helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl StoredSession {
    /// Reads a session from an assembled cookie value, in either the
    /// `base64-` form or plain JSON.
    pub fn parse(raw: &str) -> Result<Self, ProviderError> {
        let json = match raw.strip_prefix(BASE64_PREFIX) {
            Some(encoded) => {
                let bytes = URL_SAFE_NO_PAD
                    .decode(encoded.trim_end_matches('='))
                    .map_err(|e| ProviderError::Decode {
                        reason: format!("session cookie is not base64url: {e}")
                    })?;
                String::from_utf8(bytes).map_err(|e| ProviderError::Decode {
                    reason: format!("session cookie is not UTF-8: {e}")
                })?
            }
            None => raw.to_string()
        };
        serde_json::from_str(&json).map_err(|e| ProviderError::Decode {
            reason: e.to_string()
        })
    }

    /// Whether the access token is expired or about to be at `now` (unix
    /// seconds). A session without an expiry is trusted until the provider
    /// rejects it.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at
            .is_some_and(|at| at <= now + EXPIRY_MARGIN_SECS)
    }

    /// Cookie value in the `base64-` form current provider helpers write.
    pub fn encode(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        format!("{BASE64_PREFIX}{}", URL_SAFE_NO_PAD.encode(json))
    }
}

/// Reads the cookie `name`, reassembling `name.0`, `name.1`, ... when the
/// session was split across several cookies.
fn read_cookie(jar: &CookieJar, name: &str) -> Option<String> {
    if let Some(value) = jar.get_decoded(name) {
        return Some(value);
    }

    let mut assembled = String::new();
    for chunk in jar.chunk_names(name) {
        assembled.push_str(&jar.get_decoded(&chunk).unwrap_or_default());
    }
    (!assembled.is_empty()).then_some(assembled)
}

impl SupabaseClient {
    fn session_cookie_for(&self, session: &StoredSession) -> ResponseCookie {
        ResponseCookie::new(&self.auth_cookie, session.encode())
            .max_age(SESSION_COOKIE_MAX_AGE)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
    }

    fn expired_cookie(&self, name: &str) -> ResponseCookie {
        ResponseCookie::expired(name).secure(self.secure_cookies)
    }

    /// Anonymous state that also tells the client to drop its stale session.
    fn cleared_state(&self, jar: &CookieJar) -> SessionState {
        let mut state = SessionState::anonymous();
        if jar.contains(&self.auth_cookie) {
            state = state.with_cookie(self.expired_cookie(&self.auth_cookie));
        }
        for chunk in jar.chunk_names(&self.auth_cookie) {
            state = state.with_cookie(self.expired_cookie(&chunk));
        }
        state
    }

    async fn refresh(&self, refresh_token: &str) -> Result<StoredSession, ProviderError> {
        let response = self
            .authorize(
                self.client
                    .post(self.auth_url("/token?grant_type=refresh_token")),
                None
            )
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(transport_error)?;

        let mut session: StoredSession = decode(check_status(response).await?).await?;
        if session.expires_at.is_none() {
            session.expires_at = session
                .expires_in
                .map(|secs| Utc::now().timestamp() + secs);
        }
        Ok(session)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<AuthUser, ProviderError> {
        let response = self
            .authorize(self.client.get(self.auth_url("/user")), Some(access_token))
            .send()
            .await
            .map_err(transport_error)?;

        decode(check_status(response).await?).await
    }
}

fn is_rejected_token(err: &ProviderError) -> bool {
    matches!(
        err,
        ProviderError::Unauthorized { .. } | ProviderError::Api { status: 400, .. }
    )
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn resolve_session(&self, cookies: &CookieJar) -> Result<SessionState, ProviderError> {
        let Some(raw) = read_cookie(cookies, &self.auth_cookie) else {
            return Ok(SessionState::anonymous());
        };

        let mut session = match StoredSession::parse(&raw) {
            Ok(session) => session,
            Err(e) => {
                debug!(error = %e, "Discarding unreadable session cookie");
                return Ok(self.cleared_state(cookies));
            }
        };

        let mut written = Vec::new();
        if session.is_expired(Utc::now().timestamp()) {
            match self.refresh(&session.refresh_token).await {
                Ok(fresh) => {
                    debug!("Refreshed expired session");
                    for chunk in cookies.chunk_names(&self.auth_cookie) {
                        written.push(self.expired_cookie(&chunk));
                    }
                    written.push(self.session_cookie_for(&fresh));
                    session = fresh;
                }
                Err(e) if is_rejected_token(&e) => {
                    debug!(error = %e, "Refresh token rejected");
                    return Ok(self.cleared_state(cookies));
                }
                Err(e) => return Err(e)
            }
        }

        match self.fetch_user(&session.access_token).await {
            Ok(user) => Ok(SessionState {
                identity: Some(AuthContext::new(user, session.access_token)),
                cookies: written
            }),
            Err(e) if is_rejected_token(&e) => {
                debug!(error = %e, "Access token rejected");
                Ok(self.cleared_state(cookies))
            }
            Err(e) => Err(e)
        }
    }

    async fn sign_out(&self, ctx: &AuthContext) -> Result<(), ProviderError> {
        let response = self
            .authorize(
                self.client.post(self.auth_url("/logout")),
                Some(&ctx.access_token)
            )
            .send()
            .await
            .map_err(transport_error)?;

        match response.status().as_u16() {
            200..=299 => {
                info!(user_id = %ctx.user_id(), "Session revoked");
                Ok(())
            }
            // already invalid upstream
            401 | 403 | 404 => Ok(()),
            status => {
                warn!(status, "Provider sign-out failed");
                check_status(response).await.map(|_| ())
            }
        }
    }

    fn session_cookie_names(&self, cookies: &CookieJar) -> Vec<String> {
        let mut names = vec![self.auth_cookie.clone()];
        names.extend(cookies.chunk_names(&self.auth_cookie));
        names.push(self.session_cookie.clone());
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: Option<i64>) -> StoredSession {
        StoredSession {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at,
            expires_in: None,
            token_type: "bearer".to_string(),
            user: None
        }
    }

    #[test]
    fn test_expiry_margin() {
        assert!(!session(None).is_expired(1_000));
        assert!(!session(Some(1_100)).is_expired(1_000));
        assert!(session(Some(1_005)).is_expired(1_000));
        assert!(session(Some(900)).is_expired(1_000));
    }

    #[test]
    fn test_encode_roundtrips_through_cookie_jar() {
        let stored = session(Some(42));
        let jar = CookieJar::new().with("sb-x-auth-token", stored.encode());
        let raw = read_cookie(&jar, "sb-x-auth-token").unwrap();
        assert_eq!(StoredSession::parse(&raw).unwrap(), stored);
    }

    #[test]
    fn test_read_chunked_cookie() {
        let json = r#"{"access_token":"at","refresh_token":"rt"}"#;
        let (a, b) = json.split_at(20);
        let jar = CookieJar::new()
            .with("sb-x-auth-token.0", a)
            .with("sb-x-auth-token.1", b);
        let raw = read_cookie(&jar, "sb-x-auth-token").unwrap();
        let parsed = StoredSession::parse(&raw).unwrap();
        assert_eq!(parsed.access_token, "at");
        assert_eq!(parsed.token_type, "bearer");
    }

    #[test]
    fn test_parse_base64_value() {
        let json = r#"{"access_token":"at","refresh_token":"rt","expires_at":42}"#;
        let raw = format!("base64-{}", URL_SAFE_NO_PAD.encode(json));
        let parsed = StoredSession::parse(&raw).unwrap();
        assert_eq!(parsed.access_token, "at");
        assert_eq!(parsed.expires_at, Some(42));

        let padded = format!("{raw}==");
        assert_eq!(StoredSession::parse(&padded).unwrap(), parsed);
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        assert!(matches!(
            StoredSession::parse("base64-***"),
            Err(ProviderError::Decode { .. })
        ));
        assert!(StoredSession::parse("not json").is_err());
    }

    #[test]
    fn test_read_chunked_base64_cookie() {
        let encoded = session(Some(7)).encode();
        let (a, b) = encoded.split_at(15);
        let jar = CookieJar::new()
            .with("sb-x-auth-token.0", a)
            .with("sb-x-auth-token.1", b);
        let raw = read_cookie(&jar, "sb-x-auth-token").unwrap();
        assert_eq!(StoredSession::parse(&raw).unwrap(), session(Some(7)));
    }

    #[test]
    fn test_missing_cookie() {
        assert!(read_cookie(&CookieJar::new(), "sb-x-auth-token").is_none());
    }
}
