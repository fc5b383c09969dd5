use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response}
};
use note_core::ResponseCookie;
use std::sync::Arc;

use crate::cookies::{append_set_cookies, request_cookies};
use crate::guard::Caller;
use crate::state::AppState;
use crate::telemetry::Telemetry;

pub const SIGNOUT_FAILED_LOCATION: &str = "/login?error=Could%20not%20sign%20out";

fn found(location: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static(location));
    headers
}

/// POST /auth/signout
///
/// Always answers with a 302. The session revoked is the one the guard
/// resolved, so a token refreshed on the way in does not outlive sign-out.
/// On success every session cookie, chunks included, is expired and the
/// response is marked uncacheable so no intermediary replays a signed-in
/// page.
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    caller: Option<Caller>,
    request_headers: HeaderMap
) -> Response {
    if let Some(Caller(ctx)) = caller {
        if let Err(e) = state.auth.sign_out(&ctx).await {
            tracing::warn!(error = %e, user_id = %ctx.user_id(), "Sign-out failed");
            Telemetry::record_signout("failed");
            return (StatusCode::FOUND, found(SIGNOUT_FAILED_LOCATION)).into_response();
        }
    } else {
        tracing::debug!("Sign-out without a session");
    }

    let jar = request_cookies(&request_headers);
    let expired: Vec<ResponseCookie> = state
        .auth
        .session_cookie_names(&jar)
        .into_iter()
        .map(|name| ResponseCookie::expired(name).secure(state.secure_cookies()))
        .collect();

    let mut headers = found("/");
    append_set_cookies(&mut headers, &expired);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, max-age=0")
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));

    tracing::info!("Signed out");
    Telemetry::record_signout("ok");
    (StatusCode::FOUND, headers).into_response()
}
