//! Session guard middleware.
//!
//! Runs before every application route. The caller's session is resolved
//! through the auth provider on each request, then:
//!
//! - a protected path without a session redirects to
//!   `/login?redirectedFrom=<path>`
//! - an auth-entry path with a session redirects to `/dashboard`
//! - anything else passes through with the resolved [`AuthContext`] in the
//!   request extensions
//!
//! Cookies the provider wants written back (a refreshed token, a cleared
//! stale one) are appended to whichever response goes out, unless the
//! handler already set a cookie of the same name.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response}
};
use note_core::{AuthContext, SessionState};
use std::convert::Infallible;
use std::sync::Arc;

use crate::cookies::{append_set_cookies, request_cookies, set_cookie_names};
use crate::error::ApiError;
use crate::state::AppState;
use crate::telemetry::Telemetry;

pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard"];
pub const AUTH_PREFIXES: &[&str] = &["/login", "/signup"];

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    AuthEntry,
    Public
}

pub fn classify(path: &str) -> RouteClass {
    if PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        RouteClass::Protected
    } else if AUTH_PREFIXES.iter().any(|p| path.starts_with(p)) {
        RouteClass::AuthEntry
    } else {
        RouteClass::Public
    }
}

/// Login URL that brings the caller back to `path` afterwards. Slashes stay
/// readable; everything else that needs it is percent-encoded.
pub fn login_redirect(path: &str) -> String {
    let encoded = urlencoding::encode(path).replace("%2F", "/");
    format!("{LOGIN_PATH}?redirectedFrom={encoded}")
}

pub async fn session_guard(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next
) -> Response {
    let jar = request_cookies(request.headers());
    let session = match state.auth.resolve_session(&jar).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "Session lookup failed; treating caller as anonymous");
            SessionState::anonymous()
        }
    };

    let path = request.uri().path().to_string();
    let mut response = match (classify(&path), session.identity.clone()) {
        (RouteClass::Protected, None) => {
            tracing::debug!(path = %path, "Redirecting anonymous caller to login");
            Telemetry::record_guard_redirect("unauthenticated");
            Redirect::temporary(&login_redirect(&path)).into_response()
        }
        (RouteClass::AuthEntry, Some(_)) => {
            tracing::debug!(path = %path, "Redirecting signed-in caller to dashboard");
            Telemetry::record_guard_redirect("authenticated");
            Redirect::temporary(DASHBOARD_PATH).into_response()
        }
        (_, identity) => {
            if let Some(ctx) = identity {
                request.extensions_mut().insert(ctx);
            }
            next.run(request).await
        }
    };

    let handler_set = set_cookie_names(response.headers());
    let pending: Vec<_> = session
        .cookies
        .into_iter()
        .filter(|cookie| !handler_set.contains(&cookie.name))
        .collect();
    append_set_cookies(response.headers_mut(), &pending);
    response
}

/// Extractor for the identity the guard attached. Rejects with 401 when the
/// caller has no session.
#[derive(Debug, Clone)]
pub struct Caller(pub AuthContext);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Caller)
            .ok_or(ApiError::Unauthenticated)
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthContext>().cloned().map(Caller))
    }
}
