//! Glue between HTTP headers and the cookie types in `note_core`.

use axum::http::{HeaderMap, HeaderValue, header};
use note_core::{CookieJar, ResponseCookie};
use std::collections::HashSet;

/// Collects every `Cookie` header on the request.
pub fn request_cookies(headers: &HeaderMap) -> CookieJar {
    CookieJar::parse(
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
    )
}

/// Appends one `Set-Cookie` header per cookie. Existing `Set-Cookie`
/// headers are kept.
pub fn append_set_cookies(headers: &mut HeaderMap, cookies: &[ResponseCookie]) {
    for cookie in cookies {
        match HeaderValue::from_str(&cookie.to_header_value()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(cookie = %cookie.name, error = %e, "Dropping unencodable cookie")
        }
    }
}

/// Names of the cookies already written by `Set-Cookie` headers.
pub fn set_cookie_names(headers: &HeaderMap) -> HashSet<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split_once('=').map(|(name, _)| name.trim().to_string()))
        .collect()
}
