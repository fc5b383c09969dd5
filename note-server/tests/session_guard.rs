mod common;

use axum::http::StatusCode;
use common::{TestApp, get, location, set_cookies};
use note_core::ResponseCookie;
use testing::{StubSummarizer, TEST_AUTH_COOKIE};

fn app() -> TestApp {
    TestApp::new(StubSummarizer::returning("unused"))
}

#[tokio::test]
async fn test_protected_path_without_session_redirects_to_login() {
    let app = app();
    let response = app.send(get("/dashboard/anything", None)).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        Some("/login?redirectedFrom=/dashboard/anything")
    );
}

#[tokio::test]
async fn test_protected_root_without_session_redirects_to_login() {
    let app = app();
    let response = app.send(get("/dashboard", None)).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/login?redirectedFrom=/dashboard"));
}

#[tokio::test]
async fn test_protected_path_with_session_passes_through() {
    let app = app();
    let cookie = app.sign_in("alice");
    let response = app.send(get("/dashboard/notes", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(location(&response).is_none());
}

#[tokio::test]
async fn test_login_with_session_redirects_to_dashboard() {
    let app = app();
    let cookie = app.sign_in("alice");

    for path in ["/login", "/signup", "/login/reset"] {
        let response = app.send(get(path, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(location(&response), Some("/dashboard"), "{path}");
    }
}

#[tokio::test]
async fn test_login_without_session_passes_through() {
    let app = app();
    let response = app.send(get("/login", None)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(location(&response).is_none());
}

#[tokio::test]
async fn test_public_path_without_session_passes_through() {
    let app = app();
    let response = app.send(get("/", None)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(location(&response).is_none());
    assert_eq!(app.auth.resolve_calls(), 1);
}

#[tokio::test]
async fn test_unreachable_provider_fails_closed() {
    let app = app();
    let cookie = app.sign_in("alice");
    app.auth.set_unavailable(true);

    let response = app.send(get("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/login?redirectedFrom=/dashboard"));

    let response = app.send(get("/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refreshed_cookie_is_written_on_pass_through() {
    let app = app();
    let cookie = app.sign_in("alice");
    app.auth
        .refresh_with(ResponseCookie::new(TEST_AUTH_COOKIE, "fresh").max_age(3600))
        .await;

    let response = app.send(get("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let written = set_cookies(&response);
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("sb-testproj-auth-token=fresh;"));
    assert!(written[0].contains("Max-Age=3600"));
}

#[tokio::test]
async fn test_refreshed_cookie_is_written_on_redirect() {
    let app = app();
    let cookie = app.sign_in("alice");
    app.auth
        .refresh_with(ResponseCookie::new(TEST_AUTH_COOKIE, "fresh"))
        .await;

    let response = app.send(get("/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(set_cookies(&response).len(), 1);
}

#[tokio::test]
async fn test_stale_session_is_cleared_and_redirected() {
    let app = app();
    let stale = format!("{TEST_AUTH_COOKIE}=revoked");

    let response = app.send(get("/dashboard", Some(&stale))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let written = set_cookies(&response);
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("sb-testproj-auth-token=;"));
    assert!(written[0].contains("Max-Age=0"));
}
