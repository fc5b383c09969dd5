#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header}
};
use config::Config;
use note_server::{AppState, create_router};
use std::sync::Arc;
use testing::{FakeAuthProvider, InMemoryNoteStore, StubSummarizer, TEST_PROJECT, auth_context};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub auth: Arc<FakeAuthProvider>,
    pub store: Arc<InMemoryNoteStore>,
    pub summarizer: Arc<StubSummarizer>
}

impl TestApp {
    pub fn new(summarizer: StubSummarizer) -> Self {
        Self::with_config(test_config(), summarizer)
    }

    pub fn with_config(config: Config, summarizer: StubSummarizer) -> Self {
        let auth = Arc::new(FakeAuthProvider::new());
        let store = Arc::new(InMemoryNoteStore::new());
        let summarizer = Arc::new(summarizer);
        let state = AppState::with_parts(config, auth.clone(), store.clone(), summarizer.clone());

        Self {
            router: create_router(Arc::new(state)),
            auth,
            store,
            summarizer
        }
    }

    /// Registers a session for `user` and returns its `Cookie` header.
    pub fn sign_in(&self, user: &str) -> String {
        self.auth
            .add_session(&format!("session-{user}"), auth_context(user))
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.provider.project_id = TEST_PROJECT.to_string();
    config.observability.metrics_enabled = false;
    config
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request("GET", uri, cookie, Body::empty())
}

pub fn post_json(uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    json_request("POST", uri, cookie, body)
}

pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(body).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}
