use config::RelayConfig;
use errors::{RelayError, RelayErrorKind};
use relay::{ChatCompletionRelay, MAX_TEXT_LENGTH, SYSTEM_PROMPT};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOTE_TEXT: &str = "Meeting notes: we agreed to ship the beta on Friday and collect \
                         feedback from the first twenty users before widening access.";

fn relay_for(server: &MockServer) -> ChatCompletionRelay {
    ChatCompletionRelay::new(&RelayConfig {
        api_url: format!("{}/openai/v1", server.uri()),
        api_key: Some("test_key".to_string()),
        model: "llama-3.1-8b-instant".to_string(),
        timeout_seconds: 5
    })
    .unwrap()
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_summarize_sends_fixed_conversation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("Authorization", "Bearer test_key"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-8b-instant",
            "max_tokens": 150,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("Text to summarize:\n\n{NOTE_TEXT}") }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Beta ships Friday.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let summary = relay_for(&mock_server).summarize(NOTE_TEXT).await.unwrap();
    assert_eq!(summary, "Beta ships Friday.");
}

#[tokio::test]
async fn test_summary_is_trimmed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Foo bar.  ")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let summary = relay_for(&mock_server).summarize(NOTE_TEXT).await.unwrap();
    assert_eq!(summary, "Foo bar.");
}

#[tokio::test]
async fn test_short_text_makes_no_upstream_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let relay = relay_for(&mock_server);
    for text in ["", "a", "123456789"] {
        let err = relay.summarize(text).await.unwrap_err();
        assert!(matches!(err, RelayError::TextTooShort { .. }));
    }
}

#[tokio::test]
async fn test_long_text_makes_no_upstream_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let text = "x".repeat(MAX_TEXT_LENGTH + 1);
    let err = relay_for(&mock_server).summarize(&text).await.unwrap_err();
    assert!(matches!(err, RelayError::TextTooLong { length: 10_001, .. }));
}

#[tokio::test]
async fn test_boundary_lengths_make_one_call_each() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let relay = relay_for(&mock_server);
    relay.summarize(&"y".repeat(10)).await.unwrap();
    relay.summarize(&"y".repeat(MAX_TEXT_LENGTH)).await.unwrap();
}

#[tokio::test]
async fn test_missing_api_key_is_configuration_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let relay = ChatCompletionRelay::new(&RelayConfig {
        api_url: mock_server.uri(),
        api_key: None,
        ..Default::default()
    })
    .unwrap();

    let err = relay.summarize(NOTE_TEXT).await.unwrap_err();
    assert_eq!(err.kind(), RelayErrorKind::Configuration);
}

#[tokio::test]
async fn test_validation_precedes_configuration() {
    let relay = ChatCompletionRelay::new(&RelayConfig::default()).unwrap();
    let err = relay.summarize("tiny").await.unwrap_err();
    assert_eq!(err.kind(), RelayErrorKind::Validation);
}

#[tokio::test]
async fn test_upstream_status_translation() {
    let cases = [
        (429, RelayError::RateLimited),
        (402, RelayError::QuotaExhausted),
        (500, RelayError::UpstreamStatus { status: 500 }),
        (401, RelayError::UpstreamStatus { status: 401 }),
        (503, RelayError::UpstreamStatus { status: 503 }),
    ];

    for (status, expected) in cases {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(json!({ "error": { "message": "upstream says no" } }))
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = relay_for(&mock_server).summarize(NOTE_TEXT).await.unwrap_err();
        assert_eq!(err, expected, "status {status}");
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_still_classified() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("<html>slow down</html>"))
        .mount(&mock_server)
        .await;

    let err = relay_for(&mock_server).summarize(NOTE_TEXT).await.unwrap_err();
    assert_eq!(err, RelayError::RateLimited);
}

#[tokio::test]
async fn test_success_without_content_is_upstream_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "choices": [{ "message": {} }] }))
        )
        .mount(&mock_server)
        .await;

    let err = relay_for(&mock_server).summarize(NOTE_TEXT).await.unwrap_err();
    assert!(matches!(err, RelayError::MalformedResponse { .. }));
    assert_eq!(err.kind(), RelayErrorKind::Upstream);
}

#[tokio::test]
async fn test_success_with_invalid_json_is_upstream_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = relay_for(&mock_server).summarize(NOTE_TEXT).await.unwrap_err();
    assert!(matches!(err, RelayError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_timeout_is_upstream_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("late"))
                .set_delay(std::time::Duration::from_secs(3))
        )
        .mount(&mock_server)
        .await;

    let relay = ChatCompletionRelay::new(&RelayConfig {
        api_url: mock_server.uri(),
        api_key: Some("test_key".to_string()),
        timeout_seconds: 1,
        ..Default::default()
    })
    .unwrap();

    let err = relay.summarize(NOTE_TEXT).await.unwrap_err();
    assert!(matches!(err, RelayError::Transport { .. }));
    assert_eq!(err.kind(), RelayErrorKind::Upstream);
}
