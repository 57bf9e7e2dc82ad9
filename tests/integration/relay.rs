//! Chat-completions relay integration tests
//!
//! POST /api/ai/groq

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{
    constants::TEST_GROQ_API_KEY, stub_server, test_config, StubGenerator, StubRelay, TestHarness,
};
use crate::mocks::MockGroq;

fn chat_payload() -> Value {
    json!({
        "model": "llama-3.3-70b-versatile",
        "messages": [{ "role": "user", "content": "Hello" }],
        "temperature": 0.3,
        "response_format": { "type": "json_object" }
    })
}

#[tokio::test]
async fn test_relay_missing_fields_is_bad_request() {
    let harness = TestHarness::new().await;

    let bodies = [
        json!({}),
        json!({ "payload": chat_payload() }),
        json!({ "api_key": TEST_GROQ_API_KEY }),
        json!({ "api_key": "", "payload": chat_payload() }),
        json!({ "api_key": TEST_GROQ_API_KEY, "payload": {} }),
    ];
    for body in bodies {
        let response = harness.server.post("/api/ai/groq").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "success": false, "error": "api_key and payload required" })
        );
    }

    assert_eq!(harness.groq.request_count().await, 0);
}

#[tokio::test]
async fn test_relay_forwards_payload_and_returns_body_verbatim() {
    let harness = TestHarness::new().await;
    let upstream = MockGroq::completion_response("Hi there");
    harness.groq.mock_exact(&chat_payload(), 200, upstream.clone()).await;

    let response = harness
        .server
        .post("/api/ai/groq")
        .json(&json!({ "api_key": TEST_GROQ_API_KEY, "payload": chat_payload() }))
        .await;

    response.assert_status_ok();
    // No envelope: the upstream body comes back as is
    assert_eq!(response.json::<Value>(), upstream);
}

#[tokio::test]
async fn test_relay_passes_through_rate_limit_status() {
    let harness = TestHarness::new().await;
    harness
        .groq
        .mock_exact(&chat_payload(), 429, json!({ "error": "rate limited" }))
        .await;

    let response = harness
        .server
        .post("/api/ai/groq")
        .json(&json!({ "api_key": TEST_GROQ_API_KEY, "payload": chat_payload() }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.json::<Value>(), json!({ "error": "rate limited" }));
}

#[tokio::test]
async fn test_relay_passes_through_provider_error_body() {
    let harness = TestHarness::new().await;
    let upstream = json!({
        "error": {
            "message": "Invalid API Key",
            "type": "invalid_request_error",
            "code": "invalid_api_key"
        }
    });
    harness.groq.mock_any(401, upstream.clone()).await;

    let response = harness
        .server
        .post("/api/ai/groq")
        .json(&json!({ "api_key": "gsk_wrong", "payload": chat_payload() }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>(), upstream);
}

#[tokio::test]
async fn test_relay_timeout_is_server_error() {
    // The harness config uses a 1 second relay timeout
    let harness = TestHarness::new().await;
    harness.groq.mock_slow(Duration::from_secs(5)).await;

    let start = Instant::now();
    let response = harness
        .server
        .post("/api/ai/groq")
        .json(&json!({ "api_key": TEST_GROQ_API_KEY, "payload": chat_payload() }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Upstream request timed out");
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_relay_non_json_upstream_is_server_error() {
    let harness = TestHarness::new().await;
    harness.groq.mock_garbage(502).await;

    let response = harness
        .server
        .post("/api/ai/groq")
        .json(&json!({ "api_key": TEST_GROQ_API_KEY, "payload": chat_payload() }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("non-JSON"));
}

#[tokio::test]
async fn test_relay_invalid_key_characters_is_bad_request() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/api/ai/groq")
        .json(&json!({ "api_key": "gsk\nbroken", "payload": chat_payload() }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(harness.groq.request_count().await, 0);
}

#[tokio::test]
async fn test_relay_through_stub_provider() {
    let relay = Arc::new(StubRelay {
        status: StatusCode::ACCEPTED,
        body: json!({ "queued": true }),
    });
    let server = stub_server(
        test_config("http://127.0.0.1:1", "http://127.0.0.1:1", None),
        StubGenerator::replying("unused"),
        relay,
    );

    // The relay path needs no server-side credential
    let response = server
        .post("/api/ai/groq")
        .json(&json!({ "api_key": TEST_GROQ_API_KEY, "payload": chat_payload() }))
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    assert_eq!(response.json::<Value>(), json!({ "queued": true }));
}

#[tokio::test]
async fn test_relay_oversized_body_is_payload_too_large_envelope() {
    let harness = TestHarness::new().await;

    let mut payload = chat_payload();
    payload["messages"][0]["content"] = json!("a".repeat(2 * 1024 * 1024));

    let response = harness
        .server
        .post("/api/ai/groq")
        .json(&json!({ "api_key": TEST_GROQ_API_KEY, "payload": payload }))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json::<Value>()["success"], false);
    assert_eq!(harness.groq.request_count().await, 0);
}
