//! Exercises the client against a local stand-in for the completion API.

use assert_matches::assert_matches;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use guardian_core::generation::{GenerationError, GenerationRequest, TextGenerator};
use guardian_llm::{ChatCompletionClient, LlmConfig};

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: String, api_key: Option<&str>) -> ChatCompletionClient {
    ChatCompletionClient::new(LlmConfig {
        api_key: api_key.map(str::to_string),
        base_url,
        model: "test-model".to_string(),
        request_timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn returns_first_choice_content() {
    async fn handler(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(headers["authorization"], "Bearer sk-test");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Summarize my week.");
        Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "All good." } }]
        }))
    }

    let base = serve(Router::new().route("/chat/completions", post(handler))).await;
    let client = client_for(base, Some("sk-test"));

    let request = GenerationRequest::new("Summarize my week.", 0.3).with_system_prompt("persona");
    let text = client.generate(&request).await.unwrap();
    assert_eq!(text, "All good.");
}

#[tokio::test]
async fn non_success_status_maps_to_api_error() {
    async fn handler() -> (StatusCode, &'static str) {
        (StatusCode::TOO_MANY_REQUESTS, "rate limited")
    }

    let base = serve(Router::new().route("/chat/completions", post(handler))).await;
    let client = client_for(base, Some("sk-test"));

    let err = client
        .generate(&GenerationRequest::new("hi", 0.7))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GenerationError::Api {
            status: 429,
            body: "rate limited".to_string()
        }
    );
}

#[tokio::test]
async fn empty_choices_map_to_empty_response() {
    async fn handler() -> Json<Value> {
        Json(json!({ "choices": [] }))
    }

    let base = serve(Router::new().route("/chat/completions", post(handler))).await;
    let client = client_for(base, Some("sk-test"));

    let err = client
        .generate(&GenerationRequest::new("hi", 0.7))
        .await
        .unwrap_err();
    assert_eq!(err, GenerationError::EmptyResponse);
}

#[tokio::test]
async fn missing_api_key_is_not_configured() {
    let client = client_for("http://127.0.0.1:9".to_string(), None);
    assert!(!client.is_configured());

    let err = client
        .generate(&GenerationRequest::new("hi", 0.7))
        .await
        .unwrap_err();
    assert_matches!(err, GenerationError::NotConfigured(_));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{addr}"), Some("sk-test"));
    let err = client
        .generate(&GenerationRequest::new("hi", 0.7))
        .await
        .unwrap_err();
    assert_matches!(err, GenerationError::Transport(_));
}
