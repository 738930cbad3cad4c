//! Gemini adapter against a local stand-in for the generateContent endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Json;
use geminichat::{
    ApiKey, ChatClient, ChatClientFactory, GeminiClientFactory, GenerationConfig,
    SafetySettings, SystemPrompt, Turn,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone)]
struct MockApi {
    status: StatusCode,
    reply: Value,
    delay: Duration,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

impl MockApi {
    fn new(status: StatusCode, reply: Value) -> Self {
        Self {
            status,
            reply,
            delay: Duration::ZERO,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn generate(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    api.seen.lock().unwrap().push((key, body));
    tokio::time::sleep(api.delay).await;
    (api.status, Json(api.reply.clone()))
}

async fn start(api: MockApi) -> String {
    let router = axum::Router::new()
        .route(
            "/v1beta/models/gemini-test:generateContent",
            post(generate),
        )
        .with_state(api);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    format!("http://{}", addr)
}

fn factory(base_url: &str, timeout: Duration) -> GeminiClientFactory {
    GeminiClientFactory::new(
        base_url,
        "gemini-test",
        GenerationConfig::default(),
        SafetySettings::default(),
        timeout,
    )
}

fn key() -> ApiKey {
    ApiKey::parse("test-key").unwrap()
}

#[tokio::test]
async fn sends_history_config_and_key_and_returns_text() {
    let api = MockApi::new(
        StatusCode::OK,
        json!({"candidates": [{"content": {"role": "model", "parts": [{"text": "Hi there!"}]}, "finishReason": "STOP"}]}),
    );
    let base = start(api.clone()).await;
    let client = factory(&base, Duration::from_secs(5)).connect(&key());

    let reply = client
        .send_message(
            &SystemPrompt::new("You are a helpful assistant."),
            &[Turn::new("Earlier", "Reply")],
            "Hello",
        )
        .await
        .expect("reply");

    assert_eq!(reply, "Hi there!");
    let seen = api.seen.lock().unwrap();
    let (key, body) = &seen[0];
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(
        body["contents"],
        json!([
            {"role": "user", "parts": [{"text": "Earlier"}]},
            {"role": "model", "parts": [{"text": "Reply"}]},
            {"role": "user", "parts": [{"text": "Hello"}]}
        ])
    );
    assert_eq!(
        body["systemInstruction"],
        json!({"parts": [{"text": "You are a helpful assistant."}]})
    );
    assert_eq!(body["generationConfig"]["topP"], json!(0.95));
    assert_eq!(body["generationConfig"]["responseMimeType"], "text/plain");
    let safety = body["safetySettings"].as_array().unwrap();
    assert_eq!(safety.len(), 4);
    assert!(safety.iter().all(|s| s["threshold"] == "BLOCK_NONE"));
}

#[tokio::test]
async fn api_errors_become_model_call_errors() {
    let api = MockApi::new(
        StatusCode::BAD_REQUEST,
        json!({"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}),
    );
    let base = start(api).await;
    let client = factory(&base, Duration::from_secs(5)).connect(&key());

    let err = client
        .send_message(&SystemPrompt::empty(), &[], "Hello")
        .await
        .unwrap_err();

    assert!(err.is_model_call());
    assert!(err.to_string().contains("400"));
    assert!(err.to_string().contains("API key not valid."));
}

#[tokio::test]
async fn blocked_prompt_is_an_error() {
    let api = MockApi::new(
        StatusCode::OK,
        json!({"promptFeedback": {"blockReason": "OTHER"}}),
    );
    let base = start(api).await;
    let client = factory(&base, Duration::from_secs(5)).connect(&key());

    let err = client
        .send_message(&SystemPrompt::empty(), &[], "Hello")
        .await
        .unwrap_err();

    assert!(err.is_model_call());
    assert!(err.to_string().contains("OTHER"));
}

#[tokio::test]
async fn slow_responses_time_out() {
    let mut api = MockApi::new(StatusCode::OK, json!({"candidates": []}));
    api.delay = Duration::from_secs(2);
    let base = start(api).await;
    let client = factory(&base, Duration::from_millis(200)).connect(&key());

    let err = client
        .send_message(&SystemPrompt::empty(), &[], "Hello")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Model call failed: request timed out");
}

#[tokio::test]
async fn unreachable_service_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let client = factory(&base, Duration::from_secs(2)).connect(&key());

    let err = client
        .send_message(&SystemPrompt::empty(), &[], "Hello")
        .await
        .unwrap_err();

    assert!(err.is_model_call());
}
