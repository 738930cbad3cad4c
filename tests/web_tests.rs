use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use geminichat::connector::web::{build_router, AppState};
use geminichat::{ApiKey, Container, ContainerConfig, FsPromptRepository, MockChatClient};
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

async fn app(client: &MockChatClient, fallback_key: Option<ApiKey>) -> axum::Router {
    let config = ContainerConfig {
        fallback_api_key: fallback_key,
        ..ContainerConfig::default()
    };
    app_with(client, config).await
}

async fn app_with(client: &MockChatClient, config: ContainerConfig) -> axum::Router {
    let dir = tempdir().expect("tempdir");
    let prompt_path = dir.path().join("system_prompt.txt");
    std::fs::write(&prompt_path, "You are a helpful assistant.").expect("write prompt");
    // The prompt is read once here, so the tempdir may go away afterwards.
    let container = Container::from_parts(
        config,
        Arc::new(FsPromptRepository::new(&prompt_path)),
        Arc::new(client.clone()),
    )
    .await
    .expect("container");
    build_router(AppState::new(Arc::new(container)).expect("app state"))
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
}

fn form(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn chat_json(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = app(&MockChatClient::new(), None).await;
    let request = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .expect("request");

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"ok": true}));
}

#[tokio::test]
async fn page_without_key_only_offers_key_field() {
    let app = app(&MockChatClient::new(), None).await;
    let request = Request::builder().uri("/").body(Body::empty()).expect("request");

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("type=\"password\""));
    assert!(!body.contains("name=\"message\""));
    assert!(body.contains("No API key provided"));
}

#[tokio::test]
async fn key_from_form_unlocks_chat() {
    let client = MockChatClient::with_replies(["Hi there!"]);
    let app = app(&client, None).await;

    let (status, body) = send(&app, form("api_key=form-key&message=Hello")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Hi there!"));
    assert!(body.contains("name=\"message\""));
    assert_eq!(client.last_request().unwrap().api_key, "form-key");
}

#[tokio::test]
async fn json_turns_accumulate_per_session() {
    let client = MockChatClient::with_replies(["Hi there!", "Doing well."]);
    let app = app(&client, ApiKey::parse("env-key")).await;

    let (status, body) = send(&app, chat_json(json!({"message": "Hello"}))).await;
    assert_eq!(status, StatusCode::OK);
    let first: Value = serde_json::from_str(&body).unwrap();
    let session_id = first["session_id"].as_str().expect("session id").to_string();
    assert_eq!(first["turns"], json!([{"user": "Hello", "bot": "Hi there!"}]));
    assert_eq!(first["credential_missing"], json!(false));

    let (_, body) = send(
        &app,
        chat_json(json!({"session_id": session_id, "message": "How are you?"})),
    )
    .await;
    let second: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(second["session_id"], json!(session_id));
    assert_eq!(second["turns"].as_array().unwrap().len(), 2);
    assert_eq!(second["turns"][1]["bot"], "Doing well.");

    // A request without a session id starts over.
    let (_, body) = send(&app, chat_json(json!({}))).await;
    let fresh: Value = serde_json::from_str(&body).unwrap();
    assert_ne!(fresh["session_id"], json!(session_id));
    assert_eq!(fresh["turns"], json!([]));
}

#[tokio::test]
async fn idle_session_is_replaced_by_a_fresh_one() {
    let client = MockChatClient::new();
    let config = ContainerConfig {
        fallback_api_key: ApiKey::parse("env-key"),
        session_idle: Duration::from_millis(50),
        ..ContainerConfig::default()
    };
    let app = app_with(&client, config).await;

    let (_, body) = send(&app, chat_json(json!({"message": "Hello"}))).await;
    let first: Value = serde_json::from_str(&body).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (status, body) = send(
        &app,
        chat_json(json!({"session_id": first["session_id"], "message": "Still there?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let second: Value = serde_json::from_str(&body).unwrap();
    assert_ne!(second["session_id"], first["session_id"]);
    assert_eq!(second["turns"], json!([{"user": "Still there?", "bot": "Echo: Still there?"}]));
}

#[tokio::test]
async fn page_loads_beyond_the_limit_still_render() {
    let config = ContainerConfig {
        max_sessions: 3,
        ..ContainerConfig::default()
    };
    let app = app_with(&MockChatClient::new(), config).await;

    for _ in 0..20 {
        let request = Request::builder().uri("/").body(Body::empty()).expect("request");
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn failed_call_is_shown_and_not_recorded() {
    let client = MockChatClient::new();
    client.fail_next("API returned 403 Forbidden: API key not valid.");
    let app = app(&client, ApiKey::parse("env-key")).await;

    let (status, body) = send(&app, chat_json(json!({"message": "Hello"}))).await;

    assert_eq!(status, StatusCode::OK);
    let frame: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(frame["turns"], json!([]));
    assert!(frame["notices"][0]
        .as_str()
        .unwrap()
        .contains("API key not valid."));
}

#[tokio::test]
async fn user_text_is_escaped_in_page() {
    let client = MockChatClient::with_replies(["ok"]);
    let app = app(&client, ApiKey::parse("env-key")).await;

    let (_, body) = send(&app, form("message=%3Cscript%3Ealert(1)%3C%2Fscript%3E")).await;

    assert!(!body.contains("<script>alert(1)"));
    assert!(body.contains("&lt;script&gt;alert(1)"));
    assert_eq!(client.last_request().unwrap().message, "<script>alert(1)</script>");
}
