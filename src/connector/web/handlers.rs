use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::application::ChatFrame;
use crate::domain::{ApiKey, DomainError};

use super::errors::internal_error_response;
use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub(super) struct PageQuery {
    session_id: Option<String>,
}

/// Fields posted by the chat form; the JSON endpoint accepts the same shape.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ChatInput {
    session_id: Option<String>,
    api_key: Option<String>,
    message: Option<String>,
}

#[derive(Serialize)]
pub(super) struct OkResponse {
    ok: bool,
}

pub(super) async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(OkResponse { ok: true }))
}

pub(super) async fn show_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Response {
    let input = ChatInput {
        session_id: query.session_id,
        ..ChatInput::default()
    };
    render_page(&state, input).await
}

pub(super) async fn submit_form(
    State(state): State<AppState>,
    Form(input): Form<ChatInput>,
) -> Response {
    render_page(&state, input).await
}

pub(super) async fn chat_json(
    State(state): State<AppState>,
    Json(input): Json<ChatInput>,
) -> Response {
    match interact(&state, input).await {
        Ok((frame, _)) => Json(frame).into_response(),
        Err(e) => internal_error_response(e),
    }
}

async fn render_page(state: &AppState, input: ChatInput) -> Response {
    let result = interact(state, input).await.and_then(|(frame, key_stored)| {
        state.pages.render(&frame, state.container.model(), key_stored)
    });
    match result {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_error_response(e),
    }
}

/// One step of the chat loop for the session named in `input`.
///
/// The session lock is held for the whole step, so concurrent submissions
/// for one session are handled one after another.
async fn interact(state: &AppState, input: ChatInput) -> Result<(ChatFrame, bool), DomainError> {
    let handle = state
        .container
        .session_repository()
        .open_or_create(input.session_id.as_deref())
        .await?;
    let mut session = handle.lock().await;

    if let Some(key) = input.api_key.as_deref().and_then(ApiKey::parse) {
        session.set_api_key(key);
    }

    let frame = state
        .container
        .chat_loop()
        .step(&mut session, input.message.as_deref())
        .await;
    Ok((frame, session.api_key().is_some()))
}
