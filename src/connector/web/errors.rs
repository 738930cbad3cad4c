use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::domain::DomainError;

#[derive(Serialize)]
pub(super) struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub(super) struct ErrorResponse {
    pub error: ErrorBody,
}

pub(super) fn internal_error_response(err: DomainError) -> Response {
    error!("request failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: ErrorBody {
                code: "internal_error".to_string(),
                message: "Something went wrong rendering the chat".to_string(),
            },
        }),
    )
        .into_response()
}
