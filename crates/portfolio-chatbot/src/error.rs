use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api_client::ProviderError;

/// Rejection message for a missing or non-string `message` field.
pub const MESSAGE_REQUIRED: &str = "Message is required and must be a string";

/// Rejection message for a malformed `conversationHistory` field.
pub const HISTORY_MUST_BE_STRINGS: &str = "conversationHistory must be an array of strings";

/// Errors surfaced by the relay endpoints.
///
/// `InvalidRequest` is always reported before any stream output begins, so
/// it maps to a plain 400. An upstream failure maps to a 500 only on the
/// non-streaming endpoint; the streaming endpoint reports it as an in-band
/// error frame instead, since the SSE headers have already been written.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    InvalidRequest(&'static str),
    #[error("Failed to process message")]
    Upstream(#[source] ProviderError),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match self {
            ChatError::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            ChatError::Upstream(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to process message",
                    "details": err.to_string(),
                })),
            )
                .into_response(),
        }
    }
}
