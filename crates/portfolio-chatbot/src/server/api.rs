use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde_json::Value;

use super::{AppState, ChatRequest};
use crate::api_client::AnswerResponse;
use crate::error::ChatError;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Non-streaming chat: one upstream call, one JSON document back.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<AnswerResponse>, ChatError> {
    let request = ChatRequest::from_value(&body)?;

    let response = state
        .provider
        .answer(
            &request.message,
            request.conversation_history.as_deref(),
            request.context.as_ref(),
        )
        .await
        .map_err(|err| {
            tracing::error!(%err, "answer provider call failed");
            ChatError::Upstream(err)
        })?;

    Ok(Json(response))
}
