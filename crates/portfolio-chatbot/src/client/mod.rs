//! HTTP consumer of the chat relay.
//!
//! `ChatbotClient` is the conversation layer: it owns the rolling
//! [`ConversationState`], sends each turn to the relay with the current
//! history and context attached, and folds the reply back into state.
//! On upstream failure the non-streaming path substitutes a canned
//! fallback answer, so the caller always gets a presentable assistant
//! turn. A streaming turn takes `&mut self`, so a second turn cannot
//! start while one is in flight.

use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::api_client::model::{AnswerResponse, StreamFrame};
use crate::conversation::{ConversationContext, ConversationState, fallback_response};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("chat endpoint returned status {0}")]
    Status(u16),
    /// In-band error frame from the relay.
    #[error("{0}")]
    Relay(String),
    #[error("stream ended without a complete response")]
    MissingFinal,
}

/// One parsed line of the SSE body.
#[derive(Debug)]
pub enum SseLine {
    Frame(StreamFrame),
    RelayError(String),
    Done,
    /// Not a data line, or a malformed frame; skipped without aborting.
    Ignored,
}

#[derive(Deserialize)]
struct ErrorFrame {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

/// Classify one line of the event stream. Malformed JSON is treated as
/// transient noise, not a fatal condition.
pub fn parse_sse_line(line: &str) -> SseLine {
    let Some(data) = line.strip_prefix("data: ") else {
        return SseLine::Ignored;
    };
    if data == crate::server::stream::DONE_SENTINEL {
        return SseLine::Done;
    }
    if let Ok(error) = serde_json::from_str::<ErrorFrame>(data) {
        return SseLine::RelayError(error.details.unwrap_or(error.error));
    }
    match serde_json::from_str::<StreamFrame>(data) {
        Ok(frame) => SseLine::Frame(frame),
        Err(_) => SseLine::Ignored,
    }
}

pub struct ChatbotClient {
    http: Client,
    base_url: String,
    contact_email: String,
    state: ConversationState,
    last_error: Option<String>,
}

impl ChatbotClient {
    pub fn new(
        base_url: impl Into<String>,
        contact_email: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            contact_email: contact_email.into(),
            state: ConversationState::new(),
            last_error: None,
        })
    }

    /// Send one turn without streaming. Never fails: an upstream or
    /// transport error is replaced by the canned fallback answer, at most
    /// once per turn.
    pub async fn send_message(&mut self, text: &str) -> AnswerResponse {
        self.state.push_user_turn(text);

        match self.request_answer(text).await {
            Ok(response) => {
                self.state.update_context(&response);
                self.state.push_assistant_turn(&response.answer);
                self.last_error = None;
                response
            },
            Err(err) => {
                tracing::error!(%err, "chat request failed, substituting fallback answer");
                self.last_error = Some(err.to_string());
                fallback_response(&self.contact_email)
            },
        }
    }

    /// Send one turn over the streaming endpoint, invoking `on_frame` for
    /// every well-formed frame. Returns the completed answer after the
    /// stream ends; history and context are only updated on success.
    pub async fn send_message_streaming<F>(
        &mut self,
        text: &str,
        mut on_frame: F,
    ) -> Result<AnswerResponse, ClientError>
    where
        F: FnMut(&StreamFrame),
    {
        self.state.push_user_turn(text);

        match self.stream_turn(text, &mut on_frame).await {
            Ok(frame) => {
                let response = frame.into_response();
                self.state.update_context(&response);
                self.state.push_assistant_turn(&response.answer);
                self.last_error = None;
                Ok(response)
            },
            Err(err) => {
                tracing::error!(%err, "streaming chat request failed");
                self.last_error = Some(err.to_string());
                Err(err)
            },
        }
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.last_error = None;
    }

    pub fn history(&self) -> &[String] {
        self.state.history()
    }

    pub fn context(&self) -> &ConversationContext {
        self.state.context()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "message": text,
            "conversationHistory": self.state.history(),
            "context": self.state.context(),
        })
    }

    async fn request_answer(&self, text: &str) -> Result<AnswerResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/chatbot", self.base_url))
            .json(&self.request_body(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    async fn stream_turn<F>(&self, text: &str, on_frame: &mut F) -> Result<StreamFrame, ClientError>
    where
        F: FnMut(&StreamFrame),
    {
        let response = self
            .http
            .post(format!("{}/api/chatbot/stream", self.base_url))
            .json(&self.request_body(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let mut body = response.bytes_stream();
        let mut buffer = String::new();
        let mut finale: Option<StreamFrame> = None;

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // Frames can straddle chunk boundaries; only parse whole lines.
            while let Some(newline) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline).collect();
                match parse_sse_line(line.trim_end_matches(['\n', '\r'])) {
                    SseLine::Frame(frame) => {
                        on_frame(&frame);
                        if frame.is_complete {
                            finale = Some(frame);
                        }
                    },
                    SseLine::RelayError(message) => return Err(ClientError::Relay(message)),
                    SseLine::Done | SseLine::Ignored => {},
                }
            }
        }

        finale.ok_or(ClientError::MissingFinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_frames_parse() {
        let line = r#"data: {"answer":"Silvio","category":"GENERAL","sources":[],"urls":[],"isComplete":false}"#;
        match parse_sse_line(line) {
            SseLine::Frame(frame) => {
                assert_eq!(frame.answer, "Silvio");
                assert!(!frame.is_complete);
            },
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn done_sentinel_terminates() {
        assert!(matches!(parse_sse_line("data: [DONE]"), SseLine::Done));
    }

    #[test]
    fn error_frames_prefer_details() {
        let line = r#"data: {"error":"Streaming failed","details":"provider offline"}"#;
        match parse_sse_line(line) {
            SseLine::RelayError(message) => assert_eq!(message, "provider offline"),
            other => panic!("expected relay error, got {other:?}"),
        }

        let line = r#"data: {"error":"Streaming failed"}"#;
        match parse_sse_line(line) {
            SseLine::RelayError(message) => assert_eq!(message, "Streaming failed"),
            other => panic!("expected relay error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_frames_are_skipped_not_fatal() {
        assert!(matches!(parse_sse_line("data: {\"answer\": tru"), SseLine::Ignored));
        assert!(matches!(parse_sse_line("data: 42"), SseLine::Ignored));
        assert!(matches!(parse_sse_line(": keep-alive comment"), SseLine::Ignored));
        assert!(matches!(parse_sse_line(""), SseLine::Ignored));
    }
}
