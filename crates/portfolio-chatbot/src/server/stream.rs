//! The streaming relay: one upstream call re-emitted as a word-paced SSE
//! stream.
//!
//! The upstream call is not incremental; the stream is synthesized after
//! the fact by slicing the finished answer on single spaces. Each frame
//! carries the space-joined accumulation of the words seen so far, so a
//! frame's `answer` is always a whole-word prefix of the next one, and the
//! concatenation never loses or duplicates a word.

use std::convert::Infallible;
use std::sync::Arc;

use async_stream::stream;
use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use super::{AppState, ChatRequest};
use crate::api_client::model::{AnswerResponse, StreamFrame};

/// Terminal sentinel written after the last frame.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Streaming chat endpoint.
///
/// Validation failures are rejected with a 400 before any stream output.
/// The provider call happens inside the response stream, so by the time it
/// can fail the SSE headers are already on the wire; the failure is
/// reported as an in-band error frame and the stream closes.
pub async fn chat_stream(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let request = match ChatRequest::from_value(&body) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    let provider = Arc::clone(&state.provider);
    let word_delay = state.settings.word_delay;

    let frames = stream! {
        let outcome = provider
            .answer(
                &request.message,
                request.conversation_history.as_deref(),
                request.context.as_ref(),
            )
            .await;

        match outcome {
            Ok(response) => {
                for frame in word_frames(&response) {
                    if let Ok(payload) = serde_json::to_string(&frame) {
                        yield Ok::<Event, Infallible>(Event::default().data(payload));
                    }
                    tokio::time::sleep(word_delay).await;
                }
                yield Ok(Event::default().data(DONE_SENTINEL));
            },
            Err(err) => {
                tracing::error!(%err, "answer provider call failed mid-stream");
                let payload = serde_json::json!({
                    "error": "Streaming failed",
                    "details": err.to_string(),
                });
                yield Ok(Event::default().data(payload.to_string()));
            },
        }
    };

    Sse::new(frames).into_response()
}

/// Slice a finished answer into one frame per space-separated word.
///
/// Splitting is on single spaces exactly: an empty answer yields a single
/// empty complete frame, and runs of spaces round-trip unchanged.
pub fn word_frames(response: &AnswerResponse) -> Vec<StreamFrame> {
    let words: Vec<&str> = response.answer.split(' ').collect();
    let mut frames = Vec::with_capacity(words.len());
    let mut accumulated = String::new();

    for (index, word) in words.iter().enumerate() {
        if index > 0 {
            accumulated.push(' ');
        }
        accumulated.push_str(word);

        frames.push(StreamFrame {
            answer: accumulated.clone(),
            category: response.category,
            sources: response.sources.clone(),
            urls: response.urls.clone(),
            follow_up_suggestions: response.follow_up_suggestions.clone(),
            is_complete: index == words.len() - 1,
        });
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::QuestionCategory;

    fn response(answer: &str) -> AnswerResponse {
        AnswerResponse {
            answer: answer.to_string(),
            category: QuestionCategory::Experience,
            sources: vec!["EY".to_string()],
            urls: vec![],
            follow_up_suggestions: None,
        }
    }

    #[test]
    fn one_frame_per_word_with_growing_prefixes() {
        let frames = word_frames(&response("Silvio works at EY."));

        let answers: Vec<&str> = frames.iter().map(|f| f.answer.as_str()).collect();
        assert_eq!(
            answers,
            ["Silvio", "Silvio works", "Silvio works at", "Silvio works at EY."]
        );

        for pair in frames.windows(2) {
            assert!(pair[1].answer.starts_with(&pair[0].answer));
        }
    }

    #[test]
    fn exactly_the_last_frame_is_complete() {
        let frames = word_frames(&response("a b c"));
        let complete: Vec<bool> = frames.iter().map(|f| f.is_complete).collect();
        assert_eq!(complete, [false, false, true]);
    }

    #[test]
    fn final_frame_round_trips_the_answer() {
        for answer in ["Silvio works at EY.", "one", "spaced  out", " leading and trailing "] {
            let frames = word_frames(&response(answer));
            assert_eq!(frames.len(), answer.split(' ').count());
            assert_eq!(frames.last().unwrap().answer, answer);
        }
    }

    #[test]
    fn empty_answer_yields_one_empty_complete_frame() {
        let frames = word_frames(&response(""));
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].answer, "");
        assert!(frames[0].is_complete);
    }

    #[test]
    fn frames_carry_the_response_metadata() {
        let frames = word_frames(&response("hello there"));
        assert!(frames.iter().all(|f| f.category == QuestionCategory::Experience));
        assert!(frames.iter().all(|f| f.sources == ["EY"]));
    }
}
