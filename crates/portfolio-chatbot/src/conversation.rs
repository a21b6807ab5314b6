//! Rolling conversation state for one chat session.
//!
//! The state holder keeps two things across turns: a bounded history of
//! `"User: …"` / `"Assistant: …"` lines that is sent back upstream with
//! every request, and a small derived [`ConversationContext`] recomputed
//! after each completed answer. Neither outlives the session.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::api_client::model::{AnswerResponse, QuestionCategory, StreamFrame};
use crate::constants::FALLBACK_FOLLOW_UPS;

/// History entries kept per session; oldest are evicted first.
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// Cap on the derived `previous_topic` string.
const TOPIC_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. Immutable once finalized, except the in-progress
/// assistant tail, which is updated in place as stream frames arrive.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub role: Role,
    pub timestamp: OffsetDateTime,
    pub category: Option<QuestionCategory>,
    pub sources: Vec<String>,
    pub urls: Vec<String>,
    pub follow_up_suggestions: Vec<String>,
}

impl ChatMessage {
    pub fn new_user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role: Role::User,
            timestamp: OffsetDateTime::now_utc(),
            category: None,
            sources: Vec::new(),
            urls: Vec::new(),
            follow_up_suggestions: Vec::new(),
        }
    }

    pub fn new_assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            ..Self::new_user(content)
        }
    }

    /// Update the in-progress assistant tail from a stream frame.
    pub fn apply_frame(&mut self, frame: &StreamFrame) {
        self.content = frame.answer.clone();
        self.category = Some(frame.category);
        self.sources = frame.sources.clone();
        self.urls = frame.urls.clone();
        self.follow_up_suggestions = frame.follow_up_suggestions.clone().unwrap_or_default();
    }

    pub fn from_response(response: &AnswerResponse) -> Self {
        let mut message = Self::new_assistant(response.answer.clone());
        message.category = Some(response.category);
        message.sources = response.sources.clone();
        message.urls = response.urls.clone();
        message.follow_up_suggestions = response.follow_up_suggestions.clone().unwrap_or_default();
        message
    }
}

/// Context derived from completed answers, echoed back upstream so the
/// answer function can stay on topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_topic: Option<String>,
    #[serde(default)]
    pub mentioned_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_interest_area: Option<QuestionCategory>,
}

#[derive(Debug, Default)]
pub struct ConversationState {
    history: Vec<String>,
    context: ConversationContext,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user_turn(&mut self, text: &str) {
        self.push(format!("User: {text}"));
    }

    pub fn push_assistant_turn(&mut self, answer: &str) {
        self.push(format!("Assistant: {answer}"));
    }

    fn push(&mut self, line: String) {
        self.history.push(line);
        if self.history.len() > MAX_HISTORY_ENTRIES {
            let excess = self.history.len() - MAX_HISTORY_ENTRIES;
            self.history.drain(..excess);
        }
    }

    /// Recompute the derived context from a completed answer: topic from
    /// the first sentence, sources merged in, interest area replaced.
    pub fn update_context(&mut self, response: &AnswerResponse) {
        self.context.previous_topic = Some(extract_topic(&response.answer));
        merge_unique(&mut self.context.mentioned_sources, &response.sources);
        self.context.user_interest_area = Some(response.category);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }
}

/// First sentence of the answer, capped at [`TOPIC_MAX_CHARS`] characters.
fn extract_topic(answer: &str) -> String {
    let first_sentence = answer.split('.').next().unwrap_or(answer);
    first_sentence.chars().take(TOPIC_MAX_CHARS).collect()
}

/// Append the entries of `new` not already present, keeping first-seen order.
fn merge_unique(existing: &mut Vec<String>, new: &[String]) {
    for entry in new {
        if !existing.iter().any(|seen| seen == entry) {
            existing.push(entry.clone());
        }
    }
}

/// Canned answer substituted when the upstream call fails, so the chat is
/// never left without an assistant turn.
pub fn fallback_response(contact_email: &str) -> AnswerResponse {
    AnswerResponse {
        answer: format!(
            "I apologize, but I'm having trouble processing your question right now. This could \
             be due to a connection issue or service unavailability. Please try again in a \
             moment, or feel free to reach out directly at {contact_email}."
        ),
        category: QuestionCategory::General,
        sources: Vec::new(),
        urls: vec![format!("mailto:{contact_email}")],
        follow_up_suggestions: Some(FALLBACK_FOLLOW_UPS.iter().map(|s| (*s).to_string()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(answer: &str, category: QuestionCategory, sources: &[&str]) -> AnswerResponse {
        AnswerResponse {
            answer: answer.to_string(),
            category,
            sources: sources.iter().map(|s| (*s).to_string()).collect(),
            urls: Vec::new(),
            follow_up_suggestions: None,
        }
    }

    #[test]
    fn eleventh_entry_evicts_the_oldest() {
        let mut state = ConversationState::new();
        for i in 0..11 {
            state.push_user_turn(&format!("question {i}"));
        }

        assert_eq!(state.history().len(), MAX_HISTORY_ENTRIES);
        assert_eq!(state.history()[0], "User: question 1");
        assert_eq!(state.history()[9], "User: question 10");
    }

    #[test]
    fn turns_are_formatted_with_role_prefixes() {
        let mut state = ConversationState::new();
        state.push_user_turn("hello");
        state.push_assistant_turn("hi there");

        assert_eq!(state.history(), ["User: hello", "Assistant: hi there"]);
    }

    #[test]
    fn context_tracks_topic_sources_and_interest() {
        let mut state = ConversationState::new();
        state.update_context(&response(
            "Silvio works at EY. He also writes open source.",
            QuestionCategory::Experience,
            &["EY"],
        ));
        state.update_context(&response(
            "He studied in Trieste.",
            QuestionCategory::Education,
            &["EY", "University of Trieste"],
        ));

        let context = state.context();
        assert_eq!(context.previous_topic.as_deref(), Some("He studied in Trieste"));
        assert_eq!(context.mentioned_sources, ["EY", "University of Trieste"]);
        assert_eq!(context.user_interest_area, Some(QuestionCategory::Education));
    }

    #[test]
    fn topic_is_capped_at_one_hundred_chars() {
        let long = "x".repeat(300);
        let mut state = ConversationState::new();
        state.update_context(&response(&long, QuestionCategory::General, &[]));

        assert_eq!(state.context().previous_topic.as_ref().unwrap().chars().count(), 100);
    }

    #[test]
    fn reset_clears_history_and_context() {
        let mut state = ConversationState::new();
        state.push_user_turn("hello");
        state.update_context(&response("Hi.", QuestionCategory::General, &["Portfolio"]));

        state.reset();

        assert!(state.history().is_empty());
        assert_eq!(*state.context(), ConversationContext::default());
    }

    #[test]
    fn fallback_answer_is_presentable() {
        let fallback = fallback_response("owner@example.com");

        assert_eq!(fallback.category, QuestionCategory::General);
        assert!(fallback.answer.contains("owner@example.com"));
        assert_eq!(fallback.urls, ["mailto:owner@example.com"]);
        assert_eq!(fallback.follow_up_suggestions.unwrap().len(), 3);
    }

    #[test]
    fn assistant_tail_tracks_stream_frames() {
        let mut tail = ChatMessage::new_assistant("");
        tail.apply_frame(&StreamFrame {
            answer: "Silvio works".to_string(),
            category: QuestionCategory::Experience,
            sources: vec!["EY".to_string()],
            urls: vec![],
            follow_up_suggestions: None,
            is_complete: false,
        });

        assert_eq!(tail.content, "Silvio works");
        assert_eq!(tail.category, Some(QuestionCategory::Experience));
        assert_eq!(tail.role, Role::Assistant);
    }
}
