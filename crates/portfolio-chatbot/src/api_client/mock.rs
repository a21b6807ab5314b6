use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::model::{AnswerResponse, QuestionCategory};
use super::{AnswerProvider, ProviderError};

/// Scripted provider for tests and for `serve --mock`.
///
/// Scripted replies are consumed in order; once the script is exhausted the
/// provider falls through to a fixed answer or a sticky failure, or errors
/// if neither was given.
#[derive(Debug, Default)]
pub struct StaticAnswerProvider {
    // std Mutex: never held across an await.
    script: Mutex<VecDeque<Result<AnswerResponse, String>>>,
    fallthrough: Option<AnswerResponse>,
    sticky_failure: Option<String>,
    calls: AtomicUsize,
}

impl StaticAnswerProvider {
    /// Answer every call with the same response.
    pub fn always(response: AnswerResponse) -> Self {
        Self {
            fallthrough: Some(response),
            ..Self::default()
        }
    }

    /// Fail every call with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sticky_failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Queue one scripted reply ahead of the fallthrough behavior.
    pub fn push_answer(&self, response: AnswerResponse) {
        self.script
            .lock()
            .expect("provider script lock poisoned")
            .push_back(Ok(response));
    }

    /// Queue one scripted failure ahead of the fallthrough behavior.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .expect("provider script lock poisoned")
            .push_back(Err(message.into()));
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fixed multi-section answer for offline development.
    pub fn canned_portfolio() -> Self {
        Self::always(AnswerResponse {
            answer: "## Featured work\n\
                     - A streaming chat relay for this site\n\
                     - An open-source stock analysis library\n\n\
                     Ask about any of these and I can go deeper."
                .to_string(),
            category: QuestionCategory::Projects,
            sources: vec!["Portfolio".to_string()],
            urls: vec![],
            follow_up_suggestions: Some(vec![
                "What is the stock analysis library?".to_string(),
                "How does the chat relay work?".to_string(),
            ]),
        })
    }
}

#[async_trait]
impl AnswerProvider for StaticAnswerProvider {
    async fn answer(
        &self,
        _message: &str,
        _history: Option<&[String]>,
        _context: Option<&serde_json::Value>,
    ) -> Result<AnswerResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(scripted) = self
            .script
            .lock()
            .expect("provider script lock poisoned")
            .pop_front()
        {
            return scripted.map_err(ProviderError::Unavailable);
        }

        if let Some(message) = &self.sticky_failure {
            return Err(ProviderError::Unavailable(message.clone()));
        }

        match &self.fallthrough {
            Some(response) => Ok(response.clone()),
            None => Err(ProviderError::Unavailable(
                "mock answer script exhausted".to_string(),
            )),
        }
    }
}
