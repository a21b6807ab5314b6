//! The answer-provider boundary.
//!
//! The hosted language-model function is opaque to this crate: given a
//! message, optional history, and optional context, it returns one
//! structured [`AnswerResponse`]. Everything behind that contract lives
//! out of process; [`AnswerProvider`] is the seam the relay is built
//! against, so tests and offline runs can swap in [`StaticAnswerProvider`].

mod http;
mod mock;
pub mod model;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpAnswerProvider;
pub use mock::StaticAnswerProvider;
pub use model::{AnswerResponse, QuestionCategory, StreamFrame};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("answer provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Unavailable(String),
}

/// One-shot capability of the hosted answer function.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn answer(
        &self,
        message: &str,
        history: Option<&[String]>,
        context: Option<&serde_json::Value>,
    ) -> Result<AnswerResponse, ProviderError>;
}
