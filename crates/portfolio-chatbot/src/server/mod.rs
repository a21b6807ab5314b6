//! The chat relay HTTP server.

pub mod api;
pub mod stream;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use eyre::Result;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::api_client::AnswerProvider;
use crate::config::Settings;
use crate::error::{ChatError, HISTORY_MUST_BE_STRINGS, MESSAGE_REQUIRED};

/// Application state shared across handlers. The provider handle is
/// injected once at construction; handlers never initialize it lazily.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn AnswerProvider>,
    pub settings: Arc<Settings>,
}

/// Validated chat request body, shared by both endpoints.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_history: Option<Vec<String>>,
    /// Forwarded to the provider opaquely; the relay never interprets it.
    pub context: Option<Value>,
}

impl ChatRequest {
    /// Hand-validate the raw body. `message` must be a non-empty JSON
    /// string; `conversationHistory`, when present, an array of strings.
    pub fn from_value(body: &Value) -> Result<Self, ChatError> {
        let message = match body.get("message") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(ChatError::InvalidRequest(MESSAGE_REQUIRED)),
        };

        let conversation_history = match body.get("conversationHistory") {
            None | Some(Value::Null) => None,
            Some(Value::Array(entries)) => {
                let mut lines = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        Value::String(s) => lines.push(s.clone()),
                        _ => return Err(ChatError::InvalidRequest(HISTORY_MUST_BE_STRINGS)),
                    }
                }
                Some(lines)
            },
            Some(_) => return Err(ChatError::InvalidRequest(HISTORY_MUST_BE_STRINGS)),
        };

        let context = match body.get("context") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        };

        Ok(Self {
            message,
            conversation_history,
            context,
        })
    }
}

pub struct WebServer {
    addr: SocketAddr,
    state: AppState,
}

impl WebServer {
    pub fn new(provider: Arc<dyn AnswerProvider>, settings: Settings) -> Self {
        Self {
            addr: settings.bind,
            state: AppState {
                provider,
                settings: Arc::new(settings),
            },
        }
    }

    fn build_router(&self) -> Router {
        Router::new()
            .route("/api/health", get(api::health_check))
            .route("/api/chatbot", post(api::chat))
            .route("/api/chatbot/stream", post(stream::chat_stream))
            // The site frontend is served elsewhere; allow it to call in.
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until ctrl-c.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve_with_shutdown(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    }

    /// Serve on an already-bound listener (tests bind port 0 themselves).
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let router = self.build_router();
        tracing::info!("chat relay listening on http://{}", listener.local_addr()?);
        axum::serve(listener, router).await?;
        Ok(())
    }

    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let router = self.build_router();
        tracing::info!("chat relay listening on http://{}", listener.local_addr()?);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("chat relay shutting down");
            })
            .await?;
        Ok(())
    }
}
