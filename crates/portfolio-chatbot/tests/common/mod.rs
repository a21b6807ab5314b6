#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use portfolio_chatbot::api_client::{AnswerProvider, AnswerResponse, QuestionCategory};
use portfolio_chatbot::config::Settings;
use portfolio_chatbot::server::WebServer;

/// Bind the relay on an ephemeral port and serve it in the background.
pub async fn spawn_relay(provider: Arc<dyn AnswerProvider>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let settings = Settings {
        word_delay: Duration::from_millis(1),
        ..Settings::default()
    };
    let server = WebServer::new(provider, settings);
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    addr
}

pub fn experience_answer() -> AnswerResponse {
    AnswerResponse {
        answer: "Silvio works at EY. He likes Rust.".to_string(),
        category: QuestionCategory::Experience,
        sources: vec!["EY".to_string()],
        urls: vec!["https://www.ey.com".to_string()],
        follow_up_suggestions: Some(vec!["What does he do there?".to_string()]),
    }
}
