use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::model::AnswerResponse;
use super::{AnswerProvider, ProviderError};

static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    format!(
        "{}-{}-{}-{}",
        env!("CARGO_PKG_NAME"),
        std::env::consts::OS,
        std::env::consts::ARCH,
        env!("CARGO_PKG_VERSION")
    )
});

/// Provider backed by the hosted answer function over HTTP.
///
/// One attempt per turn; the conversation layer substitutes the canned
/// fallback on failure.
pub struct HttpAnswerProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAnswerProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT.as_str())
            .pool_max_idle_per_host(8)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl AnswerProvider for HttpAnswerProvider {
    async fn answer(
        &self,
        message: &str,
        history: Option<&[String]>,
        context: Option<&serde_json::Value>,
    ) -> Result<AnswerResponse, ProviderError> {
        let body = serde_json::json!({
            "message": message,
            "conversationHistory": history,
            "context": context,
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
