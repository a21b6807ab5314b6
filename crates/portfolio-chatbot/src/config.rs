//! Runtime settings for the relay server and the HTTP answer provider.
//!
//! Flags win over environment variables; environment variables win over
//! defaults. Secrets (the upstream API key) are only ever read from the
//! environment.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::constants::DEFAULT_CONTACT_EMAIL;

pub const ENV_UPSTREAM_URL: &str = "CHATBOT_UPSTREAM_URL";
pub const ENV_API_KEY: &str = "CHATBOT_API_KEY";
pub const ENV_CONTACT_EMAIL: &str = "CHATBOT_CONTACT_EMAIL";
pub const ENV_WORD_DELAY_MS: &str = "CHATBOT_WORD_DELAY_MS";

/// Delay between synthesized stream frames.
pub const DEFAULT_WORD_DELAY: Duration = Duration::from_millis(30);

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: SocketAddr,
    /// Endpoint of the hosted answer function. Required unless the server
    /// runs against the mock provider.
    pub upstream_url: Option<String>,
    pub api_key: Option<String>,
    /// Address offered in the fallback answer's `mailto:` link.
    pub contact_email: String,
    pub word_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
            upstream_url: None,
            api_key: None,
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            word_delay: DEFAULT_WORD_DELAY,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(url) = env::var(ENV_UPSTREAM_URL) {
            if !url.is_empty() {
                settings.upstream_url = Some(url);
            }
        }
        if let Ok(key) = env::var(ENV_API_KEY) {
            if !key.is_empty() {
                settings.api_key = Some(key);
            }
        }
        if let Ok(email) = env::var(ENV_CONTACT_EMAIL) {
            if !email.is_empty() {
                settings.contact_email = email;
            }
        }
        if let Ok(raw) = env::var(ENV_WORD_DELAY_MS) {
            match raw.parse::<u64>() {
                Ok(ms) => settings.word_delay = Duration::from_millis(ms),
                Err(err) => {
                    tracing::warn!(%raw, %err, "ignoring unparsable {ENV_WORD_DELAY_MS}");
                },
            }
        }

        settings
    }
}
