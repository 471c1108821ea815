//! HTTP relay mail transport.
//!
//! Posts each message as JSON to a relay endpoint (a transactional email
//! provider or an internal gateway):
//!
//! ```json
//! {"subject": "...", "body": "...", "from": "...", "to": ["..."]}
//! ```

use std::time::Duration;

use async_trait::async_trait;

use quill_core::ports::{MailError, MailMessage, Mailer};

use super::mask_email;

/// Relay endpoint configuration.
#[derive(Debug, Clone)]
pub struct WebhookMailerConfig {
    pub url: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl WebhookMailerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Delivers mail through an HTTP relay.
pub struct WebhookMailer {
    config: WebhookMailerConfig,
    client: reqwest::Client,
}

impl WebhookMailer {
    pub fn new(config: WebhookMailerConfig) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl Mailer for WebhookMailer {
    async fn send(&self, message: &MailMessage) -> Result<usize, MailError> {
        let mut request = self.client.post(&self.config.url).json(message);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Mail relay rejected message");
            return Err(MailError::Rejected(format!("{status}: {detail}")));
        }

        let recipients: Vec<String> = message.to.iter().map(|to| mask_email(to)).collect();
        tracing::debug!(to = ?recipients, "Mail handed to relay");
        Ok(message.to.len())
    }
}
