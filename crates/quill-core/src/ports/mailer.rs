//! Outbound mail port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A plain-text message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Mail transport - abstraction over delivery backends (console, HTTP relay).
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand `message` to the transport. Returns how many messages were
    /// accepted, which callers are free to ignore.
    async fn send(&self, message: &MailMessage) -> Result<usize, MailError>;
}

/// Mail transport errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail transport failed: {0}")]
    Transport(String),

    #[error("Mail rejected by relay: {0}")]
    Rejected(String),
}
