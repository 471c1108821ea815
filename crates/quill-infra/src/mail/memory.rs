//! In-memory mail transport - keeps an outbox for inspection.

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::ports::{MailError, MailMessage, Mailer};

/// Collects sent messages; nothing leaves the process.
#[derive(Default)]
pub struct InMemoryMailer {
    outbox: Mutex<Vec<MailMessage>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    pub async fn outbox(&self) -> Vec<MailMessage> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, message: &MailMessage) -> Result<usize, MailError> {
        self.outbox.lock().await.push(message.clone());
        Ok(1)
    }
}
