//! Console mail transport - development default.

use async_trait::async_trait;

use quill_core::ports::{MailError, MailMessage, Mailer};

use super::mask_email;

/// Writes every message to the log instead of delivering it.
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: &MailMessage) -> Result<usize, MailError> {
        let recipients: Vec<String> = message.to.iter().map(|to| mask_email(to)).collect();
        tracing::info!(
            from = %message.from,
            to = ?recipients,
            subject = %message.subject,
            body = %message.body,
            "Mail (console transport)"
        );
        Ok(1)
    }
}
