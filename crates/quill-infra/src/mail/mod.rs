//! Mail transports - console, in-memory outbox and HTTP relay.

mod console;
mod memory;

#[cfg(feature = "webhook-mail")]
mod webhook;

pub use console::ConsoleMailer;
pub use memory::InMemoryMailer;

#[cfg(feature = "webhook-mail")]
pub use webhook::{WebhookMailer, WebhookMailerConfig};

/// Hide most of the local part of an address before it reaches the logs.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            if first.is_empty() || local.chars().count() == 1 {
                format!("***@{domain}")
            } else {
                format!("{first}***@{domain}")
            }
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("grace@example.com"), "g***@example.com");
        assert_eq!(mask_email("g@example.com"), "***@example.com");
        assert_eq!(mask_email("nonsense"), "***");
    }
}
