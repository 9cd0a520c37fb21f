//! Mailer that writes messages to the log instead of sending them.

use async_trait::async_trait;
use tracing::info;

use crate::domain::MailMessage;
use crate::domain::ports::{Mailer, MailerError};

/// Logs every message at `info` level and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn deliver(&self, message: &MailMessage) -> Result<(), MailerError> {
        info!(
            to = %message.to,
            from = %message.from,
            subject = %message.subject,
            body = %message.body,
            "mail delivery skipped; no SMTP relay configured"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Email;

    #[tokio::test]
    async fn always_succeeds() {
        let message = MailMessage {
            to: Email::new("ada@example.com").expect("valid email"),
            from: Email::new("timesheet@example.com").expect("valid email"),
            subject: "Welcome to Timesheet!".to_owned(),
            body: "Hello".to_owned(),
        };
        assert!(TracingMailer.deliver(&message).await.is_ok());
    }
}
