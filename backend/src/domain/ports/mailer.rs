//! Driven port for outbound mail delivery.

use async_trait::async_trait;

use crate::domain::MailMessage;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transport adapters.
    pub enum MailerError {
        /// The message could not be turned into a deliverable envelope.
        InvalidMessage { message: String } => "mail message rejected: {message}",
        /// The relay refused the message or could not be reached.
        Transport { message: String } => "mail transport failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one rendered message.
    async fn deliver(&self, message: &MailMessage) -> Result<(), MailerError>;
}
