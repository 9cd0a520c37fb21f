//! Mailer that keeps every delivered message.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::domain::MailMessage;
use crate::domain::ports::{Mailer, MailerError};

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following delivery fail with a transport error.
    pub fn fail_deliveries(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(_) => panic!("mailer mutex"),
        }
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn deliver(&self, message: &MailMessage) -> Result<(), MailerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailerError::transport("relay refused the connection"));
        }
        match self.sent.lock() {
            Ok(mut sent) => sent.push(message.clone()),
            Err(_) => panic!("mailer mutex"),
        }
        Ok(())
    }
}
