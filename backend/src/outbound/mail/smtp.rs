//! SMTP relay adapter.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::MailMessage;
use crate::domain::ports::{Mailer, MailerError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Transport security negotiated with the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// Plain text; only suitable for a local relay.
    None,
    /// Upgrade a plain connection with `STARTTLS`.
    #[default]
    StartTls,
    /// Implicit TLS from the first byte.
    Tls,
}

impl FromStr for SmtpSecurity {
    type Err = SmtpConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "plain" => Ok(Self::None),
            "starttls" => Ok(Self::StartTls),
            "tls" | "ssl" => Ok(Self::Tls),
            other => Err(SmtpConfigError::UnknownSecurity(other.to_owned())),
        }
    }
}

/// Errors raised while building the SMTP transport.
#[derive(Debug, Error)]
pub enum SmtpConfigError {
    #[error("unknown SMTP security mode `{0}` (expected none, starttls or tls)")]
    UnknownSecurity(String),
    #[error("SMTP host must not be empty")]
    MissingHost,
    #[error("failed to configure SMTP relay: {0}")]
    Relay(#[from] lettre::transport::smtp::Error),
}

/// Connection settings for [`SmtpMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    host: String,
    port: u16,
    security: SmtpSecurity,
    credentials: Option<(String, String)>,
    timeout: Duration,
}

impl SmtpConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            security: SmtpSecurity::default(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_security(mut self, security: SmtpSecurity) -> Self {
        self.security = security;
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn security(&self) -> SmtpSecurity {
        self.security
    }
}

/// Delivers mail through an SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport; no connection is opened until the first send.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpConfigError> {
        let host = config.host.trim();
        if host.is_empty() {
            return Err(SmtpConfigError::MissingHost);
        }
        let builder = match config.security {
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)?,
        };
        let mut builder = builder.port(config.port).timeout(Some(config.timeout));
        if let Some((user, password)) = &config.credentials {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }
        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailerError> {
    address
        .parse()
        .map_err(|err| MailerError::invalid_message(format!("invalid address {address}: {err}")))
}

/// Convert a rendered message into a plain-text lettre envelope.
pub(crate) fn to_lettre_message(message: &MailMessage) -> Result<Message, MailerError> {
    Message::builder()
        .from(mailbox(message.from.as_ref())?)
        .to(mailbox(message.to.as_ref())?)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|err| MailerError::invalid_message(err.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, message: &MailMessage) -> Result<(), MailerError> {
        let envelope = to_lettre_message(message)?;
        match self.transport.send(envelope).await {
            Ok(response) => {
                debug!(to = %message.to, code = %response.code(), "mail relayed");
                Ok(())
            }
            Err(err) => {
                warn!(to = %message.to, error = %err, "mail relay failed");
                Err(MailerError::transport(err.to_string()))
            }
        }
    }
}
