//! Application settings loaded via OrthoConfig.
//!
//! Every value may come from the environment (`TIMESHEET_*`) or a
//! configuration file. Both binaries load settings from the environment only
//! and keep the command line for their own arguments.

use std::ffi::OsString;
use std::net::SocketAddr;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::ports::Mailer;
use crate::domain::{Email, MailSettings};
use crate::outbound::mail::{SmtpConfig, SmtpConfigError, SmtpMailer, SmtpSecurity, TracingMailer};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SITE_URL: &str = "http://localhost:8080";
const DEFAULT_MAIL_FROM: &str = "timesheet@localhost";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Errors raised while turning raw settings into typed configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(String),
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
    #[error(transparent)]
    Smtp(#[from] SmtpConfigError),
}

fn invalid(field: &'static str, message: impl ToString) -> SettingsError {
    SettingsError::Invalid {
        field,
        message: message.to_string(),
    }
}

/// Raw application settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TIMESHEET")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Public base URL used in links inside mails.
    pub site_url: Option<String>,
    /// Sender address of every outgoing mail.
    pub mail_from: Option<String>,
    /// Recipient of the daily idle-employee report.
    pub reporter_email: Option<String>,
    /// SMTP relay host; mails are only logged when unset.
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    /// `none`, `starttls` or `tls`.
    pub smtp_security: Option<String>,
}

impl AppSettings {
    /// Load from configuration files and the environment, ignoring the
    /// process command line.
    pub fn from_env(program: &str) -> Result<Self, SettingsError> {
        Self::load_from_iter([OsString::from(program)])
            .map_err(|err| SettingsError::Load(err.to_string()))
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::Missing("TIMESHEET_DATABASE_URL"))
    }

    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let config = PoolConfig::new(self.database_url()?);
        Ok(match self.db_pool_size {
            Some(size) => config.with_max_size(size),
            None => config,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err| invalid("TIMESHEET_BIND_ADDR", err))
    }

    pub fn mail_settings(&self) -> Result<MailSettings, SettingsError> {
        let from = Email::new(self.mail_from.as_deref().unwrap_or(DEFAULT_MAIL_FROM))
            .map_err(|err| invalid("TIMESHEET_MAIL_FROM", err))?;
        let site_url = self.site_url.as_deref().unwrap_or(DEFAULT_SITE_URL);
        Ok(MailSettings::new(from, site_url))
    }

    /// Report recipient; falls back to the sender address.
    pub fn reporter_email(&self) -> Result<Email, SettingsError> {
        match self.reporter_email.as_deref() {
            Some(address) => {
                Email::new(address).map_err(|err| invalid("TIMESHEET_REPORTER_EMAIL", err))
            }
            None => Ok(self.mail_settings()?.from),
        }
    }

    /// SMTP relay settings, or `None` when no host is configured.
    pub fn smtp_config(&self) -> Result<Option<SmtpConfig>, SettingsError> {
        let Some(host) = self.smtp_host.as_deref().filter(|h| !h.trim().is_empty()) else {
            return Ok(None);
        };
        let security = match self.smtp_security.as_deref() {
            Some(raw) => raw.parse::<SmtpSecurity>()?,
            None => SmtpSecurity::default(),
        };
        let mut config = SmtpConfig::new(host, self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT))
            .with_security(security);
        match (&self.smtp_user, &self.smtp_password) {
            (Some(user), Some(password)) => {
                config = config.with_credentials(user.clone(), password.clone());
            }
            (None, None) => {}
            _ => return Err(invalid("TIMESHEET_SMTP_USER", "user and password go together")),
        }
        Ok(Some(config))
    }

    /// Mail adapter matching the configuration.
    pub fn mailer(&self) -> Result<Arc<dyn Mailer>, SettingsError> {
        match self.smtp_config()? {
            Some(config) => Ok(Arc::new(SmtpMailer::new(&config)?)),
            None => {
                warn!("TIMESHEET_SMTP_HOST is not set; mails will only be logged");
                Ok(Arc::new(TracingMailer))
            }
        }
    }
}
