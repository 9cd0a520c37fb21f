//! Mail delivery adapters implementing [`crate::domain::ports::Mailer`].
//!
//! - [`SmtpMailer`] relays messages through an SMTP server using lettre.
//! - [`TracingMailer`] only logs messages; used when no relay is configured.

mod smtp;
mod tracing_mailer;

pub use smtp::{SmtpConfig, SmtpConfigError, SmtpMailer, SmtpSecurity};
pub use tracing_mailer::TracingMailer;
