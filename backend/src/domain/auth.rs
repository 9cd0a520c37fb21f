//! Authentication primitives: login credentials, password digests and reset
//! tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Lifetime of a password reset token.
pub const PASSWORD_RESET_TOKEN_TTL_HOURS: i64 = 24;

const SALT_LENGTH: usize = 16;
const RESET_TOKEN_LENGTH: usize = 40;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Login was missing or blank once trimmed.
    EmptyLogin,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLogin => write!(f, "login must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `login` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use timesheet::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada", "secret").expect("valid credentials");
/// assert_eq!(creds.login(), "ada");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    login: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw login/password inputs.
    pub fn try_from_parts(login: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = login.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyLogin);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            login: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login string suitable for user lookups.
    pub fn login(&self) -> &str {
        self.login.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Salted SHA-256 password digest, both parts hex/alphanumeric encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub salt: String,
    pub digest: String,
}

impl PasswordDigest {
    /// Hash `password` with a fresh random salt.
    pub fn generate(password: &str) -> Self {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LENGTH)
            .map(char::from)
            .collect();
        Self::with_salt(salt, password)
    }

    /// Hash `password` with a known salt.
    pub fn with_salt(salt: impl Into<String>, password: &str) -> Self {
        let salt = salt.into();
        let digest = hash(&salt, password);
        Self { salt, digest }
    }

    /// Check a candidate password against the stored digest.
    pub fn matches(&self, password: &str) -> bool {
        hash(&self.salt, password) == self.digest
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordDigest")
            .field("salt", &"<redacted>")
            .field("digest", &"<redacted>")
            .finish()
    }
}

fn hash(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// One-time token mailed to users who forgot their password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Issue a random token valid for [`PASSWORD_RESET_TOKEN_TTL_HOURS`].
    pub fn issue(now: DateTime<Utc>) -> Self {
        let token = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self {
            token,
            expires_at: now + Duration::hours(PASSWORD_RESET_TOKEN_TTL_HOURS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
