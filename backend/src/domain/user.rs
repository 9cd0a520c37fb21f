//! User data model.
//!
//! A user is either an employee (has a role), an administrator (admin flag,
//! usually also an employee) or a client user (belongs to a client and has no
//! role). The versioned part of a user is captured by [`UserSnapshot`].

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ClientId, Role, RoleId};

/// Validation errors returned by user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("login must be {min}-{max} characters of letters, digits, '_' or '-'")]
    InvalidLogin { min: usize, max: usize },
    #[error("email must look like user@domain")]
    InvalidEmail,
    #[error("employees must have a role")]
    MissingRole,
    #[error("client users cannot have a role or admin rights")]
    ClientUserWithRole,
}

/// Stable user identifier stored as a UUID.
///
/// User versions share the identifier of the user they snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

impl std::str::FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

/// Maximum allowed length for a user name.
pub const USER_NAME_MAX: usize = 64;
/// Minimum allowed length for a login.
pub const LOGIN_MIN: usize = 3;
/// Maximum allowed length for a login.
pub const LOGIN_MAX: usize = 20;

static LOGIN_RE: OnceLock<Regex> = OnceLock::new();

fn login_regex() -> &'static Regex {
    LOGIN_RE.get_or_init(|| {
        Regex::new("^[A-Za-z0-9_-]{3,20}$")
            .unwrap_or_else(|error| panic!("login regex failed to compile: {error}"))
    })
}

/// Full name shown in listings and mails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Globally unique login used for authentication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Login(String);

impl Login {
    /// Validate and construct a [`Login`].
    ///
    /// # Examples
    /// ```
    /// use timesheet::domain::Login;
    ///
    /// assert!(Login::new("maciej-lotkowski").is_ok());
    /// assert!(Login::new("foo bar").is_err());
    /// ```
    pub fn new(login: impl Into<String>) -> Result<Self, UserValidationError> {
        let login = login.into();
        if !login_regex().is_match(&login) {
            return Err(UserValidationError::InvalidLogin {
                min: LOGIN_MIN,
                max: LOGIN_MAX,
            });
        }
        Ok(Self(login))
    }
}

/// Mail address used for notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        let valid = trimmed
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            });
        if !valid || trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

macro_rules! impl_string_newtype {
    ($name:ident) => {
        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = UserValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

impl_string_newtype!(UserName);
impl_string_newtype!(Login);
impl_string_newtype!(Email);

/// Coarse user category derived from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserKind {
    Admin,
    Employee,
    ClientUser,
}

/// Fields copied into every user version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub name: UserName,
    pub login: Login,
    pub email: Email,
    pub role_id: Option<RoleId>,
    pub client_id: Option<ClientId>,
    pub admin: bool,
    pub active: bool,
}

impl UserSnapshot {
    /// Check the role/client affiliation rules shared by users and versions.
    pub fn validate_affiliation(&self) -> Result<(), UserValidationError> {
        match (self.client_id, self.role_id) {
            (Some(_), Some(_)) => Err(UserValidationError::ClientUserWithRole),
            (Some(_), None) if self.admin => Err(UserValidationError::ClientUserWithRole),
            (None, None) => Err(UserValidationError::MissingRole),
            _ => Ok(()),
        }
    }
}

/// Application user.
///
/// ## Invariants
/// - `snapshot` satisfies [`UserSnapshot::validate_affiliation`].
/// - `modified_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(flatten)]
    pub snapshot: UserSnapshot,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl User {
    /// Category of the user.
    pub fn kind(&self) -> UserKind {
        if self.snapshot.admin {
            UserKind::Admin
        } else if self.snapshot.client_id.is_some() {
            UserKind::ClientUser
        } else {
            UserKind::Employee
        }
    }

    /// Whether the user carries administrator rights.
    pub fn is_admin(&self) -> bool {
        self.snapshot.admin
    }

    /// Employees (administrators included) log activities; client users do not.
    pub fn is_employee(&self) -> bool {
        self.snapshot.client_id.is_none()
    }

    /// Whether the user belongs to a client.
    pub fn is_client_user(&self) -> bool {
        self.snapshot.client_id.is_some()
    }

    /// Users can be edited by themselves and by administrators.
    pub fn editable_by(&self, other: &User) -> bool {
        self.id == other.id || other.is_admin()
    }

    /// Calendars follow the same visibility rule as editing.
    pub fn calendar_viewable(&self, other: &User) -> bool {
        self.editable_by(other)
    }

    /// Administrators, and employees whose role grants it, see financial data.
    pub fn can_manage_financial_data(&self, role: Option<&Role>) -> bool {
        self.is_admin() || role.is_some_and(|role| role.can_manage_financial_data)
    }
}
