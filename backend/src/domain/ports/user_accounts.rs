//! Driving port for user account management.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{ClientId, Email, Error, Login, RoleId, User, UserId, UserName};

/// Fields required to open an account.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: UserName,
    pub login: Login,
    pub email: Email,
    pub role_id: Option<RoleId>,
    pub client_id: Option<ClientId>,
    pub admin: bool,
    pub active: bool,
    pub password: Zeroizing<String>,
}

/// Partial update of an account. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub name: Option<UserName>,
    pub login: Option<Login>,
    pub email: Option<Email>,
    pub role_id: Option<RoleId>,
    pub admin: Option<bool>,
    pub active: Option<bool>,
}

impl UpdateUserRequest {
    /// Whether the update touches fields only administrators may change.
    pub fn touches_privileged_fields(&self) -> bool {
        self.role_id.is_some() || self.admin.is_some() || self.active.is_some()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Load a user or fail with `not_found`.
    async fn find_user(&self, id: &UserId) -> Result<User, Error>;

    /// Create a user, record its first version and send the welcome mail.
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error>;

    /// Apply changes, appending a version when the role changes.
    async fn update_user(&self, id: &UserId, request: UpdateUserRequest) -> Result<User, Error>;

    /// Remove a user and its history. Refused while activities exist.
    async fn destroy_user(&self, id: &UserId) -> Result<(), Error>;

    /// Issue a reset token for the user owning `login_or_email` and mail it.
    async fn request_password_reset(&self, login_or_email: &str) -> Result<(), Error>;
}
