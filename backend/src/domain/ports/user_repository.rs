//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{ClientId, PasswordDigest, PasswordResetToken, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already owns the login.
        DuplicateLogin { login: String } => "login already taken: {login}",
    }
}

/// Storage for user records and their credentials.
///
/// Password digests and reset tokens never travel on [`User`]; they are read
/// and written through dedicated calls so the record can be logged freely.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user together with its password digest.
    async fn insert(&self, user: &User, password: &PasswordDigest)
    -> Result<(), UserPersistenceError>;

    /// Overwrite the mutable fields of an existing user.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact login.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user whose login or email equals `value`.
    async fn find_by_login_or_email(
        &self,
        value: &str,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Stored password digest of the user, if any.
    async fn find_password_digest(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordDigest>, UserPersistenceError>;

    /// Persist a password reset token, replacing any earlier one.
    async fn store_password_reset_token(
        &self,
        id: &UserId,
        token: &PasswordResetToken,
    ) -> Result<(), UserPersistenceError>;

    /// Active users without a client, ordered by name.
    async fn list_active_employees(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Users with at least one activity, ordered by name. With `client`, only
    /// activities booked on that client's projects count.
    async fn list_with_activities(
        &self,
        client: Option<ClientId>,
    ) -> Result<Vec<User>, UserPersistenceError>;

    /// Users whose role carries exactly `role_name`, ordered by name.
    async fn list_by_role_name(&self, role_name: &str) -> Result<Vec<User>, UserPersistenceError>;

    /// Remove the user. Returns `false` when no row matched.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
