//! Port for the append-only user version store.

use async_trait::async_trait;

use crate::domain::{NewUserVersion, UserId, UserVersion};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user version repository adapters.
    pub enum UserVersionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user version repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user version repository query failed: {message}",
    }
}

/// Append-only history of user snapshots.
///
/// Adapters assign each appended row a strictly increasing `sequence`, so
/// insertion order is recoverable even when timestamps collide.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserVersionRepository: Send + Sync {
    /// Append a version and return the stored row.
    async fn append(
        &self,
        version: &NewUserVersion,
    ) -> Result<UserVersion, UserVersionRepositoryError>;

    /// All versions of a user ordered by `(modified_at, sequence)`.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserVersion>, UserVersionRepositoryError>;

    /// Number of stored versions for a user.
    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, UserVersionRepositoryError>;

    /// Delete every version of a user, returning how many were removed.
    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, UserVersionRepositoryError>;
}
