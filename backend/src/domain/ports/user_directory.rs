//! Driving port listing users for filters and pickers.

use async_trait::async_trait;

use crate::domain::{ClientId, Error, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Users who logged anything, optionally only on `client`'s projects.
    async fn users_with_activities(&self, client: Option<ClientId>) -> Result<Vec<User>, Error>;

    /// Employees holding the project manager role.
    async fn managers(&self) -> Result<Vec<User>, Error>;
}
