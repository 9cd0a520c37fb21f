//! Port for role lookups.

use async_trait::async_trait;

use crate::domain::{Role, RoleId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by role repository adapters.
    pub enum RoleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "role repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "role repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Fetch a role by identifier.
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, RoleRepositoryError>;
}
