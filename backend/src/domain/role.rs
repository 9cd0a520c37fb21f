//! Employee roles.

use serde::{Deserialize, Serialize};

use crate::domain::RoleId;

/// Name of the role whose holders are listed as managers.
pub const MANAGER_ROLE_NAME: &str = "Project Manager";

/// Role assigned to employees.
///
/// Changing a user's role is the event that opens a new user version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub can_manage_financial_data: bool,
}

impl Role {
    /// Build a role without financial privileges.
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            can_manage_financial_data: false,
        }
    }
}
