//! Driving port resolving users together with their effective permissions.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, User, UserId, UserKind};

/// A user as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub kind: UserKind,
    pub can_manage_financial_data: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfiles: Send + Sync {
    /// `not_found` when the user does not exist.
    async fn profile(&self, id: &UserId) -> Result<UserProfile, Error>;
}
