//! Driving port for user version queries.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Error, UserId, UserVersion};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserHistory: Send + Sync {
    /// Full history of a user, oldest first.
    async fn versions(&self, user_id: &UserId) -> Result<Vec<UserVersion>, Error>;

    /// Version that was current at `at`.
    async fn version_at(&self, user_id: &UserId, at: DateTime<Utc>) -> Result<UserVersion, Error>;

    /// Version that was current at the end of `date`.
    async fn version_on(&self, user_id: &UserId, date: NaiveDate) -> Result<UserVersion, Error>;
}
