//! Append-only user history.
//!
//! A user receives its first version stamped with its creation time, then one
//! more version each time its role changes. Other field changes do not create
//! versions. Lookups that find no history back-fill the first version, so an
//! existing user never reports "no version".

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::port_error_mapping::{map_user_error, map_version_error};
use crate::domain::ports::{UserHistory, UserRepository, UserVersionRepository};
use crate::domain::{
    Error, NewUserVersion, RoleId, User, UserId, UserVersion, select_version_at,
};

/// Whether a save should append a version.
///
/// True when the user has no history yet or its role reference changed.
pub fn should_record_version(
    existing_versions: u64,
    previous_role: Option<RoleId>,
    current_role: Option<RoleId>,
) -> bool {
    existing_versions == 0 || previous_role != current_role
}

/// Last instant of `date` in UTC.
pub fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .map(|naive| naive.and_utc())
}

/// Writes and resolves user versions.
#[derive(Clone)]
pub struct UserVersioningService {
    users: Arc<dyn UserRepository>,
    versions: Arc<dyn UserVersionRepository>,
    clock: Arc<dyn Clock>,
}

impl UserVersioningService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        versions: Arc<dyn UserVersionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            versions,
            clock,
        }
    }

    /// Append a version stamped with the user's creation time.
    pub async fn save_first_version(&self, user: &User) -> Result<UserVersion, Error> {
        let version = self
            .versions
            .append(&NewUserVersion::of(user, user.created_at))
            .await
            .map_err(map_version_error)?;
        info!(user_id = %user.id, sequence = version.sequence, "first user version saved");
        Ok(version)
    }

    /// Append a version stamped with the current time.
    ///
    /// The stamp never goes below the latest stored version, keeping
    /// timestamps non-decreasing even if the clock steps backwards.
    pub async fn save_new_version(&self, user: &User) -> Result<UserVersion, Error> {
        let history = self
            .versions
            .list_for_user(&user.id)
            .await
            .map_err(map_version_error)?;
        let now = self.clock.utc();
        let stamp = history
            .last()
            .map_or(now, |latest| latest.modified_at.max(now));

        let version = self
            .versions
            .append(&NewUserVersion::of(user, stamp))
            .await
            .map_err(map_version_error)?;
        info!(user_id = %user.id, sequence = version.sequence, "user version appended");
        Ok(version)
    }

    /// First version when the history is empty, a new one otherwise.
    pub async fn record_version(&self, user: &User) -> Result<UserVersion, Error> {
        if self.count_versions(&user.id).await? == 0 {
            self.save_first_version(user).await
        } else {
            self.save_new_version(user).await
        }
    }

    /// Back-fill the first version when the user has none.
    pub async fn ensure_first_version(&self, user: &User) -> Result<(), Error> {
        if self.count_versions(&user.id).await? == 0 {
            debug!(user_id = %user.id, "back-filling missing user history");
            self.save_first_version(user).await?;
        }
        Ok(())
    }

    /// Apply the version trigger after `user` was persisted.
    ///
    /// `previous_role` is the role stored before the save; pass the current
    /// role for freshly created users.
    pub async fn record_after_save(
        &self,
        user: &User,
        previous_role: Option<RoleId>,
    ) -> Result<Option<UserVersion>, Error> {
        let existing = self.count_versions(&user.id).await?;
        if !should_record_version(existing, previous_role, user.snapshot.role_id) {
            return Ok(None);
        }
        let version = if existing == 0 {
            self.save_first_version(user).await?
        } else {
            self.save_new_version(user).await?
        };
        Ok(Some(version))
    }

    /// Remove the whole history of a user.
    pub async fn delete_history(&self, user_id: &UserId) -> Result<u64, Error> {
        let removed = self
            .versions
            .delete_for_user(user_id)
            .await
            .map_err(map_version_error)?;
        debug!(user_id = %user_id, removed, "user history deleted");
        Ok(removed)
    }

    pub async fn count_versions(&self, user_id: &UserId) -> Result<u64, Error> {
        self.versions
            .count_for_user(user_id)
            .await
            .map_err(map_version_error)
    }

    /// History of `user`, back-filled when empty.
    pub async fn history_of(&self, user: &User) -> Result<Vec<UserVersion>, Error> {
        let history = self
            .versions
            .list_for_user(&user.id)
            .await
            .map_err(map_version_error)?;
        if history.is_empty() {
            return Ok(vec![self.save_first_version(user).await?]);
        }
        Ok(history)
    }

    /// Version of `user` that was current at `at`.
    pub async fn version_of(&self, user: &User, at: DateTime<Utc>) -> Result<UserVersion, Error> {
        let history = self.history_of(user).await?;
        select_version_at(&history, at)
            .cloned()
            .ok_or_else(|| Error::internal("user history is empty after back-fill"))
    }

    async fn load_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait]
impl UserHistory for UserVersioningService {
    async fn versions(&self, user_id: &UserId) -> Result<Vec<UserVersion>, Error> {
        let user = self.load_user(user_id).await?;
        self.history_of(&user).await
    }

    async fn version_at(&self, user_id: &UserId, at: DateTime<Utc>) -> Result<UserVersion, Error> {
        let user = self.load_user(user_id).await?;
        self.version_of(&user, at).await
    }

    async fn version_on(&self, user_id: &UserId, date: NaiveDate) -> Result<UserVersion, Error> {
        let at = end_of_day(date)
            .ok_or_else(|| Error::invalid_request(format!("date {date} is out of range")))?;
        self.version_at(user_id, at).await
    }
}
