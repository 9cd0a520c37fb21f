//! Port for storing and reading logged activities.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::calendar::DateRange;
use crate::domain::{Activity, ActivityId, Project, ProjectId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by activity repository adapters.
    pub enum ActivityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "activity repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "activity repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Activities of a user inside `range`, ordered by date then creation.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<Vec<Activity>, ActivityRepositoryError>;

    /// Distinct dates inside `range` on which the user logged anything.
    async fn activity_dates(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<BTreeSet<NaiveDate>, ActivityRepositoryError>;

    /// Total number of activities ever logged by the user.
    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, ActivityRepositoryError>;

    /// Users with at least one activity on `date`.
    async fn users_with_activities_on(
        &self,
        date: NaiveDate,
    ) -> Result<HashSet<UserId>, ActivityRepositoryError>;

    async fn find_by_id(&self, id: &ActivityId) -> Result<Option<Activity>, ActivityRepositoryError>;

    async fn insert(&self, activity: &Activity) -> Result<(), ActivityRepositoryError>;

    /// Overwrite project, date, minutes and comments. Returns `false` when no
    /// row matched.
    async fn update(&self, activity: &Activity) -> Result<bool, ActivityRepositoryError>;

    /// Returns `false` when no row matched.
    async fn delete(&self, id: &ActivityId) -> Result<bool, ActivityRepositoryError>;

    /// Activities of every user booked on `project_id` inside `range`,
    /// ordered by date then creation.
    async fn list_for_project(
        &self,
        project_id: &ProjectId,
        range: DateRange,
    ) -> Result<Vec<Activity>, ActivityRepositoryError>;

    /// Distinct projects the user logged time on, most recently used first,
    /// at most `limit` of them.
    async fn recent_projects(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Project>, ActivityRepositoryError>;
}
