//! Driving port for logging, changing and browsing activities.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::calendar::DateRange;
use crate::domain::{
    Activity, ActivityId, DayActivities, Error, ProjectChoices, ProjectId, User, UserId,
};

/// Input for logging a new activity.
///
/// `user_id` is honoured for administrators only; everyone else logs for
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogActivityRequest {
    pub user_id: Option<UserId>,
    pub project_id: ProjectId,
    pub date: NaiveDate,
    pub minutes: u32,
    pub comments: String,
}

/// Partial update of an activity. Absent fields stay as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeActivityRequest {
    pub project_id: Option<ProjectId>,
    pub date: Option<NaiveDate>,
    pub minutes: Option<u32>,
    pub comments: Option<String>,
}

/// Whose activities a day view lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayScope {
    User(UserId),
    Project(ProjectId),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// `invalid_request` for unknown projects and malformed entries,
    /// `forbidden` for client users.
    async fn log_activity(&self, actor: &User, request: LogActivityRequest)
    -> Result<Activity, Error>;

    /// `not_found` unless the activity exists and `actor` may edit it.
    async fn find_activity(&self, actor: &User, id: &ActivityId) -> Result<Activity, Error>;

    async fn change_activity(
        &self,
        actor: &User,
        id: &ActivityId,
        request: ChangeActivityRequest,
    ) -> Result<Activity, Error>;

    async fn remove_activity(&self, actor: &User, id: &ActivityId) -> Result<(), Error>;

    /// Activities on `date` for a user or a project, ordered by creation.
    async fn day(&self, actor: &User, scope: DayScope, date: NaiveDate)
    -> Result<Vec<Activity>, Error>;

    /// Every day of `range` with the project's activities.
    async fn project_calendar(
        &self,
        actor: &User,
        project_id: &ProjectId,
        range: DateRange,
    ) -> Result<Vec<DayActivities>, Error>;

    /// Projects to pick from when `user_id` logs time.
    async fn project_choices(&self, user_id: &UserId) -> Result<ProjectChoices, Error>;
}
