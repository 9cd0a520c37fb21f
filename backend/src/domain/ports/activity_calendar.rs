//! Driving port for per-user activity calendars.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::calendar::DateRange;
use crate::domain::{DayActivities, Error, FreeDay, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityCalendar: Send + Sync {
    /// Dates in `range` with neither activities nor a free day.
    async fn days_without_activity(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<Vec<NaiveDate>, Error>;

    /// Whether anything was logged on `date`.
    async fn has_activities_on(&self, user_id: &UserId, date: NaiveDate) -> Result<bool, Error>;

    /// Every day of `range` with its activities grouped by project.
    async fn activities_by_dates_and_projects(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<Vec<DayActivities>, Error>;

    /// Mark `date` as a free day. Declaring the same day twice is harmless.
    async fn declare_free_day(&self, user_id: &UserId, date: NaiveDate) -> Result<FreeDay, Error>;
}
