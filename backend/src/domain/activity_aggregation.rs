//! Days-without-activity aggregation and per-day activity grouping.
//!
//! The pure functions here take already loaded sets so they can be tested
//! without a store; [`ActivityCalendarService`] wires them to the ports.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::domain::calendar::DateRange;
use crate::domain::ports::{ActivityCalendar, ActivityRepository, FreeDayRepository};
use crate::domain::port_error_mapping::{map_activity_error, map_free_day_error};
use crate::domain::{Activity, Error, FreeDay, Project, UserId};

/// Dates in `range` that are neither activity days nor free days, ascending.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use chrono::NaiveDate;
/// use timesheet::domain::calendar::DateRange;
/// use timesheet::domain::days_without_activity;
///
/// let day = |d| NaiveDate::from_ymd_opt(2009, 4, d).expect("valid date");
/// let range = DateRange::new(day(1), day(3));
/// let busy = BTreeSet::from([day(2)]);
/// let days = days_without_activity(range, &busy, &BTreeSet::new());
/// assert_eq!(days, vec![day(1), day(3)]);
/// ```
pub fn days_without_activity(
    range: DateRange,
    activity_days: &BTreeSet<NaiveDate>,
    free_days: &BTreeSet<NaiveDate>,
) -> Vec<NaiveDate> {
    range
        .days()
        .filter(|day| !activity_days.contains(day) && !free_days.contains(day))
        .collect()
}

/// Activities booked against one project on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectActivities {
    pub project: Project,
    pub activities: Vec<Activity>,
}

impl ProjectActivities {
    /// Saturates at `u32::MAX`.
    pub fn total_minutes(&self) -> u32 {
        self.activities
            .iter()
            .fold(0, |total: u32, activity| total.saturating_add(activity.minutes))
    }
}

/// One calendar day with its activities grouped by project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayActivities {
    pub date: NaiveDate,
    pub projects: Vec<ProjectActivities>,
}

impl DayActivities {
    /// Saturates at `u32::MAX`.
    pub fn total_minutes(&self) -> u32 {
        self.projects
            .iter()
            .fold(0, |total: u32, group| total.saturating_add(group.total_minutes()))
    }
}

/// Group activities by day, then by project.
///
/// Every day of `range` appears, empty ones included. Projects keep the order
/// in which they first show up on that day; activities keep input order.
/// Activities outside `range` are ignored.
pub fn group_by_dates_and_projects(
    range: DateRange,
    activities: impl IntoIterator<Item = Activity>,
) -> Vec<DayActivities> {
    let mut days: Vec<DayActivities> = range
        .days()
        .map(|date| DayActivities {
            date,
            projects: Vec::new(),
        })
        .collect();

    for activity in activities {
        let Some(offset) = usize::try_from((activity.date - range.start).num_days()).ok() else {
            continue;
        };
        let Some(day) = days.get_mut(offset) else {
            continue;
        };
        match day
            .projects
            .iter_mut()
            .find(|group| group.project.id == activity.project.id)
        {
            Some(group) => group.activities.push(activity),
            None => day.projects.push(ProjectActivities {
                project: activity.project.clone(),
                activities: vec![activity],
            }),
        }
    }

    days
}

/// Calendar queries over activities and free days.
#[derive(Clone)]
pub struct ActivityCalendarService {
    activities: Arc<dyn ActivityRepository>,
    free_days: Arc<dyn FreeDayRepository>,
}

impl ActivityCalendarService {
    pub fn new(
        activities: Arc<dyn ActivityRepository>,
        free_days: Arc<dyn FreeDayRepository>,
    ) -> Self {
        Self {
            activities,
            free_days,
        }
    }
}

#[async_trait]
impl ActivityCalendar for ActivityCalendarService {
    async fn days_without_activity(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<Vec<NaiveDate>, Error> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let activity_days = self
            .activities
            .activity_dates(user_id, range)
            .await
            .map_err(map_activity_error)?;
        let free_days = self
            .free_days
            .dates_for_user(user_id, range)
            .await
            .map_err(map_free_day_error)?;
        Ok(days_without_activity(range, &activity_days, &free_days))
    }

    async fn has_activities_on(&self, user_id: &UserId, date: NaiveDate) -> Result<bool, Error> {
        let dates = self
            .activities
            .activity_dates(user_id, DateRange::new(date, date))
            .await
            .map_err(map_activity_error)?;
        Ok(dates.contains(&date))
    }

    async fn activities_by_dates_and_projects(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<Vec<DayActivities>, Error> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let activities = self
            .activities
            .list_for_user(user_id, range)
            .await
            .map_err(map_activity_error)?;
        Ok(group_by_dates_and_projects(range, activities))
    }

    async fn declare_free_day(&self, user_id: &UserId, date: NaiveDate) -> Result<FreeDay, Error> {
        let free_day = FreeDay {
            user_id: user_id.clone(),
            date,
        };
        self.free_days
            .add(&free_day)
            .await
            .map_err(map_free_day_error)?;
        info!(user_id = %user_id, %date, "free day declared");
        Ok(free_day)
    }
}
