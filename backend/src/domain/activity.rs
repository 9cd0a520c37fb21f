//! Logged work and the projects it is booked against.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ActivityId, ClientId, ProjectId, User, UserId};

/// Upper bound for a single activity.
pub const MAX_ACTIVITY_MINUTES: u32 = 24 * 60;

/// Number of most recently used projects offered first when logging time.
pub const RECENT_PROJECTS_LIMIT: usize = 3;

/// Validation errors for activity input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivityValidationError {
    #[error("comments must not be empty")]
    EmptyComments,
    #[error("minutes must be between 1 and {max}")]
    MinutesOutOfRange { max: u32 },
    #[error("hours must look like 7 or 3:03")]
    InvalidHours,
}

/// Client project that activities are booked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub client_id: ClientId,
    pub name: String,
}

impl Project {
    /// Administrators and the users of the owning client see the project's
    /// activities.
    pub fn calendar_viewable_by(&self, user: &User) -> bool {
        user.is_admin() || user.snapshot.client_id == Some(self.client_id)
    }
}

/// A block of minutes a user spent on a project on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub user_id: UserId,
    pub project: Project,
    pub date: NaiveDate,
    pub minutes: u32,
    pub comments: String,
}

impl Activity {
    /// Owners and administrators may change or remove an activity.
    pub fn editable_by(&self, user: &User) -> bool {
        self.user_id == user.id || user.is_admin()
    }

    /// Check the fields a user types in.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        validate_entry(self.minutes, &self.comments)
    }
}

/// Projects offered when logging time: the recently used ones first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChoices {
    pub recent: Vec<Project>,
    pub other: Vec<Project>,
}

impl ProjectChoices {
    /// Split `all` into `recent` and whatever remains, keeping `all`'s order
    /// for the remainder.
    pub fn new(recent: Vec<Project>, all: Vec<Project>) -> Self {
        let other = all
            .into_iter()
            .filter(|project| !recent.iter().any(|used| used.id == project.id))
            .collect();
        Self { recent, other }
    }
}

/// Validate minutes and comments of an activity entry.
pub fn validate_entry(minutes: u32, comments: &str) -> Result<(), ActivityValidationError> {
    if comments.trim().is_empty() {
        return Err(ActivityValidationError::EmptyComments);
    }
    if minutes == 0 || minutes > MAX_ACTIVITY_MINUTES {
        return Err(ActivityValidationError::MinutesOutOfRange {
            max: MAX_ACTIVITY_MINUTES,
        });
    }
    Ok(())
}

/// Parse hours typed as `H` or `H:MM` into minutes.
pub fn parse_hours(raw: &str) -> Result<u32, ActivityValidationError> {
    let raw = raw.trim();
    let (hours, minutes) = match raw.split_once(':') {
        Some((hours, minutes)) => (hours, Some(minutes)),
        None => (raw, None),
    };
    let hours: u32 = hours
        .parse()
        .map_err(|_| ActivityValidationError::InvalidHours)?;
    let minutes: u32 = match minutes {
        Some(minutes) if minutes.len() == 2 => minutes
            .parse()
            .map_err(|_| ActivityValidationError::InvalidHours)?,
        Some(_) => return Err(ActivityValidationError::InvalidHours),
        None => 0,
    };
    if minutes >= 60 {
        return Err(ActivityValidationError::InvalidHours);
    }
    hours
        .checked_mul(60)
        .and_then(|total| total.checked_add(minutes))
        .ok_or(ActivityValidationError::InvalidHours)
}
