//! Logging, changing and browsing activities.
//!
//! Owners and administrators manage an activity; anyone else is told it does
//! not exist. Project views are open to administrators and the users of the
//! owning client, while employees see only their own entries on a project.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use tracing::info;

use crate::domain::activity::{ActivityValidationError, RECENT_PROJECTS_LIMIT, validate_entry};
use crate::domain::calendar::DateRange;
use crate::domain::port_error_mapping::{map_activity_error, map_project_error, map_user_error};
use crate::domain::ports::{
    ActivityLog, ActivityRepository, ChangeActivityRequest, DayScope, LogActivityRequest,
    ProjectRepository, UserRepository,
};
use crate::domain::{
    Activity, ActivityId, DayActivities, Error, Project, ProjectChoices, ProjectId, User, UserId,
    group_by_dates_and_projects,
};

fn invalid_activity(error: ActivityValidationError) -> Error {
    let field = match error {
        ActivityValidationError::EmptyComments => "comments",
        ActivityValidationError::MinutesOutOfRange { .. }
        | ActivityValidationError::InvalidHours => "minutes",
    };
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": field, "code": "invalid_activity" }))
}

fn unknown_project(id: &ProjectId) -> Error {
    Error::invalid_request(format!("project {id} does not exist"))
        .with_details(json!({ "field": "projectId", "code": "unknown_project" }))
}

fn missing_activity(id: &ActivityId) -> Error {
    Error::not_found(format!("activity {id} not found"))
}

/// Implements [`ActivityLog`] on top of the activity, project and user ports.
#[derive(Clone)]
pub struct ActivityLogService {
    activities: Arc<dyn ActivityRepository>,
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
}

impl ActivityLogService {
    pub fn new(
        activities: Arc<dyn ActivityRepository>,
        projects: Arc<dyn ProjectRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            activities,
            projects,
            users,
        }
    }

    async fn project(&self, id: &ProjectId) -> Result<Option<Project>, Error> {
        self.projects.find_by_id(id).await.map_err(map_project_error)
    }

    /// The activity, provided `actor` may edit it.
    async fn editable(&self, actor: &User, id: &ActivityId) -> Result<Activity, Error> {
        self.activities
            .find_by_id(id)
            .await
            .map_err(map_activity_error)?
            .filter(|activity| activity.editable_by(actor))
            .ok_or_else(|| missing_activity(id))
    }

    /// Administrators may log for any employee; others always log for
    /// themselves.
    async fn author(&self, actor: &User, requested: Option<UserId>) -> Result<UserId, Error> {
        let target = match requested {
            Some(user_id) if actor.is_admin() && user_id != actor.id => user_id,
            _ => return Ok(actor.id.clone()),
        };
        let user = self
            .users
            .find_by_id(&target)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                Error::invalid_request(format!("user {target} does not exist"))
                    .with_details(json!({ "field": "userId", "code": "unknown_user" }))
            })?;
        if user.is_client_user() {
            return Err(Error::invalid_request("client users cannot log activities")
                .with_details(json!({ "field": "userId", "code": "client_user" })));
        }
        Ok(user.id)
    }
}

fn apply_changes(activity: &mut Activity, request: ChangeActivityRequest) {
    let ChangeActivityRequest {
        date,
        minutes,
        comments,
        ..
    } = request;
    if let Some(date) = date {
        activity.date = date;
    }
    if let Some(minutes) = minutes {
        activity.minutes = minutes;
    }
    if let Some(comments) = comments {
        activity.comments = comments;
    }
}

#[async_trait]
impl ActivityLog for ActivityLogService {
    async fn log_activity(
        &self,
        actor: &User,
        request: LogActivityRequest,
    ) -> Result<Activity, Error> {
        if actor.is_client_user() {
            return Err(Error::forbidden("client users cannot log activities"));
        }
        let user_id = self.author(actor, request.user_id).await?;
        validate_entry(request.minutes, &request.comments)
            .map_err(invalid_activity)?;
        let project = self
            .project(&request.project_id)
            .await?
            .ok_or_else(|| unknown_project(&request.project_id))?;

        let activity = Activity {
            id: ActivityId::random(),
            user_id,
            project,
            date: request.date,
            minutes: request.minutes,
            comments: request.comments,
        };
        self.activities
            .insert(&activity)
            .await
            .map_err(map_activity_error)?;
        info!(
            activity_id = %activity.id,
            user_id = %activity.user_id,
            date = %activity.date,
            "activity logged"
        );
        Ok(activity)
    }

    async fn find_activity(&self, actor: &User, id: &ActivityId) -> Result<Activity, Error> {
        self.editable(actor, id).await
    }

    async fn change_activity(
        &self,
        actor: &User,
        id: &ActivityId,
        request: ChangeActivityRequest,
    ) -> Result<Activity, Error> {
        let mut activity = self.editable(actor, id).await?;
        if let Some(project_id) = request.project_id
            && project_id != activity.project.id
        {
            activity.project = self
                .project(&project_id)
                .await?
                .ok_or_else(|| unknown_project(&project_id))?;
        }
        apply_changes(&mut activity, request);
        activity.validate().map_err(invalid_activity)?;

        if !self
            .activities
            .update(&activity)
            .await
            .map_err(map_activity_error)?
        {
            return Err(missing_activity(id));
        }
        info!(activity_id = %activity.id, "activity changed");
        Ok(activity)
    }

    async fn remove_activity(&self, actor: &User, id: &ActivityId) -> Result<(), Error> {
        let activity = self.editable(actor, id).await?;
        if !self
            .activities
            .delete(&activity.id)
            .await
            .map_err(map_activity_error)?
        {
            return Err(missing_activity(id));
        }
        info!(activity_id = %activity.id, user_id = %activity.user_id, "activity removed");
        Ok(())
    }

    async fn day(
        &self,
        actor: &User,
        scope: DayScope,
        date: NaiveDate,
    ) -> Result<Vec<Activity>, Error> {
        let range = DateRange::new(date, date);
        match scope {
            DayScope::User(user_id) => {
                if user_id != actor.id && !actor.is_admin() {
                    return Err(Error::forbidden("cannot view another user's activities"));
                }
                self.activities
                    .list_for_user(&user_id, range)
                    .await
                    .map_err(map_activity_error)
            }
            DayScope::Project(project_id) => {
                let project = self
                    .project(&project_id)
                    .await?
                    .ok_or_else(|| Error::not_found(format!("project {project_id} not found")))?;
                let own_only = if project.calendar_viewable_by(actor) {
                    false
                } else if actor.is_employee() {
                    true
                } else {
                    return Err(Error::forbidden("cannot view another client's activities"));
                };
                let activities = self
                    .activities
                    .list_for_project(&project.id, range)
                    .await
                    .map_err(map_activity_error)?;
                Ok(activities
                    .into_iter()
                    .filter(|activity| !own_only || activity.user_id == actor.id)
                    .collect())
            }
        }
    }

    async fn project_calendar(
        &self,
        actor: &User,
        project_id: &ProjectId,
        range: DateRange,
    ) -> Result<Vec<DayActivities>, Error> {
        let project = self
            .project(project_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("project {project_id} not found")))?;
        if !project.calendar_viewable_by(actor) {
            return Err(Error::forbidden("cannot view this project's calendar"));
        }
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let activities = self
            .activities
            .list_for_project(&project.id, range)
            .await
            .map_err(map_activity_error)?;
        Ok(group_by_dates_and_projects(range, activities))
    }

    async fn project_choices(&self, user_id: &UserId) -> Result<ProjectChoices, Error> {
        let recent = self
            .activities
            .recent_projects(user_id, RECENT_PROJECTS_LIMIT)
            .await
            .map_err(map_activity_error)?;
        let all = self.projects.list_all().await.map_err(map_project_error)?;
        Ok(ProjectChoices::new(recent, all))
    }
}
