//! Activity management handlers.
//!
//! ```text
//! POST   /api/v1/activities
//! GET    /api/v1/activities/day?date=2009-04-15&projectId=...
//! GET    /api/v1/activities/{id}
//! PATCH  /api/v1/activities/{id}
//! DELETE /api/v1/activities/{id}
//! GET    /api/v1/projects/{id}/calendar?from=2009-04-01&to=2009-04-30
//! GET    /api/v1/users/{id}/project-choices
//! ```
//!
//! Durations are sent either as `minutes` or as typed `hours` (`7`, `3:03`).

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ChangeActivityRequest, DayScope, LogActivityRequest};
use crate::domain::{
    Activity, ActivityId, Error, Project, ProjectChoices, ProjectId, UserId, format_minutes,
    parse_hours,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{current_profile, require_known_user, require_self_or_admin};
use crate::inbound::http::activities::{CalendarDayResponse, RangeQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldCode, field_error, parse_date, parse_date_range, parse_id, parse_user_id, require,
};

/// Body of `POST /api/v1/activities`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogActivityBody {
    /// Honoured for administrators only.
    pub user_id: Option<String>,
    pub project_id: Option<String>,
    #[schema(example = "2009-04-15")]
    pub date: Option<String>,
    pub minutes: Option<u32>,
    #[schema(example = "3:03")]
    pub hours: Option<String>,
    pub comments: Option<String>,
}

/// Body of `PATCH /api/v1/activities/{id}`. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeActivityBody {
    pub project_id: Option<String>,
    pub date: Option<String>,
    pub minutes: Option<u32>,
    pub hours: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DayQuery {
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Defaults to the signed-in user.
    pub user_id: Option<String>,
    /// Lists the project's activities instead of a user's.
    pub project_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetailResponse {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub project_name: String,
    #[schema(value_type = String, example = "2009-04-15")]
    pub date: NaiveDate,
    pub minutes: u32,
    /// `H:MM`.
    pub hours: String,
    pub comments: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: String,
    pub client_id: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChoicesResponse {
    /// Most recently used first.
    pub recent: Vec<ProjectResponse>,
    /// Every other project, by name.
    pub other: Vec<ProjectResponse>,
}

impl From<Activity> for ActivityDetailResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id.to_string(),
            user_id: activity.user_id.to_string(),
            project_id: activity.project.id.to_string(),
            project_name: activity.project.name,
            date: activity.date,
            minutes: activity.minutes,
            hours: format_minutes(Some(activity.minutes)),
            comments: activity.comments,
        }
    }
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.to_string(),
            client_id: project.client_id.to_string(),
            name: project.name,
        }
    }
}

impl From<ProjectChoices> for ProjectChoicesResponse {
    fn from(choices: ProjectChoices) -> Self {
        Self {
            recent: choices.recent.into_iter().map(Into::into).collect(),
            other: choices.other.into_iter().map(Into::into).collect(),
        }
    }
}

/// Minutes from either `minutes` or typed `hours`, never both.
fn parse_duration(minutes: Option<u32>, hours: Option<&str>) -> Result<Option<u32>, Error> {
    match (minutes, hours) {
        (Some(_), Some(_)) => Err(field_error(
            "hours",
            FieldCode::InvalidValue,
            "send either minutes or hours",
        )),
        (Some(minutes), None) => Ok(Some(minutes)),
        (None, Some(raw)) => parse_hours(raw)
            .map(Some)
            .map_err(|err| field_error("hours", FieldCode::InvalidValue, err.to_string())),
        (None, None) => Ok(None),
    }
}

impl TryFrom<LogActivityBody> for LogActivityRequest {
    type Error = Error;

    fn try_from(body: LogActivityBody) -> Result<Self, Self::Error> {
        let minutes = parse_duration(body.minutes, body.hours.as_deref())?;
        Ok(Self {
            user_id: body
                .user_id
                .as_deref()
                .map(|raw| parse_id::<UserId>(raw, "userId"))
                .transpose()?,
            project_id: parse_id(require(body.project_id.as_deref(), "projectId")?, "projectId")?,
            date: parse_date(require(body.date.as_deref(), "date")?, "date")?,
            minutes: require(minutes, "minutes")?,
            comments: require(body.comments, "comments")?,
        })
    }
}

impl TryFrom<ChangeActivityBody> for ChangeActivityRequest {
    type Error = Error;

    fn try_from(body: ChangeActivityBody) -> Result<Self, Self::Error> {
        Ok(Self {
            project_id: body
                .project_id
                .as_deref()
                .map(|raw| parse_id::<ProjectId>(raw, "projectId"))
                .transpose()?,
            date: body
                .date
                .as_deref()
                .map(|raw| parse_date(raw, "date"))
                .transpose()?,
            minutes: parse_duration(body.minutes, body.hours.as_deref())?,
            comments: body.comments,
        })
    }
}

fn parse_activity_id(raw: &str) -> Result<ActivityId, Error> {
    parse_id(raw, "id")
}

/// Log an activity.
#[utoipa::path(
    post,
    path = "/api/v1/activities",
    request_body = LogActivityBody,
    responses(
        (status = 201, description = "Logged", body = ActivityDetailResponse),
        (status = 400, description = "Invalid request or unknown project", body = ErrorSchema),
        (status = 403, description = "Client users cannot log time", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "logActivity"
)]
#[post("/activities")]
pub async fn log_activity(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LogActivityBody>,
) -> ApiResult<HttpResponse> {
    let current = current_profile(&state, &session).await?;
    let request = LogActivityRequest::try_from(payload.into_inner())?;
    let activity = state
        .activity_log
        .log_activity(&current.user, request)
        .await?;
    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/api/v1/activities/{}", activity.id)))
        .json(ActivityDetailResponse::from(activity)))
}

/// Activities of one day for a user or a project.
#[utoipa::path(
    get,
    path = "/api/v1/activities/day",
    params(DayQuery),
    responses(
        (status = 200, description = "Activities in creation order", body = [ActivityDetailResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown project", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "activitiesOfDay"
)]
#[get("/activities/day")]
pub async fn activities_of_day(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DayQuery>,
) -> ApiResult<web::Json<Vec<ActivityDetailResponse>>> {
    let date = parse_date(require(query.date.as_deref(), "date")?, "date")?;
    let current = current_profile(&state, &session).await?;
    let scope = match (query.user_id.as_deref(), query.project_id.as_deref()) {
        (Some(_), Some(_)) => {
            return Err(field_error(
                "projectId",
                FieldCode::InvalidValue,
                "filter by either userId or projectId",
            ));
        }
        (_, Some(raw)) => DayScope::Project(parse_id(raw, "projectId")?),
        (Some(raw), None) => DayScope::User(parse_id(raw, "userId")?),
        (None, None) => DayScope::User(current.user.id.clone()),
    };

    let activities = state.activity_log.day(&current.user, scope, date).await?;
    Ok(web::Json(activities.into_iter().map(Into::into).collect()))
}

/// Fetch an activity the caller may edit.
#[utoipa::path(
    get,
    path = "/api/v1/activities/{id}",
    params(("id" = String, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity", body = ActivityDetailResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "getActivity"
)]
#[get("/activities/{id}")]
pub async fn get_activity(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ActivityDetailResponse>> {
    let id = parse_activity_id(&path)?;
    let current = current_profile(&state, &session).await?;
    let activity = state.activity_log.find_activity(&current.user, &id).await?;
    Ok(web::Json(activity.into()))
}

/// Change an activity. Owners and administrators only.
#[utoipa::path(
    patch,
    path = "/api/v1/activities/{id}",
    params(("id" = String, Path, description = "Activity id")),
    request_body = ChangeActivityBody,
    responses(
        (status = 200, description = "Changed", body = ActivityDetailResponse),
        (status = 400, description = "Invalid request or unknown project", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "changeActivity"
)]
#[patch("/activities/{id}")]
pub async fn change_activity(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ChangeActivityBody>,
) -> ApiResult<web::Json<ActivityDetailResponse>> {
    let id = parse_activity_id(&path)?;
    let current = current_profile(&state, &session).await?;
    let request = ChangeActivityRequest::try_from(payload.into_inner())?;
    let activity = state
        .activity_log
        .change_activity(&current.user, &id, request)
        .await?;
    Ok(web::Json(activity.into()))
}

/// Remove an activity. Owners and administrators only.
#[utoipa::path(
    delete,
    path = "/api/v1/activities/{id}",
    params(("id" = String, Path, description = "Activity id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "removeActivity"
)]
#[delete("/activities/{id}")]
pub async fn remove_activity(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_activity_id(&path)?;
    let current = current_profile(&state, &session).await?;
    state.activity_log.remove_activity(&current.user, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Every day in the range with the project's activities.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/calendar",
    params(("id" = String, Path, description = "Project id"), RangeQuery),
    responses(
        (status = 200, description = "One entry per day, ascending", body = [CalendarDayResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Neither admin nor a user of the project's client", body = ErrorSchema),
        (status = 404, description = "Unknown project", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "projectCalendar"
)]
#[get("/projects/{id}/calendar")]
pub async fn project_calendar(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> ApiResult<web::Json<Vec<CalendarDayResponse>>> {
    let project_id: ProjectId = parse_id(&path, "id")?;
    let range = parse_date_range(query.from.as_deref(), query.to.as_deref())?;
    let current = current_profile(&state, &session).await?;

    let days = state
        .activity_log
        .project_calendar(&current.user, &project_id, range)
        .await?;
    Ok(web::Json(days.into_iter().map(Into::into).collect()))
}

/// Projects to offer when the user logs time.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/project-choices",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Recent and remaining projects", body = ProjectChoicesResponse),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "projectChoices"
)]
#[get("/users/{id}/project-choices")]
pub async fn project_choices(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProjectChoicesResponse>> {
    let target = parse_user_id(&path)?;
    let current = current_profile(&state, &session).await?;
    require_self_or_admin(&current, &target)?;
    require_known_user(&state, &current, &target).await?;

    let choices = state.activity_log.project_choices(&target).await?;
    Ok(web::Json(choices.into()))
}
