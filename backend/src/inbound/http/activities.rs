//! Activity calendar handlers.
//!
//! ```text
//! GET /api/v1/users/{id}/days-without-activities?from=2009-04-01&to=2009-04-30&weekdaysOnly=true
//! GET /api/v1/users/{id}/calendar?from=2009-04-01&to=2009-04-30
//! POST /api/v1/users/{id}/free-days {"date":"2009-04-21"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::calendar::weekdays_only;
use crate::domain::{Activity, DayActivities, ProjectActivities, format_minutes};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{current_profile, require_known_user, require_self_or_admin};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_date, parse_date_range, parse_user_id, require};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// First day, `YYYY-MM-DD`, inclusive.
    pub from: Option<String>,
    /// Last day, `YYYY-MM-DD`, inclusive.
    pub to: Option<String>,
    /// Drop Saturdays and Sundays from the result.
    #[serde(default)]
    pub weekdays_only: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaysWithoutActivitiesResponse {
    #[schema(value_type = Vec<String>, example = json!(["2009-04-01"]))]
    pub days: Vec<NaiveDate>,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: String,
    pub minutes: u32,
    pub comments: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDayResponse {
    pub project_id: String,
    pub project_name: String,
    pub total_minutes: u32,
    /// `H:MM`.
    pub total: String,
    pub activities: Vec<ActivityResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDayResponse {
    #[schema(value_type = String, example = "2009-04-15")]
    pub date: NaiveDate,
    pub total_minutes: u32,
    pub total: String,
    pub projects: Vec<ProjectDayResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreeDayBody {
    /// `YYYY-MM-DD`.
    #[schema(example = "2009-04-21")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreeDayResponse {
    pub user_id: String,
    #[schema(value_type = String, example = "2009-04-21")]
    pub date: NaiveDate,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id.to_string(),
            minutes: activity.minutes,
            comments: activity.comments,
        }
    }
}

impl From<ProjectActivities> for ProjectDayResponse {
    fn from(group: ProjectActivities) -> Self {
        let total_minutes = group.total_minutes();
        Self {
            project_id: group.project.id.to_string(),
            project_name: group.project.name,
            total_minutes,
            total: format_minutes(Some(total_minutes)),
            activities: group.activities.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<DayActivities> for CalendarDayResponse {
    fn from(day: DayActivities) -> Self {
        let total_minutes = day.total_minutes();
        let total = if day.projects.is_empty() {
            format_minutes(None)
        } else {
            format_minutes(Some(total_minutes))
        };
        Self {
            date: day.date,
            total_minutes,
            total,
            projects: day.projects.into_iter().map(Into::into).collect(),
        }
    }
}

/// Days in the range with no activity and no free day.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/days-without-activities",
    params(("id" = String, Path, description = "User id"), RangeQuery),
    responses(
        (status = 200, description = "Days without activities, ascending", body = DaysWithoutActivitiesResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "daysWithoutActivities"
)]
#[get("/users/{id}/days-without-activities")]
pub async fn days_without_activities(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> ApiResult<web::Json<DaysWithoutActivitiesResponse>> {
    let target = parse_user_id(&path)?;
    let range = parse_date_range(query.from.as_deref(), query.to.as_deref())?;
    let current = current_profile(&state, &session).await?;
    require_self_or_admin(&current, &target)?;
    require_known_user(&state, &current, &target).await?;

    let mut days = state.calendar.days_without_activity(&target, range).await?;
    if query.weekdays_only {
        days = weekdays_only(days);
    }
    Ok(web::Json(DaysWithoutActivitiesResponse {
        count: days.len(),
        days,
    }))
}

/// Every day in the range with activities grouped by project.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/calendar",
    params(("id" = String, Path, description = "User id"), RangeQuery),
    responses(
        (status = 200, description = "One entry per day, ascending", body = [CalendarDayResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "userCalendar"
)]
#[get("/users/{id}/calendar")]
pub async fn calendar(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> ApiResult<web::Json<Vec<CalendarDayResponse>>> {
    let target = parse_user_id(&path)?;
    let range = parse_date_range(query.from.as_deref(), query.to.as_deref())?;
    let current = current_profile(&state, &session).await?;
    require_self_or_admin(&current, &target)?;
    require_known_user(&state, &current, &target).await?;

    let days = state
        .calendar
        .activities_by_dates_and_projects(&target, range)
        .await?;
    Ok(web::Json(days.into_iter().map(Into::into).collect()))
}

/// Declare a free day, which no longer counts as missing activity.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/free-days",
    params(("id" = String, Path, description = "User id")),
    request_body = FreeDayBody,
    responses(
        (status = 201, description = "Free day declared", body = FreeDayResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "declareFreeDay"
)]
#[post("/users/{id}/free-days")]
pub async fn declare_free_day(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<FreeDayBody>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path)?;
    let date = parse_date(require(body.date.as_deref(), "date")?, "date")?;
    let current = current_profile(&state, &session).await?;
    require_self_or_admin(&current, &target)?;
    require_known_user(&state, &current, &target).await?;

    let free_day = state.calendar.declare_free_day(&target, date).await?;
    Ok(HttpResponse::Created().json(FreeDayResponse {
        user_id: free_day.user_id.to_string(),
        date: free_day.date,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityId, ClientId, Error, FreeDay, Project, ProjectId, User, UserId};
    use crate::domain::calendar::DateRange;
    use crate::inbound::http::test_utils::{
        MockPorts, session_cookie, sign_in_as, sign_in_request, test_session_middleware, user,
    };
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    fn april(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2009, 4, day).expect("valid date")
    }

    async fn send_as(
        actor: &User,
        ports: MockPorts,
        request: test::TestRequest,
    ) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .wrap(test_session_middleware())
                .route("/test/sign-in/{id}", web::post().to(sign_in_as))
                .service(
                    web::scope("/api/v1")
                        .service(days_without_activities)
                        .service(calendar)
                        .service(declare_free_day),
                ),
        )
        .await;
        let signed_in = test::call_service(&app, sign_in_request(&actor.id).to_request()).await;
        let req = request.cookie(session_cookie(&signed_in)).to_request();
        test::call_service(&app, req).await
    }

    async fn call_as(actor: &User, ports: MockPorts, uri: &str) -> ServiceResponse {
        send_as(actor, ports, test::TestRequest::get().uri(uri)).await
    }

    /// April 2009 minus the 15th, 17th, 21st and 22nd.
    fn april_gaps() -> Vec<NaiveDate> {
        (1..=30)
            .filter(|day| ![15, 17, 21, 22].contains(day))
            .map(april)
            .collect()
    }

    #[rstest]
    #[case(false, 26)]
    #[case(true, 18)]
    #[actix_web::test]
    async fn weekday_filter_is_applied_after_aggregation(
        #[case] weekdays_only: bool,
        #[case] expected: u64,
    ) {
        let ada = user(false);
        let mut ports = MockPorts::new().with_known_users(&[ada.clone()]);
        ports
            .calendar
            .expect_days_without_activity()
            .withf(|_, range| *range == DateRange::new(april(1), april(30)))
            .times(1)
            .returning(|_, _| Ok(april_gaps()));

        let res = call_as(
            &ada,
            ports,
            &format!(
                "/api/v1/users/{}/days-without-activities?from=2009-04-01&to=2009-04-30&weekdaysOnly={weekdays_only}",
                ada.id
            ),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["count"], expected);
        assert_eq!(body["days"][0], "2009-04-01");
    }

    #[actix_web::test]
    async fn missing_range_is_rejected() {
        let ada = user(false);
        let ports = MockPorts::new();

        let res = call_as(
            &ada,
            ports,
            &format!("/api/v1/users/{}/days-without-activities?from=2009-04-01", ada.id),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "to");
    }

    #[actix_web::test]
    async fn calendar_renders_totals() {
        let ada = user(false);
        let mut ports = MockPorts::new().with_known_users(&[ada.clone()]);
        let project = Project {
            id: ProjectId::random(),
            client_id: ClientId::random(),
            name: "BBB".to_owned(),
        };
        let activity = Activity {
            id: ActivityId::random(),
            user_id: ada.id.clone(),
            project: project.clone(),
            date: april(15),
            minutes: 150,
            comments: "billing".to_owned(),
        };
        let days = vec![
            DayActivities {
                date: april(15),
                projects: vec![ProjectActivities {
                    project,
                    activities: vec![activity],
                }],
            },
            DayActivities {
                date: april(16),
                projects: Vec::new(),
            },
        ];
        ports
            .calendar
            .expect_activities_by_dates_and_projects()
            .times(1)
            .return_once(move |_, _| Ok(days));

        let res = call_as(
            &ada,
            ports,
            &format!("/api/v1/users/{}/calendar?from=2009-04-15&to=2009-04-16", ada.id),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body[0]["total"], "2:30");
        assert_eq!(body[0]["projects"][0]["projectName"], "BBB");
        assert_eq!(body[1]["total"], "0");
    }

    #[actix_web::test]
    async fn store_outages_surface_as_service_unavailable() {
        let ada = user(false);
        let mut ports = MockPorts::new().with_known_users(&[ada.clone()]);
        ports
            .calendar
            .expect_activities_by_dates_and_projects()
            .returning(|_, _| Err(Error::service_unavailable("activity store unavailable")));

        let res = call_as(
            &ada,
            ports,
            &format!("/api/v1/users/{}/calendar?from=2009-04-01&to=2009-04-30", ada.id),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn ranges_longer_than_a_year_are_rejected() {
        let ada = user(false);
        let mut ports = MockPorts::new().with_known_users(&[ada.clone()]);
        ports.calendar.expect_days_without_activity().never();

        let res = call_as(
            &ada,
            ports,
            &format!(
                "/api/v1/users/{}/days-without-activities?from=0001-01-01&to=9999-12-31",
                ada.id
            ),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "to");
        assert_eq!(body["details"]["code"], "range_too_long");
    }

    #[rstest]
    #[case("days-without-activities")]
    #[case("calendar")]
    #[actix_web::test]
    async fn unknown_users_are_not_found(#[case] resource: &str) {
        let admin = user(true);
        let mut ports = MockPorts::new().with_known_users(&[admin.clone()]);
        ports.calendar.expect_days_without_activity().never();
        ports.calendar.expect_activities_by_dates_and_projects().never();

        let res = call_as(
            &admin,
            ports,
            &format!(
                "/api/v1/users/{}/{resource}?from=2009-04-01&to=2009-04-30",
                UserId::random()
            ),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn users_declare_their_own_free_days() {
        let ada = user(false);
        let mut ports = MockPorts::new().with_known_users(&[ada.clone()]);
        let owner = ada.id.clone();
        ports
            .calendar
            .expect_declare_free_day()
            .withf(move |user_id, date| *user_id == owner && *date == april(21))
            .times(1)
            .returning(|user_id, date| {
                Ok(FreeDay {
                    user_id: user_id.clone(),
                    date,
                })
            });

        let res = send_as(
            &ada,
            ports,
            test::TestRequest::post()
                .uri(&format!("/api/v1/users/{}/free-days", ada.id))
                .set_json(serde_json::json!({ "date": "2009-04-21" })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["date"], "2009-04-21");
        assert_eq!(body["userId"], ada.id.to_string());
    }

    #[actix_web::test]
    async fn free_days_of_other_users_need_admin_rights() {
        let ada = user(false);
        let grace = user(false);
        let mut ports = MockPorts::new().with_known_users(&[ada.clone(), grace.clone()]);
        ports.calendar.expect_declare_free_day().never();

        let res = send_as(
            &ada,
            ports,
            test::TestRequest::post()
                .uri(&format!("/api/v1/users/{}/free-days", grace.id))
                .set_json(serde_json::json!({ "date": "2009-04-21" })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn free_day_needs_a_date() {
        let ada = user(false);
        let ports = MockPorts::new().with_known_users(&[ada.clone()]);

        let res = send_as(
            &ada,
            ports,
            test::TestRequest::post()
                .uri(&format!("/api/v1/users/{}/free-days", ada.id))
                .set_json(serde_json::json!({})),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "date");
    }
}
