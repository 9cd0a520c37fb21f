//! User history handlers.
//!
//! ```text
//! GET /api/v1/users/{id}/versions
//! GET /api/v1/users/{id}/versions/at?at=2009-04-01T12:00:00Z
//! GET /api/v1/users/{id}/versions/at?date=2009-04-01
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::UserVersion;
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{current_profile, require_self_or_admin};
use crate::inbound::http::schemas::{ErrorSchema, UserVersionSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldCode, field_error, parse_date, parse_timestamp, parse_user_id,
};

/// List every stored version, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/versions",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Versions ordered by modification time", body = [UserVersionSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["versions"],
    operation_id = "listUserVersions"
)]
#[get("/users/{id}/versions")]
pub async fn list_versions(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserVersion>>> {
    let target = parse_user_id(&path)?;
    let current = current_profile(&state, &session).await?;
    require_self_or_admin(&current, &target)?;
    state.history.versions(&target).await.map(web::Json)
}

/// Either an instant or a calendar day.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VersionAtQuery {
    /// RFC 3339 instant.
    pub at: Option<String>,
    /// `YYYY-MM-DD`; resolved at the last instant of the day.
    pub date: Option<String>,
}

/// Version that was current at an instant or on a day.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/versions/at",
    params(("id" = String, Path, description = "User id"), VersionAtQuery),
    responses(
        (status = 200, description = "Version in effect", body = UserVersionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["versions"],
    operation_id = "getUserVersionAt"
)]
#[get("/users/{id}/versions/at")]
pub async fn version_at(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<VersionAtQuery>,
) -> ApiResult<web::Json<UserVersion>> {
    let target = parse_user_id(&path)?;
    let current = current_profile(&state, &session).await?;
    require_self_or_admin(&current, &target)?;

    let version = match (query.at.as_deref(), query.date.as_deref()) {
        (Some(at), None) => {
            let at = parse_timestamp(at, "at")?;
            state.history.version_at(&target, at).await?
        }
        (None, Some(date)) => {
            let date = parse_date(date, "date")?;
            state.history.version_on(&target, date).await?
        }
        _ => {
            return Err(field_error(
                "at",
                FieldCode::InvalidValue,
                "exactly one of at or date is required",
            ));
        }
    };
    Ok(web::Json(version))
}
