//! User listings for filters and pickers.
//!
//! ```text
//! GET /api/v1/users/with-activities?clientId=...
//! GET /api/v1/users/managers
//! ```
//!
//! Both routes must be registered ahead of `/users/{id}`.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{ClientId, Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::current_profile;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_id;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WithActivitiesQuery {
    /// Count only activities on this client's projects.
    pub client_id: Option<String>,
}

/// Users who logged activities.
///
/// Administrators may filter by any client. Client users always see their
/// own client's contributors.
#[utoipa::path(
    get,
    path = "/api/v1/users/with-activities",
    params(WithActivitiesQuery),
    responses(
        (status = 200, description = "Users ordered by name", body = [UserSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "usersWithActivities"
)]
#[get("/users/with-activities")]
pub async fn users_with_activities(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<WithActivitiesQuery>,
) -> ApiResult<web::Json<Vec<User>>> {
    let requested = query
        .client_id
        .as_deref()
        .map(|raw| parse_id::<ClientId>(raw, "clientId"))
        .transpose()?;
    let current = current_profile(&state, &session).await?;

    let client = if current.user.is_admin() {
        requested
    } else {
        match current.user.snapshot.client_id {
            Some(own) if requested.is_none_or(|client_id| client_id == own) => Some(own),
            Some(_) => return Err(Error::forbidden("cannot list another client's users")),
            None => return Err(Error::forbidden("administrator or client rights required")),
        }
    };

    state
        .directory
        .users_with_activities(client)
        .await
        .map(web::Json)
}

/// Employees holding the project manager role.
#[utoipa::path(
    get,
    path = "/api/v1/users/managers",
    responses(
        (status = 200, description = "Managers ordered by name", body = [UserSchema]),
        (status = 403, description = "Client users are not allowed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "managers"
)]
#[get("/users/managers")]
pub async fn managers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<User>>> {
    let current = current_profile(&state, &session).await?;
    if current.user.is_client_user() {
        return Err(Error::forbidden("employees only"));
    }
    state.directory.managers().await.map(web::Json)
}
