//! User account handlers.
//!
//! ```text
//! GET    /api/v1/me
//! GET    /api/v1/users/{id}
//! POST   /api/v1/users
//! PATCH  /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```
//!
//! Creating and deleting users is reserved to administrators. Users may edit
//! their own name, login and email; role, admin and active flags need an
//! administrator.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{CreateUserRequest, UpdateUserRequest, UserProfile};
use crate::domain::{ClientId, Error, RoleId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{current_profile, require_admin, require_self_or_admin};
use crate::inbound::http::schemas::{ErrorSchema, UserProfileSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_email, parse_id, parse_login, parse_name, parse_user_id, require,
};

/// Body of `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    pub name: Option<String>,
    pub login: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<String>,
    pub client_id: Option<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl TryFrom<CreateUserBody> for CreateUserRequest {
    type Error = Error;

    fn try_from(body: CreateUserBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: parse_name(require(body.name, "name")?)?,
            login: parse_login(require(body.login, "login")?)?,
            email: parse_email(require(body.email, "email")?)?,
            password: Zeroizing::new(require(body.password, "password")?),
            role_id: body
                .role_id
                .as_deref()
                .map(|raw| parse_id::<RoleId>(raw, "roleId"))
                .transpose()?,
            client_id: body
                .client_id
                .as_deref()
                .map(|raw| parse_id::<ClientId>(raw, "clientId"))
                .transpose()?,
            admin: body.admin,
            active: body.active,
        })
    }
}

/// Body of `PATCH /api/v1/users/{id}`. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub login: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<String>,
    pub admin: Option<bool>,
    pub active: Option<bool>,
}

impl TryFrom<UpdateUserBody> for UpdateUserRequest {
    type Error = Error;

    fn try_from(body: UpdateUserBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: body.name.map(parse_name).transpose()?,
            login: body.login.map(parse_login).transpose()?,
            email: body.email.map(parse_email).transpose()?,
            role_id: body
                .role_id
                .as_deref()
                .map(|raw| parse_id::<RoleId>(raw, "roleId"))
                .transpose()?,
            admin: body.admin,
            active: body.active,
        })
    }
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = UserProfileSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfile>> {
    current_profile(&state, &session).await.map(web::Json)
}

/// Fetch one user with its permissions.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserProfileSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfile>> {
    let target = parse_user_id(&path)?;
    let current = current_profile(&state, &session).await?;
    require_self_or_admin(&current, &target)?;
    state.profiles.profile(&target).await.map(web::Json)
}

/// Create a user. Administrators only.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "Created", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Login taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let current = current_profile(&state, &session).await?;
    require_admin(&current)?;
    let request = CreateUserRequest::try_from(payload.into_inner())?;
    let user = state.accounts.create_user(request).await?;
    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/api/v1/users/{}", user.id)))
        .json(user))
}

/// Update a user.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Updated", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path)?;
    let current = current_profile(&state, &session).await?;
    require_self_or_admin(&current, &target)?;

    let request = UpdateUserRequest::try_from(payload.into_inner())?;
    if request.touches_privileged_fields() {
        require_admin(&current)?;
    }
    let user = state.accounts.update_user(&target, request).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Delete a user without activities, with its history. Administrators only.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "User has activities", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path)?;
    let current = current_profile(&state, &session).await?;
    require_admin(&current)?;
    state.accounts.destroy_user(&target).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
