//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the schema
//! wrappers from [`crate::inbound::http::schemas`] and the session cookie
//! security scheme. The document backs Swagger UI in debug builds and is
//! exported with `cargo run --bin openapi-dump`.

use crate::inbound::http::activities::{
    ActivityResponse, CalendarDayResponse, DaysWithoutActivitiesResponse, FreeDayBody,
    FreeDayResponse, ProjectDayResponse,
};
use crate::inbound::http::activity_log::{
    ActivityDetailResponse, ChangeActivityBody, LogActivityBody, ProjectChoicesResponse,
    ProjectResponse,
};
use crate::inbound::http::auth::{LoginRequest, PasswordResetRequest};
use crate::inbound::http::menu::MenuResponse;
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, MenuItemSchema, UserKindSchema, UserProfileSchema, UserSchema,
    UserVersionSchema,
};
use crate::inbound::http::users::{CreateUserBody, UpdateUserBody};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Timesheet API",
        description = "Users, their role history and activity calendars behind a session cookie."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::request_password_reset,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::versions::list_versions,
        crate::inbound::http::versions::version_at,
        crate::inbound::http::activities::days_without_activities,
        crate::inbound::http::activities::calendar,
        crate::inbound::http::activities::declare_free_day,
        crate::inbound::http::activity_log::log_activity,
        crate::inbound::http::activity_log::activities_of_day,
        crate::inbound::http::activity_log::get_activity,
        crate::inbound::http::activity_log::change_activity,
        crate::inbound::http::activity_log::remove_activity,
        crate::inbound::http::activity_log::project_calendar,
        crate::inbound::http::activity_log::project_choices,
        crate::inbound::http::directory::users_with_activities,
        crate::inbound::http::directory::managers,
        crate::inbound::http::menu::menu,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        UserKindSchema,
        UserProfileSchema,
        UserVersionSchema,
        MenuItemSchema,
        MenuResponse,
        LoginRequest,
        PasswordResetRequest,
        CreateUserBody,
        UpdateUserBody,
        DaysWithoutActivitiesResponse,
        CalendarDayResponse,
        ProjectDayResponse,
        ActivityResponse,
        FreeDayBody,
        FreeDayResponse,
        LogActivityBody,
        ChangeActivityBody,
        ActivityDetailResponse,
        ProjectResponse,
        ProjectChoicesResponse,
    )),
    tags(
        (name = "auth", description = "Session sign-in, sign-out and password resets"),
        (name = "users", description = "User accounts"),
        (name = "versions", description = "Role history of users"),
        (name = "activities", description = "Activity log and calendars"),
        (name = "presentation", description = "Navigation menus"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
