//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their wire shape and are registered under the domain
//! type names via `#[schema(as = ...)]`.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with the stored state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database or mail relay is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "login must be 3-20 characters")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "6f1c1f4e-3a51-4d0a-9a43-5f0f3c6c2b11")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::UserKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserKind)]
pub enum UserKindSchema {
    #[schema(rename = "admin")]
    Admin,
    #[schema(rename = "employee")]
    Employee,
    #[schema(rename = "client_user")]
    ClientUser,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada")]
    login: String,
    #[schema(example = "ada@example.com")]
    email: String,
    /// Employee role; absent for client users and admins without a role.
    role_id: Option<String>,
    /// Client the user belongs to; absent for employees.
    client_id: Option<String>,
    admin: bool,
    active: bool,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    modified_at: String,
}

/// OpenAPI schema for [`crate::domain::ports::UserProfile`].
///
/// A user record with the attributes derived from its role.
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::UserProfile, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserProfileSchema {
    id: String,
    name: String,
    login: String,
    email: String,
    role_id: Option<String>,
    client_id: Option<String>,
    admin: bool,
    active: bool,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    modified_at: String,
    kind: UserKindSchema,
    can_manage_financial_data: bool,
}

/// OpenAPI schema for [`crate::domain::UserVersion`].
///
/// Frozen snapshot of a user taken when its role changed.
#[derive(ToSchema)]
#[schema(as = crate::domain::UserVersion, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserVersionSchema {
    user_id: String,
    /// Insertion order; breaks ties between equal timestamps.
    sequence: i64,
    #[schema(format = DateTime)]
    modified_at: String,
    name: String,
    login: String,
    email: String,
    role_id: Option<String>,
    client_id: Option<String>,
    admin: bool,
    active: bool,
}

/// OpenAPI schema for [`crate::domain::MenuItem`].
#[derive(ToSchema)]
#[schema(as = crate::domain::MenuItem)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MenuItemSchema {
    #[schema(example = "Activities")]
    title: String,
    #[schema(example = "/activities")]
    path: String,
    selected: bool,
}
