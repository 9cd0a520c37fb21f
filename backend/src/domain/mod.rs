//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities used by the API, the mailer and
//! the persistence layer, plus the services that implement the driving ports.
//! Keep types free of transport concerns; inbound adapters own their DTOs.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - [`User`], [`UserVersion`], [`Role`], [`Activity`], [`FreeDay`]: entities.
//! - [`UserVersioningService`]: append-only user history.
//! - [`ActivityCalendarService`]: days without activity and per-day grouping.
//! - [`ActivityLogService`]: logging, changing and browsing activities.
//! - [`UserLifecycleService`], [`UserProfileService`], [`LocalLoginService`]
//!   and [`TimesheetNotificationService`]: use cases.

pub mod activity;
pub mod activity_aggregation;
pub mod activity_log;
pub mod auth;
pub mod authentication;
pub mod calendar;
pub mod error;
pub mod free_day;
pub mod ids;
pub mod mail;
pub(crate) mod port_error_mapping;
pub mod ports;
pub mod presentation;
pub mod role;
pub mod timesheet_notifications;
pub mod trace_id;
pub mod user;
pub mod user_lifecycle;
pub mod user_profile;
pub mod user_version;
pub mod user_versioning;

pub use self::activity::{
    Activity, ActivityValidationError, MAX_ACTIVITY_MINUTES, Project, ProjectChoices,
    RECENT_PROJECTS_LIMIT, parse_hours,
};
pub use self::activity_aggregation::{
    ActivityCalendarService, DayActivities, ProjectActivities, days_without_activity,
    group_by_dates_and_projects,
};
pub use self::activity_log::ActivityLogService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_RESET_TOKEN_TTL_HOURS, PasswordDigest,
    PasswordResetToken,
};
pub use self::authentication::LocalLoginService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::free_day::FreeDay;
pub use self::ids::{ActivityId, ClientId, ProjectId, RoleId};
pub use self::mail::{MailMessage, MailSettings};
pub use self::presentation::{
    MANAGE_PAGES, MenuItem, RequestContext, format_minutes, main_menu_items, sub_menu_items,
};
pub use self::role::{MANAGER_ROLE_NAME, Role};
pub use self::timesheet_notifications::{DeliveryReport, TimesheetNotificationService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, Login, User, UserId, UserKind, UserName, UserSnapshot, UserValidationError,
};
pub use self::user_lifecycle::UserLifecycleService;
pub use self::user_profile::UserProfileService;
pub use self::user_version::{NewUserVersion, UserVersion, select_version_at};
pub use self::user_versioning::{UserVersioningService, end_of_day, should_record_version};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use timesheet::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
