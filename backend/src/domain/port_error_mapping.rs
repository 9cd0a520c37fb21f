//! Translation of driven-port errors into domain [`Error`] payloads.
//!
//! Connection failures become `service_unavailable`; everything the adapter
//! reports as a failed query is an internal error.

use crate::domain::Error;
use crate::domain::ports::{
    ActivityRepositoryError, FreeDayRepositoryError, MailerError, ProjectRepositoryError,
    RoleRepositoryError, UserPersistenceError, UserVersionRepositoryError,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateLogin { login } => {
            Error::conflict(format!("login {login} is already taken"))
                .with_details(serde_json::json!({ "field": "login", "code": "duplicate_login" }))
        }
    }
}

pub(crate) fn map_version_error(error: UserVersionRepositoryError) -> Error {
    match error {
        UserVersionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user version repository unavailable: {message}"))
        }
        UserVersionRepositoryError::Query { message } => {
            Error::internal(format!("user version repository error: {message}"))
        }
    }
}

pub(crate) fn map_activity_error(error: ActivityRepositoryError) -> Error {
    match error {
        ActivityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("activity repository unavailable: {message}"))
        }
        ActivityRepositoryError::Query { message } => {
            Error::internal(format!("activity repository error: {message}"))
        }
    }
}

pub(crate) fn map_free_day_error(error: FreeDayRepositoryError) -> Error {
    match error {
        FreeDayRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("free day repository unavailable: {message}"))
        }
        FreeDayRepositoryError::Query { message } => {
            Error::internal(format!("free day repository error: {message}"))
        }
    }
}

pub(crate) fn map_project_error(error: ProjectRepositoryError) -> Error {
    match error {
        ProjectRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("project repository unavailable: {message}"))
        }
        ProjectRepositoryError::Query { message } => {
            Error::internal(format!("project repository error: {message}"))
        }
    }
}

pub(crate) fn map_role_error(error: RoleRepositoryError) -> Error {
    match error {
        RoleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("role repository unavailable: {message}"))
        }
        RoleRepositoryError::Query { message } => {
            Error::internal(format!("role repository error: {message}"))
        }
    }
}

pub(crate) fn map_mailer_error(error: MailerError) -> Error {
    match error {
        MailerError::InvalidMessage { message } => {
            Error::internal(format!("mail could not be built: {message}"))
        }
        MailerError::Transport { message } => {
            Error::service_unavailable(format!("mail relay unavailable: {message}"))
        }
    }
}
