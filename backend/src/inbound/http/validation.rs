//! Request parsing helpers shared by HTTP handlers.
//!
//! Every failure is an `invalid_request` error whose details name the
//! offending field and a stable code.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::calendar::DateRange;
use crate::domain::{Email, Error, Login, UserId, UserName, UserValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidTimestamp,
    InvalidValue,
    RangeTooLong,
}

/// Longest span, in days, a date range query may cover.
pub(crate) const MAX_RANGE_DAYS: i64 = 366;

impl FieldCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidDate => "invalid_date",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidValue => "invalid_value",
            Self::RangeTooLong => "range_too_long",
        }
    }
}

pub(crate) fn field_error(
    field: &'static str,
    code: FieldCode,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    field_error(
        field,
        FieldCode::MissingField,
        format!("missing required field: {field}"),
    )
}

pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw)
        .map_err(|_| field_error("id", FieldCode::InvalidUuid, "id must be a valid UUID"))
}

/// Parse any UUID-backed identifier such as [`crate::domain::RoleId`].
pub(crate) fn parse_id<T: FromStr>(raw: &str, field: &'static str) -> Result<T, Error> {
    raw.trim().parse().map_err(|_| {
        field_error(
            field,
            FieldCode::InvalidUuid,
            format!("{field} must be a valid UUID"),
        )
    })
}

/// Parse an ISO `YYYY-MM-DD` date.
pub(crate) fn parse_date(raw: &str, field: &'static str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        field_error(
            field,
            FieldCode::InvalidDate,
            format!("{field} must be a YYYY-MM-DD date"),
        )
    })
}

pub(crate) fn parse_timestamp(raw: &str, field: &'static str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| {
            field_error(
                field,
                FieldCode::InvalidTimestamp,
                format!("{field} must be an RFC 3339 timestamp"),
            )
        })
}

/// Inclusive `from..=to` range of at most [`MAX_RANGE_DAYS`] days. An
/// inverted range is accepted and is empty.
pub(crate) fn parse_date_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<DateRange, Error> {
    let start = parse_date(require(from, "from")?, "from")?;
    let end = parse_date(require(to, "to")?, "to")?;
    if (end - start).num_days() >= MAX_RANGE_DAYS {
        return Err(field_error(
            "to",
            FieldCode::RangeTooLong,
            format!("range must not exceed {MAX_RANGE_DAYS} days"),
        ));
    }
    Ok(DateRange::new(start, end))
}

pub(crate) fn user_field_error(field: &'static str, error: &UserValidationError) -> Error {
    field_error(field, FieldCode::InvalidValue, error.to_string())
}

pub(crate) fn parse_name(raw: String) -> Result<UserName, Error> {
    UserName::new(raw).map_err(|err| user_field_error("name", &err))
}

pub(crate) fn parse_login(raw: String) -> Result<Login, Error> {
    Login::new(raw).map_err(|err| user_field_error("login", &err))
}

pub(crate) fn parse_email(raw: String) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| user_field_error("email", &err))
}
