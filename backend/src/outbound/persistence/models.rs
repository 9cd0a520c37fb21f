//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! to domain types and surface malformed rows as query errors.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{activities, free_days, projects, roles, user_versions, users};

/// Row struct for reading user records. Credentials are selected separately.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub login: String,
    pub email: String,
    pub role_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub admin: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub login: &'a str,
    pub email: &'a str,
    pub role_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub admin: bool,
    pub active: bool,
    pub password_digest: &'a str,
    pub password_salt: &'a str,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Changeset for the mutable user fields.
///
/// `treat_none_as_null` keeps an explicit `None` role from being skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub login: &'a str,
    pub email: &'a str,
    pub role_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub admin: bool,
    pub active: bool,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    pub password_digest: String,
    pub password_salt: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_versions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserVersionRow {
    pub sequence: i64,
    pub user_id: Uuid,
    pub name: String,
    pub login: String,
    pub email: String,
    pub role_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub admin: bool,
    pub active: bool,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_versions)]
pub(crate) struct NewUserVersionRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub login: &'a str,
    pub email: &'a str,
    pub role_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub admin: bool,
    pub active: bool,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub can_manage_financial_data: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ActivityRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub minutes: i32,
    pub comments: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activities)]
pub(crate) struct NewActivityRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub date: NaiveDate,
    pub minutes: i32,
    pub comments: &'a str,
}

/// Changeset for the editable columns of an activity.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = activities)]
pub(crate) struct ActivityUpdate<'a> {
    pub project_id: Uuid,
    pub date: NaiveDate,
    pub minutes: i32,
    pub comments: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = free_days)]
pub(crate) struct NewFreeDayRow {
    pub user_id: Uuid,
    pub date: NaiveDate,
}
