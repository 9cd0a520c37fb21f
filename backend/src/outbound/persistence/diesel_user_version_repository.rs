//! PostgreSQL-backed `UserVersionRepository`.
//!
//! `sequence` is a `BIGSERIAL`, so insertion order survives identical
//! `modified_at` stamps.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserVersionRepository, UserVersionRepositoryError};
use crate::domain::{
    ClientId, Email, Login, NewUserVersion, RoleId, UserId, UserName, UserSnapshot, UserVersion,
};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserVersionRow, UserVersionRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_versions;

#[derive(Clone)]
pub struct DieselUserVersionRepository {
    pool: DbPool,
}

impl DieselUserVersionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserVersionRepositoryError {
    map_pool_error(error, UserVersionRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserVersionRepositoryError {
    map_diesel_error(
        error,
        UserVersionRepositoryError::query,
        UserVersionRepositoryError::connection,
    )
}

fn row_to_version(row: UserVersionRow) -> Result<UserVersion, UserVersionRepositoryError> {
    let sequence = row.sequence;
    let invalid = |err: crate::domain::UserValidationError| {
        UserVersionRepositoryError::query(format!("stored user version {sequence} is invalid: {err}"))
    };
    Ok(UserVersion {
        user_id: UserId::from_uuid(row.user_id),
        sequence,
        modified_at: row.modified_at,
        snapshot: UserSnapshot {
            name: UserName::new(row.name).map_err(invalid)?,
            login: Login::new(row.login).map_err(invalid)?,
            email: Email::new(row.email).map_err(invalid)?,
            role_id: row.role_id.map(RoleId::from_uuid),
            client_id: row.client_id.map(ClientId::from_uuid),
            admin: row.admin,
            active: row.active,
        },
    })
}

#[async_trait]
impl UserVersionRepository for DieselUserVersionRepository {
    async fn append(
        &self,
        version: &NewUserVersion,
    ) -> Result<UserVersion, UserVersionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let snapshot = &version.snapshot;
        let row = NewUserVersionRow {
            user_id: *version.user_id.as_uuid(),
            name: snapshot.name.as_ref(),
            login: snapshot.login.as_ref(),
            email: snapshot.email.as_ref(),
            role_id: snapshot.role_id.map(|id| *id.as_uuid()),
            client_id: snapshot.client_id.map(|id| *id.as_uuid()),
            admin: snapshot.admin,
            active: snapshot.active,
            modified_at: version.modified_at,
        };

        let stored: UserVersionRow = diesel::insert_into(user_versions::table)
            .values(&row)
            .returning(UserVersionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_version(stored)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserVersion>, UserVersionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<UserVersionRow> = user_versions::table
            .filter(user_versions::user_id.eq(user_id.as_uuid()))
            .order((user_versions::modified_at.asc(), user_versions::sequence.asc()))
            .select(UserVersionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_version).collect()
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, UserVersionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = user_versions::table
            .filter(user_versions::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        u64::try_from(count)
            .map_err(|_| UserVersionRepositoryError::query("negative version count"))
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, UserVersionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            user_versions::table.filter(user_versions::user_id.eq(user_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        u64::try_from(deleted)
            .map_err(|_| UserVersionRepositoryError::query("deleted row count overflow"))
    }
}
