//! PostgreSQL-backed `RoleRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RoleRepository, RoleRepositoryError};
use crate::domain::{Role, RoleId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::RoleRow;
use super::pool::DbPool;
use super::schema::roles;

#[derive(Clone)]
pub struct DieselRoleRepository {
    pool: DbPool,
}

impl DieselRoleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for DieselRoleRepository {
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, RoleRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RoleRepositoryError::connection))?;
        let row: Option<RoleRow> = roles::table
            .find(id.as_uuid())
            .select(RoleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_diesel_error(err, RoleRepositoryError::query, RoleRepositoryError::connection)
            })?;
        Ok(row.map(|row| Role {
            id: RoleId::from_uuid(row.id),
            name: row.name,
            can_manage_financial_data: row.can_manage_financial_data,
        }))
    }
}
