//! PostgreSQL-backed `ProjectRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{ClientId, Project, ProjectId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::ProjectRow;
use super::pool::{DbPool, PoolError};
use super::schema::projects;

#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ProjectRepositoryError {
    map_pool_error(error, ProjectRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ProjectRepositoryError {
    map_diesel_error(
        error,
        ProjectRepositoryError::query,
        ProjectRepositoryError::connection,
    )
}

fn to_project(row: ProjectRow) -> Project {
    Project {
        id: ProjectId::from_uuid(row.id),
        client_id: ClientId::from_uuid(row.client_id),
        name: row.name,
    }
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ProjectRow> = projects::table
            .find(id.as_uuid())
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(to_project))
    }

    async fn list_all(&self) -> Result<Vec<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ProjectRow> = projects::table
            .order((projects::name.asc(), projects::id.asc()))
            .select(ProjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(to_project).collect())
    }
}
