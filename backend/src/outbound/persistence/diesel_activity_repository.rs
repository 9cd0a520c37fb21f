//! PostgreSQL-backed `ActivityRepository`.
//!
//! Activities are always read joined with their project.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::calendar::DateRange;
use crate::domain::ports::{ActivityRepository, ActivityRepositoryError};
use crate::domain::{Activity, ActivityId, ClientId, Project, ProjectId, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ActivityRow, ActivityUpdate, NewActivityRow, ProjectRow};
use super::pool::{DbPool, PoolError};
use super::schema::{activities, projects};

#[derive(Clone)]
pub struct DieselActivityRepository {
    pool: DbPool,
}

impl DieselActivityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ActivityRepositoryError {
    map_pool_error(error, ActivityRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ActivityRepositoryError {
    map_diesel_error(
        error,
        ActivityRepositoryError::query,
        ActivityRepositoryError::connection,
    )
}

fn to_project(row: ProjectRow) -> Project {
    Project {
        id: ProjectId::from_uuid(row.id),
        client_id: ClientId::from_uuid(row.client_id),
        name: row.name,
    }
}

fn stored_minutes(activity: &Activity) -> Result<i32, ActivityRepositoryError> {
    i32::try_from(activity.minutes).map_err(|_| {
        ActivityRepositoryError::query(format!("activity {} has too many minutes", activity.id))
    })
}

fn to_activity(
    (activity, project): (ActivityRow, ProjectRow),
) -> Result<Activity, ActivityRepositoryError> {
    let minutes = u32::try_from(activity.minutes).map_err(|_| {
        ActivityRepositoryError::query(format!("activity {} has negative minutes", activity.id))
    })?;
    Ok(Activity {
        id: ActivityId::from_uuid(activity.id),
        user_id: UserId::from_uuid(activity.user_id),
        project: to_project(project),
        date: activity.date,
        minutes,
        comments: activity.comments,
    })
}

#[async_trait]
impl ActivityRepository for DieselActivityRepository {
    async fn list_for_user(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(ActivityRow, ProjectRow)> = activities::table
            .inner_join(projects::table)
            .filter(activities::user_id.eq(user_id.as_uuid()))
            .filter(activities::date.between(range.start, range.end))
            .order((activities::date.asc(), activities::created_at.asc()))
            .select((ActivityRow::as_select(), ProjectRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_activity).collect()
    }

    async fn activity_dates(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<BTreeSet<NaiveDate>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let dates: Vec<NaiveDate> = activities::table
            .filter(activities::user_id.eq(user_id.as_uuid()))
            .filter(activities::date.between(range.start, range.end))
            .select(activities::date)
            .distinct()
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(dates.into_iter().collect())
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = activities::table
            .filter(activities::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        u64::try_from(count).map_err(|_| ActivityRepositoryError::query("negative activity count"))
    }

    async fn users_with_activities_on(
        &self,
        date: NaiveDate,
    ) -> Result<HashSet<UserId>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<Uuid> = activities::table
            .filter(activities::date.eq(date))
            .select(activities::user_id)
            .distinct()
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn find_by_id(&self, id: &ActivityId) -> Result<Option<Activity>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<(ActivityRow, ProjectRow)> = activities::table
            .inner_join(projects::table)
            .filter(activities::id.eq(id.as_uuid()))
            .select((ActivityRow::as_select(), ProjectRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(to_activity).transpose()
    }

    async fn insert(&self, activity: &Activity) -> Result<(), ActivityRepositoryError> {
        let row = NewActivityRow {
            id: *activity.id.as_uuid(),
            user_id: *activity.user_id.as_uuid(),
            project_id: *activity.project.id.as_uuid(),
            date: activity.date,
            minutes: stored_minutes(activity)?,
            comments: activity.comments.as_str(),
        };
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(activities::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn update(&self, activity: &Activity) -> Result<bool, ActivityRepositoryError> {
        let changes = ActivityUpdate {
            project_id: *activity.project.id.as_uuid(),
            date: activity.date,
            minutes: stored_minutes(activity)?,
            comments: activity.comments.as_str(),
        };
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(activities::table.find(activity.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &ActivityId) -> Result<bool, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(activities::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_for_project(
        &self,
        project_id: &ProjectId,
        range: DateRange,
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(ActivityRow, ProjectRow)> = activities::table
            .inner_join(projects::table)
            .filter(activities::project_id.eq(project_id.as_uuid()))
            .filter(activities::date.between(range.start, range.end))
            .order((activities::date.asc(), activities::created_at.asc()))
            .select((ActivityRow::as_select(), ProjectRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_activity).collect()
    }

    async fn recent_projects(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Project>, ActivityRepositoryError> {
        let limit = i64::try_from(limit)
            .map_err(|_| ActivityRepositoryError::query("recent project limit out of range"))?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(ProjectRow, Option<NaiveDate>)> = activities::table
            .inner_join(projects::table)
            .filter(activities::user_id.eq(user_id.as_uuid()))
            .group_by(projects::id)
            .select((ProjectRow::as_select(), max(activities::date)))
            .order((max(activities::date).desc(), projects::name.asc()))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(|(project, _)| to_project(project)).collect())
    }
}
