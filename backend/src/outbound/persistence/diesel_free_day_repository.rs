//! PostgreSQL-backed `FreeDayRepository`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::calendar::DateRange;
use crate::domain::ports::{FreeDayRepository, FreeDayRepositoryError};
use crate::domain::{FreeDay, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewFreeDayRow;
use super::pool::{DbPool, PoolError};
use super::schema::free_days;

#[derive(Clone)]
pub struct DieselFreeDayRepository {
    pool: DbPool,
}

impl DieselFreeDayRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> FreeDayRepositoryError {
    map_pool_error(error, FreeDayRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> FreeDayRepositoryError {
    map_diesel_error(
        error,
        FreeDayRepositoryError::query,
        FreeDayRepositoryError::connection,
    )
}

#[async_trait]
impl FreeDayRepository for DieselFreeDayRepository {
    async fn dates_for_user(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<BTreeSet<NaiveDate>, FreeDayRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let dates: Vec<NaiveDate> = free_days::table
            .filter(free_days::user_id.eq(user_id.as_uuid()))
            .filter(free_days::date.between(range.start, range.end))
            .select(free_days::date)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(dates.into_iter().collect())
    }

    async fn add(&self, free_day: &FreeDay) -> Result<(), FreeDayRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(free_days::table)
            .values(&NewFreeDayRow {
                user_id: *free_day.user_id.as_uuid(),
                date: free_day.date,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }
}
