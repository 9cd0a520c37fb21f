//! Port for per-user free days.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::calendar::DateRange;
use crate::domain::{FreeDay, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by free day repository adapters.
    pub enum FreeDayRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "free day repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "free day repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FreeDayRepository: Send + Sync {
    /// Free days of a user inside `range`.
    async fn dates_for_user(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<BTreeSet<NaiveDate>, FreeDayRepositoryError>;

    /// Declare a free day. Declaring the same day twice is a no-op.
    async fn add(&self, free_day: &FreeDay) -> Result<(), FreeDayRepositoryError>;
}
