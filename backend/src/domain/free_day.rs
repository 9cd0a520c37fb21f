//! Per-user days off.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// A calendar date on which a user is not expected to log work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeDay {
    pub user_id: UserId,
    pub date: NaiveDate,
}
