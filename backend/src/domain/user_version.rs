//! Point-in-time snapshots of a user.
//!
//! Versions are append-only. Each stored row carries a monotonically
//! increasing `sequence` assigned by the store, which breaks ties between
//! versions written with the same `modified_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{User, UserId, UserSnapshot};

/// Version about to be appended to a user's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserVersion {
    pub user_id: UserId,
    pub modified_at: DateTime<Utc>,
    pub snapshot: UserSnapshot,
}

impl NewUserVersion {
    /// Copy the versioned fields of `user`, stamped at `modified_at`.
    pub fn of(user: &User, modified_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id.clone(),
            modified_at,
            snapshot: user.snapshot.clone(),
        }
    }
}

/// Stored user version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVersion {
    pub user_id: UserId,
    pub sequence: i64,
    pub modified_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: UserSnapshot,
}

impl UserVersion {
    fn ordering_key(&self) -> (DateTime<Utc>, i64) {
        (self.modified_at, self.sequence)
    }
}

/// Resolve the version that was current at `at`.
///
/// Picks the greatest `(modified_at, sequence)` with `modified_at <= at`.
/// When `at` precedes every version the earliest one is returned. `None`
/// only for an empty history.
///
/// # Examples
/// ```
/// use timesheet::domain::select_version_at;
/// use chrono::Utc;
///
/// assert!(select_version_at(&[], Utc::now()).is_none());
/// ```
pub fn select_version_at(versions: &[UserVersion], at: DateTime<Utc>) -> Option<&UserVersion> {
    versions
        .iter()
        .filter(|version| version.modified_at <= at)
        .max_by_key(|version| version.ordering_key())
        .or_else(|| versions.iter().min_by_key(|version| version.ordering_key()))
}
