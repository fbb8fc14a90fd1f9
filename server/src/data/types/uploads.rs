//! Upload record types
//!
//! Uploads are written by the ingest endpoint and only ever read by the
//! report engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::parse_created_at;

/// Upload row from database
///
/// `created_at` is kept as the raw stored text; the report engine parses it
/// and skips rows it cannot read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadRow {
    pub id: String,
    pub user_id: Option<String>,
    pub username: String,
    pub image_url: String,
    pub shift: Option<String>,
    pub created_at: String,
}

/// Values for a new upload row
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub user_id: Option<String>,
    pub username: String,
    pub image_url: String,
    pub shift: Option<String>,
}

/// The two columns bucketing needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStamp {
    pub username: String,
    pub created_at: String,
}

impl From<UploadRow> for UploadStamp {
    fn from(row: UploadRow) -> Self {
        Self {
            username: row.username,
            created_at: row.created_at,
        }
    }
}

/// Uploads grouped by user, UTC date and UTC hour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourTally {
    pub username: String,
    pub date: NaiveDate,
    pub hour: u32,
    pub count: u64,
}

/// Result of a grouped UTC hour read
///
/// `tallies` holds rows the store grouped itself. `residue` holds rows whose
/// stored layout the store does not group; the caller parses and buckets them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtcHourTallies {
    pub tallies: Vec<HourTally>,
    pub residue: Vec<UploadStamp>,
}

/// Filter for reading uploads
///
/// Time bounds are inclusive-exclusive, `[from, to)`. Rows whose `created_at`
/// does not parse fall outside any bounded range.
#[derive(Debug, Clone, Default)]
pub struct UploadQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
}

impl UploadQuery {
    /// No bounds, every stored upload
    pub fn all() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            user_id: None,
        }
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Whether a stored `created_at` falls inside the time bounds
    pub fn admits(&self, created_at: &str) -> bool {
        if !self.is_bounded() {
            return true;
        }
        parse_created_at(created_at).is_some_and(|at| {
            self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at < to)
        })
    }
}

/// Upload counts by stored shift tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftCounts {
    pub total: u64,
    pub morning: u64,
    pub evening: u64,
    pub night: u64,
}
