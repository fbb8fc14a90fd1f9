//! Per-user and per-date aggregation
//!
//! Both aggregations take already-bucketed uploads and keep only those whose
//! hour falls inside the requested shift window. The stored shift tag on an
//! upload plays no part here: the hour decides.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::bucket::BucketedUpload;
use super::shift::{HOURS_PER_SHIFT, Shift};

/// Case-insensitive substring match on usernames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameFilter {
    needle: String,
}

impl UsernameFilter {
    /// Build a filter, `None` for an empty or whitespace-only needle
    pub fn new(needle: &str) -> Option<Self> {
        let needle = needle.trim();
        if needle.is_empty() {
            return None;
        }
        Some(Self {
            needle: needle.to_lowercase(),
        })
    }

    pub fn matches(&self, username: &str) -> bool {
        username.to_lowercase().contains(&self.needle)
    }
}

/// What to keep before grouping
#[derive(Debug, Clone)]
pub struct AggregateCriteria {
    pub shift: Shift,
    /// Restrict to one calendar date; `None` rolls all dates together
    pub date: Option<NaiveDate>,
    pub username: Option<UsernameFilter>,
}

impl AggregateCriteria {
    fn accepts(&self, upload: &BucketedUpload) -> bool {
        self.shift.window().contains(upload.bucket.hour)
            && self.date.is_none_or(|d| d == upload.bucket.date)
            && self
                .username
                .as_ref()
                .is_none_or(|f| f.matches(&upload.username))
    }
}

/// Per-hour counts for one user inside one shift
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserHourCounts {
    pub username: String,
    /// Indexed by offset from the shift's lower hour
    pub counts: [u64; HOURS_PER_SHIFT],
    /// Largest hour-of-day seen for this user
    pub latest_hour: u32,
}

impl UserHourCounts {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Group matching uploads by username
///
/// Ordered by `latest_hour` descending, ties broken by username ascending.
pub fn aggregate_users(
    uploads: &[BucketedUpload],
    criteria: &AggregateCriteria,
) -> Vec<UserHourCounts> {
    let window = criteria.shift.window();
    let mut by_user: HashMap<&str, UserHourCounts> = HashMap::new();

    for upload in uploads.iter().filter(|u| criteria.accepts(u)) {
        let Some(offset) = window.offset(upload.bucket.hour) else {
            continue;
        };
        let entry = by_user
            .entry(upload.username.as_str())
            .or_insert_with(|| UserHourCounts {
                username: upload.username.clone(),
                counts: [0; HOURS_PER_SHIFT],
                latest_hour: upload.bucket.hour,
            });
        entry.counts[offset] += upload.count;
        entry.latest_hour = entry.latest_hour.max(upload.bucket.hour);
    }

    let mut rows: Vec<UserHourCounts> = by_user.into_values().collect();
    rows.sort_by(|a, b| {
        b.latest_hour
            .cmp(&a.latest_hour)
            .then_with(|| a.username.cmp(&b.username))
    });
    rows
}

/// Upload count for one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Count uploads per calendar date, newest first
///
/// With a shift only hours inside its window count; without one every upload
/// does.
pub fn aggregate_dates(uploads: &[BucketedUpload], shift: Option<Shift>) -> Vec<DateCount> {
    let window = shift.map(|s| s.window());
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();

    for upload in uploads
        .iter()
        .filter(|u| window.is_none_or(|w| w.contains(u.bucket.hour)))
    {
        *by_date.entry(upload.bucket.date).or_default() += upload.count;
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, count)| DateCount { date, count })
        .collect()
}
