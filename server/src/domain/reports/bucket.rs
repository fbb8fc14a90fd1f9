//! Timestamp bucketing
//!
//! Maps an instant to its hour-of-day and calendar date, either in UTC or in a
//! named zone. Named zones go through full tz conversion so DST transitions
//! land in the right bucket.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use crate::data::types::{HourTally, UploadStamp};
use crate::utils::time::parse_created_at;

/// Hour-of-day and date of one instant as seen from a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourBucket {
    pub hour: u32,
    pub date: NaiveDate,
}

/// Bucket an instant; `None` means UTC
pub fn bucket_instant(instant: DateTime<Utc>, zone: Option<Tz>) -> HourBucket {
    match zone {
        Some(tz) => {
            let local = instant.with_timezone(&tz);
            HourBucket {
                hour: local.hour(),
                date: local.date_naive(),
            }
        }
        None => HourBucket {
            hour: instant.hour(),
            date: instant.date_naive(),
        },
    }
}

/// Uploads of one user that share a bucket
///
/// `count` is 1 for a bucketed stamp and the group size for a stored tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketedUpload {
    pub username: String,
    pub bucket: HourBucket,
    pub count: u64,
}

impl From<HourTally> for BucketedUpload {
    fn from(tally: HourTally) -> Self {
        Self {
            username: tally.username,
            bucket: HourBucket {
                hour: tally.hour,
                date: tally.date,
            },
            count: tally.count,
        }
    }
}

/// Bucket one stamp, `None` when its `created_at` is unreadable
pub fn bucket_stamp(stamp: &UploadStamp, zone: Option<Tz>) -> Option<BucketedUpload> {
    let Some(instant) = parse_created_at(&stamp.created_at) else {
        tracing::warn!(
            username = %stamp.username,
            created_at = %stamp.created_at,
            "Skipping upload with unreadable timestamp"
        );
        return None;
    };
    Some(BucketedUpload {
        username: stamp.username.clone(),
        bucket: bucket_instant(instant, zone),
        count: 1,
    })
}

/// Bucket every stamp with a readable `created_at`
///
/// Unreadable stamps are dropped, never returned as an error.
pub fn bucket_stamps(stamps: &[UploadStamp], zone: Option<Tz>) -> Vec<BucketedUpload> {
    let bucketed: Vec<BucketedUpload> = stamps
        .iter()
        .filter_map(|stamp| bucket_stamp(stamp, zone))
        .collect();

    let skipped = stamps.len() - bucketed.len();
    if skipped > 0 {
        tracing::debug!(skipped, kept = bucketed.len(), "Bucketed uploads");
    }
    bucketed
}
