//! Shift-based hourly reports
//!
//! Every report runs the same pipeline over stored uploads:
//! bucket timestamps, keep the shift's hours, group, project onto labels, page.
//!
//! - rollup: all dates together, UTC hours, compact labels
//! - date list: upload counts per calendar date in the report zone
//! - date detail: one calendar date in the report zone, interval labels and totals
//!
//! The folder views group one user's uploads by calendar date in the report
//! zone, without any shift window.

pub mod aggregate;
pub mod bucket;
pub mod error;
pub mod paginate;
pub mod pivot;
pub mod shift;


pub use aggregate::{AggregateCriteria, DateCount, UserHourCounts, UsernameFilter};
pub use error::ReportError;
pub use paginate::Page;
pub use pivot::AggregatedRow;
pub use shift::{LabelStyle, Shift};

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::data::traits::UploadRepository;
use crate::data::types::{ShiftCounts, UploadQuery, UploadRow};
use crate::utils::time::{parse_created_at, parse_report_date};

use aggregate::{aggregate_dates, aggregate_users};
use bucket::{BucketedUpload, bucket_instant, bucket_stamps};
use paginate::paginate;
use pivot::project_row;

/// Longest accepted user id
pub const MAX_USER_ID_LEN: usize = 100;

/// Paging and filter input shared by the per-user reports
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    pub page: u32,
    pub limit: u32,
    pub username: Option<String>,
}

impl ReportQuery {
    fn username_filter(&self) -> Option<UsernameFilter> {
        self.username.as_deref().and_then(UsernameFilter::new)
    }
}

/// Report entry point, shared across requests
pub struct ReportService {
    repository: Arc<dyn UploadRepository>,
    timezone: Tz,
}

impl ReportService {
    pub fn new(repository: Arc<dyn UploadRepository>, timezone: Tz) -> Self {
        Self {
            repository,
            timezone,
        }
    }

    /// Zone used for the date list and date detail reports
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Per-user hourly counts for a shift across every date, in UTC
    pub async fn shift_rollup(
        &self,
        shift: &str,
        query: &ReportQuery,
    ) -> Result<Page<AggregatedRow>, ReportError> {
        let shift: Shift = shift.parse()?;

        let grouped = self
            .repository
            .utc_hour_tallies(shift.window().hours())
            .await?;
        let residue = grouped.residue.len();
        let mut bucketed: Vec<BucketedUpload> = grouped
            .tallies
            .into_iter()
            .map(BucketedUpload::from)
            .collect();
        bucketed.extend(bucket_stamps(&grouped.residue, None));

        let criteria = AggregateCriteria {
            shift,
            date: None,
            username: query.username_filter(),
        };
        let users = aggregate_users(&bucketed, &criteria);
        let page = paginate(users, query.page, query.limit)
            .map(|row| project_row(row, shift, LabelStyle::Legacy, false));

        tracing::debug!(
            %shift,
            page = page.page,
            limit = page.page_size,
            residue,
            users = page.total_count,
            "Shift rollup"
        );
        Ok(page)
    }

    /// Upload counts per calendar date for a shift, newest date first
    pub async fn list_dates(
        &self,
        shift: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<DateCount>, ReportError> {
        let shift: Shift = shift.parse()?;

        let stamps = self.repository.list_stamps(UploadQuery::all()).await?;
        let bucketed = bucket_stamps(&stamps, Some(self.timezone));
        let dates = paginate(aggregate_dates(&bucketed, Some(shift)), page, limit);

        tracing::debug!(
            %shift,
            page = dates.page,
            limit = dates.page_size,
            dates = dates.total_count,
            "Shift date list"
        );
        Ok(dates)
    }

    /// Per-user hourly counts for one shift on one calendar date, with totals
    pub async fn shift_date_detail(
        &self,
        shift: &str,
        date: &str,
        query: &ReportQuery,
    ) -> Result<Page<AggregatedRow>, ReportError> {
        let shift: Shift = shift.parse()?;
        let date = report_date(date)?;

        let stamps = self.repository.list_stamps(padded_range(date)).await?;
        let bucketed = bucket_stamps(&stamps, Some(self.timezone));

        let criteria = AggregateCriteria {
            shift,
            date: Some(date),
            username: query.username_filter(),
        };
        let users = aggregate_users(&bucketed, &criteria);
        let page = paginate(users, query.page, query.limit)
            .map(|row| project_row(row, shift, LabelStyle::Interval, true));

        tracing::debug!(
            %shift,
            %date,
            page = page.page,
            limit = page.page_size,
            scanned = stamps.len(),
            users = page.total_count,
            "Shift date detail"
        );
        Ok(page)
    }

    /// Upload totals by stored shift tag
    pub async fn screenshot_stats(&self) -> Result<ShiftCounts, ReportError> {
        Ok(self.repository.count_by_shift().await?)
    }

    /// Dates on which a user uploaded, newest first, in the report zone
    pub async fn user_folders(&self, user_id: &str) -> Result<Vec<DateCount>, ReportError> {
        let user_id = checked_user_id(user_id)?;

        let stamps = self
            .repository
            .list_stamps(UploadQuery::all().for_user(user_id))
            .await?;
        let folders = aggregate_dates(&bucket_stamps(&stamps, Some(self.timezone)), None);

        tracing::debug!(%user_id, folders = folders.len(), "User folders");
        Ok(folders)
    }

    /// A user's uploads on one calendar date in the report zone, oldest first
    pub async fn user_folder(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Vec<UploadRow>, ReportError> {
        let user_id = checked_user_id(user_id)?;
        let date = report_date(date)?;

        let rows = self
            .repository
            .list_uploads(padded_range(date).for_user(user_id))
            .await?;
        let mut dated: Vec<(DateTime<Utc>, UploadRow)> = rows
            .into_iter()
            .filter_map(|row| parse_created_at(&row.created_at).map(|at| (at, row)))
            .filter(|(at, _)| bucket_instant(*at, Some(self.timezone)).date == date)
            .collect();
        dated.sort_by_key(|(at, _)| *at);
        let rows: Vec<UploadRow> = dated.into_iter().map(|(_, row)| row).collect();

        tracing::debug!(%user_id, %date, uploads = rows.len(), "User folder");
        Ok(rows)
    }
}

fn report_date(date: &str) -> Result<NaiveDate, ReportError> {
    parse_report_date(date).ok_or_else(|| ReportError::InvalidDate(date.to_string()))
}

fn checked_user_id(user_id: &str) -> Result<&str, ReportError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_USER_ID_LEN {
        return Err(ReportError::InvalidUserId(user_id.to_string()));
    }
    Ok(trimmed)
}

/// UTC range wide enough to hold `date` in any zone
///
/// Offsets stay within +/-14h, so `[date - 1, date + 2)` at UTC midnight
/// always covers the local day. The exact date match happens after bucketing.
fn padded_range(date: NaiveDate) -> UploadQuery {
    let at_midnight = |d: NaiveDate| d.and_time(NaiveTime::MIN).and_utc();
    UploadQuery {
        from: date.checked_sub_days(Days::new(1)).map(at_midnight),
        to: date.checked_add_days(Days::new(2)).map(at_midnight),
        user_id: None,
    }
}
