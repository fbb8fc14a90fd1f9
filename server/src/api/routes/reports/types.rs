//! Report API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::default_page;
use crate::domain::reports::{DateCount, ReportQuery};

/// Query params for the per-user hourly reports
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HourlyReportQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be >= 1"))]
    pub page: u32,

    /// Rows per page, the configured default when absent
    #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
    pub limit: Option<u32>,

    /// Case-insensitive substring match on username; empty means no filter
    #[validate(length(max = 100, message = "Username filter must be at most 100 characters"))]
    pub username: Option<String>,
}

impl HourlyReportQuery {
    pub fn into_report_query(self, default_limit: u32) -> ReportQuery {
        ReportQuery {
            page: self.page,
            limit: self.limit.unwrap_or(default_limit),
            username: self.username,
        }
    }
}

/// Query params for the date list
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DateListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be >= 1"))]
    pub page: u32,

    #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
    pub limit: Option<u32>,
}

/// Upload count for one calendar date
#[derive(Debug, Serialize, ToSchema)]
pub struct DateCountDto {
    /// Calendar date in the report zone, `YYYY-MM-DD`
    pub date: String,
    pub count: u64,
}

impl From<DateCount> for DateCountDto {
    fn from(d: DateCount) -> Self {
        Self {
            date: d.date.format("%Y-%m-%d").to_string(),
            count: d.count,
        }
    }
}
