//! Hourly report endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use types::{DateCountDto, DateListQuery, HourlyReportQuery};

use crate::api::extractors::ValidatedQuery;
use crate::api::types::{ApiError, ReportResponse};
use crate::domain::reports::{AggregatedRow, ReportService};

/// Shared state for report endpoints
#[derive(Clone)]
pub struct ReportsApiState {
    pub reports: Arc<ReportService>,
    pub default_limit: u32,
}

/// Build report routes
pub fn routes(reports: Arc<ReportService>, default_limit: u32) -> Router<()> {
    let state = ReportsApiState {
        reports,
        default_limit,
    };

    Router::new()
        .route("/hourly/{shift}", get(shift_rollup))
        .route("/shift/{shift}/dates", get(list_dates))
        .route("/shift/{shift}/date/{date}", get(shift_date_detail))
        .with_state(state)
}

/// Per-user hourly counts for a shift across all dates (UTC hours)
#[utoipa::path(
    get,
    path = "/api/v1/reports/hourly/{shift}",
    tag = "reports",
    params(
        ("shift" = String, Path, description = "morning, evening or night"),
        ("page" = Option<u32>, Query, description = "Page number (>= 1)"),
        ("limit" = Option<u32>, Query, description = "Rows per page (1-500)"),
        ("username" = Option<String>, Query, description = "Case-insensitive username substring")
    ),
    responses(
        (status = 200, description = "Rows sorted by latest hour, newest first"),
        (status = 400, description = "Invalid shift or query")
    )
)]
pub async fn shift_rollup(
    State(state): State<ReportsApiState>,
    Path(shift): Path<String>,
    ValidatedQuery(query): ValidatedQuery<HourlyReportQuery>,
) -> Result<Json<ReportResponse<AggregatedRow>>, ApiError> {
    let query = query.into_report_query(state.default_limit);
    let page = state.reports.shift_rollup(&shift, &query).await?;
    Ok(Json(page.into()))
}

/// Calendar dates with uploads in a shift, newest first
#[utoipa::path(
    get,
    path = "/api/v1/reports/shift/{shift}/dates",
    tag = "reports",
    params(
        ("shift" = String, Path, description = "morning, evening or night"),
        ("page" = Option<u32>, Query, description = "Page number (>= 1)"),
        ("limit" = Option<u32>, Query, description = "Rows per page (1-500)")
    ),
    responses(
        (status = 200, description = "Upload count per date in the report time zone"),
        (status = 400, description = "Invalid shift or query")
    )
)]
pub async fn list_dates(
    State(state): State<ReportsApiState>,
    Path(shift): Path<String>,
    ValidatedQuery(query): ValidatedQuery<DateListQuery>,
) -> Result<Json<ReportResponse<DateCountDto>>, ApiError> {
    let limit = query.limit.unwrap_or(state.default_limit);
    let page = state.reports.list_dates(&shift, query.page, limit).await?;
    Ok(Json(page.map(DateCountDto::from).into()))
}

/// Per-user hourly counts for a shift on one date, with row totals
#[utoipa::path(
    get,
    path = "/api/v1/reports/shift/{shift}/date/{date}",
    tag = "reports",
    params(
        ("shift" = String, Path, description = "morning, evening or night"),
        ("date" = String, Path, description = "Calendar date, YYYY-MM-DD"),
        ("page" = Option<u32>, Query, description = "Page number (>= 1)"),
        ("limit" = Option<u32>, Query, description = "Rows per page (1-500)"),
        ("username" = Option<String>, Query, description = "Case-insensitive username substring")
    ),
    responses(
        (status = 200, description = "Rows sorted by latest hour, newest first"),
        (status = 400, description = "Invalid shift, date or query")
    )
)]
pub async fn shift_date_detail(
    State(state): State<ReportsApiState>,
    Path((shift, date)): Path<(String, String)>,
    ValidatedQuery(query): ValidatedQuery<HourlyReportQuery>,
) -> Result<Json<ReportResponse<AggregatedRow>>, ApiError> {
    let query = query.into_report_query(state.default_limit);
    let page = state
        .reports
        .shift_date_detail(&shift, &date, &query)
        .await?;
    Ok(Json(page.into()))
}
