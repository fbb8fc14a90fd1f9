//! Screenshot statistics endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::types::ApiError;
use crate::data::types::ShiftCounts;
use crate::domain::reports::ReportService;

/// Upload totals, split by the shift tag stored on each upload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotStatsResponse {
    pub total_screenshots: u64,
    pub morning_screenshots: u64,
    pub evening_screenshots: u64,
    pub night_screenshots: u64,
}

impl From<ShiftCounts> for ScreenshotStatsResponse {
    fn from(c: ShiftCounts) -> Self {
        Self {
            total_screenshots: c.total,
            morning_screenshots: c.morning,
            evening_screenshots: c.evening,
            night_screenshots: c.night,
        }
    }
}

pub fn routes(reports: Arc<ReportService>) -> Router<()> {
    Router::new()
        .route("/screenshots", get(screenshot_stats))
        .with_state(reports)
}

/// Screenshot counts by stored shift
#[utoipa::path(
    get,
    path = "/api/v1/stats/screenshots",
    tag = "stats",
    responses(
        (status = 200, description = "Upload counts", body = ScreenshotStatsResponse)
    )
)]
pub async fn screenshot_stats(
    State(reports): State<Arc<ReportService>>,
) -> Result<Json<ScreenshotStatsResponse>, ApiError> {
    let counts = reports.screenshot_stats().await?;
    Ok(Json(counts.into()))
}
