//! OpenAPI document

use axum::http::header;
use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, reports, stats, uploads};
use crate::domain::reports::{AggregatedRow, Shift};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShiftLens API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Shift-based hourly upload reports"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "reports", description = "Hourly shift reports"),
        (name = "stats", description = "Upload statistics"),
        (name = "uploads", description = "Upload ingest and per-user folders")
    ),
    paths(
        health::health,
        reports::shift_rollup,
        reports::list_dates,
        reports::shift_date_detail,
        stats::screenshot_stats,
        uploads::create_upload,
        uploads::list_folders,
        uploads::folder_uploads,
    ),
    components(schemas(
        health::HealthResponse,
        Shift,
        AggregatedRow,
        reports::types::HourlyReportQuery,
        reports::types::DateListQuery,
        reports::types::DateCountDto,
        stats::ScreenshotStatsResponse,
        uploads::types::CreateUploadRequest,
        uploads::types::UploadDto,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_report_paths() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();

        for path in [
            "/api/v1/health",
            "/api/v1/reports/hourly/{shift}",
            "/api/v1/reports/shift/{shift}/dates",
            "/api/v1/reports/shift/{shift}/date/{date}",
            "/api/v1/stats/screenshots",
            "/api/v1/uploads",
            "/api/v1/uploads/user/{user_id}/folders",
            "/api/v1/uploads/user/{user_id}/folder/{date}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }
}
