//! Shared API types
//!
//! Error responses and the paging envelope used by the report endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::reports::{Page, ReportError};

/// Default page number
pub const DEFAULT_PAGE: u32 = 1;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_data(e: crate::data::DataError) -> Self {
        tracing::error!(error = %e, transient = e.is_transient(), "Data error");
        Self::internal("Database operation failed")
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::InvalidShift(shift) => Self::bad_request(
                "INVALID_SHIFT",
                format!(
                    "Invalid shift '{}': must be one of morning, evening, night",
                    shift
                ),
            ),
            ReportError::InvalidDate(date) => Self::bad_request(
                "INVALID_DATE",
                format!("Invalid date '{}': use YYYY-MM-DD", date),
            ),
            ReportError::InvalidUserId(user_id) => Self::bad_request(
                "INVALID_USER_ID",
                format!("Invalid user id '{}'", user_id),
            ),
            ReportError::Storage(e) => Self::from_data(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

pub fn default_page() -> u32 {
    DEFAULT_PAGE
}

/// Paged report envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub current_page: u32,
    pub total_pages: u64,
}

impl<T> From<Page<T>> for ReportResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.rows,
            total: page.total_count,
            current_page: page.page,
            total_pages: page.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_shift_maps_to_400() {
        let response = ApiError::from(ReportError::InvalidShift("noon".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["code"], "INVALID_SHIFT");
    }

    #[tokio::test]
    async fn test_invalid_date_maps_to_400() {
        let response =
            ApiError::from(ReportError::InvalidDate("2024-02-30".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_DATE");
    }

    #[tokio::test]
    async fn test_invalid_user_id_maps_to_400() {
        let response = ApiError::from(ReportError::InvalidUserId(" ".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_USER_ID");
    }

    #[tokio::test]
    async fn test_storage_error_hides_details() {
        let err = ReportError::Storage(DataError::Sqlite(sqlx::Error::PoolTimedOut));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], "INTERNAL");
        assert_eq!(body["message"], "Database operation failed");
    }

    #[test]
    fn test_report_response_from_page() {
        let page = Page {
            rows: vec!["a", "b"],
            total_count: 7,
            page: 2,
            page_size: 2,
            total_pages: 4,
        };
        let json = serde_json::to_value(ReportResponse::from(page)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": ["a", "b"],
                "total": 7,
                "currentPage": 2,
                "totalPages": 4
            })
        );
    }
}
