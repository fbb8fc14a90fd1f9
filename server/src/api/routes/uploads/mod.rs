//! Upload ingest and per-user folder endpoints
//!
//! A folder is one calendar date, in the report zone, on which a user uploaded.

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use types::{CreateUploadRequest, UploadDto};

use crate::api::extractors::ValidatedJson;
use crate::api::routes::reports::types::DateCountDto;
use crate::api::types::ApiError;
use crate::data::UploadRepository;
use crate::data::types::NewUpload;
use crate::domain::reports::{ReportService, Shift};

/// Shared state for upload endpoints
#[derive(Clone)]
pub struct UploadsApiState {
    pub repository: Arc<dyn UploadRepository>,
    pub reports: Arc<ReportService>,
}

pub fn routes(
    repository: Arc<dyn UploadRepository>,
    reports: Arc<ReportService>,
) -> Router<()> {
    Router::new()
        .route("/", post(create_upload))
        .route("/user/{user_id}/folders", get(list_folders))
        .route("/user/{user_id}/folder/{date}", get(folder_uploads))
        .with_state(UploadsApiState {
            repository,
            reports,
        })
}

/// Record an upload
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    tag = "uploads",
    request_body = CreateUploadRequest,
    responses(
        (status = 201, description = "Upload stored", body = UploadDto),
        (status = 400, description = "Invalid body or shift")
    )
)]
pub async fn create_upload(
    State(state): State<UploadsApiState>,
    ValidatedJson(body): ValidatedJson<CreateUploadRequest>,
) -> Result<(StatusCode, Json<UploadDto>), ApiError> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(ApiError::bad_request(
            "VALIDATION_ERROR",
            "Username must not be blank",
        ));
    }

    let shift = body
        .shift
        .as_deref()
        .map(str::parse::<Shift>)
        .transpose()?;

    let row = state
        .repository
        .insert_upload(NewUpload {
            user_id: body.user_id,
            username: username.to_string(),
            image_url: body.image_url,
            shift: shift.map(|s| s.as_str().to_string()),
        })
        .await
        .map_err(ApiError::from_data)?;

    tracing::debug!(id = %row.id, username = %row.username, "Upload stored");
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Dates on which a user uploaded, newest first
#[utoipa::path(
    get,
    path = "/api/v1/uploads/user/{user_id}/folders",
    tag = "uploads",
    params(("user_id" = String, Path, description = "Uploader id")),
    responses(
        (status = 200, description = "Folders in the report time zone", body = Vec<DateCountDto>),
        (status = 400, description = "Invalid user id")
    )
)]
pub async fn list_folders(
    State(state): State<UploadsApiState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<DateCountDto>>, ApiError> {
    let folders = state.reports.user_folders(&user_id).await?;
    Ok(Json(folders.into_iter().map(DateCountDto::from).collect()))
}

/// A user's uploads on one date, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/uploads/user/{user_id}/folder/{date}",
    tag = "uploads",
    params(
        ("user_id" = String, Path, description = "Uploader id"),
        ("date" = String, Path, description = "Calendar date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Uploads on that date in the report time zone", body = Vec<UploadDto>),
        (status = 400, description = "Invalid user id or date")
    )
)]
pub async fn folder_uploads(
    State(state): State<UploadsApiState>,
    Path((user_id, date)): Path<(String, String)>,
) -> Result<Json<Vec<UploadDto>>, ApiError> {
    let rows = state.reports.user_folder(&user_id, &date).await?;
    Ok(Json(rows.into_iter().map(UploadDto::from).collect()))
}
