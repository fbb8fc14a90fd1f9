//! Upload API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::UploadRow;

/// Request body for recording an upload
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    #[serde(alias = "imageurl")]
    #[validate(length(min = 1, max = 2048, message = "Image URL must be 1-2048 characters"))]
    pub image_url: String,

    /// morning, evening or night; stored as given, reports bucket by hour
    pub shift: Option<String>,

    #[validate(length(min = 1, max = 100, message = "User ID must be 1-100 characters"))]
    pub user_id: Option<String>,
}

/// Stored upload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDto {
    pub id: String,
    pub user_id: Option<String>,
    pub username: String,
    pub image_url: String,
    pub shift: Option<String>,
    pub created_at: String,
}

impl From<UploadRow> for UploadDto {
    fn from(row: UploadRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            image_url: row.image_url,
            shift: row.shift,
            created_at: row.created_at,
        }
    }
}
