//! UploadRepository trait implementation for SQLite

use std::ops::Range;
use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::UploadRepository;
use crate::data::types::{
    NewUpload, ShiftCounts, UploadQuery, UploadRow, UploadStamp, UtcHourTallies,
};

use super::SqliteService;
use super::repositories::upload;

#[async_trait]
impl UploadRepository for Arc<SqliteService> {
    async fn list_uploads(&self, query: UploadQuery) -> Result<Vec<UploadRow>, DataError> {
        upload::list_uploads(self.pool(), &query)
            .await
            .map_err(Into::into)
    }

    async fn list_stamps(&self, query: UploadQuery) -> Result<Vec<UploadStamp>, DataError> {
        upload::list_stamps(self.pool(), &query)
            .await
            .map_err(Into::into)
    }

    async fn utc_hour_tallies(&self, hours: Range<u32>) -> Result<UtcHourTallies, DataError> {
        upload::utc_hour_tallies(self.pool(), hours.start, hours.end)
            .await
            .map_err(Into::into)
    }

    async fn insert_upload(&self, new_upload: NewUpload) -> Result<UploadRow, DataError> {
        upload::insert_upload(self.pool(), new_upload)
            .await
            .map_err(Into::into)
    }

    async fn count_by_shift(&self) -> Result<ShiftCounts, DataError> {
        upload::count_by_shift(self.pool())
            .await
            .map_err(Into::into)
    }
}
