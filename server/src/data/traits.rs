//! Repository traits for the storage backend
//!
//! The report engine only sees [`UploadRepository`]; the SQLite service
//! implements it, and tests can substitute an in-memory store.

use std::ops::Range;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{
    NewUpload, ShiftCounts, UploadQuery, UploadRow, UploadStamp, UtcHourTallies,
};

/// Read and write access to upload records
#[async_trait]
pub trait UploadRepository: Send + Sync {
    /// Uploads matching `query`, oldest first
    async fn list_uploads(&self, query: UploadQuery) -> Result<Vec<UploadRow>, DataError>;

    /// Same selection as `list_uploads`, reduced to username and timestamp
    async fn list_stamps(&self, query: UploadQuery) -> Result<Vec<UploadStamp>, DataError>;

    /// Uploads grouped by user, UTC date and UTC hour, for `hours` only
    ///
    /// Rows the store cannot group come back ungrouped in `residue`.
    async fn utc_hour_tallies(&self, hours: Range<u32>) -> Result<UtcHourTallies, DataError>;

    /// Store a new upload stamped with the current time
    async fn insert_upload(&self, upload: NewUpload) -> Result<UploadRow, DataError>;

    /// Count uploads by their stored shift tag
    async fn count_by_shift(&self) -> Result<ShiftCounts, DataError>;
}
