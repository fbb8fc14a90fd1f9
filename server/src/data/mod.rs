//! Data storage layer
//!
//! - `sqlite` - Upload store (WAL mode, versioned schema)
//! - `types` - Row and query types
//! - `traits` - `UploadRepository`, the seam the report engine reads through
//! - `error` - Unified error type

pub mod error;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;
pub use traits::UploadRepository;
