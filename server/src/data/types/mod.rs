//! Shared data types for the storage layer

mod uploads;

pub use uploads::{
    HourTally, NewUpload, ShiftCounts, UploadQuery, UploadRow, UploadStamp, UtcHourTallies,
};
