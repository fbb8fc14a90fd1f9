//! Report error types

use thiserror::Error;

use crate::data::DataError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid shift: {0}")]
    InvalidShift(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error(transparent)]
    Storage(#[from] DataError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ReportError::InvalidShift("noon".into()).to_string(),
            "Invalid shift: noon"
        );
        assert_eq!(
            ReportError::InvalidDate("2024-13-01".into()).to_string(),
            "Invalid date: 2024-13-01"
        );
        assert_eq!(
            ReportError::InvalidUserId(" ".into()).to_string(),
            "Invalid user id:  "
        );
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err = ReportError::from(DataError::Config("boom".into()));
        assert_eq!(err.to_string(), DataError::Config("boom".into()).to_string());
    }
}
