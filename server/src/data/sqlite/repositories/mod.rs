//! SQLite repositories
//!
//! Row types are imported from `crate::data::types`.

pub mod upload;
