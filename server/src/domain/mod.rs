//! Domain logic
//!
//! - `reports` - Shift-based hourly upload reports

pub mod reports;
