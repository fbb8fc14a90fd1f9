//! Shift windows and hour-column labels
//!
//! Each shift covers eight contiguous hours of one calendar day, `[lower, upper)`:
//!
//! | Shift   | Hours  |
//! |---------|--------|
//! | morning | 8..16  |
//! | evening | 16..24 |
//! | night   | 0..8   |
//!
//! Two label styles exist. `Legacy` is the compact column header used by the
//! rollup report, `Interval` spells out the full hour range for the per-date
//! detail report.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::ReportError;

/// Number of one-hour buckets in every shift
pub const HOURS_PER_SHIFT: usize = 8;

/// Work period an upload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Evening,
    Night,
}

/// Half-open hour range `[lower, upper)` of a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub lower: u32,
    pub upper: u32,
}

impl ShiftWindow {
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.lower && hour < self.upper
    }

    pub fn hours(&self) -> Range<u32> {
        self.lower..self.upper
    }

    /// Column index of `hour` inside the window
    pub fn offset(&self, hour: u32) -> Option<usize> {
        self.contains(hour).then(|| (hour - self.lower) as usize)
    }
}

/// Which header text to use for hour columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// `"08:00"`, `"01:00 pm"`, `"12:00 am"`
    Legacy,
    /// `"08:00 AM - 09:00 AM"`
    Interval,
}

/// Display label for one hour bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourLabel {
    pub hour: u32,
    pub label: &'static str,
}

const fn hl(hour: u32, label: &'static str) -> HourLabel {
    HourLabel { hour, label }
}

type LabelTable = [HourLabel; HOURS_PER_SHIFT];

const MORNING_LEGACY: LabelTable = [
    hl(8, "08:00"),
    hl(9, "09:00"),
    hl(10, "10:00"),
    hl(11, "11:00"),
    hl(12, "12:00"),
    hl(13, "01:00 pm"),
    hl(14, "02:00 pm"),
    hl(15, "03:00 pm"),
];

const EVENING_LEGACY: LabelTable = [
    hl(16, "04:00 pm"),
    hl(17, "05:00 pm"),
    hl(18, "06:00 pm"),
    hl(19, "07:00 pm"),
    hl(20, "08:00 pm"),
    hl(21, "09:00 pm"),
    hl(22, "10:00 pm"),
    hl(23, "11:00 pm"),
];

const NIGHT_LEGACY: LabelTable = [
    hl(0, "12:00 am"),
    hl(1, "01:00 am"),
    hl(2, "02:00 am"),
    hl(3, "03:00 am"),
    hl(4, "04:00 am"),
    hl(5, "05:00 am"),
    hl(6, "06:00 am"),
    hl(7, "07:00 am"),
];

const MORNING_INTERVAL: LabelTable = [
    hl(8, "08:00 AM - 09:00 AM"),
    hl(9, "09:00 AM - 10:00 AM"),
    hl(10, "10:00 AM - 11:00 AM"),
    hl(11, "11:00 AM - 12:00 PM"),
    hl(12, "12:00 PM - 01:00 PM"),
    hl(13, "01:00 PM - 02:00 PM"),
    hl(14, "02:00 PM - 03:00 PM"),
    hl(15, "03:00 PM - 04:00 PM"),
];

const EVENING_INTERVAL: LabelTable = [
    hl(16, "04:00 PM - 05:00 PM"),
    hl(17, "05:00 PM - 06:00 PM"),
    hl(18, "06:00 PM - 07:00 PM"),
    hl(19, "07:00 PM - 08:00 PM"),
    hl(20, "08:00 PM - 09:00 PM"),
    hl(21, "09:00 PM - 10:00 PM"),
    hl(22, "10:00 PM - 11:00 PM"),
    hl(23, "11:00 PM - 12:00 AM"),
];

const NIGHT_INTERVAL: LabelTable = [
    hl(0, "12:00 AM - 01:00 AM"),
    hl(1, "01:00 AM - 02:00 AM"),
    hl(2, "02:00 AM - 03:00 AM"),
    hl(3, "03:00 AM - 04:00 AM"),
    hl(4, "04:00 AM - 05:00 AM"),
    hl(5, "05:00 AM - 06:00 AM"),
    hl(6, "06:00 AM - 07:00 AM"),
    hl(7, "07:00 AM - 08:00 AM"),
];

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Evening, Shift::Night];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Evening => "evening",
            Shift::Night => "night",
        }
    }

    pub const fn window(&self) -> ShiftWindow {
        match self {
            Shift::Morning => ShiftWindow {
                lower: 8,
                upper: 16,
            },
            Shift::Evening => ShiftWindow {
                lower: 16,
                upper: 24,
            },
            Shift::Night => ShiftWindow { lower: 0, upper: 8 },
        }
    }

    /// Shift whose window holds `hour`, `None` outside 0..24
    #[cfg(test)]
    pub fn for_hour(hour: u32) -> Option<Shift> {
        Self::ALL.into_iter().find(|s| s.window().contains(hour))
    }

    /// Column labels in ascending hour order
    pub const fn labels(&self, style: LabelStyle) -> &'static [HourLabel; HOURS_PER_SHIFT] {
        match (self, style) {
            (Shift::Morning, LabelStyle::Legacy) => &MORNING_LEGACY,
            (Shift::Evening, LabelStyle::Legacy) => &EVENING_LEGACY,
            (Shift::Night, LabelStyle::Legacy) => &NIGHT_LEGACY,
            (Shift::Morning, LabelStyle::Interval) => &MORNING_INTERVAL,
            (Shift::Evening, LabelStyle::Interval) => &EVENING_INTERVAL,
            (Shift::Night, LabelStyle::Interval) => &NIGHT_INTERVAL,
        }
    }
}

impl FromStr for Shift {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morning" => Ok(Shift::Morning),
            "evening" => Ok(Shift::Evening),
            "night" => Ok(Shift::Night),
            _ => Err(ReportError::InvalidShift(s.to_string())),
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
