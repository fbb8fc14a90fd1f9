//! Pivot projection
//!
//! Turns the positional per-hour counters of a [`UserHourCounts`] into a
//! label-keyed map with one entry per shift hour, zeros included.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use utoipa::ToSchema;

use super::aggregate::UserHourCounts;
use super::shift::{LabelStyle, Shift};

/// Hour label to count, serialized as a JSON object in ascending hour order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourCounts(Vec<(&'static str, u64)>);

impl HourCounts {
    pub fn sum(&self) -> u64 {
        self.0.iter().map(|(_, c)| c).sum()
    }
}

#[cfg(test)]
impl HourCounts {
    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.iter().find(|(l, _)| *l == label).map(|(_, c)| *c)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(l, _)| *l)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Serialize for HourCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

/// One user row of an hourly report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRow {
    pub username: String,
    /// Count per hour label, every label of the shift present
    #[schema(value_type = Object)]
    pub counts: HourCounts,
    pub latest_hour: u32,
    /// Sum of `counts`, detail report only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Project aggregated counters onto the shift's labels
pub fn project_row(
    row: UserHourCounts,
    shift: Shift,
    style: LabelStyle,
    with_total: bool,
) -> AggregatedRow {
    let counts: Vec<(&'static str, u64)> = shift
        .labels(style)
        .iter()
        .zip(row.counts)
        .map(|(label, count)| (label.label, count))
        .collect();
    let counts = HourCounts(counts);
    let total = with_total.then(|| counts.sum());

    AggregatedRow {
        username: row.username,
        counts,
        latest_hour: row.latest_hour,
        total,
    }
}
