//! Threshold selection and ranking of the completed tally.

use crate::aggregator::Contributors;
use crate::model::ContributorAggregate;
use crate::report::ReportRow;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Which metric drives both the threshold and the ranking. Exactly one is active per run.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Threshold and rank by the number of qualifying donations.
    #[default]
    Count,
    /// Threshold and rank by the number of distinct donation days.
    Days,
}

serde_plain::derive_display_from_serialize!(ReportMode);
serde_plain::derive_fromstr_from_deserialize!(ReportMode);

impl ReportMode {
    pub fn metric(&self, aggregate: &ContributorAggregate) -> u64 {
        match self {
            ReportMode::Count => aggregate.donation_count(),
            ReportMode::Days => aggregate.unique_days(),
        }
    }
}

/// An inclusive `[min, max]` range for the active metric.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Bounds {
    min: u64,
    max: u64,
}

impl Bounds {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    /// An inverted range is legal, it just selects nothing.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, value: u64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} and {}", self.min, self.max)
    }
}

/// Keeps the contributors whose metric falls within `bounds` and returns them ranked.
pub fn select(contributors: Contributors, mode: ReportMode, bounds: Bounds) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = contributors
        .into_iter()
        .filter(|(_, aggregate)| bounds.contains(mode.metric(aggregate)))
        .map(|(key, aggregate)| ReportRow::new(key, aggregate))
        .collect();
    rank(&mut rows, mode);
    rows
}

/// Orders `rows` by the active metric, highest first. The sort is stable, so rows with equal
/// metrics keep the order in which their contributors were first encountered.
pub fn rank(rows: &mut [ReportRow], mode: ReportMode) {
    rows.sort_by(|a, b| b.metric(mode).cmp(&a.metric(mode)));
}
