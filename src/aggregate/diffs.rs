// src/aggregate/diffs.rs
use serde::Serialize;
use std::cmp::Reverse;

use crate::load::{PopulationRecord, PopulationTable};

/// A record together with its change from the region's previous year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearDiff {
    #[serde(flatten)]
    pub record: PopulationRecord,
    pub diff: i64,
}

/// Coarse colour classes for the diverging scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBucket {
    StrongDecrease,
    Decrease,
    Neutral,
    Increase,
    StrongIncrease,
}

/// Symmetric scale centred on zero: `[-bound, +bound]` maps onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DivergingScale {
    pub bound: i64,
}

impl DivergingScale {
    pub fn from_values<I: IntoIterator<Item = i64>>(values: I) -> Self {
        let bound = values.into_iter().map(i64::abs).max().unwrap_or(0);
        Self { bound }
    }

    pub fn vmin(&self) -> i64 {
        -self.bound
    }

    pub fn vmax(&self) -> i64 {
        self.bound
    }

    /// Position on the colour ramp; 0.5 is zero change.
    pub fn position(&self, diff: i64) -> f64 {
        if self.bound == 0 {
            return 0.5;
        }
        let p = (diff as f64 + self.bound as f64) / (2.0 * self.bound as f64);
        p.clamp(0.0, 1.0)
    }

    pub fn bucket(&self, diff: i64) -> ColorBucket {
        match self.position(diff) {
            p if p < 0.2 => ColorBucket::StrongDecrease,
            p if p < 0.45 => ColorBucket::Decrease,
            p if p <= 0.55 => ColorBucket::Neutral,
            p if p <= 0.8 => ColorBucket::Increase,
            _ => ColorBucket::StrongIncrease,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopDiffs {
    pub rows: Vec<YearDiff>,
    pub scale: DivergingScale,
}

/// Year-over-year population differences for every non-national region, the
/// `limit` largest first. A region's first year has nothing to diff against
/// and never appears.
pub fn top_diffs(table: &PopulationTable, limit: usize) -> TopDiffs {
    let mut all: Vec<YearDiff> = Vec::new();
    for series in table.regional_series().into_values() {
        for pair in series.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            all.push(YearDiff {
                record: cur.clone(),
                diff: cur.population - prev.population,
            });
        }
    }

    // stable: ties keep (region, year) order
    all.sort_by_key(|d| Reverse(d.diff));
    all.truncate(limit);

    let scale = DivergingScale::from_values(all.iter().map(|d| d.diff));
    TopDiffs { rows: all, scale }
}
