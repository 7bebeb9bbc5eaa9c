// src/aggregate/delta.rs
use serde::Serialize;
use std::{cmp::Reverse, collections::BTreeMap};
use tracing::debug;

use crate::load::PopulationTable;
use crate::region;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionDelta {
    pub region: String,
    pub region_en: Option<&'static str>,
    pub delta: i64,
}

impl RegionDelta {
    pub fn label(&self) -> &str {
        self.region_en.unwrap_or(&self.region)
    }
}

/// Population change per region between `base_year` and `last_year`,
/// sorted descending by delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionalDelta {
    pub last_year: i32,
    pub base_year: i32,
    pub deltas: Vec<RegionDelta>,
}

impl RegionalDelta {
    pub fn top_rising(&self, k: usize) -> &[RegionDelta] {
        &self.deltas[..k.min(self.deltas.len())]
    }

    /// Tail of the descending sequence, so the steepest decline comes last.
    pub fn top_declining(&self, k: usize) -> &[RegionDelta] {
        &self.deltas[self.deltas.len().saturating_sub(k)..]
    }

    /// `(label, delta / scale)` pairs for the bar chart.
    pub fn scaled(&self, scale: i64) -> Vec<(&str, f64)> {
        self.deltas
            .iter()
            .map(|d| (d.label(), d.delta as f64 / scale as f64))
            .collect()
    }
}

/// `last = max(year)`, `base = last - (span_years - 1)`; every non-national
/// region present in both years gets `pop(last) - pop(base)`.
///
/// Returns `None` for an empty table, or when the base year is not representable.
pub fn regional_delta(table: &PopulationTable, span_years: i32) -> Option<RegionalDelta> {
    let last_year = table.max_year()?;
    let Some(base_year) = last_year.checked_sub(span_years.saturating_sub(1)) else {
        debug!(last_year, span_years, "delta base year out of range");
        return None;
    };

    let mut by_region: BTreeMap<&str, (Option<i64>, Option<i64>)> = BTreeMap::new();
    for (code, series) in table.regional_series() {
        let pick = |year: i32| series.iter().find(|r| r.year == year).map(|r| r.population);
        by_region.insert(code, (pick(base_year), pick(last_year)));
    }

    let mut deltas: Vec<RegionDelta> = by_region
        .into_iter()
        .filter_map(|(code, pair)| match pair {
            (Some(base), Some(last)) => Some(RegionDelta {
                region: code.to_string(),
                region_en: region::display_name(code),
                delta: last - base,
            }),
            _ => {
                debug!(region = code, base_year, last_year, "region lacks one of the delta years");
                None
            }
        })
        .collect();
    deltas.sort_by_key(|d| Reverse(d.delta));

    Some(RegionalDelta {
        last_year,
        base_year,
        deltas,
    })
}
