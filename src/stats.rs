// src/stats.rs
//! Table overview and per-column descriptive statistics.

use serde::Serialize;

use crate::load::PopulationTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub non_null: usize,
    pub dtype: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

pub fn overview(table: &PopulationTable) -> Overview {
    let rows = table.len();
    let mapped = table
        .records()
        .iter()
        .filter(|r| r.region_en.is_some())
        .count();
    let col = |name, non_null, dtype| ColumnInfo {
        name,
        non_null,
        dtype,
    };

    Overview {
        rows,
        columns: vec![
            col("region", rows, "object"),
            col("year", rows, "int32"),
            col("population", rows, "int64"),
            col("births", rows, "int64"),
            col("deaths", rows, "int64"),
            col("region_en", mapped, "object"),
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: &'static str,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn from_values(name: &'static str, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
        let std = match mean {
            Some(m) if count > 1 => {
                let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
                Some((ss / (count - 1) as f64).sqrt())
            }
            _ => None,
        };

        Self {
            name,
            count,
            mean,
            std,
            min: values.first().copied(),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied(),
        }
    }
}

/// Linear interpolation between closest ranks; `sorted` must be ascending.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn describe(table: &PopulationTable) -> Vec<ColumnSummary> {
    let recs = table.records();
    let column = |name, f: fn(&crate::load::PopulationRecord) -> f64| {
        ColumnSummary::from_values(name, recs.iter().map(f).collect())
    };
    vec![
        column("year", |r| f64::from(r.year)),
        column("population", |r| r.population as f64),
        column("births", |r| r.births as f64),
        column("deaths", |r| r.deaths as f64),
    ]
}
