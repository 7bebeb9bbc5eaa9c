// src/render/mod.rs
//! Presentation is downstream of the analysis: every view is computed first
//! and handed to a [`ViewRenderer`], so the output surface can be swapped.

pub mod format;
pub mod json;
pub mod terminal;

use anyhow::Result;
use serde::Serialize;

use crate::aggregate::{AreaTable, Heatmap, RegionalDelta, TopDiffs};
use crate::forecast::NationalTrend;
use crate::stats::{ColumnSummary, Overview};

pub use json::JsonRenderer;
pub use terminal::TerminalRenderer;

/// Dashboard sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Load,
    BasicStats,
    NationalTrend,
    RegionalDelta,
    TopDiffs,
    Heatmap,
    Area,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Load => "Load",
            Section::BasicStats => "Basic Stats",
            Section::NationalTrend => "National Trend",
            Section::RegionalDelta => "Regional Δ",
            Section::TopDiffs => "Top Δ records",
            Section::Heatmap => "Heatmap",
            Section::Area => "Stacked Area",
        }
    }
}

pub trait ViewRenderer {
    /// Nothing was uploaded; show `message` instead of any view.
    fn prompt(&mut self, message: &str) -> Result<()>;

    /// A section could not be produced.
    fn notice(&mut self, section: Section, message: &str) -> Result<()>;

    fn overview(&mut self, overview: &Overview, describe: &[ColumnSummary]) -> Result<()>;

    fn national_trend(&mut self, trend: &NationalTrend) -> Result<()>;

    fn regional_delta(&mut self, delta: &RegionalDelta, top_k: usize, scale: i64) -> Result<()>;

    fn top_diffs(&mut self, diffs: &TopDiffs) -> Result<()>;

    fn heatmap(&mut self, heatmap: &Heatmap, scale: i64) -> Result<()>;

    fn area(&mut self, area: &AreaTable, scale: i64) -> Result<()>;

    /// Called once after the last section.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
