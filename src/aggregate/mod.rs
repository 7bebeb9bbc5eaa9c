// src/aggregate/mod.rs
pub mod delta;
pub mod diffs;
pub mod pivot;

pub use delta::{regional_delta, RegionDelta, RegionalDelta};
pub use diffs::{top_diffs, ColorBucket, DivergingScale, TopDiffs, YearDiff};
pub use pivot::{area_pivot, heatmap_pivot, AreaTable, Heatmap};
