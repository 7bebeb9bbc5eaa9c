// src/dashboard.rs
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::aggregate::{area_pivot, heatmap_pivot, regional_delta, top_diffs};
use crate::config::DashboardConfig;
use crate::export;
use crate::forecast::national_trend;
use crate::load::{load_population_bytes, PopulationTable};
use crate::render::{Section, ViewRenderer};
use crate::stats::{describe, overview};

pub const UPLOAD_PROMPT: &str = "Upload a population_trends.csv file to start.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardOutcome {
    /// No file was provided; only the prompt was shown.
    NoInput,
    Rendered {
        rows: usize,
        /// Sections replaced by a notice.
        skipped: Vec<Section>,
        exported: Vec<PathBuf>,
    },
}

/// One page view: load the upload, derive every view, hand them to a renderer.
pub struct Dashboard {
    config: DashboardConfig,
    export_dir: Option<PathBuf>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            export_dir: None,
        }
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    /// A load failure is rendered as a notice and returned; nothing else is drawn.
    pub fn run(
        &self,
        input: Option<&[u8]>,
        renderer: &mut dyn ViewRenderer,
    ) -> Result<DashboardOutcome> {
        let Some(bytes) = input else {
            info!("no input; showing prompt");
            renderer.prompt(UPLOAD_PROMPT)?;
            renderer.finish()?;
            return Ok(DashboardOutcome::NoInput);
        };

        let table = match load_population_bytes(bytes) {
            Ok(t) => t,
            Err(e) => {
                renderer.notice(Section::Load, &format!("could not load CSV: {e}"))?;
                renderer.finish()?;
                return Err(e.into());
            }
        };

        let outcome = self.render_views(&table, renderer)?;
        renderer.finish()?;
        Ok(outcome)
    }

    pub fn render_views(
        &self,
        table: &PopulationTable,
        renderer: &mut dyn ViewRenderer,
    ) -> Result<DashboardOutcome> {
        let cfg = &self.config;
        let scale = cfg.display.scale;
        let mut skipped = Vec::new();

        renderer.overview(&overview(table), &describe(table))?;

        match national_trend(table, &cfg.forecast) {
            Ok(trend) => {
                info!(forecast = trend.forecast, year = trend.target_year, "national forecast");
                renderer.national_trend(&trend)?;
            }
            Err(e) => {
                warn!(error = %e, "national trend unavailable");
                renderer.notice(Section::NationalTrend, &e.to_string())?;
                skipped.push(Section::NationalTrend);
            }
        }

        let delta = regional_delta(table, cfg.delta.span_years);
        match &delta {
            Some(d) if !d.deltas.is_empty() => {
                renderer.regional_delta(d, cfg.delta.top_k, scale)?
            }
            _ => {
                renderer.notice(
                    Section::RegionalDelta,
                    "no region has data for both ends of the delta window",
                )?;
                skipped.push(Section::RegionalDelta);
            }
        }

        let diffs = top_diffs(table, cfg.diffs.limit);
        renderer.top_diffs(&diffs)?;

        let heatmap = heatmap_pivot(table);
        if heatmap.regions.is_empty() {
            renderer.notice(Section::Heatmap, "no regional rows to pivot")?;
            skipped.push(Section::Heatmap);
        } else {
            renderer.heatmap(&heatmap, scale)?;
        }

        let area = area_pivot(table);
        if area.regions.is_empty() {
            renderer.notice(Section::Area, "no regional rows to pivot")?;
            skipped.push(Section::Area);
        } else {
            renderer.area(&area, scale)?;
        }

        let exported = match &self.export_dir {
            Some(dir) => export::write_views(dir, table, delta.as_ref(), &diffs)?,
            None => Vec::new(),
        };

        Ok(DashboardOutcome::Rendered {
            rows: table.len(),
            skipped,
            exported,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AreaTable, Heatmap, RegionalDelta, TopDiffs};
    use crate::error::PopError;
    use crate::forecast::NationalTrend;
    use crate::load::tests::SAMPLE;
    use crate::stats::{ColumnSummary, Overview};
    use tempfile::tempdir;

    /// Records the order of calls instead of drawing anything.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl ViewRenderer for Recorder {
        fn prompt(&mut self, message: &str) -> Result<()> {
            self.calls.push(format!("prompt:{message}"));
            Ok(())
        }
        fn notice(&mut self, section: Section, _message: &str) -> Result<()> {
            self.calls.push(format!("notice:{}", section.title()));
            Ok(())
        }
        fn overview(&mut self, _: &Overview, _: &[ColumnSummary]) -> Result<()> {
            self.calls.push("overview".into());
            Ok(())
        }
        fn national_trend(&mut self, _: &NationalTrend) -> Result<()> {
            self.calls.push("trend".into());
            Ok(())
        }
        fn regional_delta(&mut self, _: &RegionalDelta, _: usize, _: i64) -> Result<()> {
            self.calls.push("delta".into());
            Ok(())
        }
        fn top_diffs(&mut self, _: &TopDiffs) -> Result<()> {
            self.calls.push("diffs".into());
            Ok(())
        }
        fn heatmap(&mut self, _: &Heatmap, _: i64) -> Result<()> {
            self.calls.push("heatmap".into());
            Ok(())
        }
        fn area(&mut self, _: &AreaTable, _: i64) -> Result<()> {
            self.calls.push("area".into());
            Ok(())
        }
        fn finish(&mut self) -> Result<()> {
            self.calls.push("finish".into());
            Ok(())
        }
    }

    #[test]
    fn missing_input_only_prompts() {
        let mut rec = Recorder::default();
        let outcome = Dashboard::new(DashboardConfig::default())
            .run(None, &mut rec)
            .unwrap();
        assert_eq!(outcome, DashboardOutcome::NoInput);
        assert_eq!(rec.calls, vec![format!("prompt:{UPLOAD_PROMPT}"), "finish".into()]);
    }

    #[test]
    fn load_error_renders_nothing_else() {
        let mut rec = Recorder::default();
        let err = Dashboard::new(DashboardConfig::default())
            .run(Some("지역,연도\n서울,2020\n".as_bytes()), &mut rec)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PopError>(),
            Some(PopError::MissingColumn { .. })
        ));
        assert_eq!(rec.calls, vec!["notice:Load".to_string(), "finish".into()]);
    }

    #[test]
    fn renders_all_views_in_order() {
        let mut rec = Recorder::default();
        let outcome = Dashboard::new(DashboardConfig::default())
            .run(Some(SAMPLE.as_bytes()), &mut rec)
            .unwrap();
        // five-year window reaches back to 2018, which the sample lacks
        assert_eq!(
            rec.calls,
            vec![
                "overview",
                "trend",
                "notice:Regional Δ",
                "diffs",
                "heatmap",
                "area",
                "finish"
            ]
        );
        assert_eq!(
            outcome,
            DashboardOutcome::Rendered {
                rows: 9,
                skipped: vec![Section::RegionalDelta],
                exported: vec![],
            }
        );
    }

    #[test]
    fn missing_national_is_flagged_not_fatal() {
        let csv = "지역,연도,인구,출생아수(명),사망자수(명)\n서울,2018,1,0,0\n서울,2022,2,0,0\n";
        let mut rec = Recorder::default();
        let outcome = Dashboard::new(DashboardConfig::default())
            .run(Some(csv.as_bytes()), &mut rec)
            .unwrap();
        assert!(rec.calls.contains(&"notice:National Trend".to_string()));
        assert!(rec.calls.contains(&"delta".to_string()));
        match outcome {
            DashboardOutcome::Rendered { skipped, .. } => {
                assert_eq!(skipped, vec![Section::NationalTrend])
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn bundled_sample_renders_every_section() {
        let csv = include_str!("../data/population_trends_sample.csv");
        let mut out = crate::render::TerminalRenderer::new(Vec::new());
        let outcome = Dashboard::new(DashboardConfig::default())
            .run(Some(csv.as_bytes()), &mut out)
            .unwrap();
        match outcome {
            DashboardOutcome::Rendered { rows, skipped, .. } => {
                assert_eq!(rows, 16 * 18);
                assert!(skipped.is_empty());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("2035 (forecast)"));
        assert!(text.contains("Gyeonggi"));
    }

    #[test]
    fn out_of_range_counts_do_not_abort_the_page() {
        let csv = "지역,연도,인구,출생아수(명),사망자수(명)\n\
                   전국,2020,1,1e30,0\n전국,2021,1,1e30,0\n전국,2022,1,1e30,0\n\
                   서울,2020,1e30,0,0\n서울,2020,1e30,0,0\n";
        let mut rec = Recorder::default();
        let outcome = Dashboard::new(DashboardConfig::default())
            .run(Some(csv.as_bytes()), &mut rec)
            .unwrap();
        assert!(rec.calls.contains(&"trend".to_string()));
        assert!(rec.calls.contains(&"area".to_string()));
        assert!(matches!(outcome, DashboardOutcome::Rendered { rows: 5, .. }));
    }

    #[test]
    fn exports_when_configured() {
        let tmp = tempdir().unwrap();
        let mut rec = Recorder::default();
        let outcome = Dashboard::new(DashboardConfig::default())
            .with_export_dir(tmp.path())
            .run(Some(SAMPLE.as_bytes()), &mut rec)
            .unwrap();
        match outcome {
            DashboardOutcome::Rendered { exported, .. } => {
                assert_eq!(exported.len(), 3);
                assert!(exported.iter().all(|p| p.exists()));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
