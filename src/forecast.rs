// src/forecast.rs
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ForecastConfig;
use crate::error::{PopError, Result};
use crate::load::{PopulationRecord, PopulationTable};
use crate::region::NATIONAL_CODE;

/// Linear projection from the mean natural change of the trailing records.
///
/// `national` must be sorted ascending by year.
pub fn predict_population(national: &[&PopulationRecord], cfg: &ForecastConfig) -> Result<i64> {
    let last = national.last().ok_or(PopError::MissingNational {
        code: NATIONAL_CODE,
    })?;
    if national.len() < cfg.min_history {
        return Err(PopError::InsufficientHistory {
            needed: cfg.min_history,
            found: national.len(),
        });
    }
    if national.len() < cfg.window {
        warn!(
            window = cfg.window,
            found = national.len(),
            "averaging natural change over a short history"
        );
    }

    let recent = &national[national.len().saturating_sub(cfg.window)..];
    let total: i128 = recent.iter().map(|r| i128::from(r.natural_change())).sum();
    // integer division truncates toward zero, matching int(mean)
    let mean_delta = total / recent.len() as i128;
    let years_left = i64::from(cfg.target_year) - i64::from(last.year);
    let projected = i128::from(last.population) + mean_delta * i128::from(years_left);
    let forecast = i64::try_from(projected).map_err(|_| PopError::Overflow {
        what: "population forecast",
    })?;

    debug!(mean_delta = %mean_delta, years_left, forecast, "forecast computed");
    Ok(forecast)
}

/// Actual national series plus the dashed forecast segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalTrend {
    pub actual: Vec<(i32, i64)>,
    /// `[(last_year, last_population), (target_year, forecast)]`
    pub forecast_segment: [(i32, i64); 2],
    pub forecast: i64,
    pub target_year: i32,
}

pub fn national_trend(table: &PopulationTable, cfg: &ForecastConfig) -> Result<NationalTrend> {
    let national = table.national();
    let forecast = predict_population(&national, cfg)?;
    let actual: Vec<(i32, i64)> = national.iter().map(|r| (r.year, r.population)).collect();
    // predict_population already rejected an empty series
    let (last_year, last_pop) = actual[actual.len() - 1];

    Ok(NationalTrend {
        actual,
        forecast_segment: [(last_year, last_pop), (cfg.target_year, forecast)],
        forecast,
        target_year: cfg.target_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load_population_bytes;

    fn rec(year: i32, population: i64, births: i64, deaths: i64) -> PopulationRecord {
        PopulationRecord {
            region: NATIONAL_CODE.to_string(),
            region_en: Some("National"),
            year,
            population,
            births,
            deaths,
        }
    }

    #[test]
    fn three_year_mean_projects_to_2035() {
        let rows = [rec(2020, 100, 10, 5), rec(2021, 105, 10, 6), rec(2022, 108, 10, 7)];
        let refs: Vec<&PopulationRecord> = rows.iter().collect();
        let forecast = predict_population(&refs, &ForecastConfig::default()).unwrap();
        assert_eq!(forecast, 108 + 4 * 13);
        assert_eq!(forecast, 160);
    }

    #[test]
    fn only_trailing_window_is_averaged() {
        let rows = [
            rec(2018, 90, 1000, 0),
            rec(2020, 100, 10, 5),
            rec(2021, 105, 10, 6),
            rec(2022, 108, 10, 7),
        ];
        let refs: Vec<&PopulationRecord> = rows.iter().collect();
        assert_eq!(predict_population(&refs, &ForecastConfig::default()).unwrap(), 160);
    }

    #[test]
    fn mean_truncates_toward_zero() {
        // deltas -1, -2, -2 → mean -1.67 → -1
        let rows = [rec(2032, 50, 1, 2), rec(2033, 49, 1, 3), rec(2034, 47, 1, 3)];
        let refs: Vec<&PopulationRecord> = rows.iter().collect();
        assert_eq!(predict_population(&refs, &ForecastConfig::default()).unwrap(), 46);
    }

    #[test]
    fn past_target_year_still_applies_formula() {
        let rows = [rec(2035, 10, 0, 2), rec(2036, 8, 0, 2), rec(2037, 6, 0, 2)];
        let refs: Vec<&PopulationRecord> = rows.iter().collect();
        // years_left = -2, mean delta = -2
        assert_eq!(predict_population(&refs, &ForecastConfig::default()).unwrap(), 10);
    }

    #[test]
    fn short_history_is_rejected_by_default() {
        let rows = [rec(2021, 105, 10, 6), rec(2022, 108, 10, 7)];
        let refs: Vec<&PopulationRecord> = rows.iter().collect();
        let err = predict_population(&refs, &ForecastConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PopError::InsufficientHistory {
                needed: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn short_history_allowed_when_configured() {
        let rows = [rec(2021, 105, 10, 6), rec(2022, 108, 10, 7)];
        let refs: Vec<&PopulationRecord> = rows.iter().collect();
        let cfg = ForecastConfig {
            min_history: 1,
            ..ForecastConfig::default()
        };
        // mean(4, 3) = 3.5 → 3
        assert_eq!(predict_population(&refs, &cfg).unwrap(), 108 + 3 * 13);
    }

    #[test]
    fn huge_projection_is_an_error_not_a_panic() {
        let rows = [
            rec(2020, i64::MAX, i64::MAX, 0),
            rec(2021, i64::MAX, i64::MAX, 0),
            rec(2022, i64::MAX, i64::MAX, 0),
        ];
        let refs: Vec<&PopulationRecord> = rows.iter().collect();
        let err = predict_population(&refs, &ForecastConfig::default()).unwrap_err();
        assert!(matches!(err, PopError::Overflow { .. }));
    }

    #[test]
    fn extreme_years_do_not_overflow() {
        let rows = [
            rec(-2_147_483_000, 100, 2, 1),
            rec(-2_147_482_999, 101, 2, 1),
            rec(-2_147_482_998, 102, 2, 1),
        ];
        let refs: Vec<&PopulationRecord> = rows.iter().collect();
        let forecast = predict_population(&refs, &ForecastConfig::default()).unwrap();
        let years_left = 2035_i64 + 2_147_482_998;
        assert_eq!(forecast, 102 + years_left);
    }

    #[test]
    fn no_national_rows_is_explicit() {
        let err = predict_population(&[], &ForecastConfig::default()).unwrap_err();
        assert!(matches!(err, PopError::MissingNational { .. }));
    }

    #[test]
    fn trend_includes_forecast_segment() {
        let table = load_population_bytes(crate::load::tests::SAMPLE.as_bytes()).unwrap();
        let trend = national_trend(&table, &ForecastConfig::default()).unwrap();
        assert_eq!(trend.actual, vec![(2020, 100), (2021, 105), (2022, 108)]);
        // natural change 5, 4, 3 → mean 4
        assert_eq!(trend.forecast, 160);
        assert_eq!(trend.forecast_segment, [(2022, 108), (2035, 160)]);
    }
}
