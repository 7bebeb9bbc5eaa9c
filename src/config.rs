// src/config.rs
//! Dashboard parameters. Every field has a default so an absent or partial
//! YAML file is fine.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

use crate::error::{PopError, Result};

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV: &str = "POPTRENDS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub forecast: ForecastConfig,
    pub delta: DeltaConfig,
    pub diffs: DiffConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Year the projection targets.
    pub target_year: i32,
    /// Number of trailing national records averaged.
    pub window: usize,
    /// Fewer national records than this is an error.
    pub min_history: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            target_year: 2035,
            window: 3,
            min_history: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeltaConfig {
    /// Years covered, inclusive of both ends (5 → last vs last-4).
    pub span_years: i32,
    /// How many regions are called out as rising / declining.
    pub top_k: usize,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            span_years: 5,
            top_k: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    pub limit: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self { limit: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Divisor applied to populations in charts.
    pub scale: i64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { scale: 1000 }
    }
}

impl DashboardConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self =
            serde_yaml::from_str(text).map_err(|e| PopError::Config(format!("parsing YAML: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| PopError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    /// Explicit path first, then `$POPTRENDS_CONFIG`, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!(path = %path.display(), "loading config");
            return Self::from_path(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => {
                info!(path = ?path, "loading config from {}", CONFIG_ENV);
                Self::from_path(Path::new(&path))
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(PopError::Config(msg.to_string()));
        if self.forecast.window == 0 {
            return fail("forecast.window must be at least 1");
        }
        if self.forecast.min_history == 0 {
            return fail("forecast.min_history must be at least 1");
        }
        if self.delta.span_years < 2 {
            return fail("delta.span_years must be at least 2");
        }
        if self.diffs.limit == 0 {
            return fail("diffs.limit must be at least 1");
        }
        if self.display.scale < 1 {
            return fail("display.scale must be at least 1");
        }
        Ok(())
    }
}
