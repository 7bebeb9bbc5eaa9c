// src/load/mod.rs
pub mod clean;
pub mod columns;

use csv::ReaderBuilder;
use serde::Serialize;
use std::{
    collections::{BTreeMap, HashSet},
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::{debug, info, warn};

use crate::error::{PopError, Result};
use crate::region::{self, SEJONG_CODE};
use clean::{clean_str, parse_count, parse_year, replace_placeholder};
use columns::ColumnIndex;

/// One row of the population table, keyed by (region, year).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationRecord {
    /// Region code as written in the file (Korean).
    pub region: String,
    /// English display name; `None` when the code is not in the region map.
    pub region_en: Option<&'static str>,
    pub year: i32,
    pub population: i64,
    pub births: i64,
    pub deaths: i64,
}

impl PopulationRecord {
    pub fn is_national(&self) -> bool {
        region::is_national(&self.region)
    }

    /// Natural increase for the year.
    pub fn natural_change(&self) -> i64 {
        self.births - self.deaths
    }
}

/// Rows of one uploaded file, in file order. Never mutated after load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationTable {
    records: Vec<PopulationRecord>,
}

impl PopulationTable {
    pub fn new(records: Vec<PopulationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PopulationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }

    /// National rows sorted by year, first occurrence per year.
    pub fn national(&self) -> Vec<&PopulationRecord> {
        let mut by_year: BTreeMap<i32, &PopulationRecord> = BTreeMap::new();
        for rec in self.records.iter().filter(|r| r.is_national()) {
            by_year.entry(rec.year).or_insert(rec);
        }
        by_year.into_values().collect()
    }

    /// Non-national rows grouped by region code, each group sorted by year
    /// (first occurrence per year).
    pub fn regional_series(&self) -> BTreeMap<&str, Vec<&PopulationRecord>> {
        let mut grouped: BTreeMap<&str, BTreeMap<i32, &PopulationRecord>> = BTreeMap::new();
        for rec in self.records.iter().filter(|r| !r.is_national()) {
            grouped
                .entry(rec.region.as_str())
                .or_default()
                .entry(rec.year)
                .or_insert(rec);
        }
        grouped
            .into_iter()
            .map(|(code, years)| (code, years.into_values().collect()))
            .collect()
    }
}

/// Parse a population CSV from any reader.
///
/// - Missing required columns abort the load.
/// - Sejong `-` placeholders are rewritten to zero before conversion.
/// - Unparsable count cells become zero; counts are truncated and clamped at zero.
#[tracing::instrument(level = "info", skip(reader))]
pub fn load_population<R: Read>(reader: R) -> Result<PopulationTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(PopError::EmptyInput);
    }
    let idx = ColumnIndex::resolve(headers.iter())?;
    debug!(?idx, "resolved columns");

    let mut records = Vec::new();
    let mut seen: HashSet<(String, i32)> = HashSet::new();
    let mut placeholders = 0usize;
    let mut coerced = 0usize;

    for (n, result) in rdr.records().enumerate() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or(n as u64 + 2);
        let cell = |i: usize| row.get(i).unwrap_or("");

        let region_code = clean_str(cell(idx.region)).to_string();
        let raw_year = cell(idx.year);
        let year = parse_year(raw_year).ok_or_else(|| PopError::InvalidYear {
            line,
            value: raw_year.to_string(),
        })?;

        let mut counts = [cell(idx.population), cell(idx.births), cell(idx.deaths)];
        if region_code == SEJONG_CODE {
            for c in counts.iter_mut() {
                let replaced = replace_placeholder(*c);
                if replaced != *c {
                    placeholders += 1;
                    *c = replaced;
                }
            }
        }
        let [population, births, deaths] = counts.map(|c| {
            parse_count(c).unwrap_or_else(|| {
                coerced += 1;
                0
            })
        });

        if !seen.insert((region_code.clone(), year)) {
            warn!(region = %region_code, year, line, "duplicate (region, year) row");
        }

        records.push(PopulationRecord {
            region_en: region::display_name(&region_code),
            region: region_code,
            year,
            population,
            births,
            deaths,
        });
    }

    info!(
        rows = records.len(),
        placeholders, coerced, "loaded population table"
    );
    Ok(PopulationTable::new(records))
}

pub fn load_population_bytes(bytes: &[u8]) -> Result<PopulationTable> {
    load_population(bytes)
}

pub fn load_population_path<P: AsRef<Path>>(path: P) -> Result<PopulationTable> {
    let file = File::open(path.as_ref())?;
    load_population(BufReader::new(file))
}
