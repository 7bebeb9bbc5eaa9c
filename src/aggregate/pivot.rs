// src/aggregate/pivot.rs
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::load::{PopulationRecord, PopulationTable};

/// Region × year matrix of mean population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    /// Display names, alphabetical.
    pub regions: Vec<&'static str>,
    pub years: Vec<i32>,
    /// `values[region][year]`
    pub values: Vec<Vec<Option<f64>>>,
}

impl Heatmap {
    pub fn scaled(&self, scale: i64) -> Vec<Vec<Option<f64>>> {
        let s = scale as f64;
        self.values
            .iter()
            .map(|row| row.iter().map(|v| v.map(|v| v / s)).collect())
            .collect()
    }

    pub fn get(&self, region: &str, year: i32) -> Option<f64> {
        let r = self.regions.iter().position(|n| *n == region)?;
        let y = self.years.iter().position(|v| *v == year)?;
        self.values[r][y]
    }
}

/// Year × region matrix of summed population for stacked areas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaTable {
    pub years: Vec<i32>,
    /// Display names, alphabetical.
    pub regions: Vec<&'static str>,
    /// `values[year][region]`
    pub values: Vec<Vec<Option<i64>>>,
}

impl AreaTable {
    /// One series per region (missing cells stacked as zero), divided by `scale`.
    pub fn series(&self, scale: i64) -> Vec<(&'static str, Vec<f64>)> {
        let s = scale as f64;
        self.regions
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let ys = self
                    .values
                    .iter()
                    .map(|row| row[c].unwrap_or(0) as f64 / s)
                    .collect();
                (*name, ys)
            })
            .collect()
    }
}

/// Rows that belong in a per-region pivot: mapped, non-national.
fn pivot_rows(table: &PopulationTable) -> impl Iterator<Item = (&'static str, &PopulationRecord)> {
    table
        .records()
        .iter()
        .filter(|r| !r.is_national())
        .filter_map(|r| r.region_en.map(|name| (name, r)))
}

pub fn heatmap_pivot(table: &PopulationTable) -> Heatmap {
    let mut cells: BTreeMap<(&'static str, i32), (i128, u32)> = BTreeMap::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();
    for (name, rec) in pivot_rows(table) {
        let cell = cells.entry((name, rec.year)).or_insert((0, 0));
        cell.0 += i128::from(rec.population);
        cell.1 += 1;
        years.insert(rec.year);
    }

    let regions: Vec<&'static str> = cells
        .keys()
        .map(|(name, _)| *name)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let years: Vec<i32> = years.into_iter().collect();
    let values = regions
        .iter()
        .map(|name| {
            years
                .iter()
                .map(|y| {
                    cells
                        .get(&(*name, *y))
                        .map(|(sum, n)| *sum as f64 / f64::from(*n))
                })
                .collect()
        })
        .collect();

    Heatmap {
        regions,
        years,
        values,
    }
}

pub fn area_pivot(table: &PopulationTable) -> AreaTable {
    let mut cells: BTreeMap<(i32, &'static str), i64> = BTreeMap::new();
    let mut regions: BTreeSet<&'static str> = BTreeSet::new();
    for (name, rec) in pivot_rows(table) {
        let cell = cells.entry((rec.year, name)).or_insert(0);
        *cell = cell.saturating_add(rec.population);
        regions.insert(name);
    }

    let years: Vec<i32> = cells
        .keys()
        .map(|(y, _)| *y)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let regions: Vec<&'static str> = regions.into_iter().collect();
    let values = years
        .iter()
        .map(|y| {
            regions
                .iter()
                .map(|name| cells.get(&(*y, *name)).copied())
                .collect()
        })
        .collect();

    AreaTable {
        years,
        regions,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load_population_bytes;

    fn table(csv_body: &str) -> PopulationTable {
        let csv = format!("지역,연도,인구,출생아수(명),사망자수(명)\n{csv_body}");
        load_population_bytes(csv.as_bytes()).unwrap()
    }

    const BODY: &str = "\
전국,2020,1000,0,0
전국,2021,1100,0,0
서울,2020,500,0,0
서울,2021,480,0,0
부산,2021,300,0,0
세종,2020,-,-,-
Atlantis,2020,7,0,0
";

    #[test]
    fn heatmap_excludes_national_and_unmapped() {
        let h = heatmap_pivot(&table(BODY));
        assert_eq!(h.regions, vec!["Busan", "Sejong", "Seoul"]);
        assert_eq!(h.years, vec![2020, 2021]);
        assert!(!h.regions.contains(&"National"));
        assert_eq!(h.get("Seoul", 2021), Some(480.0));
        assert_eq!(h.get("Busan", 2020), None);
        assert_eq!(h.get("Sejong", 2020), Some(0.0));
        assert_eq!(h.scaled(1000)[2][0], Some(0.5));
    }

    #[test]
    fn heatmap_averages_duplicates() {
        let h = heatmap_pivot(&table("서울,2020,10,0,0\n서울,2020,20,0,0\n"));
        assert_eq!(h.get("Seoul", 2020), Some(15.0));
    }

    #[test]
    fn huge_populations_do_not_overflow() {
        let max = i64::MAX;
        let t = table(&format!("서울,2020,{max},0,0\n서울,2020,{max},0,0\n"));
        let h = heatmap_pivot(&t);
        assert_eq!(h.get("Seoul", 2020), Some(max as f64));
        let a = area_pivot(&t);
        assert_eq!(a.values[0], vec![Some(max)]);
    }

    #[test]
    fn area_sums_and_excludes_national() {
        let a = area_pivot(&table(&format!("{BODY}서울,2021,20,0,0\n")));
        assert_eq!(a.years, vec![2020, 2021]);
        assert_eq!(a.regions, vec!["Busan", "Sejong", "Seoul"]);
        assert_eq!(a.values[1], vec![Some(300), None, Some(500)]);
        assert_eq!(a.values[0], vec![None, Some(0), Some(500)]);

        let series = a.series(100);
        assert_eq!(series[0], ("Busan", vec![0.0, 3.0]));
        assert!(series.iter().all(|(name, _)| *name != "National"));
    }
}
