// src/render/terminal.rs
use anyhow::{Context, Result};
use prettytable::{format, Cell, Row, Table};
use std::io::Write;

use super::format::{signed_thousands, thousands, thousands_f64};
use super::{Section, ViewRenderer};
use crate::aggregate::{AreaTable, ColorBucket, Heatmap, RegionalDelta, TopDiffs};
use crate::forecast::NationalTrend;
use crate::stats::{ColumnSummary, Overview};

const BAR_WIDTH: usize = 40;
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// Box-drawn tables and text bar charts written to any `Write`.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&mut self, section: Section) -> Result<()> {
        writeln!(self.out, "\n=== {} ===", section.title())?;
        Ok(())
    }

    fn print_table(&mut self, table: &Table) -> Result<()> {
        table.print(&mut self.out).context("writing table")?;
        Ok(())
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(
        header.iter().map(|h| Cell::new(h).style_spec("bFg")).collect(),
    ));
    table
}

fn num_cell(text: &str) -> Cell {
    Cell::new(text).style_spec("r")
}

fn opt_f64(v: Option<f64>, precision: usize) -> String {
    v.map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "-".to_string())
}

/// Horizontal bar of `|v| / max_abs` relative length; negatives use a lighter glyph.
fn bar(v: f64, max_abs: f64) -> String {
    if max_abs <= 0.0 {
        return String::new();
    }
    let len = ((v.abs() / max_abs) * BAR_WIDTH as f64).round() as usize;
    let glyph = if v < 0.0 { '░' } else { '█' };
    std::iter::repeat(glyph).take(len.max(1)).collect()
}

fn bucket_style(bucket: ColorBucket) -> (&'static str, &'static str) {
    match bucket {
        ColorBucket::StrongIncrease => ("rbFr", "▲▲"),
        ColorBucket::Increase => ("rFr", "▲"),
        ColorBucket::Neutral => ("r", "·"),
        ColorBucket::Decrease => ("rFb", "▼"),
        ColorBucket::StrongDecrease => ("rbFb", "▼▼"),
    }
}

fn shade(v: f64, lo: f64, hi: f64) -> char {
    if hi <= lo {
        return SHADES[SHADES.len() - 1];
    }
    let idx = ((v - lo) / (hi - lo) * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[idx.min(SHADES.len() - 1)]
}

impl<W: Write> ViewRenderer for TerminalRenderer<W> {
    fn prompt(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    fn notice(&mut self, section: Section, message: &str) -> Result<()> {
        self.heading(section)?;
        writeln!(self.out, "! {message}")?;
        Ok(())
    }

    fn overview(&mut self, overview: &Overview, describe: &[ColumnSummary]) -> Result<()> {
        self.heading(Section::BasicStats)?;
        writeln!(
            self.out,
            "{} rows x {} columns",
            overview.rows,
            overview.columns.len()
        )?;

        let mut info = new_table(&["#", "Column", "Non-Null Count", "Dtype"]);
        for (i, col) in overview.columns.iter().enumerate() {
            info.add_row(Row::new(vec![
                num_cell(&i.to_string()),
                Cell::new(col.name),
                num_cell(&format!("{} non-null", col.non_null)),
                Cell::new(col.dtype),
            ]));
        }
        self.print_table(&info)?;

        let mut header = vec![""];
        header.extend(describe.iter().map(|c| c.name));
        let mut stats = new_table(&header);
        let rows: [(&str, fn(&ColumnSummary) -> Option<f64>); 8] = [
            ("count", |c| Some(c.count as f64)),
            ("mean", |c| c.mean),
            ("std", |c| c.std),
            ("min", |c| c.min),
            ("25%", |c| c.q25),
            ("50%", |c| c.median),
            ("75%", |c| c.q75),
            ("max", |c| c.max),
        ];
        for (label, get) in rows {
            let mut cells = vec![Cell::new(label).style_spec("b")];
            cells.extend(describe.iter().map(|c| num_cell(&opt_f64(get(c), 2))));
            stats.add_row(Row::new(cells));
        }
        self.print_table(&stats)
    }

    fn national_trend(&mut self, trend: &NationalTrend) -> Result<()> {
        self.heading(Section::NationalTrend)?;
        let max = trend
            .actual
            .iter()
            .map(|(_, p)| *p)
            .chain(std::iter::once(trend.forecast))
            .max()
            .unwrap_or(0) as f64;

        let mut table = new_table(&["Year", "Population", ""]);
        for (year, pop) in &trend.actual {
            table.add_row(Row::new(vec![
                Cell::new(&year.to_string()),
                num_cell(&thousands(*pop)),
                Cell::new(&bar(*pop as f64, max)),
            ]));
        }
        table.add_row(Row::new(vec![
            Cell::new(&format!("{} (forecast)", trend.target_year)).style_spec("i"),
            num_cell(&thousands(trend.forecast)).style_spec("ri"),
            Cell::new(&bar(trend.forecast as f64, max).replace('█', "╌")),
        ]));
        self.print_table(&table)
    }

    fn regional_delta(&mut self, delta: &RegionalDelta, top_k: usize, scale: i64) -> Result<()> {
        self.heading(Section::RegionalDelta)?;
        writeln!(
            self.out,
            "Population change {} → {} (×{})",
            delta.base_year,
            delta.last_year,
            thousands(scale)
        )?;

        let scaled = delta.scaled(scale);
        let max_abs = scaled.iter().map(|(_, v)| v.abs()).fold(0.0, f64::max);
        let mut table = new_table(&["Region", "Δ", ""]);
        for (label, v) in &scaled {
            table.add_row(Row::new(vec![
                Cell::new(label),
                num_cell(&thousands_f64(*v)),
                Cell::new(&bar(*v, max_abs)),
            ]));
        }
        self.print_table(&table)?;

        let names = |ds: &[crate::aggregate::RegionDelta]| {
            ds.iter().map(|d| d.label()).collect::<Vec<_>>().join(", ")
        };
        writeln!(self.out, "Top {top_k} rising:    {}", names(delta.top_rising(top_k)))?;
        writeln!(self.out, "Top {top_k} declining: {}", names(delta.top_declining(top_k)))?;
        Ok(())
    }

    fn top_diffs(&mut self, diffs: &TopDiffs) -> Result<()> {
        self.heading(Section::TopDiffs)?;
        writeln!(
            self.out,
            "{} records, colour range {} .. {}",
            diffs.rows.len(),
            signed_thousands(diffs.scale.vmin()),
            signed_thousands(diffs.scale.vmax())
        )?;

        let mut table = new_table(&[
            "Region",
            "Name",
            "Year",
            "Population",
            "Births",
            "Deaths",
            "diff",
            "",
        ]);
        for row in &diffs.rows {
            let rec = &row.record;
            let (style, marker) = bucket_style(diffs.scale.bucket(row.diff));
            table.add_row(Row::new(vec![
                Cell::new(&rec.region),
                Cell::new(rec.region_en.unwrap_or("")),
                Cell::new(&rec.year.to_string()),
                num_cell(&thousands(rec.population)),
                num_cell(&thousands(rec.births)),
                num_cell(&thousands(rec.deaths)),
                Cell::new(&signed_thousands(row.diff)).style_spec(style),
                Cell::new(marker),
            ]));
        }
        self.print_table(&table)
    }

    fn heatmap(&mut self, heatmap: &Heatmap, scale: i64) -> Result<()> {
        self.heading(Section::Heatmap)?;
        writeln!(self.out, "Population by region and year (×{})", thousands(scale))?;

        let scaled = heatmap.scaled(scale);
        let present = scaled.iter().flatten().flatten().copied();
        let (lo, hi) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        let years: Vec<String> = heatmap.years.iter().map(|y| y.to_string()).collect();
        let mut header = vec!["Region"];
        header.extend(years.iter().map(String::as_str));
        let mut table = new_table(&header);
        for (name, row) in heatmap.regions.iter().zip(&scaled) {
            let mut cells = vec![Cell::new(name)];
            cells.extend(row.iter().map(|v| match v {
                Some(v) => num_cell(&format!("{}{}", shade(*v, lo, hi), thousands_f64(*v))),
                None => num_cell("-"),
            }));
            table.add_row(Row::new(cells));
        }
        self.print_table(&table)
    }

    fn area(&mut self, area: &AreaTable, scale: i64) -> Result<()> {
        self.heading(Section::Area)?;
        writeln!(self.out, "Population (×{}) stacked by region", thousands(scale))?;

        let mut header = vec!["Year"];
        header.extend(area.regions.iter().copied());
        header.push("Total");
        let mut table = new_table(&header);

        let series = area.series(scale);
        for (i, year) in area.years.iter().enumerate() {
            let mut cells = vec![Cell::new(&year.to_string())];
            let mut total = 0.0;
            for (_, ys) in &series {
                total += ys[i];
                cells.push(num_cell(&thousands_f64(ys[i])));
            }
            cells.push(num_cell(&thousands_f64(total)).style_spec("rb"));
            table.add_row(Row::new(cells));
        }
        self.print_table(&table)
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("flushing output")?;
        Ok(())
    }
}
