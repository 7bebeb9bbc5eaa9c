// src/render/json.rs
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::io::Write;

use super::{Section, ViewRenderer};
use crate::aggregate::{AreaTable, Heatmap, RegionalDelta, TopDiffs};
use crate::forecast::NationalTrend;
use crate::stats::{ColumnSummary, Overview};

/// Collects chart-ready sections into one JSON document, written on `finish`.
pub struct JsonRenderer<W: Write> {
    out: W,
    sections: Map<String, Value>,
    notices: Vec<Value>,
    prompt: Option<String>,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sections: Map::new(),
            notices: Vec::new(),
            prompt: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn section(&mut self, section: Section, value: Value) {
        let key = serde_json::to_value(section)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| section.title().to_string());
        self.sections.insert(key, value);
    }

    pub fn document(&self) -> Value {
        json!({
            "generated_at": Utc::now().to_rfc3339(),
            "prompt": self.prompt,
            "notices": self.notices,
            "sections": self.sections,
        })
    }
}

impl<W: Write> ViewRenderer for JsonRenderer<W> {
    fn prompt(&mut self, message: &str) -> Result<()> {
        self.prompt = Some(message.to_string());
        Ok(())
    }

    fn notice(&mut self, section: Section, message: &str) -> Result<()> {
        self.notices.push(json!({ "section": section, "message": message }));
        Ok(())
    }

    fn overview(&mut self, overview: &Overview, describe: &[ColumnSummary]) -> Result<()> {
        self.section(
            Section::BasicStats,
            json!({ "info": overview, "describe": describe }),
        );
        Ok(())
    }

    fn national_trend(&mut self, trend: &NationalTrend) -> Result<()> {
        let (years, pops): (Vec<i32>, Vec<i64>) = trend.actual.iter().copied().unzip();
        self.section(
            Section::NationalTrend,
            json!({
                "chart": "line",
                "x_label": "Year",
                "y_label": "Population",
                "series": [
                    { "label": "Actual", "marker": "o", "x": years, "y": pops },
                    {
                        "label": format!("Forecast {}", trend.target_year),
                        "marker": "^",
                        "line_style": "dashed",
                        "x": [trend.forecast_segment[0].0, trend.forecast_segment[1].0],
                        "y": [trend.forecast_segment[0].1, trend.forecast_segment[1].1],
                    }
                ],
                "forecast": trend.forecast,
            }),
        );
        Ok(())
    }

    fn regional_delta(&mut self, delta: &RegionalDelta, top_k: usize, scale: i64) -> Result<()> {
        let labels = |ds: &[crate::aggregate::RegionDelta]| -> Vec<String> {
            ds.iter().map(|d| d.label().to_string()).collect()
        };
        let bars: Vec<Value> = delta
            .scaled(scale)
            .into_iter()
            .map(|(label, v)| json!({ "label": label, "value": v }))
            .collect();
        self.section(
            Section::RegionalDelta,
            json!({
                "chart": "barh",
                "x_label": format!("Δ (×{scale})"),
                "base_year": delta.base_year,
                "last_year": delta.last_year,
                "bars": bars,
                "top_rising": labels(delta.top_rising(top_k)),
                "top_declining": labels(delta.top_declining(top_k)),
            }),
        );
        Ok(())
    }

    fn top_diffs(&mut self, diffs: &TopDiffs) -> Result<()> {
        let rows = diffs
            .rows
            .iter()
            .map(|row| {
                let mut v = serde_json::to_value(row).context("serializing diff row")?;
                if let Value::Object(obj) = &mut v {
                    obj.insert("color".into(), json!(diffs.scale.position(row.diff)));
                    obj.insert("bucket".into(), json!(diffs.scale.bucket(row.diff)));
                }
                Ok(v)
            })
            .collect::<Result<Vec<Value>>>()?;
        self.section(
            Section::TopDiffs,
            json!({
                "chart": "table",
                "cmap": "coolwarm",
                "vmin": diffs.scale.vmin(),
                "vmax": diffs.scale.vmax(),
                "rows": rows,
            }),
        );
        Ok(())
    }

    fn heatmap(&mut self, heatmap: &Heatmap, scale: i64) -> Result<()> {
        self.section(
            Section::Heatmap,
            json!({
                "chart": "heatmap",
                "cmap": "YlGnBu",
                "x_label": "Year",
                "y_label": "Region",
                "scale": scale,
                "rows": heatmap.regions,
                "columns": heatmap.years,
                "values": heatmap.scaled(scale),
            }),
        );
        Ok(())
    }

    fn area(&mut self, area: &AreaTable, scale: i64) -> Result<()> {
        let series: Vec<Value> = area
            .series(scale)
            .into_iter()
            .map(|(label, ys)| json!({ "label": label, "y": ys }))
            .collect();
        self.section(
            Section::Area,
            json!({
                "chart": "stackplot",
                "x_label": "Year",
                "y_label": format!("Population (×{scale})"),
                "x": area.years,
                "series": series,
            }),
        );
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let doc = self.document();
        serde_json::to_writer_pretty(&mut self.out, &doc).context("serializing report")?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{regional_delta, top_diffs};
    use crate::config::ForecastConfig;
    use crate::forecast::national_trend;
    use crate::load::{load_population_bytes, tests::SAMPLE};

    #[test]
    fn writes_sections_on_finish() {
        let table = load_population_bytes(SAMPLE.as_bytes()).unwrap();
        let mut r = JsonRenderer::new(Vec::new());
        r.national_trend(&national_trend(&table, &ForecastConfig::default()).unwrap())
            .unwrap();
        r.regional_delta(&regional_delta(&table, 3).unwrap(), 3, 1000)
            .unwrap();
        r.top_diffs(&top_diffs(&table, 100)).unwrap();
        r.notice(Section::Heatmap, "nothing to show").unwrap();
        r.finish().unwrap();

        let doc: Value = serde_json::from_slice(&r.into_inner()).unwrap();
        let trend = &doc["sections"]["national_trend"];
        assert_eq!(trend["forecast"], 160);
        assert_eq!(trend["series"][1]["x"], json!([2022, 2035]));

        let delta = &doc["sections"]["regional_delta"];
        assert_eq!(delta["base_year"], 2020);
        assert_eq!(delta["top_rising"][0], "Sejong");

        let rows = doc["sections"]["top_diffs"]["rows"].as_array().unwrap();
        assert!(rows.iter().all(|r| r["region"] != "전국"));
        assert!(rows
            .iter()
            .all(|r| r.is_object() && r["color"].is_number() && !r["bucket"].is_null()));
        assert!(rows[0]["diff"].as_i64().unwrap() >= rows[1]["diff"].as_i64().unwrap());

        assert_eq!(doc["notices"][0]["section"], "heatmap");
        assert!(doc["prompt"].is_null());
    }

    #[test]
    fn prompt_only_document() {
        let mut r = JsonRenderer::new(Vec::new());
        r.prompt("upload").unwrap();
        r.finish().unwrap();
        let doc: Value = serde_json::from_slice(&r.into_inner()).unwrap();
        assert_eq!(doc["prompt"], "upload");
        assert!(doc["sections"].as_object().unwrap().is_empty());
    }
}
