// src/export/mod.rs
//! Arrow record batches for the loaded table and derived views, written out
//! as Parquet.

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Int32Array, Int64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

use crate::aggregate::{RegionalDelta, TopDiffs};
use crate::load::{PopulationRecord, PopulationTable};

pub const POPULATION_FILE: &str = "population.parquet";
pub const DELTA_FILE: &str = "regional_delta.parquet";
pub const DIFFS_FILE: &str = "top_diffs.parquet";

fn record_fields() -> Vec<Field> {
    vec![
        Field::new("region", DataType::Utf8, false),
        Field::new("region_en", DataType::Utf8, true),
        Field::new("year", DataType::Int32, false),
        Field::new("population", DataType::Int64, false),
        Field::new("births", DataType::Int64, false),
        Field::new("deaths", DataType::Int64, false),
    ]
}

fn record_columns<'a, I>(records: I) -> Vec<ArrayRef>
where
    I: Iterator<Item = &'a PopulationRecord> + Clone,
{
    vec![
        Arc::new(StringArray::from_iter_values(
            records.clone().map(|r| r.region.as_str()),
        )),
        Arc::new(StringArray::from(
            records.clone().map(|r| r.region_en).collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from_iter_values(records.clone().map(|r| r.year))),
        Arc::new(Int64Array::from_iter_values(
            records.clone().map(|r| r.population),
        )),
        Arc::new(Int64Array::from_iter_values(records.clone().map(|r| r.births))),
        Arc::new(Int64Array::from_iter_values(records.map(|r| r.deaths))),
    ]
}

pub fn table_batch(table: &PopulationTable) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(record_fields()));
    RecordBatch::try_new(schema, record_columns(table.records().iter()))
        .context("building population record batch")
}

pub fn delta_batch(delta: &RegionalDelta) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("region", DataType::Utf8, false),
        Field::new("region_en", DataType::Utf8, true),
        Field::new("base_year", DataType::Int32, false),
        Field::new("last_year", DataType::Int32, false),
        Field::new("delta", DataType::Int64, false),
    ]));
    let n = delta.deltas.len();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            delta.deltas.iter().map(|d| d.region.as_str()),
        )),
        Arc::new(StringArray::from(
            delta.deltas.iter().map(|d| d.region_en).collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from(vec![delta.base_year; n])),
        Arc::new(Int32Array::from(vec![delta.last_year; n])),
        Arc::new(Int64Array::from_iter_values(
            delta.deltas.iter().map(|d| d.delta),
        )),
    ];
    RecordBatch::try_new(schema, columns).context("building delta record batch")
}

pub fn diffs_batch(diffs: &TopDiffs) -> Result<RecordBatch> {
    let mut fields = record_fields();
    fields.push(Field::new("diff", DataType::Int64, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns = record_columns(diffs.rows.iter().map(|d| &d.record));
    columns.push(Arc::new(Int64Array::from_iter_values(
        diffs.rows.iter().map(|d| d.diff),
    )));
    RecordBatch::try_new(schema, columns).context("building diff record batch")
}

/// Write `batch` to `path` via a temp file + rename so readers never see a
/// partial file.
pub fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<u64> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("parquet path has no file name")?;
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let file =
        File::create(&tmp_path).with_context(|| format!("creating {}", tmp_path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer")?;
    writer.write(batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    let bytes = fs::metadata(path)?.len();
    Ok(bytes)
}

/// Export the table and the tabular views into `dir`. Returns written paths.
pub fn write_views(
    dir: &Path,
    table: &PopulationTable,
    delta: Option<&RegionalDelta>,
    diffs: &TopDiffs,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut jobs = vec![(POPULATION_FILE, table_batch(table)?)];
    if let Some(delta) = delta {
        jobs.push((DELTA_FILE, delta_batch(delta)?));
    }
    jobs.push((DIFFS_FILE, diffs_batch(diffs)?));

    let mut written = Vec::with_capacity(jobs.len());
    for (name, batch) in jobs {
        let path = dir.join(name);
        let bytes = write_parquet(&batch, &path)?;
        info!(path = %path.display(), rows = batch.num_rows(), bytes, "exported");
        written.push(path);
    }
    Ok(written)
}
