use anyhow::{anyhow, bail, Context, Result};
use arrow::{
    array::{Array, StringArray},
    compute::concat_batches,
    csv::ReaderBuilder,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{fs, io::Cursor, path::Path, sync::Arc};
use tracing::debug;

pub mod date;

const BATCH_SIZE: usize = 8192;

/// Trim whitespace + strip outer quotes if present.
pub(crate) fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Read `path` as a comma-separated table with every column as nullable Utf8.
///
/// The header row names the columns; all typing happens downstream. A file
/// with headers but no data rows yields an empty batch.
pub fn load_csv(path: &Path) -> Result<RecordBatch> {
    if !path.exists() {
        bail!("data file not found: {}", path.display());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let header_line = content.lines().next().unwrap_or("");
    if header_line.trim().is_empty() {
        bail!("no header row in {}", path.display());
    }
    let headers: Vec<String> = header_line.split(',').map(clean_str).collect();

    let fields: Vec<Field> = headers
        .iter()
        .map(|n| Field::new(n, DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let cursor = Cursor::new(content.as_bytes());
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .with_quote(b'"')
        .with_delimiter(b',')
        .build(cursor)
        .context("creating CSV reader")?;

    let batches: Vec<RecordBatch> = reader
        .collect::<Result<_, _>>()
        .with_context(|| format!("parsing {}", path.display()))?;

    let batch = if batches.is_empty() {
        RecordBatch::new_empty(schema)
    } else {
        concat_batches(&schema, &batches).context("concatenating CSV batches")?
    };

    debug!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "loaded {}",
        path.display()
    );
    Ok(batch)
}

/// Index of a named column, if present.
pub fn column_index(batch: &RecordBatch, name: &str) -> Option<usize> {
    batch.schema().index_of(name).ok()
}

/// Downcast a column to `StringArray`. All columns are Utf8 in this pipeline.
pub(crate) fn utf8_column(batch: &RecordBatch, idx: usize) -> Result<StringArray> {
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| anyhow!("column {} is not Utf8", idx))
}

/// Plain-text preview of the first `n` rows, columns padded for alignment.
pub fn head(batch: &RecordBatch, n: usize) -> String {
    let rows = batch.num_rows().min(n);
    let schema = batch.schema();

    let mut columns: Vec<Vec<String>> = Vec::with_capacity(batch.num_columns());
    for (idx, field) in schema.fields().iter().enumerate() {
        let mut cells = Vec::with_capacity(rows + 1);
        cells.push(field.name().clone());
        if let Ok(arr) = utf8_column(batch, idx) {
            for r in 0..rows {
                cells.push(if arr.is_null(r) {
                    String::new()
                } else {
                    arr.value(r).to_string()
                });
            }
        }
        columns.push(cells);
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|c| c.iter().map(String::len).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for r in 0..=rows {
        let line = columns
            .iter()
            .zip(&widths)
            .map(|(cells, w)| {
                format!("{:<w$}", cells.get(r).map(String::as_str).unwrap_or(""), w = *w)
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
