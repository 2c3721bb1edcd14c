//! CSV loading into a [`Dataset`].
//!
//! This is the only place the library touches files. Every column is read as
//! text so that type inference sees the values as they appear in the file;
//! empty fields become nulls.

use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, ResultExt};
use crate::types::{Dataset, Record};

/// Load a CSV file with a header row.
///
/// Falls back to reading without quote handling when the standard parse fails.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    info!("Loading dataset from: {}", path.display());

    let df = match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
    {
        Ok(df) => df,
        Err(e) => {
            debug!("Standard loading failed: {}", e);
            CsvReadOptions::default()
                .with_infer_schema_length(Some(0))
                .with_has_header(true)
                .with_parse_options(CsvParseOptions::default().with_quote_char(None))
                .try_into_reader_with_file_path(Some(path.to_path_buf()))?
                .finish()
                .context(format!("Reading CSV file {}", path.display()))?
        }
    };

    let dataset = dataset_from_dataframe(&df)?;
    info!(
        "Dataset loaded successfully: {} rows, {} columns",
        dataset.len(),
        dataset.column_count()
    );
    Ok(dataset)
}

/// Parse CSV text with a header row.
pub fn read_csv_str(content: &str) -> Result<Dataset> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(content.as_bytes().to_vec()))
        .finish()
        .context("Parsing CSV text")?;
    dataset_from_dataframe(&df)
}

/// Convert a DataFrame into records, casting every column to text.
///
/// Nulls stay nulls; everything else becomes a string cell.
pub fn dataset_from_dataframe(df: &DataFrame) -> Result<Dataset> {
    let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();

    let mut columns: Vec<Vec<Option<String>>> = Vec::with_capacity(names.len());
    for column in df.get_columns() {
        let series = column
            .as_materialized_series()
            .cast(&DataType::String)
            .context(format!("Casting column '{}' to text", column.name()))?;
        let values = series.str()?.into_iter().map(|v| v.map(str::to_string)).collect();
        columns.push(values);
    }

    let records: Vec<Record> = (0..df.height())
        .map(|row| {
            names
                .iter()
                .zip(&columns)
                .map(|(name, values)| {
                    let cell = match &values[row] {
                        Some(s) => Value::String(s.clone()),
                        None => Value::Null,
                    };
                    (name.clone(), cell)
                })
                .collect()
        })
        .collect();

    if records.is_empty() {
        return Ok(Dataset::with_columns(names));
    }
    Dataset::from_records(records)
}
