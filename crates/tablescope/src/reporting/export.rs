//! Export formats: quoted CSV, a plain-text summary and a JSON insights document.
//!
//! These are pure serializations; writing them anywhere is the host's job.

use chrono::Utc;
use polars::prelude::*;
use serde_json::{Value, json};

use crate::error::{Result, ResultExt};
use crate::profiler::statistics;
use crate::types::{ColumnType, ColumnTypes, Dataset, Insight, QualityReport};
use crate::utils::{is_missing, numeric_values, present_strings, round_to, value_to_string};

/// Serialize a dataset as CSV with a header row and every value double-quoted.
///
/// Missing cells are written as empty quoted strings.
pub fn to_csv(dataset: &Dataset) -> Result<String> {
    let columns: Vec<Column> = dataset
        .columns()
        .iter()
        .map(|name| {
            let values: Vec<String> = dataset.column_values(name).map(value_to_string).collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();
    let mut df = DataFrame::new(columns).context("Building export frame")?;

    let mut buffer: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .with_quote_style(QuoteStyle::Always)
        .finish(&mut df)
        .context("Writing CSV export")?;

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Plain-text "DATA SUMMARY" report: per column its type, mean/min/max for
/// numeric columns or the unique count otherwise, and missing counts.
pub fn summary_text(file_name: &str, dataset: &Dataset, column_types: &ColumnTypes) -> String {
    let mut summary = String::from("DATA SUMMARY\n");
    summary.push_str(&"=".repeat(50));
    summary.push_str("\n\n");
    summary.push_str(&format!("File: {}\n", file_name));
    summary.push_str(&format!("Total Rows: {}\n", dataset.len()));
    summary.push_str(&format!("Total Columns: {}\n\n", dataset.column_count()));

    summary.push_str("COLUMN DETAILS:\n");
    summary.push_str(&"-".repeat(50));
    summary.push('\n');

    for column in dataset.columns() {
        let column_type = column_types.get(column).copied().unwrap_or(ColumnType::Text);
        summary.push_str(&format!("\n{} ({})\n", column, column_type));

        if column_type == ColumnType::Numeric {
            let values = numeric_values(dataset, column);
            if let Some(stats) = statistics::NumericSummary::from_values(&values) {
                summary.push_str(&format!("  Mean: {:.2}\n", stats.mean));
                summary.push_str(&format!("  Min: {}\n", stats.min));
                summary.push_str(&format!("  Max: {}\n", stats.max));
            }
        } else {
            let unique = statistics::frequencies(present_strings(dataset, column)).len();
            summary.push_str(&format!("  Unique values: {}\n", unique));
        }

        let missing = dataset.column_values(column).filter(|v| is_missing(v)).count();
        if missing > 0 {
            summary.push_str(&format!(
                "  Missing: {} ({:.1}%)\n",
                missing,
                missing as f64 / dataset.len() as f64 * 100.0
            ));
        }
    }

    summary
}

/// JSON insights document.
///
/// Keys: `fileName`, `totalRows`, `totalColumns`, `columnTypes`,
/// `missingValues` (columns with at least one missing cell), `duplicates`,
/// `outliers`, `insights` and `generatedAt` (RFC 3339, UTC).
pub fn insights_document(
    file_name: &str,
    dataset: &Dataset,
    column_types: &ColumnTypes,
    report: &QualityReport,
    insights: &[Insight],
) -> Result<Value> {
    let types: serde_json::Map<String, Value> = dataset
        .columns()
        .iter()
        .filter_map(|c| Some((c.clone(), json!(column_types.get(c)?))))
        .collect();

    let missing: serde_json::Map<String, Value> = report
        .columns_with_missing()
        .map(|m| {
            let percentage = if report.total_rows == 0 {
                0.0
            } else {
                round_to(m.count as f64 / report.total_rows as f64 * 100.0, 2)
            };
            (
                m.column.clone(),
                json!({"count": m.count, "percentage": percentage}),
            )
        })
        .collect();

    Ok(json!({
        "fileName": file_name,
        "totalRows": dataset.len(),
        "totalColumns": dataset.column_count(),
        "columnTypes": types,
        "missingValues": missing,
        "duplicates": report.duplicate_count,
        "outliers": serde_json::to_value(&report.outliers)?,
        "insights": serde_json::to_value(insights)?,
        "generatedAt": Utc::now().to_rfc3339(),
    }))
}
