use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::profiler::statistics::{iqr_bounds, quartiles};
use crate::profiler::{OutlierBounds, numeric_columns};
use crate::types::{ColumnTypes, Dataset, MissingValueInfo, OutlierInfo, QualityReport, Record};
use crate::utils::{is_missing, numeric_values, round_to};

pub struct QualityAnalyzer;

impl QualityAnalyzer {
    /// Build the quality report of a dataset: missing values per column,
    /// duplicate rows and IQR outliers of numeric columns.
    ///
    /// An empty dataset yields a zeroed report.
    pub fn analyze(
        dataset: &Dataset,
        column_types: &ColumnTypes,
        config: &AnalysisConfig,
    ) -> QualityReport {
        let missing = Self::analyze_missing_values(dataset);
        let duplicate_count = Self::count_duplicates(dataset);
        let outliers = Self::analyze_outliers(dataset, column_types, config);

        info!(
            "Quality analysis: {} rows, {} missing cells, {} duplicates, {} columns with outliers",
            dataset.len(),
            missing.iter().map(|m| m.count).sum::<usize>(),
            duplicate_count,
            outliers.len()
        );

        QualityReport {
            total_rows: dataset.len(),
            total_columns: dataset.column_count(),
            missing,
            duplicate_count,
            outliers,
        }
    }

    /// Missing count of every column, in column order.
    pub fn analyze_missing_values(dataset: &Dataset) -> Vec<MissingValueInfo> {
        let rows = dataset.len();
        dataset
            .columns()
            .iter()
            .map(|column| {
                let count = dataset.column_values(column).filter(|v| is_missing(v)).count();
                let percentage = if rows == 0 {
                    0.0
                } else {
                    round_to(count as f64 / rows as f64 * 100.0, 1)
                };
                MissingValueInfo {
                    column: column.clone(),
                    count,
                    percentage,
                }
            })
            .collect()
    }

    /// Canonical identity of a record: its JSON form with keys sorted.
    ///
    /// Two records are duplicates exactly when their keys are equal.
    pub fn duplicate_key(record: &Record) -> String {
        let mut keys: Vec<&String> = record.keys().collect();
        keys.sort();
        let sorted: serde_json::Map<String, Value> = keys
            .into_iter()
            .map(|k| (k.clone(), record[k.as_str()].clone()))
            .collect();
        Value::Object(sorted).to_string()
    }

    /// Rows minus distinct rows.
    pub fn count_duplicates(dataset: &Dataset) -> usize {
        let distinct: HashSet<String> = dataset.records().iter().map(Self::duplicate_key).collect();
        dataset.len() - distinct.len()
    }

    /// IQR diagnostics of one column, `None` when it has fewer parseable
    /// values than `min_outlier_values`.
    ///
    /// The column type is not checked here; callers decide which columns
    /// are numeric.
    pub fn outlier_bounds(
        dataset: &Dataset,
        column: &str,
        config: &AnalysisConfig,
    ) -> Option<OutlierInfo> {
        let values = numeric_values(dataset, column);
        if values.len() < config.min_outlier_values {
            debug!(
                "Column '{}' has {} numeric values, skipping outlier detection",
                column,
                values.len()
            );
            return None;
        }

        let q = quartiles(&values)?;
        let bounds = iqr_bounds(&q, config.iqr_multiplier);
        let count = values.iter().filter(|&&v| bounds.is_outlier(v)).count();

        Some(OutlierInfo {
            column: column.to_string(),
            count,
            q1: q.q1,
            q3: q.q3,
            iqr: bounds.iqr,
            lower_bound: bounds.lower,
            upper_bound: bounds.upper,
        })
    }

    fn analyze_outliers(
        dataset: &Dataset,
        column_types: &ColumnTypes,
        config: &AnalysisConfig,
    ) -> Vec<OutlierInfo> {
        numeric_columns(dataset, column_types)
            .into_iter()
            .filter_map(|column| Self::outlier_bounds(dataset, column, config))
            .filter(|info| info.count > 0)
            .collect()
    }
}

impl From<&OutlierInfo> for OutlierBounds {
    fn from(info: &OutlierInfo) -> Self {
        OutlierBounds {
            lower: info.lower_bound,
            upper: info.upper_bound,
            iqr: info.iqr,
        }
    }
}
