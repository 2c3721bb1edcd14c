//! Statistical imputation methods.
//!
//! Provides row deletion, mean, mode and forward-fill strategies for missing
//! values. Each method returns the new dataset and the number of cells (or
//! rows, for deletion) it touched, and records a human-readable step.

use serde_json::Value;

use crate::error::{ExplorerError, Result};
use crate::profiler::statistics::{mean, mode};
use crate::types::{Dataset, Record};
use crate::utils::{is_missing, numeric_values, value_to_string};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Drop every row where the column is missing.
    pub fn delete_missing(
        dataset: &Dataset,
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<(Dataset, usize)> {
        dataset.require_column(column)?;

        let records: Vec<Record> = dataset
            .records()
            .iter()
            .filter(|r| !r.get(column).is_none_or(is_missing))
            .cloned()
            .collect();
        let removed = dataset.len() - records.len();

        processing_steps.push(format!(
            "Removed {} rows with missing '{}'",
            removed, column
        ));

        Ok((dataset.derive(records), removed))
    }

    /// Fill missing cells with the column mean, written as a 2-decimal string.
    pub fn apply_mean(
        dataset: &Dataset,
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<(Dataset, usize)> {
        dataset.require_column(column)?;

        let mean_val = mean(&numeric_values(dataset, column))
            .ok_or_else(|| ExplorerError::NoValidValues(column.to_string()))?;
        let fill = Value::String(format!("{:.2}", mean_val));

        let (filled, changed) = Self::fill_missing(dataset, column, &fill);
        processing_steps.push(format!(
            "Filled {} missing values in '{}' with mean: {:.2}",
            changed, column, mean_val
        ));

        Ok((filled, changed))
    }

    /// Fill missing cells with the most frequent value of the column.
    ///
    /// Frequencies are counted on the string form; the first original cell
    /// with the winning form is written back, so numbers stay numbers.
    pub fn apply_mode(
        dataset: &Dataset,
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<(Dataset, usize)> {
        dataset.require_column(column)?;

        let fill = Self::mode_value(dataset, column)
            .ok_or_else(|| ExplorerError::NoValidValues(column.to_string()))?;

        let (filled, changed) = Self::fill_missing(dataset, column, &fill);
        processing_steps.push(format!(
            "Filled {} missing values in '{}' with mode: '{}'",
            changed,
            column,
            value_to_string(&fill)
        ));

        Ok((filled, changed))
    }

    /// Carry the last non-missing value forward. Leading missing cells have
    /// nothing to copy and stay missing.
    pub fn forward_fill(
        dataset: &Dataset,
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<(Dataset, usize)> {
        dataset.require_column(column)?;

        let mut last: Option<Value> = None;
        let mut changed = 0;
        let records: Vec<Record> = dataset
            .records()
            .iter()
            .map(|record| {
                let mut record = record.clone();
                if let Some(cell) = record.get_mut(column) {
                    if !is_missing(cell) {
                        last = Some(cell.clone());
                    } else if let Some(prev) = &last {
                        *cell = prev.clone();
                        changed += 1;
                    }
                }
                record
            })
            .collect();

        processing_steps.push(format!(
            "Forward filled {} missing values in '{}'",
            changed, column
        ));

        Ok((dataset.derive(records), changed))
    }

    /// Most frequent non-missing cell of a column, ties to the first seen.
    pub fn mode_value(dataset: &Dataset, column: &str) -> Option<Value> {
        let present: Vec<&Value> = dataset.column_values(column).filter(|v| !is_missing(v)).collect();

        let winner = mode(present.iter().map(|v| value_to_string(v)))?;

        present
            .into_iter()
            .find(|v| value_to_string(v) == winner)
            .cloned()
    }

    fn fill_missing(dataset: &Dataset, column: &str, fill: &Value) -> (Dataset, usize) {
        let mut changed = 0;
        let records: Vec<Record> = dataset
            .records()
            .iter()
            .map(|record| {
                let mut record = record.clone();
                if let Some(cell) = record.get_mut(column)
                    && is_missing(cell)
                {
                    *cell = fill.clone();
                    changed += 1;
                }
                record
            })
            .collect();
        (dataset.derive(records), changed)
    }
}
