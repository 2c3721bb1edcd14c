//! Outlier remediation against precomputed IQR bounds.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::profiler::OutlierBounds;
use crate::types::{Dataset, Record};
use crate::utils::parse_number;

/// Drop rows whose value in the column parses as a number outside the bounds.
///
/// Rows with missing or non-numeric cells are kept.
pub(crate) fn remove_outliers(
    dataset: &Dataset,
    column: &str,
    bounds: &OutlierBounds,
    processing_steps: &mut Vec<String>,
) -> Result<(Dataset, usize)> {
    dataset.require_column(column)?;

    let records: Vec<Record> = dataset
        .records()
        .iter()
        .filter(|record| {
            record
                .get(column)
                .and_then(parse_number)
                .is_none_or(|v| !bounds.is_outlier(v))
        })
        .cloned()
        .collect();
    let removed = dataset.len() - records.len();

    debug!(
        "Outlier bounds for '{}': [{:.2}, {:.2}]",
        column, bounds.lower, bounds.upper
    );
    processing_steps.push(format!(
        "Removed {} rows with outliers in '{}' (outside {:.2} to {:.2})",
        removed, column, bounds.lower, bounds.upper
    ));

    Ok((dataset.derive(records), removed))
}

/// Clamp out-of-bound values to the nearest bound, written as numbers.
pub(crate) fn cap_outliers(
    dataset: &Dataset,
    column: &str,
    bounds: &OutlierBounds,
    processing_steps: &mut Vec<String>,
) -> Result<(Dataset, usize)> {
    dataset.require_column(column)?;

    let mut capped = 0;
    let records: Vec<Record> = dataset
        .records()
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if let Some(cell) = record.get_mut(column)
                && let Some(v) = parse_number(cell)
                && bounds.is_outlier(v)
            {
                *cell = Value::from(bounds.clamp(v));
                capped += 1;
            }
            record
        })
        .collect();

    processing_steps.push(format!(
        "Capped {} outliers in '{}' to {:.2} to {:.2}",
        capped, column, bounds.lower, bounds.upper
    ));

    Ok((dataset.derive(records), capped))
}

/// Leave the column as it is; only the decision is recorded.
pub(crate) fn keep_outliers(
    dataset: &Dataset,
    column: &str,
    processing_steps: &mut Vec<String>,
) -> Result<(Dataset, usize)> {
    dataset.require_column(column)?;
    processing_steps.push(format!("Kept outliers in '{}' unchanged", column));
    Ok((dataset.clone(), 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values_dataset(values: &[Value]) -> Dataset {
        Dataset::from_records(
            values
                .iter()
                .map(|v| json!({"v": v}).as_object().cloned().unwrap())
                .collect(),
        )
        .unwrap()
    }

    const BOUNDS: OutlierBounds = OutlierBounds {
        lower: -2.5,
        upper: 9.5,
        iqr: 3.0,
    };

    #[test]
    fn test_remove_outliers_keeps_non_numeric_rows() {
        let ds = values_dataset(&[json!("1"), json!("100"), json!(""), json!("n/a"), json!("-10")]);
        let (result, removed) = remove_outliers(&ds, "v", &BOUNDS, &mut Vec::new()).unwrap();

        assert_eq!(removed, 2);
        let kept: Vec<Value> = result.column_values("v").cloned().collect();
        assert_eq!(kept, vec![json!("1"), json!(""), json!("n/a")]);
    }

    #[test]
    fn test_cap_outliers_writes_bounds_as_numbers() {
        let ds = values_dataset(&[json!("1"), json!("100"), json!("-10"), json!("9.5")]);
        let (result, capped) = cap_outliers(&ds, "v", &BOUNDS, &mut Vec::new()).unwrap();

        assert_eq!(capped, 2);
        let values: Vec<Value> = result.column_values("v").cloned().collect();
        assert_eq!(values, vec![json!("1"), json!(9.5), json!(-2.5), json!("9.5")]);
    }

    #[test]
    fn test_keep_outliers_is_noop() {
        let ds = values_dataset(&[json!("1"), json!("100")]);
        let mut steps = Vec::new();
        let (result, changed) = keep_outliers(&ds, "v", &mut steps).unwrap();
        assert_eq!(result, ds);
        assert_eq!(changed, 0);
        assert_eq!(steps.len(), 1);
    }
}
