//! Data profiling module for dataset analysis.
//!
//! This module provides:
//! - Type inference for columns ([`TypeInferrer`])
//! - Descriptive statistics ([`statistics`])
//! - Column-type lookups shared by the quality, insight and query modules

pub mod statistics;
mod type_inference;

pub use statistics::{NumericSummary, OutlierBounds, Quartiles};
pub use type_inference::TypeInferrer;

use crate::types::{ColumnType, ColumnTypes, Dataset};

/// Columns of the given type, in dataset column order.
pub fn columns_of_type<'a>(
    dataset: &'a Dataset,
    column_types: &'a ColumnTypes,
    column_type: ColumnType,
) -> impl Iterator<Item = &'a String> + 'a {
    dataset
        .columns()
        .iter()
        .filter(move |c| column_types.get(c.as_str()) == Some(&column_type))
}

/// Numeric columns in dataset column order.
pub fn numeric_columns<'a>(
    dataset: &'a Dataset,
    column_types: &'a ColumnTypes,
) -> Vec<&'a String> {
    columns_of_type(dataset, column_types, ColumnType::Numeric).collect()
}

/// Categorical columns in dataset column order.
pub fn categorical_columns<'a>(
    dataset: &'a Dataset,
    column_types: &'a ColumnTypes,
) -> Vec<&'a String> {
    columns_of_type(dataset, column_types, ColumnType::Categorical).collect()
}

/// Every unordered pair of numeric columns with its Pearson correlation,
/// in dataset column order.
pub fn numeric_correlations(
    dataset: &Dataset,
    column_types: &ColumnTypes,
) -> Vec<(String, String, f64)> {
    let numeric = numeric_columns(dataset, column_types);
    let mut correlations = Vec::new();
    for (i, a) in numeric.iter().enumerate() {
        for b in &numeric[i + 1..] {
            let pairs = statistics::paired_numeric(dataset, a, b);
            let r = statistics::pearson_correlation(&pairs);
            correlations.push(((*a).clone(), (*b).clone(), r));
        }
    }
    correlations
}
