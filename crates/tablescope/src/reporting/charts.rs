//! Chart-ready series. Rendering is left to the host.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::profiler::statistics::frequencies;
use crate::profiler::{categorical_columns, numeric_columns};
use crate::types::{ColumnTypes, Dataset};
use crate::utils::{numeric_values, parse_number, value_to_string};

/// One bar or pie slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// One point of a line chart; `index` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub index: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Columns available for each chart kind, in dataset column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSuggestions {
    /// Categorical columns for bar and pie charts.
    pub frequency_columns: Vec<String>,
    /// Numeric columns for line charts.
    pub trend_columns: Vec<String>,
    /// Default x/y pair for a scatter plot (first two numeric columns).
    pub scatter_pair: Option<(String, String)>,
}

impl ChartSuggestions {
    pub fn for_dataset(dataset: &Dataset, column_types: &ColumnTypes) -> Self {
        let numeric: Vec<String> = numeric_columns(dataset, column_types)
            .into_iter()
            .cloned()
            .collect();
        let scatter_pair = match numeric.as_slice() {
            [x, y, ..] => Some((x.clone(), y.clone())),
            _ => None,
        };
        Self {
            frequency_columns: categorical_columns(dataset, column_types)
                .into_iter()
                .cloned()
                .collect(),
            trend_columns: numeric,
            scatter_pair,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frequency_columns.is_empty() && self.trend_columns.is_empty()
    }
}

/// Value counts of a column in order of first appearance (missing cells count as `""`).
pub fn frequency_series(dataset: &Dataset, column: &str) -> Result<Vec<CategoryCount>> {
    dataset.require_column(column)?;
    Ok(
        frequencies(dataset.column_values(column).map(value_to_string))
            .into_iter()
            .map(|(label, count)| CategoryCount { label, count })
            .collect(),
    )
}

/// Parsed numeric values of a column, numbered from 1.
pub fn numeric_series(dataset: &Dataset, column: &str) -> Result<Vec<SeriesPoint>> {
    dataset.require_column(column)?;
    Ok(numeric_values(dataset, column)
        .into_iter()
        .enumerate()
        .map(|(i, value)| SeriesPoint {
            index: i + 1,
            value,
        })
        .collect())
}

/// Rows where both columns parse as numbers.
pub fn scatter_points(dataset: &Dataset, x: &str, y: &str) -> Result<Vec<ScatterPoint>> {
    dataset.require_column(x)?;
    dataset.require_column(y)?;
    Ok(dataset
        .records()
        .iter()
        .filter_map(|record| {
            Some(ScatterPoint {
                x: parse_number(record.get(x)?)?,
                y: parse_number(record.get(y)?)?,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dataset() -> Dataset {
        Dataset::from_records(
            [
                json!({"city": "NY", "x": "1", "y": "10"}),
                json!({"city": "LA", "x": "oops", "y": "20"}),
                json!({"city": "NY", "x": "3", "y": ""}),
                json!({"city": null, "x": "4", "y": "40"}),
            ]
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_frequency_series() {
        let series = frequency_series(&dataset(), "city").unwrap();
        assert_eq!(
            series,
            vec![
                CategoryCount { label: "NY".to_string(), count: 2 },
                CategoryCount { label: "LA".to_string(), count: 1 },
                CategoryCount { label: "".to_string(), count: 1 },
            ]
        );
        assert!(frequency_series(&dataset(), "nope").is_err());
    }

    #[test]
    fn test_numeric_series_skips_unparseable() {
        let series = numeric_series(&dataset(), "x").unwrap();
        let values: Vec<(usize, f64)> = series.iter().map(|p| (p.index, p.value)).collect();
        assert_eq!(values, vec![(1, 1.0), (2, 3.0), (3, 4.0)]);
    }

    #[test]
    fn test_scatter_points() {
        let points = scatter_points(&dataset(), "x", "y").unwrap();
        assert_eq!(
            points,
            vec![ScatterPoint { x: 1.0, y: 10.0 }, ScatterPoint { x: 4.0, y: 40.0 }]
        );
    }

    #[test]
    fn test_chart_suggestions() {
        let mut types = ColumnTypes::new();
        types.insert("city".to_string(), ColumnType::Categorical);
        types.insert("x".to_string(), ColumnType::Numeric);
        types.insert("y".to_string(), ColumnType::Numeric);

        let suggestions = ChartSuggestions::for_dataset(&dataset(), &types);
        assert_eq!(suggestions.frequency_columns, vec!["city".to_string()]);
        assert_eq!(suggestions.trend_columns, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(
            suggestions.scatter_pair,
            Some(("x".to_string(), "y".to_string()))
        );
    }
}
