//! Type inference logic for column analysis.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::types::{ColumnType, ColumnTypes, Dataset};
use crate::utils::{is_missing, parse_date, parse_number, value_to_string};

/// Classifies columns as numeric, date, categorical or text.
pub struct TypeInferrer;

impl TypeInferrer {
    /// Infer the type of every column in the dataset.
    pub fn classify(dataset: &Dataset, config: &AnalysisConfig) -> ColumnTypes {
        dataset
            .columns()
            .iter()
            .map(|column| {
                let column_type = Self::classify_column(dataset, column, config);
                debug!("Column '{}' inferred as {}", column, column_type);
                (column.clone(), column_type)
            })
            .collect()
    }

    /// Infer the type of a single column from its first non-missing values.
    pub fn classify_column(dataset: &Dataset, column: &str, config: &AnalysisConfig) -> ColumnType {
        let sample: Vec<&Value> = dataset
            .column_values(column)
            .filter(|v| !is_missing(v))
            .take(config.type_sample_size)
            .collect();

        Self::classify_sample(&sample, config)
    }

    fn classify_sample(sample: &[&Value], config: &AnalysisConfig) -> ColumnType {
        if sample.is_empty() {
            return config.empty_column_type;
        }
        let n = sample.len() as f64;

        let numeric = sample.iter().filter(|v| parse_number(v).is_some()).count();
        if numeric as f64 / n > config.numeric_threshold {
            return ColumnType::Numeric;
        }

        let dates = sample.iter().filter(|v| parse_date(v).is_some()).count();
        if dates as f64 / n > config.date_threshold {
            return ColumnType::Date;
        }

        let distinct: HashSet<String> = sample.iter().map(|v| value_to_string(v)).collect();
        let distinct = distinct.len();
        if distinct < config.categorical_max_distinct
            || (distinct as f64 / n) < config.categorical_ratio
        {
            return ColumnType::Categorical;
        }

        ColumnType::Text
    }
}
