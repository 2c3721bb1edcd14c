//! Row filtering by allowed column values.
//!
//! A [`FilterSet`] maps columns to the string-coerced values a row may hold
//! in that column. Columns without an entry are unconstrained.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EmptySelectionPolicy;
use crate::profiler::statistics::frequencies;
use crate::types::{ColumnType, ColumnTypes, Dataset, Record};
use crate::utils::{is_missing, value_to_string};

/// Column to allowed-values constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    constraints: HashMap<String, HashSet<String>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one allowed value to a column's constraint, creating it if needed.
    pub fn allow(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.constraints
            .entry(column.into())
            .or_default()
            .insert(value.into());
    }

    /// Replace a column's allowed values.
    pub fn set<I, S>(&mut self, column: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints
            .insert(column.into(), values.into_iter().map(Into::into).collect());
    }

    /// Drop a column's constraint; returns whether one existed.
    pub fn remove(&mut self, column: &str) -> bool {
        self.constraints.remove(column).is_some()
    }

    pub fn clear(&mut self) {
        self.constraints.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn allowed(&self, column: &str) -> Option<&HashSet<String>> {
        self.constraints.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HashSet<String>)> {
        self.constraints.iter()
    }
}

/// Distinct values a filterable column offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub column: String,
    pub column_type: ColumnType,
    /// Distinct non-missing values in order of first appearance.
    pub values: Vec<String>,
}

/// Applies filter sets to datasets.
pub struct FilterEngine;

impl FilterEngine {
    /// Keep the records whose value in every constrained column is allowed.
    pub fn apply(dataset: &Dataset, filters: &FilterSet, policy: EmptySelectionPolicy) -> Dataset {
        if filters.is_empty() {
            return dataset.clone();
        }

        let records: Vec<Record> = dataset
            .records()
            .iter()
            .filter(|record| Self::matches(record, filters, policy))
            .cloned()
            .collect();

        debug!(
            "Filtered {} rows down to {} with {} constraints",
            dataset.len(),
            records.len(),
            filters.len()
        );

        dataset.derive(records)
    }

    /// Whether a single record passes every constraint.
    pub fn matches(record: &Record, filters: &FilterSet, policy: EmptySelectionPolicy) -> bool {
        filters.iter().all(|(column, allowed)| {
            if allowed.is_empty() {
                return policy == EmptySelectionPolicy::AllowAll;
            }
            let value = record.get(column).map(value_to_string).unwrap_or_default();
            allowed.contains(&value)
        })
    }

    /// Categorical and text columns with their distinct non-missing values.
    pub fn filter_options(dataset: &Dataset, column_types: &ColumnTypes) -> Vec<FilterOption> {
        dataset
            .columns()
            .iter()
            .filter_map(|column| {
                let column_type = *column_types.get(column)?;
                if !matches!(column_type, ColumnType::Categorical | ColumnType::Text) {
                    return None;
                }
                let values = frequencies(
                    dataset
                        .column_values(column)
                        .filter(|v| !is_missing(v))
                        .map(value_to_string),
                )
                .into_iter()
                .map(|(value, _)| value)
                .collect();
                Some(FilterOption {
                    column: column.clone(),
                    column_type,
                    values,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn people() -> Dataset {
        Dataset::from_records(
            [
                json!({"name": "Alice", "city": "NY", "age": 30}),
                json!({"name": "Bob", "city": "LA", "age": 25}),
                json!({"name": "Carol", "city": "NY", "age": null}),
                json!({"name": "Dan", "city": "SF", "age": 30}),
            ]
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect(),
        )
        .unwrap()
    }

    fn names(dataset: &Dataset) -> Vec<Value> {
        dataset.column_values("name").cloned().collect()
    }

    #[test]
    fn test_empty_filter_set_returns_everything() {
        let ds = people();
        assert_eq!(FilterEngine::apply(&ds, &FilterSet::new(), EmptySelectionPolicy::ExcludeAll), ds);
    }

    #[test]
    fn test_single_constraint() {
        let mut filters = FilterSet::new();
        filters.allow("city", "NY");
        let result = FilterEngine::apply(&people(), &filters, EmptySelectionPolicy::default());
        assert_eq!(names(&result), vec![json!("Alice"), json!("Carol")]);
    }

    #[test]
    fn test_constraints_are_conjunctive() {
        let mut filters = FilterSet::new();
        filters.set("city", ["NY", "SF"]);
        filters.set("age", ["30"]);
        let result = FilterEngine::apply(&people(), &filters, EmptySelectionPolicy::default());
        assert_eq!(names(&result), vec![json!("Alice"), json!("Dan")]);
    }

    #[test]
    fn test_null_matches_empty_string() {
        let mut filters = FilterSet::new();
        filters.allow("age", "");
        let result = FilterEngine::apply(&people(), &filters, EmptySelectionPolicy::default());
        assert_eq!(names(&result), vec![json!("Carol")]);
    }

    #[test]
    fn test_empty_allowed_set_policies() {
        let mut filters = FilterSet::new();
        filters.set("city", Vec::<String>::new());

        let excluded = FilterEngine::apply(&people(), &filters, EmptySelectionPolicy::ExcludeAll);
        assert!(excluded.is_empty());
        assert_eq!(excluded.columns(), people().columns());

        let allowed = FilterEngine::apply(&people(), &filters, EmptySelectionPolicy::AllowAll);
        assert_eq!(allowed.len(), 4);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut filters = FilterSet::new();
        filters.set("city", ["NY", "LA"]);
        let once = FilterEngine::apply(&people(), &filters, EmptySelectionPolicy::default());
        let twice = FilterEngine::apply(&once, &filters, EmptySelectionPolicy::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut filters = FilterSet::new();
        filters.allow("city", "NY");
        filters.allow("name", "Bob");
        assert!(filters.remove("city"));
        assert!(!filters.remove("city"));
        assert_eq!(filters.len(), 1);
        filters.clear();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_filter_options() {
        let ds = people();
        let mut types = ColumnTypes::new();
        types.insert("name".to_string(), ColumnType::Text);
        types.insert("city".to_string(), ColumnType::Categorical);
        types.insert("age".to_string(), ColumnType::Numeric);

        let options = FilterEngine::filter_options(&ds, &types);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].column, "name");
        assert_eq!(options[1].column, "city");
        assert_eq!(options[1].values, vec!["NY".to_string(), "LA".to_string(), "SF".to_string()]);
    }
}
