use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A single row: column name to the value as parsed (string, number, bool or null).
///
/// Key order is preserved, so the first record defines the column order.
pub type Record = serde_json::Map<String, Value>;

/// Inferred type of every column, keyed by column name.
pub type ColumnTypes = HashMap<String, ColumnType>;

// ============================================================================
// Dataset
// ============================================================================

/// An ordered sequence of records sharing one key set.
///
/// Datasets are treated as values: filters and fixes build new datasets
/// instead of mutating the one they were given. There is no `Deserialize`;
/// build one through [`Dataset::from_records`] so the key set is checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, checking that every record has the first record's keys.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let columns: Vec<String> = records
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        for (row, record) in records.iter().enumerate() {
            if record.len() != columns.len() || !columns.iter().all(|c| record.contains_key(c)) {
                return Err(ExplorerError::InconsistentRecord { row });
            }
        }

        Ok(Self { columns, records })
    }

    /// A dataset with known columns and no rows.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with [`ExplorerError::ColumnNotFound`] unless the column exists.
    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(ExplorerError::ColumnNotFound(column.to_string()))
        }
    }

    /// Values of one column in row order (`Null` for a key that is somehow absent).
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records
            .iter()
            .map(move |record| record.get(column).unwrap_or(&Value::Null))
    }

    /// A dataset over the same columns with a different row set.
    pub(crate) fn derive(&self, records: Vec<Record>) -> Self {
        Self {
            columns: self.columns.clone(),
            records,
        }
    }
}

// ============================================================================
// Column types
// ============================================================================

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Date,
    Categorical,
    Text,
    /// No non-missing values (only produced when configured instead of `Text`).
    Empty,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::Categorical => "categorical",
            Self::Text => "text",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Quality report
// ============================================================================

/// Missing-value count of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueInfo {
    pub column: String,
    pub count: usize,
    /// Share of rows, in percent, rounded to one decimal.
    pub percentage: f64,
}

/// IQR outlier diagnostics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierInfo {
    pub column: String,
    pub count: usize,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Missing values, duplicate rows and outliers of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_rows: usize,
    pub total_columns: usize,
    /// One entry per column, in column order, including columns with no missing values.
    pub missing: Vec<MissingValueInfo>,
    pub duplicate_count: usize,
    /// Numeric columns with at least one outlier.
    pub outliers: Vec<OutlierInfo>,
}

impl QualityReport {
    pub fn total_cells(&self) -> usize {
        self.total_rows * self.total_columns
    }

    pub fn missing_cells(&self) -> usize {
        self.missing.iter().map(|m| m.count).sum()
    }

    /// Percentage of non-missing cells, `None` when the dataset has no cells.
    pub fn completeness(&self) -> Option<f64> {
        let total = self.total_cells();
        if total == 0 {
            return None;
        }
        Some((total - self.missing_cells()) as f64 / total as f64 * 100.0)
    }

    /// Columns with at least one missing value.
    pub fn columns_with_missing(&self) -> impl Iterator<Item = &MissingValueInfo> {
        self.missing.iter().filter(|m| m.count > 0)
    }

    pub fn missing_for(&self, column: &str) -> Option<&MissingValueInfo> {
        self.missing.iter().find(|m| m.column == column)
    }

    pub fn outlier_for(&self, column: &str) -> Option<&OutlierInfo> {
        self.outliers.iter().find(|o| o.column == column)
    }

    pub fn duplicate_percentage(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            self.duplicate_count as f64 / self.total_rows as f64 * 100.0
        }
    }
}

// ============================================================================
// Insights
// ============================================================================

/// Which insight slot produced an [`Insight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Overview,
    Completeness,
    NumericSummary,
    TopCategory,
    Correlation,
    Duplicates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Success,
    Info,
    Warning,
    Error,
}

/// Quality panel subsection an insight can link back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualitySection {
    Missing,
    Duplicates,
    Outliers,
}

/// One finding of the insight narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: InsightSeverity,
    pub icon: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<QualitySection>,
}

/// Insights plus the time they were generated (display only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub generated_at: String,
    pub insights: Vec<Insight>,
}

// ============================================================================
// Fixes
// ============================================================================

/// Remediation requested for a column (or the whole dataset for duplicates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixMethod {
    /// Drop rows where the column is missing.
    Delete,
    /// Fill missing cells with the column mean (2 decimals).
    Mean,
    /// Fill missing cells with the most frequent value.
    Mode,
    /// Fill missing cells with the previous non-missing value.
    Forward,
    /// Drop rows whose value lies outside the IQR bounds.
    RemoveOutliers,
    /// Clamp out-of-bound values to the nearest bound.
    CapOutliers,
    /// Leave outliers untouched.
    KeepOutliers,
    /// Keep only the first record of each group of identical records.
    RemoveDuplicates,
}

impl FixMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Mean => "mean",
            Self::Mode => "mode",
            Self::Forward => "forward",
            Self::RemoveOutliers => "remove",
            Self::CapOutliers => "cap",
            Self::KeepOutliers => "keep",
            Self::RemoveDuplicates => "remove_duplicates",
        }
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            Self::Delete => ActionType::RowsRemoved,
            Self::Mean | Self::Mode | Self::Forward => ActionType::ValueImputed,
            Self::RemoveOutliers | Self::CapOutliers | Self::KeepOutliers => {
                ActionType::OutlierHandled
            }
            Self::RemoveDuplicates => ActionType::DuplicatesRemoved,
        }
    }

    pub fn is_outlier_fix(&self) -> bool {
        matches!(
            self,
            Self::RemoveOutliers | Self::CapOutliers | Self::KeepOutliers
        )
    }
}

impl FromStr for FixMethod {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "mean" => Ok(Self::Mean),
            "mode" => Ok(Self::Mode),
            "forward" => Ok(Self::Forward),
            "remove" | "remove_outliers" => Ok(Self::RemoveOutliers),
            "cap" | "cap_outliers" => Ok(Self::CapOutliers),
            "keep" | "keep_outliers" => Ok(Self::KeepOutliers),
            "remove_duplicates" | "duplicates" => Ok(Self::RemoveDuplicates),
            other => Err(ExplorerError::InvalidConfig(format!(
                "unknown fix method '{other}'"
            ))),
        }
    }
}

/// Types of actions a fix can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// One or more rows were removed from the dataset.
    RowsRemoved,
    /// Missing values were imputed.
    ValueImputed,
    /// Outliers were handled (removed, capped, or kept).
    OutlierHandled,
    /// Duplicate rows were removed.
    DuplicatesRemoved,
}

impl ActionType {
    /// Get a human-readable display name for the action type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::RowsRemoved => "Rows Removed",
            Self::ValueImputed => "Value Imputed",
            Self::OutlierHandled => "Outlier Handled",
            Self::DuplicatesRemoved => "Duplicates Removed",
        }
    }

    /// Get an icon/emoji for the action type (for UI display).
    pub fn icon(&self) -> &'static str {
        match self {
            Self::RowsRemoved => "➖",
            Self::ValueImputed => "📝",
            Self::OutlierHandled => "📊",
            Self::DuplicatesRemoved => "🔄",
        }
    }
}

/// Audit record of one applied fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixAction {
    pub action_type: ActionType,
    pub method: FixMethod,
    /// Target column, `None` for dataset-wide fixes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub rows_before: usize,
    pub rows_after: usize,
    pub cells_changed: usize,
    pub description: String,
}

impl FixAction {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

// ============================================================================
// Tests
// ============================================================================
