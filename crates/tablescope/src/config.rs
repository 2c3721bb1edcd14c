//! Configuration types for the exploration engine.
//!
//! The heuristics are fixed by default; the builder exists so hosts and tests
//! can pick the policies that the original UI iterations disagreed on
//! (empty-column type, empty filter selection).

use crate::types::ColumnType;
use serde::{Deserialize, Serialize};

/// How a filter constraint with an empty allowed-value set is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EmptySelectionPolicy {
    /// Every option was deselected, so no row passes.
    #[default]
    ExcludeAll,
    /// Treat the column as unconstrained.
    AllowAll,
}

/// Configuration for type inference, quality analysis and insights.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tablescope::config::{AnalysisConfig, EmptySelectionPolicy};
///
/// let config = AnalysisConfig::builder()
///     .type_sample_size(50)
///     .empty_selection_policy(EmptySelectionPolicy::AllowAll)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum number of non-missing values inspected per column during type inference.
    /// Default: 100
    pub type_sample_size: usize,

    /// Fraction of sampled values that must parse as numbers for a numeric column.
    /// Default: 0.8 (strictly greater than)
    pub numeric_threshold: f64,

    /// Fraction of sampled values that must parse as dates for a date column.
    /// Default: 0.8 (strictly greater than)
    pub date_threshold: f64,

    /// A column with fewer distinct sampled values is categorical.
    /// Default: 20
    pub categorical_max_distinct: usize,

    /// A column whose distinct/sample ratio is below this is categorical.
    /// Default: 0.5
    pub categorical_ratio: f64,

    /// Type assigned to columns without any non-missing value.
    /// Default: Text
    pub empty_column_type: ColumnType,

    /// IQR multiplier for outlier bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Minimum numeric values a column needs before outliers are reported.
    /// Default: 4
    pub min_outlier_values: usize,

    /// Missing percentage above which a column is called out in insights.
    /// Default: 10.0
    pub high_missing_percentage: f64,

    /// Absolute correlation above which a pair is reported.
    /// Default: 0.5
    pub correlation_threshold: f64,

    /// Absolute correlation above which a pair is described as strong.
    /// Default: 0.7
    pub strong_correlation_threshold: f64,

    /// Number of entries returned for "top values" questions.
    /// Default: 5
    pub top_n: usize,

    /// Treatment of filter constraints with no allowed values.
    /// Default: ExcludeAll
    pub empty_selection_policy: EmptySelectionPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            type_sample_size: 100,
            numeric_threshold: 0.8,
            date_threshold: 0.8,
            categorical_max_distinct: 20,
            categorical_ratio: 0.5,
            empty_column_type: ColumnType::Text,
            iqr_multiplier: 1.5,
            min_outlier_values: 4,
            high_missing_percentage: 10.0,
            correlation_threshold: 0.5,
            strong_correlation_threshold: 0.7,
            top_n: 5,
            empty_selection_policy: EmptySelectionPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("numeric_threshold", self.numeric_threshold),
            ("date_threshold", self.date_threshold),
            ("categorical_ratio", self.categorical_ratio),
            ("correlation_threshold", self.correlation_threshold),
            ("strong_correlation_threshold", self.strong_correlation_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if !(0.0..=100.0).contains(&self.high_missing_percentage) {
            return Err(ConfigValidationError::InvalidPercentage(
                self.high_missing_percentage,
            ));
        }

        if self.type_sample_size == 0 {
            return Err(ConfigValidationError::ZeroCount("type_sample_size"));
        }

        if self.top_n == 0 {
            return Err(ConfigValidationError::ZeroCount("top_n"));
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier(self.iqr_multiplier));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid missing percentage: {0} (must be between 0 and 100)")]
    InvalidPercentage(f64),

    #[error("'{0}' must be at least 1")]
    ZeroCount(&'static str),

    #[error("Invalid IQR multiplier: {0} (must be a non-negative number)")]
    InvalidMultiplier(f64),
}

impl From<ConfigValidationError> for crate::error::ExplorerError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ExplorerError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    type_sample_size: Option<usize>,
    numeric_threshold: Option<f64>,
    date_threshold: Option<f64>,
    categorical_max_distinct: Option<usize>,
    categorical_ratio: Option<f64>,
    empty_column_type: Option<ColumnType>,
    iqr_multiplier: Option<f64>,
    min_outlier_values: Option<usize>,
    high_missing_percentage: Option<f64>,
    correlation_threshold: Option<f64>,
    strong_correlation_threshold: Option<f64>,
    top_n: Option<usize>,
    empty_selection_policy: Option<EmptySelectionPolicy>,
}

impl AnalysisConfigBuilder {
    /// Set how many non-missing values per column type inference looks at.
    pub fn type_sample_size(mut self, size: usize) -> Self {
        self.type_sample_size = Some(size);
        self
    }

    /// Set the numeric fraction threshold (0.0 - 1.0).
    pub fn numeric_threshold(mut self, threshold: f64) -> Self {
        self.numeric_threshold = Some(threshold);
        self
    }

    /// Set the date fraction threshold (0.0 - 1.0).
    pub fn date_threshold(mut self, threshold: f64) -> Self {
        self.date_threshold = Some(threshold);
        self
    }

    /// Set the distinct-count limit below which a column is categorical.
    pub fn categorical_max_distinct(mut self, count: usize) -> Self {
        self.categorical_max_distinct = Some(count);
        self
    }

    /// Set the distinct/sample ratio below which a column is categorical.
    pub fn categorical_ratio(mut self, ratio: f64) -> Self {
        self.categorical_ratio = Some(ratio);
        self
    }

    /// Set the type given to columns with no values at all.
    ///
    /// Only [`ColumnType::Text`] and [`ColumnType::Empty`] make sense here.
    pub fn empty_column_type(mut self, column_type: ColumnType) -> Self {
        self.empty_column_type = Some(column_type);
        self
    }

    /// Set the IQR multiplier used for outlier bounds.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the minimum number of numeric values needed for outlier detection.
    pub fn min_outlier_values(mut self, count: usize) -> Self {
        self.min_outlier_values = Some(count);
        self
    }

    /// Set the missing percentage (0 - 100) that flags a column in insights.
    pub fn high_missing_percentage(mut self, percentage: f64) -> Self {
        self.high_missing_percentage = Some(percentage);
        self
    }

    /// Set the absolute correlation that makes a pair worth reporting.
    pub fn correlation_threshold(mut self, threshold: f64) -> Self {
        self.correlation_threshold = Some(threshold);
        self
    }

    /// Set the absolute correlation described as "strong".
    pub fn strong_correlation_threshold(mut self, threshold: f64) -> Self {
        self.strong_correlation_threshold = Some(threshold);
        self
    }

    /// Set the number of entries listed for top-value questions.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Set the policy for filter constraints with no allowed values.
    pub fn empty_selection_policy(mut self, policy: EmptySelectionPolicy) -> Self {
        self.empty_selection_policy = Some(policy);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            type_sample_size: self.type_sample_size.unwrap_or(defaults.type_sample_size),
            numeric_threshold: self.numeric_threshold.unwrap_or(defaults.numeric_threshold),
            date_threshold: self.date_threshold.unwrap_or(defaults.date_threshold),
            categorical_max_distinct: self
                .categorical_max_distinct
                .unwrap_or(defaults.categorical_max_distinct),
            categorical_ratio: self.categorical_ratio.unwrap_or(defaults.categorical_ratio),
            empty_column_type: self.empty_column_type.unwrap_or(defaults.empty_column_type),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            min_outlier_values: self.min_outlier_values.unwrap_or(defaults.min_outlier_values),
            high_missing_percentage: self
                .high_missing_percentage
                .unwrap_or(defaults.high_missing_percentage),
            correlation_threshold: self
                .correlation_threshold
                .unwrap_or(defaults.correlation_threshold),
            strong_correlation_threshold: self
                .strong_correlation_threshold
                .unwrap_or(defaults.strong_correlation_threshold),
            top_n: self.top_n.unwrap_or(defaults.top_n),
            empty_selection_policy: self
                .empty_selection_policy
                .unwrap_or(defaults.empty_selection_policy),
        };

        config.validate()?;
        Ok(config)
    }
}
