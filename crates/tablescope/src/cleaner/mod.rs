//! Remediation module for fixing data quality issues.
//!
//! This module provides:
//! - Missing value fixes (delegated to [`crate::imputers`])
//! - Outlier removal, capping and keeping
//! - Duplicate row removal
//!
//! Every fix derives a new [`Dataset`]; re-inferring column types and
//! re-running the quality analysis is the caller's job.

mod duplicates;
mod outliers;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::error::{ExplorerError, Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::profiler::OutlierBounds;
use crate::quality::QualityAnalyzer;
use crate::types::{ColumnType, ColumnTypes, Dataset, FixAction, FixMethod};
use crate::utils::is_missing;

/// The dataset produced by a fix and the audit record describing it.
#[derive(Debug, Clone, Serialize)]
pub struct FixOutcome {
    pub dataset: Dataset,
    pub action: FixAction,
}

/// Applies remediation fixes to datasets.
pub struct Remediator;

impl Remediator {
    /// Apply a fix to a column.
    ///
    /// Outlier fixes compute IQR bounds from the given dataset; use
    /// [`Remediator::apply_outlier_fix`] to supply bounds from an earlier
    /// quality report instead. The column is ignored for
    /// [`FixMethod::RemoveDuplicates`].
    pub fn apply_fix(
        dataset: &Dataset,
        column_types: &ColumnTypes,
        column: &str,
        method: FixMethod,
        config: &AnalysisConfig,
    ) -> Result<FixOutcome> {
        if method == FixMethod::Mean {
            Self::require_numeric(dataset, column_types, column)?;
        }

        let mut processing_steps = Vec::new();
        let (result, changed) = match method {
            FixMethod::Delete => StatisticalImputer::delete_missing(dataset, column, &mut processing_steps),
            FixMethod::Mean => StatisticalImputer::apply_mean(dataset, column, &mut processing_steps),
            FixMethod::Mode => StatisticalImputer::apply_mode(dataset, column, &mut processing_steps),
            FixMethod::Forward => StatisticalImputer::forward_fill(dataset, column, &mut processing_steps),
            FixMethod::RemoveDuplicates => {
                Ok(duplicates::remove_duplicates(dataset, &mut processing_steps))
            }
            FixMethod::RemoveOutliers | FixMethod::CapOutliers | FixMethod::KeepOutliers => {
                dataset.require_column(column)?;
                let bounds = Self::compute_bounds(dataset, column_types, column, config)?;
                return Self::apply_outlier_fix(dataset, column, method, &bounds);
            }
        }
        .context(format!("Applying '{}' fix", method.as_str()))?;

        let column = (method != FixMethod::RemoveDuplicates).then_some(column);
        Ok(Self::finish(dataset, result, column, method, changed, processing_steps))
    }

    /// Apply an outlier fix using caller-supplied bounds.
    pub fn apply_outlier_fix(
        dataset: &Dataset,
        column: &str,
        method: FixMethod,
        bounds: &OutlierBounds,
    ) -> Result<FixOutcome> {
        let mut processing_steps = Vec::new();
        let (result, changed) = match method {
            FixMethod::RemoveOutliers => {
                outliers::remove_outliers(dataset, column, bounds, &mut processing_steps)?
            }
            FixMethod::CapOutliers => {
                outliers::cap_outliers(dataset, column, bounds, &mut processing_steps)?
            }
            FixMethod::KeepOutliers => outliers::keep_outliers(dataset, column, &mut processing_steps)?,
            other => {
                return Err(ExplorerError::InvalidConfig(format!(
                    "'{}' is not an outlier fix",
                    other.as_str()
                )));
            }
        };

        Ok(Self::finish(dataset, result, Some(column), method, changed, processing_steps))
    }

    /// Reject a mean fill on a column classified as anything but numeric.
    ///
    /// A column with no present values is left to the imputer, which reports
    /// [`ExplorerError::NoValidValues`].
    fn require_numeric(dataset: &Dataset, column_types: &ColumnTypes, column: &str) -> Result<()> {
        dataset.require_column(column)?;
        let Some(&actual) = column_types.get(column) else {
            return Ok(());
        };
        let has_values = dataset.column_values(column).any(|v| !is_missing(v));
        if actual != ColumnType::Numeric && has_values {
            return Err(ExplorerError::WrongColumnType {
                column: column.to_string(),
                expected: ColumnType::Numeric.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }

    /// IQR bounds of a numeric column with enough values.
    fn compute_bounds(
        dataset: &Dataset,
        column_types: &ColumnTypes,
        column: &str,
        config: &AnalysisConfig,
    ) -> Result<OutlierBounds> {
        if column_types.get(column) != Some(&ColumnType::Numeric) {
            debug!("Column '{}' is not numeric, no outlier bounds", column);
            return Err(ExplorerError::OutliersNotApplicable(column.to_string()));
        }
        QualityAnalyzer::outlier_bounds(dataset, column, config)
            .map(|info| OutlierBounds::from(&info))
            .ok_or_else(|| ExplorerError::OutliersNotApplicable(column.to_string()))
    }

    fn finish(
        before: &Dataset,
        result: Dataset,
        column: Option<&str>,
        method: FixMethod,
        cells_changed: usize,
        processing_steps: Vec<String>,
    ) -> FixOutcome {
        let action = FixAction {
            action_type: method.action_type(),
            method,
            column: column.map(str::to_string),
            rows_before: before.len(),
            rows_after: result.len(),
            cells_changed,
            description: processing_steps.join("; "),
        };

        info!(
            "{} {}: {} ({} -> {} rows)",
            action.action_type.icon(),
            action.action_type.display_name(),
            action.description,
            action.rows_before,
            action.rows_after
        );

        FixOutcome {
            dataset: result,
            action,
        }
    }
}
