//! Explicit session state for one explored dataset.
//!
//! An [`ExplorerSession`] owns the active dataset, its inferred column types,
//! the cached quality report, the active filters and the history of applied
//! fixes. Hosts create one per open file; nothing is global.

use serde_json::Value;
use tracing::{debug, info};

use crate::cleaner::{FixOutcome, Remediator};
use crate::config::AnalysisConfig;
use crate::error::{ExplorerError, Result};
use crate::filter::{FilterEngine, FilterOption, FilterSet};
use crate::profiler::{OutlierBounds, TypeInferrer};
use crate::quality::QualityAnalyzer;
use crate::query::QueryResponder;
use crate::reporting::{ChartSuggestions, InsightGenerator, export};
use crate::types::{
    ColumnTypes, Dataset, FixAction, FixMethod, Insight, InsightReport, QualityReport,
};

pub struct ExplorerSession {
    config: AnalysisConfig,
    file_name: Option<String>,
    dataset: Dataset,
    column_types: ColumnTypes,
    report: QualityReport,
    filters: FilterSet,
    history: Vec<FixAction>,
    responder: QueryResponder,
}

static_assertions::assert_impl_all!(ExplorerSession: Send, Sync);

impl Default for ExplorerSession {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl ExplorerSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            file_name: None,
            dataset: Dataset::default(),
            column_types: ColumnTypes::new(),
            report: QualityReport::default(),
            filters: FilterSet::new(),
            history: Vec::new(),
            responder: QueryResponder::new(),
        }
    }

    /// Replace the active dataset, clearing filters and fix history.
    pub fn load(&mut self, file_name: impl Into<String>, dataset: Dataset) {
        let file_name = file_name.into();
        info!(
            "Loaded '{}': {} rows, {} columns",
            file_name,
            dataset.len(),
            dataset.column_count()
        );
        self.file_name = Some(file_name);
        self.dataset = dataset;
        self.filters.clear();
        self.history.clear();
        self.reanalyze();
    }

    /// Drop the dataset and everything derived from it.
    pub fn reset(&mut self) {
        debug!("Resetting session");
        self.file_name = None;
        self.dataset = Dataset::default();
        self.column_types.clear();
        self.report = QualityReport::default();
        self.filters.clear();
        self.history.clear();
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn column_types(&self) -> &ColumnTypes {
        &self.column_types
    }

    /// Quality report of the full dataset, recomputed after every load or fix.
    pub fn quality_report(&self) -> &QualityReport {
        &self.report
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Fixes applied since the dataset was loaded, oldest first.
    pub fn history(&self) -> &[FixAction] {
        &self.history
    }

    /// The dataset narrowed by the active filters.
    pub fn filtered(&self) -> Dataset {
        FilterEngine::apply(&self.dataset, &self.filters, self.config.empty_selection_policy)
    }

    /// Restrict a column to the given values.
    pub fn set_filter<I, S>(&mut self, column: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dataset.require_column(column)?;
        self.filters.set(column, values);
        Ok(())
    }

    /// Add a single allowed value to a column's filter.
    pub fn allow_value(&mut self, column: &str, value: impl Into<String>) -> Result<()> {
        self.dataset.require_column(column)?;
        self.filters.allow(column, value);
        Ok(())
    }

    pub fn remove_filter(&mut self, column: &str) -> bool {
        self.filters.remove(column)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn filter_options(&self) -> Vec<FilterOption> {
        FilterEngine::filter_options(&self.dataset, &self.column_types)
    }

    /// Apply a fix to the full dataset, then re-infer types and re-analyze.
    ///
    /// Outlier fixes use the bounds from the cached quality report when it
    /// has an entry for the column.
    pub fn apply_fix(&mut self, column: &str, method: FixMethod) -> Result<FixAction> {
        if self.dataset.is_empty() {
            return Err(ExplorerError::EmptyDataset);
        }

        let FixOutcome { dataset, action } = match self.cached_bounds(column, method) {
            Some(bounds) => Remediator::apply_outlier_fix(&self.dataset, column, method, &bounds)?,
            None => Remediator::apply_fix(
                &self.dataset,
                &self.column_types,
                column,
                method,
                &self.config,
            )?,
        };

        self.dataset = dataset;
        self.reanalyze();
        self.history.push(action.clone());
        Ok(action)
    }

    fn cached_bounds(&self, column: &str, method: FixMethod) -> Option<OutlierBounds> {
        if !method.is_outlier_fix() {
            return None;
        }
        self.report.outlier_for(column).map(OutlierBounds::from)
    }

    /// Insights over the full dataset.
    pub fn insights(&self) -> Vec<Insight> {
        InsightGenerator::generate(&self.dataset, &self.column_types, &self.report, &self.config)
    }

    pub fn insight_report(&self) -> InsightReport {
        InsightGenerator::generate_report(
            &self.dataset,
            &self.column_types,
            &self.report,
            &self.config,
        )
    }

    /// Answer a question over the filtered view.
    pub fn ask(&self, question: &str) -> String {
        let filtered = self.filtered();
        self.responder
            .answer(question, &filtered, &self.column_types, &self.config)
    }

    pub fn chart_suggestions(&self) -> ChartSuggestions {
        ChartSuggestions::for_dataset(&self.dataset, &self.column_types)
    }

    /// The filtered view as quoted CSV.
    pub fn export_csv(&self) -> Result<String> {
        export::to_csv(&self.filtered())
    }

    pub fn export_summary(&self) -> Result<String> {
        if self.dataset.is_empty() {
            return Err(ExplorerError::EmptyDataset);
        }
        Ok(export::summary_text(
            self.file_name().unwrap_or_default(),
            &self.dataset,
            &self.column_types,
        ))
    }

    pub fn export_insights(&self) -> Result<Value> {
        if self.dataset.is_empty() {
            return Err(ExplorerError::EmptyDataset);
        }
        export::insights_document(
            self.file_name().unwrap_or_default(),
            &self.dataset,
            &self.column_types,
            &self.report,
            &self.insights(),
        )
    }

    fn reanalyze(&mut self) {
        self.column_types = TypeInferrer::classify(&self.dataset, &self.config);
        self.report = QualityAnalyzer::analyze(&self.dataset, &self.column_types, &self.config);
    }
}
