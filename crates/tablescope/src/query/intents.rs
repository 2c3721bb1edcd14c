//! The intent rules consulted by [`QueryResponder`](super::QueryResponder).

use crate::profiler::statistics::{self, NumericSummary, frequencies, top_n};
use crate::profiler::{numeric_columns, numeric_correlations};
use crate::types::ColumnType;
use crate::utils::{is_missing, numeric_values, value_to_string};

use super::{IntentRule, QueryContext};

pub(super) const NUMERIC_COLUMN_REQUIRED: &str =
    "Please specify a numeric column name in your question.";

pub(super) const HELP_TEXT: &str = "I can help you with:\n\
• Statistics (average, sum, min, max)\n\
• Top values\n\
• Correlations\n\
• Data summary\n\
• Distribution analysis\n\
• Insights\n\n\
Try asking \"What is the average of [column]?\" or \"Show me a summary\"";

/// Single-number aggregates over a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Average,
    Sum,
    Max,
    Min,
}

impl Aggregate {
    fn label(&self) -> &'static str {
        match self {
            Self::Average => "average value",
            Self::Sum => "total sum",
            Self::Max => "maximum value",
            Self::Min => "minimum value",
        }
    }

    fn compute(&self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Average => statistics::mean(values),
            Self::Sum => statistics::sum(values),
            Self::Max => statistics::max(values),
            Self::Min => statistics::min(values),
        }
    }
}

pub struct NumericAggregateRule(pub Aggregate);

impl IntentRule for NumericAggregateRule {
    fn name(&self) -> &'static str {
        match self.0 {
            Aggregate::Average => "average",
            Aggregate::Sum => "sum",
            Aggregate::Max => "max",
            Aggregate::Min => "min",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self.0 {
            Aggregate::Average => &["average", "mean", "avg"],
            Aggregate::Sum => &["sum", "total"],
            Aggregate::Max => &["max", "maximum", "highest"],
            Aggregate::Min => &["min", "minimum", "lowest"],
        }
    }

    fn respond(&self, ctx: &QueryContext<'_>) -> Option<String> {
        let Some(column) = ctx.numeric_column() else {
            return Some(NUMERIC_COLUMN_REQUIRED.to_string());
        };
        let values = numeric_values(ctx.dataset, column);
        Some(match self.0.compute(&values) {
            Some(result) => format!("The {} of {} is {:.2}.", self.0.label(), column, result),
            None => format!("There are no numeric values in {} to compute.", column),
        })
    }
}

pub struct TopValuesRule;

impl IntentRule for TopValuesRule {
    fn name(&self) -> &'static str {
        "top"
    }

    fn keywords(&self) -> &'static [&'static str] {
        &["top"]
    }

    fn respond(&self, ctx: &QueryContext<'_>) -> Option<String> {
        let column = ctx.column?;
        let counts = frequencies(ctx.dataset.column_values(column).map(value_to_string));
        let n = ctx.config.top_n;

        let mut response = format!("Top {} values in {}:\n", n, column);
        for (i, (value, count)) in top_n(counts, n).into_iter().enumerate() {
            response.push_str(&format!("{}. {} ({} occurrences)\n", i + 1, value, count));
        }
        Some(response)
    }
}

pub struct SummaryRule;

impl IntentRule for SummaryRule {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn keywords(&self) -> &'static [&'static str] {
        &["summary", "summarize", "summarise", "overview"]
    }

    fn respond(&self, ctx: &QueryContext<'_>) -> Option<String> {
        let mut summary = String::from("Dataset Summary:\n\n");
        summary.push_str(&format!("📊 Total Rows: {}\n", ctx.dataset.len()));
        summary.push_str(&format!("📋 Total Columns: {}\n\n", ctx.dataset.column_count()));

        let numeric = numeric_columns(ctx.dataset, ctx.column_types);
        if !numeric.is_empty() {
            summary.push_str(&format!("Numeric Columns ({}):\n", numeric.len()));
            for column in numeric.iter().take(3) {
                if let Some(avg) = statistics::mean(&numeric_values(ctx.dataset, column)) {
                    summary.push_str(&format!("  • {}: avg = {:.2}\n", column, avg));
                }
            }
        }
        Some(summary)
    }
}

pub struct CorrelationRule;

impl IntentRule for CorrelationRule {
    fn name(&self) -> &'static str {
        "correlation"
    }

    fn keywords(&self) -> &'static [&'static str] {
        &[
            "correlation",
            "correlations",
            "correlate",
            "correlated",
            "relationship",
            "relationships",
        ]
    }

    fn respond(&self, ctx: &QueryContext<'_>) -> Option<String> {
        if numeric_columns(ctx.dataset, ctx.column_types).len() < 2 {
            return Some("Need at least 2 numeric columns to calculate correlations.".to_string());
        }

        let strong: Vec<(String, String, f64)> = numeric_correlations(ctx.dataset, ctx.column_types)
            .into_iter()
            .filter(|(_, _, r)| r.abs() > ctx.config.correlation_threshold)
            .collect();

        if strong.is_empty() {
            return Some("No strong correlations found between numeric columns.".to_string());
        }

        let mut response = String::from("Strong correlations found:\n");
        for (a, b, r) in strong.iter().take(3) {
            response.push_str(&format!("{} ↔ {}: {:.2}\n", a, b, r));
        }
        Some(response)
    }
}

pub struct QuickInsightsRule;

impl IntentRule for QuickInsightsRule {
    fn name(&self) -> &'static str {
        "insights"
    }

    fn keywords(&self) -> &'static [&'static str] {
        &["insight", "insights", "interesting", "finding", "findings"]
    }

    fn respond(&self, ctx: &QueryContext<'_>) -> Option<String> {
        let dataset = ctx.dataset;
        let rows = dataset.len() as f64;
        let mut insights = String::from("Key Insights:\n\n");

        let high_missing: Vec<&str> = dataset
            .columns()
            .iter()
            .filter(|column| {
                let missing = dataset.column_values(column).filter(|v| is_missing(v)).count();
                missing as f64 > rows * ctx.config.high_missing_percentage / 100.0
            })
            .map(String::as_str)
            .collect();
        if !high_missing.is_empty() {
            insights.push_str(&format!(
                "⚠️ Columns with >{}% missing data: {}\n\n",
                ctx.config.high_missing_percentage,
                high_missing.join(", ")
            ));
        }

        if let Some(column) = numeric_columns(dataset, ctx.column_types).first()
            && let Some(avg) = statistics::mean(&numeric_values(dataset, column))
        {
            insights.push_str(&format!("📈 {} average: {:.2}\n", column, avg));
        }

        insights.push_str(&format!(
            "\n📊 Dataset has {} rows across {} columns.",
            dataset.len(),
            dataset.column_count()
        ));
        Some(insights)
    }
}

pub struct DistributionRule;

impl IntentRule for DistributionRule {
    fn name(&self) -> &'static str {
        "distribution"
    }

    fn keywords(&self) -> &'static [&'static str] {
        &["distribution", "distributed"]
    }

    fn respond(&self, ctx: &QueryContext<'_>) -> Option<String> {
        let column = ctx.column?;

        if ctx.column_type() == Some(ColumnType::Numeric) {
            let values = numeric_values(ctx.dataset, column);
            let summary = NumericSummary::from_values(&values)?;
            return Some(format!(
                "Distribution of {}:\nMean: {:.2}\nMedian: {}\nMin: {}\nMax: {}",
                column, summary.mean, summary.median, summary.min, summary.max
            ));
        }

        let counts = frequencies(ctx.dataset.column_values(column).map(value_to_string));
        let unique = counts.len();
        let (most_common, _) = top_n(counts, 1).into_iter().next()?;
        Some(format!(
            "{} has {} unique values. The most common is {}.",
            column, unique, most_common
        ))
    }
}

/// Rules in priority order; the first that matches and answers wins.
pub(super) fn default_rules() -> Vec<Box<dyn IntentRule>> {
    vec![
        Box::new(NumericAggregateRule(Aggregate::Average)),
        Box::new(NumericAggregateRule(Aggregate::Sum)),
        Box::new(NumericAggregateRule(Aggregate::Max)),
        Box::new(NumericAggregateRule(Aggregate::Min)),
        Box::new(TopValuesRule),
        Box::new(SummaryRule),
        Box::new(CorrelationRule),
        Box::new(QuickInsightsRule),
        Box::new(DistributionRule),
    ]
}
