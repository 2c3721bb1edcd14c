//! Canned-rule insight narrative.

use chrono::Local;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::profiler::statistics::{NumericSummary, frequencies, most_frequent};
use crate::profiler::{categorical_columns, numeric_columns, numeric_correlations};
use crate::types::{
    ColumnTypes, Dataset, Insight, InsightKind, InsightReport, InsightSeverity, QualityReport,
    QualitySection,
};
use crate::utils::{is_missing, numeric_values, value_to_string};

/// Builds the fixed sequence of insights for a dataset.
pub struct InsightGenerator;

impl InsightGenerator {
    /// Generate insights in slot order: overview, completeness, first numeric
    /// column, first categorical column, strongest correlation, duplicates.
    ///
    /// Each slot is emitted only when it applies. Deterministic for the same
    /// inputs; an empty dataset yields no insights.
    pub fn generate(
        dataset: &Dataset,
        column_types: &ColumnTypes,
        report: &QualityReport,
        config: &AnalysisConfig,
    ) -> Vec<Insight> {
        if dataset.is_empty() {
            return Vec::new();
        }

        let insights: Vec<Insight> = [
            Some(Self::overview(dataset, column_types)),
            Self::completeness(report, config),
            Self::numeric_summary(dataset, column_types, report),
            Self::top_category(dataset, column_types),
            Self::correlation(dataset, column_types, config),
            Self::duplicates(report),
        ]
        .into_iter()
        .flatten()
        .collect();

        debug!("Generated {} insights", insights.len());
        insights
    }

    /// [`InsightGenerator::generate`] with a display timestamp attached.
    pub fn generate_report(
        dataset: &Dataset,
        column_types: &ColumnTypes,
        report: &QualityReport,
        config: &AnalysisConfig,
    ) -> InsightReport {
        InsightReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            insights: Self::generate(dataset, column_types, report, config),
        }
    }

    fn overview(dataset: &Dataset, column_types: &ColumnTypes) -> Insight {
        let numeric = numeric_columns(dataset, column_types).len();
        let categorical = categorical_columns(dataset, column_types).len();
        Insight {
            kind: InsightKind::Overview,
            severity: InsightSeverity::Success,
            icon: "📊".to_string(),
            title: "Dataset Overview".to_string(),
            description: format!(
                "Your dataset contains {} rows and {} columns. The data includes {} numeric columns and {} categorical columns.",
                dataset.len(),
                dataset.column_count(),
                numeric,
                categorical
            ),
            stat: Some(dataset.len() as f64),
            action: None,
        }
    }

    fn completeness(report: &QualityReport, config: &AnalysisConfig) -> Option<Insight> {
        let completeness = report.completeness()?;
        let missing = report.missing_cells();

        let (severity, icon) = if completeness > 95.0 {
            (InsightSeverity::Success, "✅")
        } else if completeness > 80.0 {
            (InsightSeverity::Warning, "⚠️")
        } else {
            (InsightSeverity::Error, "❌")
        };

        let mut description = if missing == 0 {
            "Excellent! No missing values detected in your dataset. The data is complete and ready for analysis.".to_string()
        } else {
            format!(
                "{:.1}% of cells are filled ({} of {} cells are missing).",
                completeness,
                missing,
                report.total_cells()
            )
        };

        let high_missing: Vec<&str> = report
            .missing
            .iter()
            .filter(|m| m.percentage > config.high_missing_percentage)
            .map(|m| m.column.as_str())
            .collect();
        if !high_missing.is_empty() {
            description.push_str(&format!(
                " {} columns have more than {}% missing data: {}. Consider cleaning or imputing these values.",
                high_missing.len(),
                config.high_missing_percentage,
                high_missing.join(", ")
            ));
        }

        Some(Insight {
            kind: InsightKind::Completeness,
            severity,
            icon: icon.to_string(),
            title: "Data Completeness".to_string(),
            description,
            stat: Some(completeness),
            action: (missing > 0).then_some(QualitySection::Missing),
        })
    }

    fn numeric_summary(
        dataset: &Dataset,
        column_types: &ColumnTypes,
        report: &QualityReport,
    ) -> Option<Insight> {
        let column = *numeric_columns(dataset, column_types).first()?;
        let summary = NumericSummary::from_values(&numeric_values(dataset, column))?;
        let high_variability = summary.range() > 2.0 * summary.mean;

        let mut description = format!(
            "Average: {:.2}. Range: {:.2} to {:.2}.",
            summary.mean, summary.min, summary.max
        );
        if high_variability {
            description.push_str(" High variability: the range is more than twice the average.");
        }

        Some(Insight {
            kind: InsightKind::NumericSummary,
            severity: if high_variability {
                InsightSeverity::Warning
            } else {
                InsightSeverity::Info
            },
            icon: "📈".to_string(),
            title: format!("{} Statistics", column),
            description,
            stat: Some(summary.mean),
            action: report
                .outlier_for(column)
                .map(|_| QualitySection::Outliers),
        })
    }

    fn top_category(dataset: &Dataset, column_types: &ColumnTypes) -> Option<Insight> {
        let column = *categorical_columns(dataset, column_types).first()?;
        let counts = frequencies(
            dataset
                .column_values(column)
                .filter(|v| !is_missing(v))
                .map(value_to_string),
        );
        let present: usize = counts.iter().map(|(_, c)| c).sum();
        let distinct = counts.len();

        let (value, count) = most_frequent(counts)?;
        let share = count as f64 / present as f64 * 100.0;

        Some(Insight {
            kind: InsightKind::TopCategory,
            severity: InsightSeverity::Info,
            icon: "🏷️".to_string(),
            title: "Top Category".to_string(),
            description: format!(
                "'{}' is the most frequent value in {} ({:.1}% of non-missing values). {} has {} unique categories.",
                value, column, share, column, distinct
            ),
            stat: Some(share),
            action: None,
        })
    }

    fn correlation(
        dataset: &Dataset,
        column_types: &ColumnTypes,
        config: &AnalysisConfig,
    ) -> Option<Insight> {
        let mut strongest: Option<(String, String, f64)> = None;
        for (a, b, r) in numeric_correlations(dataset, column_types) {
            if strongest.as_ref().is_none_or(|(_, _, best)| r.abs() > best.abs()) {
                strongest = Some((a, b, r));
            }
        }
        let (a, b, r) = strongest?;
        if r.abs() <= config.correlation_threshold {
            return None;
        }

        let strength = if r.abs() > config.strong_correlation_threshold {
            "strong"
        } else {
            "moderate"
        };
        let direction = if r > 0.0 { "positive" } else { "negative" };

        Some(Insight {
            kind: InsightKind::Correlation,
            severity: InsightSeverity::Info,
            icon: "🔗".to_string(),
            title: if strength == "strong" {
                "Strong Correlation Found".to_string()
            } else {
                "Moderate Correlation Found".to_string()
            },
            description: format!(
                "{} and {} show a {} {} correlation ({:.2}). These variables are likely related.",
                a, b, strength, direction, r
            ),
            stat: Some(r),
            action: None,
        })
    }

    fn duplicates(report: &QualityReport) -> Option<Insight> {
        if report.duplicate_count == 0 {
            return None;
        }
        Some(Insight {
            kind: InsightKind::Duplicates,
            severity: InsightSeverity::Warning,
            icon: "🔄".to_string(),
            title: "Duplicate Rows Detected".to_string(),
            description: format!(
                "Found {} duplicate rows ({:.1}% of the data). Consider removing duplicates to improve data quality and analysis accuracy.",
                report.duplicate_count,
                report.duplicate_percentage()
            ),
            stat: Some(report.duplicate_count as f64),
            action: Some(QualitySection::Duplicates),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::TypeInferrer;
    use crate::quality::QualityAnalyzer;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn generate(values: Vec<Value>) -> Vec<Insight> {
        let dataset = Dataset::from_records(
            values
                .into_iter()
                .map(|v| v.as_object().cloned().unwrap())
                .collect(),
        )
        .unwrap();
        let config = AnalysisConfig::default();
        let types = TypeInferrer::classify(&dataset, &config);
        let report = QualityAnalyzer::analyze(&dataset, &types, &config);
        InsightGenerator::generate(&dataset, &types, &report, &config)
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_all_slots_in_order() {
        let insights = generate(vec![
            json!({"city": "NY", "x": "1", "y": "2"}),
            json!({"city": "NY", "x": "2", "y": "4"}),
            json!({"city": "LA", "x": "3", "y": ""}),
            json!({"city": "NY", "x": "1", "y": "2"}),
        ]);

        assert_eq!(
            kinds(&insights),
            vec![
                InsightKind::Overview,
                InsightKind::Completeness,
                InsightKind::NumericSummary,
                InsightKind::TopCategory,
                InsightKind::Correlation,
                InsightKind::Duplicates,
            ]
        );
        assert_eq!(insights[4].title, "Strong Correlation Found");
        assert_eq!(insights[5].action, Some(QualitySection::Duplicates));
    }

    #[test]
    fn test_completeness_tiers() {
        // 1 of 20 cells missing: 95% is not above 95
        let mut rows: Vec<Value> = (0..10).map(|i| json!({"a": format!("v{i}"), "b": "x"})).collect();
        rows[0] = json!({"a": "", "b": "x"});
        let insights = generate(rows);
        let completeness = insights.iter().find(|i| i.kind == InsightKind::Completeness).unwrap();
        assert_eq!(completeness.severity, InsightSeverity::Warning);
        assert_eq!(completeness.action, Some(QualitySection::Missing));

        let insights = generate(vec![json!({"a": "1", "b": "x"})]);
        let completeness = insights.iter().find(|i| i.kind == InsightKind::Completeness).unwrap();
        assert_eq!(completeness.severity, InsightSeverity::Success);
        assert_eq!(completeness.action, None);

        let insights = generate(vec![json!({"a": "", "b": "x"}), json!({"a": "", "b": "y"})]);
        let completeness = insights.iter().find(|i| i.kind == InsightKind::Completeness).unwrap();
        assert_eq!(completeness.severity, InsightSeverity::Error);
        assert!(completeness.description.contains("more than 10% missing data: a"));
    }

    #[test]
    fn test_high_variability_flag() {
        let insights = generate(
            ["1", "2", "50"]
                .iter()
                .map(|v| json!({"v": v}))
                .collect(),
        );
        let numeric = insights.iter().find(|i| i.kind == InsightKind::NumericSummary).unwrap();
        assert!(numeric.description.contains("High variability"));
        assert_eq!(numeric.severity, InsightSeverity::Warning);
    }

    #[test]
    fn test_weak_correlation_omitted() {
        let insights = generate(vec![
            json!({"x": "1", "y": "5"}),
            json!({"x": "2", "y": "1"}),
            json!({"x": "3", "y": "4"}),
            json!({"x": "4", "y": "2"}),
            json!({"x": "5", "y": "3"}),
        ]);
        assert!(!kinds(&insights).contains(&InsightKind::Correlation));
    }

    #[test]
    fn test_constant_column_reports_no_correlation() {
        let balances = [
            "899446.94", "899446.94", "899446.96", "899446.96", "899446.95", "899446.94",
            "899446.96", "899446.94", "899446.96", "899446.94", "899446.94", "899446.96",
        ];
        let insights = generate(
            balances
                .iter()
                .map(|b| json!({"price": "720366.32", "balance": b}))
                .collect(),
        );
        assert!(!kinds(&insights).contains(&InsightKind::Correlation));
    }

    #[test]
    fn test_top_category_tie_goes_to_first_seen() {
        let insights = generate(vec![
            json!({"city": "LA"}),
            json!({"city": "NY"}),
            json!({"city": "NY"}),
            json!({"city": "LA"}),
        ]);
        let top = insights.iter().find(|i| i.kind == InsightKind::TopCategory).unwrap();
        assert!(top.description.starts_with("'LA' is the most frequent value in city (50.0%"));
    }

    #[test]
    fn test_top_category_share() {
        let insights = generate(vec![
            json!({"city": "NY"}),
            json!({"city": "LA"}),
            json!({"city": "NY"}),
            json!({"city": ""}),
        ]);
        let top = insights.iter().find(|i| i.kind == InsightKind::TopCategory).unwrap();
        assert!(top.description.starts_with("'NY' is the most frequent value in city"));
        assert!((top.stat.unwrap() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_empty_dataset_has_no_insights() {
        let report = QualityReport::default();
        let insights = InsightGenerator::generate(
            &Dataset::default(),
            &ColumnTypes::new(),
            &report,
            &AnalysisConfig::default(),
        );
        assert!(insights.is_empty());
    }
}
