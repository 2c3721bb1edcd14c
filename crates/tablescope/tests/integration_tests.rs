//! Integration tests for the tabular data explorer.
//!
//! These tests drive the public API end to end: loading, classification,
//! quality analysis, fixes, filtering, insights, questions and exports.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::path::PathBuf;
use tablescope::profiler::statistics;
use tablescope::{
    ActionType, AnalysisConfig, ColumnType, Dataset, EmptySelectionPolicy, ExplorerError,
    ExplorerSession, FilterEngine, FilterSet, FixMethod, InsightKind, QualityAnalyzer,
    QueryResponder, Record, Remediator, TypeInferrer, io,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn records(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .map(|v| v.as_object().cloned().expect("record must be an object"))
        .collect()
}

fn dataset(values: Vec<Value>) -> Dataset {
    Dataset::from_records(records(values)).expect("consistent records")
}

fn sales() -> Dataset {
    dataset(vec![
        json!({"region": "North", "product": "Widget", "units": "10", "revenue": "100", "date": "2024-01-05"}),
        json!({"region": "South", "product": "Gadget", "units": "20", "revenue": "210", "date": "2024-01-06"}),
        json!({"region": "North", "product": "Widget", "units": "30", "revenue": "", "date": "2024-01-07"}),
        json!({"region": "East", "product": "Gizmo", "units": "40", "revenue": "390", "date": "2024-01-08"}),
        json!({"region": "North", "product": "Gadget", "units": "50", "revenue": "520", "date": "2024-01-09"}),
        json!({"region": "South", "product": "Widget", "units": "60", "revenue": "600", "date": "2024-01-10"}),
        json!({"region": "North", "product": "Widget", "units": "10", "revenue": "100", "date": "2024-01-05"}),
    ])
}

fn temp_csv(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tablescope-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write temp csv");
    path
}

// ============================================================================
// Worked Scenarios
// ============================================================================

#[test]
fn test_numeric_column_with_one_missing_cell() {
    let data = dataset(vec![
        json!({"a": "1", "b": "x"}),
        json!({"a": "2", "b": "y"}),
        json!({"a": "", "b": "x"}),
    ]);
    let config = AnalysisConfig::default();
    let types = TypeInferrer::classify(&data, &config);
    let report = QualityAnalyzer::analyze(&data, &types, &config);

    assert_eq!(types["a"], ColumnType::Numeric);
    let missing = report.missing_for("a").expect("missing entry for a");
    assert_eq!(missing.count, 1);
    assert_eq!(missing.percentage, 33.3);
}

#[test]
fn test_iqr_flags_extreme_value() {
    let data = dataset(
        ["1", "2", "3", "4", "100"]
            .iter()
            .map(|v| json!({"v": v}))
            .collect(),
    );
    let config = AnalysisConfig::default();
    let types = TypeInferrer::classify(&data, &config);
    let report = QualityAnalyzer::analyze(&data, &types, &config);

    let outlier = report.outlier_for("v").expect("outlier entry");
    assert_eq!(outlier.q1, 2.0);
    assert_eq!(outlier.q3, 4.0);
    assert_eq!(outlier.iqr, 2.0);
    assert_eq!(outlier.upper_bound, 7.0);
    assert_eq!(outlier.count, 1);
}

#[test]
fn test_mode_of_strings() {
    assert_eq!(statistics::mode(["a", "b", "a", "c", "a"]), Some("a"));
}

#[test]
fn test_perfect_positive_correlation() {
    let r = statistics::pearson_correlation(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
    assert!((r - 1.0).abs() < 1e-12);
}

#[test]
fn test_average_question() {
    let data = dataset(vec![
        json!({"score": "10"}),
        json!({"score": "20"}),
        json!({"score": "30"}),
    ]);
    let config = AnalysisConfig::default();
    let types = TypeInferrer::classify(&data, &config);

    let answer = QueryResponder::new().answer("what is the average of score?", &data, &types, &config);
    assert_eq!(answer, "The average value of score is 20.00.");
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_csv_from_disk() {
    let path = temp_csv(
        "people.csv",
        "name,age,joined\nAlice,30,2023-01-15\nBob,,2023-02-20\n\"Smith, Jr.\",41,2023-03-01\n",
    );
    let data = io::load_csv(&path).unwrap();
    let types = TypeInferrer::classify(&data, &AnalysisConfig::default());

    assert_eq!(data.len(), 3);
    assert_eq!(data.records()[2]["name"], json!("Smith, Jr."));
    assert_eq!(data.records()[1]["age"], Value::Null);
    assert_eq!(types["age"], ColumnType::Numeric);
    assert_eq!(types["joined"], ColumnType::Date);
}

#[test]
fn test_inconsistent_records_rejected() {
    let result = Dataset::from_records(records(vec![
        json!({"a": "1", "b": "2"}),
        json!({"a": "1"}),
    ]));
    assert!(matches!(result, Err(ExplorerError::InconsistentRecord { row: 1 })));
}

// ============================================================================
// Session Flow
// ============================================================================

#[test]
fn test_session_end_to_end() {
    let mut session = ExplorerSession::default();
    session.load("sales.csv", sales());

    assert_eq!(session.column_types()["units"], ColumnType::Numeric);
    assert_eq!(session.column_types()["date"], ColumnType::Date);
    assert_eq!(session.column_types()["region"], ColumnType::Categorical);
    assert_eq!(session.quality_report().duplicate_count, 1);
    assert_eq!(session.quality_report().missing_for("revenue").unwrap().count, 1);

    let action = session.apply_fix("", FixMethod::RemoveDuplicates).unwrap();
    assert_eq!(action.action_type, ActionType::DuplicatesRemoved);
    assert_eq!(action.rows_removed(), 1);
    assert_eq!(session.quality_report().duplicate_count, 0);

    let action = session.apply_fix("revenue", FixMethod::Delete).unwrap();
    assert_eq!(action.action_type, ActionType::RowsRemoved);
    assert_eq!(session.dataset().len(), 5);
    assert!(session.quality_report().missing_for("revenue").is_none_or(|m| m.count == 0));

    session.set_filter("region", ["North", "South"]).unwrap();
    assert_eq!(session.filtered().len(), 4);
    assert_eq!(session.ask("total units"), "The total sum of units is 140.00.");
    assert_eq!(session.ask("highest revenue"), "The maximum value of revenue is 600.00.");

    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_session_insights_start_with_overview() {
    let mut session = ExplorerSession::default();
    session.load("sales.csv", sales());

    let insights = session.insights();
    assert_eq!(insights[0].kind, InsightKind::Overview);
    assert!(insights.iter().any(|i| i.kind == InsightKind::Duplicates));
    assert!(insights.iter().any(|i| i.kind == InsightKind::Completeness));
}

#[test]
fn test_session_exports() {
    let mut session = ExplorerSession::default();
    session.load("sales.csv", sales());
    session.set_filter("region", ["East"]).unwrap();

    let csv = session.export_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], r#""East","Gizmo","40","390","2024-01-08""#);

    let summary = session.export_summary().unwrap();
    assert!(summary.contains("File: sales.csv"));
    assert!(summary.contains("Total Rows: 7"));

    let doc = session.export_insights().unwrap();
    assert_eq!(doc["fileName"], json!("sales.csv"));
    assert_eq!(doc["duplicates"], json!(1));
    assert_eq!(doc["columnTypes"]["revenue"], json!("numeric"));
}

#[test]
fn test_outlier_fix_on_text_column_fails() {
    let mut session = ExplorerSession::default();
    session.load("sales.csv", sales());

    let result = session.apply_fix("product", FixMethod::RemoveOutliers);
    assert!(result.is_err());
    assert!(session.history().is_empty());
    assert_eq!(session.dataset().len(), 7);
}

// ============================================================================
// Filtering Policies
// ============================================================================

#[test]
fn test_empty_selection_policies() {
    let data = sales();
    let mut filters = FilterSet::new();
    filters.set("region", Vec::<String>::new());

    let excluded = FilterEngine::apply(&data, &filters, EmptySelectionPolicy::ExcludeAll);
    let allowed = FilterEngine::apply(&data, &filters, EmptySelectionPolicy::AllowAll);

    assert!(excluded.is_empty());
    assert_eq!(excluded.columns(), data.columns());
    assert_eq!(allowed.len(), data.len());
}

#[test]
fn test_filters_are_and_across_columns() {
    let data = sales();
    let mut filters = FilterSet::new();
    filters.set("region", ["North"]);
    filters.set("product", ["Widget", "Gizmo"]);

    let filtered = FilterEngine::apply(&data, &filters, EmptySelectionPolicy::ExcludeAll);
    assert_eq!(filtered.len(), 3);
    assert!(
        filtered
            .records()
            .iter()
            .all(|r| r["region"] == json!("North") && r["product"] == json!("Widget"))
    );
}

// ============================================================================
// Fixes
// ============================================================================

#[test]
fn test_forward_fill_leaves_leading_gaps() {
    let data = dataset(vec![
        json!({"v": ""}),
        json!({"v": "1"}),
        json!({"v": null}),
        json!({"v": ""}),
        json!({"v": "4"}),
    ]);
    let config = AnalysisConfig::default();
    let types = TypeInferrer::classify(&data, &config);

    let outcome = Remediator::apply_fix(&data, &types, "v", FixMethod::Forward, &config).unwrap();
    let values: Vec<Value> = outcome.dataset.column_values("v").cloned().collect();

    assert_eq!(values, vec![json!(""), json!("1"), json!("1"), json!("1"), json!("4")]);
    assert_eq!(outcome.action.cells_changed, 2);
    assert_eq!(outcome.action.rows_removed(), 0);
}

#[test]
fn test_mean_fix_on_all_missing_column() {
    let data = dataset(vec![json!({"v": ""}), json!({"v": null})]);
    let config = AnalysisConfig::default();
    let types = TypeInferrer::classify(&data, &config);

    let result = Remediator::apply_fix(&data, &types, "v", FixMethod::Mean, &config);
    assert!(result.is_err());
}

#[test]
fn test_cap_outliers_keeps_row_count() {
    let data = dataset(
        ["1", "2", "3", "4", "100"]
            .iter()
            .map(|v| json!({"v": v}))
            .collect(),
    );
    let config = AnalysisConfig::default();
    let types = TypeInferrer::classify(&data, &config);

    let outcome = Remediator::apply_fix(&data, &types, "v", FixMethod::CapOutliers, &config).unwrap();
    assert_eq!(outcome.dataset.len(), 5);
    assert_eq!(outcome.dataset.records()[4]["v"], json!(7.0));
    assert_eq!(outcome.action.action_type, ActionType::OutlierHandled);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_fixes_never_add_rows() {
    let data = sales();
    let config = AnalysisConfig::default();
    let types = TypeInferrer::classify(&data, &config);

    for method in [
        FixMethod::Delete,
        FixMethod::Mean,
        FixMethod::Mode,
        FixMethod::Forward,
        FixMethod::RemoveDuplicates,
    ] {
        let outcome = Remediator::apply_fix(&data, &types, "revenue", method, &config).unwrap();
        assert!(outcome.dataset.len() <= data.len(), "{:?} added rows", method);
        assert_eq!(outcome.dataset.columns(), data.columns());
    }
}

#[test]
fn test_filtered_view_is_subset() {
    let data = sales();
    let mut filters = FilterSet::new();
    filters.allow("product", "Gadget");

    let filtered = FilterEngine::apply(&data, &filters, EmptySelectionPolicy::ExcludeAll);
    assert!(filtered.records().iter().all(|r| data.records().contains(r)));
    assert_eq!(filtered.len(), 2);
}

#[test]
fn test_unknown_question_gets_help() {
    let data = sales();
    let config = AnalysisConfig::default();
    let types = TypeInferrer::classify(&data, &config);

    let answer = QueryResponder::new().answer("sing me a song", &data, &types, &config);
    assert!(answer.starts_with("I can help you with:"));
}
