//! Duplicate row removal.

use std::collections::HashSet;

use crate::quality::QualityAnalyzer;
use crate::types::{Dataset, Record};

/// Keep the first record of every group of identical records.
pub(crate) fn remove_duplicates(
    dataset: &Dataset,
    processing_steps: &mut Vec<String>,
) -> (Dataset, usize) {
    let mut seen = HashSet::new();
    let records: Vec<Record> = dataset
        .records()
        .iter()
        .filter(|record| seen.insert(QualityAnalyzer::duplicate_key(record)))
        .cloned()
        .collect();
    let removed = dataset.len() - records.len();

    if removed > 0 {
        let pct = (removed as f64 / dataset.len() as f64) * 100.0;
        processing_steps.push(format!(
            "Removed {} duplicate rows ({:.1}%)",
            removed, pct
        ));
    } else {
        processing_steps.push("No duplicate rows found".to_string());
    }

    (dataset.derive(records), removed)
}
