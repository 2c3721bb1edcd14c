//! Rule-based question answering over a dataset.
//!
//! A question is lowercased and split into word tokens. The first column whose
//! name appears in the question becomes the subject, then an ordered list of
//! [`IntentRule`]s is consulted: average, sum, max, min, top values, summary,
//! correlation, insights and distribution. The first rule whose keywords match
//! and that produces an answer wins; otherwise a help text is returned.
//!
//! Keywords match whole words only, so "summary" never triggers the sum rule.

mod intents;

pub use intents::{
    Aggregate, CorrelationRule, DistributionRule, NumericAggregateRule, QuickInsightsRule,
    SummaryRule, TopValuesRule,
};

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::types::{ColumnType, ColumnTypes, Dataset};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9_]+").expect("Invalid regex: word"));

const NO_DATASET: &str = "Please upload a dataset first so I can answer your questions!";

/// Everything a rule needs to answer one question.
pub struct QueryContext<'a> {
    /// The lowercased question.
    pub question: String,
    pub tokens: HashSet<String>,
    /// First column (in dataset order) whose name occurs in the question.
    pub column: Option<&'a str>,
    pub dataset: &'a Dataset,
    pub column_types: &'a ColumnTypes,
    pub config: &'a AnalysisConfig,
}

impl<'a> QueryContext<'a> {
    pub fn new(
        question: &str,
        dataset: &'a Dataset,
        column_types: &'a ColumnTypes,
        config: &'a AnalysisConfig,
    ) -> Self {
        let question = question.to_lowercase();
        let tokens = WORD
            .find_iter(&question)
            .map(|m| m.as_str().to_string())
            .collect();
        let column = dataset
            .columns()
            .iter()
            .find(|c| question.contains(&c.to_lowercase()))
            .map(String::as_str);

        Self {
            question,
            tokens,
            column,
            dataset,
            column_types,
            config,
        }
    }

    pub fn has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.tokens.contains(*k))
    }

    pub fn column_type(&self) -> Option<ColumnType> {
        self.column
            .and_then(|c| self.column_types.get(c))
            .copied()
    }

    /// The mentioned column, if it is numeric.
    pub fn numeric_column(&self) -> Option<&'a str> {
        self.column
            .filter(|_| self.column_type() == Some(ColumnType::Numeric))
    }
}

/// A keyword-triggered answer strategy.
pub trait IntentRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whole-word keywords that trigger this rule.
    fn keywords(&self) -> &'static [&'static str];

    fn matches(&self, ctx: &QueryContext<'_>) -> bool {
        ctx.has_any(self.keywords())
    }

    /// The answer, or `None` to let later rules try.
    fn respond(&self, ctx: &QueryContext<'_>) -> Option<String>;
}

/// Answers questions by consulting intent rules in priority order.
pub struct QueryResponder {
    rules: Vec<Box<dyn IntentRule>>,
}

impl Default for QueryResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryResponder {
    pub fn new() -> Self {
        Self {
            rules: intents::default_rules(),
        }
    }

    /// Names of the rules in the order they are consulted.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn answer(
        &self,
        question: &str,
        dataset: &Dataset,
        column_types: &ColumnTypes,
        config: &AnalysisConfig,
    ) -> String {
        if dataset.is_empty() {
            return NO_DATASET.to_string();
        }

        let ctx = QueryContext::new(question, dataset, column_types, config);
        for rule in &self.rules {
            if rule.matches(&ctx)
                && let Some(answer) = rule.respond(&ctx)
            {
                debug!("Question answered by '{}' rule", rule.name());
                return answer;
            }
        }

        debug!("No rule matched question: {}", ctx.question);
        intents::HELP_TEXT.to_string()
    }
}
