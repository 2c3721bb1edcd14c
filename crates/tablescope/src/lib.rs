//! Tabular Data Explorer Library
//!
//! The analysis core of a data exploration tool: given an in-memory table of
//! records, it infers column types, computes descriptive statistics, diagnoses
//! data quality, applies user-chosen fixes, filters rows, generates rule-based
//! insights and answers simple natural-language questions.
//!
//! # Overview
//!
//! - **Type Inference**: numeric, date, categorical and text columns from a value sample
//! - **Quality Analysis**: missing values, exact duplicate rows and IQR outliers
//! - **Remediation**: delete/mean/mode/forward-fill for missing values, remove/cap/keep
//!   for outliers, duplicate removal, each described by a [`FixAction`]
//! - **Filtering**: per-column allowed-value sets combined with AND semantics
//! - **Insights**: a fixed sequence of descriptive findings with severity and icons
//! - **Query Answering**: keyword intents over the filtered view, with canned replies
//! - **Export**: quoted CSV, a plain-text summary and a JSON insights document
//!
//! Everything is deterministic and synchronous. The only file access is
//! [`io::load_csv`]; exports are returned as values for the host to write.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tablescope::{ExplorerSession, FixMethod, io};
//!
//! let dataset = io::load_csv("sales.csv")?;
//!
//! let mut session = ExplorerSession::default();
//! session.load("sales.csv", dataset);
//!
//! for insight in session.insights() {
//!     println!("{} {}: {}", insight.icon, insight.title, insight.description);
//! }
//!
//! session.apply_fix("revenue", FixMethod::Mean)?;
//! session.set_filter("region", ["North"])?;
//! println!("{}", session.ask("What is the average revenue?"));
//! ```
//!
//! # Configuration
//!
//! Thresholds live in [`AnalysisConfig`]:
//!
//! ```rust,ignore
//! use tablescope::{AnalysisConfig, EmptySelectionPolicy};
//!
//! let config = AnalysisConfig::builder()
//!     .type_sample_size(100)
//!     .iqr_multiplier(1.5)
//!     .empty_selection_policy(EmptySelectionPolicy::AllowAll)
//!     .build()?;
//! ```
//!
//! # Stateless use
//!
//! The session is a convenience. Each component can be called directly:
//!
//! ```rust,ignore
//! use tablescope::{QualityAnalyzer, TypeInferrer, Remediator, FixMethod};
//!
//! let types = TypeInferrer::classify(&dataset, &config);
//! let report = QualityAnalyzer::analyze(&dataset, &types, &config);
//! let outcome = Remediator::apply_fix(&dataset, &types, "age", FixMethod::Mode, &config)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod filter;
pub mod imputers;
pub mod io;
pub mod profiler;
pub mod quality;
pub mod query;
pub mod reporting;
pub mod session;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{FixOutcome, Remediator};
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, EmptySelectionPolicy,
};
pub use error::{ExplorerError, Result as ExplorerResult, ResultExt};
pub use filter::{FilterEngine, FilterOption, FilterSet};
pub use imputers::StatisticalImputer;
pub use profiler::TypeInferrer;
pub use quality::QualityAnalyzer;
pub use query::{IntentRule, QueryContext, QueryResponder};
pub use reporting::{ChartSuggestions, InsightGenerator};
pub use session::ExplorerSession;
pub use types::{
    ActionType, ColumnType, ColumnTypes, Dataset, FixAction, FixMethod, Insight, InsightKind,
    InsightReport, InsightSeverity, MissingValueInfo, OutlierInfo, QualityReport, QualitySection,
    Record,
};
