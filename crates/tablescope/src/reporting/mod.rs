//! Report generation module.
//!
//! This module turns analysis results into things a host can show or save:
//!
//! - [`InsightGenerator`]: the fixed, rule-based insight narrative
//! - [`charts`]: frequency, line and scatter series plus chart suggestions
//! - [`export`]: quoted CSV, the plain-text summary and the JSON insights document
//!
//! # Example
//!
//! ```rust,ignore
//! use tablescope::reporting::{InsightGenerator, export};
//!
//! let insights = InsightGenerator::generate(&dataset, &types, &report, &config);
//! let doc = export::insights_document("sales.csv", &dataset, &types, &report, &insights)?;
//! println!("{}", serde_json::to_string_pretty(&doc)?);
//! ```

pub mod charts;
pub mod export;
mod insights;

pub use charts::ChartSuggestions;
pub use insights::InsightGenerator;
