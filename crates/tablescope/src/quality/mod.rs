//! Data quality analysis module.
//!
//! This module identifies missing values, duplicate rows and IQR outliers
//! and summarizes them in a [`QualityReport`](crate::types::QualityReport).

mod analyzer;

pub use analyzer::QualityAnalyzer;
