//! Imputation module for handling missing values.
//!
//! This module provides the missing-value strategies: row deletion, mean,
//! mode and forward fill.

mod statistical;

pub use statistical::StatisticalImputer;
