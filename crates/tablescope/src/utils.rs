//! Shared cell helpers used across the analysis modules.
//!
//! Every module agrees on three questions about a cell: is it missing, does it
//! parse as a number, and what is its string form. The answers live here.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::types::Dataset;

// =============================================================================
// Missing values
// =============================================================================

/// A cell is missing when it is null or a string that is empty after trimming.
#[inline]
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

// =============================================================================
// Coercion
// =============================================================================

/// Parse a cell as a finite number.
///
/// Strings are trimmed first. `NaN` and infinities are rejected, so the result
/// is always safe to feed into arithmetic.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// String form of a cell: null becomes `""`, numbers and booleans use their
/// JSON text and strings are returned unchanged.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parsed numeric values of a column, skipping cells that do not parse.
pub fn numeric_values(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset.column_values(column).filter_map(parse_number).collect()
}

/// String forms of the non-missing cells of a column, in row order.
pub fn present_strings(dataset: &Dataset, column: &str) -> Vec<String> {
    dataset
        .column_values(column)
        .filter(|v| !is_missing(v))
        .map(value_to_string)
        .collect()
}

/// Round to the given number of decimal places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// =============================================================================
// Dates
// =============================================================================

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a cell as a calendar date or datetime.
///
/// Accepts RFC 3339, RFC 2822 and a fixed list of common layouts. Anything
/// that already parses as a bare number is rejected, so `2024` or `45123`
/// never count as dates.
pub fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    let Value::String(s) = value else {
        return None;
    };
    let s = s.trim();
    if s.is_empty() || s.parse::<f64>().is_ok() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
