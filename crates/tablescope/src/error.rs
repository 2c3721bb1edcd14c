//! Custom error types for the exploration engine.
//!
//! Errors fall into two families:
//!
//! - **Input errors**: the caller asked for something the dataset cannot
//!   provide (empty dataset, unknown column, wrong column type).
//! - **Degenerate computations**: the request is valid but there is nothing
//!   to compute from (mean fill on a column with no numeric values, outlier
//!   remediation on a column with no IQR bounds).
//!
//! Errors are serializable so a host UI can display them as `{code, message}`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the exploration engine.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// The dataset has no rows.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The column exists but its inferred type does not support the request.
    #[error("Column '{column}' is {actual}, expected {expected}")]
    WrongColumnType {
        column: String,
        expected: String,
        actual: String,
    },

    /// A record does not share the key set of the first record.
    #[error("Record {row} does not match the dataset columns")]
    InconsistentRecord { row: usize },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No valid values found in a column for computation.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// The column has no IQR bounds (non-numeric or too few values).
    #[error("Outlier handling is not applicable to column '{0}'")]
    OutliersNotApplicable(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ExplorerError>,
    },
}

impl ExplorerError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ExplorerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::WrongColumnType { .. } => "WRONG_COLUMN_TYPE",
            Self::InconsistentRecord { .. } => "INCONSISTENT_RECORD",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::OutliersNotApplicable(_) => "OUTLIERS_NOT_APPLICABLE",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by a bad request from the caller.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::EmptyDataset
            | Self::ColumnNotFound(_)
            | Self::WrongColumnType { .. }
            | Self::InconsistentRecord { .. }
            | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }

    /// Check if this error reports a computation with nothing to compute from.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::NoValidValues(_) | Self::OutliersNotApplicable(_) => true,
            Self::WithContext { source, .. } => source.is_degenerate(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ExplorerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ExplorerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for exploration operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ExplorerError::Polars(e).with_context(context))
    }
}
