//! Error handling for the indicator engine.
//!
//! Data-quality problems inside the engine never surface here: unparsable cells,
//! unresolved indicators and malformed optional sheets all degrade to sentinel
//! values. These errors cover the table-construction, interchange and
//! reference-override boundaries.

use arrow::error::ArrowError;

/// Errors that can occur at the boundaries of the engine
#[derive(Debug, thiserror::Error)]
pub enum BloodworkError {
    /// Arrow conversion error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] ArrowError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A required column could not be located
    #[error("Column not found: {column} ({context})")]
    MissingColumn {
        /// Name or role of the missing column
        column: String,
        /// Where the column was expected
        context: String,
    },

    /// Rows and header disagree on shape
    #[error("Malformed table: {0}")]
    MalformedTable(String),

    /// A reference-range row could not be interpreted
    #[error("Malformed reference row {row}: {reason}")]
    MalformedReferenceRow {
        /// Zero-based data row index
        row: usize,
        /// What was wrong with the row
        reason: String,
    },

    /// Arrow column type without a cell mapping
    #[error("Unsupported data type for column {column}: {data_type}")]
    UnsupportedDataType {
        /// Column name
        column: String,
        /// Arrow data type
        data_type: String,
    },
}

impl BloodworkError {
    /// Create a missing-column error
    pub fn missing_column(column: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            context: context.into(),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, BloodworkError>;
