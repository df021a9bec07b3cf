//! Frame and schema error model.

use thiserror::Error;

/// Result type used across the data layer.
pub type FrameResult<T> = Result<T, FrameError>;

/// Data-layer error.
///
/// Keep this focused on structural failures of frames and schemas (shape,
/// naming, typing). Execution and forecasting failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Columns of a frame disagree on their row count.
    #[error("column `{column}` has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// A referenced column does not exist.
    #[error("column `{0}` not found")]
    ColumnNotFound(String),

    /// A column has a type incompatible with the requested operation.
    #[error("column `{column}` has type {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// Frames being concatenated do not share the same columns.
    #[error("incompatible frames: {0}")]
    Incompatible(String),

    /// A schema expression could not be parsed.
    #[error("invalid schema expression: {0}")]
    InvalidSchema(String),
}

impl FrameError {
    pub fn not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound(column.into())
    }

    pub fn incompatible(msg: impl Into<String>) -> Self {
        Self::Incompatible(msg.into())
    }

    pub fn invalid_schema(msg: impl Into<String>) -> Self {
        Self::InvalidSchema(msg.into())
    }

    pub fn type_mismatch(
        column: impl Into<String>,
        expected: impl core::fmt::Display,
        found: impl core::fmt::Display,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
