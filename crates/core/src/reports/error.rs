//! Report error types.

use thiserror::Error;

/// Errors raised while building a report from client parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Unknown sort column.
    #[error("invalid sort key: {0}")]
    InvalidSortKey(String),

    /// Sort order is neither `asc` nor `desc`.
    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),

    /// Year outside the supported calendar range.
    #[error("invalid year: {0}")]
    InvalidYear(i32),
}
