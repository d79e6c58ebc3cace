//! Error types for porometry-filter

use thiserror::Error;

/// Errors that can occur during filtering
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] porometry_core::Error),

    /// Invalid filter parameter
    #[error("invalid filter parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for filtering operations
pub type FilterResult<T> = Result<T, FilterError>;
