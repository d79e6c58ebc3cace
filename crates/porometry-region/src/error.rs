//! Error types for porometry-region

use thiserror::Error;

/// Errors that can occur during region analysis
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] porometry_core::Error),

    /// Component label out of range
    #[error("invalid component label: {0}")]
    InvalidLabel(u32),
}

/// Result type for region analysis operations
pub type RegionResult<T> = Result<T, RegionError>;
