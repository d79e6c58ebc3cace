//! Error types for porometry-io

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during image file I/O
#[derive(Debug, Error)]
pub enum IoError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] porometry_core::Error),

    /// Failed to read or decode an image file
    #[error("failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to encode or write an image file
    #[error("failed to write image {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Result type for image file I/O
pub type IoResult<T> = Result<T, IoError>;
