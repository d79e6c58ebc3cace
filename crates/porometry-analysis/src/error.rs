//! Error types for porometry-analysis

use thiserror::Error;

/// Errors surfaced by the analysis pipeline
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed configuration or parameter
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No foreground component found during ROI detection. Not
    /// retryable; the input image is unsuitable.
    #[error("no bread region found: {hint}")]
    RoiNotFound { hint: String },

    /// ROI mask is empty, so area-normalized metrics are undefined
    #[error("degenerate ROI: mask contains no pixels")]
    DegenerateRoi,

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] porometry_core::Error),

    /// Filtering error
    #[error("filter error: {0}")]
    Filter(#[from] porometry_filter::FilterError),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] porometry_morph::MorphError),

    /// Region analysis error
    #[error("region error: {0}")]
    Region(#[from] porometry_region::RegionError),

    /// Metrics serialization error
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for pipeline operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
