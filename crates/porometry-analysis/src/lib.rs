//! Crumb porosity analysis pipeline
//!
//! Turns a grayscale slice photograph into a [`MetricsRecord`] through
//! five typed stages: illumination normalization, ROI detection, hole
//! segmentation, morphological cleanup, and metrics. See [`analyze`] for
//! the one-call driver and [`pipeline`] for stage-by-stage control.

pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod record;
pub mod report;

pub use config::{AnalysisConfig, GapFillKernel, NormalizeMethod, ThresholdMethod};
pub use error::{AnalysisError, AnalysisResult};
pub use metrics::{Anisotropy, CrumbUniformity, HoleDistribution, HoleStats, Porosity};
pub use pipeline::{
    AnalysisOutput, Artifacts, Cleaned, Grayscale, Normalized, RoiDetected, RoiStats, Segmented,
    analyze, cleanup_mask,
};
pub use record::MetricsRecord;
pub use report::format_report;
