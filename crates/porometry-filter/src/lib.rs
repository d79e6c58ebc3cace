//! Intensity filters: adaptive equalization, Gaussian smoothing, and
//! thresholding
//!
//! These operate pointwise or over local neighborhoods of a
//! [`porometry_core::Gray8`]; region-level reasoning lives in
//! porometry-region.

pub mod blur;
pub mod clahe;
pub mod error;
pub mod threshold;

pub use blur::gaussian_blur;
pub use clahe::{ClaheParams, equalize_adaptive};
pub use error::{FilterError, FilterResult};
pub use threshold::{
    adaptive_mean_threshold, otsu_threshold, threshold_above, threshold_at_least,
};
