//! porometry-core - Core data structures for crumb porosity analysis
//!
//! This crate provides the raster types shared by every pipeline stage:
//!
//! - [`Gray8`] / [`Gray8Mut`] — 8-bit grayscale rasters with shared
//!   ownership and an exclusive mutation handle
//! - [`Mask`] / [`MaskMut`] — binary {0, 255} masks with the same split
//! - [`Rgb8`] — the original color photograph, for renderers
//! - [`Calibration`] — the millimeters-per-pixel conversion scalar
//! - [`stats`] — histograms and masked moment statistics
//!
//! Images are immutable once produced; downstream stages and renderers
//! hold cheap clones rather than copies.

mod calib;
mod error;
mod gray;
mod mask;
mod rgb;
pub mod stats;

pub use calib::{Calibration, PLAUSIBLE_MAX_MM, PLAUSIBLE_MIN_MM};
pub use error::{Error, Result};
pub use gray::{Gray8, Gray8Mut};
pub use mask::{Mask, MaskMut, ON};
pub use rgb::Rgb8;
