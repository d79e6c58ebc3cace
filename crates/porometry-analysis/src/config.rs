//! Analysis configuration
//!
//! All recognized pipeline options with their documented defaults. The
//! struct round-trips through serde so recipes can be stored as JSON;
//! unknown method names fail parsing with the list of valid choices.

use std::fmt;
use std::str::FromStr;

use log::warn;
use porometry_core::Calibration;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Illumination normalization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeMethod {
    /// Contrast-limited adaptive histogram equalization
    #[default]
    Clahe,
    /// Background estimate via large grayscale opening, then subtraction
    Morphology,
    /// Background estimate via wide Gaussian blur, then subtraction
    Gaussian,
}

impl FromStr for NormalizeMethod {
    type Err = AnalysisError;

    fn from_str(s: &str) -> AnalysisResult<Self> {
        match s {
            "clahe" => Ok(NormalizeMethod::Clahe),
            "morphology" => Ok(NormalizeMethod::Morphology),
            "gaussian" => Ok(NormalizeMethod::Gaussian),
            other => Err(AnalysisError::InvalidArgument(format!(
                "unknown normalize method: {other}. Valid: clahe, morphology, gaussian"
            ))),
        }
    }
}

impl fmt::Display for NormalizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NormalizeMethod::Clahe => "clahe",
            NormalizeMethod::Morphology => "morphology",
            NormalizeMethod::Gaussian => "gaussian",
        };
        f.write_str(name)
    }
}

/// Hole segmentation threshold strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMethod {
    /// Global cutoff minimizing intra-class variance
    #[default]
    Otsu,
    /// Per-pixel cutoff against the local window mean
    Adaptive,
}

impl FromStr for ThresholdMethod {
    type Err = AnalysisError;

    fn from_str(s: &str) -> AnalysisResult<Self> {
        match s {
            "otsu" => Ok(ThresholdMethod::Otsu),
            "adaptive" => Ok(ThresholdMethod::Adaptive),
            other => Err(AnalysisError::InvalidArgument(format!(
                "unknown threshold method: {other}. Valid: otsu, adaptive"
            ))),
        }
    }
}

impl fmt::Display for ThresholdMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThresholdMethod::Otsu => "otsu",
            ThresholdMethod::Adaptive => "adaptive",
        };
        f.write_str(name)
    }
}

/// Kernel policy for the gap-filling close during cleanup.
///
/// `Fixed3x3` treats `fill_small_gaps` as an on/off gate and always
/// closes with a 3x3 kernel; `FromArea` sizes an odd elliptical kernel
/// from the area parameter, which is what the parameter name suggests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapFillKernel {
    /// Always a 3x3 elliptical kernel, regardless of `fill_small_gaps`
    #[default]
    Fixed3x3,
    /// Odd elliptical kernel with diameter near sqrt(fill_small_gaps)
    FromArea,
}

impl GapFillKernel {
    /// Kernel diameter for a given gap area parameter. Always odd, at
    /// least 3.
    pub fn diameter(self, gap_area: u64) -> u32 {
        match self {
            GapFillKernel::Fixed3x3 => 3,
            GapFillKernel::FromArea => {
                let d = (gap_area as f64).sqrt().round() as u32;
                let d = d.max(3);
                if d % 2 == 0 { d + 1 } else { d }
            }
        }
    }
}

/// Recognized analysis options with their documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Physical size of one pixel in millimeters
    pub pixel_size_mm: f64,
    /// Illumination normalization strategy
    pub normalize_method: NormalizeMethod,
    /// Hole segmentation strategy
    pub threshold_method: ThresholdMethod,
    /// Normalized-intensity cutoff separating bread from background
    pub roi_threshold: u8,
    /// Discard hole components with pixel area at or below this
    pub remove_small_holes: u64,
    /// Fill gaps inside holes when positive
    pub fill_small_gaps: u64,
    /// How the gap-filling kernel is sized
    pub gap_fill_kernel: GapFillKernel,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            pixel_size_mm: 0.1,
            normalize_method: NormalizeMethod::default(),
            threshold_method: ThresholdMethod::default(),
            roi_threshold: 30,
            remove_small_holes: 50,
            fill_small_gaps: 50,
            gap_fill_kernel: GapFillKernel::default(),
        }
    }
}

impl AnalysisConfig {
    /// Validate the configuration and build the pixel calibration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] for a non-finite or
    /// non-positive pixel size. An implausible but valid pixel size is
    /// accepted with a warning.
    pub fn validate(&self) -> AnalysisResult<Calibration> {
        let calibration = Calibration::new(self.pixel_size_mm)
            .map_err(|e| AnalysisError::InvalidArgument(e.to_string()))?;
        if !calibration.is_plausible() {
            warn!(
                "pixel size {} mm is outside the plausible range [{}, {}] mm",
                self.pixel_size_mm,
                porometry_core::PLAUSIBLE_MIN_MM,
                porometry_core::PLAUSIBLE_MAX_MM
            );
        }
        Ok(calibration)
    }
}
