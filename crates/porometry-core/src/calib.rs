//! Spatial calibration
//!
//! A single scalar — millimeters per pixel edge — converts pixel counts
//! into real units. Typical backlit rigs sit between 0.01 and 1.0 mm per
//! pixel; values outside that window almost always indicate a calibration
//! mistake (wrong reference patch, wrong crop) rather than exotic optics,
//! so they are accepted but flagged.

use crate::error::{Error, Result};

/// Lower edge of the plausible mm-per-pixel window.
pub const PLAUSIBLE_MIN_MM: f64 = 0.01;
/// Upper edge of the plausible mm-per-pixel window.
pub const PLAUSIBLE_MAX_MM: f64 = 1.0;

/// Millimeters-per-pixel conversion factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    mm_per_px: f64,
}

impl Calibration {
    /// Create a calibration from a mm-per-pixel scalar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the scalar is not finite
    /// or not strictly positive.
    pub fn new(mm_per_px: f64) -> Result<Self> {
        if !mm_per_px.is_finite() || mm_per_px <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "pixel size must be a positive finite number of mm, got {mm_per_px}"
            )));
        }
        Ok(Calibration { mm_per_px })
    }

    /// The raw mm-per-pixel scalar.
    #[inline]
    pub fn mm_per_px(&self) -> f64 {
        self.mm_per_px
    }

    /// Whether the scalar lies in the plausible window
    /// [[`PLAUSIBLE_MIN_MM`], [`PLAUSIBLE_MAX_MM`]].
    pub fn is_plausible(&self) -> bool {
        (PLAUSIBLE_MIN_MM..=PLAUSIBLE_MAX_MM).contains(&self.mm_per_px)
    }

    /// Convert a pixel distance to millimeters.
    #[inline]
    pub fn px_to_mm(&self, px: f64) -> f64 {
        px * self.mm_per_px
    }

    /// Convert a pixel area to square millimeters.
    #[inline]
    pub fn px_area_to_mm2(&self, px_area: f64) -> f64 {
        px_area * self.mm_per_px * self.mm_per_px
    }

    /// Convert a pixel area to square centimeters.
    #[inline]
    pub fn px_area_to_cm2(&self, px_area: f64) -> f64 {
        self.px_area_to_mm2(px_area) / 100.0
    }
}
