//! The analysis pipeline as a typed stage chain
//!
//! Each stage consumes exactly the struct its predecessor produced:
//! `Grayscale` → `Normalized` → `RoiDetected` → `Segmented` → `Cleaned`.
//! Calling a stage out of order therefore does not compile, and no
//! runtime invalid-state error exists. Every stage keeps the earlier
//! rasters (cheap shared-ownership clones) so the final stage can hand
//! the complete artifact set to a renderer.

use log::info;
use porometry_core::{Gray8, Mask, Rgb8};
use porometry_filter::{
    ClaheParams, adaptive_mean_threshold, equalize_adaptive, gaussian_blur, otsu_threshold,
    threshold_above, threshold_at_least,
};
use porometry_morph::{Sel, close, open, open_gray};
use porometry_region::{Connectivity, fill_holes, filter_by_area, label_components};

use crate::config::{AnalysisConfig, GapFillKernel, NormalizeMethod, ThresholdMethod};
use crate::error::{AnalysisError, AnalysisResult};
use crate::metrics;
use crate::record::MetricsRecord;

/// Elliptical kernel diameter for background estimation
/// (morphology normalization).
pub const BACKGROUND_OPEN_SIZE: u32 = 50;
/// Gaussian kernel width for background estimation (gaussian
/// normalization).
pub const BACKGROUND_BLUR_KSIZE: u32 = 101;
/// Gaussian sigma for background estimation.
pub const BACKGROUND_BLUR_SIGMA: f64 = 50.0;
/// Elliptical kernel diameter for ROI smoothing (close then open).
pub const ROI_SMOOTH_SIZE: u32 = 5;
/// Elliptical kernel diameter for cleanup noise removal.
pub const CLEANUP_OPEN_SIZE: u32 = 3;
/// Local window for the adaptive threshold.
pub const ADAPTIVE_WINDOW: u32 = 11;
/// Offset subtracted from the local mean by the adaptive threshold.
pub const ADAPTIVE_OFFSET: f64 = 2.0;

/// Pipeline entry point: the source image reduced to grayscale.
#[derive(Debug, Clone)]
pub struct Grayscale {
    gray: Gray8,
}

/// Stage 2: illumination-normalized image.
#[derive(Debug, Clone)]
pub struct Normalized {
    gray: Gray8,
    normalized: Gray8,
}

/// Aggregate facts about the detected region of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiStats {
    /// Pixel area of the filled ROI
    pub area_px: u64,
    /// Number of foreground components before selecting the largest
    pub candidate_components: u32,
}

/// Stage 3: bread region located.
#[derive(Debug, Clone)]
pub struct RoiDetected {
    gray: Gray8,
    normalized: Gray8,
    roi: Mask,
    stats: RoiStats,
}

/// Stage 4: raw hole segmentation, masked to the ROI.
#[derive(Debug, Clone)]
pub struct Segmented {
    gray: Gray8,
    normalized: Gray8,
    roi: Mask,
    raw_holes: Mask,
}

/// Stage 5: cleaned hole mask, ready for metrics.
#[derive(Debug, Clone)]
pub struct Cleaned {
    gray: Gray8,
    normalized: Gray8,
    roi: Mask,
    raw_holes: Mask,
    cleaned: Mask,
}

/// Every intermediate raster, for renderer consumption.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub grayscale: Gray8,
    pub normalized: Gray8,
    pub roi: Mask,
    pub raw_holes: Mask,
    pub cleaned_holes: Mask,
}

/// Final output of the convenience driver.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub record: MetricsRecord,
    pub artifacts: Artifacts,
}

impl Grayscale {
    pub fn new(gray: Gray8) -> Self {
        Grayscale { gray }
    }

    /// Start from a color photograph via Rec. 601 luma.
    pub fn from_rgb(rgb: &Rgb8) -> Self {
        Grayscale {
            gray: rgb.to_luma(),
        }
    }

    /// Flatten uneven illumination.
    ///
    /// # Errors
    ///
    /// Propagates filter/morphology errors; the fixed kernel constants
    /// are valid for any non-empty image, so failures indicate
    /// dimension problems.
    pub fn normalize(self, method: NormalizeMethod) -> AnalysisResult<Normalized> {
        let normalized = match method {
            NormalizeMethod::Clahe => equalize_adaptive(&self.gray, &ClaheParams::default())?,
            NormalizeMethod::Morphology => {
                let sel = Sel::ellipse(BACKGROUND_OPEN_SIZE, BACKGROUND_OPEN_SIZE)?;
                let background = open_gray(&self.gray, &sel)?;
                self.gray.saturating_sub(&background)?
            }
            NormalizeMethod::Gaussian => {
                let background =
                    gaussian_blur(&self.gray, BACKGROUND_BLUR_KSIZE, BACKGROUND_BLUR_SIGMA)?;
                self.gray.saturating_sub(&background)?
            }
        };
        info!("illumination normalized using {method} method");
        Ok(Normalized {
            gray: self.gray,
            normalized,
        })
    }
}

impl Normalized {
    /// Locate the bread slice as the largest bright component.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::RoiNotFound`] when thresholding plus
    /// smoothing leaves no foreground at all.
    pub fn find_roi(self, threshold: u8) -> AnalysisResult<RoiDetected> {
        let sel = Sel::ellipse(ROI_SMOOTH_SIZE, ROI_SMOOTH_SIZE)?;
        let rough = threshold_at_least(&self.normalized, threshold)?;
        let smoothed = open(&close(&rough, &sel)?, &sel)?;

        let map = label_components(&smoothed, Connectivity::Eight)?;
        let Some(largest) = map.largest_component() else {
            return Err(AnalysisError::RoiNotFound {
                hint: "no bright region above the background threshold; check backlighting \
                       and exposure"
                    .to_string(),
            });
        };
        let roi = fill_holes(&map.component_mask(largest)?)?;
        let stats = RoiStats {
            area_px: roi.count_on(),
            candidate_components: map.num_components(),
        };
        info!(
            "ROI detected: {} px across {} candidate components",
            stats.area_px, stats.candidate_components
        );
        Ok(RoiDetected {
            gray: self.gray,
            normalized: self.normalized,
            roi,
            stats,
        })
    }
}

impl RoiDetected {
    pub fn roi(&self) -> &Mask {
        &self.roi
    }

    pub fn stats(&self) -> RoiStats {
        self.stats
    }

    /// Binarize holes against crumb, masked to the ROI.
    pub fn segment_holes(self, method: ThresholdMethod) -> AnalysisResult<Segmented> {
        let binary = match method {
            ThresholdMethod::Otsu => {
                let t = otsu_threshold(&self.normalized, None);
                info!("otsu threshold selected: {t}");
                threshold_above(&self.normalized, t)?
            }
            ThresholdMethod::Adaptive => {
                adaptive_mean_threshold(&self.normalized, ADAPTIVE_WINDOW, ADAPTIVE_OFFSET)?
            }
        };
        let raw_holes = binary.and(&self.roi)?;
        info!(
            "holes segmented using {method} method: {} px",
            raw_holes.count_on()
        );
        Ok(Segmented {
            gray: self.gray,
            normalized: self.normalized,
            roi: self.roi,
            raw_holes,
        })
    }
}

impl Segmented {
    pub fn raw_holes(&self) -> &Mask {
        &self.raw_holes
    }

    /// Morphological cleanup of the raw segmentation.
    ///
    /// Opening (when `min_area > 0`) removes pixel noise, closing (when
    /// `gap_fill > 0`) fills small gaps with a kernel sized by
    /// `kernel_policy`, then components with area at or below `min_area`
    /// are dropped and the result is re-masked by the ROI.
    pub fn cleanup(
        self,
        min_area: u64,
        gap_fill: u64,
        kernel_policy: GapFillKernel,
    ) -> AnalysisResult<Cleaned> {
        let cleaned = cleanup_mask(&self.raw_holes, &self.roi, min_area, gap_fill, kernel_policy)?;
        Ok(Cleaned {
            gray: self.gray,
            normalized: self.normalized,
            roi: self.roi,
            raw_holes: self.raw_holes,
            cleaned,
        })
    }
}

/// The cleanup operation itself: noise opening, gap closing, component
/// filtering, ROI re-masking.
///
/// Idempotent once the mask is free of sub-threshold components.
pub fn cleanup_mask(
    holes: &Mask,
    roi: &Mask,
    min_area: u64,
    gap_fill: u64,
    kernel_policy: GapFillKernel,
) -> AnalysisResult<Mask> {
    let mut mask = holes.clone();
    if min_area > 0 {
        let sel = Sel::ellipse(CLEANUP_OPEN_SIZE, CLEANUP_OPEN_SIZE)?;
        mask = open(&mask, &sel)?;
    }
    if gap_fill > 0 {
        let d = kernel_policy.diameter(gap_fill);
        let sel = Sel::ellipse(d, d)?;
        mask = close(&mask, &sel)?;
    }
    let (filtered, removed) = filter_by_area(&mask, min_area, Connectivity::Eight)?;
    info!("cleanup removed {removed} small components");
    Ok(filtered.and(roi)?)
}

impl Cleaned {
    pub fn cleaned_holes(&self) -> &Mask {
        &self.cleaned
    }

    /// Compute the full metrics record from the cleaned mask.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DegenerateRoi`] for an empty ROI mask.
    pub fn compute_metrics(
        &self,
        calibration: porometry_core::Calibration,
    ) -> AnalysisResult<MetricsRecord> {
        metrics::compute_all(&self.cleaned, &self.roi, &self.normalized, calibration)
    }

    /// Every intermediate raster by name.
    pub fn artifacts(&self) -> Artifacts {
        Artifacts {
            grayscale: self.gray.clone(),
            normalized: self.normalized.clone(),
            roi: self.roi.clone(),
            raw_holes: self.raw_holes.clone(),
            cleaned_holes: self.cleaned.clone(),
        }
    }
}

/// Run the whole pipeline under one configuration.
///
/// Validates the configuration before touching the image; nothing is
/// produced on failure.
///
/// # Errors
///
/// Any stage error propagates unchanged; see [`AnalysisError`].
pub fn analyze(gray: Gray8, config: &AnalysisConfig) -> AnalysisResult<AnalysisOutput> {
    let calibration = config.validate()?;
    let cleaned = Grayscale::new(gray)
        .normalize(config.normalize_method)?
        .find_roi(config.roi_threshold)?
        .segment_holes(config.threshold_method)?
        .cleanup(
            config.remove_small_holes,
            config.fill_small_gaps,
            config.gap_fill_kernel,
        )?;
    let record = cleaned.compute_metrics(calibration)?;
    Ok(AnalysisOutput {
        record,
        artifacts: cleaned.artifacts(),
    })
}
