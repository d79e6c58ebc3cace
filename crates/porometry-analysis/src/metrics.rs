//! Quantitative crumb metrics
//!
//! Pure computations from the cleaned hole mask, the ROI mask, and the
//! normalized image. Hole areas convert to real units through the pixel
//! calibration; equivalent diameters assume circular holes
//! (d = 2 * sqrt(area / pi)). Standard deviations are population form
//! throughout.

use log::{debug, info};
use porometry_core::stats::masked_moments;
use porometry_core::{Calibration, Gray8, Mask};
use porometry_region::{Connectivity, boundary_points, fit_ellipse, label_components};
use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::record::MetricsRecord;

/// Guard against division blow-up for near-zero denominators.
const EPS: f64 = 1e-6;

/// Number of 10-degree orientation histogram bins over [0, 180).
pub const ORIENTATION_BINS: usize = 18;

/// Additive probability floor inside the entropy logarithm.
const ENTROPY_FLOOR: f64 = 1e-10;

/// Area-fraction porosity and the raw pixel counts behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Porosity {
    /// Hole pixels / ROI pixels
    pub fraction: f64,
    /// Fraction scaled to percent
    pub percent: f64,
    /// ON pixels in the cleaned hole mask
    pub hole_pixels: u64,
    /// ON pixels in the ROI mask
    pub roi_pixels: u64,
    /// ROI pixels not covered by holes
    pub crumb_pixels: u64,
}

/// Per-hole size statistics, present only when at least one hole exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoleDistribution {
    /// Number of hole components
    pub count: u32,
    /// Per-hole pixel areas
    pub areas_px: Vec<f64>,
    /// Per-hole areas in mm^2
    pub areas_mm2: Vec<f64>,
    /// Per-hole equivalent circular diameters in mm
    pub diameters_mm: Vec<f64>,
    /// Mean hole area in pixels
    pub mean_area_px: f64,
    /// Mean hole area in mm^2
    pub mean_area_mm2: f64,
    /// Population std of pixel areas
    pub area_std_px: f64,
    /// Population std of mm^2 areas
    pub area_std_mm2: f64,
    /// Area coefficient of variation (0 when the mean is 0)
    pub area_cv: f64,
    /// Mean equivalent diameter in mm
    pub diameter_mean_mm: f64,
    /// Population std of equivalent diameters in mm
    pub diameter_std_mm: f64,
    /// Smallest equivalent diameter in mm
    pub diameter_min_mm: f64,
    /// Largest equivalent diameter in mm
    pub diameter_max_mm: f64,
    /// Largest hole area in pixels
    pub largest_area_px: f64,
    /// Smallest hole area in pixels
    pub smallest_area_px: f64,
    /// Hole count per cm^2 of ROI
    pub holes_per_cm2: f64,
}

/// Hole-level statistics: explicitly empty or present.
///
/// Zero detected holes is a legitimate measurement (dense crumb), not an
/// error, so callers pattern-match instead of testing sentinel zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HoleStats {
    Empty,
    Present(HoleDistribution),
}

impl HoleStats {
    /// Number of holes, 0 when empty.
    pub fn count(&self) -> u32 {
        match self {
            HoleStats::Empty => 0,
            HoleStats::Present(d) => d.count,
        }
    }
}

/// Shape and orientation statistics over ellipse-fitted holes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anisotropy {
    /// Mean major/minor axis ratio
    pub mean_aspect_ratio: f64,
    /// Population std of aspect ratios
    pub aspect_ratio_std: f64,
    /// Mean major-axis orientation in degrees [0, 180)
    pub mean_orientation_deg: f64,
    /// Shannon entropy (bits) of the 18-bin orientation histogram
    pub orientation_entropy: f64,
}

impl Default for Anisotropy {
    /// Neutral values reported when fewer than 2 holes can be fitted.
    fn default() -> Self {
        Anisotropy {
            mean_aspect_ratio: 1.0,
            aspect_ratio_std: 0.0,
            mean_orientation_deg: 0.0,
            orientation_entropy: 0.0,
        }
    }
}

/// Brightness uniformity of the crumb inside the ROI.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CrumbUniformity {
    /// Mean normalized brightness over the ROI
    pub brightness_mean: f64,
    /// Population std of brightness
    pub brightness_std: f64,
    /// std / (mean + epsilon); 0 = perfectly uniform
    pub brightness_cv: f64,
    /// Third standardized moment of brightness
    pub brightness_skewness: f64,
    /// clamp(1 - CV, 0, 1); 1 = perfectly uniform
    pub uniformity_score: f64,
}

/// Compute every metric from the pipeline outputs.
///
/// # Errors
///
/// Returns [`AnalysisError::DegenerateRoi`] when the ROI mask has no ON
/// pixels, and dimension-mismatch errors when the rasters disagree in
/// size.
pub fn compute_all(
    holes: &Mask,
    roi: &Mask,
    normalized: &Gray8,
    calibration: Calibration,
) -> AnalysisResult<MetricsRecord> {
    let porosity = compute_porosity(holes, roi)?;
    let hole_stats = compute_hole_stats(holes, porosity.roi_pixels, calibration)?;
    let anisotropy = compute_anisotropy(holes)?;
    let uniformity = compute_uniformity(normalized, roi);

    info!(
        "metrics computed: porosity {:.2}%, {} holes",
        porosity.percent,
        hole_stats.count()
    );

    Ok(MetricsRecord {
        porosity,
        holes: hole_stats,
        anisotropy,
        uniformity,
    })
}

/// Porosity as the hole-to-ROI area ratio.
///
/// # Errors
///
/// Returns [`AnalysisError::DegenerateRoi`] for an empty ROI.
pub fn compute_porosity(holes: &Mask, roi: &Mask) -> AnalysisResult<Porosity> {
    if !holes.sizes_equal(roi) {
        return Err(porometry_core::Error::DimensionMismatch {
            expected: (roi.width(), roi.height()),
            actual: (holes.width(), holes.height()),
        }
        .into());
    }
    let roi_pixels = roi.count_on();
    if roi_pixels == 0 {
        return Err(AnalysisError::DegenerateRoi);
    }
    let hole_pixels = holes.count_on();
    let fraction = hole_pixels as f64 / roi_pixels as f64;
    Ok(Porosity {
        fraction,
        percent: fraction * 100.0,
        hole_pixels,
        roi_pixels,
        crumb_pixels: roi_pixels - hole_pixels,
    })
}

/// Per-hole size distribution over the labeled hole mask.
pub fn compute_hole_stats(
    holes: &Mask,
    roi_pixels: u64,
    calibration: Calibration,
) -> AnalysisResult<HoleStats> {
    let map = label_components(holes, Connectivity::Eight)?;
    let count = map.num_components();
    if count == 0 {
        debug!("no hole components found");
        return Ok(HoleStats::Empty);
    }

    let areas_px: Vec<f64> = map.areas()[1..].iter().map(|&a| a as f64).collect();
    let areas_mm2: Vec<f64> = map.areas()[1..]
        .iter()
        .map(|&a| calibration.px_area_to_mm2(a as f64))
        .collect();
    let diameters_mm: Vec<f64> = areas_px
        .iter()
        .map(|&a| calibration.px_to_mm(2.0 * (a / std::f64::consts::PI).sqrt()))
        .collect();

    let (mean_area_px, area_std_px) = mean_std(&areas_px);
    let (mean_area_mm2, area_std_mm2) = mean_std(&areas_mm2);
    let (diameter_mean_mm, diameter_std_mm) = mean_std(&diameters_mm);
    let area_cv = if mean_area_px > 0.0 {
        area_std_px / mean_area_px
    } else {
        0.0
    };

    let roi_area_cm2 = calibration.px_area_to_cm2(roi_pixels as f64);
    let holes_per_cm2 = count as f64 / roi_area_cm2;

    let min_max = |v: &[f64]| {
        v.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
    };
    let (diameter_min_mm, diameter_max_mm) = min_max(&diameters_mm);
    let (smallest_area_px, largest_area_px) = min_max(&areas_px);

    debug!(
        "{count} holes, mean diameter {diameter_mean_mm:.2} mm, {holes_per_cm2:.1} holes/cm2"
    );

    Ok(HoleStats::Present(HoleDistribution {
        count,
        areas_px,
        areas_mm2,
        diameters_mm,
        mean_area_px,
        mean_area_mm2,
        area_std_px,
        area_std_mm2,
        area_cv,
        diameter_mean_mm,
        diameter_std_mm,
        diameter_min_mm,
        diameter_max_mm,
        largest_area_px,
        smallest_area_px,
        holes_per_cm2,
    }))
}

/// Ellipse-fit anisotropy over the hole components.
///
/// Components whose boundary has fewer than 5 points, or whose fit
/// degenerates, are skipped. Fewer than 2 usable components yields
/// neutral defaults.
pub fn compute_anisotropy(holes: &Mask) -> AnalysisResult<Anisotropy> {
    let map = label_components(holes, Connectivity::Eight)?;
    if map.num_components() < 2 {
        return Ok(Anisotropy::default());
    }

    let mut aspect_ratios = Vec::new();
    let mut orientations = Vec::new();
    for label in 1..=map.num_components() {
        let component = map.component_mask(label)?;
        let points = boundary_points(&component);
        if points.len() < 5 {
            continue;
        }
        let Some(fit) = fit_ellipse(&points) else {
            continue;
        };
        aspect_ratios.push(fit.major / (fit.minor + EPS));
        orientations.push(fit.angle_deg.rem_euclid(180.0));
    }

    if aspect_ratios.len() < 2 {
        return Ok(Anisotropy::default());
    }

    let (mean_aspect_ratio, aspect_ratio_std) = mean_std(&aspect_ratios);
    let (mean_orientation_deg, _) = mean_std(&orientations);
    Ok(Anisotropy {
        mean_aspect_ratio,
        aspect_ratio_std,
        mean_orientation_deg,
        orientation_entropy: orientation_entropy(&orientations),
    })
}

/// Shannon entropy (bits) of orientations binned into 18 buckets of 10
/// degrees.
///
/// 0 when every orientation falls in one bin; log2(18) ~ 4.17 for a
/// uniform spread. Empty input yields 0.
pub fn orientation_entropy(orientations_deg: &[f64]) -> f64 {
    if orientations_deg.is_empty() {
        return 0.0;
    }
    let mut hist = [0u64; ORIENTATION_BINS];
    for &angle in orientations_deg {
        let a = angle.rem_euclid(180.0);
        let bin = ((a / 10.0) as usize).min(ORIENTATION_BINS - 1);
        hist[bin] += 1;
    }
    let total = orientations_deg.len() as f64;
    -hist
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * (p + ENTROPY_FLOOR).log2()
        })
        .sum::<f64>()
}

/// Brightness uniformity of the normalized image inside the ROI.
///
/// Empty ROI degrades to all-zero defaults; `compute_all` raises
/// [`AnalysisError::DegenerateRoi`] before reaching that case.
pub fn compute_uniformity(normalized: &Gray8, roi: &Mask) -> CrumbUniformity {
    let m = masked_moments(normalized, Some(roi));
    if m.count == 0 {
        return CrumbUniformity::default();
    }
    CrumbUniformity {
        brightness_mean: m.mean,
        brightness_std: m.std,
        brightness_cv: m.cv,
        brightness_skewness: m.skewness,
        uniformity_score: (1.0 - m.cv).clamp(0.0, 1.0),
    }
}

/// Mean and population standard deviation of a sample.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}
