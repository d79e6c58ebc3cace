//! The metrics record and its JSON export adapter
//!
//! In memory the record is a structured composite of typed metric
//! groups. For export it flattens to the flat key set downstream
//! consumers (spreadsheets, dashboards) already expect, with
//! [`HoleStats::Empty`] rendered as zeroed/empty fields.

use serde::Serialize;

use crate::error::AnalysisResult;
use crate::metrics::{Anisotropy, CrumbUniformity, HoleStats, Porosity};

/// All metrics computed from one image. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub porosity: Porosity,
    pub holes: HoleStats,
    pub anisotropy: Anisotropy,
    pub uniformity: CrumbUniformity,
}

/// Flat export shape with stable field names for downstream consumers.
#[derive(Debug, Serialize)]
struct FlatRecord {
    porosity_fraction: f64,
    porosity_percent: f64,
    hole_pixels: u64,
    roi_pixels: u64,
    crumb_pixels: u64,
    num_holes: u32,
    mean_hole_area_pixels: f64,
    mean_hole_area_mm2: f64,
    mean_hole_diameter_mm: f64,
    hole_diameter_std_mm: f64,
    hole_diameter_min_mm: f64,
    hole_diameter_max_mm: f64,
    largest_hole_area_pixels: f64,
    smallest_hole_area_pixels: f64,
    hole_area_std_pixels: f64,
    hole_area_std_mm2: f64,
    hole_area_cv: f64,
    holes_per_cm2: f64,
    hole_area_distribution: Vec<f64>,
    hole_diameters_mm: Vec<f64>,
    mean_aspect_ratio: f64,
    aspect_ratio_std: f64,
    mean_orientation_deg: f64,
    orientation_entropy: f64,
    crumb_brightness_mean: f64,
    crumb_brightness_std: f64,
    crumb_brightness_cv: f64,
    crumb_brightness_skewness: f64,
    uniformity_score: f64,
}

impl MetricsRecord {
    /// Serialize to the flat JSON shape.
    ///
    /// # Errors
    ///
    /// Returns a serialization error variant on encoder failure.
    pub fn to_json(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(&self.flatten())?)
    }

    fn flatten(&self) -> FlatRecord {
        let p = &self.porosity;
        let a = &self.anisotropy;
        let u = &self.uniformity;

        let mut flat = FlatRecord {
            porosity_fraction: p.fraction,
            porosity_percent: p.percent,
            hole_pixels: p.hole_pixels,
            roi_pixels: p.roi_pixels,
            crumb_pixels: p.crumb_pixels,
            num_holes: 0,
            mean_hole_area_pixels: 0.0,
            mean_hole_area_mm2: 0.0,
            mean_hole_diameter_mm: 0.0,
            hole_diameter_std_mm: 0.0,
            hole_diameter_min_mm: 0.0,
            hole_diameter_max_mm: 0.0,
            largest_hole_area_pixels: 0.0,
            smallest_hole_area_pixels: 0.0,
            hole_area_std_pixels: 0.0,
            hole_area_std_mm2: 0.0,
            hole_area_cv: 0.0,
            holes_per_cm2: 0.0,
            hole_area_distribution: Vec::new(),
            hole_diameters_mm: Vec::new(),
            mean_aspect_ratio: a.mean_aspect_ratio,
            aspect_ratio_std: a.aspect_ratio_std,
            mean_orientation_deg: a.mean_orientation_deg,
            orientation_entropy: a.orientation_entropy,
            crumb_brightness_mean: u.brightness_mean,
            crumb_brightness_std: u.brightness_std,
            crumb_brightness_cv: u.brightness_cv,
            crumb_brightness_skewness: u.brightness_skewness,
            uniformity_score: u.uniformity_score,
        };

        if let HoleStats::Present(d) = &self.holes {
            flat.num_holes = d.count;
            flat.mean_hole_area_pixels = d.mean_area_px;
            flat.mean_hole_area_mm2 = d.mean_area_mm2;
            flat.mean_hole_diameter_mm = d.diameter_mean_mm;
            flat.hole_diameter_std_mm = d.diameter_std_mm;
            flat.hole_diameter_min_mm = d.diameter_min_mm;
            flat.hole_diameter_max_mm = d.diameter_max_mm;
            flat.largest_hole_area_pixels = d.largest_area_px;
            flat.smallest_hole_area_pixels = d.smallest_area_px;
            flat.hole_area_std_pixels = d.area_std_px;
            flat.hole_area_std_mm2 = d.area_std_mm2;
            flat.hole_area_cv = d.area_cv;
            flat.holes_per_cm2 = d.holes_per_cm2;
            flat.hole_area_distribution = d.areas_px.clone();
            flat.hole_diameters_mm = d.diameters_mm.clone();
        }
        flat
    }
}
