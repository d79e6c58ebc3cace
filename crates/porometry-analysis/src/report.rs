//! Human-readable text report
//!
//! Plain-text summary of a [`MetricsRecord`] for terminal output or log
//! attachment, sectioned by metric family with interpretation hints for
//! the orientation entropy.

use std::fmt::Write;

use crate::metrics::HoleStats;
use crate::record::MetricsRecord;

/// Entropy below this reads as strongly aligned holes.
const ALIGNED_ENTROPY: f64 = 1.5;
/// Entropy above this reads as isotropic hole orientation.
const ISOTROPIC_ENTROPY: f64 = 3.5;

/// Render a sectioned plain-text report of the record.
pub fn format_report(record: &MetricsRecord) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "BREAD POROSITY ANALYSIS REPORT");
    let _ = writeln!(out, "{rule}");

    let p = &record.porosity;
    let _ = writeln!(out, "\n[BASIC POROSITY]");
    let _ = writeln!(out, "  Porosity: {:.2}%", p.percent);
    let _ = writeln!(out, "  Hole pixels: {}", p.hole_pixels);
    let _ = writeln!(out, "  Crumb pixels: {}", p.crumb_pixels);

    let _ = writeln!(out, "\n[HOLE METRICS]");
    match &record.holes {
        HoleStats::Empty => {
            let _ = writeln!(out, "  Number of holes: 0");
        }
        HoleStats::Present(d) => {
            let _ = writeln!(out, "  Number of holes: {}", d.count);
            let _ = writeln!(out, "  Mean hole diameter: {:.2} mm", d.diameter_mean_mm);
            let _ = writeln!(out, "  Largest hole diameter: {:.2} mm", d.diameter_max_mm);
            let _ = writeln!(out, "  Smallest hole diameter: {:.2} mm", d.diameter_min_mm);
            let _ = writeln!(out, "  Hole diameter std: {:.2} mm", d.diameter_std_mm);
            let _ = writeln!(out, "  Coefficient of variation (size): {:.3}", d.area_cv);
            let _ = writeln!(out, "  Holes per cm2: {:.1}", d.holes_per_cm2);
        }
    }

    let a = &record.anisotropy;
    let _ = writeln!(out, "\n[ANISOTROPY & DIRECTIONALITY]");
    let _ = writeln!(out, "  Mean aspect ratio: {:.2}", a.mean_aspect_ratio);
    let _ = writeln!(out, "  Aspect ratio std: {:.2}", a.aspect_ratio_std);
    let _ = writeln!(out, "  Mean orientation: {:.1} deg", a.mean_orientation_deg);
    let _ = writeln!(
        out,
        "  Orientation entropy: {:.2} / 4.17",
        a.orientation_entropy
    );
    if a.orientation_entropy < ALIGNED_ENTROPY {
        let _ = writeln!(out, "    -> Holes are highly aligned/anisotropic");
    } else if a.orientation_entropy > ISOTROPIC_ENTROPY {
        let _ = writeln!(out, "    -> Holes are randomly oriented/isotropic");
    }

    let u = &record.uniformity;
    let _ = writeln!(out, "\n[CRUMB UNIFORMITY]");
    let _ = writeln!(out, "  Mean brightness: {:.1}", u.brightness_mean);
    let _ = writeln!(out, "  Brightness std: {:.1}", u.brightness_std);
    let _ = writeln!(out, "  Coefficient of variation: {:.3}", u.brightness_cv);
    let _ = writeln!(out, "  Brightness skewness: {:.2}", u.brightness_skewness);

    let _ = write!(out, "\n{rule}");
    out
}
