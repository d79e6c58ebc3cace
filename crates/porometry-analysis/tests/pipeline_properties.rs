//! End-to-end properties of the analysis pipeline on synthetic scenes.

use porometry_analysis::{
    AnalysisConfig, GapFillKernel, HoleStats, NormalizeMethod, analyze, cleanup_mask,
    format_report,
};
use porometry_core::{Gray8, Mask, MaskMut};
use porometry_test::{crumb_with_hole_grid, flat_gray, paint_rect, rect_mask};

/// The headline scenario: a crumb plateau filling the frame with a 5x5
/// grid of square pores. Porosity is the exact pore-to-ROI pixel ratio
/// and every pore has the same equivalent diameter.
#[test]
fn test_end_to_end_porosity_scenario() {
    let img = crumb_with_hole_grid(1000, 1000, 128, 250, 100, 100, 10, 150, 5, 5);
    let gray: Gray8 = img.into();

    let config = AnalysisConfig {
        remove_small_holes: 0,
        fill_small_gaps: 0,
        ..AnalysisConfig::default()
    };
    let out = analyze(gray, &config).unwrap();

    let p = &out.record.porosity;
    assert_eq!(p.hole_pixels, 25 * 100);
    // ROI smoothing erodes a thin border ring, so the measured porosity
    // sits just above the full-frame 0.25%.
    assert!((p.percent - 0.25).abs() < 0.01, "porosity {}", p.percent);

    let HoleStats::Present(d) = &out.record.holes else {
        panic!("expected 25 holes");
    };
    assert_eq!(d.count, 25);
    let expected_diameter = 2.0 * (1.0 / std::f64::consts::PI).sqrt();
    assert!((d.diameter_mean_mm - expected_diameter).abs() < 0.01);
    assert!(d.diameter_std_mm < 0.01);

    assert!(out.record.uniformity.uniformity_score > 0.0);
    assert!(out.record.uniformity.uniformity_score <= 1.0);
}

#[test]
fn test_cleanup_idempotent() {
    // Two solid pores (one with a 1-px protrusion the opening removes)
    // plus a speck below the area threshold.
    let mut holes = MaskMut::new(100, 100).unwrap();
    for y in 30..40 {
        for x in 30..40 {
            holes.set_on(x, y);
        }
    }
    holes.set_on(40, 40);
    for y in 60..70 {
        for x in 60..70 {
            holes.set_on(x, y);
        }
    }
    holes.set_on(80, 20);
    let holes: Mask = holes.into();
    let roi = rect_mask(100, 100, 5, 5, 90, 90);

    let once = cleanup_mask(&holes, &roi, 50, 50, GapFillKernel::Fixed3x3).unwrap();
    let twice = cleanup_mask(&once, &roi, 50, 50, GapFillKernel::Fixed3x3).unwrap();
    assert!(once.equals(&twice));
    assert!(!once.is_on(80, 20));
    assert!(once.is_on(35, 35));
    assert!(once.is_on(65, 65));
}

#[test]
fn test_unknown_method_rejected() {
    assert!("bogus".parse::<NormalizeMethod>().is_err());
    assert!(
        serde_json::from_str::<AnalysisConfig>(r#"{"normalize_method": "bogus"}"#).is_err()
    );
}

#[test]
fn test_report_and_json_from_full_run() {
    let mut img = flat_gray(200, 200, 120);
    paint_rect(&mut img, 50, 50, 14, 14, 250);
    paint_rect(&mut img, 120, 120, 14, 14, 250);
    let gray: Gray8 = img.into();

    let out = analyze(gray, &AnalysisConfig::default()).unwrap();

    let report = format_report(&out.record);
    assert!(report.contains("BREAD POROSITY ANALYSIS REPORT"));
    assert!(report.contains("Number of holes: 2"));

    let json = out.record.to_json().unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["num_holes"], 2);
    assert!(v["porosity_percent"].as_f64().unwrap() > 0.0);
    assert_eq!(
        v["hole_pixels"].as_u64().unwrap(),
        out.record.porosity.hole_pixels
    );
}
