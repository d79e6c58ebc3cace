//! Global and local thresholding
//!
//! Otsu's method picks a single global cutoff from the 256-bin
//! histogram; the adaptive variant derives a per-pixel cutoff from the
//! local window mean, which tolerates residual illumination gradients.
//! Both follow the convention that pixels ABOVE the cutoff are
//! foreground.

use crate::error::{FilterError, FilterResult};
use porometry_core::stats::histogram;
use porometry_core::{Gray8, Mask, MaskMut};

/// Compute the Otsu threshold of an image, optionally restricted to a
/// mask.
///
/// Returns the cutoff `t` that maximizes between-class variance; the
/// foreground class is `v > t`. An empty histogram yields 0.
pub fn otsu_threshold(gray: &Gray8, mask: Option<&Mask>) -> u8 {
    let hist = histogram(gray, mask);
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return 0;
    }

    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut weight_bg = 0.0;
    let mut sum_bg = 0.0;
    let mut best_t = 0u8;
    let mut best_var = -1.0;
    for t in 0..256usize {
        weight_bg += hist[t] as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total as f64 - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += t as f64 * hist[t] as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let between = weight_bg * weight_fg * (mean_bg - mean_fg) * (mean_bg - mean_fg);
        if between > best_var {
            best_var = between;
            best_t = t as u8;
        }
    }
    best_t
}

/// Binarize: ON where `v > t`.
pub fn threshold_above(gray: &Gray8, t: u8) -> FilterResult<Mask> {
    binarize(gray, |v| v > t)
}

/// Binarize: ON where `v >= t`.
pub fn threshold_at_least(gray: &Gray8, t: u8) -> FilterResult<Mask> {
    binarize(gray, |v| v >= t)
}

fn binarize(gray: &Gray8, pred: impl Fn(u8) -> bool) -> FilterResult<Mask> {
    let mut out = MaskMut::new(gray.width(), gray.height())?;
    for y in 0..gray.height() {
        for (x, &v) in gray.row(y).iter().enumerate() {
            if pred(v) {
                out.set_on(x as u32, y);
            }
        }
    }
    Ok(out.into())
}

/// Per-pixel threshold against the local window mean.
///
/// A pixel is ON when `v > local_mean - offset`, with the mean taken
/// over the `window x window` neighborhood clipped to the image.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameter`] for an even or zero window.
pub fn adaptive_mean_threshold(gray: &Gray8, window: u32, offset: f64) -> FilterResult<Mask> {
    if window == 0 || window % 2 == 0 {
        return Err(FilterError::InvalidParameter(format!(
            "adaptive window must be odd, got {window}"
        )));
    }

    let w = gray.width() as i64;
    let h = gray.height() as i64;
    let radius = (window / 2) as i64;

    // Summed-area table with a zero top row and left column.
    let stride = (w + 1) as usize;
    let mut integral = vec![0u64; stride * (h + 1) as usize];
    for y in 0..h {
        let row = gray.row(y as u32);
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += row[x as usize] as u64;
            integral[(y + 1) as usize * stride + (x + 1) as usize] =
                integral[y as usize * stride + (x + 1) as usize] + row_sum;
        }
    }

    let mut out = MaskMut::new(gray.width(), gray.height())?;
    for y in 0..h {
        let y0 = (y - radius).max(0) as usize;
        let y1 = ((y + radius).min(h - 1) + 1) as usize;
        for x in 0..w {
            let x0 = (x - radius).max(0) as usize;
            let x1 = ((x + radius).min(w - 1) + 1) as usize;
            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let area = ((y1 - y0) * (x1 - x0)) as f64;
            let mean = sum as f64 / area;
            if gray.get_unchecked(x as u32, y as u32) as f64 > mean - offset {
                out.set_on(x as u32, y as u32);
            }
        }
    }
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use porometry_core::{Gray8Mut, MaskMut};

    fn bimodal(w: u32, h: u32, lo: u8, hi: u8) -> Gray8 {
        let mut m = Gray8Mut::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                m.set_unchecked(x, y, if x < w / 2 { lo } else { hi });
            }
        }
        m.into()
    }

    #[test]
    fn test_otsu_separates_modes() {
        let g = bimodal(32, 32, 40, 200);
        let t = otsu_threshold(&g, None);
        assert!(t >= 40 && t < 200, "threshold {t} outside modes");

        let mask = threshold_above(&g, t).unwrap();
        assert_eq!(mask.count_on(), 32 * 16);
        assert!(mask.is_on(20, 0));
        assert!(!mask.is_on(2, 0));
    }

    #[test]
    fn test_otsu_respects_mask() {
        // Restricting to the left half leaves a single mode.
        let g = bimodal(32, 32, 40, 200);
        let mut roi = MaskMut::new(32, 32).unwrap();
        for y in 0..32 {
            for x in 0..16 {
                roi.set_on(x, y);
            }
        }
        let roi = roi.into();

        let t = otsu_threshold(&g, Some(&roi));
        assert!(t < 41);
    }

    #[test]
    fn test_otsu_empty_histogram() {
        let g = bimodal(8, 8, 10, 20);
        let empty: Mask = MaskMut::new(8, 8).unwrap().into();
        assert_eq!(otsu_threshold(&g, Some(&empty)), 0);
    }

    #[test]
    fn test_threshold_inclusive_vs_strict() {
        let mut m = Gray8Mut::new(3, 1).unwrap();
        m.set_unchecked(0, 0, 29);
        m.set_unchecked(1, 0, 30);
        m.set_unchecked(2, 0, 31);
        let g: Gray8 = m.into();

        let strict = threshold_above(&g, 30).unwrap();
        assert_eq!(strict.count_on(), 1);
        let inclusive = threshold_at_least(&g, 30).unwrap();
        assert_eq!(inclusive.count_on(), 2);
    }

    #[test]
    fn test_adaptive_flat_image_all_on() {
        let mut m = Gray8Mut::new(16, 16).unwrap();
        m.fill(120);
        let g: Gray8 = m.into();
        let mask = adaptive_mean_threshold(&g, 11, 2.0).unwrap();
        assert_eq!(mask.count_on(), 256);
    }

    #[test]
    fn test_adaptive_marks_dark_spot_off() {
        let mut m = Gray8Mut::new(21, 21).unwrap();
        m.fill(150);
        for y in 9..12 {
            for x in 9..12 {
                m.set_unchecked(x, y, 40);
            }
        }
        let g: Gray8 = m.into();

        let mask = adaptive_mean_threshold(&g, 11, 2.0).unwrap();
        assert!(!mask.is_on(10, 10));
        assert!(mask.is_on(0, 0));
        assert!(mask.is_on(20, 20));
    }

    #[test]
    fn test_adaptive_tolerates_gradient() {
        // A gentle ramp keeps every pixel near its local mean, so a
        // global-style split never appears.
        let mut m = Gray8Mut::new(64, 8).unwrap();
        for y in 0..8 {
            for x in 0..64 {
                m.set_unchecked(x, y, (40 + x * 2) as u8);
            }
        }
        let g: Gray8 = m.into();

        let mask = adaptive_mean_threshold(&g, 11, 2.0).unwrap();
        // Away from the clipped-window borders every pixel sits at its
        // local mean and stays ON.
        for y in 0..8 {
            for x in 8..56 {
                assert!(mask.is_on(x, y), "({x}, {y}) unexpectedly OFF");
            }
        }
    }

    #[test]
    fn test_adaptive_even_window_rejected() {
        let g = bimodal(8, 8, 10, 20);
        assert!(adaptive_mean_threshold(&g, 10, 2.0).is_err());
        assert!(adaptive_mean_threshold(&g, 0, 2.0).is_err());
    }
}
