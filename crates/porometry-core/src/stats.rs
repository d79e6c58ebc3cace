//! Pixel statistics
//!
//! Intensity histograms and moment statistics over an optionally masked
//! grayscale image. These are the numeric primitives behind threshold
//! selection and the crumb-uniformity metrics.
//!
//! Standard deviation here is the population form (divide by N), matching
//! the conventions of the rest of the pipeline.

use crate::gray::Gray8;
use crate::mask::Mask;

/// 256-bin intensity histogram of a grayscale image.
///
/// When `mask` is given, only ON pixels contribute; dimensions of image
/// and mask are expected to match (pixels outside the overlap contribute
/// nothing).
pub fn histogram(gray: &Gray8, mask: Option<&Mask>) -> [u64; 256] {
    let mut hist = [0u64; 256];
    match mask {
        None => {
            for &v in gray.data() {
                hist[v as usize] += 1;
            }
        }
        Some(m) => {
            for (&v, &sel) in gray.data().iter().zip(m.data().iter()) {
                if sel != 0 {
                    hist[v as usize] += 1;
                }
            }
        }
    }
    hist
}

/// Moment statistics of masked pixel intensities
///
/// All-zero when the selection is empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaskedMoments {
    /// Number of selected pixels
    pub count: u64,
    /// Mean intensity
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Coefficient of variation: std / (mean + epsilon)
    pub cv: f64,
    /// Third standardized moment (0 for constant data)
    pub skewness: f64,
}

/// Guard against division blow-up for near-zero means and variances.
const EPS: f64 = 1e-6;

/// Compute mean, standard deviation, CV, and skewness of the intensities
/// selected by `mask` (all pixels when `None`).
pub fn masked_moments(gray: &Gray8, mask: Option<&Mask>) -> MaskedMoments {
    let hist = histogram(gray, mask);
    let count: u64 = hist.iter().sum();
    if count == 0 {
        return MaskedMoments::default();
    }
    let n = count as f64;

    let mean = hist
        .iter()
        .enumerate()
        .map(|(v, &c)| v as f64 * c as f64)
        .sum::<f64>()
        / n;

    let mut m2 = 0.0;
    let mut m3 = 0.0;
    for (v, &c) in hist.iter().enumerate() {
        if c == 0 {
            continue;
        }
        let d = v as f64 - mean;
        m2 += d * d * c as f64;
        m3 += d * d * d * c as f64;
    }
    m2 /= n;
    m3 /= n;

    let std = m2.sqrt();
    let cv = std / (mean + EPS);
    let skewness = if std > EPS { m3 / (std * std * std) } else { 0.0 };

    MaskedMoments {
        count,
        mean,
        std,
        cv,
        skewness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gray::Gray8;
    use crate::mask::Mask;

    #[test]
    fn test_histogram_unmasked() {
        let g = Gray8::from_vec(4, 1, vec![0, 0, 10, 255]).unwrap();
        let h = histogram(&g, None);
        assert_eq!(h[0], 2);
        assert_eq!(h[10], 1);
        assert_eq!(h[255], 1);
        assert_eq!(h.iter().sum::<u64>(), 4);
    }

    #[test]
    fn test_histogram_masked() {
        let g = Gray8::from_vec(4, 1, vec![5, 6, 7, 8]).unwrap();
        let m = Mask::from_vec(4, 1, vec![255, 0, 255, 0]).unwrap();
        let h = histogram(&g, Some(&m));
        assert_eq!(h[5], 1);
        assert_eq!(h[6], 0);
        assert_eq!(h[7], 1);
        assert_eq!(h.iter().sum::<u64>(), 2);
    }

    #[test]
    fn test_moments_constant() {
        let g = Gray8::from_vec(4, 1, vec![100; 4]).unwrap();
        let m = masked_moments(&g, None);
        assert_eq!(m.count, 4);
        assert!((m.mean - 100.0).abs() < 1e-9);
        assert!(m.std.abs() < 1e-9);
        assert!(m.cv.abs() < 1e-6);
        assert_eq!(m.skewness, 0.0);
    }

    #[test]
    fn test_moments_symmetric_has_zero_skew() {
        let g = Gray8::from_vec(4, 1, vec![90, 100, 100, 110]).unwrap();
        let m = masked_moments(&g, None);
        assert!((m.mean - 100.0).abs() < 1e-9);
        assert!(m.skewness.abs() < 1e-9);
    }

    #[test]
    fn test_moments_right_tail_positive_skew() {
        let g = Gray8::from_vec(5, 1, vec![10, 10, 10, 10, 200]).unwrap();
        let m = masked_moments(&g, None);
        assert!(m.skewness > 0.0);
    }

    #[test]
    fn test_moments_empty_selection() {
        let g = Gray8::from_vec(4, 1, vec![1, 2, 3, 4]).unwrap();
        let m = Mask::new(4, 1).unwrap();
        let s = masked_moments(&g, Some(&m));
        assert_eq!(s, MaskedMoments::default());
    }
}
