//! Gaussian smoothing
//!
//! Separable Gaussian blur with replicated borders. Large kernels
//! (the illumination pipeline uses 101x101 with sigma 50) stay cheap
//! because the two 1-D passes cost O(k) per pixel instead of O(k^2).

use crate::error::{FilterError, FilterResult};
use porometry_core::{Gray8, Gray8Mut};

/// Blur a grayscale image with a Gaussian kernel.
///
/// `ksize` is the full kernel width and must be odd. Border pixels are
/// replicated.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameter`] for an even or zero kernel
/// size, or a non-positive sigma.
pub fn gaussian_blur(gray: &Gray8, ksize: u32, sigma: f64) -> FilterResult<Gray8> {
    if ksize == 0 || ksize % 2 == 0 {
        return Err(FilterError::InvalidParameter(format!(
            "kernel size must be odd, got {ksize}"
        )));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FilterError::InvalidParameter(format!(
            "sigma must be positive, got {sigma}"
        )));
    }

    let kernel = gaussian_kernel(ksize, sigma);
    let radius = (ksize / 2) as i64;
    let w = gray.width() as i64;
    let h = gray.height() as i64;

    // Horizontal pass into a float buffer to avoid double rounding.
    let mut tmp = vec![0.0f64; (w * h) as usize];
    for y in 0..h {
        let row = gray.row(y as u32);
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = (x + k as i64 - radius).clamp(0, w - 1);
                acc += weight * row[sx as usize] as f64;
            }
            tmp[(y * w + x) as usize] = acc;
        }
    }

    // Vertical pass with rounding to u8.
    let mut out = Gray8Mut::new(gray.width(), gray.height())?;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = (y + k as i64 - radius).clamp(0, h - 1);
                acc += weight * tmp[(sy * w + x) as usize];
            }
            out.set_unchecked(x as u32, y as u32, acc.round().clamp(0.0, 255.0) as u8);
        }
    }
    Ok(out.into())
}

fn gaussian_kernel(ksize: u32, sigma: f64) -> Vec<f64> {
    let radius = (ksize / 2) as i64;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;
    use porometry_core::Gray8Mut;

    #[test]
    fn test_uniform_image_unchanged() {
        let mut m = Gray8Mut::new(16, 16).unwrap();
        m.fill(90);
        let g: Gray8 = m.into();
        let blurred = gaussian_blur(&g, 7, 2.0).unwrap();
        assert!(blurred.data().iter().all(|&v| v == 90));
    }

    #[test]
    fn test_impulse_spreads_symmetrically() {
        let mut m = Gray8Mut::new(11, 11).unwrap();
        m.set_unchecked(5, 5, 255);
        let g: Gray8 = m.into();

        let blurred = gaussian_blur(&g, 5, 1.0).unwrap();
        let center = blurred.get_unchecked(5, 5);
        assert!(center > 0 && center < 255);
        assert_eq!(blurred.get_unchecked(4, 5), blurred.get_unchecked(6, 5));
        assert_eq!(blurred.get_unchecked(5, 4), blurred.get_unchecked(5, 6));
        assert_eq!(blurred.get_unchecked(4, 4), blurred.get_unchecked(6, 6));
        assert!(blurred.get_unchecked(4, 5) < center);
    }

    #[test]
    fn test_kernel_is_normalized() {
        for (ksize, sigma) in [(3, 0.8), (11, 2.0), (101, 50.0)] {
            let k = gaussian_kernel(ksize, sigma);
            let sum: f64 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
            assert_eq!(k.len(), ksize as usize);
        }
    }

    #[test]
    fn test_reduces_contrast_of_step() {
        let mut m = Gray8Mut::new(20, 5).unwrap();
        for y in 0..5 {
            for x in 10..20 {
                m.set_unchecked(x, y, 200);
            }
        }
        let g: Gray8 = m.into();

        let blurred = gaussian_blur(&g, 9, 3.0).unwrap();
        // The edge softens toward the midpoint from both sides.
        assert!(blurred.get_unchecked(9, 2) > 0);
        assert!(blurred.get_unchecked(10, 2) < 200);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let g: Gray8 = {
            let mut m = Gray8Mut::new(4, 4).unwrap();
            m.fill(10);
            m.into()
        };
        assert!(gaussian_blur(&g, 4, 1.0).is_err());
        assert!(gaussian_blur(&g, 0, 1.0).is_err());
        assert!(gaussian_blur(&g, 3, 0.0).is_err());
        assert!(gaussian_blur(&g, 3, f64::NAN).is_err());
    }
}
