//! 3-channel color raster
//!
//! A minimal interleaved RGB container. The pipeline itself works on
//! grayscale; `Rgb8` exists so the original photograph can be carried
//! through to renderers (annotated overlays) and converted to luma as the
//! first pipeline step.

use crate::error::{Error, Result};
use crate::gray::{Gray8, Gray8Mut};
use std::sync::Arc;

#[derive(Debug)]
struct RgbData {
    width: u32,
    height: u32,
    /// Interleaved R, G, B samples, row-major.
    data: Vec<u8>,
}

/// Immutable interleaved RGB raster
#[derive(Debug, Clone)]
pub struct Rgb8 {
    inner: Arc<RgbData>,
}

impl Rgb8 {
    /// Create an image from an interleaved RGB buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `data.len() != width * height * 3`.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Rgb8 {
            inner: Arc::new(RgbData {
                width,
                height,
                data,
            }),
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Raw access to the interleaved sample buffer.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the (r, g, b) triple at (x, y), or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        let i = (y as usize * self.inner.width as usize + x as usize) * 3;
        Some((
            self.inner.data[i],
            self.inner.data[i + 1],
            self.inner.data[i + 2],
        ))
    }

    /// Convert to grayscale using Rec. 601 luma weights
    /// (0.299 R + 0.587 G + 0.114 B), rounded to nearest.
    pub fn to_luma(&self) -> Gray8 {
        let mut out = Gray8Mut::new(self.inner.width, self.inner.height)
            .expect("source dimensions already validated");
        for (dst, rgb) in out.data_mut().iter_mut().zip(self.inner.data.chunks_exact(3)) {
            let luma =
                0.299 * f32::from(rgb[0]) + 0.587 * f32::from(rgb[1]) + 0.114 * f32::from(rgb[2]);
            *dst = luma.round().clamp(0.0, 255.0) as u8;
        }
        out.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_size_check() {
        assert!(Rgb8::from_vec(2, 2, vec![0; 12]).is_ok());
        assert!(Rgb8::from_vec(2, 2, vec![0; 11]).is_err());
    }

    #[test]
    fn test_to_luma_weights() {
        // Pure red, green, blue, white pixels
        let data = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let rgb = Rgb8::from_vec(4, 1, data).unwrap();
        let gray = rgb.to_luma();
        assert_eq!(gray.get_unchecked(0, 0), 76); // 0.299 * 255
        assert_eq!(gray.get_unchecked(1, 0), 150); // 0.587 * 255
        assert_eq!(gray.get_unchecked(2, 0), 29); // 0.114 * 255
        assert_eq!(gray.get_unchecked(3, 0), 255);
    }

    #[test]
    fn test_get() {
        let rgb = Rgb8::from_vec(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(rgb.get(1, 0), Some((4, 5, 6)));
        assert_eq!(rgb.get(2, 0), None);
    }
}
