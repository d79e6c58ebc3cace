//! 8-bit grayscale raster
//!
//! `Gray8` is the fundamental image type of the pipeline: a row-major grid
//! of 8-bit intensity samples, one byte per pixel.
//!
//! # Ownership model
//!
//! `Gray8` uses `Arc` for efficient cloning (shared ownership). Every
//! pipeline stage hands its output downstream by value and keeps a cheap
//! clone for the artifact set. To modify pixel data, convert to
//! [`Gray8Mut`] via [`Gray8::try_into_mut`] or [`Gray8::to_mut`], then
//! convert back with `Into<Gray8>`. Exclusive access is enforced at
//! compile time; an image handed to a downstream stage can no longer be
//! mutated through any live handle.

use crate::error::{Error, Result};
use std::sync::Arc;

#[derive(Debug)]
struct GrayData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Immutable 8-bit grayscale raster with shared ownership
#[derive(Debug, Clone)]
pub struct Gray8 {
    inner: Arc<GrayData>,
}

impl Gray8 {
    /// Create a new zero-filled image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let data = vec![0u8; width as usize * height as usize];
        Ok(Gray8 {
            inner: Arc::new(GrayData {
                width,
                height,
                data,
            }),
        })
    }

    /// Create an image from an existing row-major pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for zero dimensions and
    /// [`Error::BufferSize`] if `data.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Gray8 {
            inner: Arc::new(GrayData {
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

    /// Total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.data.len()
    }

    /// True if the image holds no pixels (never the case for a
    /// successfully constructed image).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.data.is_empty()
    }

    /// Raw access to the pixel buffer, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// One row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &self.inner.data[start..start + w]
    }

    /// Get a pixel value, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.get_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking the coordinates against
    /// the image rectangle (still panics rather than exhibiting UB when
    /// out of range).
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> u8 {
        self.inner.data[y as usize * self.inner.width as usize + x as usize]
    }

    /// Check if two images have the same dimensions.
    pub fn sizes_equal(&self, other: &Gray8) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Per-pixel saturating subtraction (`self - other`, clamped at 0).
    ///
    /// Used for background flattening: subtracting a smooth background
    /// estimate from the original image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the sizes differ.
    pub fn saturating_sub(&self, other: &Gray8) -> Result<Gray8> {
        if !self.sizes_equal(other) {
            return Err(Error::DimensionMismatch {
                expected: (self.inner.width, self.inner.height),
                actual: (other.inner.width, other.inner.height),
            });
        }
        let data = self
            .inner
            .data
            .iter()
            .zip(other.inner.data.iter())
            .map(|(&a, &b)| a.saturating_sub(b))
            .collect();
        Gray8::from_vec(self.inner.width, self.inner.height, data)
    }

    /// Number of strong references to this image.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Try to reclaim exclusive access to the pixel data.
    ///
    /// Succeeds only if this is the sole reference.
    pub fn try_into_mut(self) -> std::result::Result<Gray8Mut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(Gray8Mut { inner: data }),
            Err(arc) => Err(Gray8 { inner: arc }),
        }
    }

    /// Create a mutable deep copy of this image.
    pub fn to_mut(&self) -> Gray8Mut {
        Gray8Mut {
            inner: GrayData {
                width: self.inner.width,
                height: self.inner.height,
                data: self.inner.data.clone(),
            },
        }
    }
}

/// Exclusively owned, mutable grayscale raster
///
/// Convert back to an immutable [`Gray8`] with `Into<Gray8>` once
/// mutation is complete.
#[derive(Debug)]
pub struct Gray8Mut {
    inner: GrayData,
}

impl Gray8Mut {
    /// Create a new zero-filled mutable image.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Gray8::new(width, height)?
            .try_into_mut()
            .expect("fresh image has a single owner"))
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

    /// Raw access to the pixel buffer.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Mutable raw access to the pixel buffer.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Mutable access to one row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &mut self.inner.data[start..start + w]
    }

    /// Get a pixel value without bounds checking.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> u8 {
        self.inner.data[y as usize * self.inner.width as usize + x as usize]
    }

    /// Set a pixel value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] when out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        if x >= self.inner.width || y >= self.inner.height {
            return Err(Error::InvalidParameter(format!(
                "pixel ({x}, {y}) outside {}x{}",
                self.inner.width, self.inner.height
            )));
        }
        self.set_unchecked(x, y, value);
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    #[inline]
    pub fn set_unchecked(&mut self, x: u32, y: u32, value: u8) {
        self.inner.data[y as usize * self.inner.width as usize + x as usize] = value;
    }

    /// Fill the whole image with one value.
    pub fn fill(&mut self, value: u8) {
        self.inner.data.fill(value);
    }
}

impl From<Gray8Mut> for Gray8 {
    fn from(m: Gray8Mut) -> Self {
        Gray8 {
            inner: Arc::new(m.inner),
        }
    }
}
