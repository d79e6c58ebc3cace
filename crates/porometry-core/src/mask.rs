//! Binary mask raster
//!
//! `Mask` is a raster restricted to {0, 255}: a boolean per-pixel
//! predicate such as ROI membership or hole membership. It shares the
//! ownership model of [`Gray8`](crate::Gray8): cheap `Arc` clones,
//! mutation through an exclusive [`MaskMut`].
//!
//! ON pixels are stored as 255 so masks render directly as white-on-black
//! images without conversion.

use crate::error::{Error, Result};
use std::sync::Arc;

/// Stored value of an ON pixel.
pub const ON: u8 = 255;

#[derive(Debug)]
struct MaskData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Immutable binary mask with shared ownership
#[derive(Debug, Clone)]
pub struct Mask {
    inner: Arc<MaskData>,
}

impl Mask {
    /// Create a new all-OFF mask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Mask {
            inner: Arc::new(MaskData {
                width,
                height,
                data: vec![0u8; width as usize * height as usize],
            }),
        })
    }

    /// Create an all-ON mask.
    pub fn filled(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Mask {
            inner: Arc::new(MaskData {
                width,
                height,
                data: vec![ON; width as usize * height as usize],
            }),
        })
    }

    /// Create a mask from a raw buffer; any nonzero byte becomes ON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `data.len() != width * height`.
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
        let data = data.into_iter().map(|v| if v != 0 { ON } else { 0 }).collect();
        Ok(Mask {
            inner: Arc::new(MaskData {
                width,
                height,
                data,
            }),
        })
    }

    /// Mask width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Mask height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Raw access to the mask buffer (values are 0 or 255).
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Whether the pixel at (x, y) is ON; out-of-bounds reads are OFF.
    #[inline]
    pub fn is_on(&self, x: u32, y: u32) -> bool {
        x < self.inner.width
            && y < self.inner.height
            && self.inner.data[y as usize * self.inner.width as usize + x as usize] != 0
    }

    /// Number of ON pixels.
    pub fn count_on(&self) -> u64 {
        self.inner.data.iter().filter(|&&v| v != 0).count() as u64
    }

    /// Check if two masks have the same dimensions.
    pub fn sizes_equal(&self, other: &Mask) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Pixel-wise equality.
    pub fn equals(&self, other: &Mask) -> bool {
        self.sizes_equal(other) && self.inner.data == other.inner.data
    }

    /// Intersection of two masks (`self AND other`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the sizes differ.
    pub fn and(&self, other: &Mask) -> Result<Mask> {
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
            .map(|(&a, &b)| if a != 0 && b != 0 { ON } else { 0 })
            .collect();
        Ok(Mask {
            inner: Arc::new(MaskData {
                width: self.inner.width,
                height: self.inner.height,
                data,
            }),
        })
    }

    /// Try to reclaim exclusive access to the mask data.
    pub fn try_into_mut(self) -> std::result::Result<MaskMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(MaskMut { inner: data }),
            Err(arc) => Err(Mask { inner: arc }),
        }
    }

    /// Create a mutable deep copy of this mask.
    pub fn to_mut(&self) -> MaskMut {
        MaskMut {
            inner: MaskData {
                width: self.inner.width,
                height: self.inner.height,
                data: self.inner.data.clone(),
            },
        }
    }
}

/// Exclusively owned, mutable binary mask
#[derive(Debug)]
pub struct MaskMut {
    inner: MaskData,
}

impl MaskMut {
    /// Create a new all-OFF mutable mask.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Mask::new(width, height)?
            .try_into_mut()
            .expect("fresh mask has a single owner"))
    }

    /// Mask width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Mask height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Raw access to the mask buffer.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Mutable raw access to the mask buffer.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Whether the pixel at (x, y) is ON; out-of-bounds reads are OFF.
    #[inline]
    pub fn is_on(&self, x: u32, y: u32) -> bool {
        x < self.inner.width
            && y < self.inner.height
            && self.inner.data[y as usize * self.inner.width as usize + x as usize] != 0
    }

    /// Turn the pixel at (x, y) ON.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_on(&mut self, x: u32, y: u32) {
        self.inner.data[y as usize * self.inner.width as usize + x as usize] = ON;
    }

    /// Turn the pixel at (x, y) OFF.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_off(&mut self, x: u32, y: u32) {
        self.inner.data[y as usize * self.inner.width as usize + x as usize] = 0;
    }

    /// Turn all pixels OFF.
    pub fn clear(&mut self) {
        self.inner.data.fill(0);
    }
}

impl From<MaskMut> for Mask {
    fn from(m: MaskMut) -> Self {
        Mask {
            inner: Arc::new(m.inner),
        }
    }
}
