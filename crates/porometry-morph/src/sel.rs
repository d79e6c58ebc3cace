//! Structuring elements
//!
//! A `Sel` is a set of (dx, dy) hit offsets relative to its center.
//! Two shapes cover everything the pipeline needs: solid rectangles
//! (bricks) and inscribed ellipses. The elliptical shape matches the
//! usual raster construction: for each row the half-width is
//! `rx * sqrt(1 - (dy/ry)^2)` rounded to nearest, which degenerates to a
//! cross for 3x3 and to a disc for larger odd sizes.

use crate::error::{MorphError, MorphResult};

/// Structuring element: a centered set of hit offsets
#[derive(Debug, Clone)]
pub struct Sel {
    width: u32,
    height: u32,
    hits: Vec<(i32, i32)>,
}

impl Sel {
    /// Create a solid rectangular (brick) element.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] for zero dimensions.
    pub fn brick(width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "brick dimensions must be positive, got {width}x{height}"
            )));
        }
        let cx = (width / 2) as i32;
        let cy = (height / 2) as i32;
        let mut hits = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                hits.push((x - cx, y - cy));
            }
        }
        Ok(Sel {
            width,
            height,
            hits,
        })
    }

    /// Create an inscribed elliptical element.
    ///
    /// For each row offset `dy`, hits span the half-width
    /// `round(rx * sqrt(1 - (dy/ry)^2))`. A 3x3 ellipse is a cross; a 1x1
    /// ellipse is the identity element.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] for zero dimensions.
    pub fn ellipse(width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "ellipse dimensions must be positive, got {width}x{height}"
            )));
        }
        let rx = ((width - 1) / 2) as f64;
        let ry = ((height - 1) / 2) as f64;
        let cy = (height / 2) as i32;
        let mut hits = Vec::new();
        for y in 0..height as i32 {
            let dy = (y - cy) as f64;
            let half = if ry > 0.0 {
                let t = 1.0 - (dy / ry) * (dy / ry);
                if t < 0.0 {
                    continue;
                }
                (rx * t.sqrt()).round() as i32
            } else {
                rx.round() as i32
            };
            for dx in -half..=half {
                hits.push((dx, y - cy));
            }
        }
        Ok(Sel {
            width,
            height,
            hits,
        })
    }

    /// Square elliptical element of the given odd diameter.
    pub fn disc(diameter: u32) -> MorphResult<Self> {
        Self::ellipse(diameter, diameter)
    }

    /// Nominal width of the element.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Nominal height of the element.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of hit positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// True when the element has no hits (cannot happen for constructed
    /// elements).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Iterate over (dx, dy) hit offsets relative to the center.
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.hits.iter().copied()
    }
}
