//! Contrast-limited adaptive histogram equalization
//!
//! The image is divided into a grid of tiles; each tile gets its own
//! clipped-histogram equalization lookup table, and pixels are mapped by
//! bilinear interpolation between the four nearest tile tables. Clipping
//! the histogram before building the CDF bounds the local contrast gain,
//! which keeps noise in flat crumb regions from being amplified.

use crate::error::{FilterError, FilterResult};
use porometry_core::{Gray8, Gray8Mut};

/// Parameters for adaptive equalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaheParams {
    /// Contrast limit as a multiple of the uniform histogram level.
    pub clip_limit: f64,
    /// Tile grid columns.
    pub tiles_x: u32,
    /// Tile grid rows.
    pub tiles_y: u32,
}

impl Default for ClaheParams {
    fn default() -> Self {
        ClaheParams {
            clip_limit: 2.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

impl ClaheParams {
    fn validate(&self, width: u32, height: u32) -> FilterResult<()> {
        if !self.clip_limit.is_finite() || self.clip_limit <= 0.0 {
            return Err(FilterError::InvalidParameter(format!(
                "clip limit must be positive, got {}",
                self.clip_limit
            )));
        }
        if self.tiles_x == 0 || self.tiles_y == 0 {
            return Err(FilterError::InvalidParameter(format!(
                "tile grid must be at least 1x1, got {}x{}",
                self.tiles_x, self.tiles_y
            )));
        }
        if self.tiles_x > width || self.tiles_y > height {
            return Err(FilterError::InvalidParameter(format!(
                "tile grid {}x{} exceeds image {}x{}",
                self.tiles_x, self.tiles_y, width, height
            )));
        }
        Ok(())
    }
}

/// Apply contrast-limited adaptive histogram equalization.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameter`] for a non-positive clip
/// limit, an empty tile grid, or a grid finer than the image.
pub fn equalize_adaptive(gray: &Gray8, params: &ClaheParams) -> FilterResult<Gray8> {
    let w = gray.width();
    let h = gray.height();
    params.validate(w, h)?;

    let tx = params.tiles_x as usize;
    let ty = params.tiles_y as usize;

    // Tile boundaries in pixels; tiles differ by at most one pixel.
    let x_bound = |i: usize| (i as u64 * w as u64 / tx as u64) as u32;
    let y_bound = |j: usize| (j as u64 * h as u64 / ty as u64) as u32;

    // One equalization LUT per tile.
    let mut luts = vec![[0u8; 256]; tx * ty];
    for tj in 0..ty {
        for ti in 0..tx {
            let (x0, x1) = (x_bound(ti), x_bound(ti + 1));
            let (y0, y1) = (y_bound(tj), y_bound(tj + 1));
            let mut hist = [0u64; 256];
            for y in y0..y1 {
                for &v in &gray.row(y)[x0 as usize..x1 as usize] {
                    hist[v as usize] += 1;
                }
            }
            let area = ((x1 - x0) as u64) * ((y1 - y0) as u64);
            luts[tj * tx + ti] = tile_lut(&hist, area, params.clip_limit);
        }
    }

    // Map each pixel through the bilinear blend of the four nearest tile
    // LUTs, indexed by tile centers.
    let tile_w = w as f64 / tx as f64;
    let tile_h = h as f64 / ty as f64;
    let mut out = Gray8Mut::new(w, h)?;
    for y in 0..h {
        let gy = (y as f64 + 0.5) / tile_h - 0.5;
        let j0 = gy.floor().clamp(0.0, (ty - 1) as f64) as usize;
        let j1 = (j0 + 1).min(ty - 1);
        let fy = (gy - gy.floor()).clamp(0.0, 1.0);
        let fy = if gy < 0.0 { 0.0 } else { fy };

        for x in 0..w {
            let gx = (x as f64 + 0.5) / tile_w - 0.5;
            let i0 = gx.floor().clamp(0.0, (tx - 1) as f64) as usize;
            let i1 = (i0 + 1).min(tx - 1);
            let fx = (gx - gx.floor()).clamp(0.0, 1.0);
            let fx = if gx < 0.0 { 0.0 } else { fx };

            let v = gray.get_unchecked(x, y) as usize;
            let v00 = luts[j0 * tx + i0][v] as f64;
            let v10 = luts[j0 * tx + i1][v] as f64;
            let v01 = luts[j1 * tx + i0][v] as f64;
            let v11 = luts[j1 * tx + i1][v] as f64;
            let top = v00 * (1.0 - fx) + v10 * fx;
            let bot = v01 * (1.0 - fx) + v11 * fx;
            let blended = top * (1.0 - fy) + bot * fy;
            out.set_unchecked(x, y, blended.round().clamp(0.0, 255.0) as u8);
        }
    }
    Ok(out.into())
}

/// Build a clipped-histogram equalization LUT for one tile.
fn tile_lut(hist: &[u64; 256], area: u64, clip_limit: f64) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if area == 0 {
        return lut;
    }

    // Clip at clip_limit times the uniform level, floor 1 count.
    let limit = ((clip_limit * area as f64 / 256.0).round() as u64).max(1);
    let mut clipped = [0u64; 256];
    let mut excess = 0u64;
    for (i, &count) in hist.iter().enumerate() {
        if count > limit {
            clipped[i] = limit;
            excess += count - limit;
        } else {
            clipped[i] = count;
        }
    }

    // Redistribute the clipped mass evenly.
    let bonus = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in clipped.iter_mut().enumerate() {
        *bin += bonus + u64::from(i < remainder);
    }

    let scale = 255.0 / area as f64;
    let mut cum = 0u64;
    for i in 0..256 {
        cum += clipped[i];
        lut[i] = (cum as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}
