//! Hole filling
//!
//! A hole is background not reachable from the image border. Filling
//! turns the outline of a region into its solid silhouette, which is how
//! the bread slice outline becomes the region of interest.

use crate::error::RegionResult;
use porometry_core::{Mask, MaskMut, ON};

/// Fill all interior background holes of a mask.
///
/// Background is traversed 4-connected from the border; anything not
/// reached is interior and becomes foreground.
pub fn fill_holes(mask: &Mask) -> RegionResult<Mask> {
    let w = mask.width();
    let h = mask.height();
    if w == 0 || h == 0 {
        return Ok(mask.clone());
    }

    // reachable[i] marks border-connected background.
    let mut reachable = vec![false; (w as usize) * (h as usize)];
    let mut stack: Vec<(u32, u32)> = Vec::new();

    let mut seed = |x: u32, y: u32, stack: &mut Vec<(u32, u32)>, reachable: &mut [bool]| {
        let idx = (y * w + x) as usize;
        if !mask.is_on(x, y) && !reachable[idx] {
            reachable[idx] = true;
            stack.push((x, y));
        }
    };

    for x in 0..w {
        seed(x, 0, &mut stack, &mut reachable);
        seed(x, h - 1, &mut stack, &mut reachable);
    }
    for y in 0..h {
        seed(0, y, &mut stack, &mut reachable);
        seed(w - 1, y, &mut stack, &mut reachable);
    }

    while let Some((x, y)) = stack.pop() {
        let mut visit = |nx: u32, ny: u32, stack: &mut Vec<(u32, u32)>, reachable: &mut [bool]| {
            let idx = (ny * w + nx) as usize;
            if !mask.is_on(nx, ny) && !reachable[idx] {
                reachable[idx] = true;
                stack.push((nx, ny));
            }
        };
        if x > 0 {
            visit(x - 1, y, &mut stack, &mut reachable);
        }
        if x + 1 < w {
            visit(x + 1, y, &mut stack, &mut reachable);
        }
        if y > 0 {
            visit(x, y - 1, &mut stack, &mut reachable);
        }
        if y + 1 < h {
            visit(x, y + 1, &mut stack, &mut reachable);
        }
    }

    let mut out = MaskMut::new(w, h)?;
    {
        let data = out.data_mut();
        for (idx, slot) in data.iter_mut().enumerate() {
            let x = (idx as u32) % w;
            let y = (idx as u32) / w;
            if mask.is_on(x, y) || !reachable[idx] {
                *slot = ON;
            }
        }
    }
    Ok(out.into())
}
