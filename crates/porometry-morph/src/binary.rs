//! Binary morphological operations
//!
//! Erosion, dilation, opening, and closing over [`Mask`] rasters.
//! Boundary condition is asymmetric: pixels outside the image are
//! background, so erosion clears foreground touching the border while
//! dilation never invents pixels from outside.

use crate::error::MorphResult;
use crate::sel::Sel;
use porometry_core::{Mask, MaskMut};

/// Dilate a binary mask.
///
/// A pixel is ON in the output if any hit offset of the SEL, centered on
/// it, lands on an ON input pixel.
pub fn dilate(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let w = mask.width();
    let h = mask.height();
    let mut out = MaskMut::new(w, h)?;

    let hits: Vec<_> = sel.hit_offsets().collect();
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let on = hits.iter().any(|&(dx, dy)| {
                let sx = x + dx;
                let sy = y + dy;
                sx >= 0 && sy >= 0 && mask.is_on(sx as u32, sy as u32)
            });
            if on {
                out.set_on(x as u32, y as u32);
            }
        }
    }
    Ok(out.into())
}

/// Erode a binary mask.
///
/// A pixel survives only if every hit offset of the SEL lands on an ON
/// input pixel; offsets falling outside the image count as background.
pub fn erode(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let w = mask.width();
    let h = mask.height();
    let mut out = MaskMut::new(w, h)?;

    let hits: Vec<_> = sel.hit_offsets().collect();
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let on = hits.iter().all(|&(dx, dy)| {
                let sx = x + dx;
                let sy = y + dy;
                sx >= 0 && sy >= 0 && mask.is_on(sx as u32, sy as u32)
            });
            if on {
                out.set_on(x as u32, y as u32);
            }
        }
    }
    Ok(out.into())
}

/// Open a binary mask: erosion followed by dilation.
///
/// Removes foreground features smaller than the SEL and smooths
/// contours. Idempotent.
pub fn open(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let eroded = erode(mask, sel)?;
    dilate(&eroded, sel)
}

/// Close a binary mask: dilation followed by erosion.
///
/// Fills background gaps smaller than the SEL and bridges nearby
/// foreground. Idempotent.
pub fn close(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let dilated = dilate(mask, sel)?;
    erode(&dilated, sel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use porometry_core::MaskMut;

    fn square_mask(size: u32, x0: u32, y0: u32, side: u32) -> Mask {
        let mut m = MaskMut::new(size, size).unwrap();
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                m.set_on(x, y);
            }
        }
        m.into()
    }

    #[test]
    fn test_dilate_expands() {
        let m = square_mask(7, 2, 2, 3);
        let sel = Sel::brick(3, 3).unwrap();
        let d = dilate(&m, &sel).unwrap();
        assert!(d.is_on(1, 1));
        assert!(d.is_on(5, 5));
        assert!(!d.is_on(0, 0));
        assert_eq!(d.count_on(), 25);
    }

    #[test]
    fn test_erode_shrinks() {
        let m = square_mask(7, 2, 2, 3);
        let sel = Sel::brick(3, 3).unwrap();
        let e = erode(&m, &sel).unwrap();
        assert_eq!(e.count_on(), 1);
        assert!(e.is_on(3, 3));
    }

    #[test]
    fn test_erode_border_is_background() {
        // Foreground touching the border is eroded away.
        let m = square_mask(5, 0, 0, 3);
        let sel = Sel::brick(3, 3).unwrap();
        let e = erode(&m, &sel).unwrap();
        assert_eq!(e.count_on(), 1);
        assert!(e.is_on(1, 1));
    }

    #[test]
    fn test_open_removes_speckle() {
        let mut m = MaskMut::new(11, 11).unwrap();
        // A 4x4 block and an isolated pixel
        for y in 2..6 {
            for x in 2..6 {
                m.set_on(x, y);
            }
        }
        m.set_on(9, 9);
        let m: Mask = m.into();

        let sel = Sel::brick(3, 3).unwrap();
        let opened = open(&m, &sel).unwrap();
        assert!(!opened.is_on(9, 9));
        assert!(opened.is_on(3, 3));
    }

    #[test]
    fn test_close_fills_gap() {
        let mut m = MaskMut::new(9, 3) .unwrap();
        // Two bars separated by a single-pixel gap
        for y in 0..3 {
            for x in 0..4 {
                m.set_on(x, y);
            }
            for x in 5..9 {
                m.set_on(x, y);
            }
        }
        let m: Mask = m.into();

        let sel = Sel::brick(3, 3).unwrap();
        let closed = close(&m, &sel).unwrap();
        assert!(closed.is_on(4, 1));
    }

    #[test]
    fn test_open_idempotent() {
        let m = square_mask(15, 3, 3, 8);
        let sel = Sel::disc(5).unwrap();
        let once = open(&m, &sel).unwrap();
        let twice = open(&once, &sel).unwrap();
        assert!(once.equals(&twice));
    }

    #[test]
    fn test_close_idempotent() {
        let m = square_mask(15, 3, 3, 8);
        let sel = Sel::disc(5).unwrap();
        let once = close(&m, &sel).unwrap();
        let twice = close(&once, &sel).unwrap();
        assert!(once.equals(&twice));
    }
}
