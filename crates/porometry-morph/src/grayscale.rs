//! Grayscale morphological operations
//!
//! Min/max filters over [`Gray8`] rasters, used for background
//! estimation: opening with a structuring element larger than any crumb
//! feature leaves only the slow illumination gradient, which can then be
//! subtracted from the original.
//!
//! Offsets falling outside the image are ignored (the extremum is taken
//! over in-bounds neighbors only), so borders neither darken under
//! erosion nor brighten under dilation.

use crate::error::MorphResult;
use crate::sel::Sel;
use porometry_core::{Gray8, Gray8Mut};

/// Grayscale erosion: per-pixel minimum over the SEL neighborhood.
pub fn erode_gray(gray: &Gray8, sel: &Sel) -> MorphResult<Gray8> {
    extremum(gray, sel, false)
}

/// Grayscale dilation: per-pixel maximum over the SEL neighborhood.
pub fn dilate_gray(gray: &Gray8, sel: &Sel) -> MorphResult<Gray8> {
    extremum(gray, sel, true)
}

/// Grayscale opening: erosion followed by dilation.
///
/// Removes bright features smaller than the SEL while preserving the
/// larger-scale intensity surface.
pub fn open_gray(gray: &Gray8, sel: &Sel) -> MorphResult<Gray8> {
    let eroded = erode_gray(gray, sel)?;
    dilate_gray(&eroded, sel)
}

fn extremum(gray: &Gray8, sel: &Sel, take_max: bool) -> MorphResult<Gray8> {
    let w = gray.width();
    let h = gray.height();
    let mut out = Gray8Mut::new(w, h)?;

    let hits: Vec<_> = sel.hit_offsets().collect();
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let mut acc: Option<u8> = None;
            for &(dx, dy) in &hits {
                let sx = x + dx;
                let sy = y + dy;
                if sx < 0 || sy < 0 || sx >= w as i32 || sy >= h as i32 {
                    continue;
                }
                let v = gray.get_unchecked(sx as u32, sy as u32);
                acc = Some(match acc {
                    None => v,
                    Some(a) if take_max => a.max(v),
                    Some(a) => a.min(v),
                });
            }
            // SELs always contain their center, so acc is set.
            out.set_unchecked(x as u32, y as u32, acc.unwrap_or(0));
        }
    }
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use porometry_core::Gray8Mut;

    fn plateau_image() -> Gray8 {
        // 20 background with a small 3x3 bright plateau of 200
        let mut m = Gray8Mut::new(12, 12).unwrap();
        m.fill(20);
        for y in 4..7 {
            for x in 4..7 {
                m.set_unchecked(x, y, 200);
            }
        }
        m.into()
    }

    #[test]
    fn test_erode_removes_small_plateau() {
        let g = plateau_image();
        let sel = Sel::disc(7).unwrap();
        let e = erode_gray(&g, &sel).unwrap();
        assert!(e.data().iter().all(|&v| v == 20));
    }

    #[test]
    fn test_dilate_spreads_maximum() {
        let g = plateau_image();
        let sel = Sel::brick(3, 3).unwrap();
        let d = dilate_gray(&g, &sel).unwrap();
        assert_eq!(d.get_unchecked(3, 3), 200);
        assert_eq!(d.get_unchecked(0, 0), 20);
    }

    #[test]
    fn test_open_flattens_bright_feature() {
        // Opening with a SEL larger than the plateau removes it entirely,
        // leaving the flat background: the mechanism behind background
        // subtraction normalization.
        let g = plateau_image();
        let sel = Sel::disc(7).unwrap();
        let bg = open_gray(&g, &sel).unwrap();
        assert!(bg.data().iter().all(|&v| v == 20));

        let flattened = g.saturating_sub(&bg).unwrap();
        assert_eq!(flattened.get_unchecked(5, 5), 180);
        assert_eq!(flattened.get_unchecked(0, 0), 0);
    }

    #[test]
    fn test_uniform_image_is_fixed_point() {
        let mut m = Gray8Mut::new(8, 8).unwrap();
        m.fill(77);
        let g: Gray8 = m.into();
        let sel = Sel::disc(5).unwrap();
        assert_eq!(open_gray(&g, &sel).unwrap().data(), g.data());
    }
}
