//! porometry-test - Synthetic raster builders shared by tests
//!
//! Real slice photographs do not belong in unit tests; instead the test
//! suites assemble small synthetic scenes with known ground truth:
//! a crumb plateau, bright pores, dark background. Helpers here keep
//! those scenes consistent across crates.
//!
//! # Usage
//!
//! ```ignore
//! use porometry_test::{flat_gray, paint_rect};
//!
//! let mut img = flat_gray(100, 100, 128);
//! paint_rect(&mut img, 40, 40, 10, 10, 250);
//! let gray: porometry_core::Gray8 = img.into();
//! ```

use porometry_core::{Gray8Mut, Mask, MaskMut};

/// A mutable grayscale canvas filled with a single value.
///
/// # Panics
///
/// Panics on zero dimensions; test scenes are always non-empty.
pub fn flat_gray(width: u32, height: u32, value: u8) -> Gray8Mut {
    let mut img = Gray8Mut::new(width, height).expect("non-empty test canvas");
    img.fill(value);
    img
}

/// Paint an axis-aligned rectangle onto a grayscale canvas.
pub fn paint_rect(img: &mut Gray8Mut, x0: u32, y0: u32, w: u32, h: u32, value: u8) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.set_unchecked(x, y, value);
        }
    }
}

/// Paint a filled disk onto a grayscale canvas.
///
/// A pixel belongs to the disk when its center lies within `radius` of
/// (cx, cy).
pub fn paint_disk(img: &mut Gray8Mut, cx: f64, cy: f64, radius: f64, value: u8) {
    let r2 = radius * radius;
    for y in 0..img.height() {
        for x in 0..img.width() {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx * dx + dy * dy <= r2 {
                img.set_unchecked(x, y, value);
            }
        }
    }
}

/// A regular grid of square pores painted onto a crumb plateau.
///
/// Returns the canvas; the scene is `count_x * count_y` squares of
/// `hole_side` pixels, spaced by `pitch`, starting at (`x0`, `y0`).
pub fn crumb_with_hole_grid(
    width: u32,
    height: u32,
    crumb_value: u8,
    hole_value: u8,
    x0: u32,
    y0: u32,
    hole_side: u32,
    pitch: u32,
    count_x: u32,
    count_y: u32,
) -> Gray8Mut {
    let mut img = flat_gray(width, height, crumb_value);
    for j in 0..count_y {
        for i in 0..count_x {
            paint_rect(
                &mut img,
                x0 + i * pitch,
                y0 + j * pitch,
                hole_side,
                hole_side,
                hole_value,
            );
        }
    }
    img
}

/// A horizontal illumination ramp from `left_value` to `right_value`.
///
/// Intensity varies linearly along x and is constant along y, like a
/// slice lit from one side.
pub fn gradient_gray(width: u32, height: u32, left_value: u8, right_value: u8) -> Gray8Mut {
    let mut img = flat_gray(width, height, left_value);
    let span = right_value as f64 - left_value as f64;
    let denom = (width - 1).max(1) as f64;
    for x in 0..width {
        let v = (left_value as f64 + span * x as f64 / denom).round() as u8;
        for y in 0..height {
            img.set_unchecked(x, y, v);
        }
    }
    img
}

/// A solid rectangular mask.
pub fn rect_mask(width: u32, height: u32, x0: u32, y0: u32, w: u32, h: u32) -> Mask {
    let mut m = MaskMut::new(width, height).expect("non-empty test canvas");
    for y in y0..(y0 + h).min(height) {
        for x in x0..(x0 + w).min(width) {
            m.set_on(x, y);
        }
    }
    m.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use porometry_core::Gray8;

    #[test]
    fn test_paint_rect_clips_to_canvas() {
        let mut img = flat_gray(10, 10, 0);
        paint_rect(&mut img, 8, 8, 5, 5, 200);
        let g: Gray8 = img.into();
        assert_eq!(g.get_unchecked(9, 9), 200);
        assert_eq!(g.data().iter().filter(|&&v| v == 200).count(), 4);
    }

    #[test]
    fn test_disk_area_close_to_circle() {
        let mut img = flat_gray(50, 50, 0);
        paint_disk(&mut img, 25.0, 25.0, 10.0, 255);
        let g: Gray8 = img.into();
        let area = g.data().iter().filter(|&&v| v == 255).count() as f64;
        let expected = std::f64::consts::PI * 100.0;
        assert!((area - expected).abs() / expected < 0.05);
    }

    #[test]
    fn test_gradient_endpoints() {
        let g: Gray8 = gradient_gray(100, 10, 20, 220).into();
        assert_eq!(g.get_unchecked(0, 5), 20);
        assert_eq!(g.get_unchecked(99, 5), 220);
        assert_eq!(g.get_unchecked(0, 0), g.get_unchecked(0, 9));
    }

    #[test]
    fn test_hole_grid_pixel_count() {
        let img = crumb_with_hole_grid(200, 200, 128, 250, 20, 20, 10, 40, 4, 4);
        let g: Gray8 = img.into();
        let holes = g.data().iter().filter(|&&v| v == 250).count();
        assert_eq!(holes, 16 * 100);
    }
}
