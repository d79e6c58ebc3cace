//! Boundary pixel extraction
//!
//! The inner boundary of a component is the set of ON pixels with at
//! least one OFF 8-neighbor (image borders count as OFF). Points are
//! returned unordered, which is sufficient input for a least-squares
//! shape fit.

use porometry_core::Mask;

/// Collect the inner boundary pixels of a mask as (x, y) points.
pub fn boundary_points(mask: &Mask) -> Vec<(f64, f64)> {
    let w = mask.width();
    let h = mask.height();
    let mut points = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if !mask.is_on(x, y) {
                continue;
            }
            let xi = x as i64;
            let yi = y as i64;
            let mut edge = false;
            'scan: for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = xi + dx;
                    let ny = yi + dy;
                    let off = nx < 0
                        || ny < 0
                        || nx >= w as i64
                        || ny >= h as i64
                        || !mask.is_on(nx as u32, ny as u32);
                    if off {
                        edge = true;
                        break 'scan;
                    }
                }
            }
            if edge {
                points.push((x as f64, y as f64));
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use porometry_core::{Mask, MaskMut};

    #[test]
    fn test_square_boundary() {
        // 4x4 solid square: all but the 2x2 interior are boundary.
        let mut m = MaskMut::new(8, 8).unwrap();
        for y in 2..6 {
            for x in 2..6 {
                m.set_on(x, y);
            }
        }
        let m: Mask = m.into();

        let pts = boundary_points(&m);
        assert_eq!(pts.len(), 12);
        assert!(pts.contains(&(2.0, 2.0)));
        assert!(!pts.contains(&(3.0, 3.0)));
    }

    #[test]
    fn test_border_pixels_are_boundary() {
        // A filled 4x4 mask keeps its 2x2 interior; in a filled 3x3
        // every pixel touches the image border.
        let m = Mask::filled(4, 4).unwrap();
        let pts = boundary_points(&m);
        assert_eq!(pts.len(), 12);
        assert!(!pts.contains(&(1.0, 1.0)));

        let m = Mask::filled(3, 3).unwrap();
        assert_eq!(boundary_points(&m).len(), 9);
    }

    #[test]
    fn test_single_pixel() {
        let mut m = MaskMut::new(5, 5).unwrap();
        m.set_on(2, 2);
        let m: Mask = m.into();
        assert_eq!(boundary_points(&m), vec![(2.0, 2.0)]);
    }

    #[test]
    fn test_empty_mask() {
        let m: Mask = MaskMut::new(5, 5).unwrap().into();
        assert!(boundary_points(&m).is_empty());
    }
}
