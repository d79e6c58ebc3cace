//! Connected component labeling
//!
//! Two-pass labeling with union-find merging. Label 0 is background;
//! foreground components are numbered from 1 in raster order of their
//! first pixel.

use crate::error::{RegionError, RegionResult};
use porometry_core::{Mask, MaskMut};

/// Pixel adjacency used when grouping foreground into components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Edge-adjacent neighbors only
    Four,
    /// Edge- and corner-adjacent neighbors
    #[default]
    Eight,
}

/// Result of labeling: per-pixel labels plus per-component pixel counts.
#[derive(Debug, Clone)]
pub struct LabelMap {
    width: u32,
    height: u32,
    labels: Vec<u32>,
    /// Pixel count per label; index 0 is background.
    areas: Vec<u64>,
}

impl LabelMap {
    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of foreground components.
    #[inline]
    pub fn num_components(&self) -> u32 {
        (self.areas.len() - 1) as u32
    }

    /// Label at (x, y); 0 is background.
    #[inline]
    pub fn label_at(&self, x: u32, y: u32) -> u32 {
        self.labels[(y * self.width + x) as usize]
    }

    /// Pixel area of the given component.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidLabel`] when `label` is 0 or out of
    /// range.
    pub fn area(&self, label: u32) -> RegionResult<u64> {
        if label == 0 || label as usize >= self.areas.len() {
            return Err(RegionError::InvalidLabel(label));
        }
        Ok(self.areas[label as usize])
    }

    /// Per-component areas, index 1..=num_components.
    pub fn areas(&self) -> &[u64] {
        &self.areas
    }

    /// Label of the largest foreground component, or None when there is
    /// no foreground.
    pub fn largest_component(&self) -> Option<u32> {
        self.areas
            .iter()
            .enumerate()
            .skip(1)
            .max_by_key(|&(_, area)| area)
            .map(|(label, _)| label as u32)
    }

    /// Binary mask of a single component.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidLabel`] when `label` is 0 or out of
    /// range.
    pub fn component_mask(&self, label: u32) -> RegionResult<Mask> {
        if label == 0 || label as usize >= self.areas.len() {
            return Err(RegionError::InvalidLabel(label));
        }
        let mut out = MaskMut::new(self.width, self.height)?;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.label_at(x, y) == label {
                    out.set_on(x, y);
                }
            }
        }
        Ok(out.into())
    }
}

struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        UnionFind { parent: vec![0] }
    }

    fn make(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            // Path halving
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Label the foreground components of a mask.
pub fn label_components(mask: &Mask, connectivity: Connectivity) -> RegionResult<LabelMap> {
    let w = mask.width();
    let h = mask.height();
    let mut labels = vec![0u32; (w as usize) * (h as usize)];
    let mut uf = UnionFind::new();

    // First pass: assign provisional labels, merging across prior
    // neighbors (west, north, and the diagonals for 8-connectivity).
    for y in 0..h {
        for x in 0..w {
            if !mask.is_on(x, y) {
                continue;
            }
            let idx = (y * w + x) as usize;
            let mut neighbor = 0u32;

            let mut consider = |lbl: u32, uf: &mut UnionFind, neighbor: &mut u32| {
                if lbl == 0 {
                    return;
                }
                if *neighbor == 0 {
                    *neighbor = lbl;
                } else if *neighbor != lbl {
                    uf.union(*neighbor, lbl);
                }
            };

            if x > 0 {
                consider(labels[idx - 1], &mut uf, &mut neighbor);
            }
            if y > 0 {
                consider(labels[idx - w as usize], &mut uf, &mut neighbor);
                if connectivity == Connectivity::Eight {
                    if x > 0 {
                        consider(labels[idx - w as usize - 1], &mut uf, &mut neighbor);
                    }
                    if x + 1 < w {
                        consider(labels[idx - w as usize + 1], &mut uf, &mut neighbor);
                    }
                }
            }

            labels[idx] = if neighbor != 0 { neighbor } else { uf.make() };
        }
    }

    // Second pass: compress provisional labels to a dense 1..=n range.
    let mut remap = vec![0u32; uf.parent.len()];
    let mut next = 0u32;
    let mut areas = vec![0u64];
    for lbl in labels.iter_mut() {
        if *lbl == 0 {
            areas[0] += 1;
            continue;
        }
        let root = uf.find(*lbl);
        if remap[root as usize] == 0 {
            next += 1;
            remap[root as usize] = next;
            areas.push(0);
        }
        *lbl = remap[root as usize];
        areas[*lbl as usize] += 1;
    }

    Ok(LabelMap {
        width: w,
        height: h,
        labels,
        areas,
    })
}

/// Remove foreground components with pixel area at or below `min_area`.
///
/// Returns the filtered mask and the number of components removed.
/// `min_area == 0` keeps everything.
pub fn filter_by_area(
    mask: &Mask,
    min_area: u64,
    connectivity: Connectivity,
) -> RegionResult<(Mask, u32)> {
    let map = label_components(mask, connectivity)?;
    let keep: Vec<bool> = map
        .areas()
        .iter()
        .map(|&area| area > min_area)
        .collect();
    let removed = keep.iter().skip(1).filter(|&&k| !k).count() as u32;
    if removed == 0 {
        return Ok((mask.clone(), 0));
    }

    let mut out = MaskMut::new(map.width(), map.height())?;
    for y in 0..map.height() {
        for x in 0..map.width() {
            let lbl = map.label_at(x, y);
            if lbl != 0 && keep[lbl as usize] {
                out.set_on(x, y);
            }
        }
    }
    Ok((out.into(), removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use porometry_core::MaskMut;

    fn two_blobs() -> Mask {
        let mut m = MaskMut::new(10, 10).unwrap();
        // 3x3 blob and a single pixel, diagonally separated
        for y in 1..4 {
            for x in 1..4 {
                m.set_on(x, y);
            }
        }
        m.set_on(7, 7);
        m.into()
    }

    #[test]
    fn test_label_counts_components() {
        let m = two_blobs();
        let map = label_components(&m, Connectivity::Eight).unwrap();
        assert_eq!(map.num_components(), 2);
        assert_eq!(map.area(map.label_at(2, 2)).unwrap(), 9);
        assert_eq!(map.area(map.label_at(7, 7)).unwrap(), 1);
    }

    #[test]
    fn test_diagonal_connectivity() {
        let mut m = MaskMut::new(4, 4).unwrap();
        m.set_on(0, 0);
        m.set_on(1, 1);
        let m: Mask = m.into();

        let four = label_components(&m, Connectivity::Four).unwrap();
        assert_eq!(four.num_components(), 2);
        let eight = label_components(&m, Connectivity::Eight).unwrap();
        assert_eq!(eight.num_components(), 1);
    }

    #[test]
    fn test_u_shape_merges() {
        // A U shape forces a union between provisional labels.
        let mut m = MaskMut::new(5, 3).unwrap();
        for y in 0..3 {
            m.set_on(0, y);
            m.set_on(4, y);
        }
        m.set_on(1, 2);
        m.set_on(2, 2);
        m.set_on(3, 2);
        let m: Mask = m.into();

        let map = label_components(&m, Connectivity::Four).unwrap();
        assert_eq!(map.num_components(), 1);
        assert_eq!(map.area(1).unwrap(), 9);
    }

    #[test]
    fn test_largest_component() {
        let m = two_blobs();
        let map = label_components(&m, Connectivity::Eight).unwrap();
        let largest = map.largest_component().unwrap();
        assert_eq!(map.area(largest).unwrap(), 9);
        let cm = map.component_mask(largest).unwrap();
        assert_eq!(cm.count_on(), 9);
        assert!(cm.is_on(2, 2));
        assert!(!cm.is_on(7, 7));
    }

    #[test]
    fn test_empty_mask() {
        let m: Mask = MaskMut::new(5, 5).unwrap().into();
        let map = label_components(&m, Connectivity::Eight).unwrap();
        assert_eq!(map.num_components(), 0);
        assert!(map.largest_component().is_none());
    }

    #[test]
    fn test_invalid_label_rejected() {
        let m = two_blobs();
        let map = label_components(&m, Connectivity::Eight).unwrap();
        assert!(map.area(0).is_err());
        assert!(map.component_mask(99).is_err());
    }

    #[test]
    fn test_filter_by_area() {
        let m = two_blobs();
        let (filtered, removed) = filter_by_area(&m, 3, Connectivity::Eight).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(filtered.count_on(), 9);
        assert!(!filtered.is_on(7, 7));
    }

    #[test]
    fn test_filter_zero_keeps_all() {
        let m = two_blobs();
        let (filtered, removed) = filter_by_area(&m, 0, Connectivity::Eight).unwrap();
        assert_eq!(removed, 0);
        assert!(filtered.equals(&m));
    }
}
