// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Spatial Extent Types** - *Bounding boxes and rectangular regions*
//!
//! `BoundingBox` is the per-label running spatial extent: one `(min, max)` pair per axis,
//! seeded with inverted sentinels so the first observed position sets both bounds.
//! `Region` is the `index + size` form of the same extent, also used by the streaming
//! driver to describe passes and partitions.
//!
//! Axis 0 is the fastest-varying axis throughout.

/// Per-axis `(min, max)` coordinate extent of the elements carrying one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox<const D: usize> {
    min: [i64; D],
    max: [i64; D],
}

impl<const D: usize> BoundingBox<D> {
    /// Box with `(i64::MAX, i64::MIN)` sentinels on every axis.
    pub fn new() -> Self {
        Self {
            min: [i64::MAX; D],
            max: [i64::MIN; D],
        }
    }

    /// Grows the box to contain `position`.
    #[inline(always)]
    pub fn include(&mut self, position: &[i64; D]) {
        for axis in 0..D {
            let p = position[axis];
            if p < self.min[axis] {
                self.min[axis] = p;
            }
            if p > self.max[axis] {
                self.max[axis] = p;
            }
        }
    }

    /// Per-axis union with `other`.
    #[inline]
    pub fn merge(&mut self, other: &BoundingBox<D>) {
        for axis in 0..D {
            self.min[axis] = self.min[axis].min(other.min[axis]);
            self.max[axis] = self.max[axis].max(other.max[axis]);
        }
    }

    /// True while no position has been included.
    pub fn is_empty(&self) -> bool {
        (0..D).any(|axis| self.min[axis] > self.max[axis])
    }

    #[inline]
    pub fn min(&self) -> &[i64; D] {
        &self.min
    }

    #[inline]
    pub fn max(&self) -> &[i64; D] {
        &self.max
    }

    /// `(min, max)` on `axis`.
    #[inline]
    pub fn axis(&self, axis: usize) -> (i64, i64) {
        (self.min[axis], self.max[axis])
    }

    /// Flat layout `[min0, max0, min1, max1, ...]`, `2 * D` entries.
    pub fn to_vec(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(2 * D);
        for axis in 0..D {
            out.push(self.min[axis]);
            out.push(self.max[axis]);
        }
        out
    }
}

impl<const D: usize> Default for BoundingBox<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rectangular region: starting `index` and per-axis `size`.
///
/// A region with any zero-sized axis holds no elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region<const D: usize> {
    index: [i64; D],
    size: [u64; D],
}

impl<const D: usize> Region<D> {
    pub fn new(index: [i64; D], size: [u64; D]) -> Self {
        Self { index, size }
    }

    /// Zero index, zero size.
    pub fn empty() -> Self {
        Self {
            index: [0; D],
            size: [0; D],
        }
    }

    /// Region starting at the origin and covering `shape`.
    pub fn from_shape(shape: [usize; D]) -> Self {
        let mut size = [0u64; D];
        for axis in 0..D {
            size[axis] = shape[axis] as u64;
        }
        Self { index: [0; D], size }
    }

    /// Tightest region covering a bounding box: `index = min`, `size = max - min + 1`.
    ///
    /// An empty box yields `Region::empty()`. A box spanning the whole `i64` axis
    /// saturates at `u64::MAX`.
    pub fn from_bounding_box(bbox: &BoundingBox<D>) -> Self {
        if bbox.is_empty() {
            return Self::empty();
        }
        let mut index = [0i64; D];
        let mut size = [0u64; D];
        for axis in 0..D {
            let (lo, hi) = bbox.axis(axis);
            index[axis] = lo;
            size[axis] = hi.abs_diff(lo).saturating_add(1);
        }
        Self { index, size }
    }

    #[inline]
    pub fn index(&self) -> &[i64; D] {
        &self.index
    }

    #[inline]
    pub fn size(&self) -> &[u64; D] {
        &self.size
    }

    /// Number of elements covered, saturating at `u64::MAX`.
    pub fn number_of_elements(&self) -> u64 {
        if D == 0 {
            return 0;
        }
        self.size.iter().fold(1u64, |acc, &s| acc.saturating_mul(s))
    }

    pub fn is_empty(&self) -> bool {
        D == 0 || self.size.iter().any(|&s| s == 0)
    }

    /// True if `position` lies inside the region.
    pub fn contains(&self, position: &[i64; D]) -> bool {
        (0..D).all(|axis| {
            let lo = self.index[axis];
            position[axis] >= lo && position[axis].abs_diff(lo) < self.size[axis]
        })
    }

    /// Splits the region into at most `parts` contiguous slabs along the slowest axis
    /// that has more than one element.
    ///
    /// Slab sizes differ by at most one. Fewer slabs are returned when the axis is
    /// shorter than `parts`; an empty region or `parts == 0` yields no slabs.
    pub fn split_slowest(&self, parts: usize) -> Vec<Region<D>> {
        if D == 0 || parts == 0 || self.is_empty() {
            return Vec::new();
        }
        let axis = (0..D).rev().find(|&a| self.size[a] > 1).unwrap_or(D - 1);
        let extent = self.size[axis];
        let n = (parts as u64).min(extent);
        let base = extent / n;
        let rem = extent % n;
        let mut out = Vec::with_capacity(n as usize);
        let mut start = self.index[axis];
        for i in 0..n {
            let len = base + u64::from(i < rem);
            let mut slab = *self;
            slab.index[axis] = start;
            slab.size[axis] = len;
            out.push(slab);
            start += len as i64;
        }
        out
    }

    /// Positions of the region in axis-0-fastest order.
    pub fn positions(&self) -> RegionPositions<D> {
        RegionPositions {
            region: *self,
            next: if self.is_empty() { None } else { Some(self.index) },
        }
    }
}

impl<const D: usize> Default for Region<D> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Iterator over every position of a `Region`, axis 0 fastest.
pub struct RegionPositions<const D: usize> {
    region: Region<D>,
    next: Option<[i64; D]>,
}

impl<const D: usize> Iterator for RegionPositions<D> {
    type Item = [i64; D];

    fn next(&mut self) -> Option<[i64; D]> {
        let current = self.next?;
        let mut advanced = current;
        let mut carried = true;
        for axis in 0..D {
            advanced[axis] += 1;
            let end = self.region.index[axis] + self.region.size[axis] as i64;
            if advanced[axis] < end {
                carried = false;
                break;
            }
            advanced[axis] = self.region.index[axis];
        }
        self.next = if carried { None } else { Some(advanced) };
        Some(current)
    }
}
