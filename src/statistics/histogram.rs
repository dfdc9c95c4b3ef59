// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Histogram** - *Fixed-bin frequency counter over one real axis*
//!
//! Equal-width bins spanning `[lower_bound, upper_bound)`, fixed at construction.
//! Values below the range land in bin `0` and values at or above it land in the last
//! bin, so every observation is counted exactly once and the total frequency always
//! equals the number of increments.

use crate::config::HistogramSpec;
use crate::errors::{StatsError, log_out_of_bounds};

/// Fixed-bin frequency histogram owned by a single label record.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    lower_bound: f64,
    upper_bound: f64,
    bin_width: f64,
    frequencies: Vec<u64>,
}

impl Histogram {
    /// Empty histogram with the bins described by `spec`.
    pub fn new(spec: &HistogramSpec) -> Self {
        let n = spec.num_bins() as f64;
        let mut bin_width = (spec.upper_bound() - spec.lower_bound()) / n;
        if !bin_width.is_finite() {
            // full-range `f64` bounds overflow the difference
            bin_width = spec.upper_bound() / n - spec.lower_bound() / n;
        }
        Self {
            lower_bound: spec.lower_bound(),
            upper_bound: spec.upper_bound(),
            bin_width,
            frequencies: vec![0; spec.num_bins()],
        }
    }

    /// Bin index for `value`, clamped to `[0, num_bins - 1]`.
    ///
    /// NaN maps to bin `0`.
    #[inline(always)]
    pub fn bin_index(&self, value: f64) -> usize {
        let raw = ((value - self.lower_bound) / self.bin_width).floor();
        if raw <= 0.0 || raw.is_nan() {
            0
        } else {
            // saturating cast, then clamp into the last bin
            (raw as usize).min(self.frequencies.len() - 1)
        }
    }

    /// Counts one observation of `value`.
    #[inline(always)]
    pub fn increment(&mut self, value: f64) {
        let bin = self.bin_index(value);
        self.frequencies[bin] += 1;
    }

    /// Adds `delta` to the frequency of `bin`.
    pub fn increment_bin(&mut self, bin: usize, delta: u64) -> Result<(), StatsError> {
        let len = self.frequencies.len();
        match self.frequencies.get_mut(bin) {
            Some(f) => {
                *f += delta;
                Ok(())
            }
            None => Err(StatsError::OutOfBounds(log_out_of_bounds(
                "Histogram::increment_bin",
                "bin",
                bin,
                len,
            ))),
        }
    }

    /// Bin-wise addition of `other` into `self`.
    ///
    /// Both histograms come from the same `HistogramSpec` during a run; bins beyond the
    /// shorter of the two are ignored.
    pub fn merge(&mut self, other: &Histogram) {
        for (dst, src) in self.frequencies.iter_mut().zip(other.frequencies.iter()) {
            *dst += *src;
        }
    }

    /// Frequency of `bin`, or `0` if `bin` is out of range.
    #[inline]
    pub fn frequency(&self, bin: usize) -> u64 {
        self.frequencies.get(bin).copied().unwrap_or(0)
    }

    /// Sum of all bin frequencies.
    pub fn total_frequency(&self) -> u64 {
        self.frequencies.iter().sum()
    }

    #[inline]
    pub fn frequencies(&self) -> &[u64] {
        &self.frequencies
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.frequencies.len()
    }

    #[inline]
    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    #[inline]
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Inclusive lower edge of `bin`.
    #[inline]
    pub fn bin_min(&self, bin: usize) -> f64 {
        self.lower_bound + bin as f64 * self.bin_width
    }

    /// Exclusive upper edge of `bin`.
    ///
    /// The last bin ends exactly at `upper_bound`.
    #[inline]
    pub fn bin_max(&self, bin: usize) -> f64 {
        if bin + 1 >= self.frequencies.len() {
            self.upper_bound
        } else {
            self.lower_bound + (bin + 1) as f64 * self.bin_width
        }
    }

    /// `[low, high)` edges of `bin`.
    #[inline]
    pub fn bin_range(&self, bin: usize) -> (f64, f64) {
        (self.bin_min(bin), self.bin_max(bin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist(n: usize, lo: f64, hi: f64) -> Histogram {
        Histogram::new(&HistogramSpec::new(n, lo, hi).unwrap())
    }

    #[test]
    fn test_bin_index_and_edges() {
        let h = hist(4, 0.0, 8.0);
        assert_eq!(h.bin_index(0.0), 0);
        assert_eq!(h.bin_index(1.99), 0);
        assert_eq!(h.bin_index(2.0), 1);
        assert_eq!(h.bin_index(7.99), 3);
        assert_eq!(h.bin_range(0), (0.0, 2.0));
        assert_eq!(h.bin_range(3), (6.0, 8.0));
    }

    #[test]
    fn test_edge_value_with_negative_lower_bound() {
        let h = hist(6, -20.0, -19.0);
        assert_eq!(h.bin_index(-19.5), 3);
        assert_eq!(h.bin_index(-20.0), 0);
        assert_eq!(h.bin_index(-19.0), 5);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let mut h = hist(4, 0.0, 8.0);
        h.increment(-100.0);
        h.increment(8.0);
        h.increment(1e300);
        h.increment(f64::NAN);
        assert_eq!(h.frequency(0), 2);
        assert_eq!(h.frequency(3), 2);
        assert_eq!(h.total_frequency(), 4);
    }

    #[test]
    fn test_increment_bin_and_merge() {
        let mut a = hist(3, 0.0, 3.0);
        let mut b = hist(3, 0.0, 3.0);
        a.increment(0.5);
        b.increment_bin(2, 5).unwrap();
        assert!(b.increment_bin(3, 1).is_err());
        a.merge(&b);
        assert_eq!(a.frequencies(), &[1, 0, 5]);
        assert_eq!(a.frequency(99), 0);
    }

    #[test]
    fn test_full_range_f64_does_not_overflow() {
        let mut h = hist(20, f64::MIN, f64::MAX);
        h.increment(0.0);
        h.increment(f64::MAX);
        h.increment(f64::MIN);
        assert_eq!(h.total_frequency(), 3);
        assert!(h.bin_min(10).is_finite());
        assert_eq!(h.bin_max(19), f64::MAX);
        assert_eq!(h.frequency(0), 1);
        assert_eq!(h.frequency(19), 1);
    }
}
