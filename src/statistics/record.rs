// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Label Statistics Record** - *Per-label running aggregate*
//!
//! One mutable record per label, held both in the worker-local tables and in the
//! global table. Raw moments (`count`, `sum`, `sum_of_squares`), extrema, spatial
//! extent and the optional histogram are accumulated during the scan and combined
//! with commutative, associative operators during the merge. `mean`, `variance` and
//! `sigma` are filled in by `finalize` once, after the merge.

use crate::config::HistogramSpec;
use crate::statistics::histogram::Histogram;
use crate::statistics::region::{BoundingBox, Region};

/// Running statistics for a single label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStatistics<const D: usize> {
    count: u64,
    sum: f64,
    sum_of_squares: f64,
    minimum: f64,
    maximum: f64,
    bounding_box: BoundingBox<D>,
    mean: f64,
    variance: f64,
    sigma: f64,
    histogram: Option<Histogram>,
}

impl<const D: usize> LabelStatistics<D> {
    /// Empty record; allocates a histogram when `histogram` is `Some`.
    pub fn new(histogram: Option<&HistogramSpec>) -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_of_squares: 0.0,
            minimum: f64::MAX,
            maximum: f64::MIN,
            bounding_box: BoundingBox::new(),
            mean: 0.0,
            variance: 0.0,
            sigma: 0.0,
            histogram: histogram.map(Histogram::new),
        }
    }

    /// Folds one element into the record.
    #[inline(always)]
    pub fn accumulate(&mut self, value: f64, position: &[i64; D]) {
        if value < self.minimum {
            self.minimum = value;
        }
        if value > self.maximum {
            self.maximum = value;
        }
        self.bounding_box.include(position);
        self.sum += value;
        self.sum_of_squares += value * value;
        self.count += 1;
        if let Some(h) = self.histogram.as_mut() {
            h.increment(value);
        }
    }

    /// Combines another partial record for the same label into this one.
    ///
    /// Sums add, extrema take min/max, the bounding box takes the per-axis union and
    /// histograms add bin-wise. Derived fields are left untouched.
    pub fn merge(&mut self, other: &LabelStatistics<D>) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_of_squares += other.sum_of_squares;
        if other.minimum < self.minimum {
            self.minimum = other.minimum;
        }
        if other.maximum > self.maximum {
            self.maximum = other.maximum;
        }
        self.bounding_box.merge(&other.bounding_box);
        if let (Some(dst), Some(src)) = (self.histogram.as_mut(), other.histogram.as_ref()) {
            dst.merge(src);
        }
    }

    /// Computes `mean`, `variance` and `sigma` from the raw moments.
    ///
    /// Variance is the unbiased sample variance `(Σx² - (Σx)²/n) / (n - 1)`, and zero
    /// for `n <= 1`. A zero count leaves the mean at zero.
    pub fn finalize(&mut self) {
        if self.count == 0 {
            self.mean = 0.0;
            self.variance = 0.0;
            self.sigma = 0.0;
            return;
        }
        let n = self.count as f64;
        self.mean = self.sum / n;
        self.variance = if self.count > 1 {
            (self.sum_of_squares - self.sum * self.sum / n) / (n - 1.0)
        } else {
            0.0
        };
        self.sigma = self.variance.sqrt();
    }

    /// Histogram approximation of the median: midpoint of the bin in which the
    /// cumulative frequency first exceeds half the count.
    ///
    /// `None` when the record carries no histogram.
    pub fn median(&self) -> Option<f64> {
        let h = self.histogram.as_ref()?;
        let half = self.count as f64 / 2.0;
        let mut total = 0.0;
        let mut bin = 0;
        while total <= half && bin < h.num_bins() {
            total += h.frequency(bin) as f64;
            bin += 1;
        }
        let bin = bin.saturating_sub(1);
        let (low, high) = h.bin_range(bin);
        Some(low + (high - low) / 2.0)
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    #[inline]
    pub fn sum_of_squares(&self) -> f64 {
        self.sum_of_squares
    }

    #[inline]
    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    #[inline]
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[inline]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    #[inline]
    pub fn bounding_box(&self) -> &BoundingBox<D> {
        &self.bounding_box
    }

    /// Region form of the bounding box.
    pub fn region(&self) -> Region<D> {
        Region::from_bounding_box(&self.bounding_box)
    }

    #[inline]
    pub fn histogram(&self) -> Option<&Histogram> {
        self.histogram.as_ref()
    }
}
