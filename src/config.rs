// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Configuration** - *Histogram Mode and Bin Parameters*
//!
//! Compile-time defaults and the runtime configuration consumed by the engine.
//! Configuration is fixed before `begin` and never changes while a scan is running.

use crate::errors::StatsError;
use crate::traits::label::Pixel;

/// Number of histogram bins used when histogram mode is enabled without an explicit count.
pub const DEFAULT_NUM_BINS: usize = 20;

/// Bin count and value range shared by every per-label histogram of a run.
///
/// Validated on construction: at least one bin, finite bounds, `lower_bound < upper_bound`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramSpec {
    num_bins: usize,
    lower_bound: f64,
    upper_bound: f64,
}

impl HistogramSpec {
    /// Validates and builds a histogram specification.
    pub fn new(num_bins: usize, lower_bound: f64, upper_bound: f64) -> Result<Self, StatsError> {
        if num_bins == 0 {
            return Err(StatsError::InvalidArguments(
                "histogram: number of bins must be positive".into(),
            ));
        }
        if !lower_bound.is_finite() || !upper_bound.is_finite() {
            return Err(StatsError::InvalidArguments(format!(
                "histogram: bounds must be finite (lower: {}, upper: {})",
                lower_bound, upper_bound
            )));
        }
        if lower_bound >= upper_bound {
            return Err(StatsError::InvalidArguments(format!(
                "histogram: lower bound {} must be below upper bound {}",
                lower_bound, upper_bound
            )));
        }
        Ok(Self {
            num_bins,
            lower_bound,
            upper_bound,
        })
    }

    /// `DEFAULT_NUM_BINS` bins spanning the full range of the value type `V`.
    pub fn full_range<V: Pixel>() -> Result<Self, StatsError> {
        Self::new(DEFAULT_NUM_BINS, V::lowest_real(), V::max_real())
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    #[inline]
    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    #[inline]
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }
}

/// Runtime configuration of a label statistics run.
///
/// `Default` disables histogram mode, in which case `median` always reports zero and
/// `histogram` always reports `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatsConfig {
    histogram: Option<HistogramSpec>,
}

impl StatsConfig {
    /// Configuration with histogram mode disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with histogram mode enabled over `[lower_bound, upper_bound)`.
    pub fn with_histogram(
        num_bins: usize,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<Self, StatsError> {
        Ok(Self {
            histogram: Some(HistogramSpec::new(num_bins, lower_bound, upper_bound)?),
        })
    }

    /// Histogram mode with `DEFAULT_NUM_BINS` bins over the full range of `V`.
    pub fn with_default_histogram<V: Pixel>() -> Result<Self, StatsError> {
        Ok(Self {
            histogram: Some(HistogramSpec::full_range::<V>()?),
        })
    }

    #[inline]
    pub fn use_histograms(&self) -> bool {
        self.histogram.is_some()
    }

    #[inline]
    pub fn histogram(&self) -> Option<&HistogramSpec> {
        self.histogram.as_ref()
    }
}
