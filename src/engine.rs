// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Label Statistics Engine** - *Lifecycle hooks and query surface*
//!
//! Holds the whole state of one statistics run: the configuration, one private
//! accumulator table per worker slot, the global table and the cached label list.
//! An external scheduler drives it through three hooks:
//!
//! 1. `begin(number_of_workers)` - allocate and clear the worker tables, clear the
//!    global table.
//! 2. `process_element(worker_id, label, value, position)` - any number of times, over
//!    any number of passes, each element attributed to exactly one worker. Concurrent
//!    schedulers take disjoint `&mut WorkerTable`s from `worker_tables_mut` instead.
//! 3. `end()` - once, after the final partition of the final pass: merge, then derive.
//!
//! Queries take `&self` and are meaningful only after `end`. Querying earlier, or
//! processing after `end`, breaks the usage contract: results are unspecified and a
//! warning is logged, but nothing fails.
//!
//! ## Example
//! ```rust
//! use label_stats::config::StatsConfig;
//! use label_stats::engine::LabelStatisticsEngine;
//!
//! let mut engine = LabelStatisticsEngine::<u8, u32, 1>::new(StatsConfig::default());
//! engine.begin(2);
//! engine.process_element(0, 7, 1u8, &[0]).unwrap();
//! engine.process_element(1, 7, 3u8, &[1]).unwrap();
//! engine.end();
//! assert_eq!(engine.count(&7), 2);
//! assert_eq!(engine.mean(&7), 2.0);
//! assert_eq!(engine.minimum(&42), 255.0);
//! ```

use std::fmt;
use std::marker::PhantomData;

use log::{debug, warn};

use crate::config::StatsConfig;
use crate::errors::{StatsError, log_out_of_bounds};
use crate::statistics::derived::compute_derived;
use crate::statistics::histogram::Histogram;
use crate::statistics::record::LabelStatistics;
use crate::statistics::reduce::{GlobalTable, merge_worker_tables};
use crate::statistics::region::Region;
use crate::statistics::worker::WorkerTable;
use crate::traits::label::{Label, Pixel};

/// Where the engine is in its `begin` / process / `end` lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed or reconfigured; `begin` not yet called.
    Idle,
    /// Between `begin` and `end`; worker tables accept elements.
    Scanning,
    /// `end` has run; the global table is complete and read-only.
    Finalized,
}

/// Per-label statistics over a multi-pass, multi-worker scan.
///
/// - `V`: element value type
/// - `L`: label type
/// - `D`: number of spatial axes of element positions
#[derive(Debug, Clone)]
pub struct LabelStatisticsEngine<V: Pixel, L: Label, const D: usize> {
    config: StatsConfig,
    worker_tables: Vec<WorkerTable<L, D>>,
    global: GlobalTable<L, D>,
    valid_labels: Vec<L>,
    phase: Phase,
    _value: PhantomData<V>,
}

impl<V: Pixel, L: Label, const D: usize> LabelStatisticsEngine<V, L, D> {
    pub fn new(config: StatsConfig) -> Self {
        Self {
            config,
            worker_tables: Vec::new(),
            global: GlobalTable::new(),
            valid_labels: Vec::new(),
            phase: Phase::Idle,
            _value: PhantomData,
        }
    }

    #[inline]
    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Replaces the configuration. Rejected while a scan is in progress.
    ///
    /// Discards the worker tables, the global table and the label list.
    pub fn set_config(&mut self, config: StatsConfig) -> Result<(), StatsError> {
        if self.phase == Phase::Scanning {
            return Err(StatsError::InvalidArguments(
                "set_config: configuration is immutable between begin and end".into(),
            ));
        }
        self.config = config;
        self.worker_tables.clear();
        self.global.clear();
        self.valid_labels.clear();
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Enables histogram mode with `num_bins` bins over `[lower_bound, upper_bound)`.
    pub fn set_histogram_parameters(
        &mut self,
        num_bins: usize,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), StatsError> {
        self.set_config(StatsConfig::with_histogram(num_bins, lower_bound, upper_bound)?)
    }

    // --- lifecycle hooks --------------------------------------------------------

    /// Allocates `number_of_workers` empty worker tables and clears the global table.
    pub fn begin(&mut self, number_of_workers: usize) {
        debug!(
            "begin: {} worker tables, histograms {}",
            number_of_workers,
            if self.config.use_histograms() { "on" } else { "off" }
        );
        let spec = self.config.histogram().copied();
        self.worker_tables.truncate(number_of_workers);
        for table in self.worker_tables.iter_mut() {
            table.set_histogram(spec);
            table.reset();
        }
        self.worker_tables
            .resize_with(number_of_workers, || WorkerTable::new(spec));
        self.global.clear();
        self.valid_labels.clear();
        self.phase = Phase::Scanning;
    }

    /// Folds one element into worker `worker_id`'s table.
    #[inline]
    pub fn process_element(
        &mut self,
        worker_id: usize,
        label: L,
        value: V,
        position: &[i64; D],
    ) -> Result<(), StatsError> {
        self.worker_table_mut(worker_id)?
            .update(label, value.to_real(), position);
        Ok(())
    }

    /// Mutable access to a single worker table.
    pub fn worker_table_mut(&mut self, worker_id: usize) -> Result<&mut WorkerTable<L, D>, StatsError> {
        if self.phase != Phase::Scanning {
            warn!("worker table {} accessed outside begin/end ({:?})", worker_id, self.phase);
        }
        let len = self.worker_tables.len();
        self.worker_tables.get_mut(worker_id).ok_or_else(|| {
            StatsError::OutOfBounds(log_out_of_bounds("process_element", "worker", worker_id, len))
        })
    }

    /// Every worker table as disjoint mutable slots, indexed by worker id.
    ///
    /// Hand one slot to each concurrent worker; no two workers may share a slot.
    pub fn worker_tables_mut(&mut self) -> &mut [WorkerTable<L, D>] {
        if self.phase != Phase::Scanning {
            warn!("worker tables accessed outside begin/end ({:?})", self.phase);
        }
        &mut self.worker_tables
    }

    /// Read-only view of the worker tables.
    pub fn worker_tables(&self) -> &[WorkerTable<L, D>] {
        &self.worker_tables
    }

    #[inline]
    pub fn number_of_workers(&self) -> usize {
        self.worker_tables.len()
    }

    /// Merges every worker table into the global table, then computes derived statistics.
    pub fn end(&mut self) {
        if self.phase != Phase::Scanning {
            warn!("end called without a matching begin ({:?})", self.phase);
        }
        // `end` always rebuilds the global table from the worker tables
        self.global.clear();
        let folded = merge_worker_tables(
            &mut self.global,
            &self.worker_tables,
            self.config.histogram(),
        );
        compute_derived(&mut self.global, &mut self.valid_labels);
        debug!(
            "end: folded {} records from {} worker tables into {} labels",
            folded,
            self.worker_tables.len(),
            self.global.len()
        );
        self.phase = Phase::Finalized;
    }

    // --- queries ----------------------------------------------------------------

    #[inline]
    fn lookup(&self, label: &L) -> Option<&LabelStatistics<D>> {
        if self.phase != Phase::Finalized {
            warn!("label {:?} queried before end ({:?})", label, self.phase);
        }
        self.global.get(label)
    }

    /// Full record for `label`.
    pub fn statistics(&self, label: &L) -> Option<&LabelStatistics<D>> {
        self.lookup(label)
    }

    /// Minimum value; the value type's maximum if `label` was never seen.
    pub fn minimum(&self, label: &L) -> f64 {
        self.lookup(label).map_or(V::max_real(), |r| r.minimum())
    }

    /// Maximum value; the value type's lowest value if `label` was never seen.
    pub fn maximum(&self, label: &L) -> f64 {
        self.lookup(label).map_or(V::lowest_real(), |r| r.maximum())
    }

    pub fn mean(&self, label: &L) -> f64 {
        self.lookup(label).map_or(0.0, |r| r.mean())
    }

    pub fn sum(&self, label: &L) -> f64 {
        self.lookup(label).map_or(0.0, |r| r.sum())
    }

    pub fn sigma(&self, label: &L) -> f64 {
        self.lookup(label).map_or(0.0, |r| r.sigma())
    }

    pub fn variance(&self, label: &L) -> f64 {
        self.lookup(label).map_or(0.0, |r| r.variance())
    }

    pub fn count(&self, label: &L) -> u64 {
        self.lookup(label).map_or(0, |r| r.count())
    }

    /// Bounding box as `[min0, max0, min1, max1, ...]`; empty if `label` was never seen.
    pub fn bounding_box(&self, label: &L) -> Vec<i64> {
        self.lookup(label)
            .map_or_else(Vec::new, |r| r.bounding_box().to_vec())
    }

    /// Region covered by the bounding box; `Region::empty()` if `label` was never seen.
    pub fn region(&self, label: &L) -> Region<D> {
        self.lookup(label).map_or_else(Region::empty, |r| r.region())
    }

    /// Histogram of `label`; `None` if never seen or histograms are disabled.
    pub fn histogram(&self, label: &L) -> Option<&Histogram> {
        self.lookup(label).and_then(|r| r.histogram())
    }

    /// Histogram median approximation; `0.0` if never seen or histograms are disabled.
    pub fn median(&self, label: &L) -> f64 {
        if !self.config.use_histograms() {
            return 0.0;
        }
        self.lookup(label).and_then(|r| r.median()).unwrap_or(0.0)
    }

    /// Every label observed, in ascending order.
    #[inline]
    pub fn valid_labels(&self) -> &[L] {
        &self.valid_labels
    }

    pub fn has_label(&self, label: &L) -> bool {
        self.global.contains_key(label)
    }

    #[inline]
    pub fn number_of_labels(&self) -> usize {
        self.global.len()
    }

    /// Ordered iterator over `(label, record)` pairs of the global table.
    pub fn iter(&self) -> impl Iterator<Item = (&L, &LabelStatistics<D>)> {
        self.global.iter()
    }
}

impl<V: Pixel, L: Label, const D: usize> Default for LabelStatisticsEngine<V, L, D> {
    fn default() -> Self {
        Self::new(StatsConfig::default())
    }
}

impl<V: Pixel, L: Label, const D: usize> fmt::Display for LabelStatisticsEngine<V, L, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lower, upper) = match self.config.histogram() {
            Some(spec) => (spec.lower_bound(), spec.upper_bound()),
            None => (V::lowest_real(), V::max_real()),
        };
        writeln!(f, "Number of labels: {}", self.global.len())?;
        writeln!(f, "Use Histograms: {}", self.config.use_histograms())?;
        writeln!(f, "Histogram Lower Bound: {}", lower)?;
        writeln!(f, "Histogram Upper Bound: {}", upper)
    }
}
