// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Streaming Driver** - *Multi-pass, multi-worker scan over a dense labelled array*
//!
//! Reference scheduler for the engine hooks. A dense D-dimensional array of values and
//! its companion label array are streamed in `number_of_passes` slabs; every slab is
//! split into at most `number_of_workers` disjoint partitions and each partition is
//! scanned by exactly one worker into its own table. `end` runs once, after the final
//! partition of the final pass.
//!
//! With the `parallel` feature the partitions of a pass run on the rayon pool, each with
//! exclusive `&mut` access to one worker table. Without it they run in order on the
//! calling thread. Both produce the same statistics.
//!
//! Element storage is axis-0-fastest: the element at `[x0, x1, ...]` lives at offset
//! `x0 + x1 * shape[0] + x2 * shape[0] * shape[1] + ...`. An optional
//! `minarrow::Bitmask` marks valid elements; masked-out elements are skipped entirely.

use log::trace;
use minarrow::Bitmask;

use crate::engine::LabelStatisticsEngine;
use crate::errors::{StatsError, log_length_mismatch};
use crate::statistics::region::Region;
use crate::statistics::worker::WorkerTable;
use crate::traits::dense_iter::ValidIndices;
use crate::traits::label::{Label, Pixel};
use crate::utils::{confirm_equal_len, strides_for};

/// Borrowed dense value/label arrays with their shape and optional validity mask.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, V: Pixel, L: Label, const D: usize> {
    values: &'a [V],
    labels: &'a [L],
    shape: [usize; D],
    strides: [usize; D],
    mask: Option<&'a Bitmask>,
}

impl<'a, V: Pixel, L: Label, const D: usize> ImageView<'a, V, L, D> {
    /// Validates that `values` and `labels` both hold exactly `Π shape` elements.
    pub fn new(values: &'a [V], labels: &'a [L], shape: [usize; D]) -> Result<Self, StatsError> {
        if D == 0 {
            return Err(StatsError::InvalidArguments(
                "ImageView::new: at least one axis is required".into(),
            ));
        }
        let len: usize = shape.iter().product();
        confirm_equal_len("ImageView::new values", values.len(), len)?;
        confirm_equal_len("ImageView::new labels", labels.len(), len)?;
        Ok(Self {
            values,
            labels,
            shape,
            strides: strides_for(&shape),
            mask: None,
        })
    }

    /// Attaches a validity mask; bit `i` set means element `i` is scanned.
    pub fn with_mask(mut self, mask: &'a Bitmask) -> Result<Self, StatsError> {
        if mask.len() != self.values.len() {
            return Err(StatsError::LengthMismatch(log_length_mismatch(
                "ImageView::with_mask",
                mask.len(),
                self.values.len(),
            )));
        }
        self.mask = Some(mask);
        Ok(self)
    }

    #[inline]
    pub fn shape(&self) -> &[usize; D] {
        &self.shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The full extent of the array.
    pub fn region(&self) -> Region<D> {
        Region::from_shape(self.shape)
    }

    /// Linear offset of `position`, which must lie inside `region()`.
    #[inline(always)]
    fn offset(&self, position: &[i64; D]) -> usize {
        let mut off = 0;
        for axis in 0..D {
            off += position[axis] as usize * self.strides[axis];
        }
        off
    }
}

/// Scans one partition of `image` into `table`.
///
/// This is the per-worker body of a pass. Rows along axis 0 are contiguous, so each row
/// is walked as a linear run of valid offsets.
pub fn scan_partition<V: Pixel, L: Label, const D: usize>(
    table: &mut WorkerTable<L, D>,
    image: &ImageView<'_, V, L, D>,
    partition: &Region<D>,
) -> Result<(), StatsError> {
    if partition.is_empty() {
        return Ok(());
    }
    let full = image.region();
    let mut last = *partition.index();
    for axis in 0..D {
        last[axis] += partition.size()[axis] as i64 - 1;
    }
    if !full.contains(partition.index()) || !full.contains(&last) {
        return Err(StatsError::OutOfBounds(format!(
            "scan_partition => partition {:?} outside array shape {:?}",
            partition,
            image.shape()
        )));
    }

    let row_len = partition.size()[0] as usize;
    let mut row_size = *partition.size();
    row_size[0] = 1;
    let row_starts = Region::new(*partition.index(), row_size);

    for row_start in row_starts.positions() {
        let start = image.offset(&row_start);
        let mut position = row_start;
        for off in ValidIndices::new(start, start + row_len, image.mask) {
            position[0] = row_start[0] + (off - start) as i64;
            table.update(image.labels[off], image.values[off].to_real(), &position);
        }
    }
    Ok(())
}

/// Splits the scan into passes and partitions and drives the engine hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingDriver {
    number_of_passes: usize,
    number_of_workers: usize,
}

impl StreamingDriver {
    /// Both counts must be positive.
    pub fn new(number_of_passes: usize, number_of_workers: usize) -> Result<Self, StatsError> {
        if number_of_passes == 0 || number_of_workers == 0 {
            return Err(StatsError::InvalidArguments(format!(
                "StreamingDriver::new: passes ({}) and workers ({}) must be positive",
                number_of_passes, number_of_workers
            )));
        }
        Ok(Self {
            number_of_passes,
            number_of_workers,
        })
    }

    /// One worker per available rayon thread (one thread without `parallel`).
    pub fn with_available_workers(number_of_passes: usize) -> Result<Self, StatsError> {
        #[cfg(feature = "parallel")]
        let workers = rayon::current_num_threads();
        #[cfg(not(feature = "parallel"))]
        let workers = 1;
        Self::new(number_of_passes, workers)
    }

    #[inline]
    pub fn number_of_passes(&self) -> usize {
        self.number_of_passes
    }

    #[inline]
    pub fn number_of_workers(&self) -> usize {
        self.number_of_workers
    }

    /// Runs `begin`, every pass, then `end` on `engine`.
    ///
    /// On error the engine is left between `begin` and `end` and must not be queried.
    pub fn run<V: Pixel, L: Label, const D: usize>(
        &self,
        engine: &mut LabelStatisticsEngine<V, L, D>,
        image: &ImageView<'_, V, L, D>,
    ) -> Result<(), StatsError> {
        engine.begin(self.number_of_workers);
        let passes = image.region().split_slowest(self.number_of_passes);
        for (pass, slab) in passes.iter().enumerate() {
            let partitions = slab.split_slowest(self.number_of_workers);
            trace!(
                "pass {}/{}: {} partitions over {:?}",
                pass + 1,
                passes.len(),
                partitions.len(),
                slab
            );
            let tables = &mut engine.worker_tables_mut()[..partitions.len()];
            scan_pass(tables, image, &partitions)?;
        }
        engine.end();
        Ok(())
    }
}

/// Scans every partition of one pass, partition `i` into `tables[i]`.
#[cfg(feature = "parallel")]
fn scan_pass<V: Pixel, L: Label, const D: usize>(
    tables: &mut [WorkerTable<L, D>],
    image: &ImageView<'_, V, L, D>,
    partitions: &[Region<D>],
) -> Result<(), StatsError> {
    use rayon::prelude::*;

    tables
        .par_iter_mut()
        .zip(partitions.par_iter())
        .try_for_each(|(table, partition)| scan_partition(table, image, partition))
}

#[cfg(not(feature = "parallel"))]
fn scan_pass<V: Pixel, L: Label, const D: usize>(
    tables: &mut [WorkerTable<L, D>],
    image: &ImageView<'_, V, L, D>,
    partitions: &[Region<D>],
) -> Result<(), StatsError> {
    for (table, partition) in tables.iter_mut().zip(partitions.iter()) {
        scan_partition(table, image, partition)?;
    }
    Ok(())
}
