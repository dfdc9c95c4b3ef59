// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Worker-Local Accumulator Table** - *Private label → record map per worker slot*
//!
//! Each concurrent worker owns one table and is the only writer to it for the whole
//! scan, across every pass. Records are created lazily the first time a label is seen
//! by that worker. Nothing here synchronises: exclusivity comes from handing each
//! worker its own `&mut WorkerTable`.

#[cfg(not(feature = "fast_hash"))]
use std::collections::HashMap;

#[cfg(feature = "fast_hash")]
use ahash::AHashMap;

use crate::config::HistogramSpec;
use crate::statistics::record::LabelStatistics;
use crate::traits::label::Label;

#[cfg(feature = "fast_hash")]
type LabelMap<L, const D: usize> = AHashMap<L, LabelStatistics<D>>;
#[cfg(not(feature = "fast_hash"))]
type LabelMap<L, const D: usize> = HashMap<L, LabelStatistics<D>>;

/// Label statistics accumulated by a single worker slot.
#[derive(Debug, Clone)]
pub struct WorkerTable<L: Label, const D: usize> {
    records: LabelMap<L, D>,
    histogram: Option<HistogramSpec>,
}

impl<L: Label, const D: usize> WorkerTable<L, D> {
    /// Empty table; new records get a histogram when `histogram` is `Some`.
    pub fn new(histogram: Option<HistogramSpec>) -> Self {
        Self {
            records: Default::default(),
            histogram,
        }
    }

    /// Histogram layout for records created from now on.
    pub(crate) fn set_histogram(&mut self, histogram: Option<HistogramSpec>) {
        self.histogram = histogram;
    }

    /// Drops every record.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Folds one element into the record for `label`, creating the record if needed.
    #[inline(always)]
    pub fn update(&mut self, label: L, value: f64, position: &[i64; D]) {
        let histogram = self.histogram.as_ref();
        self.records
            .entry(label)
            .or_insert_with(|| LabelStatistics::new(histogram))
            .accumulate(value, position);
    }

    #[inline]
    pub fn get(&self, label: &L) -> Option<&LabelStatistics<D>> {
        self.records.get(label)
    }

    /// Records in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&L, &LabelStatistics<D>)> {
        self.records.iter()
    }

    /// Number of distinct labels seen by this worker.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of elements folded into this table.
    pub fn element_count(&self) -> u64 {
        self.records.values().map(|r| r.count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_creation_and_update() {
        let mut t = WorkerTable::<u8, 2>::new(None);
        assert!(t.is_empty());
        t.update(1, 2.0, &[0, 0]);
        t.update(1, 4.0, &[1, 3]);
        t.update(9, -1.0, &[5, 5]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.element_count(), 3);
        let r = t.get(&1).unwrap();
        assert_eq!(r.count(), 2);
        assert_eq!(r.sum(), 6.0);
        assert_eq!(r.bounding_box().to_vec(), vec![0, 1, 0, 3]);
        assert!(t.get(&2).is_none());
    }

    #[test]
    fn test_histogram_allocated_per_record() {
        let spec = HistogramSpec::new(4, 0.0, 4.0).unwrap();
        let mut t = WorkerTable::<u16, 1>::new(Some(spec));
        t.update(3, 1.5, &[0]);
        t.update(3, 3.5, &[1]);
        let h = t.get(&3).unwrap().histogram().unwrap();
        assert_eq!(h.frequencies(), &[0, 1, 0, 1]);
        assert_eq!(h.total_frequency(), t.get(&3).unwrap().count());
    }

    #[test]
    fn test_reset_clears() {
        let mut t = WorkerTable::<i32, 1>::new(None);
        t.update(-4, 1.0, &[0]);
        t.reset();
        assert!(t.is_empty());
        assert_eq!(t.element_count(), 0);
    }
}
