// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Merge Reducer** - *Single-threaded fold of worker tables into the global table*
//!
//! Runs once, after every partition of every pass has been scanned. Every combining
//! operator is commutative and associative (addition for counts, sums and histogram
//! bins; min/max for extrema and bounding boxes), so the global result does not depend
//! on how the elements were split across workers, partitions or passes, nor on the
//! order in which tables and labels are visited here.

use std::collections::BTreeMap;

use crate::config::HistogramSpec;
use crate::statistics::record::LabelStatistics;
use crate::statistics::worker::WorkerTable;
use crate::traits::label::Label;

/// Authoritative label → record map, ordered by label.
pub type GlobalTable<L, const D: usize> = BTreeMap<L, LabelStatistics<D>>;

/// Folds every record of every worker table into `global`.
///
/// Records for labels not yet present are created with the same rule the worker
/// tables use, including histogram allocation. Returns the number of worker records
/// folded.
pub fn merge_worker_tables<L: Label, const D: usize>(
    global: &mut GlobalTable<L, D>,
    tables: &[WorkerTable<L, D>],
    histogram: Option<&HistogramSpec>,
) -> usize {
    let mut folded = 0;
    for table in tables {
        for (label, record) in table.iter() {
            global
                .entry(*label)
                .or_insert_with(|| LabelStatistics::new(histogram))
                .merge(record);
            folded += 1;
        }
    }
    folded
}
