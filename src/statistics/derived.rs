// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Derived Statistics Pass** - *Mean, variance and sigma after the merge*
//!
//! Variance comes from the raw moments, `(Σx² - (Σx)²/n) / (n - 1)`. This keeps the
//! merge a plain sum at the cost of precision for large counts or magnitudes, where the
//! result can lose digits or dip slightly below zero. It is reported as computed.

use crate::statistics::reduce::GlobalTable;
use crate::traits::label::Label;

/// Finalizes every record of `global` and rebuilds `valid_labels` in label order.
///
/// Any previous contents of `valid_labels` are discarded.
pub fn compute_derived<L: Label, const D: usize>(
    global: &mut GlobalTable<L, D>,
    valid_labels: &mut Vec<L>,
) {
    for record in global.values_mut() {
        record.finalize();
    }

    valid_labels.clear();
    valid_labels.reserve(global.len());
    valid_labels.extend(global.keys().copied());
}
