// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Utility Functions** - *Input validation and array layout helpers*

use crate::errors::StatsError;

/// Validates that two lengths are equal before scanning companion arrays.
///
/// # Parameters
/// - `label`: Descriptive context label for error reporting (e.g., "ImageView::new labels")
/// - `a`: Length of the input being checked
/// - `b`: Length it is required to match
///
/// # Returns
/// `Ok(())` if lengths are equal, otherwise `StatsError::LengthMismatch` with diagnostic details.
#[inline(always)]
pub fn confirm_equal_len(label: &str, a: usize, b: usize) -> Result<(), StatsError> {
    if a != b {
        return Err(StatsError::LengthMismatch(format!(
            "{}: length mismatch (lhs: {}, rhs: {})",
            label, a, b
        )));
    }
    Ok(())
}

/// Element strides for an axis-0-fastest dense layout of `shape`.
#[inline]
pub fn strides_for<const D: usize>(shape: &[usize; D]) -> [usize; D] {
    let mut strides = [0usize; D];
    let mut step = 1;
    for axis in 0..D {
        strides[axis] = step;
        step *= shape[axis];
    }
    strides
}
