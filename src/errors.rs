// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Error Types** - *Label Statistics Error Handling*
//!
//! Error types for configuration, accumulation and scan-driver operations.
//!
//! ## Error Categories
//! - **Argument Errors**: Invalid histogram or driver configuration
//! - **Dimension Errors**: Value, label and mask length mismatches
//! - **Boundary Errors**: Worker slot or histogram bin outside the allocated range
//!
//! Missing labels and out-of-range values are never errors. They resolve to the
//! documented defaults or to the boundary histogram bin.

use core::fmt;
use std::error::Error;

/// Error type for all label statistics operations.
///
/// Each variant carries a contextual message string describing the failing call.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Invalid arguments provided to a configuration or driver call.
    InvalidArguments(String),

    /// Length mismatch between companion inputs (values, labels, mask, shape).
    LengthMismatch(String),

    /// Worker slot or histogram bin index out of bounds.
    OutOfBounds(String),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::InvalidArguments(msg) => write!(f, "Invalid arguments: {}", msg),
            StatsError::LengthMismatch(msg) => write!(f, "Length mismatch: {}", msg),
            StatsError::OutOfBounds(msg) => write!(f, "Out of bounds: {}", msg),
        }
    }
}

impl Error for StatsError {}

/// Creates a formatted error message for length mismatches between two companion inputs.
///
/// # Arguments
/// * `fname` - Function name where the mismatch occurred
/// * `lhs` - Length of the left-hand side input
/// * `rhs` - Length of the right-hand side input
pub fn log_length_mismatch(fname: &str, lhs: usize, rhs: usize) -> String {
    format!("{} => Length mismatch: LHS {} RHS {}", fname, lhs, rhs)
}

/// Creates a formatted error message for an index that falls outside `[0, len)`.
pub fn log_out_of_bounds(fname: &str, what: &str, index: usize, len: usize) -> String {
    format!("{} => {} {} outside [0, {})", fname, what, index, len)
}
