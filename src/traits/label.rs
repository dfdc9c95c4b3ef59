// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Label and Pixel traits** - *Key and value bounds for label statistics*

use std::fmt::Debug;
use std::hash::Hash;

use num_traits::{Bounded, ToPrimitive};

/// Grouping key attached to every element of a scan.
///
/// Labels are discovered while scanning and never declared up front. `Hash` backs the
/// worker-local tables and `Ord` backs the global table and its sorted label list.
///
/// Blanket-implemented for every type satisfying the bounds, so all primitive integers
/// work out of the box.
pub trait Label: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {}

impl<T> Label for T where T: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {}

/// Element ("pixel") type of the scanned dataset.
///
/// Values are widened to `f64` for accumulation. The bounded range supplies the query
/// defaults for labels that were never observed (`minimum` reports the type maximum,
/// `maximum` reports the type's lowest value) and the default histogram range.
pub trait Pixel: Copy + Bounded + ToPrimitive + Debug + Send + Sync + 'static {
    /// Widens the value to the accumulation type.
    #[inline(always)]
    fn to_real(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    /// Largest representable value, as `f64`.
    #[inline(always)]
    fn max_real() -> f64 {
        Self::max_value().to_real()
    }

    /// Lowest representable value (most negative for signed and float types), as `f64`.
    #[inline(always)]
    fn lowest_real() -> f64 {
        Self::min_value().to_real()
    }
}

impl<T> Pixel for T where T: Copy + Bounded + ToPrimitive + Debug + Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_bounds() {
        assert_eq!(<u8 as Pixel>::max_real(), 255.0);
        assert_eq!(<u8 as Pixel>::lowest_real(), 0.0);
        assert_eq!(<i16 as Pixel>::lowest_real(), -32768.0);
        assert_eq!(<f32 as Pixel>::lowest_real(), f32::MIN as f64);
        assert_eq!(<f64 as Pixel>::max_real(), f64::MAX);
    }

    #[test]
    fn test_to_real() {
        assert_eq!(7u16.to_real(), 7.0);
        assert_eq!((-3i32).to_real(), -3.0);
        assert!(f64::NAN.to_real().is_nan());
    }
}
