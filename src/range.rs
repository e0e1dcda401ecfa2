//! Immutable bound pairs over ordered numeric domains.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

/// An immutable `(min, max)` bound pair where each side is independently
/// open or closed.
///
/// Invariant: `min <= max`, and when `min == max` both sides are closed.
/// The only exception is the explicitly-empty range built by
/// [`Range::empty`], which is representable so that callers can pass it
/// around, but is rejected by the numeric generators built on top of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Range<T> {
    min: T,
    max: T,
    min_included: bool,
    max_included: bool,
}

/// Range over 32-bit integers.
pub type IntRange = Range<i32>;
/// Range over 64-bit integers.
pub type LongRange = Range<i64>;
/// Range over 64-bit floats.
pub type DoubleRange = Range<f64>;

impl<T: PartialOrd + Clone> Range<T> {
    fn validated(min: T, max: T, min_included: bool, max_included: bool) -> Self {
        if min > max {
            panic!("Range requires min <= max");
        }
        if min == max && !(min_included && max_included) {
            panic!("Range with min == max requires both bounds closed");
        }
        Self {
            min,
            max,
            min_included,
            max_included,
        }
    }

    /// `[min, max]` — both bounds included.
    ///
    /// # Panics
    /// Panics if `min > max`.
    pub fn closed(min: T, max: T) -> Self {
        Self::validated(min, max, true, true)
    }

    /// `(min, max)` — both bounds excluded.
    ///
    /// # Panics
    /// Panics if `min >= max`.
    pub fn open(min: T, max: T) -> Self {
        Self::validated(min, max, false, false)
    }

    /// `(min, max]` — lower bound excluded, upper included.
    ///
    /// # Panics
    /// Panics if `min >= max`.
    pub fn open_closed(min: T, max: T) -> Self {
        Self::validated(min, max, false, true)
    }

    /// `[min, max)` — lower bound included, upper excluded.
    ///
    /// # Panics
    /// Panics if `min >= max`.
    pub fn closed_open(min: T, max: T) -> Self {
        Self::validated(min, max, true, false)
    }

    /// The explicitly-empty range anchored at `at`.
    ///
    /// Representable on purpose; it contains nothing and numeric
    /// generation rejects it.
    pub fn empty(at: T) -> Self {
        Self {
            min: at.clone(),
            max: at,
            min_included: false,
            max_included: false,
        }
    }

    /// Whether this is the explicitly-empty range.
    pub fn is_empty(&self) -> bool {
        self.min == self.max && !(self.min_included && self.max_included)
    }

    /// Whether `value` lies within the range, respecting per-side openness.
    pub fn contains(&self, value: &T) -> bool {
        let above_min = if self.min_included {
            *value >= self.min
        } else {
            *value > self.min
        };
        let below_max = if self.max_included {
            *value <= self.max
        } else {
            *value < self.max
        };
        above_min && below_max
    }

    /// Lower bound.
    pub fn min(&self) -> &T {
        &self.min
    }

    /// Upper bound.
    pub fn max(&self) -> &T {
        &self.max
    }

    /// Whether the lower bound is included.
    pub fn min_included(&self) -> bool {
        self.min_included
    }

    /// Whether the upper bound is included.
    pub fn max_included(&self) -> bool {
        self.max_included
    }
}

impl From<Range<i32>> for Range<i64> {
    fn from(range: Range<i32>) -> Self {
        Range {
            min: range.min as i64,
            max: range.max as i64,
            min_included: range.min_included,
            max_included: range.max_included,
        }
    }
}

impl From<Range<i64>> for Range<BigInt> {
    fn from(range: Range<i64>) -> Self {
        Range {
            min: BigInt::from(range.min),
            max: BigInt::from(range.max),
            min_included: range.min_included,
            max_included: range.max_included,
        }
    }
}

impl Range<f64> {
    /// Convert to a boxed arbitrary-precision decimal range.
    ///
    /// Returns `None` when either bound is not a finite number.
    pub fn to_decimal(&self) -> Option<Range<BigDecimal>> {
        use bigdecimal::FromPrimitive;
        let min = BigDecimal::from_f64(self.min)?;
        let max = BigDecimal::from_f64(self.max)?;
        Some(Range {
            min,
            max,
            min_included: self.min_included,
            max_included: self.max_included,
        })
    }
}
