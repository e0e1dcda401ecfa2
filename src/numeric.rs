//! Bounded numeric generation over ranges.
//!
//! Every generator here computes effective closed bounds at construction
//! (open endpoints nudged inward, empty results rejected) and precomputes a
//! sampling mode. The mode ladder keeps draws free of modulo bias and of
//! integer overflow: a span that fits the native width is sampled as an
//! offset, and a span that does not is promoted to the next-wider
//! arithmetic (i32 to i64, i64 to big integers, f64 to big decimals).

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};

use crate::generator::Generator;
use crate::range::Range;

fn effective_int_bounds<T: num_traits::PrimInt>(range: &Range<T>) -> (T, T) {
    if range.is_empty() {
        panic!("cannot generate from an empty range");
    }
    let mut min = *range.min();
    let mut max = *range.max();
    // An open side implies min < max, so the one-step nudge cannot wrap.
    if !range.min_included() {
        min = min + T::one();
    }
    if !range.max_included() {
        max = max - T::one();
    }
    if min > max {
        panic!("range is empty after open-bound adjustment");
    }
    (min, max)
}

/// Draw a uniform value in `[0, bound)`.
///
/// Samples a bit-length uniformly in `[0, bits(bound)]`, draws that many
/// random bits, and reduces into the bound.
fn random_below(rng: &mut dyn rand::RngCore, bound: &BigUint) -> BigUint {
    use rand::Rng;
    if bound.is_one() {
        return BigUint::zero();
    }
    let bits = bound.bits();
    let bit_len = rng.gen_range(0..=bits) as usize;
    let n_bytes = bit_len.div_ceil(8);
    let mut buf = vec![0u8; n_bytes];
    rng.fill_bytes(&mut buf);
    let rem = (bit_len % 8) as u8;
    if rem != 0 {
        buf[0] &= (1u8 << rem) - 1;
    }
    BigUint::from_bytes_be(&buf) % bound
}

#[derive(Debug, Clone, Copy)]
enum I32Mode {
    Constant,
    FullDomain,
    Symmetric,
    Span(u32),
    Widened,
}

/// Uniform generator over a 32-bit integer range.
#[derive(Debug, Clone)]
pub struct I32RangeGenerator {
    min: i32,
    max: i32,
    mode: I32Mode,
}

impl I32RangeGenerator {
    /// Build a generator for `range`.
    ///
    /// # Panics
    /// Panics if the range is empty, or empties after open-bound adjustment.
    pub fn new(range: Range<i32>) -> Self {
        let (min, max) = effective_int_bounds(&range);
        let mode = if min == max {
            I32Mode::Constant
        } else if min == i32::MIN && max == i32::MAX {
            I32Mode::FullDomain
        } else if min != i32::MIN && max == -min {
            I32Mode::Symmetric
        } else {
            match max.checked_sub(min) {
                Some(delta) => I32Mode::Span(delta as u32),
                None => I32Mode::Widened,
            }
        };
        Self { min, max, mode }
    }
}

impl Generator<i32> for I32RangeGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> i32 {
        use rand::Rng;
        match self.mode {
            I32Mode::Constant => self.min,
            I32Mode::FullDomain => rng.next_u32() as i32,
            I32Mode::Symmetric => {
                let magnitude = rng.gen_range(0..=self.max);
                if rng.r#gen::<bool>() {
                    magnitude
                } else {
                    -magnitude
                }
            }
            I32Mode::Span(delta) => {
                let offset = rng.gen_range(0..=delta);
                (self.min as i64 + offset as i64) as i32
            }
            I32Mode::Widened => rng.gen_range(self.min as i64..=self.max as i64) as i32,
        }
    }
}

#[derive(Debug, Clone)]
enum I64Mode {
    Constant,
    FullDomain,
    Symmetric,
    Span(u64),
    Promoted(BigIntRangeGenerator),
}

/// Uniform generator over a 64-bit integer range.
#[derive(Debug, Clone)]
pub struct I64RangeGenerator {
    min: i64,
    max: i64,
    mode: I64Mode,
}

impl I64RangeGenerator {
    /// Build a generator for `range`.
    ///
    /// # Panics
    /// Panics if the range is empty, or empties after open-bound adjustment.
    pub fn new(range: Range<i64>) -> Self {
        let (min, max) = effective_int_bounds(&range);
        let mode = if min == max {
            I64Mode::Constant
        } else if min == i64::MIN && max == i64::MAX {
            I64Mode::FullDomain
        } else if min != i64::MIN && max == -min {
            I64Mode::Symmetric
        } else {
            match max.checked_sub(min) {
                Some(delta) => I64Mode::Span(delta as u64),
                None => I64Mode::Promoted(BigIntRangeGenerator::new(Range::closed(
                    BigInt::from(min),
                    BigInt::from(max),
                ))),
            }
        };
        Self { min, max, mode }
    }
}

impl Generator<i64> for I64RangeGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> i64 {
        use rand::Rng;
        match &self.mode {
            I64Mode::Constant => self.min,
            I64Mode::FullDomain => rng.next_u64() as i64,
            I64Mode::Symmetric => {
                let magnitude = rng.gen_range(0..=self.max);
                if rng.r#gen::<bool>() {
                    magnitude
                } else {
                    -magnitude
                }
            }
            I64Mode::Span(delta) => {
                let offset = rng.gen_range(0..=*delta);
                (self.min as i128 + offset as i128) as i64
            }
            // The value is within [min, max], so the narrowing always holds.
            I64Mode::Promoted(big) => big.generate(rng).to_i64().unwrap_or(self.min),
        }
    }
}

#[derive(Debug, Clone)]
enum F64Mode {
    Constant,
    SignMagnitude,
    Span,
    Promoted(BigDecimalRangeGenerator),
}

/// Uniform generator over a 64-bit float range.
#[derive(Debug, Clone)]
pub struct F64RangeGenerator {
    min: f64,
    max: f64,
    mode: F64Mode,
}

impl F64RangeGenerator {
    /// Build a generator for `range`. Open endpoints are nudged by one ulp.
    ///
    /// # Panics
    /// Panics if either bound is not finite, if the range is empty, or if
    /// it empties after open-bound adjustment.
    pub fn new(range: Range<f64>) -> Self {
        if !range.min().is_finite() || !range.max().is_finite() {
            panic!("float range bounds must be finite");
        }
        if range.is_empty() {
            panic!("cannot generate from an empty range");
        }
        let mut min = *range.min();
        let mut max = *range.max();
        if !range.min_included() {
            min = min.next_up();
        }
        if !range.max_included() {
            max = max.next_down();
        }
        if min > max {
            panic!("range is empty after open-bound adjustment");
        }
        let mode = if min == max {
            F64Mode::Constant
        } else if max == -min {
            // Covers the full domain too: f64::MIN is -f64::MAX.
            F64Mode::SignMagnitude
        } else if (max - min).is_finite() {
            F64Mode::Span
        } else {
            match Range::closed(min, max).to_decimal() {
                Some(decimal) => F64Mode::Promoted(BigDecimalRangeGenerator::new(decimal)),
                None => panic!("float range bounds must be finite"),
            }
        };
        Self { min, max, mode }
    }
}

impl Generator<f64> for F64RangeGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> f64 {
        use rand::Rng;
        match &self.mode {
            F64Mode::Constant => self.min,
            F64Mode::SignMagnitude => {
                let magnitude = rng.gen_range(0.0..=self.max);
                if rng.r#gen::<bool>() {
                    magnitude
                } else {
                    -magnitude
                }
            }
            F64Mode::Span => rng.gen_range(self.min..=self.max),
            F64Mode::Promoted(big) => {
                let value = big.generate(rng).to_f64().unwrap_or(self.min);
                value.clamp(self.min, self.max)
            }
        }
    }
}

/// Uniform generator over an arbitrary-precision integer range.
#[derive(Debug, Clone)]
pub struct BigIntRangeGenerator {
    min: BigInt,
    bound: BigUint,
}

impl BigIntRangeGenerator {
    /// Build a generator for `range`.
    ///
    /// # Panics
    /// Panics if the range is empty, or empties after open-bound adjustment.
    pub fn new(range: Range<BigInt>) -> Self {
        if range.is_empty() {
            panic!("cannot generate from an empty range");
        }
        let mut min = range.min().clone();
        let mut max = range.max().clone();
        if !range.min_included() {
            min += 1;
        }
        if !range.max_included() {
            max -= 1;
        }
        if min > max {
            panic!("range is empty after open-bound adjustment");
        }
        let span = (&max - &min).to_biguint().unwrap_or_default();
        Self {
            min,
            bound: span + 1u32,
        }
    }
}

impl Generator<BigInt> for BigIntRangeGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> BigInt {
        &self.min + BigInt::from(random_below(rng, &self.bound))
    }
}

/// Uniform generator over an arbitrary-precision decimal range.
///
/// Samples the exact value at the finer of the two bound scales, then
/// additionally draws a display scale uniformly between the bound scales;
/// when rounding to the drawn scale would leave the range, the exact value
/// is returned instead.
#[derive(Debug, Clone)]
pub struct BigDecimalRangeGenerator {
    range: Range<BigDecimal>,
    lo: BigInt,
    bound: BigUint,
    work_scale: i64,
    scale_lo: i64,
    scale_hi: i64,
}

fn rescale_unscaled(unscaled: &BigInt, from_scale: i64, to_scale: i64) -> BigInt {
    unscaled * num_traits::pow(BigInt::from(10), (to_scale - from_scale) as usize)
}

impl BigDecimalRangeGenerator {
    /// Build a generator for `range`. Open endpoints are nudged by one unit
    /// in the last place of their own scale.
    ///
    /// # Panics
    /// Panics if the range is empty, or empties after open-bound adjustment.
    pub fn new(range: Range<BigDecimal>) -> Self {
        if range.is_empty() {
            panic!("cannot generate from an empty range");
        }
        let mut min = range.min().clone();
        let mut max = range.max().clone();
        if !range.min_included() {
            let (_, scale) = min.as_bigint_and_exponent();
            min = min + BigDecimal::new(BigInt::one(), scale);
        }
        if !range.max_included() {
            let (_, scale) = max.as_bigint_and_exponent();
            max = max - BigDecimal::new(BigInt::one(), scale);
        }
        if min > max {
            panic!("range is empty after open-bound adjustment");
        }

        let (u_min, e_min) = min.as_bigint_and_exponent();
        let (u_max, e_max) = max.as_bigint_and_exponent();
        let work_scale = e_min.max(e_max);
        let lo = rescale_unscaled(&u_min, e_min, work_scale);
        let hi = rescale_unscaled(&u_max, e_max, work_scale);
        let span = (&hi - &lo).to_biguint().unwrap_or_default();

        Self {
            range: Range::closed(min, max),
            lo,
            bound: span + 1u32,
            work_scale,
            scale_lo: e_min.min(e_max),
            scale_hi: work_scale,
        }
    }
}

impl Generator<BigDecimal> for BigDecimalRangeGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> BigDecimal {
        use rand::Rng;
        let unscaled = &self.lo + BigInt::from(random_below(rng, &self.bound));
        let exact = BigDecimal::new(unscaled, self.work_scale);
        let scale = rng.gen_range(self.scale_lo..=self.scale_hi);
        let rounded = exact.with_scale(scale);
        if self.range.contains(&rounded) {
            rounded
        } else {
            exact
        }
    }
}
