//! Time axis types.
//!
//! A binary timed signal stores instants, not samples, so the only thing it
//! needs from its time type is ordering and a little arithmetic. The `Time`
//! trait captures exactly that and is implemented for the usual integer tick
//! counters and floating-point seconds.

use std::fmt::{Debug, Display};
use std::ops::{Add, Sub};

/// An ordered numeric type usable as a signal time axis.
///
/// Integer implementations model ticks of a sampling clock; floating-point
/// implementations model continuous time. Conversions from `f64` round to
/// the nearest tick for integer types.
///
/// # Examples
///
/// ```
/// use binsig::Time;
///
/// assert_eq!(<i64 as Time>::from_f64(2.6), 3);
/// assert_eq!(7_i64.times(3), 21);
/// assert_eq!(2.5_f64.halve(), 1.25);
/// ```
pub trait Time:
    Copy
    + PartialOrd
    + Debug
    + Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// The origin of the time axis.
    const ZERO: Self;

    /// Converts from `f64`, rounding to the nearest representable tick.
    fn from_f64(value: f64) -> Self;

    /// Converts to `f64`.
    fn to_f64(self) -> f64;

    /// Multiplies by a count.
    fn times(self, count: usize) -> Self;

    /// Half of this value (rounded toward negative infinity for integers).
    fn halve(self) -> Self;
}

macro_rules! impl_integer_time {
    ($($ty:ty),*) => {
        $(
            impl Time for $ty {
                const ZERO: Self = 0;

                fn from_f64(value: f64) -> Self {
                    value.round() as $ty
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn times(self, count: usize) -> Self {
                    self * count as $ty
                }

                fn halve(self) -> Self {
                    self.div_euclid(2)
                }
            }
        )*
    };
}

macro_rules! impl_float_time {
    ($($ty:ty),*) => {
        $(
            impl Time for $ty {
                const ZERO: Self = 0.0;

                fn from_f64(value: f64) -> Self {
                    value as $ty
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn times(self, count: usize) -> Self {
                    self * count as $ty
                }

                fn halve(self) -> Self {
                    self / 2.0
                }
            }
        )*
    };
}

impl_integer_time!(i32, i64);
impl_float_time!(f32, f64);

/// Larger of two times.
pub(crate) fn later<T: Time>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

/// Smaller of two times.
pub(crate) fn earlier<T: Time>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

/// Smallest `n` such that `n * step >= span`, for `span >= 0` and `step > 0`.
///
/// The float estimate is corrected against the exact comparison so integer
/// time types never under- or over-count.
pub(crate) fn steps_covering<T: Time>(span: T, step: T) -> usize {
    if span <= T::ZERO {
        return 0;
    }
    let mut n = (span.to_f64() / step.to_f64()).ceil().max(0.0) as usize;
    while n > 0 && step.times(n - 1) >= span {
        n -= 1;
    }
    while step.times(n) < span {
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_rounding() {
        assert_eq!(<i64 as Time>::from_f64(2.4), 2);
        assert_eq!(<i64 as Time>::from_f64(2.5), 3);
        assert_eq!(<i32 as Time>::from_f64(-1.6), -2);
    }

    #[test]
    fn test_halve() {
        assert_eq!(7_i64.halve(), 3);
        assert_eq!((-7_i64).halve(), -4);
        assert_eq!(3.0_f64.halve(), 1.5);
    }

    #[test]
    fn test_later_earlier() {
        assert_eq!(later(3, 5), 5);
        assert_eq!(earlier(3, 5), 3);
        assert_eq!(later(-1.0, -2.0), -1.0);
    }

    #[test]
    fn test_steps_covering() {
        assert_eq!(steps_covering(0_i64, 4), 0);
        assert_eq!(steps_covering(1_i64, 4), 1);
        assert_eq!(steps_covering(4_i64, 4), 1);
        assert_eq!(steps_covering(5_i64, 4), 2);
        assert_eq!(steps_covering(10.0_f64, 2.5), 4);
    }
}
