//! Fixed signals for tests and demos.

use super::{DEFAULT_TSCALE, Signal};

const PRIMES: [i64; 20] = [
    0, 1, 2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61,
];

/// A signal over `[-1, 62)` whose edges are the primes up to 61 (with 0 and
/// 1 prepended), starting low.
///
/// It spends 30 time units high and 33 low.
///
/// # Examples
///
/// ```
/// use binsig::sample_signal;
///
/// let signal = sample_signal();
/// assert_eq!(signal.integral(true), Some(30));
/// assert_eq!(signal.integral(false), Some(33));
/// ```
pub fn sample_signal() -> Signal<i64> {
    Signal::from_parts_unchecked(-1, 62, PRIMES.to_vec(), false, DEFAULT_TSCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_signal_is_valid() {
        let signal = sample_signal();
        let rebuilt = Signal::new(-1, 62, signal.edges().to_vec(), false).unwrap();
        assert_eq!(signal, rebuilt);
    }

    #[test]
    fn test_sample_signal_is_fresh() {
        let mut first = sample_signal();
        first.shift(100);
        assert_eq!(sample_signal().start(), Some(-1));
    }
}
