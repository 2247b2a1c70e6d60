//! Statistics over signals: level integrals and sliding correlation.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, SignalError};
use crate::signals::Signal;
use crate::time::{Time, steps_covering};

impl<T: Time> Signal<T> {
    /// Total time the signal spends at `level`.
    ///
    /// Returns `None` for `Void`. The integrals of both levels always add up
    /// to the elapse.
    ///
    /// # Examples
    ///
    /// ```
    /// use binsig::Signal;
    ///
    /// let signal = Signal::new(0, 6, vec![2, 3, 4], false).unwrap();
    /// assert_eq!(signal.integral(true), Some(3));
    /// assert_eq!(signal.integral(false), Some(3));
    /// assert_eq!(Signal::<i64>::Void.integral(true), None);
    /// ```
    pub fn integral(&self, level: bool) -> Option<T> {
        let bounded = self.as_bounded()?;

        let mut total = T::ZERO;
        let mut since = bounded.start();
        let mut current = bounded.slevel();
        for &edge in bounded.edges() {
            if current == level {
                total = total + (edge - since);
            }
            since = edge;
            current = !current;
        }
        if current == level {
            total = total + (bounded.end() - since);
        }

        Some(total)
    }

    /// [`Signal::integral`] as a fraction of the elapse, in `[0, 1]`.
    pub fn normalized_integral(&self, level: bool) -> Option<f64> {
        Some(self.integral(level)?.to_f64() / self.elapse()?.to_f64())
    }
}

/// Parameters of a sliding correlation.
///
/// `left` and `right` bound the number of steps the moving signal is slid
/// before and after the aligned position. Unset bounds are derived from the
/// operand lengths so that the extreme shifts still overlap by less than one
/// step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorrelationConfig<T: Time> {
    /// Shift increment
    pub step: T,
    /// Steps before alignment
    pub left: Option<usize>,
    /// Steps after alignment
    pub right: Option<usize>,
    /// Remap values to `[-1, 1]`
    pub normalize: bool,
}

impl<T: Time> CorrelationConfig<T> {
    pub fn new(step: T) -> Self {
        Self {
            step,
            left: None,
            right: None,
            normalize: false,
        }
    }

    /// Limits the slide to `left` steps before and `right` steps after the
    /// aligned position.
    pub fn bounds(mut self, left: usize, right: usize) -> Self {
        self.left = Some(left);
        self.right = Some(right);
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.step > T::ZERO) {
            return Err(SignalError::Config(format!(
                "correlation step {} must be positive",
                self.step
            )));
        }
        Ok(())
    }
}

/// Correlation values and the shifts they were measured at.
///
/// Shift `0` is the position where the moving signal starts together with
/// the fixed one.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation<T: Time> {
    pub values: Vec<f64>,
    pub shifts: Vec<T>,
}

impl<T: Time> Default for Correlation<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            shifts: Vec::new(),
        }
    }
}

impl<T: Time> Correlation<T> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shift and value of the best match (largest value, earliest shift on
    /// ties).
    pub fn peak(&self) -> Option<(T, f64)> {
        let mut best: Option<(T, f64)> = None;
        for (&shift, &value) in self.shifts.iter().zip(&self.values) {
            if best.is_none_or(|(_, top)| value > top) {
                best = Some((shift, value));
            }
        }
        best
    }
}

/// Slides `a` across the fixed signal `b` and measures how long they agree at
/// each shift.
///
/// The value at a shift is the time the XOR of both signals spends low over
/// their overlap, that is, the time they agree. With a `mask`, the XOR is
/// ANDed with the mask first, so masked-out time counts as agreement. With
/// `normalize`, each value is the agreement fraction mapped to `[-1, 1]`.
/// Shifts at which the operands do not overlap are skipped.
///
/// # Errors
///
/// Returns [`SignalError::Config`] if the config does not validate.
///
/// # Examples
///
/// ```
/// use binsig::{CorrelationConfig, Signal, correlation};
///
/// let probe = Signal::new(0, 4, vec![1, 3], false).unwrap();
/// let target = Signal::new(100, 120, vec![109, 111], false).unwrap();
/// let config = CorrelationConfig::new(1).bounds(0, 16).normalize(true);
///
/// let result = correlation(&probe, &target, None, &config).unwrap();
/// assert_eq!(result.peak(), Some((8, 1.0)));
/// ```
pub fn correlation<T: Time>(
    a: &Signal<T>,
    b: &Signal<T>,
    mask: Option<&Signal<T>>,
    config: &CorrelationConfig<T>,
) -> Result<Correlation<T>> {
    config.validate()?;
    let (Some(elapse_a), Some(elapse_b), Some(start_a), Some(start_b)) =
        (a.elapse(), b.elapse(), a.start(), b.start())
    else {
        return Ok(Correlation::default());
    };

    let step = config.step;
    let left = config
        .left
        .unwrap_or_else(|| steps_covering(elapse_a, step).saturating_sub(1));
    let right = config
        .right
        .unwrap_or_else(|| steps_covering(elapse_b, step).saturating_sub(1));
    let align = start_b - start_a;

    let measure = |index: usize| -> Option<(T, f64)> {
        let shift = step.times(index) - step.times(left);
        let mut agreement = a.shifted(align + shift) ^ b;
        if let Some(mask) = mask {
            agreement = agreement & mask;
        }
        let value = if config.normalize {
            agreement.normalized_integral(false)? * 2.0 - 1.0
        } else {
            agreement.integral(false)?.to_f64()
        };
        Some((shift, value))
    };

    #[cfg(feature = "parallel")]
    let points: Vec<(T, f64)> = (0..=left + right).into_par_iter().filter_map(measure).collect();
    #[cfg(not(feature = "parallel"))]
    let points: Vec<(T, f64)> = (0..=left + right).filter_map(measure).collect();

    let skipped = left + right + 1 - points.len();
    if skipped > 0 {
        trace!(skipped, "correlation shifts without overlap");
    }

    let (shifts, values) = points.into_iter().unzip();
    Ok(Correlation { values, shifts })
}
