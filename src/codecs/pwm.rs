//! Pulse width modulation codec.
//!
//! Every bit occupies one period. The period opens with the line at the
//! active level, and the active pulse lasts `elapse_0` or `elapse_1`
//! depending on the bit. Bits are sent LSB first, fields back to back.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, SignalError};
use crate::signals::{DEFAULT_TSCALE, Signal};
use crate::time::Time;

/// Maximum number of bits in a [`BitField`].
pub const MAX_FIELD_BITS: u32 = 64;

/// A bit count and the bits themselves, LSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitField {
    pub width: u32,
    pub value: u64,
}

impl BitField {
    /// Creates a field, discarding bits of `value` above `width`.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::FieldOverflow`] if `width` exceeds 64.
    pub fn new(width: u32, value: u64) -> Result<Self> {
        if width > MAX_FIELD_BITS {
            return Err(SignalError::FieldOverflow(width as usize));
        }
        let value = if width == MAX_FIELD_BITS {
            value
        } else {
            value & ((1u64 << width) - 1)
        };
        Ok(Self { width, value })
    }

    /// Bit `index`, counting from the LSB.
    pub fn bit(&self, index: u32) -> bool {
        index < self.width && (self.value >> index) & 1 == 1
    }
}

/// PWM timing.
///
/// `elapse_0` and `elapse_1` are the active pulse lengths of a 0 and a 1
/// bit. The encoded signal starts at `origin`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PwmConfig<T: Time> {
    pub period: T,
    pub elapse_0: T,
    pub elapse_1: T,
    pub active_level: bool,
    pub origin: T,
}

impl<T: Time> PwmConfig<T> {
    /// Creates a config with an active-high pulse and the origin at zero.
    pub fn new(period: T, elapse_0: T, elapse_1: T) -> Self {
        Self {
            period,
            elapse_0,
            elapse_1,
            active_level: true,
            origin: T::ZERO,
        }
    }

    pub fn active_level(mut self, level: bool) -> Self {
        self.active_level = level;
        self
    }

    pub fn origin(mut self, origin: T) -> Self {
        self.origin = origin;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.period > T::ZERO) {
            return Err(SignalError::Config(format!(
                "pwm period {} must be positive",
                self.period
            )));
        }
        for elapse in [self.elapse_0, self.elapse_1] {
            if !(elapse > T::ZERO && elapse < self.period) {
                return Err(SignalError::Config(format!(
                    "pwm pulse length {elapse} must lie inside the period {}",
                    self.period
                )));
            }
        }
        if self.elapse_0 == self.elapse_1 {
            return Err(SignalError::Config(format!(
                "pwm pulse lengths must differ, both are {}",
                self.elapse_0
            )));
        }
        Ok(())
    }

    fn elapse(&self, bit: bool) -> T {
        if bit { self.elapse_1 } else { self.elapse_0 }
    }

    /// Guard margin excluded from correlation scores at both ends of a
    /// period.
    fn guard(&self) -> T {
        T::from_f64(self.period.to_f64() / 16.0)
    }
}

/// How [`pwm_to_bin`] tells 0 pulses from 1 pulses.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DecodeMode<T: Time> {
    /// Compare each active pulse length with the mean of the two nominal
    /// lengths. Period and origin are not used.
    Elapse,
    /// Chop the signal into periods from the origin and match each period
    /// against both pulse shapes. A period whose two mismatch times differ
    /// by no more than `threshold` is flagged as an error.
    Correlation { threshold: T },
}

/// Decoded bits and the error flags of ambiguous symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PwmDecoded {
    pub code: BitField,
    /// Bit `i` set when symbol `i` could not be decided (its code bit is 0)
    pub errors: u64,
}

impl PwmDecoded {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Encodes bit fields as a PWM signal.
///
/// The result spans `[origin, origin + bits * period)` and starts at the
/// active level, so the first pulse has no rising edge of its own. An input
/// without any bits encodes to `Void`.
///
/// # Examples
///
/// ```
/// use binsig::{BitField, PwmConfig, Signal, bin_to_pwm};
///
/// let config = PwmConfig::new(10, 3, 7);
/// let field = BitField::new(4, 0b1010).unwrap();
/// let signal = bin_to_pwm(&[field], &config).unwrap();
/// assert_eq!(
///     signal,
///     Signal::new(0, 40, vec![3, 10, 17, 20, 23, 30, 37], true).unwrap()
/// );
/// ```
pub fn bin_to_pwm<T: Time>(fields: &[BitField], config: &PwmConfig<T>) -> Result<Signal<T>> {
    config.validate()?;
    let bits: usize = fields.iter().map(|field| field.width as usize).sum();
    if bits == 0 {
        return Ok(Signal::Void);
    }

    let mut edges = Vec::with_capacity(2 * bits);
    let symbols = fields
        .iter()
        .flat_map(|field| (0..field.width).map(move |index| field.bit(index)));
    for (slot, bit) in symbols.enumerate() {
        let rise = config.origin + config.period.times(slot);
        if slot > 0 {
            edges.push(rise);
        }
        edges.push(rise + config.elapse(bit));
    }

    trace!(bits, "encoded pwm signal");
    let end = config.origin + config.period.times(bits);
    Ok(Signal::from_parts_unchecked(
        config.origin,
        end,
        edges,
        config.active_level,
        DEFAULT_TSCALE,
    ))
}

/// Decodes a PWM signal into one bit field, LSB first.
///
/// # Errors
///
/// Returns [`SignalError::Config`] for an invalid config and
/// [`SignalError::FieldOverflow`] when the signal carries more than 64
/// symbols. Ambiguous symbols are reported in [`PwmDecoded::errors`].
///
/// # Examples
///
/// ```
/// use binsig::{BitField, DecodeMode, PwmConfig, bin_to_pwm, pwm_to_bin};
///
/// let config = PwmConfig::new(16, 4, 12).origin(100);
/// let field = BitField::new(6, 0b110010).unwrap();
/// let signal = bin_to_pwm(&[field], &config).unwrap();
///
/// let decoded = pwm_to_bin(&signal, &config, DecodeMode::Elapse).unwrap();
/// assert_eq!(decoded.code, field);
///
/// let mode = DecodeMode::Correlation { threshold: 2 };
/// let decoded = pwm_to_bin(&signal, &config, mode).unwrap();
/// assert_eq!(decoded.code, field);
/// assert!(decoded.is_clean());
/// ```
pub fn pwm_to_bin<T: Time>(
    signal: &Signal<T>,
    config: &PwmConfig<T>,
    mode: DecodeMode<T>,
) -> Result<PwmDecoded> {
    config.validate()?;
    let symbols = match mode {
        DecodeMode::Elapse => decode_elapse(signal, config),
        DecodeMode::Correlation { threshold } => decode_correlation(signal, config, threshold)?,
    };

    if symbols.len() > MAX_FIELD_BITS as usize {
        return Err(SignalError::FieldOverflow(symbols.len()));
    }

    let mut decoded = PwmDecoded {
        code: BitField {
            width: symbols.len() as u32,
            value: 0,
        },
        errors: 0,
    };
    for (index, symbol) in symbols.into_iter().enumerate() {
        match symbol {
            Some(true) => decoded.code.value |= 1 << index,
            Some(false) => {}
            None => decoded.errors |= 1 << index,
        }
    }
    Ok(decoded)
}

/// One symbol per active run: long runs decode to the bit with the longer
/// nominal pulse.
fn decode_elapse<T: Time>(signal: &Signal<T>, config: &PwmConfig<T>) -> Vec<Option<bool>> {
    let threshold = (config.elapse_0 + config.elapse_1).halve();
    let long_bit = config.elapse_1 > config.elapse_0;

    let steps = signal.steps();
    steps
        .windows(2)
        .filter(|pair| pair[0].1 == config.active_level && pair[0].0 < pair[1].0)
        .map(|pair| {
            let run = pair[1].0 - pair[0].0;
            Some(if run > threshold { long_bit } else { !long_bit })
        })
        .collect()
}

/// One symbol per period from the origin, scored by masked mismatch time
/// against both pulse shapes. A trailing piece is skipped when it is cut
/// short by more than the guard.
fn decode_correlation<T: Time>(
    signal: &Signal<T>,
    config: &PwmConfig<T>,
    threshold: T,
) -> Result<Vec<Option<bool>>> {
    let period = config.period;
    let model = |bit: bool| {
        Signal::from_parts_unchecked(
            T::ZERO,
            period,
            vec![config.elapse(bit)],
            config.active_level,
            DEFAULT_TSCALE,
        )
    };
    let (model_0, model_1) = (model(false), model(true));

    let guard = config.guard();
    let mask = if guard > T::ZERO && guard < period - guard {
        Signal::from_parts_unchecked(T::ZERO, period, vec![guard, period - guard], false, DEFAULT_TSCALE)
    } else {
        Signal::from_parts_unchecked(T::ZERO, period, Vec::new(), true, DEFAULT_TSCALE)
    };
    let mismatch = |chunk: &Signal<T>, model: &Signal<T>| {
        ((chunk ^ model) & &mask).integral(true).unwrap_or(T::ZERO)
    };

    let chunks = signal.chop(period, config.origin)?;
    let count = chunks.len();
    let mut symbols = Vec::new();
    for (index, mut chunk) in chunks.into_iter().enumerate() {
        let (Some(start), Some(elapse)) = (chunk.start(), chunk.elapse()) else {
            continue;
        };
        // Only the tail can be cut short; what it lacks beyond the guard is unscored
        if index + 1 == count && period - elapse > guard {
            trace!(at = %start, "partial pwm period ignored");
            continue;
        }
        chunk.shift(T::ZERO - start);

        let (score_0, score_1) = (mismatch(&chunk, &model_0), mismatch(&chunk, &model_1));
        let symbol = if score_0 - score_1 > threshold {
            Some(true)
        } else if score_1 - score_0 > threshold {
            Some(false)
        } else {
            debug!(at = %start, %score_0, %score_1, "ambiguous pwm symbol");
            None
        };
        symbols.push(symbol);
    }
    Ok(symbols)
}
