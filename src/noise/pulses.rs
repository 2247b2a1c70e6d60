//! Random pulse train generator.

use rand::Rng;
use rand::rngs::ThreadRng;
use rand_distr::{Distribution, Normal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, SignalError};
use crate::signals::Signal;
use crate::time::Time;

/// Statistics of a disturbing pulse train.
///
/// Frequencies are in pulses per time unit and widths in time units. The
/// pause between pulses is derived from both: its mean is the mean period
/// minus the mean width.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoiseConfig {
    /// Mean pulse frequency
    pub freq_mean: f64,
    /// Standard deviation of the pulse frequency
    pub freq_stddev: f64,
    /// Mean width of the high part of a pulse
    pub width_mean: f64,
    /// Standard deviation of the pulse width
    pub width_stddev: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            freq_mean: 0.1,
            freq_stddev: 2.0,
            width_mean: 3.0,
            width_stddev: 1.0,
        }
    }
}

impl NoiseConfig {
    pub fn new(freq_mean: f64, freq_stddev: f64, width_mean: f64, width_stddev: f64) -> Self {
        Self {
            freq_mean,
            freq_stddev,
            width_mean,
            width_stddev,
        }
    }

    /// Checks that every moment is finite, the frequency mean positive and
    /// the deviations non-negative.
    pub fn validate(&self) -> Result<()> {
        let moments = [
            self.freq_mean,
            self.freq_stddev,
            self.width_mean,
            self.width_stddev,
        ];
        if moments.iter().any(|value| !value.is_finite()) {
            return Err(SignalError::Config(format!(
                "noise moments must be finite: {self:?}"
            )));
        }
        if self.freq_mean <= 0.0 {
            return Err(SignalError::Config(format!(
                "noise frequency mean {} must be positive",
                self.freq_mean
            )));
        }
        if self.freq_stddev < 0.0 || self.width_stddev < 0.0 {
            return Err(SignalError::Config(
                "noise standard deviations must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Mean time between the end of a pulse and the start of the next.
    pub fn pause_mean(&self) -> f64 {
        1.0 / self.freq_mean - self.width_mean
    }

    /// Standard deviation of the pause, half the spread left once the width
    /// spread is taken out of the period spread.
    pub fn pause_stddev(&self) -> f64 {
        (self.freq_stddev.powi(2) - self.width_stddev.powi(2))
            .max(0.0)
            .sqrt()
            / 2.0
    }
}

/// A generator of random pulse trains.
///
/// Widths and pauses are Gaussian draws reflected onto the positive axis,
/// truncated to whole time units and floored at one unit. Every edge falls
/// strictly inside the requested domain.
///
/// # Examples
///
/// ```
/// use binsig::{NoiseConfig, PulseNoise, Signal};
/// use rand::SeedableRng;
///
/// let rng = rand::rngs::StdRng::seed_from_u64(7);
/// let mut noise = PulseNoise::with_rng(NoiseConfig::default(), rng).unwrap();
/// let signal: Signal<i64> = noise.generate(0, 1000).unwrap();
/// assert_eq!(signal.start(), Some(0));
/// assert_eq!(signal.end(), Some(1000));
/// ```
pub struct PulseNoise<R: Rng = ThreadRng> {
    config: NoiseConfig,
    width: Normal<f64>,
    pause: Normal<f64>,
    rng: R,
}

impl PulseNoise<ThreadRng> {
    /// Creates a generator drawing from the thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Config`] if the config does not validate.
    pub fn new(config: NoiseConfig) -> Result<Self> {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> PulseNoise<R> {
    /// Creates a generator with a custom RNG, e.g. a seeded `StdRng` for
    /// reproducible tests.
    pub fn with_rng(config: NoiseConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let width = normal(config.width_mean, config.width_stddev)?;
        let pause = normal(config.pause_mean(), config.pause_stddev())?;

        Ok(Self {
            config,
            width,
            pause,
            rng,
        })
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Generates a pulse train over `[start, end)` with a random start level.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Validation`] if `start` does not precede `end`.
    pub fn generate<T: Time>(&mut self, start: T, end: T) -> Result<Signal<T>> {
        let slevel = self.rng.gen_bool(0.5);
        let mut edges = Vec::new();

        let mut rise = start + self.draw(self.pause);
        loop {
            let fall = rise + self.draw(self.width);
            let next = fall + self.draw(self.pause);
            if next > end {
                break;
            }
            edges.push(rise);
            edges.push(fall);
            rise = next;
        }

        trace!(pulses = edges.len() / 2, "generated pulse noise");
        Signal::new(start, end, edges, slevel)
    }

    fn draw<T: Time>(&mut self, distribution: Normal<f64>) -> T {
        T::from_f64(distribution.sample(&mut self.rng).abs().trunc() + 1.0)
    }
}

pub(crate) fn normal(mean: f64, stddev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, stddev)
        .map_err(|err| SignalError::Config(format!("normal({mean}, {stddev}): {err}")))
}
