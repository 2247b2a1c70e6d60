//! Binsig - Binary timed signals for Rust
//!
//! A binary timed signal is a 0/1 waveform over a continuous time domain,
//! stored as the instants at which its level changes. This library provides
//! the signal type, a boolean algebra over signals with independent domains,
//! structural operations, statistics, random disturbances and two protocol
//! codecs built on top: pulse width modulation and an asynchronous serial
//! line.
//!
//! # Examples
//!
//! ```
//! use binsig::Signal;
//!
//! let base = Signal::new(0, 6, vec![2, 3, 4], false).unwrap();
//! let later = base.shifted(2);
//!
//! // Binary operators work on the common domain [2, 6)
//! assert_eq!(&base & &later, Signal::new(2, 6, vec![4, 5], false).unwrap());
//! assert_eq!((&base ^ &base).integral(true), Some(0));
//! assert_eq!(!!base.clone(), base);
//! ```

pub mod algebra;
#[cfg(feature = "codecs")]
pub mod codecs;
pub mod error;
pub mod noise;
pub mod signals;
pub mod statistics;
pub mod time;

// Re-export commonly used types at the crate root
pub use algebra::{Intersection, LogicOp, Window};
#[cfg(feature = "codecs")]
pub use codecs::{
    BitField, DecodeMode, Parity, PwmConfig, PwmDecoded, Reception, RxStatus, SerialConfig,
    Transmission, bin_to_pwm, pwm_to_bin, serial_rx, serial_tx,
};
pub use error::{Result, SignalError};
pub use noise::{NoiseConfig, PulseNoise};
pub use signals::{Bounded, DEFAULT_TSCALE, Signal, sample_signal};
pub use statistics::{Correlation, CorrelationConfig, correlation};
pub use time::Time;

// Re-export macros when the feature is enabled
#[cfg(feature = "macros")]
pub use binsig_macros::waveform;
