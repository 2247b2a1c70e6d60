//! Signal types.
//!
//! This module provides the binary timed signal and its fixtures:
//! - `Signal`, the `Void | Bounded` waveform value
//! - `Bounded`, the timing data of a signal with a domain
//! - `sample_signal()`, a fixed test signal

mod signal;
mod fixtures;

pub use signal::{Bounded, DEFAULT_TSCALE, Signal};
pub use fixtures::sample_signal;
