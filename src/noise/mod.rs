//! Random disturbances.
//!
//! This module contains the random pulse train generator and the edge
//! jitter operation. Both take their randomness from a caller-supplied
//! `rand::Rng`.

mod jitter;
mod pulses;

pub use pulses::{NoiseConfig, PulseNoise};
