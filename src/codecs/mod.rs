//! Protocol codecs built on the timing algebra.
//!
//! - PWM: bit fields to pulse widths and back
//! - Serial: UART-style framed characters to a line signal and back

mod pwm;
mod serial;

pub use pwm::{BitField, DecodeMode, MAX_FIELD_BITS, PwmConfig, PwmDecoded, bin_to_pwm, pwm_to_bin};
pub use serial::{
    Parity, Reception, RxStatus, SerialConfig, Transmission, serial_rx, serial_tx,
};
