//! Asynchronous serial line (UART) codec.
//!
//! The line idles high. A frame is a low start bit, the data bits LSB first,
//! an optional parity bit and one or two high stop bits. Bit boundaries are
//! measured from the frame start, so rounding to integer ticks never
//! accumulates across a frame.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, SignalError};
use crate::signals::Signal;
use crate::time::Time;

/// Parity bit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parity {
    #[default]
    Off,
    /// Parity bit set when the data has an even number of ones
    Odd,
    /// Parity bit set when the data has an odd number of ones
    Even,
}

impl Parity {
    /// The parity bit for `data`, `None` when parity is off.
    pub fn bit(self, data: u8) -> Option<bool> {
        let odd_ones = data.count_ones() % 2 == 1;
        match self {
            Parity::Off => None,
            Parity::Odd => Some(!odd_ones),
            Parity::Even => Some(odd_ones),
        }
    }
}

/// Serial line parameters.
///
/// `tscale` gives the time units per second of the signals being built or
/// sampled, so one bit lasts `tscale / baud` units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    pub bits_per_char: u8,
    pub parity: Parity,
    pub stop_bits: u8,
    pub baud: f64,
    pub tscale: f64,
}

impl Default for SerialConfig {
    /// 8N1 at 9600 baud on a microsecond time axis.
    fn default() -> Self {
        Self {
            bits_per_char: 8,
            parity: Parity::Off,
            stop_bits: 1,
            baud: 9600.0,
            tscale: 1e6,
        }
    }
}

impl SerialConfig {
    pub fn new(bits_per_char: u8, parity: Parity, stop_bits: u8, baud: f64) -> Self {
        Self {
            bits_per_char,
            parity,
            stop_bits,
            baud,
            ..Self::default()
        }
    }

    pub fn tscale(mut self, tscale: f64) -> Self {
        self.tscale = tscale;
        self
    }

    /// Length of one bit in time units.
    pub fn bit_time(&self) -> f64 {
        self.tscale / self.baud
    }

    /// Bits in a frame: start, data, parity and stop bits.
    pub fn frame_bits(&self) -> usize {
        1 + self.bits_per_char as usize + self.parity_bits() + self.stop_bits as usize
    }

    fn parity_bits(&self) -> usize {
        usize::from(self.parity != Parity::Off)
    }

    /// Offset of the point `bits` bit lengths into a frame.
    pub fn offset<T: Time>(&self, bits: f64) -> T {
        T::from_f64(bits * self.bit_time())
    }

    /// Checks the frame layout and that the time type resolves every bit
    /// boundary and every bit middle.
    pub fn validate<T: Time>(&self) -> Result<()> {
        if !(5..=8).contains(&self.bits_per_char) {
            return Err(SignalError::Config(format!(
                "{} bits per character, expected 5 to 8",
                self.bits_per_char
            )));
        }
        if !(1..=2).contains(&self.stop_bits) {
            return Err(SignalError::Config(format!(
                "{} stop bits, expected 1 or 2",
                self.stop_bits
            )));
        }
        if !(self.baud > 0.0 && self.tscale > 0.0) || !self.bit_time().is_finite() {
            return Err(SignalError::Config(format!(
                "baud rate {} and time scale {} must be positive",
                self.baud, self.tscale
            )));
        }

        for bit in 0..self.frame_bits() {
            let bit = bit as f64;
            let (lo, mid, hi) = (
                self.offset::<T>(bit),
                self.offset::<T>(bit + 0.5),
                self.offset::<T>(bit + 1.0),
            );
            if !(lo < mid && mid < hi) {
                return Err(SignalError::Config(format!(
                    "bit time {} too short for the time axis",
                    self.bit_time()
                )));
            }
        }
        Ok(())
    }

    /// Frame line levels, one per bit, from the start bit to the last stop
    /// bit.
    fn frame_levels(&self, data: u8) -> Vec<bool> {
        let mut levels = Vec::with_capacity(self.frame_bits());
        levels.push(false);
        levels.extend((0..self.bits_per_char).map(|bit| (data >> bit) & 1 == 1));
        levels.extend(self.parity.bit(data));
        levels.extend(std::iter::repeat_n(true, self.stop_bits as usize));
        levels
    }

    fn data_mask(&self) -> u8 {
        ((1u16 << self.bits_per_char) - 1) as u8
    }
}

/// Output of [`serial_tx`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transmission<T: Time> {
    pub signal: Signal<T>,
    /// When each frame actually started, after waiting for the line
    pub start_times: Vec<T>,
}

/// Per-character receive status, a set of flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RxStatus(u8);

impl RxStatus {
    pub const CLEAN: Self = Self(0);
    /// Parity bit does not match the data bits
    pub const PARITY_ERROR: Self = Self(1 << 0);
    /// A stop bit was sampled low
    pub const STOP_ERROR: Self = Self(1 << 1);
    /// Signal ended while sampling the start bit
    pub const EOS_START: Self = Self(1 << 2);
    /// Signal ended while sampling data bits
    pub const EOS_CHAR: Self = Self(1 << 3);
    /// Signal ended while sampling the parity bit
    pub const EOS_PARITY: Self = Self(1 << 4);
    /// Signal ended while sampling stop bits
    pub const EOS_STOP: Self = Self(1 << 5);

    const EOS_ANY: u8 = Self::EOS_START.0 | Self::EOS_CHAR.0 | Self::EOS_PARITY.0 | Self::EOS_STOP.0;

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flags: RxStatus) -> bool {
        self.0 & flags.0 == flags.0
    }

    pub fn is_clean(self) -> bool {
        self.0 == 0
    }

    pub fn is_end_of_signal(self) -> bool {
        self.0 & Self::EOS_ANY != 0
    }
}

impl BitOr for RxStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for RxStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for RxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(RxStatus, &str); 6] = [
            (RxStatus::PARITY_ERROR, "parity"),
            (RxStatus::STOP_ERROR, "stop"),
            (RxStatus::EOS_START, "eos-start"),
            (RxStatus::EOS_CHAR, "eos-char"),
            (RxStatus::EOS_PARITY, "eos-parity"),
            (RxStatus::EOS_STOP, "eos-stop"),
        ];
        if self.is_clean() {
            return write!(f, "ok");
        }
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join("|"))
    }
}

/// Output of [`serial_rx`]: three parallel sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Reception<T: Time> {
    pub chars: Vec<u8>,
    pub start_times: Vec<T>,
    pub status: Vec<RxStatus>,
}

impl<T: Time> Default for Reception<T> {
    fn default() -> Self {
        Self {
            chars: Vec::new(),
            start_times: Vec::new(),
            status: Vec::new(),
        }
    }
}

impl<T: Time> Reception<T> {
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// True when no character carries any flag.
    pub fn is_clean(&self) -> bool {
        self.status.iter().all(|status| status.is_clean())
    }

    fn push(&mut self, data: u8, start: T, status: RxStatus) {
        self.chars.push(data);
        self.start_times.push(start);
        self.status.push(status);
    }
}

/// Builds the line signal for a character stream.
///
/// Frame `i` starts at `start_times[i]`, or later if the previous frame is
/// still on the line. Data bits above `bits_per_char` are ignored. The line
/// is idle high between frames; the signal starts with the first start bit
/// and ends with the last stop bit. No characters encode to `Void`.
///
/// # Errors
///
/// Returns [`SignalError::LengthMismatch`] if the sequences differ in length
/// and [`SignalError::Config`] for an invalid config.
///
/// # Examples
///
/// ```
/// use binsig::{Parity, SerialConfig, Signal, serial_tx};
///
/// // 10 time units per bit
/// let config = SerialConfig::new(8, Parity::Off, 1, 100.0).tscale(1000.0);
/// let tx = serial_tx(b"A", &[0], &config).unwrap();
/// // 'A' = 0x41: start, 1, 0, 0, 0, 0, 0, 1, 0, stop
/// assert_eq!(
///     tx.signal,
///     Signal::new(0, 100, vec![0, 10, 20, 70, 80, 90], true).unwrap()
/// );
/// ```
pub fn serial_tx<T: Time>(
    chars: &[u8],
    start_times: &[T],
    config: &SerialConfig,
) -> Result<Transmission<T>> {
    if chars.len() != start_times.len() {
        return Err(SignalError::LengthMismatch {
            left: chars.len(),
            right: start_times.len(),
        });
    }
    config.validate::<T>()?;

    let mut transmission = Transmission {
        signal: Signal::Void,
        start_times: Vec::with_capacity(chars.len()),
    };
    let frame_end = config.offset::<T>(config.frame_bits() as f64);

    for (&data, &requested) in chars.iter().zip(start_times) {
        let start = match transmission.signal.end() {
            Some(free) if free > requested => {
                trace!(requested = %requested, start = %free, "frame delayed by busy line");
                free
            }
            _ => requested,
        };

        let mut edges = vec![start];
        let levels = config.frame_levels(data & config.data_mask());
        for (bit, pair) in levels.windows(2).enumerate() {
            if pair[0] != pair[1] {
                edges.push(start + config.offset::<T>((bit + 1) as f64));
            }
        }

        let frame = Signal::from_parts_unchecked(start, start + frame_end, edges, true, config.tscale);
        transmission.signal.append(frame)?;
        transmission.start_times.push(start);
    }

    Ok(transmission)
}

/// Receive state active when a sample fell past the signal end.
#[derive(Debug, Clone, Copy)]
enum RxState {
    Start,
    Data,
    Parity,
    Stop,
}

impl RxState {
    fn end_of_signal(self) -> RxStatus {
        match self {
            RxState::Start => RxStatus::EOS_START,
            RxState::Data => RxStatus::EOS_CHAR,
            RxState::Parity => RxStatus::EOS_PARITY,
            RxState::Stop => RxStatus::EOS_STOP,
        }
    }
}

/// Samples a line signal at bit middles and decodes its frames.
///
/// The receiver idles until a falling edge, checks the start bit in its
/// middle (a high sample is a false start and returns to idle), then samples
/// the data, parity and stop bits. Parity and stop faults are flagged on the
/// character without breaking the framing. If the signal ends inside a
/// frame, the character received so far is emitted with the end-of-signal
/// flag of the state that was active.
///
/// # Errors
///
/// Returns [`SignalError::Config`] for an invalid config.
pub fn serial_rx<T: Time>(signal: &Signal<T>, config: &SerialConfig) -> Result<Reception<T>> {
    config.validate::<T>()?;
    let mut reception = Reception::default();
    let Signal::Bounded(line) = signal else {
        return Ok(reception);
    };

    let edges = line.edges();
    let mut hint = 0;
    let mut next_edge = 0;
    let mut last_sample: Option<T> = None;

    'idle: loop {
        // Idle: the next falling edge after the last sample opens a frame
        let Some(index) = (next_edge..edges.len()).find(|&index| {
            last_sample.is_none_or(|sampled| edges[index] > sampled) && !line.level_after(index + 1)
        }) else {
            break;
        };
        let start = edges[index];
        next_edge = index + 1;
        hint = hint.max(index);

        let mut sample = |bits: f64| -> Option<bool> {
            let time = start + config.offset::<T>(bits);
            last_sample = Some(time);
            if time >= line.end() {
                return None;
            }
            let (level, index) = line.level(time, hint)?;
            hint = index;
            Some(level)
        };

        let mut data = 0u8;
        let mut status = RxStatus::CLEAN;
        let mut state = RxState::Start;
        let mut position = 0.5;

        let completed = 'frame: {
            match sample(position) {
                None => break 'frame false,
                Some(true) => {
                    trace!(at = %start, "false start");
                    continue 'idle;
                }
                Some(false) => {}
            }

            state = RxState::Data;
            for bit in 0..config.bits_per_char {
                position += 1.0;
                match sample(position) {
                    None => break 'frame false,
                    Some(level) => data |= u8::from(level) << bit,
                }
            }

            if let Some(expected) = config.parity.bit(data) {
                state = RxState::Parity;
                position += 1.0;
                match sample(position) {
                    None => break 'frame false,
                    Some(level) if level != expected => status |= RxStatus::PARITY_ERROR,
                    Some(_) => {}
                }
            }

            state = RxState::Stop;
            for _ in 0..config.stop_bits {
                position += 1.0;
                match sample(position) {
                    None => break 'frame false,
                    Some(false) => status |= RxStatus::STOP_ERROR,
                    Some(true) => {}
                }
            }
            true
        };

        if !completed {
            status |= state.end_of_signal();
        }
        if !status.is_clean() {
            debug!(at = %start, data, %status, "serial framing fault");
        }
        reception.push(data, start, status);
        if !completed {
            break;
        }
    }

    Ok(reception)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10 ticks per bit
    fn config(bits: u8, parity: Parity, stop_bits: u8) -> SerialConfig {
        SerialConfig::new(bits, parity, stop_bits, 100.0).tscale(1000.0)
    }

    #[test]
    fn test_parity_bit() {
        assert_eq!(Parity::Off.bit(0b111), None);
        assert_eq!(Parity::Even.bit(0b111), Some(true));
        assert_eq!(Parity::Even.bit(0b11), Some(false));
        assert_eq!(Parity::Odd.bit(0b111), Some(false));
        assert_eq!(Parity::Odd.bit(0), Some(true));
    }

    #[test]
    fn test_config_validation() {
        assert!(config(8, Parity::Even, 2).validate::<i64>().is_ok());
        assert!(config(4, Parity::Off, 1).validate::<i64>().is_err());
        assert!(config(9, Parity::Off, 1).validate::<i64>().is_err());
        assert!(config(8, Parity::Off, 3).validate::<i64>().is_err());
        assert!(SerialConfig::new(8, Parity::Off, 1, 0.0).validate::<i64>().is_err());
        // One tick per bit cannot place the bit middles
        let coarse = SerialConfig::new(8, Parity::Off, 1, 1000.0).tscale(1000.0);
        assert!(coarse.validate::<i64>().is_err());
        assert!(coarse.validate::<f64>().is_ok());
    }

    #[test]
    fn test_frame_bits() {
        assert_eq!(config(8, Parity::Off, 1).frame_bits(), 10);
        assert_eq!(config(7, Parity::Even, 2).frame_bits(), 11);
    }

    #[test]
    fn test_tx_nrz_edges() {
        let tx = serial_tx(&[0x00], &[5_i64], &config(8, Parity::Off, 1)).unwrap();
        assert_eq!(tx.signal, Signal::new(5, 105, vec![5, 95], true).unwrap());

        let tx = serial_tx(&[0xff], &[0_i64], &config(8, Parity::Off, 1)).unwrap();
        assert_eq!(tx.signal, Signal::new(0, 100, vec![0, 10], true).unwrap());
    }

    #[test]
    fn test_tx_parity_and_stop_bits() {
        // 0b1 with odd parity: data has one 1, parity bit 0
        let tx = serial_tx(&[0b0000001], &[0_i64], &config(7, Parity::Odd, 2)).unwrap();
        assert_eq!(
            tx.signal,
            Signal::new(0, 110, vec![0, 10, 20, 90], true).unwrap()
        );
    }

    #[test]
    fn test_tx_backpressure() {
        let tx = serial_tx(b"ab", &[0_i64, 40], &config(8, Parity::Off, 1)).unwrap();
        assert_eq!(tx.start_times, vec![0, 100]);
        assert_eq!(tx.signal.end(), Some(200));
    }

    #[test]
    fn test_tx_idle_gap() {
        let tx = serial_tx(b"ab", &[0_i64, 150], &config(8, Parity::Off, 1)).unwrap();
        assert_eq!(tx.start_times, vec![0, 150]);
        assert_eq!(tx.signal.start(), Some(0));
        assert_eq!(tx.signal.end(), Some(250));
        assert_eq!(tx.signal.level(120, 0), Some((true, 6)));
    }

    #[test]
    fn test_tx_length_mismatch() {
        let result = serial_tx(b"abc", &[0_i64, 200], &config(8, Parity::Off, 1));
        assert_eq!(result, Err(SignalError::LengthMismatch { left: 3, right: 2 }));
    }

    #[test]
    fn test_tx_empty_is_void() {
        let tx = serial_tx::<i64>(&[], &[], &config(8, Parity::Off, 1)).unwrap();
        assert!(tx.signal.is_void());
    }

    #[test]
    fn test_round_trip() {
        let config = config(8, Parity::Even, 1);
        let text = b"Hello, line!";
        let times: Vec<i64> = (0..text.len() as i64).map(|k| k * 137).collect();
        let tx = serial_tx(text, &times, &config).unwrap();
        let rx = serial_rx(&tx.signal, &config).unwrap();
        assert_eq!(rx.chars, text.to_vec());
        assert_eq!(rx.start_times, tx.start_times);
        assert!(rx.is_clean());
    }

    #[test]
    fn test_rx_parity_error() {
        // 0b0000011 with even parity (bit 0), data bit 2 flipped high on the line
        let signal = Signal::new(0, 100, vec![0, 10, 40, 90], true).unwrap();
        let rx = serial_rx(&signal, &config(7, Parity::Even, 1)).unwrap();
        assert_eq!(rx.chars, vec![0b0000111]);
        assert_eq!(rx.status, vec![RxStatus::PARITY_ERROR]);
    }

    #[test]
    fn test_rx_stop_error() {
        // Start bit, eight zero data bits, stop bit held low
        let signal = Signal::new(0, 120, vec![0, 110], true).unwrap();
        let rx = serial_rx(&signal, &config(8, Parity::Off, 1)).unwrap();
        assert_eq!(rx.chars, vec![0]);
        assert_eq!(rx.status, vec![RxStatus::STOP_ERROR]);
    }

    #[test]
    fn test_rx_false_start() {
        // A 3-tick glitch low, then a real frame for 0xff
        let signal = Signal::new(0, 200, vec![10, 13, 50, 60], true).unwrap();
        let rx = serial_rx(&signal, &config(8, Parity::Off, 1)).unwrap();
        assert_eq!(rx.chars, vec![0xff]);
        assert_eq!(rx.start_times, vec![50]);
        assert!(rx.is_clean());
    }

    #[test]
    fn test_rx_end_of_signal_states() {
        let config = config(8, Parity::Odd, 1);
        let tx = serial_tx(&[0b1010_0101], &[0_i64], &config).unwrap();

        let cases = [
            (4, RxStatus::EOS_START),
            (40, RxStatus::EOS_CHAR),
            (93, RxStatus::EOS_PARITY),
            (104, RxStatus::EOS_STOP),
        ];
        for (cut, flag) in cases {
            let (head, _) = tx.signal.split(cut);
            let rx = serial_rx(&head, &config).unwrap();
            assert_eq!(rx.len(), 1, "cut at {cut}");
            assert!(rx.status[0].contains(flag), "cut at {cut}: {}", rx.status[0]);
            assert!(rx.status[0].is_end_of_signal());
        }

        // Cut inside the data bits keeps the bits already sampled
        let (head, _) = tx.signal.split(40);
        let rx = serial_rx(&head, &config).unwrap();
        assert_eq!(rx.chars, vec![0b101]);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RxStatus::CLEAN.to_string(), "ok");
        let status = RxStatus::PARITY_ERROR | RxStatus::EOS_STOP;
        assert_eq!(status.to_string(), "parity|eos-stop");
        assert!(status.contains(RxStatus::EOS_STOP));
        assert!(!status.contains(RxStatus::STOP_ERROR));
    }

    #[test]
    fn test_rx_void() {
        let rx = serial_rx(&Signal::<i64>::Void, &config(8, Parity::Off, 1)).unwrap();
        assert!(rx.is_empty());
    }
}
