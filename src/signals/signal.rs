//! The binary timed signal value type.
//!
//! A signal is stored as the instants at which its level changes, between a
//! start and an end time. Levels are right-continuous: an edge at time `t`
//! is in effect from `t` on.

use std::fmt;

use crate::error::{Result, SignalError};
use crate::time::Time;

/// Time scale assigned to signals built without an explicit one (1 unit = 1 s).
pub const DEFAULT_TSCALE: f64 = 1.0;

/// The timing data of a non-void signal.
///
/// Invariants (checked by [`Signal::new`]):
/// - `start < end`
/// - `edges` strictly ascending
/// - `start <= edges[0]` and `edges[last] <= end`
#[derive(Debug, Clone)]
pub struct Bounded<T: Time> {
    pub(crate) start: T,
    pub(crate) end: T,
    pub(crate) edges: Vec<T>,
    pub(crate) slevel: bool,
    pub(crate) tscale: f64,
}

impl<T: Time> Bounded<T> {
    /// Domain start time.
    pub fn start(&self) -> T {
        self.start
    }

    /// Domain end time.
    pub fn end(&self) -> T {
        self.end
    }

    /// Level change instants, ascending.
    pub fn edges(&self) -> &[T] {
        &self.edges
    }

    /// Level in force right after `start`, before the first edge.
    pub fn slevel(&self) -> bool {
        self.slevel
    }

    /// Units per second of the time axis.
    pub fn tscale(&self) -> f64 {
        self.tscale
    }

    /// Level at the domain end: an even number of edges returns to `slevel`.
    pub fn end_level(&self) -> bool {
        self.level_after(self.edges.len())
    }

    /// Domain length.
    pub fn elapse(&self) -> T {
        self.end - self.start
    }

    /// Level after the first `count` edges have taken effect.
    pub(crate) fn level_after(&self, count: usize) -> bool {
        self.slevel ^ (count % 2 == 1)
    }

    /// Number of edges at or before `time`.
    pub(crate) fn edges_through(&self, time: T) -> usize {
        self.edges.partition_point(|&edge| edge <= time)
    }

    /// Number of edges strictly before `time`.
    pub(crate) fn edges_before(&self, time: T) -> usize {
        self.edges.partition_point(|&edge| edge < time)
    }

    /// See [`Signal::level`].
    pub fn level(&self, time: T, hint: usize) -> Option<(bool, usize)> {
        if time < self.start || time > self.end {
            return None;
        }

        // The hint is only a starting point: walk back if it overshoots
        let mut index = hint.min(self.edges.len());
        while index > 0 && self.edges[index - 1] > time {
            index -= 1;
        }
        while index < self.edges.len() && self.edges[index] <= time {
            index += 1;
        }

        Some((self.level_after(index), index))
    }
}

impl<T: Time> PartialEq for Bounded<T> {
    fn eq(&self, other: &Self) -> bool {
        // tscale is carried, not compared
        self.start == other.start
            && self.end == other.end
            && self.slevel == other.slevel
            && self.edges == other.edges
    }
}

/// A binary (0/1) waveform over a continuous time domain.
///
/// `Void` is the signal with no domain at all. It is a regular value, not an
/// error: every logic operator returns `Void` when given a `Void` operand or
/// operands whose domains do not overlap.
///
/// # Examples
///
/// ```
/// use binsig::Signal;
///
/// // Low until 2, high until 3, low until 4, high until 6
/// let base = Signal::new(0, 6, vec![2, 3, 4], false).unwrap();
/// assert_eq!(base.level(2, 0), Some((true, 1)));
/// assert_eq!(base.end_level(), Some(true));
/// assert_eq!(base.elapse(), Some(6));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Signal<T: Time = i64> {
    /// No domain defined
    Void,
    /// A signal over `[start, end)`
    Bounded(Bounded<T>),
}

impl<T: Time> Default for Signal<T> {
    fn default() -> Self {
        Signal::Void
    }
}

impl<T: Time> Signal<T> {
    /// Creates a signal, validating its timing.
    ///
    /// # Arguments
    ///
    /// * `start` - Domain start time
    /// * `end` - Domain end time, must be greater than `start`
    /// * `edges` - Strictly ascending level change times within `[start, end]`
    /// * `slevel` - Level before the first edge
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Validation`] on malformed timing. Nothing is
    /// repaired silently.
    pub fn new(start: T, end: T, edges: Vec<T>, slevel: bool) -> Result<Self> {
        if !(start < end) {
            return Err(SignalError::Validation(format!(
                "start {start} must precede end {end}"
            )));
        }
        if let Some(pair) = edges.windows(2).find(|pair| !(pair[0] < pair[1])) {
            return Err(SignalError::Validation(format!(
                "edges not strictly ascending at {} -> {}",
                pair[0], pair[1]
            )));
        }
        if let (Some(&first), Some(&last)) = (edges.first(), edges.last()) {
            if !(start <= first) || !(last <= end) {
                return Err(SignalError::Validation(format!(
                    "edges [{first}, {last}] outside domain [{start}, {end}]"
                )));
            }
        }

        Ok(Self::from_parts_unchecked(
            start,
            end,
            edges,
            slevel,
            DEFAULT_TSCALE,
        ))
    }

    /// Creates a signal holding `level` over the whole domain.
    pub fn constant(start: T, end: T, level: bool) -> Result<Self> {
        Self::new(start, end, Vec::new(), level)
    }

    /// Builds a signal from parts already known to satisfy the invariants.
    #[doc(hidden)]
    pub fn from_parts_unchecked(start: T, end: T, edges: Vec<T>, slevel: bool, tscale: f64) -> Self {
        debug_assert!(start < end);
        debug_assert!(edges.windows(2).all(|pair| pair[0] < pair[1]));
        Signal::Bounded(Bounded {
            start,
            end,
            edges,
            slevel,
            tscale,
        })
    }

    /// Sets the time scale (units per second). No effect on `Void`.
    pub fn with_tscale(mut self, tscale: f64) -> Self {
        if let Signal::Bounded(bounded) = &mut self {
            bounded.tscale = tscale;
        }
        self
    }

    /// True when no domain is defined.
    pub fn is_void(&self) -> bool {
        matches!(self, Signal::Void)
    }

    /// The timing data, if any.
    pub fn as_bounded(&self) -> Option<&Bounded<T>> {
        match self {
            Signal::Void => None,
            Signal::Bounded(bounded) => Some(bounded),
        }
    }

    pub fn start(&self) -> Option<T> {
        self.as_bounded().map(Bounded::start)
    }

    pub fn end(&self) -> Option<T> {
        self.as_bounded().map(Bounded::end)
    }

    /// Level change instants; empty for `Void`.
    pub fn edges(&self) -> &[T] {
        match self {
            Signal::Void => &[],
            Signal::Bounded(bounded) => &bounded.edges,
        }
    }

    pub fn slevel(&self) -> Option<bool> {
        self.as_bounded().map(Bounded::slevel)
    }

    pub fn end_level(&self) -> Option<bool> {
        self.as_bounded().map(Bounded::end_level)
    }

    pub fn tscale(&self) -> Option<f64> {
        self.as_bounded().map(Bounded::tscale)
    }

    /// `end - start`, or `None` for `Void`.
    pub fn elapse(&self) -> Option<T> {
        self.as_bounded().map(Bounded::elapse)
    }

    /// Looks up the level active at `time`.
    ///
    /// Returns the level and the number of edges at or before `time`. Levels
    /// are right-continuous, so an edge lying exactly on `time` is already in
    /// force and is counted; the index is therefore one past the edge that set
    /// the returned level, not the count of edges strictly before `time`. The
    /// scan starts from `hint`; passing back the returned index on calls with
    /// nondecreasing times makes a full sweep linear in the edge count.
    ///
    /// Returns `None` for `Void` and for times outside `[start, end]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use binsig::Signal;
    ///
    /// let signal = Signal::new(0, 10, vec![3, 7], false).unwrap();
    /// let mut hint = 0;
    /// let mut levels = Vec::new();
    /// for t in [1, 3, 5, 8] {
    ///     let (level, index) = signal.level(t, hint).unwrap();
    ///     levels.push(level);
    ///     hint = index;
    /// }
    /// assert_eq!(levels, vec![false, true, true, false]);
    /// assert_eq!(signal.level(11, hint), None);
    /// ```
    pub fn level(&self, time: T, hint: usize) -> Option<(bool, usize)> {
        self.as_bounded()?.level(time, hint)
    }

    /// Step-function samples `(time, level)` for plotting: the start, one
    /// point per edge and the end.
    pub fn steps(&self) -> Vec<(T, bool)> {
        let Signal::Bounded(bounded) = self else {
            return Vec::new();
        };

        let mut steps = Vec::with_capacity(bounded.edges.len() + 2);
        steps.push((bounded.start, bounded.slevel));
        for (index, &edge) in bounded.edges.iter().enumerate() {
            steps.push((edge, bounded.level_after(index + 1)));
        }
        steps.push((bounded.end, bounded.end_level()));
        steps
    }

    /// Adds `offset` to the start, the end and every edge.
    pub fn shift(&mut self, offset: T) {
        if let Signal::Bounded(bounded) = self {
            bounded.start = bounded.start + offset;
            bounded.end = bounded.end + offset;
            for edge in &mut bounded.edges {
                *edge = *edge + offset;
            }
        }
    }

    /// Shifted copy, see [`Signal::shift`].
    pub fn shifted(&self, offset: T) -> Self {
        let mut signal = self.clone();
        signal.shift(offset);
        signal
    }

    /// Mirrors the signal in time about the middle of its domain.
    ///
    /// Intervals between edges are preserved in reverse order. With an odd
    /// number of edges the start level flips, since the old end level becomes
    /// the new start level.
    pub fn reverse(&mut self) {
        if let Signal::Bounded(bounded) = self {
            let pivot = bounded.start + bounded.end;
            bounded.slevel = bounded.end_level();
            bounded.edges.reverse();
            for edge in &mut bounded.edges {
                *edge = pivot - *edge;
            }
        }
    }

    /// Reversed copy, see [`Signal::reverse`].
    pub fn reversed(&self) -> Self {
        let mut signal = self.clone();
        signal.reverse();
        signal
    }

    /// Inverts the signal level in place.
    pub fn invert(&mut self) {
        if let Signal::Bounded(bounded) = self {
            bounded.slevel = !bounded.slevel;
        }
    }
}

impl<T: Time> fmt::Display for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Void => write!(f, "void signal"),
            Signal::Bounded(bounded) => {
                writeln!(f, "signal [{}, {})", bounded.start, bounded.end)?;
                writeln!(f, "  edges: {:?}", bounded.edges)?;
                writeln!(f, "  start level: {}", u8::from(bounded.slevel))?;
                write!(f, "  time scale: {}", bounded.tscale)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Signal {
        Signal::new(0, 6, vec![2, 3, 4], false).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_domain() {
        assert!(matches!(
            Signal::<i64>::new(5, 5, vec![], false),
            Err(SignalError::Validation(_))
        ));
        assert!(Signal::<i64>::new(6, 0, vec![], false).is_err());
    }

    #[test]
    fn test_new_rejects_unordered_edges() {
        assert!(Signal::new(0, 10, vec![2, 2], false).is_err());
        assert!(Signal::new(0, 10, vec![4, 3], false).is_err());
    }

    #[test]
    fn test_new_rejects_edges_outside_domain() {
        assert!(Signal::new(0, 10, vec![-1, 3], false).is_err());
        assert!(Signal::new(0, 10, vec![3, 11], false).is_err());
        // Bounds themselves are allowed
        assert!(Signal::new(0, 10, vec![0, 10], false).is_ok());
    }

    #[test]
    fn test_new_rejects_nan() {
        assert!(Signal::new(0.0, f64::NAN, vec![], false).is_err());
        assert!(Signal::new(0.0, 1.0, vec![f64::NAN], false).is_err());
    }

    #[test]
    fn test_void_accessors() {
        let void = Signal::<i64>::default();
        assert!(void.is_void());
        assert_eq!(void.start(), None);
        assert_eq!(void.elapse(), None);
        assert_eq!(void.edges(), &[] as &[i64]);
        assert_eq!(void.level(0, 0), None);
        assert!(void.steps().is_empty());
    }

    #[test]
    fn test_end_level() {
        assert_eq!(base().end_level(), Some(true));
        let even = Signal::new(0, 6, vec![2, 3], false).unwrap();
        assert_eq!(even.end_level(), Some(false));
    }

    #[test]
    fn test_level_lookup() {
        let signal = base();
        assert_eq!(signal.level(0, 0), Some((false, 0)));
        assert_eq!(signal.level(1, 0), Some((false, 0)));
        // An edge takes effect at its own instant
        assert_eq!(signal.level(2, 0), Some((true, 1)));
        assert_eq!(signal.level(3, 1), Some((false, 2)));
        assert_eq!(signal.level(5, 2), Some((true, 3)));
        assert_eq!(signal.level(6, 3), Some((true, 3)));
        assert_eq!(signal.level(7, 3), None);
        assert_eq!(signal.level(-1, 0), None);
    }

    #[test]
    fn test_level_with_overshooting_hint() {
        let signal = base();
        assert_eq!(signal.level(1, 3), Some((false, 0)));
        assert_eq!(signal.level(3, 99), Some((false, 2)));
    }

    #[test]
    fn test_equality_ignores_tscale() {
        assert_eq!(base(), base().with_tscale(1000.0));
        assert_ne!(base(), Signal::new(0, 6, vec![2, 3, 4], true).unwrap());
        assert_eq!(Signal::<i64>::Void, Signal::Void);
    }

    #[test]
    fn test_shift() {
        let mut signal = base();
        signal.shift(13);
        assert_eq!(signal, Signal::new(13, 19, vec![15, 16, 17], false).unwrap());
        signal.shift(-23);
        signal.shift(10);
        assert_eq!(signal, base());
    }

    #[test]
    fn test_reverse() {
        let reversed = base().reversed();
        assert_eq!(reversed, Signal::new(0, 6, vec![2, 3, 4], true).unwrap());

        let asymmetric = Signal::new(10, 20, vec![11, 15], true).unwrap();
        assert_eq!(
            asymmetric.reversed(),
            Signal::new(10, 20, vec![15, 19], true).unwrap()
        );
        assert_eq!(asymmetric.reversed().reversed(), asymmetric);
    }

    #[test]
    fn test_invert() {
        let mut signal = base();
        signal.invert();
        assert_eq!(signal.slevel(), Some(true));
        assert_eq!(signal.edges(), &[2, 3, 4]);
    }

    #[test]
    fn test_steps() {
        assert_eq!(
            base().steps(),
            vec![(0, false), (2, true), (3, false), (4, true), (6, true)]
        );
    }

    #[test]
    fn test_display() {
        let text = base().to_string();
        assert!(text.contains("signal [0, 6)"));
        assert!(text.contains("edges: [2, 3, 4]"));
        assert_eq!(Signal::<i64>::Void.to_string(), "void signal");
    }
}
