//! Overlap of two signal domains.

use std::ops::Range;

use crate::signals::{Bounded, Signal};
use crate::time::{Time, earlier, later};

/// One operand's view of an intersection window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Indices of the operand's edges strictly inside the window
    pub edges: Range<usize>,
    /// Operand level at the window start, after any edge at or before it
    pub level: bool,
}

impl Window {
    fn clip<T: Time>(signal: &Bounded<T>, start: T, end: T) -> Self {
        let first = signal.edges_through(start);
        let last = signal.edges_before(end);
        Self {
            edges: first..last,
            level: signal.level_after(first),
        }
    }
}

/// The common domain `[start, end)` of two signals and where each operand's
/// edges fall inside it.
///
/// This is the pretest shared by every binary operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection<T: Time> {
    pub start: T,
    pub end: T,
    pub a: Window,
    pub b: Window,
}

impl<T: Time> Intersection<T> {
    /// Computes the overlap of two bounded signals, `None` when the domains
    /// do not overlap (touching domains do not overlap).
    pub fn of(a: &Bounded<T>, b: &Bounded<T>) -> Option<Self> {
        let start = later(a.start(), b.start());
        let end = earlier(a.end(), b.end());
        if !(start < end) {
            return None;
        }

        Some(Self {
            start,
            end,
            a: Window::clip(a, start, end),
            b: Window::clip(b, start, end),
        })
    }
}

impl<T: Time> Signal<T> {
    /// Intersection parameters of `self` (operand `a`) and `other`
    /// (operand `b`); `None` if either is void or they do not overlap.
    pub fn intersect(&self, other: &Signal<T>) -> Option<Intersection<T>> {
        Intersection::of(self.as_bounded()?, other.as_bounded()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Signal {
        Signal::new(0, 6, vec![2, 3, 4], false).unwrap()
    }

    fn window(edges: Range<usize>, level: bool) -> Window {
        Window { edges, level }
    }

    #[test]
    fn test_self_intersection() {
        let x = base().intersect(&base()).unwrap();
        assert_eq!((x.start, x.end), (0, 6));
        assert_eq!(x.a, window(0..3, false));
        assert_eq!(x.b, window(0..3, false));
    }

    #[test]
    fn test_shifted_intersections() {
        let x = base().intersect(&base().shifted(1)).unwrap();
        assert_eq!((x.start, x.end), (1, 6));
        assert_eq!(x.a, window(0..3, false));
        assert_eq!(x.b, window(0..3, false));

        // Edge at the window start is folded into the start level
        let x = base().intersect(&base().shifted(2)).unwrap();
        assert_eq!((x.start, x.end), (2, 6));
        assert_eq!(x.a, window(1..3, true));
        // Edge at the window end is excluded
        assert_eq!(x.b, window(0..2, false));

        let x = base().intersect(&base().shifted(3)).unwrap();
        assert_eq!((x.start, x.end), (3, 6));
        assert_eq!(x.a, window(2..3, false));
        assert_eq!(x.b, window(0..1, false));

        let x = base().intersect(&base().shifted(4)).unwrap();
        assert_eq!((x.start, x.end), (4, 6));
        assert_eq!(x.a, window(3..3, true));
        assert_eq!(x.b, window(0..0, false));

        let x = base().intersect(&base().shifted(5)).unwrap();
        assert_eq!((x.start, x.end), (5, 6));
        assert_eq!(x.a, window(3..3, true));
        assert_eq!(x.b, window(0..0, false));
    }

    #[test]
    fn test_no_intersection() {
        assert!(base().intersect(&base().shifted(6)).is_none());
        assert!(base().intersect(&base().shifted(7)).is_none());
        assert!(base().intersect(&base().shifted(-6)).is_none());
        assert!(base().intersect(&Signal::Void).is_none());
    }

    #[test]
    fn test_all_edges_outside_window() {
        let early = Signal::new(0, 100, vec![1, 2, 3], true).unwrap();
        let late = Signal::constant(50, 60, false).unwrap();
        let x = early.intersect(&late).unwrap();
        assert_eq!(x.a, window(3..3, false));
        assert_eq!(x.b, window(0..0, false));
    }
}
