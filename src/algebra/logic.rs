//! Boolean algebra over signals with independent time domains.
//!
//! Every binary operator works on the intersection of the operand domains and
//! walks both edge lists once, in time order, like the merge step of a merge
//! sort. XOR skips the level bookkeeping entirely: simultaneous transitions
//! cancel and every other transition passes through.

use std::ops::{BitAnd, BitOr, BitXor, Not};

use super::intersect::Intersection;
use crate::signals::Signal;
use crate::time::Time;

/// The logic functions the merge engine evaluates.
///
/// `Not` ignores its right operand: combining with `Not` yields the
/// complement of the left operand clipped to the common domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    And,
    Or,
    Xor,
    Not,
}

impl LogicOp {
    /// Evaluates the operator on two input levels.
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            LogicOp::And => a && b,
            LogicOp::Or => a || b,
            LogicOp::Xor => a ^ b,
            LogicOp::Not => !a,
        }
    }

    /// Whether the output follows `b` while `a` is held fixed.
    fn follows_b(self, a: bool) -> bool {
        self.apply(a, false) != self.apply(a, true)
    }

    /// Whether the output follows `a` while `b` is held fixed.
    fn follows_a(self, b: bool) -> bool {
        self.apply(false, b) != self.apply(true, b)
    }
}

impl<T: Time> Signal<T> {
    /// Combines two signals with a logic operator.
    ///
    /// The result spans the intersection of both domains and carries the
    /// time scale of `self`. It is `Void` when either operand is void or the
    /// domains do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use binsig::{LogicOp, Signal};
    ///
    /// let base = Signal::new(0, 6, vec![2, 3, 4], false).unwrap();
    /// let anded = base.combine(&base.shifted(2), LogicOp::And);
    /// assert_eq!(anded, Signal::new(2, 6, vec![4, 5], false).unwrap());
    /// ```
    pub fn combine(&self, other: &Signal<T>, op: LogicOp) -> Signal<T> {
        let (Signal::Bounded(a), Signal::Bounded(b)) = (self, other) else {
            return Signal::Void;
        };
        let Some(x) = Intersection::of(a, b) else {
            return Signal::Void;
        };

        let edges_a = &a.edges()[x.a.edges.clone()];
        let edges_b = &b.edges()[x.b.edges.clone()];
        let (edges, slevel) = match op {
            LogicOp::Xor => (xor_edges(edges_a, edges_b), x.a.level ^ x.b.level),
            _ => merge_edges(edges_a, edges_b, x.a.level, x.b.level, op),
        };

        Signal::from_parts_unchecked(x.start, x.end, edges, slevel, a.tscale())
    }
}

/// Walks both edge lists in time order and emits an edge wherever the
/// operator output changes. Returns the output edges and start level.
fn merge_edges<T: Time>(
    edges_a: &[T],
    edges_b: &[T],
    level_a: bool,
    level_b: bool,
    op: LogicOp,
) -> (Vec<T>, bool) {
    let slevel = op.apply(level_a, level_b);

    // A constant operand that pins the output leaves nothing to merge
    if (edges_a.is_empty() && !op.follows_b(level_a))
        || (edges_b.is_empty() && !op.follows_a(level_b))
    {
        return (Vec::new(), slevel);
    }

    let mut edges = Vec::with_capacity(edges_a.len() + edges_b.len());
    let (mut in_a, mut in_b, mut out) = (level_a, level_b, slevel);
    let (mut i, mut j) = (0, 0);

    while i < edges_a.len() && j < edges_b.len() {
        let time = if edges_a[i] < edges_b[j] {
            in_a = !in_a;
            i += 1;
            edges_a[i - 1]
        } else if edges_b[j] < edges_a[i] {
            in_b = !in_b;
            j += 1;
            edges_b[j - 1]
        } else {
            // Simultaneous transitions are one step
            in_a = !in_a;
            in_b = !in_b;
            i += 1;
            j += 1;
            edges_a[i - 1]
        };

        if op.apply(in_a, in_b) != out {
            edges.push(time);
            out = !out;
        }
    }

    // One list is exhausted: the other passes through only if the output
    // still follows it with the exhausted input frozen
    if i < edges_a.len() && op.follows_a(in_b) {
        edges.extend_from_slice(&edges_a[i..]);
    } else if j < edges_b.len() && op.follows_b(in_a) {
        edges.extend_from_slice(&edges_b[j..]);
    }

    (edges, slevel)
}

/// Symmetric union of two ascending edge lists, dropping coincident pairs.
fn xor_edges<T: Time>(edges_a: &[T], edges_b: &[T]) -> Vec<T> {
    let mut edges = Vec::with_capacity(edges_a.len() + edges_b.len());
    let (mut i, mut j) = (0, 0);

    while i < edges_a.len() && j < edges_b.len() {
        if edges_a[i] < edges_b[j] {
            edges.push(edges_a[i]);
            i += 1;
        } else if edges_b[j] < edges_a[i] {
            edges.push(edges_b[j]);
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }
    edges.extend_from_slice(&edges_a[i..]);
    edges.extend_from_slice(&edges_b[j..]);

    edges
}

macro_rules! impl_logic_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<T: Time> $trait<&Signal<T>> for &Signal<T> {
            type Output = Signal<T>;

            fn $method(self, rhs: &Signal<T>) -> Signal<T> {
                self.combine(rhs, $op)
            }
        }

        impl<T: Time> $trait<Signal<T>> for Signal<T> {
            type Output = Signal<T>;

            fn $method(self, rhs: Signal<T>) -> Signal<T> {
                self.combine(&rhs, $op)
            }
        }

        impl<T: Time> $trait<&Signal<T>> for Signal<T> {
            type Output = Signal<T>;

            fn $method(self, rhs: &Signal<T>) -> Signal<T> {
                self.combine(rhs, $op)
            }
        }

        impl<T: Time> $trait<Signal<T>> for &Signal<T> {
            type Output = Signal<T>;

            fn $method(self, rhs: Signal<T>) -> Signal<T> {
                self.combine(&rhs, $op)
            }
        }
    };
}

impl_logic_operator!(BitAnd, bitand, LogicOp::And);
impl_logic_operator!(BitOr, bitor, LogicOp::Or);
impl_logic_operator!(BitXor, bitxor, LogicOp::Xor);

impl<T: Time> Not for Signal<T> {
    type Output = Signal<T>;

    /// Complement: same domain and edges, inverted start level.
    fn not(mut self) -> Signal<T> {
        self.invert();
        self
    }
}

impl<T: Time> Not for &Signal<T> {
    type Output = Signal<T>;

    fn not(self) -> Signal<T> {
        !self.clone()
    }
}
