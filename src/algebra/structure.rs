//! Structural operations: split, join, chop and streaming.
//!
//! A split at `t` hands an edge lying exactly on `t` to the newer half, where
//! it sits on the domain start. The older half keeps the level that was in
//! force before `t`, so the newer half's start level is always the older
//! half's end level and the halves join back into the original signal.

use tracing::{debug, trace};

use crate::error::{Result, SignalError};
use crate::signals::{Bounded, Signal};
use crate::time::{Time, earlier, later, steps_covering};

impl<T: Time> Bounded<T> {
    /// The part of the signal over `[lo, hi)`, for `start <= lo < hi <= end`.
    ///
    /// An edge at `lo` is kept; an edge at `hi` is left to the next slice,
    /// unless `hi` is the domain end.
    fn slice(&self, lo: T, hi: T) -> Signal<T> {
        let first = self.edges_before(lo);
        let last = if hi < self.end {
            self.edges_before(hi)
        } else {
            self.edges.len()
        };
        Signal::from_parts_unchecked(
            lo,
            hi,
            self.edges[first..last].to_vec(),
            self.level_after(first),
            self.tscale,
        )
    }
}

impl<T: Time> Signal<T> {
    /// Splits the signal at `t` into `(older, newer)` spanning `[start, t)`
    /// and `[t, end)`.
    ///
    /// If `t` does not fall strictly inside the domain, the whole signal goes
    /// to one side and the other side is `Void`.
    ///
    /// # Examples
    ///
    /// ```
    /// use binsig::Signal;
    ///
    /// let signal = Signal::new(0, 10, vec![2, 5, 8], false).unwrap();
    /// let (older, newer) = signal.split(5);
    /// assert_eq!(older, Signal::new(0, 5, vec![2], false).unwrap());
    /// assert_eq!(newer, Signal::new(5, 10, vec![5, 8], true).unwrap());
    /// assert_eq!(older.join(&newer).unwrap(), signal);
    /// ```
    pub fn split(&self, t: T) -> (Signal<T>, Signal<T>) {
        let Signal::Bounded(bounded) = self else {
            return (Signal::Void, Signal::Void);
        };
        if t <= bounded.start {
            return (Signal::Void, self.clone());
        }
        if t >= bounded.end {
            return (self.clone(), Signal::Void);
        }

        (
            bounded.slice(bounded.start, t),
            bounded.slice(t, bounded.end),
        )
    }

    /// Splits in place: `self` keeps `[start, t)` and the returned signal
    /// holds `[t, end)`. See [`Signal::split`].
    pub fn split_off(&mut self, t: T) -> Signal<T> {
        let (older, newer) = self.split(t);
        *self = older;
        newer
    }

    /// Concatenates `self` and `other` into one signal over
    /// `[self.start, other.end)`.
    ///
    /// A gap between the domains is allowed: the level carries across it.
    /// `Void` on either side is the identity.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::DomainMismatch`] if the domains overlap or the
    /// end level of `self` differs from the start level of `other`.
    pub fn join(&self, other: &Signal<T>) -> Result<Signal<T>> {
        let mut joined = self.clone();
        joined.append(other.clone())?;
        Ok(joined)
    }

    /// Joins `other` onto the end of `self` in place. See [`Signal::join`].
    ///
    /// On error `self` is left unchanged.
    pub fn append(&mut self, other: Signal<T>) -> Result<()> {
        if other.is_void() {
            return Ok(());
        }
        if self.is_void() {
            *self = other;
            return Ok(());
        }
        let (Signal::Bounded(head), Signal::Bounded(tail)) = (&mut *self, other) else {
            return Ok(());
        };

        if head.end > tail.start {
            debug!(head_end = %head.end, tail_start = %tail.start, "join rejected: overlapping domains");
            return Err(SignalError::DomainMismatch(format!(
                "first signal ends at {} after second starts at {}",
                head.end, tail.start
            )));
        }
        if head.end_level() != tail.slevel {
            debug!(at = %head.end, "join rejected: level mismatch");
            return Err(SignalError::DomainMismatch(format!(
                "end level {} does not match start level {}",
                u8::from(head.end_level()),
                u8::from(tail.slevel)
            )));
        }

        let mut edges = tail.edges.into_iter().peekable();
        // Two edges on the seam undo each other
        if head.edges.last() == Some(&head.end) && edges.peek() == Some(&tail.start) {
            head.edges.pop();
            edges.next();
        }
        head.edges.extend(edges);
        head.end = tail.end;
        Ok(())
    }

    /// Cuts the signal into consecutive pieces of length `period`, the first
    /// one starting at `origin`.
    ///
    /// An `origin` before the domain start is advanced by whole periods until
    /// it lies inside the domain. Anything before `origin` is not part of any
    /// piece. The last piece ends at the domain end and may be shorter.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Config`] if `period` is not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use binsig::Signal;
    ///
    /// let signal = Signal::new(0, 10, vec![3, 4, 7], false).unwrap();
    /// let pieces = signal.chop(4, -2).unwrap();
    /// assert_eq!(pieces.len(), 2);
    /// assert_eq!(pieces[0], Signal::new(2, 6, vec![3, 4], false).unwrap());
    /// assert_eq!(pieces[1], Signal::new(6, 10, vec![7], false).unwrap());
    /// ```
    pub fn chop(&self, period: T, origin: T) -> Result<Vec<Signal<T>>> {
        if !(period > T::ZERO) {
            return Err(SignalError::Config(format!(
                "chop period {period} must be positive"
            )));
        }
        let Signal::Bounded(bounded) = self else {
            return Ok(Vec::new());
        };

        // Boundaries are origin + k * period, never accumulated
        let mut k = if origin < bounded.start {
            steps_covering(bounded.start - origin, period)
        } else {
            0
        };
        let mut lo = later(origin + period.times(k), bounded.start);

        let mut pieces = Vec::new();
        while lo < bounded.end {
            k += 1;
            let hi = earlier(origin + period.times(k), bounded.end);
            if hi > lo {
                pieces.push(bounded.slice(lo, hi));
            }
            lo = hi;
        }
        trace!(pieces = pieces.len(), "chopped signal");
        Ok(pieces)
    }

    /// Appends `other` and trims the history to at most `max_elapse`.
    ///
    /// When the joined signal is longer than `max_elapse`, a prefix whose
    /// length is the excess rounded up to a multiple of `buf_step` is split
    /// off. If that rounding would reach the end of the signal, only the
    /// excess itself is discarded, so the newest `max_elapse` of history is
    /// always kept. Returns `(discarded, kept)`; `discarded` is `Void` when
    /// nothing was trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Config`] if `max_elapse` or `buf_step` is not
    /// positive, and the [`Signal::join`] errors.
    pub fn stream(
        &self,
        other: &Signal<T>,
        max_elapse: T,
        buf_step: T,
    ) -> Result<(Signal<T>, Signal<T>)> {
        let mut kept = self.clone();
        let discarded = kept.stream_in_place(other.clone(), max_elapse, buf_step)?;
        Ok((discarded, kept))
    }

    /// In-place [`Signal::stream`]: `self` becomes the kept signal and the
    /// discarded prefix is returned.
    pub fn stream_in_place(
        &mut self,
        other: Signal<T>,
        max_elapse: T,
        buf_step: T,
    ) -> Result<Signal<T>> {
        if !(max_elapse > T::ZERO) || !(buf_step > T::ZERO) {
            return Err(SignalError::Config(format!(
                "stream bounds must be positive (max elapse {max_elapse}, step {buf_step})"
            )));
        }
        self.append(other)?;

        let (Some(start), Some(elapse)) = (self.start(), self.elapse()) else {
            return Ok(Signal::Void);
        };
        if elapse <= max_elapse {
            return Ok(Signal::Void);
        }

        let excess = elapse - max_elapse;
        let mut cut = start + buf_step.times(steps_covering(excess, buf_step));
        if Some(cut) >= self.end() {
            debug!(%buf_step, %elapse, "stream step exceeds history, trimming the excess only");
            cut = start + excess;
        }
        let kept = self.split_off(cut);
        Ok(std::mem::replace(self, kept))
    }
}
