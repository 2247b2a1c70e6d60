//! Gaussian timing jitter on signal edges.

use rand::Rng;
use rand_distr::Distribution;

use super::pulses::normal;
use crate::error::Result;
use crate::signals::Signal;
use crate::time::Time;

impl<T: Time> Signal<T> {
    /// Moves every edge by a zero-mean Gaussian offset with deviation
    /// `stddev`; the domain is unchanged.
    ///
    /// An edge keeps its position when its move would reach or pass the
    /// previous edge, the next edge or a domain bound, so the edge order and
    /// count are preserved. Edges are processed in order, each one checked
    /// against its already moved predecessor.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Config`](crate::SignalError::Config) for a
    /// negative or NaN `stddev`.
    ///
    /// # Examples
    ///
    /// ```
    /// use binsig::Signal;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    /// let mut signal = Signal::new(0, 100, vec![20, 40, 60, 80], false).unwrap();
    /// signal.jitter(2.0, &mut rng).unwrap();
    /// assert_eq!(signal.edges().len(), 4);
    /// assert_eq!(signal.elapse(), Some(100));
    /// ```
    pub fn jitter<R: Rng + ?Sized>(&mut self, stddev: f64, rng: &mut R) -> Result<()> {
        let offsets = normal(0.0, stddev)?;
        let Signal::Bounded(bounded) = self else {
            return Ok(());
        };

        let mut previous = bounded.start;
        for index in 0..bounded.edges.len() {
            let next = bounded.edges.get(index + 1).copied().unwrap_or(bounded.end);
            let moved = bounded.edges[index] + T::from_f64(offsets.sample(rng));
            if previous < moved && moved < next {
                bounded.edges[index] = moved;
            }
            previous = bounded.edges[index];
        }
        Ok(())
    }

    /// Jittered copy, see [`Signal::jitter`].
    pub fn jittered<R: Rng + ?Sized>(&self, stddev: f64, rng: &mut R) -> Result<Signal<T>> {
        let mut signal = self.clone();
        signal.jitter(stddev, rng)?;
        Ok(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zero_stddev_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let signal = Signal::new(0, 10, vec![2, 5, 7], true).unwrap();
        assert_eq!(signal.jittered(0.0, &mut rng).unwrap(), signal);
    }

    #[test]
    fn test_order_preserved_under_heavy_jitter() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut signal = Signal::new(0, 50, (1..50).collect(), false).unwrap();
        for _ in 0..20 {
            signal.jitter(5.0, &mut rng).unwrap();
        }
        let edges = signal.edges();
        assert_eq!(edges.len(), 49);
        assert!(edges.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(edges.iter().all(|&edge| edge > 0 && edge < 50));
    }

    #[test]
    fn test_edges_move() {
        let mut rng = StdRng::seed_from_u64(5);
        let signal = Signal::new(0.0, 1000.0, vec![100.0, 500.0, 900.0], false).unwrap();
        let jittered = signal.jittered(10.0, &mut rng).unwrap();
        assert_ne!(jittered, signal);
        assert_eq!(jittered.start(), Some(0.0));
        assert_eq!(jittered.slevel(), Some(false));
    }

    #[test]
    fn test_rejects_negative_stddev() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut signal = Signal::new(0, 10, vec![5], false).unwrap();
        assert!(signal.jitter(-1.0, &mut rng).is_err());
    }

    #[test]
    fn test_void_is_untouched() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut void = Signal::<i64>::Void;
        void.jitter(1.0, &mut rng).unwrap();
        assert!(void.is_void());
    }
}
