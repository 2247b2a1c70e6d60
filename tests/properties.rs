use binsig::{CorrelationConfig, NoiseConfig, PulseNoise, Signal, correlation, sample_signal};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn noise(seed: u64) -> PulseNoise<StdRng> {
    let config = NoiseConfig::new(0.08, 3.0, 4.0, 2.0);
    PulseNoise::with_rng(config, StdRng::seed_from_u64(seed)).unwrap()
}

/// Pairs of overlapping noise signals with unrelated edges.
fn noise_pairs(count: u64) -> Vec<(Signal, Signal)> {
    (0..count)
        .map(|seed| {
            let mut gen_a = noise(seed);
            let mut gen_b = noise(seed + 1000);
            let a = gen_a.generate(0, 600).unwrap();
            let b = gen_b.generate(seed as i64 * 7 - 100, 500).unwrap();
            (a, b)
        })
        .collect()
}

#[test]
fn test_double_negation() {
    for (a, _) in noise_pairs(20) {
        assert_eq!(!!a.clone(), a);
    }
    assert_eq!(!!Signal::<i64>::Void, Signal::Void);
}

#[test]
fn test_xor_from_and_or_not() {
    for (a, b) in noise_pairs(50) {
        let xor = &a ^ &b;
        let expanded = (&a & &!&b) | (&!&a & &b);
        assert_eq!(xor, expanded);
    }
}

#[test]
fn test_de_morgan() {
    for (a, b) in noise_pairs(50) {
        assert_eq!(!(&a & &b), &!&a | &!&b);
        assert_eq!(!(&a | &b), &!&a & &!&b);
    }
}

#[test]
fn test_commutativity() {
    for (a, b) in noise_pairs(30) {
        assert_eq!(&a & &b, &b & &a);
        assert_eq!(&a | &b, &b | &a);
        assert_eq!(&a ^ &b, &b ^ &a);
    }
}

#[test]
fn test_self_identity() {
    for (a, _) in noise_pairs(30) {
        assert_eq!(&a & &a, a);
        assert_eq!(&a | &a, a);
        let (start, end) = (a.start().unwrap(), a.end().unwrap());
        assert_eq!(&a ^ &a, Signal::constant(start, end, false).unwrap());
    }
}

#[test]
fn test_join_split_inverse() {
    let mut rng = StdRng::seed_from_u64(99);
    for (a, _) in noise_pairs(30) {
        for _ in 0..10 {
            let t = rng.gen_range(1..600);
            let (older, newer) = a.split(t);
            assert_eq!(older.join(&newer).unwrap(), a, "split at {t}");
        }
    }
}

#[test]
fn test_integral_complement() {
    for (a, _) in noise_pairs(30) {
        let high = a.integral(true).unwrap();
        let low = a.integral(false).unwrap();
        assert_eq!(high + low, a.elapse().unwrap());
        assert_eq!((!&a).integral(true), Some(low));
    }
}

#[test]
fn test_reverse_involution() {
    for (a, b) in noise_pairs(30) {
        assert_eq!(a.reversed().reversed(), a);
        assert_eq!(b.reversed().reversed(), b);
    }
}

#[test]
fn test_reverse_preserves_integral() {
    for (a, _) in noise_pairs(10) {
        assert_eq!(a.reversed().integral(true), a.integral(true));
    }
}

#[test]
fn test_shift_additivity() {
    let mut rng = StdRng::seed_from_u64(5);
    for (a, _) in noise_pairs(20) {
        let (x, y) = (rng.gen_range(-500..500), rng.gen_range(-500..500));
        assert_eq!(a.shifted(x).shifted(y), a.shifted(x + y));
    }
}

#[test]
fn test_chop_pieces_rejoin() {
    for (a, _) in noise_pairs(20) {
        let pieces = a.chop(37, 0).unwrap();
        assert_eq!(pieces.len(), 17);
        let mut rejoined = Signal::Void;
        for piece in pieces {
            rejoined.append(piece).unwrap();
        }
        assert_eq!(rejoined, a);
    }
}

/// Agreement time of `a` moved by `offset` against `b`, counted tick by tick.
fn sampled_agreement(a: &Signal, b: &Signal, offset: i64) -> Option<(i64, i64)> {
    let moved = a.shifted(offset);
    let lo = moved.start()?.max(b.start()?);
    let hi = moved.end()?.min(b.end()?);
    if lo >= hi {
        return None;
    }
    let level_at = |signal: &Signal, t: i64| signal.level(t, 0).map(|(level, _)| level);
    let agree = (lo..hi)
        .filter(|&t| level_at(&moved, t) == level_at(b, t))
        .count() as i64;
    Some((agree, hi - lo))
}

#[test]
fn test_correlation_matches_sampled_agreement() {
    for (a, b) in noise_pairs(6) {
        let align = b.start().unwrap() - a.start().unwrap();
        let config = CorrelationConfig::new(7);
        let result = correlation(&a, &b, None, &config).unwrap();
        assert!(!result.is_empty());
        for (&shift, &value) in result.shifts.iter().zip(&result.values) {
            let (agree, _) = sampled_agreement(&a, &b, align + shift).unwrap();
            assert_eq!(value, agree as f64, "shift {shift}");
        }

        let normalized = correlation(&a, &b, None, &config.clone().normalize(true)).unwrap();
        assert_eq!(normalized.shifts, result.shifts);
        for (&shift, &value) in normalized.shifts.iter().zip(&normalized.values) {
            let (agree, overlap) = sampled_agreement(&a, &b, align + shift).unwrap();
            let expected = agree as f64 / overlap as f64 * 2.0 - 1.0;
            assert!((value - expected).abs() < 1e-9, "shift {shift}");
        }
    }
}

#[test]
fn test_and_with_shifted_base() {
    let base = Signal::new(0, 6, vec![2, 3, 4], false).unwrap();
    assert_eq!(
        &base & &base.shifted(2),
        Signal::new(2, 6, vec![4, 5], false).unwrap()
    );
}

#[test]
fn test_sample_signal_integral() {
    let signal = sample_signal();
    assert_eq!(signal.integral(true), Some(30));
    assert_eq!(signal.integral(false), Some(33));
}
