//! Locating a known pattern inside a noisy capture by sliding correlation.
//!
//! Run with: cargo run --example correlation_scan

mod common;

use anyhow::{Context, Result};
use binsig::{CorrelationConfig, NoiseConfig, PulseNoise, Signal, correlation};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

fn main() -> Result<()> {
    common::init_logging();

    let mut rng = StdRng::seed_from_u64(2718);
    let mut noise = PulseNoise::with_rng(NoiseConfig::new(0.05, 4.0, 6.0, 2.0), StdRng::seed_from_u64(1))?;

    // A recognisable preamble
    let probe = Signal::new(0, 40, vec![4, 8, 12, 20, 24, 36], false)?;

    // Capture: noise, the preamble at 130, more noise
    let hidden_at = 130;
    let before: Signal = noise.generate(0, hidden_at)?;
    let mut capture = before;
    if capture.end_level() != probe.slevel() {
        capture.invert();
    }
    capture.append(probe.shifted(hidden_at))?;
    let mut after: Signal = noise.generate(hidden_at + 40, 300)?;
    if after.slevel() != capture.end_level() {
        after.invert();
    }
    capture.append(after)?;
    let capture = capture.jittered(0.5, &mut rng)?;

    common::print_traces(&[("probe", &probe), ("capture", &capture)], 0, 300, 75);

    let config = CorrelationConfig::new(1).bounds(0, 260).normalize(true);
    let scan = correlation(&probe, &capture, None, &config)?;
    let (shift, score) = scan.peak().context("empty correlation")?;

    info!(steps = scan.len(), "scan complete");
    println!("best match at {shift} (score {score:.3}), preamble hidden at {hidden_at}");

    Ok(())
}
