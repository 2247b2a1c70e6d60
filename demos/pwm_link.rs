//! A PWM link: encode bit fields, disturb the line, decode both ways.
//!
//! Run with: cargo run --example pwm_link

mod common;

use anyhow::Result;
use binsig::{BitField, DecodeMode, NoiseConfig, PulseNoise, PwmConfig, bin_to_pwm, pwm_to_bin};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

fn main() -> Result<()> {
    common::init_logging();

    let config = PwmConfig::new(40, 10, 30);
    let fields = [BitField::new(8, 0xa5)?, BitField::new(4, 0b0110)?];
    let clean = bin_to_pwm(&fields, &config)?;
    info!(edges = clean.edges().len(), "encoded 12 bits");

    let mut rng = StdRng::seed_from_u64(9);
    let jittered = clean.jittered(2.0, &mut rng)?;

    // Short glitches on top of the jitter
    let mut noise = PulseNoise::with_rng(NoiseConfig::new(0.01, 10.0, 1.0, 0.5), StdRng::seed_from_u64(3))?;
    let (start, end) = (clean.start().unwrap_or_default(), clean.end().unwrap_or_default());
    let glitches = noise.generate(start, end)?;
    let glitches = if glitches.slevel() == Some(true) { !glitches } else { glitches };
    let disturbed = &jittered ^ &glitches;

    common::print_traces(
        &[("clean", &clean), ("glitches", &glitches), ("disturbed", &disturbed)],
        start,
        end,
        96,
    );

    for (name, signal) in [("clean", &clean), ("disturbed", &disturbed)] {
        let by_elapse = pwm_to_bin(signal, &config, DecodeMode::Elapse)?;
        let by_shape = pwm_to_bin(signal, &config, DecodeMode::Correlation { threshold: 8 })?;
        println!(
            "{name:>9}: elapse {:>2} bits {:#014b} | correlation {:>2} bits {:#014b} errors {:#014b}",
            by_elapse.code.width, by_elapse.code.value, by_shape.code.width, by_shape.code.value, by_shape.errors
        );
    }

    Ok(())
}
