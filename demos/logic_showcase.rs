//! Boolean algebra and structural operations on small waveforms.
//!
//! Run with: cargo run --example logic_showcase --features macros

mod common;

use anyhow::Result;
use binsig::{LogicOp, Signal, waveform};
use tracing::info;

fn main() -> Result<()> {
    common::init_logging();

    let base = waveform!("__‾_‾‾");
    let shifted = base.shifted(2);
    info!("base and a copy shifted by two ticks");
    common::print_traces(&[("base", &base), ("shifted", &shifted)], -1, 9, 40);

    println!();
    info!("binary operators work on the common domain");
    let and = &base & &shifted;
    let or = &base | &shifted;
    let xor = &base ^ &shifted;
    let not = !&base;
    common::print_traces(
        &[("and", &and), ("or", &or), ("xor", &xor), ("not base", &not)],
        -1,
        9,
        40,
    );
    println!("\n{and}");

    // Every operator goes through the same merge engine
    assert_eq!(base.combine(&shifted, LogicOp::Xor), xor);

    println!();
    info!("split, reverse and join");
    let (older, newer) = base.split(3);
    let rebuilt = older.join(&newer)?;
    let reversed = base.reversed();
    common::print_traces(
        &[
            ("older", &older),
            ("newer", &newer),
            ("rejoined", &rebuilt),
            ("reversed", &reversed),
        ],
        -1,
        9,
        40,
    );

    println!();
    info!("chop into two-tick pieces");
    for (index, piece) in base.chop(2, 0)?.iter().enumerate() {
        println!(
            "piece {index}: [{}, {}) start level {}",
            piece.start().unwrap_or_default(),
            piece.end().unwrap_or_default(),
            u8::from(piece.slevel().unwrap_or_default())
        );
    }

    let rejected = base.join(&Signal::constant(6, 8, false)?);
    info!("joining at mismatched levels: {:?}", rejected.err());

    Ok(())
}
