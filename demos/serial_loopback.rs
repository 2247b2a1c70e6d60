//! Serial line loopback: transmit text, receive it, then receive a cut line.
//!
//! Run with: RUST_LOG=debug cargo run --example serial_loopback

mod common;

use anyhow::Result;
use binsig::{Parity, SerialConfig, serial_rx, serial_tx};
use tracing::info;

fn main() -> Result<()> {
    common::init_logging();

    // 7E1 at 1200 baud on a microsecond axis
    let config = SerialConfig::new(7, Parity::Even, 1, 1200.0);
    let text = b"binsig";
    let requested: Vec<i64> = (0..text.len() as i64).map(|k| k * 5_000).collect();

    let tx = serial_tx(text, &requested, &config)?;
    info!(bit_time = config.bit_time(), "transmitted {} frames", text.len());
    println!("requested start times: {requested:?}");
    println!("actual start times:    {:?}", tx.start_times);

    let (start, end) = (tx.signal.start().unwrap_or_default(), tx.signal.end().unwrap_or_default());
    common::print_traces(&[("line", &tx.signal)], start, end, 96);

    let rx = serial_rx(&tx.signal, &config)?;
    println!("received: {:?}", String::from_utf8_lossy(&rx.chars));

    // Cut the line in the middle of the last frame
    let cut = tx.start_times[text.len() - 1] + 4_000;
    let (head, _) = tx.signal.split(cut);
    let rx = serial_rx(&head, &config)?;
    for ((data, at), status) in rx.chars.iter().zip(&rx.start_times).zip(&rx.status) {
        println!("{at:>8}: {:?} {status}", *data as char);
    }

    Ok(())
}
