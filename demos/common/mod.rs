//! Common utilities for the demos.

use binsig::{Signal, Time};
use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// Renders a signal as a one-line ASCII trace, `columns` characters wide.
///
/// Each column shows the level at the start of its time slot: `‾` high,
/// `_` low. Columns outside the signal domain are blank.
pub fn render<T: Time>(signal: &Signal<T>, from: T, to: T, columns: usize) -> String {
    let span = (to - from).to_f64();
    let mut hint = 0;
    (0..columns)
        .map(|column| {
            let time = from + T::from_f64(span * column as f64 / columns as f64);
            match signal.level(time, hint) {
                Some((level, index)) if Some(time) != signal.end() => {
                    hint = index;
                    if level { '‾' } else { '_' }
                }
                _ => ' ',
            }
        })
        .collect()
}

/// Prints a labelled trace of each signal over a common window.
pub fn print_traces<T: Time>(traces: &[(&str, &Signal<T>)], from: T, to: T, columns: usize) {
    for (label, signal) in traces {
        println!("{label:>10} |{}|", render(signal, from, to, columns));
    }
}
