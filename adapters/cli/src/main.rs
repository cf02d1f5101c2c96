#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the Mars Rover simulation.

use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::Parser;

mod line;
mod session;

/// Simulates rovers patrolling a bounded planet grid.
///
/// Reads bounds, landing, and program lines from the provided file or from
/// standard input and prints one `END>` line per executed program.
#[derive(Debug, Parser)]
#[command(name = "mars-rover", version)]
struct Args {
    /// Input file with one command per line; standard input when omitted.
    input: Option<PathBuf>,
}

/// Entry point for the Mars Rover command-line interface.
fn main() -> anyhow::Result<()> {
    // Warn-level default so diagnostics stay visible without RUST_LOG set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    match args.input {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open input file {}", path.display()))?;
            session::run_session(BufReader::new(file), &mut stdout, &mut stderr)
        }
        None => session::run_session(io::stdin().lock(), &mut stdout, &mut stderr),
    }
}
