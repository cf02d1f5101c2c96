//! Line-by-line driver loop for a simulation session.
//!
//! One planet instance lives for the duration of the session. Every input
//! line is classified, applied, and reported before the next line is read;
//! classification failures and rejected commands are written to the error
//! stream with their line number and the loop resumes.

use std::{
    fmt,
    io::{self, BufRead, Write},
};

use anyhow::Context as _;
use mars_rover_core::Event;
use mars_rover_world::{apply, Planet};

use crate::line;

/// Runs a full simulation session over the provided input stream.
///
/// Writes one `END> <x> <y> <direction>` line per executed program to
/// `output`, with ` LOST` appended when the rover fell off the planet.
/// Per-line failures go to `errors`; they never abort the session.
pub(crate) fn run_session<R, W, E>(input: R, output: &mut W, errors: &mut E) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut planet = Planet::new();
    let mut events = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line_number = index + 1;
        let raw = raw.with_context(|| format!("failed to read input line {line_number}"))?;

        let command = match line::parse_line(&raw) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                report_failure(errors, line_number, &error)?;
                continue;
            }
        };

        events.clear();
        if let Err(error) = apply(&mut planet, command, &mut events) {
            report_failure(errors, line_number, &error)?;
            continue;
        }
        report(&events, output).context("failed to write simulation output")?;
    }

    Ok(())
}

/// Surfaces a per-line failure on the error stream.
fn report_failure<E: Write>(
    errors: &mut E,
    line_number: usize,
    error: &dyn fmt::Display,
) -> anyhow::Result<()> {
    writeln!(errors, "line {line_number}: {error}").context("failed to write error report")
}

/// Prints the terminal outcome of a program run and traces every event.
fn report<W: Write>(events: &[Event], output: &mut W) -> io::Result<()> {
    for event in events {
        log::debug!("{event:?}");
        match event {
            Event::RoverFinished { position, .. } => writeln!(output, "END> {position}")?,
            Event::RoverLost { position, .. } => writeln!(output, "END> {position} LOST")?,
            _ => {}
        }
    }
    Ok(())
}
