//! Classification of raw input lines into planet commands.
//!
//! Each physical line, after trimming and upper-casing, must match exactly
//! one of the recognized shapes: a planet bounds line (`5 5`), a rover
//! landing line (`1 2 N`), a rover program (`LFRFF`), or an empty line.
//! Anything else is a classification failure reported to the caller; the
//! driver loop keeps reading.

use std::{error::Error, fmt};

use mars_rover_core::{Command, Direction, Instruction, Position};

/// Longest accepted rover program, per the input contract.
const MAX_PROGRAM_LENGTH: usize = 99;
/// Longest accepted coordinate field, in digits.
const MAX_COORDINATE_DIGITS: usize = 2;

/// Classifies a raw input line into a [`Command`].
///
/// Returns `Ok(None)` for empty (or whitespace-only) lines, which the
/// driver ignores.
pub(crate) fn parse_line(raw: &str) -> Result<Option<Command>, ClassificationError> {
    let line = raw.trim().to_uppercase();
    if line.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(' ').collect();
    let command = match fields.as_slice() {
        [x, y] => match (parse_coordinate(x), parse_coordinate(y)) {
            (Some(max_x), Some(max_y)) => Some(Command::ConfigurePlanetBounds { max_x, max_y }),
            _ => None,
        },
        [x, y, letter] => match (parse_coordinate(x), parse_coordinate(y), parse_direction(letter))
        {
            (Some(x), Some(y), Some(direction)) => Some(Command::LandRover {
                position: Position::new(x, y, direction),
            }),
            _ => None,
        },
        [word] => parse_program(word).map(|instructions| Command::RunProgram { instructions }),
        _ => None,
    };

    match command {
        Some(command) => Ok(Some(command)),
        None => Err(ClassificationError::new(line)),
    }
}

/// Parses a 1-2 digit non-negative coordinate field.
fn parse_coordinate(field: &str) -> Option<i32> {
    if field.is_empty()
        || field.len() > MAX_COORDINATE_DIGITS
        || !field.bytes().all(|byte| byte.is_ascii_digit())
    {
        return None;
    }
    field.parse().ok()
}

/// Parses a single-letter heading field.
fn parse_direction(field: &str) -> Option<Direction> {
    let mut letters = field.chars();
    let letter = letters.next()?;
    if letters.next().is_some() {
        return None;
    }
    Direction::from_letter(letter)
}

/// Parses a 1-99 letter instruction program.
fn parse_program(field: &str) -> Option<Vec<Instruction>> {
    if field.is_empty() || field.len() > MAX_PROGRAM_LENGTH {
        return None;
    }
    field.chars().map(Instruction::from_letter).collect()
}

/// Raised when an input line matches none of the recognized shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ClassificationError {
    line: String,
}

impl ClassificationError {
    fn new(line: String) -> Self {
        Self { line }
    }
}

impl fmt::Display for ClassificationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "input line {:?} does not match any recognized format",
            self.line
        )
    }
}

impl Error for ClassificationError {}
