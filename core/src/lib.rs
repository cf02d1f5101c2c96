#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mars Rover simulation.
//!
//! This crate defines the message surface that connects adapters and the
//! authoritative planet. Adapters submit [`Command`] values describing
//! desired mutations, the planet executes those commands via its `apply`
//! entry point, and then broadcasts [`Event`] values describing what
//! actually happened. The coordinate and instruction vocabulary lives here
//! so that every crate agrees on how rovers turn, step, and get lost.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cardinal headings a rover may face, ordered clockwise starting north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Heading toward increasing y values.
    North,
    /// Heading toward increasing x values.
    East,
    /// Heading toward decreasing y values.
    South,
    /// Heading toward decreasing x values.
    West,
}

/// Clockwise rotation cycle used for turn arithmetic.
const CLOCKWISE_CYCLE: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// Index of the heading within the clockwise cycle.
    fn cycle_index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Heading after a single left (counter-clockwise) turn.
    #[must_use]
    pub fn turned_left(self) -> Self {
        // +3 instead of -1 keeps the index arithmetic non-negative.
        CLOCKWISE_CYCLE[(self.cycle_index() + CLOCKWISE_CYCLE.len() - 1) % CLOCKWISE_CYCLE.len()]
    }

    /// Heading after a single right (clockwise) turn.
    #[must_use]
    pub fn turned_right(self) -> Self {
        CLOCKWISE_CYCLE[(self.cycle_index() + 1) % CLOCKWISE_CYCLE.len()]
    }

    /// Parses a heading from its single-letter representation.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'N' => Some(Self::North),
            'E' => Some(Self::East),
            'S' => Some(Self::South),
            'W' => Some(Self::West),
            _ => None,
        }
    }

    /// Single-letter representation of the heading.
    #[must_use]
    pub const fn as_letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::East => 'E',
            Self::South => 'S',
            Self::West => 'W',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.as_letter())
    }
}

/// Single-letter instructions a rover program is composed of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// Advance one cell in the direction currently faced.
    Forward,
    /// Rotate ninety degrees counter-clockwise in place.
    TurnLeft,
    /// Rotate ninety degrees clockwise in place.
    TurnRight,
}

impl Instruction {
    /// Parses an instruction from its single-letter representation.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'F' => Some(Self::Forward),
            'L' => Some(Self::TurnLeft),
            'R' => Some(Self::TurnRight),
            _ => None,
        }
    }

    /// Single-letter representation of the instruction.
    #[must_use]
    pub const fn as_letter(self) -> char {
        match self {
            Self::Forward => 'F',
            Self::TurnLeft => 'L',
            Self::TurnRight => 'R',
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.as_letter())
    }
}

/// Location and heading of a rover on the planet grid.
///
/// Coordinates are signed so that a step off the south or west edge can be
/// represented before the bounds check rejects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
    direction: Direction,
}

impl Position {
    /// Creates a new position from coordinates and a heading.
    #[must_use]
    pub const fn new(x: i32, y: i32, direction: Direction) -> Self {
        Self { x, y, direction }
    }

    /// East/west coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// North/south coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Heading currently faced.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Position one cell ahead along the current heading.
    ///
    /// The heading itself is untouched; exactly one axis changes by one
    /// unit.
    #[must_use]
    pub const fn stepped_forward(self) -> Self {
        let (x, y) = match self.direction {
            Direction::North => (self.x, self.y + 1),
            Direction::South => (self.x, self.y - 1),
            Direction::East => (self.x + 1, self.y),
            Direction::West => (self.x - 1, self.y),
        };
        Self {
            x,
            y,
            direction: self.direction,
        }
    }

    /// Position after applying a single instruction.
    ///
    /// Turns update the heading and leave the cell untouched; a forward
    /// step updates the cell and leaves the heading untouched.
    #[must_use]
    pub fn transformed(self, instruction: Instruction) -> Self {
        match instruction {
            Instruction::TurnLeft => Self {
                direction: self.direction.turned_left(),
                ..self
            },
            Instruction::TurnRight => Self {
                direction: self.direction.turned_right(),
                ..self
            },
            Instruction::Forward => self.stepped_forward(),
        }
    }

    /// Reports whether two positions occupy the same grid cell.
    ///
    /// Headings are ignored; danger zones apply to the cell regardless of
    /// which way the lost rover was facing.
    #[must_use]
    pub const fn same_cell(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {} {}", self.x, self.y, self.direction)
    }
}

/// Unique identifier assigned to a rover by the planet at landing time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoverId(u32);

impl RoverId {
    /// Creates a new rover identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Lifecycle states a rover passes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoverState {
    /// Landed and waiting for a program.
    Idle,
    /// Currently consuming its program.
    Moving,
    /// Consumed its whole program without leaving the planet.
    Finished,
    /// Attempted a step beyond the planet bounds; terminal.
    Lost,
}

/// Commands that express all permissible planet mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Configures the planet's bounding rectangle, exactly once per session.
    ConfigurePlanetBounds {
        /// Inclusive east-most coordinate of the safe area.
        max_x: i32,
        /// Inclusive north-most coordinate of the safe area.
        max_y: i32,
    },
    /// Lands a new rover at the provided starting position.
    LandRover {
        /// Location and heading the rover lands with.
        position: Position,
    },
    /// Runs an instruction program against the most recently landed rover.
    RunProgram {
        /// Instructions to execute, in submission order.
        instructions: Vec<Instruction>,
    },
}

/// Events broadcast by the planet after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the planet bounds were configured.
    BoundsConfigured {
        /// Inclusive east-most coordinate of the safe area.
        max_x: i32,
        /// Inclusive north-most coordinate of the safe area.
        max_y: i32,
    },
    /// Confirms that a rover landed and was registered.
    RoverLanded {
        /// Identifier assigned to the rover by the planet.
        rover_id: RoverId,
        /// Location and heading the rover landed with.
        position: Position,
    },
    /// Reports that a rover rotated in place.
    RoverTurned {
        /// Identifier of the rover that turned.
        rover_id: RoverId,
        /// Heading faced after the turn.
        facing: Direction,
    },
    /// Reports that a rover advanced one cell.
    RoverAdvanced {
        /// Identifier of the rover that advanced.
        rover_id: RoverId,
        /// Position occupied before the step.
        from: Position,
        /// Position occupied after the step.
        to: Position,
    },
    /// Reports that a step onto a known danger zone was discarded.
    StepBlocked {
        /// Identifier of the rover whose step was refused.
        rover_id: RoverId,
        /// Danger zone the rover would have entered.
        hazard: Position,
    },
    /// Confirms that a coordinate was recorded as a permanent danger zone.
    HazardMarked {
        /// Coordinate that is unsafe for the remainder of the session.
        position: Position,
    },
    /// Reports that a rover fell off the planet and accepts no further
    /// instructions.
    RoverLost {
        /// Identifier of the lost rover.
        rover_id: RoverId,
        /// Last safe position the rover rests at.
        position: Position,
    },
    /// Reports that a rover consumed its whole program safely.
    RoverFinished {
        /// Identifier of the finished rover.
        rover_id: RoverId,
        /// Final position and heading of the rover.
        position: Position,
    },
}

/// Reasons a command may be rejected by the planet.
///
/// Every variant is terminal for the current input line only; the driver
/// reports it and resumes with the next line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A second bounds configuration was attempted.
    #[error("the planet bounds have already been configured")]
    PlanetAlreadyConfigured,
    /// A rover tried to land before the planet was configured.
    #[error("the planet bounds have not been configured yet")]
    PlanetNotConfigured,
    /// A program was submitted before any rover landed.
    #[error("no rover has landed yet")]
    NoRoverLanded,
    /// A program was submitted to a rover that already left idle.
    #[error("rover {} has already received and executed a program", .0.get())]
    ProgramAlreadyRun(RoverId),
}

/// Outcome of the bounds check performed when a rover record is replaced.
///
/// Carries the offending coordinate so that the run loop can convert the
/// breach into a `Lost` rover plus a permanent danger zone. The breach is
/// consumed inside the run loop and never reaches the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("position {position} is outside the planet bounds")]
pub struct BoundsBreach {
    position: Position,
}

impl BoundsBreach {
    /// Creates a breach record for the provided out-of-bounds position.
    #[must_use]
    pub const fn at(position: Position) -> Self {
        Self { position }
    }

    /// Coordinate that failed the bounds check.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }
}
