#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative planet state management for the Mars Rover simulation.
//!
//! The [`Planet`] owns the bounding rectangle, the registry of landed
//! rovers, and the append-only list of danger zones. All mutation flows
//! through [`apply`], which executes a single [`Command`] and broadcasts
//! [`Event`] values describing what happened. Read access goes through the
//! [`query`] module.

use std::collections::BTreeMap;

use mars_rover_core::{
    BoundsBreach, Command, DispatchError, Event, Instruction, Position, RoverId, RoverState,
};

mod rover;

use rover::Rover;

/// Inclusive bounding rectangle of the planet's safe area.
///
/// Minimum coordinates are fixed at the origin; only the north-east corner
/// is configurable, exactly once per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanetBounds {
    max_x: i32,
    max_y: i32,
}

impl PlanetBounds {
    const MIN_X: i32 = 0;
    const MIN_Y: i32 = 0;

    /// Creates bounds spanning `[0, max_x] × [0, max_y]`.
    pub(crate) const fn new(max_x: i32, max_y: i32) -> Self {
        Self { max_x, max_y }
    }

    /// Inclusive east-most coordinate of the safe area.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Inclusive north-most coordinate of the safe area.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Reports whether the position's cell lies within the safe area.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x() >= Self::MIN_X
            && position.x() <= self.max_x
            && position.y() >= Self::MIN_Y
            && position.y() <= self.max_y
    }
}

/// Represents the authoritative planet state.
#[derive(Debug, Default)]
pub struct Planet {
    bounds: Option<PlanetBounds>,
    rovers: BTreeMap<RoverId, Rover>,
    danger_zones: Vec<Position>,
    last_landed: Option<RoverId>,
}

impl Planet {
    /// Creates an unconfigured planet with no rovers and no danger zones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bounding rectangle, exactly once.
    fn configure_bounds(&mut self, max_x: i32, max_y: i32) -> Result<(), DispatchError> {
        if self.bounds.is_some() {
            return Err(DispatchError::PlanetAlreadyConfigured);
        }
        self.bounds = Some(PlanetBounds::new(max_x, max_y));
        Ok(())
    }

    /// Registers a new rover at the given start position.
    ///
    /// Identifiers are sequential starting at 1, in landing order, and are
    /// never reused. Landing positions are not bounds-checked; a rover
    /// landed outside the safe area is lost on its first forward step.
    fn land_rover(&mut self, position: Position) -> Result<RoverId, DispatchError> {
        if self.bounds.is_none() {
            return Err(DispatchError::PlanetNotConfigured);
        }
        let rover_id = RoverId::new(self.rovers.len() as u32 + 1);
        self.store_rover(Rover::landed(rover_id, position));
        self.last_landed = Some(rover_id);
        Ok(rover_id)
    }

    /// Replaces the stored record for the rover, then bounds-checks it.
    ///
    /// The record is stored unconditionally; an out-of-bounds position is
    /// reported as a [`BoundsBreach`] without rolling the store back. The
    /// run loop owns the recovery.
    fn replace_rover(&mut self, rover: Rover) -> Result<(), BoundsBreach> {
        let position = rover.position();
        self.store_rover(rover);
        match self.bounds {
            Some(bounds) if bounds.contains(position) => Ok(()),
            _ => Err(BoundsBreach::at(position)),
        }
    }

    /// Stores the rover record, keyed by its identifier.
    fn store_rover(&mut self, rover: Rover) {
        let _ = self.rovers.insert(rover.id(), rover);
    }

    /// Appends a coordinate to the permanent danger zone list.
    fn mark_hazard(&mut self, position: Position) {
        self.danger_zones.push(position);
    }

    /// Reports whether the cell is free of recorded danger zones.
    ///
    /// Headings are ignored in the comparison.
    fn is_safe(&self, position: Position) -> bool {
        !self.danger_zones.iter().any(|zone| zone.same_cell(&position))
    }

    /// Runs an instruction program against the most recently landed rover.
    ///
    /// A bounds breach terminates the run: the rover keeps its last safe
    /// position, transitions to `Lost`, and the breaching coordinate
    /// becomes a permanent danger zone. The breach never escapes this
    /// loop; every other rejection is returned to the caller.
    fn run_program(
        &mut self,
        instructions: Vec<Instruction>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), DispatchError> {
        let rover_id = self.last_landed.ok_or(DispatchError::NoRoverLanded)?;
        let mut rover = self
            .rovers
            .get(&rover_id)
            .cloned()
            .ok_or(DispatchError::NoRoverLanded)?;
        if rover.state() != RoverState::Idle {
            return Err(DispatchError::ProgramAlreadyRun(rover_id));
        }
        rover.begin_program(instructions);

        while let Some(instruction) = rover.next_instruction() {
            let prior = rover.position();
            let candidate = prior.transformed(instruction);
            if !self.is_safe(candidate) {
                // Known danger zone ahead: the instruction is discarded,
                // not an error.
                out_events.push(Event::StepBlocked {
                    rover_id,
                    hazard: candidate,
                });
                continue;
            }

            rover.advance_to(instruction, candidate);
            match self.replace_rover(rover.clone()) {
                Ok(()) => {
                    if prior.same_cell(&candidate) {
                        out_events.push(Event::RoverTurned {
                            rover_id,
                            facing: candidate.direction(),
                        });
                    } else {
                        out_events.push(Event::RoverAdvanced {
                            rover_id,
                            from: prior,
                            to: candidate,
                        });
                    }
                }
                Err(breach) => {
                    rover.retreat_to(prior);
                    rover.mark_lost();
                    let hazard = breach.position();
                    self.mark_hazard(hazard);
                    out_events.push(Event::HazardMarked { position: hazard });
                    out_events.push(Event::RoverLost {
                        rover_id,
                        position: rover.position(),
                    });
                    self.store_rover(rover);
                    return Ok(());
                }
            }
        }

        rover.mark_finished();
        out_events.push(Event::RoverFinished {
            rover_id,
            position: rover.position(),
        });
        self.store_rover(rover);
        Ok(())
    }
}

/// Applies the provided command to the planet, mutating state and pushing
/// events describing the outcome.
///
/// A rejected command leaves the planet untouched and pushes no events.
pub fn apply(
    planet: &mut Planet,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), DispatchError> {
    match command {
        Command::ConfigurePlanetBounds { max_x, max_y } => {
            planet.configure_bounds(max_x, max_y)?;
            out_events.push(Event::BoundsConfigured { max_x, max_y });
            Ok(())
        }
        Command::LandRover { position } => {
            let rover_id = planet.land_rover(position)?;
            out_events.push(Event::RoverLanded { rover_id, position });
            Ok(())
        }
        Command::RunProgram { instructions } => planet.run_program(instructions, out_events),
    }
}

/// Query functions that provide read-only access to the planet state.
pub mod query {
    use super::Planet;
    use mars_rover_core::{Instruction, Position, RoverId, RoverState};

    /// Reports whether the planet bounds have been configured.
    #[must_use]
    pub fn is_configured(planet: &Planet) -> bool {
        planet.bounds.is_some()
    }

    /// Retrieves the configured bounds, if any.
    #[must_use]
    pub fn bounds(planet: &Planet) -> Option<super::PlanetBounds> {
        planet.bounds
    }

    /// Coordinates recorded as danger zones, in order of loss.
    #[must_use]
    pub fn danger_zones(planet: &Planet) -> &[Position] {
        &planet.danger_zones
    }

    /// Identifier of the most recently landed rover, if any.
    #[must_use]
    pub fn last_landed(planet: &Planet) -> Option<RoverId> {
        planet.last_landed
    }

    /// Reports whether the cell is free of recorded danger zones.
    #[must_use]
    pub fn is_safe(planet: &Planet, position: Position) -> bool {
        planet.is_safe(position)
    }

    /// Captures a read-only view of every rover, in landing order.
    #[must_use]
    pub fn rover_view(planet: &Planet) -> RoverView {
        let snapshots = planet
            .rovers
            .values()
            .map(|rover| RoverSnapshot {
                id: rover.id(),
                position: rover.position(),
                state: rover.state(),
                remaining: rover.remaining().collect(),
                executed: rover.executed().collect(),
                history: rover.history().to_vec(),
            })
            .collect();
        RoverView { snapshots }
    }

    /// Read-only snapshot describing all rovers on the planet.
    #[derive(Clone, Debug)]
    pub struct RoverView {
        snapshots: Vec<RoverSnapshot>,
    }

    impl RoverView {
        /// Iterator over the captured snapshots in landing order.
        pub fn iter(&self) -> impl Iterator<Item = &RoverSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<RoverSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single rover's state.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct RoverSnapshot {
        /// Identifier assigned at landing time.
        pub id: RoverId,
        /// Current location and heading.
        pub position: Position,
        /// Current lifecycle state.
        pub state: RoverState,
        /// Pending instructions in execution order.
        pub remaining: Vec<Instruction>,
        /// Executed instructions, most recent first.
        pub executed: Vec<Instruction>,
        /// Cells occupied immediately before each completed move.
        pub history: Vec<Position>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mars_rover_core::Direction;

    fn program(letters: &str) -> Vec<Instruction> {
        letters
            .chars()
            .map(|letter| Instruction::from_letter(letter).expect("valid instruction letter"))
            .collect()
    }

    fn configured_planet(max_x: i32, max_y: i32) -> Planet {
        let mut planet = Planet::new();
        let mut events = Vec::new();
        apply(
            &mut planet,
            Command::ConfigurePlanetBounds { max_x, max_y },
            &mut events,
        )
        .expect("bounds configuration succeeds on a fresh planet");
        planet
    }

    fn land(planet: &mut Planet, x: i32, y: i32, direction: Direction) -> RoverId {
        let mut events = Vec::new();
        apply(
            planet,
            Command::LandRover {
                position: Position::new(x, y, direction),
            },
            &mut events,
        )
        .expect("landing succeeds on a configured planet");
        query::last_landed(planet).expect("a rover just landed")
    }

    fn run(planet: &mut Planet, letters: &str) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            planet,
            Command::RunProgram {
                instructions: program(letters),
            },
            &mut events,
        )
        .expect("program run is accepted");
        events
    }

    fn snapshot_of(planet: &Planet, rover_id: RoverId) -> query::RoverSnapshot {
        query::rover_view(planet)
            .into_vec()
            .into_iter()
            .find(|snapshot| snapshot.id == rover_id)
            .expect("rover is registered")
    }

    #[test]
    fn bounds_are_configured_exactly_once() {
        let mut planet = Planet::new();
        let mut events = Vec::new();

        apply(
            &mut planet,
            Command::ConfigurePlanetBounds { max_x: 5, max_y: 5 },
            &mut events,
        )
        .expect("first configuration succeeds");
        assert_eq!(events, vec![Event::BoundsConfigured { max_x: 5, max_y: 5 }]);
        assert!(query::is_configured(&planet));

        events.clear();
        let second = apply(
            &mut planet,
            Command::ConfigurePlanetBounds { max_x: 7, max_y: 7 },
            &mut events,
        );
        assert_eq!(second, Err(DispatchError::PlanetAlreadyConfigured));
        assert!(events.is_empty());
        let bounds = query::bounds(&planet).expect("bounds stay configured");
        assert_eq!(bounds.max_x(), 5);
        assert_eq!(bounds.max_y(), 5);
    }

    #[test]
    fn landing_requires_configured_bounds() {
        let mut planet = Planet::new();
        let mut events = Vec::new();
        let result = apply(
            &mut planet,
            Command::LandRover {
                position: Position::new(1, 2, Direction::North),
            },
            &mut events,
        );
        assert_eq!(result, Err(DispatchError::PlanetNotConfigured));
        assert!(events.is_empty());
        assert!(query::rover_view(&planet).into_vec().is_empty());
    }

    #[test]
    fn landing_assigns_sequential_identifiers() {
        let mut planet = configured_planet(5, 5);
        let first = land(&mut planet, 0, 0, Direction::North);
        let second = land(&mut planet, 1, 1, Direction::East);
        let third = land(&mut planet, 2, 2, Direction::South);

        assert_eq!(first, RoverId::new(1));
        assert_eq!(second, RoverId::new(2));
        assert_eq!(third, RoverId::new(3));
        assert_eq!(query::last_landed(&planet), Some(third));

        let ids: Vec<RoverId> = query::rover_view(&planet)
            .iter()
            .map(|snapshot| snapshot.id)
            .collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn program_before_any_landing_is_rejected() {
        let mut planet = configured_planet(5, 5);
        let mut events = Vec::new();
        let result = apply(
            &mut planet,
            Command::RunProgram {
                instructions: program("F"),
            },
            &mut events,
        );
        assert_eq!(result, Err(DispatchError::NoRoverLanded));
        assert!(events.is_empty());
    }

    #[test]
    fn program_cannot_be_submitted_twice() {
        let mut planet = configured_planet(5, 5);
        let rover_id = land(&mut planet, 1, 1, Direction::North);
        let _ = run(&mut planet, "F");

        let mut events = Vec::new();
        let result = apply(
            &mut planet,
            Command::RunProgram {
                instructions: program("F"),
            },
            &mut events,
        );
        assert_eq!(result, Err(DispatchError::ProgramAlreadyRun(rover_id)));
        assert!(events.is_empty());
    }

    #[test]
    fn square_patrol_ends_one_cell_north() {
        let mut planet = configured_planet(5, 5);
        let rover_id = land(&mut planet, 1, 2, Direction::North);
        let events = run(&mut planet, "LFLFLFLFF");

        assert_eq!(
            events.last(),
            Some(&Event::RoverFinished {
                rover_id,
                position: Position::new(1, 3, Direction::North),
            })
        );
        let snapshot = snapshot_of(&planet, rover_id);
        assert_eq!(snapshot.state, RoverState::Finished);
        assert_eq!(snapshot.position, Position::new(1, 3, Direction::North));
        assert!(snapshot.remaining.is_empty());
    }

    #[test]
    fn executed_instructions_reverse_to_the_program() {
        let mut planet = configured_planet(5, 5);
        let rover_id = land(&mut planet, 1, 2, Direction::North);
        let _ = run(&mut planet, "LFLFLFLFF");

        let snapshot = snapshot_of(&planet, rover_id);
        let mut replay = snapshot.executed.clone();
        replay.reverse();
        assert_eq!(replay, program("LFLFLFLFF"));
    }

    #[test]
    fn history_skips_turn_only_repositioning() {
        let mut planet = configured_planet(5, 5);
        let rover_id = land(&mut planet, 1, 2, Direction::North);
        let _ = run(&mut planet, "LFLF");

        let snapshot = snapshot_of(&planet, rover_id);
        assert_eq!(
            snapshot.history,
            vec![
                Position::new(1, 2, Direction::West),
                Position::new(0, 2, Direction::South),
            ]
        );
    }

    #[test]
    fn breaching_the_bounds_loses_the_rover() {
        let mut planet = configured_planet(5, 5);
        let rover_id = land(&mut planet, 5, 5, Direction::North);
        let events = run(&mut planet, "F");

        let hazard = Position::new(5, 6, Direction::North);
        assert_eq!(
            events,
            vec![
                Event::HazardMarked { position: hazard },
                Event::RoverLost {
                    rover_id,
                    position: Position::new(5, 5, Direction::North),
                },
            ]
        );

        let snapshot = snapshot_of(&planet, rover_id);
        assert_eq!(snapshot.state, RoverState::Lost);
        assert_eq!(snapshot.position, Position::new(5, 5, Direction::North));
        assert_eq!(query::danger_zones(&planet), &[hazard]);
    }

    #[test]
    fn loss_stops_the_rest_of_the_program() {
        let mut planet = configured_planet(5, 5);
        let rover_id = land(&mut planet, 5, 5, Direction::North);
        let _ = run(&mut planet, "FLFF");

        let snapshot = snapshot_of(&planet, rover_id);
        assert_eq!(snapshot.state, RoverState::Lost);
        assert_eq!(snapshot.position, Position::new(5, 5, Direction::North));
        assert_eq!(query::danger_zones(&planet).len(), 1);
    }

    #[test]
    fn fatal_step_leaves_no_trace_in_the_rover_records() {
        let mut planet = configured_planet(5, 5);
        let rover_id = land(&mut planet, 5, 5, Direction::North);
        let _ = run(&mut planet, "RF");

        let snapshot = snapshot_of(&planet, rover_id);
        assert_eq!(snapshot.state, RoverState::Lost);
        assert_eq!(snapshot.position, Position::new(5, 5, Direction::East));
        assert_eq!(snapshot.executed, program("R"));
        assert!(snapshot.history.is_empty());
        assert_eq!(
            query::danger_zones(&planet),
            &[Position::new(6, 5, Direction::East)]
        );
    }

    #[test]
    fn danger_zone_blocks_later_rovers_without_error() {
        let mut planet = configured_planet(5, 5);
        let _ = land(&mut planet, 5, 5, Direction::North);
        let _ = run(&mut planet, "F");

        let follower = land(&mut planet, 5, 4, Direction::North);
        let events = run(&mut planet, "FF");

        // The first step is safe; the second would enter the cell that
        // swallowed the previous rover and is silently discarded.
        assert!(events.contains(&Event::StepBlocked {
            rover_id: follower,
            hazard: Position::new(5, 6, Direction::North),
        }));

        let snapshot = snapshot_of(&planet, follower);
        assert_eq!(snapshot.state, RoverState::Finished);
        assert_eq!(snapshot.position, Position::new(5, 5, Direction::North));
        assert_eq!(query::danger_zones(&planet).len(), 1);
    }

    #[test]
    fn danger_zones_ignore_heading() {
        let mut planet = configured_planet(5, 5);
        let _ = land(&mut planet, 5, 5, Direction::North);
        let _ = run(&mut planet, "F");

        assert!(!query::is_safe(
            &planet,
            Position::new(5, 6, Direction::West)
        ));
        assert!(query::is_safe(&planet, Position::new(5, 5, Direction::West)));
    }

    #[test]
    fn lost_rover_keeps_its_resting_position_even_outside_bounds() {
        // Landings are not bounds-checked, so a rover dropped outside the
        // safe area is lost on its first step and rests where it landed.
        let mut planet = configured_planet(5, 5);
        let rover_id = land(&mut planet, 9, 9, Direction::North);
        let _ = run(&mut planet, "F");

        let snapshot = snapshot_of(&planet, rover_id);
        assert_eq!(snapshot.state, RoverState::Lost);
        assert_eq!(snapshot.position, Position::new(9, 9, Direction::North));
        assert_eq!(
            query::danger_zones(&planet),
            &[Position::new(9, 10, Direction::North)]
        );
    }

    #[test]
    fn turns_and_moves_emit_matching_events() {
        let mut planet = configured_planet(5, 5);
        let rover_id = land(&mut planet, 1, 1, Direction::North);
        let events = run(&mut planet, "RF");

        assert_eq!(
            events,
            vec![
                Event::RoverTurned {
                    rover_id,
                    facing: Direction::East,
                },
                Event::RoverAdvanced {
                    rover_id,
                    from: Position::new(1, 1, Direction::East),
                    to: Position::new(2, 1, Direction::East),
                },
                Event::RoverFinished {
                    rover_id,
                    position: Position::new(2, 1, Direction::East),
                },
            ]
        );
    }
}
