//! Rover state machine and program bookkeeping.

use std::collections::VecDeque;

use mars_rover_core::{Instruction, Position, RoverId, RoverState};

/// A rover registered on the planet.
///
/// The run loop works on a clone of the stored record, advancing it
/// instruction by instruction and replacing the stored record after every
/// step. On a bounds breach the working copy retreats to its last safe
/// position before being stored as lost.
#[derive(Clone, Debug)]
pub(crate) struct Rover {
    id: RoverId,
    position: Position,
    program: VecDeque<Instruction>,
    executed: VecDeque<Instruction>,
    state: RoverState,
    history: Vec<Position>,
}

impl Rover {
    /// Creates an idle rover at its landing position with no program.
    pub(crate) fn landed(id: RoverId, position: Position) -> Self {
        Self {
            id,
            position,
            program: VecDeque::new(),
            executed: VecDeque::new(),
            state: RoverState::Idle,
            history: Vec::new(),
        }
    }

    /// Identifier assigned at landing time.
    pub(crate) fn id(&self) -> RoverId {
        self.id
    }

    /// Current location and heading.
    pub(crate) fn position(&self) -> Position {
        self.position
    }

    /// Current lifecycle state.
    pub(crate) fn state(&self) -> RoverState {
        self.state
    }

    /// Hands the rover its program and switches it to `Moving`.
    pub(crate) fn begin_program(&mut self, instructions: Vec<Instruction>) {
        self.program = instructions.into();
        self.state = RoverState::Moving;
    }

    /// Pops the next pending instruction, FIFO.
    pub(crate) fn next_instruction(&mut self) -> Option<Instruction> {
        self.program.pop_front()
    }

    /// Records a completed instruction and moves the rover to `next`.
    ///
    /// The prior position enters the movement history only when the cell
    /// actually changed; turn-only repositioning is not history. Executed
    /// instructions are kept most-recent-first.
    pub(crate) fn advance_to(&mut self, instruction: Instruction, next: Position) {
        if !self.position.same_cell(&next) {
            self.history.push(self.position);
        }
        self.executed.push_front(instruction);
        self.position = next;
    }

    /// Rolls the most recent advance back to `prior`.
    ///
    /// Used when the bounds check rejects the advanced position: the
    /// fatal instruction leaves the executed list, its history entry (if
    /// the cell changed) is dropped, and the rover returns to its last
    /// safe position.
    pub(crate) fn retreat_to(&mut self, prior: Position) {
        let _ = self.executed.pop_front();
        if !self.position.same_cell(&prior) {
            let _ = self.history.pop();
        }
        self.position = prior;
    }

    /// Marks the rover as fallen off the planet; terminal.
    pub(crate) fn mark_lost(&mut self) {
        self.state = RoverState::Lost;
    }

    /// Marks the rover as having consumed its whole program safely.
    pub(crate) fn mark_finished(&mut self) {
        self.state = RoverState::Finished;
    }

    /// Pending instructions in execution order.
    pub(crate) fn remaining(&self) -> impl Iterator<Item = Instruction> + '_ {
        self.program.iter().copied()
    }

    /// Executed instructions, most recent first.
    pub(crate) fn executed(&self) -> impl Iterator<Item = Instruction> + '_ {
        self.executed.iter().copied()
    }

    /// Cells occupied immediately before each completed move.
    pub(crate) fn history(&self) -> &[Position] {
        &self.history
    }
}
