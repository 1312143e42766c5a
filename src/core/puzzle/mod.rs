/// Puzzle Resolvers: three independent mini state machines behind one host.
///
/// Each resolver only ever reports "solved". What solving means for the
/// story is declared by the puzzle's [`PuzzleOutcome`] and applied by the
/// engine.
pub mod code_entry;
pub mod grid_toggle;
pub mod ring_rotation;

use std::time::Duration;
use tracing::debug;

use crate::core::signal::{Cue, Signal, SignalQueue};
use crate::core::timer::{Timer, Timings};
use crate::schema::ids::PuzzleId;
use crate::schema::puzzle::{EggTone, PuzzleConfig, PuzzleKind, PuzzleOutcome};
use crate::schema::story::Effect;

use code_entry::{CodeEntry, CodeFeedback};
use grid_toggle::GridToggle;
use ring_rotation::RingRotation;

/// One player action on an open puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleInput {
    Digit(u8),
    Delete,
    Submit,
    Toggle { row: usize, col: usize },
    Rotate(usize),
}

#[derive(Debug, Clone)]
pub enum PuzzleState {
    CodeEntry(CodeEntry),
    GridToggle(GridToggle),
    RingRotation(RingRotation),
}

impl PuzzleState {
    pub fn from_kind(kind: &PuzzleKind, timings: &Timings) -> Self {
        match kind {
            PuzzleKind::CodeEntry { code, easter_eggs } => {
                Self::CodeEntry(CodeEntry::new(code, easter_eggs, timings.code_feedback()))
            }
            PuzzleKind::GridToggle {
                size,
                initially_off,
            } => Self::GridToggle(GridToggle::new(*size, initially_off)),
            PuzzleKind::RingRotation { scramble } => {
                Self::RingRotation(RingRotation::new(scramble))
            }
        }
    }

    pub fn is_solved(&self) -> bool {
        match self {
            Self::CodeEntry(pad) => pad.is_solved(),
            Self::GridToggle(grid) => grid.is_solved(),
            Self::RingRotation(rings) => rings.is_solved(),
        }
    }
}

/// A puzzle currently open on screen, freshly initialised from its config.
#[derive(Debug, Clone)]
pub struct ActivePuzzle {
    id: PuzzleId,
    description: String,
    outcome: Option<PuzzleOutcome>,
    state: PuzzleState,
    success_delay: Duration,
    success: Option<Timer>,
}

impl ActivePuzzle {
    /// Open a puzzle. A config that starts out solved begins its success
    /// delay immediately.
    pub fn open(config: &PuzzleConfig, timings: &Timings, signals: &mut SignalQueue) -> Self {
        let mut puzzle = Self {
            id: config.id.clone(),
            description: config.description.clone(),
            outcome: config.outcome.clone(),
            state: PuzzleState::from_kind(&config.kind, timings),
            success_delay: timings.puzzle_success(),
            success: None,
        };
        if puzzle.state.is_solved() {
            puzzle.mark_solved(signals);
        }
        puzzle
    }

    pub fn id(&self) -> &PuzzleId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn outcome(&self) -> Option<&PuzzleOutcome> {
        self.outcome.as_ref()
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn is_solved(&self) -> bool {
        self.state.is_solved()
    }

    /// True while the success delay is running; the puzzle can be neither
    /// played nor closed.
    pub fn is_settling(&self) -> bool {
        self.success.is_some()
    }

    /// Apply one input. Returns true if this input solved the puzzle.
    /// Inputs for a different kind of puzzle are ignored.
    pub fn handle(&mut self, input: PuzzleInput, signals: &mut SignalQueue) -> bool {
        if self.is_solved() {
            return false;
        }
        let accepted = match (&mut self.state, input) {
            (PuzzleState::CodeEntry(pad), PuzzleInput::Digit(d)) => {
                let pressed = pad.press(d);
                if pressed {
                    signals.cue(Cue::Click);
                    signals.push(Signal::CodeDisplay(pad.display().to_string()));
                }
                pressed
            }
            (PuzzleState::CodeEntry(pad), PuzzleInput::Delete) => {
                let deleted = pad.delete();
                if deleted {
                    signals.cue(Cue::Click);
                    signals.push(Signal::CodeDisplay(pad.display().to_string()));
                }
                deleted
            }
            (PuzzleState::CodeEntry(pad), PuzzleInput::Submit) => {
                let feedback = pad.submit();
                debug!(puzzle = %self.id, ?feedback, "code submitted");
                match feedback {
                    CodeFeedback::Accepted => {}
                    CodeFeedback::Rejected => {
                        signals.cue(Cue::Failure);
                        signals.push(Signal::CodeDisplay(String::new()));
                    }
                    CodeFeedback::Notable { display, tone } => {
                        match tone {
                            EggTone::Ominous => {
                                signals.cue(Cue::Heartbeat);
                                signals.push(Signal::Effect(Effect::Shake));
                            }
                            EggTone::Mocking => signals.cue(Cue::Failure),
                        }
                        signals.push(Signal::CodeDisplay(display));
                    }
                    CodeFeedback::Ignored => return false,
                }
                true
            }
            (PuzzleState::GridToggle(grid), PuzzleInput::Toggle { row, col }) => {
                let flipped = grid.toggle(row, col);
                if flipped.is_some() {
                    signals.cue(Cue::Click);
                }
                flipped.is_some()
            }
            (PuzzleState::RingRotation(rings), PuzzleInput::Rotate(ring)) => {
                let rotated = rings.rotate(ring);
                if rotated.is_some() {
                    signals.cue(Cue::Click);
                }
                rotated.is_some()
            }
            _ => false,
        };
        if accepted && self.is_solved() {
            self.mark_solved(signals);
            return true;
        }
        false
    }

    fn mark_solved(&mut self, signals: &mut SignalQueue) {
        debug!(puzzle = %self.id, "puzzle solved");
        signals.cue(Cue::Success);
        signals.push(Signal::PuzzleSolved);
        self.success = Some(Timer::new(self.success_delay));
    }

    /// Advance puzzle timers. Returns true exactly once, when the success
    /// delay has elapsed and control should return to the host.
    pub fn tick(&mut self, dt: Duration, signals: &mut SignalQueue) -> bool {
        if let PuzzleState::CodeEntry(pad) = &mut self.state {
            if pad.tick(dt) {
                signals.push(Signal::CodeDisplay(pad.display().to_string()));
            }
        }
        let settled = match &mut self.success {
            Some(timer) => timer.tick(dt),
            None => false,
        };
        if settled {
            self.success = None;
        }
        settled
    }
}
