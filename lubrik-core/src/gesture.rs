/// Drag tracking and gesture-to-turn resolution
use bitflags::bitflags;
use tracing::debug;

use crate::action::{Action, QUARTER_TURN};
use crate::puzzle::Puzzle;
use crate::vector::{Vector2, Vector3};

bitflags! {
    /// Held mouse buttons, bit layout of the DOM `MouseEvent.buttons` field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MouseButtons: u8 {
        const PRIMARY = 1 << 0;
        const SECONDARY = 1 << 1;
        const AUXILIARY = 1 << 2;
        const BACK = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

/// A completed drag in normalised screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub start: Vector2,
    pub end: Vector2,
    pub buttons: MouseButtons,
}

/// Accumulates input events between press and release.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    start: Option<Vector2>,
    last: Option<Vector2>,
    buttons: MouseButtons,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, position: Vector2, buttons: MouseButtons) {
        if self.start.is_none() {
            self.start = Some(position);
        }
        self.last = Some(position);
        self.buttons |= buttons;
    }

    pub fn move_to(&mut self, position: Vector2, buttons: MouseButtons) {
        if self.start.is_some() {
            self.last = Some(position);
            self.buttons |= buttons;
        }
    }

    /// Ends the drag; `None` if no press was seen.
    pub fn release(&mut self, position: Vector2) -> Option<DragGesture> {
        let start = self.start.take()?;
        let gesture = DragGesture {
            start,
            end: position,
            buttons: self.buttons,
        };
        self.cancel();
        Some(gesture)
    }

    pub fn cancel(&mut self) {
        self.start = None;
        self.last = None;
        self.buttons = MouseButtons::empty();
    }

    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    pub fn last_position(&self) -> Option<Vector2> {
        self.last
    }
}

/// Why a gesture produced no turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureRejection {
    NoButton,
    StartOffPuzzle,
    EndOffPuzzle,
    /// The drag spanned `length` axes instead of exactly one.
    NotSingleAxis { length: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    Queued(Action),
    Rejected(GestureRejection),
}

/// Quarter turn of the layer through `start` about the single axis the drag
/// moved along.
pub fn turn_from_places(start: Vector3, end: Vector3) -> Result<Action, GestureRejection> {
    let axis_mask = (end - start).to_mask();
    let length = axis_mask.length();
    if length != 1.0 {
        return Err(GestureRejection::NotSingleAxis { length });
    }
    Ok(Action::new(start, axis_mask, axis_mask.to_vector(0.0), QUARTER_TURN))
}

/// Turns drags into queued turns on a puzzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureResolver {
    pub duration_ms: f64,
}

impl GestureResolver {
    pub fn new(duration_ms: f64) -> Self {
        Self { duration_ms }
    }

    pub fn for_puzzle(puzzle: &Puzzle) -> Self {
        Self::new(puzzle.turn_duration_ms())
    }

    pub fn resolve(&self, puzzle: &mut Puzzle, gesture: &DragGesture) -> GestureOutcome {
        match self.turn_for(puzzle, gesture) {
            Ok(action) => {
                puzzle.enqueue_turn(action, self.duration_ms);
                GestureOutcome::Queued(action)
            }
            Err(reason) => {
                debug!(?reason, "Gesture rejected");
                GestureOutcome::Rejected(reason)
            }
        }
    }

    fn turn_for(&self, puzzle: &Puzzle, gesture: &DragGesture) -> Result<Action, GestureRejection> {
        if gesture.buttons.is_empty() {
            return Err(GestureRejection::NoButton);
        }
        let start = puzzle
            .viewport_pick(gesture.start)
            .ok_or(GestureRejection::StartOffPuzzle)?;
        let end = puzzle
            .viewport_pick(gesture.end)
            .ok_or(GestureRejection::EndOffPuzzle)?;
        turn_from_places(start, end)
    }
}
