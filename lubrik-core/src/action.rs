/// Turn requests and the runtime record of a queued turn
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cubelet::CubeletId;
use crate::mask::{Axis, Coord, Mask3};
use crate::matrix::Matrix4;
use crate::vector::Vector3;

/// Quarter turn, in π-radians.
pub const QUARTER_TURN: f64 = 0.5;

/// A single layer rotation. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    place: Vector3,
    cube_mask: Mask3,
    direction: Vector3,
    angle: f64,
}

impl Action {
    /// `place` picks the layer on the axes `cube_mask` fixes; the layer turns
    /// by `angle` π-radians about `direction`.
    pub fn new(place: Vector3, cube_mask: Mask3, direction: Vector3, angle: f64) -> Self {
        Self {
            place,
            cube_mask,
            direction,
            angle,
        }
    }

    /// Turn of the layer at lattice coordinate `layer` along `axis`, about
    /// that same axis.
    pub fn layer_turn(axis: Axis, layer: f64, angle: f64) -> Self {
        let mut place = [0.0; 3];
        place[axis.index()] = layer;
        Self::new(Vector3::from_array(place), Mask3::axis(axis), axis.unit(), angle)
    }

    pub fn place(&self) -> Vector3 {
        self.place
    }

    pub fn cube_mask(&self) -> Mask3 {
        self.cube_mask
    }

    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The place projected onto the mask: wildcard axes match any cubelet.
    pub fn selector(&self) -> Mask3 {
        self.place.mask(&self.cube_mask)
    }

    /// Rotation of `angle_pi` about this turn's direction.
    pub fn rotation(&self, angle_pi: f64) -> Matrix4 {
        Matrix4::rotation(self.direction * angle_pi)
    }
}

impl fmt::Display for Action {
    /// Turn notation (`x[-1]`, `y[0.5]'`, `z[1]2`) for single-axis turns.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selector = self.selector();
        let Some(axis) = selector.single_axis() else {
            return write!(
                f,
                "{} about {:?} by {}π",
                selector, self.direction, self.angle
            );
        };
        let layer = match selector.get(axis) {
            Coord::Fixed(v) => v,
            Coord::Wildcard => 0.0,
        };
        write!(f, "{}[{}]", axis.letter(), layer)?;
        if self.angle == -QUARTER_TURN {
            f.write_str("'")
        } else if self.angle == 2.0 * QUARTER_TURN {
            f.write_str("2")
        } else if self.angle == QUARTER_TURN {
            Ok(())
        } else {
            write!(f, "<{}>", self.angle)
        }
    }
}

/// Lifecycle of a queued turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Queued,
    Prepared,
    Animating,
    Committed,
}

/// Pre-turn pose and place of every cubelet a turn moves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnSnapshot {
    entries: BTreeMap<CubeletId, (Matrix4, Vector3)>,
}

impl TurnSnapshot {
    pub fn insert(&mut self, id: CubeletId, pose: Matrix4, place: Vector3) {
        self.entries.insert(id, (pose, place));
    }

    pub fn get(&self, id: CubeletId) -> Option<(Matrix4, Vector3)> {
        self.entries.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CubeletId, Matrix4, Vector3)> + '_ {
        self.entries
            .iter()
            .map(|(id, (pose, place))| (*id, *pose, *place))
    }
}

/// An action on the stack together with its animation state.
#[derive(Debug, Clone)]
pub struct TrackedAction {
    pub(crate) action: Action,
    pub(crate) duration_ms: f64,
    pub(crate) started_at: Option<f64>,
    pub(crate) last_viewed: f64,
    pub(crate) total_angle: f64,
    pub(crate) line: Vec<CubeletId>,
    pub(crate) phase: TurnPhase,
    pub(crate) snapshot: TurnSnapshot,
}

impl TrackedAction {
    pub fn new(action: Action, duration_ms: f64) -> Self {
        Self {
            action,
            duration_ms: duration_ms.max(0.0),
            started_at: None,
            last_viewed: 0.0,
            total_angle: 0.0,
            line: Vec::new(),
            phase: TurnPhase::Queued,
            snapshot: TurnSnapshot::default(),
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn started_at(&self) -> Option<f64> {
        self.started_at
    }

    pub fn last_viewed(&self) -> f64 {
        self.last_viewed
    }

    /// Angle applied so far, in π-radians.
    pub fn total_angle(&self) -> f64 {
        self.total_angle
    }

    /// Cubelets matched by the layer selector, resolved on prepare.
    pub fn line(&self) -> &[CubeletId] {
        &self.line
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn snapshot(&self) -> &TurnSnapshot {
        &self.snapshot
    }

    /// True once prepared and until committed.
    pub fn in_flight(&self) -> bool {
        matches!(self.phase, TurnPhase::Prepared | TurnPhase::Animating)
    }

    /// Interpolated angle at `elapsed_ms`; zero durations jump to the target.
    pub fn angle_at(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return self.action.angle;
        }
        self.action.angle * (elapsed_ms / self.duration_ms).min(1.0)
    }
}
