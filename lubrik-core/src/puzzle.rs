/// The puzzle container: cubelets, the turn stack and viewport picking
use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::action::{Action, TrackedAction, TurnPhase, QUARTER_TURN};
use crate::config::LubrikConfig;
use crate::cubelet::{Cubelet, CubeletId, Pointer, PosedCubelet};
use crate::error::PuzzleError;
use crate::mask::{Axis, Mask3};
use crate::matrix::Matrix4;
use crate::notation::parse_script;
use crate::vector::{symround, Vector2, Vector3};

/// What a call to [`Puzzle::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No turn queued.
    Idle,
    /// A turn became active and snapshotted its layer; poses are unchanged.
    Prepared,
    /// The active turn moved to `angle` π-radians.
    Animating { angle: f64 },
    /// The active turn reached its target and was popped.
    Committed(Action),
    /// Time did not advance since the last tick.
    Stalled,
}

/// Where a viewport ray meets the puzzle's bounding cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceHit {
    pub axis: Axis,
    /// `-1` or `1`: which face along `axis` was hit.
    pub side: f64,
    /// World-space hit point on the face plane.
    pub point: Vector3,
    /// Lattice place of the cubelet under the hit point.
    pub place: Option<Vector3>,
}

#[derive(Debug, Clone)]
pub struct Puzzle {
    origin: Vector3,
    dimensions: [usize; 3],
    padding: f64,
    increment: Vector3,
    size: Vector3,
    cubes: BTreeMap<CubeletId, Cubelet>,
    /// Last pushed is on top.
    actions: Vec<TrackedAction>,
    view_projection: Matrix4,
    inverse_view_projection: Matrix4,
    pointer: Pointer,
    stopped_changing_at: Option<f64>,
    turn_duration_ms: f64,
    shuffle_angles: Vec<f64>,
}

impl Puzzle {
    /// Lays out one cubelet per lattice cell of a `dimensions` grid centred
    /// on `origin`, spanning two world units per axis.
    pub fn build(origin: Vector3, dimensions: [usize; 3], padding: f64) -> Result<Self, PuzzleError> {
        LubrikConfig {
            dimensions,
            origin: origin.to_array(),
            padding,
            ..LubrikConfig::default()
        }
        .validate()?;

        let dims = Vector3::new(
            dimensions[0] as f64,
            dimensions[1] as f64,
            dimensions[2] as f64,
        );
        let increment = Vector3::splat(2.0) / dims;
        let size = increment - padding * 2.0;

        let mut cubes = BTreeMap::new();
        for i in 0..dimensions[0] {
            for j in 0..dimensions[1] {
                for k in 0..dimensions[2] {
                    let index = Vector3::new(i as f64, j as f64, k as f64);
                    let place = index - dims / 2.0 + 0.5;
                    let position = origin + place * increment;
                    let cubelet = Cubelet::new(place, position, size);
                    cubes.insert(cubelet.id, cubelet);
                }
            }
        }
        info!(?dimensions, cubelets = cubes.len(), "Built puzzle");

        Ok(Self {
            origin,
            dimensions,
            padding,
            increment,
            size,
            cubes,
            actions: Vec::new(),
            view_projection: Matrix4::identity(),
            inverse_view_projection: Matrix4::identity(),
            pointer: Pointer::new(origin),
            stopped_changing_at: None,
            turn_duration_ms: LubrikConfig::default().turn_duration_ms,
            shuffle_angles: vec![QUARTER_TURN],
        })
    }

    pub fn from_config(config: &LubrikConfig) -> Result<Self, PuzzleError> {
        config.validate()?;
        let mut puzzle = Self::build(
            Vector3::from_array(config.origin),
            config.dimensions,
            config.padding,
        )?;
        puzzle.turn_duration_ms = config.turn_duration_ms;
        puzzle.shuffle_angles = config.shuffle_angles.clone();
        Ok(puzzle)
    }

    pub fn origin(&self) -> Vector3 {
        self.origin
    }

    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Distance between neighbouring cell centres, per axis.
    pub fn grid_increment(&self) -> Vector3 {
        self.increment
    }

    /// Default duration for gesture and scripted turns.
    pub fn turn_duration_ms(&self) -> f64 {
        self.turn_duration_ms
    }

    pub fn cubelet(&self, id: CubeletId) -> Option<&Cubelet> {
        self.cubes.get(&id)
    }

    pub fn cubelets(&self) -> impl Iterator<Item = &Cubelet> {
        self.cubes.values()
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Read-only poses for the renderer; consistent between ticks.
    pub fn posed_cubelets(&self) -> Vec<PosedCubelet> {
        self.cubes.values().map(|c| c.posed(self.origin)).collect()
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Time of the commit that emptied the turn stack, if nothing moved since.
    pub fn stopped_changing_at(&self) -> Option<f64> {
        self.stopped_changing_at
    }

    pub fn pending_turns(&self) -> usize {
        self.actions.len()
    }

    pub fn actions(&self) -> &[TrackedAction] {
        &self.actions
    }

    /// The turn the next tick advances.
    pub fn active_turn(&self) -> Option<&TrackedAction> {
        self.active_index().map(|i| &self.actions[i])
    }

    pub fn is_idle(&self) -> bool {
        self.actions.is_empty()
    }

    /// Cubelets whose place matches `place` on every axis `axis_mask` fixes.
    pub fn resolve_layer(&self, place: Vector3, axis_mask: &Mask3) -> Vec<CubeletId> {
        self.resolve_selector(&place.mask(axis_mask))
    }

    pub fn resolve_selector(&self, selector: &Mask3) -> Vec<CubeletId> {
        self.cubes
            .values()
            .filter(|c| selector.matches(c.place))
            .map(|c| c.id)
            .collect()
    }

    pub fn enqueue_turn(&mut self, action: Action, duration_ms: f64) {
        debug!(turn = %action, duration_ms, "Turn queued");
        self.actions.push(TrackedAction::new(action, duration_ms));
        self.stopped_changing_at = None;
    }

    /// Parses `script` and queues its turns in reading order.
    ///
    /// Turns are pushed last-first so the first written turn runs first.
    pub fn enqueue_script(&mut self, script: &str, duration_ms: f64) -> Result<Vec<Action>, PuzzleError> {
        let turns = parse_script(script)?;
        for action in turns.iter().rev() {
            self.enqueue_turn(*action, duration_ms);
        }
        Ok(turns)
    }

    /// In-flight turns stay active until they commit; otherwise the top of
    /// the stack is next.
    fn active_index(&self) -> Option<usize> {
        self.actions
            .iter()
            .rposition(TrackedAction::in_flight)
            .or_else(|| self.actions.len().checked_sub(1))
    }

    /// Advances the active turn to wall-clock time `now` (milliseconds).
    pub fn tick(&mut self, now: f64) -> TickOutcome {
        let Some(index) = self.active_index() else {
            return TickOutcome::Idle;
        };

        if self.actions[index].phase == TurnPhase::Queued {
            self.prepare(index, now);
            if self.actions[index].duration_ms <= 0.0 {
                return self.commit(index, now);
            }
            return TickOutcome::Prepared;
        }

        let tracked = &mut self.actions[index];
        if now <= tracked.last_viewed {
            return TickOutcome::Stalled;
        }
        tracked.last_viewed = now;
        let elapsed = now - tracked.started_at.unwrap_or(now);
        if elapsed >= tracked.duration_ms {
            return self.commit(index, now);
        }

        let angle = tracked.angle_at(elapsed);
        tracked.total_angle = angle;
        tracked.phase = TurnPhase::Animating;
        let rotation = tracked.action.rotation(angle);
        let inverse = rotation.transpose();
        for (id, pose, place) in tracked.snapshot.iter() {
            if let Some(cube) = self.cubes.get_mut(&id) {
                cube.matrix = pose * inverse;
                cube.place = rotation.transform_vector(place);
            }
        }
        trace!(angle, elapsed, "Turn step");
        TickOutcome::Animating { angle }
    }

    fn prepare(&mut self, index: usize, now: f64) {
        let line = self.resolve_selector(&self.actions[index].action.selector());
        let tracked = &mut self.actions[index];
        tracked.started_at = Some(now);
        tracked.last_viewed = now;
        for id in &line {
            if let Some(cube) = self.cubes.get(id) {
                tracked.snapshot.insert(*id, cube.matrix, cube.place);
            }
        }
        tracked.line = line;
        tracked.phase = TurnPhase::Prepared;
        debug!(turn = %tracked.action, cubelets = tracked.line.len(), "Turn prepared");
    }

    fn commit(&mut self, index: usize, now: f64) -> TickOutcome {
        let mut tracked = self.actions.remove(index);
        let angle = tracked.action.angle();
        let rotation = tracked.action.rotation(angle);
        let inverse = rotation.transpose();
        for (id, pose, place) in tracked.snapshot.iter() {
            if let Some(cube) = self.cubes.get_mut(&id) {
                cube.matrix = pose * inverse;
                cube.place = (rotation.transform_vector(place) * 2.0).symround() * 0.5;
            }
        }
        tracked.phase = TurnPhase::Committed;
        debug!(turn = %tracked.action, "Turn committed");

        if self.actions.is_empty() {
            self.stopped_changing_at = Some(now);
        }
        TickOutcome::Committed(tracked.action)
    }

    /// Supplies this frame's view-projection matrix and its inverse.
    pub fn set_view_projection(&mut self, view_projection: Matrix4, inverse: Matrix4) {
        self.view_projection = view_projection;
        self.inverse_view_projection = inverse;
    }

    pub fn view_projection(&self) -> Matrix4 {
        self.view_projection
    }

    pub fn inverse_view_projection(&self) -> Matrix4 {
        self.inverse_view_projection
    }

    /// Casts the ray under a normalised screen position against the face of
    /// the puzzle it enters first.
    ///
    /// A ray that misses the puzzle still reports where it crosses the plane
    /// of its dominant axis, with no place.
    pub fn face_hit(&self, screen: Vector2) -> Option<FaceHit> {
        let near = self
            .inverse_view_projection
            .transform_point(Vector3::new(screen.x, screen.y, -1.0))?;
        let far = self
            .inverse_view_projection
            .transform_point(Vector3::new(screen.x, screen.y, 1.0))?;
        let dir = far - near;
        let extent = 1.0 - self.padding;

        let crossing = |axis: Axis| -> Option<(f64, f64, Vector3)> {
            let along = axis.component(dir);
            if along == 0.0 {
                return None;
            }
            let side = -along.signum();
            let plane = axis.component(self.origin) + side * extent;
            let t = (plane - axis.component(near)) / along;
            Some((t, side, near + dir * t))
        };

        let entered = Axis::ALL
            .into_iter()
            .filter_map(|axis| crossing(axis).map(|(t, side, point)| (axis, t, side, point)))
            .filter(|(axis, t, _, point)| {
                *t >= 0.0
                    && Axis::ALL.into_iter().filter(|a| a != axis).all(|a| {
                        (a.component(*point) - a.component(self.origin)).abs() <= extent + 1e-9
                    })
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((axis, _, side, point)) = entered else {
            let axis = Axis::ALL
                .into_iter()
                .max_by(|a, b| a.component(dir).abs().total_cmp(&b.component(dir).abs()))?;
            let (_, side, point) = crossing(axis)?;
            return Some(FaceHit {
                axis,
                side,
                point,
                place: None,
            });
        };

        let n = self.dimensions[axis.index()] as f64;
        let face = side * (n - 1.0) / 2.0;
        let half = self.size / 2.0;
        let place = self
            .cubes
            .values()
            .filter(|c| symround(axis.component(c.place) * 2.0) == symround(face * 2.0))
            .find(|c| {
                let centre = self.origin + c.place * self.increment;
                Axis::ALL.into_iter().filter(|a| *a != axis).all(|a| {
                    (a.component(point) - a.component(centre)).abs() <= a.component(half)
                })
            })
            .map(|c| (c.place * 2.0).symround() * 0.5);

        Some(FaceHit {
            axis,
            side,
            point,
            place,
        })
    }

    /// Lattice place of the cubelet under a normalised screen position.
    pub fn viewport_pick(&self, screen: Vector2) -> Option<Vector3> {
        self.face_hit(screen).and_then(|hit| hit.place)
    }

    /// Moves the pointer onto the face under `screen`.
    pub fn hover(&mut self, screen: Vector2) -> Option<Vector3> {
        let Some(hit) = self.face_hit(screen) else {
            self.pointer.hide();
            return None;
        };
        let flat = Vector3::splat(1.0) - hit.axis.unit();
        match hit.place {
            Some(place) => {
                let centre = self.origin + place * self.increment;
                let lift = hit.axis.component(hit.point) - hit.axis.component(centre);
                let centre = centre + hit.axis.unit() * lift;
                self.pointer.update(centre, self.size * flat, Some(place));
            }
            None => self.pointer.update(hit.point, self.increment * flat, None),
        }
        self.pointer.show();
        hit.place
    }

    pub fn hide_pointer(&mut self) {
        self.pointer.hide();
    }

    /// Queues `turn_count` random single-layer turns.
    pub fn shuffle(&mut self, turn_count: usize, duration_ms: f64) -> Vec<Action> {
        self.shuffle_with(&mut rand::thread_rng(), turn_count, duration_ms)
    }

    pub fn shuffle_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        turn_count: usize,
        duration_ms: f64,
    ) -> Vec<Action> {
        let turns: Vec<Action> = (0..turn_count)
            .map(|_| {
                let axis = Axis::ALL[rng.gen_range(0..3)];
                let n = self.dimensions[axis.index()];
                let index = rng.gen_range(0..n) as f64;
                let layer = index - n as f64 / 2.0 + 0.5;
                let angle = *self.shuffle_angles.choose(rng).unwrap_or(&QUARTER_TURN);
                Action::layer_turn(axis, layer, angle)
            })
            .collect();
        for action in &turns {
            self.enqueue_turn(*action, duration_ms);
        }
        info!(turns = turn_count, duration_ms, "Shuffle queued");
        turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Coord;

    fn cube(n: usize) -> Puzzle {
        Puzzle::build(Vector3::ZERO, [n; 3], 0.05).unwrap()
    }

    #[test]
    fn test_build_unique_places() {
        let puzzle = cube(3);
        assert_eq!(puzzle.len(), 27);
        let even = cube(4);
        assert_eq!(even.len(), 64);
        assert!(even
            .cubelets()
            .all(|c| c.place.to_array().iter().all(|v| v.abs() == 0.5 || v.abs() == 1.5)));
    }

    #[test]
    fn test_build_spacing() {
        let puzzle = cube(3);
        let corner = puzzle.cubelet(CubeletId::from_place(Vector3::splat(1.0))).unwrap();
        let inc = 2.0 / 3.0;
        assert!(corner.position.approx_eq(Vector3::splat(inc), 1e-12));
        assert!(corner.size.approx_eq(Vector3::splat(inc - 0.1), 1e-12));
    }

    #[test]
    fn test_build_rejects_bad_input() {
        assert!(matches!(
            Puzzle::build(Vector3::ZERO, [0, 3, 3], 0.05),
            Err(PuzzleError::InvalidDimensions(_))
        ));
        assert!(matches!(
            Puzzle::build(Vector3::ZERO, [2, 3, 3], 0.05),
            Err(PuzzleError::InvalidDimensions([2, 3, 3]))
        ));
        assert!(matches!(
            Puzzle::build(Vector3::ZERO, [3, 3, 3], 0.4),
            Err(PuzzleError::InvalidPadding { .. })
        ));
    }

    #[test]
    fn test_resolve_layer() {
        let puzzle = cube(3);
        let layer = puzzle.resolve_layer(Vector3::ZERO, &Mask3::axis(Axis::X));
        assert_eq!(layer.len(), 9);
        assert!(layer.iter().all(|id| id.origin_place().x == 0.0));

        let line = puzzle.resolve_selector(&Mask3::new(
            Coord::Fixed(1.0),
            Coord::Fixed(-1.0),
            Coord::Wildcard,
        ));
        assert_eq!(line.len(), 3);
        assert_eq!(puzzle.resolve_selector(&Mask3::any()).len(), 27);
    }

    #[test]
    fn test_idle_tick() {
        let mut puzzle = cube(2);
        assert_eq!(puzzle.tick(0.0), TickOutcome::Idle);
    }

    #[test]
    fn test_zero_duration_commits_on_first_tick() {
        let mut puzzle = cube(3);
        puzzle.enqueue_turn(Action::layer_turn(Axis::Z, 1.0, QUARTER_TURN), 0.0);
        assert!(matches!(puzzle.tick(5.0), TickOutcome::Committed(_)));
        assert!(puzzle.is_idle());
        assert_eq!(puzzle.stopped_changing_at(), Some(5.0));
    }

    #[test]
    fn test_stalled_when_time_does_not_advance() {
        let mut puzzle = cube(3);
        puzzle.enqueue_turn(Action::layer_turn(Axis::Y, 0.0, QUARTER_TURN), 100.0);
        assert_eq!(puzzle.tick(10.0), TickOutcome::Prepared);
        assert_eq!(puzzle.tick(10.0), TickOutcome::Stalled);
        assert_eq!(puzzle.tick(9.0), TickOutcome::Stalled);
    }

    #[test]
    fn test_in_flight_turn_is_pinned() {
        let mut puzzle = cube(3);
        let first = Action::layer_turn(Axis::X, 1.0, QUARTER_TURN);
        let second = Action::layer_turn(Axis::Y, 1.0, QUARTER_TURN);
        puzzle.enqueue_turn(first, 100.0);
        puzzle.tick(0.0);
        puzzle.enqueue_turn(second, 100.0);
        assert_eq!(puzzle.active_turn().unwrap().action(), &first);
        assert_eq!(puzzle.tick(100.0), TickOutcome::Committed(first));
        assert_eq!(puzzle.active_turn().unwrap().action(), &second);
    }

    #[test]
    fn test_last_pushed_activates_first() {
        let mut puzzle = cube(3);
        let first = Action::layer_turn(Axis::X, 1.0, QUARTER_TURN);
        let second = Action::layer_turn(Axis::Y, 1.0, QUARTER_TURN);
        puzzle.enqueue_turn(first, 0.0);
        puzzle.enqueue_turn(second, 0.0);
        assert_eq!(puzzle.tick(0.0), TickOutcome::Committed(second));
        assert_eq!(puzzle.tick(1.0), TickOutcome::Committed(first));
    }

    #[test]
    fn test_enqueue_clears_stopped_time() {
        let mut puzzle = cube(2);
        puzzle.enqueue_turn(Action::layer_turn(Axis::X, 0.5, QUARTER_TURN), 0.0);
        puzzle.tick(1.0);
        assert_eq!(puzzle.stopped_changing_at(), Some(1.0));
        puzzle.enqueue_turn(Action::layer_turn(Axis::X, 0.5, QUARTER_TURN), 0.0);
        assert_eq!(puzzle.stopped_changing_at(), None);
    }

    #[test]
    fn test_pick_with_identity_matrices() {
        let puzzle = cube(3);
        assert_eq!(
            puzzle.viewport_pick(Vector2::new(0.0, 0.0)),
            Some(Vector3::new(0.0, 0.0, -1.0))
        );
        assert_eq!(
            puzzle.viewport_pick(Vector2::new(0.5, 0.0)),
            Some(Vector3::new(1.0, 0.0, -1.0))
        );
        assert_eq!(puzzle.viewport_pick(Vector2::new(0.35, 0.0)), None);
        assert_eq!(puzzle.viewport_pick(Vector2::new(2.0, 0.0)), None);
    }

    #[test]
    fn test_hover_moves_pointer() {
        let mut puzzle = cube(3);
        let place = puzzle.hover(Vector2::new(0.6, -0.6));
        assert_eq!(place, Some(Vector3::new(1.0, -1.0, -1.0)));
        let pointer = puzzle.pointer();
        assert!(pointer.visible);
        assert_eq!(pointer.place, place);
        assert!((pointer.position.z + 0.95).abs() < 1e-12);
        assert_eq!(pointer.size.z, 0.0);
    }
}
