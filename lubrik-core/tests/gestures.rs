//! Drag gestures resolved against a puzzle seen through identity matrices.

use lubrik_core::gesture::turn_from_places;
use lubrik_core::{
    Axis, Camera, DragGesture, DragTracker, GestureOutcome, GestureRejection, GestureResolver,
    Mask3, MouseButtons, Puzzle, PuzzleError, TickOutcome, Vector2, Vector3,
};

fn drag(start: (f64, f64), end: (f64, f64), buttons: MouseButtons) -> DragGesture {
    DragGesture {
        start: Vector2::new(start.0, start.1),
        end: Vector2::new(end.0, end.1),
        buttons,
    }
}

#[test]
fn horizontal_drag_queues_a_quarter_turn() -> Result<(), PuzzleError> {
    let mut puzzle = Puzzle::build(Vector3::ZERO, [3, 3, 3], 0.05)?;
    let resolver = GestureResolver::for_puzzle(&puzzle);

    let outcome = resolver.resolve(&mut puzzle, &drag((0.0, 0.0), (0.6, 0.0), MouseButtons::PRIMARY));
    let GestureOutcome::Queued(action) = outcome else {
        panic!("expected a queued turn, got {outcome:?}");
    };
    assert_eq!(action.place(), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(action.cube_mask(), Mask3::axis(Axis::X));
    assert_eq!(puzzle.pending_turns(), 1);
    assert_eq!(puzzle.actions()[0].duration_ms(), 300.0);

    assert_eq!(puzzle.tick(0.0), TickOutcome::Prepared);
    assert_eq!(puzzle.active_turn().unwrap().line().len(), 9);
    assert_eq!(puzzle.tick(300.0), TickOutcome::Committed(action));
    Ok(())
}

#[test]
fn diagonal_drag_is_rejected() -> Result<(), PuzzleError> {
    let mut puzzle = Puzzle::build(Vector3::ZERO, [3, 3, 3], 0.05)?;
    let resolver = GestureResolver::new(100.0);

    let outcome = resolver.resolve(&mut puzzle, &drag((0.0, 0.0), (0.6, 0.6), MouseButtons::PRIMARY));
    assert!(matches!(
        outcome,
        GestureOutcome::Rejected(GestureRejection::NotSingleAxis { .. })
    ));
    assert!(puzzle.is_idle());

    assert!(matches!(
        turn_from_places(Vector3::ZERO, Vector3::new(1.0, 1.0, 0.0)),
        Err(GestureRejection::NotSingleAxis { .. })
    ));
    Ok(())
}

#[test]
fn drags_off_the_puzzle_or_without_buttons_are_rejected() -> Result<(), PuzzleError> {
    let mut puzzle = Puzzle::build(Vector3::ZERO, [3, 3, 3], 0.05)?;
    let resolver = GestureResolver::new(100.0);

    let cases = [
        (drag((0.0, 0.0), (0.6, 0.0), MouseButtons::empty()), GestureRejection::NoButton),
        (drag((1.5, 0.0), (0.0, 0.0), MouseButtons::PRIMARY), GestureRejection::StartOffPuzzle),
        (drag((0.0, 0.0), (0.35, 0.0), MouseButtons::PRIMARY), GestureRejection::EndOffPuzzle),
    ];
    for (gesture, reason) in cases {
        assert_eq!(
            resolver.resolve(&mut puzzle, &gesture),
            GestureOutcome::Rejected(reason)
        );
    }
    assert!(puzzle.is_idle());
    Ok(())
}

#[test]
fn tracked_drag_through_a_camera() -> Result<(), PuzzleError> {
    let mut puzzle = Puzzle::build(Vector3::ZERO, [3, 3, 3], 0.05)?;
    let camera = Camera::new(600, 600);
    let inverse = camera.inverse_view_projection().unwrap();
    puzzle.set_view_projection(camera.view_projection(), inverse);

    // The default camera looks down -z, so the front (+z) face is hit.
    assert_eq!(
        puzzle.viewport_pick(Vector2::new(0.0, 0.0)),
        Some(Vector3::new(0.0, 0.0, 1.0))
    );

    let edge = camera.project_to_screen(Vector3::new(2.0 / 3.0, 0.0, 0.95), 600, 600).unwrap();
    let (ex, ey) = camera.screen_to_ndc(edge.0, edge.1, 600, 600);

    let mut tracker = DragTracker::new();
    tracker.press(Vector2::new(0.0, 0.0), MouseButtons::PRIMARY);
    tracker.move_to(Vector2::new(ex / 2.0, ey), MouseButtons::PRIMARY);
    let gesture = tracker.release(Vector2::new(ex, ey)).unwrap();

    let outcome = GestureResolver::for_puzzle(&puzzle).resolve(&mut puzzle, &gesture);
    let GestureOutcome::Queued(action) = outcome else {
        panic!("expected a queued turn, got {outcome:?}");
    };
    assert_eq!(action.place(), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(action.cube_mask(), Mask3::axis(Axis::X));
    Ok(())
}

#[test]
fn orbited_camera_picks_side_and_top_stickers() -> Result<(), PuzzleError> {
    let mut puzzle = Puzzle::build(Vector3::ZERO, [3, 3, 3], 0.05)?;
    let mut camera = Camera::new(600, 600);
    camera.orbit(0.15, 0.1);
    let inverse = camera.inverse_view_projection().unwrap();
    puzzle.set_view_projection(camera.view_projection(), inverse);

    let side = camera.position.x.signum();
    let top = camera.position.y.signum();
    let stickers = [
        (Vector3::new(side * 0.95, 0.0, 0.0), Vector3::new(side, 0.0, 0.0)),
        (Vector3::new(0.0, top * 0.95, 0.0), Vector3::new(0.0, top, 0.0)),
        (Vector3::new(0.0, 0.0, 0.95), Vector3::new(0.0, 0.0, 1.0)),
    ];
    for (sticker, place) in stickers {
        let (px, py, _) = camera.project_to_screen(sticker, 600, 600).unwrap();
        let (x, y) = camera.screen_to_ndc(px, py, 600, 600);
        assert_eq!(puzzle.viewport_pick(Vector2::new(x, y)), Some(place), "sticker {sticker:?}");
    }
    Ok(())
}
