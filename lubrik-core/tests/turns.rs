//! End-to-end turn animation scenarios.

use lubrik_core::{
    Action, Axis, CubeletId, Matrix4, Puzzle, PuzzleError, TickOutcome, TurnPhase, Vector3,
    QUARTER_TURN,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn sorted_places(puzzle: &Puzzle) -> Vec<[i64; 3]> {
    let mut places: Vec<[i64; 3]> = puzzle
        .cubelets()
        .map(|c| c.place.to_array().map(|v| (v * 2.0) as i64))
        .collect();
    places.sort();
    places
}

/// Prepare, half-way and commit of a quarter turn of the middle x layer.
#[test]
fn quarter_turn_of_middle_layer() -> Result<(), PuzzleError> {
    init_tracing();

    let mut puzzle = Puzzle::build(Vector3::ZERO, [3, 3, 3], 0.05)?;
    let before = sorted_places(&puzzle);
    let turn = Action::layer_turn(Axis::X, 0.0, QUARTER_TURN);
    puzzle.enqueue_turn(turn, 300.0);

    assert_eq!(puzzle.tick(0.0), TickOutcome::Prepared);
    assert!(puzzle.cubelets().all(|c| c.matrix == Matrix4::identity()));
    let active = puzzle.active_turn().unwrap();
    assert_eq!(active.phase(), TurnPhase::Prepared);
    assert_eq!(active.line().len(), 9);
    assert_eq!(active.snapshot().len(), 9);

    assert_eq!(puzzle.tick(150.0), TickOutcome::Animating { angle: 0.25 });
    let half = Matrix4::x_rotation(0.25).transpose();
    let mut moved = 0;
    for cubelet in puzzle.cubelets() {
        if cubelet.id.origin_place().x == 0.0 {
            assert!(cubelet.matrix.approx_eq(&half, 1e-12));
            moved += 1;
        } else {
            assert_eq!(cubelet.matrix, Matrix4::identity());
            assert_eq!(cubelet.place, cubelet.id.origin_place());
        }
    }
    assert_eq!(moved, 9);

    let edge = puzzle
        .cubelet(CubeletId::from_place(Vector3::new(0.0, 1.0, 0.0)))
        .unwrap();
    let diagonal = std::f64::consts::FRAC_1_SQRT_2;
    assert!(edge.place.approx_eq(Vector3::new(0.0, diagonal, -diagonal), 1e-12));

    assert_eq!(puzzle.tick(300.0), TickOutcome::Committed(turn));
    assert!(puzzle.is_idle());
    assert_eq!(puzzle.stopped_changing_at(), Some(300.0));

    let edge = puzzle
        .cubelet(CubeletId::from_place(Vector3::new(0.0, 1.0, 0.0)))
        .unwrap();
    assert_eq!(edge.place, Vector3::new(0.0, 0.0, -1.0));
    assert!(edge.matrix.approx_eq(&Matrix4::x_rotation(0.5).transpose(), 1e-12));
    assert_eq!(sorted_places(&puzzle), before);

    assert_eq!(puzzle.tick(400.0), TickOutcome::Idle);
    Ok(())
}

#[test]
fn four_quarter_turns_restore_the_puzzle() -> Result<(), PuzzleError> {
    init_tracing();

    let mut puzzle = Puzzle::build(Vector3::ZERO, [4, 4, 4], 0.05)?;
    for _ in 0..4 {
        puzzle.enqueue_turn(Action::layer_turn(Axis::Y, 1.5, QUARTER_TURN), 0.0);
    }
    let mut now = 0.0;
    while !puzzle.is_idle() {
        puzzle.tick(now);
        now += 16.0;
    }

    for cubelet in puzzle.cubelets() {
        assert_eq!(cubelet.place, cubelet.id.origin_place());
        assert!(cubelet.matrix.approx_eq(&Matrix4::identity(), 1e-12));
    }
    Ok(())
}

#[test]
fn scripted_turns_run_in_reading_order() -> Result<(), PuzzleError> {
    init_tracing();

    let mut puzzle = Puzzle::build(Vector3::ZERO, [3, 3, 3], 0.05)?;
    let turns = puzzle.enqueue_script("x[1] y[-1]' z[0]2", 10.0)?;
    assert_eq!(turns.len(), 3);
    assert_eq!(puzzle.pending_turns(), 3);

    let mut committed = Vec::new();
    let mut now = 0.0;
    while !puzzle.is_idle() {
        if let TickOutcome::Committed(action) = puzzle.tick(now) {
            committed.push(action);
        }
        now += 5.0;
    }
    assert_eq!(committed, turns);

    assert!(matches!(
        puzzle.enqueue_script("x[1] q", 10.0),
        Err(PuzzleError::Notation { .. })
    ));
    assert!(puzzle.is_idle());
    Ok(())
}

#[test]
fn offset_origin_turns_about_the_puzzle_centre() -> Result<(), PuzzleError> {
    let origin = Vector3::new(10.0, -2.0, 3.0);
    let mut puzzle = Puzzle::build(origin, [3, 3, 3], 0.05)?;
    puzzle.enqueue_turn(Action::layer_turn(Axis::Z, -1.0, QUARTER_TURN), 0.0);
    puzzle.tick(0.0);

    for posed in puzzle.posed_cubelets() {
        let expected = origin + posed.place * puzzle.grid_increment();
        assert!(posed.centroid().approx_eq(expected, 1e-12));
    }
    Ok(())
}
