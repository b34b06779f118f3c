//! Seeded shuffle scenarios.

use rand::rngs::StdRng;
use rand::SeedableRng;

use lubrik_core::{LubrikConfig, Puzzle, PuzzleError, TickOutcome, QUARTER_TURN};

#[test]
fn shuffle_queues_single_axis_turns() -> Result<(), PuzzleError> {
    let mut puzzle = Puzzle::from_config(&LubrikConfig::default())?;
    let mut rng = StdRng::seed_from_u64(7);

    let turns = puzzle.shuffle_with(&mut rng, 5, 100.0);
    assert_eq!(turns.len(), 5);
    assert_eq!(puzzle.pending_turns(), 5);
    for tracked in puzzle.actions() {
        let action = tracked.action();
        let axis = action.cube_mask().single_axis().expect("one fixed axis");
        assert_eq!(action.direction(), axis.unit());
        assert_eq!(action.angle(), QUARTER_TURN);
        assert_eq!(tracked.duration_ms(), 100.0);
        assert!([-1.0, 0.0, 1.0].contains(&axis.component(action.place())));
        assert_eq!(puzzle.resolve_selector(&action.selector()).len(), 9);
    }
    Ok(())
}

#[test]
fn shuffle_is_reproducible_per_seed() -> Result<(), PuzzleError> {
    let mut a = Puzzle::build(lubrik_core::Vector3::ZERO, [4, 4, 4], 0.05)?;
    let mut b = a.clone();
    let first = a.shuffle_with(&mut StdRng::seed_from_u64(42), 12, 0.0);
    let second = b.shuffle_with(&mut StdRng::seed_from_u64(42), 12, 0.0);
    assert_eq!(first, second);
    for action in &first {
        let axis = action.cube_mask().single_axis().expect("one fixed axis");
        assert!([-1.5, -0.5, 0.5, 1.5].contains(&axis.component(action.place())));
    }
    Ok(())
}

#[test]
fn configured_angles_are_drawn_from() -> Result<(), PuzzleError> {
    let config = LubrikConfig::from_json_str(r#"{ "shuffle_angles": [0.5, -0.5, 1.0] }"#)?;
    let mut puzzle = Puzzle::from_config(&config)?;
    let turns = puzzle.shuffle_with(&mut StdRng::seed_from_u64(1), 64, 0.0);
    assert!(turns
        .iter()
        .all(|t| config.shuffle_angles.contains(&t.angle())));

    let mut now = 0.0;
    let mut committed = 0;
    while !puzzle.is_idle() {
        if let TickOutcome::Committed(_) = puzzle.tick(now) {
            committed += 1;
        }
        now += 1.0;
    }
    assert_eq!(committed, 64);

    let mut places: Vec<_> = puzzle.cubelets().map(|c| c.place).collect();
    let mut origins: Vec<_> = puzzle.cubelets().map(|c| c.id.origin_place()).collect();
    let key = |v: &lubrik_core::Vector3| v.to_array().map(|c| (c * 2.0) as i64);
    places.sort_by_key(key);
    origins.sort_by_key(key);
    assert_eq!(places, origins);
    Ok(())
}
