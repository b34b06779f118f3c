/// Example: Play a turn script headless and print the final frame
///
/// Usage: cargo run --example scripted -- "x[1] y[-1]' z[0]2"
use std::env;
use std::io::{self, Write};

use lubrik_core::{Camera, LubrikConfig, Mesh, Puzzle, TickOutcome};
use lubrik_terminal::AsciiRenderer;

fn main() -> anyhow::Result<()> {
    let script = env::args()
        .nth(1)
        .unwrap_or_else(|| "x[1] y[1] x[1]' y[1]'".to_string());

    let config = LubrikConfig::default();
    let mut puzzle = Puzzle::from_config(&config)?;
    puzzle.enqueue_script(&script, config.turn_duration_ms)?;

    // Drive the animation with a fixed 60 Hz clock
    let mut now = 0.0;
    while !puzzle.is_idle() {
        if let TickOutcome::Committed(action) = puzzle.tick(now) {
            println!("{now:>7.1} ms  {action}");
        }
        now += 1000.0 / 60.0;
    }

    let mut camera = Camera::from_config(&config.camera, 60, 60);
    camera.orbit(0.2, 0.15);
    let mut renderer = AsciiRenderer::new(60, 30);
    renderer.render_mesh(&Mesh::puzzle(&puzzle), &camera);

    let mut stdout = io::stdout();
    renderer.draw(&mut stdout)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
