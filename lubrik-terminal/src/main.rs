/// Lubrik Terminal - Play the puzzle in a terminal
///
/// Usage:
///   lubrik-terminal [--config lubrik.json] [--size 3] [--shuffle 20]
///                   [--script "x[1] y[-1]'"] [--log lubrik.log]
///
/// Controls:
///   - Mouse drag across a face: Turn a layer
///   - S: Shuffle
///   - Arrow Keys: Orbit the camera
///   - Q/ESC: Quit
use std::env;
use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::Context;
use lubrik_core::{LubrikConfig, Puzzle};
use lubrik_terminal::TerminalApp;
use tracing::info;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    size: Option<usize>,
    shuffle: Option<usize>,
    script: Option<String>,
    log: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                parsed.config = Some(args[i + 1].clone());
                i += 2;
            }
            "--size" if i + 1 < args.len() => {
                parsed.size = Some(args[i + 1].parse().context("--size expects a number")?);
                i += 2;
            }
            "--shuffle" if i + 1 < args.len() => {
                parsed.shuffle = Some(args[i + 1].parse().context("--shuffle expects a number")?);
                i += 2;
            }
            "--script" if i + 1 < args.len() => {
                parsed.script = Some(args[i + 1].clone());
                i += 2;
            }
            "--log" if i + 1 < args.len() => {
                parsed.log = Some(args[i + 1].clone());
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(parsed)
}

/// Logs go to a file so the raw-mode screen stays clean.
fn init_logging(path: &str) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("create log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<LubrikConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("read config {path}"))?;
            LubrikConfig::from_json_str(&text).with_context(|| format!("parse config {path}"))?
        }
        None => LubrikConfig::default(),
    };
    if let Some(size) = args.size {
        config.dimensions = [size; 3];
    }
    config.validate().context("validate config")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let config = load_config(&args)?;
    info!(dimensions = ?config.dimensions, "Starting terminal front end");

    let mut puzzle = Puzzle::from_config(&config).context("build puzzle")?;
    if let Some(script) = &args.script {
        puzzle
            .enqueue_script(script, config.turn_duration_ms)
            .context("parse --script")?;
    }
    if let Some(turns) = args.shuffle {
        puzzle.shuffle(turns, config.shuffle_duration_ms);
    }

    let mut app = TerminalApp::new(puzzle, config).context("query terminal size")?;
    app.run().context("terminal loop")?;

    println!("Thanks for playing Lubrik!");
    Ok(())
}
