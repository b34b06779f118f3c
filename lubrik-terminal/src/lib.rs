/// Terminal front end: renders the puzzle as coloured ASCII and turns mouse
/// drags into layer turns
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use lubrik_core::{
    Camera, DragTracker, GestureOutcome, GestureResolver, LubrikConfig, Mesh, MouseButtons, Puzzle,
    Vector2,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Orbit step per arrow key press, in π-radians.
const ORBIT_STEP: f64 = 0.05;

/// Maps a crossterm button to its DOM `buttons` bit.
pub fn mouse_buttons(button: MouseButton) -> MouseButtons {
    match button {
        MouseButton::Left => MouseButtons::PRIMARY,
        MouseButton::Right => MouseButtons::SECONDARY,
        MouseButton::Middle => MouseButtons::AUXILIARY,
    }
}

/// Main application struct for the terminal puzzle
pub struct TerminalApp {
    puzzle: Puzzle,
    config: LubrikConfig,
    camera: Camera,
    renderer: AsciiRenderer,
    drag: DragTracker,
    resolver: GestureResolver,
    running: bool,
    started: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    status: String,
}

impl TerminalApp {
    pub fn new(puzzle: Puzzle, config: LubrikConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(puzzle, config, width, height))
    }

    /// Builds the app for a `width` x `height` cell screen.
    pub fn with_size(puzzle: Puzzle, config: LubrikConfig, width: u16, height: u16) -> Self {
        // Cells are roughly twice as tall as they are wide.
        let mut camera = Camera::from_config(&config.camera, width as u32, height as u32 * 2);
        camera.orbit(0.15, 0.1);
        let resolver = GestureResolver::new(config.turn_duration_ms);

        Self {
            puzzle,
            config,
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            drag: DragTracker::new(),
            resolver,
            running: true,
            started: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            status: String::new(),
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            self.update(self.started.elapsed().as_secs_f64() * 1000.0);
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn cell_to_screen(&self, column: u16, row: u16) -> Vector2 {
        let (x, y) = self.camera.screen_to_ndc(
            column as f64 + 0.5,
            row as f64 + 0.5,
            self.renderer.width() as u32,
            self.renderer.height() as u32,
        );
        Vector2::new(x, y)
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                self.handle_key(code)
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
                self.camera.set_viewport(width as u32, height as u32 * 2);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('s') => {
                let turns = self
                    .puzzle
                    .shuffle(self.config.shuffle_turns, self.config.shuffle_duration_ms);
                self.status = format!("shuffling {} turns", turns.len());
            }
            KeyCode::Left => self.camera.orbit(-ORBIT_STEP, 0.0),
            KeyCode::Right => self.camera.orbit(ORBIT_STEP, 0.0),
            KeyCode::Up => self.camera.orbit(0.0, ORBIT_STEP),
            KeyCode::Down => self.camera.orbit(0.0, -ORBIT_STEP),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let screen = self.cell_to_screen(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(button) => {
                self.drag.press(screen, mouse_buttons(button));
            }
            MouseEventKind::Drag(button) => {
                self.drag.move_to(screen, mouse_buttons(button));
                self.puzzle.hover(screen);
            }
            MouseEventKind::Up(_) => {
                if let Some(gesture) = self.drag.release(screen) {
                    match self.resolver.resolve(&mut self.puzzle, &gesture) {
                        GestureOutcome::Queued(action) => {
                            info!(turn = %action, "Gesture turn");
                            self.status = format!("turn {action}");
                        }
                        GestureOutcome::Rejected(reason) => {
                            debug!(?reason, "Drag ignored");
                            self.status = format!("ignored: {reason:?}");
                        }
                    }
                }
            }
            MouseEventKind::Moved => {
                self.puzzle.hover(screen);
            }
            _ => {}
        }
    }

    /// Feeds the camera matrices to the puzzle and advances its turn.
    pub fn update(&mut self, now_ms: f64) {
        if let Some(inverse) = self.camera.inverse_view_projection() {
            self.puzzle
                .set_view_projection(self.camera.view_projection(), inverse);
        }
        self.puzzle.tick(now_ms);
    }

    /// Rasterises the current poses without touching the terminal.
    pub fn rasterize(&mut self) {
        let mut mesh = Mesh::puzzle(&self.puzzle);
        mesh.extend(Mesh::pointer(self.puzzle.pointer()));

        self.renderer.clear();
        self.renderer.render_mesh(&mesh, &self.camera);
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    fn render(&mut self) -> io::Result<()> {
        self.rasterize();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Lubrik | FPS: {:.1} | queued: {} | Drag=Turn S=Shuffle Arrows=Orbit Q=Quit | {}",
                self.fps,
                self.puzzle.pending_turns(),
                self.status
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
