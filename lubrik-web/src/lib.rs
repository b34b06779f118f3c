/// Lubrik Web - WASM facade over the puzzle engine
///
/// The page owns the WebGL context and the mouse plumbing. This module takes
/// matrices and gestures in, and hands back flat `f32` buffers ready for
/// upload.
use std::cell::RefCell;
use std::rc::Rc;

use lubrik_core::{
    Camera, DragGesture, GestureOutcome, GestureResolver, LubrikConfig, Matrix4, Mesh,
    MouseButtons, Puzzle, TickOutcome, Value, Vector2,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const BUSY: &str = "puzzle is busy";

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Short name of a tick outcome for the page's frame loop.
pub fn outcome_name(outcome: &TickOutcome) -> &'static str {
    match outcome {
        TickOutcome::Idle => "idle",
        TickOutcome::Prepared => "prepared",
        TickOutcome::Animating { .. } => "animating",
        TickOutcome::Committed(_) => "committed",
        TickOutcome::Stalled => "stalled",
    }
}

#[wasm_bindgen]
pub struct WebPuzzle {
    puzzle: Rc<RefCell<Puzzle>>,
    config: LubrikConfig,
    camera: Camera,
}

#[wasm_bindgen]
impl WebPuzzle {
    /// Cube of `size` cubelets per axis with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize) -> Result<WebPuzzle, JsValue> {
        Self::build(LubrikConfig::with_size(size)).map_err(js_error)
    }

    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<WebPuzzle, JsValue> {
        let config = LubrikConfig::from_json_str(json).map_err(js_error)?;
        Self::build(config).map_err(js_error)
    }

    /// Handle sharing this puzzle, for a second frame callback.
    pub fn share(&self) -> WebPuzzle {
        WebPuzzle {
            puzzle: Rc::clone(&self.puzzle),
            config: self.config.clone(),
            camera: self.camera.clone(),
        }
    }

    /// Sizes the built-in camera to a canvas; returns its aspect ratio.
    pub fn attach(&mut self, canvas_id: &str) -> Result<f64, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| js_error("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| js_error(format!("no element #{canvas_id}")))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| js_error(format!("#{canvas_id} is not a canvas")))?;

        self.camera.set_viewport(canvas.width(), canvas.height());
        self.use_camera()?;
        Ok(self.camera.aspect)
    }

    /// Supplies row-major view-projection and inverse matrices (16 values each).
    #[wasm_bindgen(js_name = setMatrices)]
    pub fn set_matrices(&self, view_projection: &[f64], inverse: &[f64]) -> Result<(), JsValue> {
        let view_projection = Value::from_slice(view_projection)
            .and_then(Value::into_matrix4)
            .map_err(js_error)?;
        let inverse = Value::from_slice(inverse)
            .and_then(Value::into_matrix4)
            .map_err(js_error)?;
        self.apply_view_projection(view_projection, inverse)
            .ok_or_else(|| js_error(BUSY))
    }

    /// Feeds the built-in camera's matrices to the puzzle.
    #[wasm_bindgen(js_name = useCamera)]
    pub fn use_camera(&self) -> Result<(), JsValue> {
        let inverse = self
            .camera
            .inverse_view_projection()
            .ok_or_else(|| js_error("camera matrix is singular"))?;
        self.apply_view_projection(self.camera.view_projection(), inverse)
            .ok_or_else(|| js_error(BUSY))
    }

    /// Column-major view-projection of the built-in camera.
    #[wasm_bindgen(js_name = cameraMatrix)]
    pub fn camera_matrix(&self) -> Vec<f32> {
        self.camera
            .view_projection()
            .to_column_major()
            .iter()
            .map(|v| *v as f32)
            .collect()
    }

    pub fn orbit(&mut self, yaw: f64, pitch: f64) -> Result<(), JsValue> {
        self.camera.orbit(yaw, pitch);
        self.use_camera()
    }

    /// Advances the active turn. Re-entrant calls are skipped.
    pub fn tick(&self, now_ms: f64) -> String {
        let Ok(mut puzzle) = self.puzzle.try_borrow_mut() else {
            debug!("Tick skipped while another is running");
            return "busy".to_string();
        };
        outcome_name(&puzzle.tick(now_ms)).to_string()
    }

    /// Resolves a drag in normalised screen coordinates; true if a turn was queued.
    pub fn drag(&self, start_x: f64, start_y: f64, end_x: f64, end_y: f64, buttons: u8) -> bool {
        let gesture = DragGesture {
            start: Vector2::new(start_x, start_y),
            end: Vector2::new(end_x, end_y),
            buttons: MouseButtons::from_bits_truncate(buttons),
        };
        let resolver = GestureResolver::new(self.config.turn_duration_ms);
        self.with_puzzle(|p| matches!(resolver.resolve(p, &gesture), GestureOutcome::Queued(_)))
            .unwrap_or(false)
    }

    /// Moves the pointer; true if it rests on a cubelet.
    pub fn hover(&self, x: f64, y: f64) -> bool {
        self.with_puzzle(|p| p.hover(Vector2::new(x, y)).is_some())
            .unwrap_or(false)
    }

    /// Queues a shuffle drawn from `seed`.
    pub fn shuffle(&self, turns: usize, duration_ms: f64, seed: u32) -> usize {
        let mut rng = StdRng::seed_from_u64(seed as u64);
        self.with_puzzle(|p| p.shuffle_with(&mut rng, turns, duration_ms).len())
            .unwrap_or(0)
    }

    /// Queues the configured shuffle from the browser's entropy source.
    #[wasm_bindgen(js_name = shuffleDefault)]
    pub fn shuffle_default(&self) -> usize {
        let (turns, duration) = (self.config.shuffle_turns, self.config.shuffle_duration_ms);
        self.with_puzzle(|p| p.shuffle(turns, duration).len())
            .unwrap_or(0)
    }

    #[wasm_bindgen(js_name = enqueueScript)]
    pub fn enqueue_script(&self, script: &str) -> Result<usize, JsValue> {
        let duration = self.config.turn_duration_ms;
        self.with_puzzle(|p| p.enqueue_script(script, duration))
            .ok_or_else(|| js_error(BUSY))?
            .map(|turns| turns.len())
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = pendingTurns)]
    pub fn pending_turns(&self) -> usize {
        self.puzzle.borrow().pending_turns()
    }

    #[wasm_bindgen(js_name = stoppedChangingAt)]
    pub fn stopped_changing_at(&self) -> Option<f64> {
        self.puzzle.borrow().stopped_changing_at()
    }

    #[wasm_bindgen(js_name = cubeletCount)]
    pub fn cubelet_count(&self) -> usize {
        self.puzzle.borrow().len()
    }

    /// Column-major model matrices, 16 values per cubelet.
    #[wasm_bindgen(js_name = modelMatrices)]
    pub fn model_matrices(&self) -> Vec<f32> {
        self.puzzle
            .borrow()
            .posed_cubelets()
            .iter()
            .flat_map(|c| c.model.to_column_major())
            .map(|v| v as f32)
            .collect()
    }

    /// World-space triangle positions of every visible cubelet.
    #[wasm_bindgen(js_name = vertexBuffer)]
    pub fn vertex_buffer(&self) -> Vec<f32> {
        Mesh::puzzle(&self.puzzle.borrow()).positions_f32()
    }

    /// RGBA per vertex, matching [`WebPuzzle::vertex_buffer`].
    #[wasm_bindgen(js_name = colorBuffer)]
    pub fn color_buffer(&self) -> Vec<f32> {
        Mesh::puzzle(&self.puzzle.borrow()).colors_f32()
    }

    #[wasm_bindgen(js_name = pointerVertices)]
    pub fn pointer_vertices(&self) -> Vec<f32> {
        Mesh::pointer(self.puzzle.borrow().pointer()).positions_f32()
    }

    #[wasm_bindgen(js_name = pointerColors)]
    pub fn pointer_colors(&self) -> Vec<f32> {
        Mesh::pointer(self.puzzle.borrow().pointer()).colors_f32()
    }
}

impl WebPuzzle {
    fn build(config: LubrikConfig) -> Result<WebPuzzle, lubrik_core::PuzzleError> {
        let puzzle = Puzzle::from_config(&config)?;
        let camera = Camera::from_config(&config.camera, 1, 1);
        Ok(WebPuzzle {
            puzzle: Rc::new(RefCell::new(puzzle)),
            config,
            camera,
        })
    }

    /// None when the puzzle is borrowed and the matrices were not applied.
    fn apply_view_projection(&self, view_projection: Matrix4, inverse: Matrix4) -> Option<()> {
        self.with_puzzle(|p| p.set_view_projection(view_projection, inverse))
    }

    /// Runs `f` unless the puzzle is already borrowed by an outer call.
    fn with_puzzle<T>(&self, f: impl FnOnce(&mut Puzzle) -> T) -> Option<T> {
        let mut puzzle = self.puzzle.try_borrow_mut().ok()?;
        Some(f(&mut puzzle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lubrik_core::Vector3;

    fn identity() -> Vec<f64> {
        Matrix4::identity().to_array().to_vec()
    }

    #[test]
    fn test_drag_and_tick() {
        let web = WebPuzzle::build(LubrikConfig::with_size(3)).unwrap();
        web.set_matrices(&identity(), &identity()).unwrap();

        assert!(web.drag(0.0, 0.0, 0.6, 0.0, 1));
        assert!(!web.drag(0.0, 0.0, 0.6, 0.6, 1));
        assert_eq!(web.pending_turns(), 1);

        assert_eq!(web.tick(0.0), "prepared");
        assert_eq!(web.tick(150.0), "animating");
        assert_eq!(web.tick(300.0), "committed");
        assert_eq!(web.stopped_changing_at(), Some(300.0));
    }

    #[test]
    fn test_reentrant_tick_is_skipped() {
        let web = WebPuzzle::build(LubrikConfig::with_size(2)).unwrap();
        let shared = web.share();
        let _held = web.puzzle.borrow_mut();
        assert_eq!(shared.tick(0.0), "busy");
        assert!(!shared.hover(0.0, 0.0));
    }

    #[test]
    fn test_matrices_not_applied_while_busy() {
        let web = WebPuzzle::build(LubrikConfig::with_size(3)).unwrap();
        let shared = web.share();
        let scaled = Matrix4::scaling(Vector3::splat(2.0));
        {
            let _held = web.puzzle.borrow_mut();
            assert_eq!(shared.apply_view_projection(scaled, scaled), None);
        }
        assert_eq!(web.puzzle.borrow().view_projection(), Matrix4::identity());

        assert_eq!(shared.apply_view_projection(scaled, scaled), Some(()));
        assert_eq!(web.puzzle.borrow().view_projection(), scaled);
    }

    #[test]
    fn test_buffers() {
        let web = WebPuzzle::build(LubrikConfig::with_size(2)).unwrap();
        assert_eq!(web.cubelet_count(), 8);
        assert_eq!(web.model_matrices().len(), 8 * 16);
        assert_eq!(web.vertex_buffer().len(), 8 * 12 * 9);
        assert_eq!(web.color_buffer().len(), 8 * 12 * 12);
        assert_eq!(web.pointer_vertices().len(), 2 * 9);
        assert_eq!(web.camera_matrix().len(), 16);
    }

    #[test]
    fn test_seeded_shuffle_and_script() {
        let web = WebPuzzle::build(LubrikConfig::default()).unwrap();
        assert_eq!(web.shuffle(5, 100.0, 9), 5);
        assert_eq!(web.enqueue_script("x[1] y[0]'").unwrap(), 2);
        assert_eq!(web.pending_turns(), 7);
    }
}
