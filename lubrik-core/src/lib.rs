/// Lubrik Core Library - Puzzle state, turn animation and the algebra under it
///
/// This library owns the cubelet lattice, the turn stack that animates one
/// layer rotation at a time, viewport picking and gesture resolution. It
/// hands posed cubelets to whichever front end draws them.

pub mod action;
pub mod config;
pub mod cubelet;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod mask;
pub mod matrix;
pub mod notation;
pub mod projection;
pub mod puzzle;
pub mod quaternion;
pub mod transform;
pub mod value;
pub mod vector;

// Re-export commonly used types
pub use action::{Action, TrackedAction, TurnPhase, QUARTER_TURN};
pub use config::{CameraConfig, LubrikConfig};
pub use cubelet::{Cubelet, CubeletId, Pointer, PosedCubelet};
pub use error::{AlgebraError, PuzzleError};
pub use geometry::{FaceColor, Mesh, Triangle, Vertex};
pub use gesture::{DragGesture, DragTracker, GestureOutcome, GestureRejection, GestureResolver, MouseButtons};
pub use mask::{Axis, Coord, Mask3};
pub use matrix::{Matrix3, Matrix4};
pub use notation::parse_script;
pub use projection::{Camera, ProjectionMode};
pub use puzzle::{Puzzle, TickOutcome};
pub use quaternion::Quaternion;
pub use transform::AxisOrder;
pub use value::Value;
pub use vector::{Vector2, Vector3, Vector4};
