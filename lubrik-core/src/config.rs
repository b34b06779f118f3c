/// Puzzle and camera configuration.
///
/// Loaded from JSON strings; file IO is left to the front ends.
use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;
use crate::projection::ProjectionMode;

/// Root configuration shared by the front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LubrikConfig {
    /// Cubelets per axis.
    pub dimensions: [usize; 3],
    /// World-space centre of the puzzle.
    pub origin: [f64; 3],
    /// Gap between a cubelet and its cell wall.
    pub padding: f64,
    /// Duration of a gesture or scripted turn.
    pub turn_duration_ms: f64,
    pub shuffle_turns: usize,
    pub shuffle_duration_ms: f64,
    /// Angles (π-radians) a shuffled turn may pick from.
    pub shuffle_angles: Vec<f64>,
    pub camera: CameraConfig,
}

impl Default for LubrikConfig {
    fn default() -> Self {
        Self {
            dimensions: [3, 3, 3],
            origin: [0.0; 3],
            padding: 0.05,
            turn_duration_ms: 300.0,
            shuffle_turns: 20,
            shuffle_duration_ms: 100.0,
            shuffle_angles: vec![0.5],
            camera: CameraConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f64,
    pub fov_radians: f64,
    pub near: f64,
    pub far: f64,
    pub projection: ProjectionMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            fov_radians: std::f64::consts::FRAC_PI_3,
            near: 1.0,
            far: 100.0,
            projection: ProjectionMode::Perspective,
        }
    }
}

impl LubrikConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, PuzzleError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Cube of `size` cubelets per axis with every other field defaulted.
    pub fn with_size(size: usize) -> Self {
        Self {
            dimensions: [size; 3],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PuzzleError> {
        // Quarter turns only map the lattice onto itself when every axis has the same extent.
        let [x, y, z] = self.dimensions;
        if x == 0 || x != y || y != z {
            return Err(PuzzleError::InvalidDimensions(self.dimensions));
        }
        let increment = self
            .dimensions
            .iter()
            .map(|&n| 2.0 / n as f64)
            .fold(f64::INFINITY, f64::min);
        if !(0.0..increment / 2.0).contains(&self.padding) {
            return Err(PuzzleError::InvalidPadding {
                padding: self.padding,
                increment,
            });
        }
        if self.turn_duration_ms < 0.0 || self.shuffle_duration_ms < 0.0 {
            return Err(PuzzleError::InvalidConfig(
                "durations must not be negative".into(),
            ));
        }
        if self.shuffle_angles.is_empty() {
            return Err(PuzzleError::InvalidConfig(
                "shuffle_angles must name at least one angle".into(),
            ));
        }
        let camera = &self.camera;
        if camera.near <= 0.0 || camera.far <= camera.near {
            return Err(PuzzleError::InvalidConfig(format!(
                "camera clip range {}..{} is empty",
                camera.near, camera.far
            )));
        }
        if camera.distance <= camera.near {
            return Err(PuzzleError::InvalidConfig(format!(
                "camera distance {} is inside the near plane",
                camera.distance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = LubrikConfig::from_json_str(r#"{ "dimensions": [4, 4, 4] }"#).unwrap();
        assert_eq!(config.dimensions, [4, 4, 4]);
        assert_eq!(config.turn_duration_ms, 300.0);
        assert_eq!(config.shuffle_angles, vec![0.5]);
        assert_eq!(config.camera.projection, ProjectionMode::Perspective);
    }

    #[test]
    fn test_projection_mode_is_lowercase() {
        let config =
            LubrikConfig::from_json_str(r#"{ "camera": { "projection": "orthographic" } }"#).unwrap();
        assert_eq!(config.camera.projection, ProjectionMode::Orthographic);
        assert_eq!(config.camera.distance, 5.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            LubrikConfig::from_json_str(r#"{ "dimensions": [3, 0, 3] }"#),
            Err(PuzzleError::InvalidDimensions([3, 0, 3]))
        ));
        assert!(matches!(
            LubrikConfig::from_json_str(r#"{ "dimensions": [2, 3, 3] }"#),
            Err(PuzzleError::InvalidDimensions([2, 3, 3]))
        ));
        assert!(matches!(
            LubrikConfig::from_json_str(r#"{ "padding": 0.5 }"#),
            Err(PuzzleError::InvalidPadding { .. })
        ));
        assert!(matches!(
            LubrikConfig::from_json_str(r#"{ "shuffle_angles": [] }"#),
            Err(PuzzleError::InvalidConfig(_))
        ));
        assert!(matches!(
            LubrikConfig::from_json_str("not json"),
            Err(PuzzleError::Config(_))
        ));
    }
}
