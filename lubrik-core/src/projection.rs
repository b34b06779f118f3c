/// Camera and projection utilities
use nalgebra::{Matrix4 as NaMatrix4, Point3};
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::matrix::Matrix4;
use crate::quaternion::Quaternion;
use crate::vector::Vector3;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Orthographic,
    #[default]
    Perspective,
}

/// Pitch stops this close to the poles so the view basis stays defined.
const POLE_LIMIT: f64 = 0.99;

/// Orbiting camera producing the per-frame view-projection matrices
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

fn to_point(v: Vector3) -> Point3<f64> {
    Point3::new(v.x, v.y, v.z)
}

fn to_kernel(m: &NaMatrix4<f64>) -> Matrix4 {
    Matrix4::from_rows(std::array::from_fn(|r| std::array::from_fn(|c| m[(r, c)])))
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_config(&CameraConfig::default(), width, height)
    }

    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, config.distance),
            target: Vector3::ZERO,
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: config.fov_radians,
            aspect: width.max(1) as f64 / height.max(1) as f64,
            near: config.near,
            far: config.far,
            mode: config.projection,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f64 / height.max(1) as f64;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> NaMatrix4<f64> {
        let up = nalgebra::Vector3::new(self.up.x, self.up.y, self.up.z);
        NaMatrix4::look_at_rh(&to_point(self.position), &to_point(self.target), &up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> NaMatrix4<f64> {
        match self.mode {
            ProjectionMode::Perspective => {
                NaMatrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).length();
                let width = height * self.aspect;
                NaMatrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    pub fn view_projection(&self) -> Matrix4 {
        to_kernel(&(self.projection_matrix() * self.view_matrix()))
    }

    /// Inverse of [`Camera::view_projection`], `None` for a degenerate camera.
    pub fn inverse_view_projection(&self) -> Option<Matrix4> {
        (self.projection_matrix() * self.view_matrix())
            .try_inverse()
            .map(|m| to_kernel(&m))
    }

    /// Rotates the eye about the target by `yaw` around `up` and then by
    /// `pitch` towards it, both in π-radians.
    pub fn orbit(&mut self, yaw: f64, pitch: f64) {
        let up = self.up.normalize();
        let offset = (self.position - self.target)
            .apply_quaternion(Quaternion::from_axis_angle(up, yaw, true));

        let side = offset.cross(up);
        let pitched = if side.length() > 0.0 {
            offset.apply_quaternion(Quaternion::from_axis_angle(side, pitch, true))
        } else {
            offset
        };
        let offset = if pitched.normalize().dot(up).abs() < POLE_LIMIT {
            pitched
        } else {
            offset
        };

        self.position = self.target + offset;
    }

    /// Project a world-space point to screen space
    ///
    /// Returns `(x, y, depth)` in pixels, or `None` outside the view volume.
    pub fn project_to_screen(&self, point: Vector3, width: u32, height: u32) -> Option<(f64, f64, f64)> {
        let ndc = self.view_projection().transform_point(point)?;

        // Clip test
        if !(-1.0..=1.0).contains(&ndc.x) || !(-1.0..=1.0).contains(&ndc.y) {
            return None;
        }
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f64;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f64;

        Some((screen_x, screen_y, ndc.z))
    }

    /// Maps a pixel position back to normalised device coordinates.
    pub fn screen_to_ndc(&self, x: f64, y: f64, width: u32, height: u32) -> (f64, f64) {
        let w = width.max(1) as f64;
        let h = height.max(1) as f64;
        (x / w * 2.0 - 1.0, 1.0 - y / h * 2.0)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
