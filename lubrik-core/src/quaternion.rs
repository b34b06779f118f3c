/// Quaternions for axis-angle rotations
use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::matrix::{Matrix3, Matrix4};
use crate::transform::{cospi, sinpi};
use crate::vector::{Vector3, Vector4};

/// Quaternion with the vector part in `x, y, z` and the scalar part in `w`.
///
/// Unit norm is expected but not enforced; call [`Quaternion::normalize`]
/// before using a computed quaternion as a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Rotation of `angle_pi` (in π-radians) about `axis`.
    pub fn from_axis_angle(axis: Vector3, angle_pi: f64, normalize: bool) -> Self {
        let axis = if normalize { axis.normalize() } else { axis };
        let half = angle_pi / 2.0;
        let s = sinpi(half);

        Self::new(axis.x * s, axis.y * s, axis.z * s, cospi(half))
    }

    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    pub fn norm(self) -> f64 {
        self.to_vector4().length()
    }

    pub fn normalize(self) -> Self {
        let n = self.norm();
        Self::new(self.x / n, self.y / n, self.z / n, self.w / n)
    }

    /// Hamilton product `self * rhs`.
    pub fn hamilton(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }

    pub fn to_vector4(self) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, self.w)
    }

    pub fn from_vector4(v: Vector4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    /// Rotation matrix acting on column vectors.
    pub fn to_matrix3(self) -> Matrix3 {
        let Self { x, y, z, w } = self;
        Matrix3::new(
            Vector3::new(
                1.0 - 2.0 * y * y - 2.0 * z * z,
                2.0 * x * y - 2.0 * z * w,
                2.0 * x * z + 2.0 * y * w,
            ),
            Vector3::new(
                2.0 * x * y + 2.0 * z * w,
                1.0 - 2.0 * x * x - 2.0 * z * z,
                2.0 * y * z - 2.0 * x * w,
            ),
            Vector3::new(
                2.0 * x * z - 2.0 * y * w,
                2.0 * y * z + 2.0 * x * w,
                1.0 - 2.0 * x * x - 2.0 * y * y,
            ),
        )
    }

    pub fn to_matrix4(self) -> Matrix4 {
        self.to_matrix3().to_matrix4(Vector4::new(0.0, 0.0, 0.0, 1.0))
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        self.hamilton(rhs)
    }
}
