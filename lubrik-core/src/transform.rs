/// Named transform constructors and π-radian trigonometry
use serde::{Deserialize, Serialize};

use crate::matrix::Matrix4;
use crate::vector::{Vector3, Vector4};

/// Results this close to zero are snapped to exactly zero.
const TRIG_SNAP: f64 = 1e-15;

/// `cos(π · angle)`, snapped to zero near the roots.
pub fn cospi(angle: f64) -> f64 {
    let c = (std::f64::consts::PI * angle).cos();
    if c.abs() < TRIG_SNAP {
        0.0
    } else {
        c
    }
}

/// `sin(π · angle)`, snapped to zero near the roots.
pub fn sinpi(angle: f64) -> f64 {
    let s = (std::f64::consts::PI * angle).sin();
    if s.abs() < TRIG_SNAP {
        0.0
    } else {
        s
    }
}

/// Order in which the per-axis rotations of a composite rotation are chained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisOrder {
    #[default]
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    Zyx,
}

impl AxisOrder {
    fn indices(self) -> [usize; 3] {
        match self {
            AxisOrder::Xyz => [0, 1, 2],
            AxisOrder::Xzy => [0, 2, 1],
            AxisOrder::Yxz => [1, 0, 2],
            AxisOrder::Yzx => [1, 2, 0],
            AxisOrder::Zxy => [2, 0, 1],
            AxisOrder::Zyx => [2, 1, 0],
        }
    }
}

impl Matrix4 {
    /// Translation by `v`, acting on column vectors.
    pub fn translation(v: Vector3) -> Self {
        Self::new(
            Vector4::new(1.0, 0.0, 0.0, v.x),
            Vector4::new(0.0, 1.0, 0.0, v.y),
            Vector4::new(0.0, 0.0, 1.0, v.z),
            Vector4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// Non-uniform scaling along the three axes.
    pub fn scaling(v: Vector3) -> Self {
        Self::new(
            Vector4::new(v.x, 0.0, 0.0, 0.0),
            Vector4::new(0.0, v.y, 0.0, 0.0),
            Vector4::new(0.0, 0.0, v.z, 0.0),
            Vector4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn x_rotation(angle_pi: f64) -> Self {
        let (c, s) = (cospi(angle_pi), sinpi(angle_pi));
        Self::new(
            Vector4::new(1.0, 0.0, 0.0, 0.0),
            Vector4::new(0.0, c, s, 0.0),
            Vector4::new(0.0, -s, c, 0.0),
            Vector4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn y_rotation(angle_pi: f64) -> Self {
        let (c, s) = (cospi(angle_pi), sinpi(angle_pi));
        Self::new(
            Vector4::new(c, 0.0, -s, 0.0),
            Vector4::new(0.0, 1.0, 0.0, 0.0),
            Vector4::new(s, 0.0, c, 0.0),
            Vector4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn z_rotation(angle_pi: f64) -> Self {
        let (c, s) = (cospi(angle_pi), sinpi(angle_pi));
        Self::new(
            Vector4::new(c, s, 0.0, 0.0),
            Vector4::new(-s, c, 0.0, 0.0),
            Vector4::new(0.0, 0.0, 1.0, 0.0),
            Vector4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    fn axis_rotation(axis: usize, angle_pi: f64) -> Self {
        match axis {
            0 => Self::x_rotation(angle_pi),
            1 => Self::y_rotation(angle_pi),
            _ => Self::z_rotation(angle_pi),
        }
    }

    /// Composite rotation from per-axis angles (π-radians) in `Xyz` order.
    pub fn rotation(angles_pi: Vector3) -> Self {
        Self::rotation_ordered(angles_pi, AxisOrder::Xyz)
    }

    /// Composite rotation chaining the non-zero axis angles in `order`.
    ///
    /// The first rotation is taken as is; each later one is appended
    /// transposed.
    pub fn rotation_ordered(angles_pi: Vector3, order: AxisOrder) -> Self {
        let angles = angles_pi.to_array();
        let mut rot: Option<Matrix4> = None;
        for axis in order.indices() {
            let angle = angles[axis];
            if angle == 0.0 {
                continue;
            }
            let step = Self::axis_rotation(axis, angle);
            rot = Some(match rot {
                None => step,
                Some(acc) => acc * step.transpose(),
            });
        }
        rot.unwrap_or_else(Self::identity)
    }

    pub fn translate(&self, v: Vector3) -> Self {
        *self * Self::translation(v)
    }

    pub fn x_rotate(&self, angle_pi: f64) -> Self {
        *self * Self::x_rotation(angle_pi)
    }

    pub fn y_rotate(&self, angle_pi: f64) -> Self {
        *self * Self::y_rotation(angle_pi)
    }

    pub fn z_rotate(&self, angle_pi: f64) -> Self {
        *self * Self::z_rotation(angle_pi)
    }

    pub fn scale(&self, v: Vector3) -> Self {
        *self * Self::scaling(v)
    }
}
