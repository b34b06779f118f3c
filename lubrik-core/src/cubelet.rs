/// Cubelets, their lattice identities and the hover pointer
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matrix::Matrix4;
use crate::vector::Vector3;

/// Stable identity of a cubelet, derived from its build-time lattice place.
///
/// Places are integers or half-integers, so the identity stores them doubled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CubeletId {
    x: i32,
    y: i32,
    z: i32,
}

impl CubeletId {
    pub fn from_place(place: Vector3) -> Self {
        let doubled = (place * 2.0).symround();
        Self {
            x: doubled.x as i32,
            y: doubled.y as i32,
            z: doubled.z as i32,
        }
    }

    /// The build-time place this identity was derived from.
    pub fn origin_place(self) -> Vector3 {
        Vector3::new(self.x as f64, self.y as f64, self.z as f64) * 0.5
    }
}

impl fmt::Display for CubeletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.origin_place();
        write!(f, "{},{},{}", p.x, p.y, p.z)
    }
}

/// One sub-cube of the puzzle.
///
/// `matrix` is the accumulated pose in row-vector form, the layout a
/// column-major GPU upload reads as the column-vector model matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cubelet {
    pub id: CubeletId,
    pub place: Vector3,
    pub position: Vector3,
    pub size: Vector3,
    pub matrix: Matrix4,
    pub visible: bool,
}

impl Cubelet {
    pub fn new(place: Vector3, position: Vector3, size: Vector3) -> Self {
        Self {
            id: CubeletId::from_place(place),
            place,
            position,
            size,
            matrix: Matrix4::identity(),
            visible: true,
        }
    }

    /// Pose as a column-vector matrix rotating about `pivot`.
    pub fn model_matrix(&self, pivot: Vector3) -> Matrix4 {
        Matrix4::translation(pivot) * self.matrix.transpose() * Matrix4::translation(-pivot)
    }

    pub fn posed(&self, pivot: Vector3) -> PosedCubelet {
        PosedCubelet {
            id: self.id,
            place: self.place,
            position: self.position,
            size: self.size,
            matrix: self.matrix,
            model: self.model_matrix(pivot),
            visible: self.visible,
        }
    }
}

/// Read-only view of a cubelet handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosedCubelet {
    pub id: CubeletId,
    pub place: Vector3,
    pub position: Vector3,
    pub size: Vector3,
    /// Accumulated pose, row-vector form.
    pub matrix: Matrix4,
    /// Column-vector model matrix including the rotation pivot.
    pub model: Matrix4,
    pub visible: bool,
}

impl PosedCubelet {
    /// Rendered centroid in world space.
    pub fn centroid(&self) -> Vector3 {
        self.model
            .transform_point(self.position)
            .unwrap_or(self.position)
    }
}

/// Hover indicator following the last pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct Pointer {
    pub position: Vector3,
    pub size: Vector3,
    pub matrix: Matrix4,
    pub visible: bool,
    /// Lattice place under the pointer, if any.
    pub place: Option<Vector3>,
}

impl Pointer {
    pub fn new(position: Vector3) -> Self {
        Self {
            position,
            size: Vector3::new(1.0, 1.0, 0.0),
            matrix: Matrix4::scaling(Vector3::splat(1.0)),
            visible: true,
            place: None,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn update(&mut self, position: Vector3, size: Vector3, place: Option<Vector3>) {
        self.position = position;
        self.size = size;
        self.place = place;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_half_integer_place() {
        let place = Vector3::new(-1.5, 0.5, 0.0);
        let id = CubeletId::from_place(place);
        assert_eq!(id.origin_place(), place);
        assert_eq!(id.to_string(), "-1.5,0.5,0");
    }

    #[test]
    fn test_model_matrix_rotates_about_pivot() {
        let pivot = Vector3::new(10.0, 0.0, 0.0);
        let mut cubelet = Cubelet::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(10.0, 1.0, 0.0), Vector3::splat(0.5));
        cubelet.matrix = Matrix4::x_rotation(0.5).transpose();
        let centroid = cubelet.posed(pivot).centroid();
        assert!(centroid.approx_eq(Vector3::new(10.0, 0.0, -1.0), 1e-12));
    }

    #[test]
    fn test_pointer_visibility() {
        let mut pointer = Pointer::new(Vector3::ZERO);
        pointer.hide();
        assert!(!pointer.visible);
        pointer.show();
        assert!(pointer.visible);
    }
}
