/// Geometry primitives for rendering cubelets and the pointer
use crate::cubelet::{Pointer, PosedCubelet};
use crate::mask::Axis;
use crate::puzzle::Puzzle;
use crate::vector::Vector3;

/// Sticker colours of the classic scheme, plus the pointer's two tones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceColor {
    Yellow,
    White,
    Red,
    Orange,
    Blue,
    Green,
    Black,
}

impl FaceColor {
    pub fn rgba(self) -> [f32; 4] {
        match self {
            FaceColor::Yellow => [1.0, 1.0, 0.0, 1.0],
            FaceColor::White => [0.9, 0.9, 0.9, 1.0],
            FaceColor::Red => [1.0, 0.0, 0.0, 1.0],
            FaceColor::Orange => [1.0, 0.5, 0.0, 1.0],
            FaceColor::Blue => [0.0, 0.0, 1.0, 1.0],
            FaceColor::Green => [0.0, 1.0, 0.0, 1.0],
            FaceColor::Black => [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Colour of the cubelet face whose outward normal is `side` along `axis`.
    pub fn for_face(axis: Axis, side: f64) -> Self {
        match (axis, side > 0.0) {
            (Axis::Y, true) => FaceColor::Yellow,
            (Axis::Y, false) => FaceColor::White,
            (Axis::X, false) => FaceColor::Red,
            (Axis::X, true) => FaceColor::Orange,
            (Axis::Z, false) => FaceColor::Blue,
            (Axis::Z, true) => FaceColor::Green,
        }
    }
}

/// Faces in buffer order: top, bottom, left, right, back, front.
const FACES: [(Axis, f64); 6] = [
    (Axis::Y, 1.0),
    (Axis::Y, -1.0),
    (Axis::X, -1.0),
    (Axis::X, 1.0),
    (Axis::Z, -1.0),
    (Axis::Z, 1.0),
];

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    pub normal: Vector3,
}

impl Vertex {
    pub fn new(position: Vector3, normal: Vector3) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub color: FaceColor,
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex, color: FaceColor) -> Self {
        Self {
            vertices: [v0, v1, v2],
            color,
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3 {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(edge2).normalize()
    }

    pub fn centroid(&self) -> Vector3 {
        let [a, b, c] = self.vertices;
        (a.position + b.position + c.position) / 3.0
    }
}

/// In-plane axes `(u, v)` of the face normal to `axis`, ordered so that
/// `u × v` points along `side`.
fn face_basis(axis: Axis, side: f64) -> (Axis, Axis) {
    let (u, v) = match axis {
        Axis::X => (Axis::Y, Axis::Z),
        Axis::Y => (Axis::Z, Axis::X),
        Axis::Z => (Axis::X, Axis::Y),
    };
    if side > 0.0 {
        (u, v)
    } else {
        (v, u)
    }
}

/// Corners of a face quad, counter-clockwise seen from outside.
fn face_quad(centre: Vector3, half: Vector3, axis: Axis, side: f64) -> [Vector3; 4] {
    let (u, v) = face_basis(axis, side);
    let face_centre = centre + axis.unit() * (side * axis.component(half));
    let du = u.unit() * u.component(half);
    let dv = v.unit() * v.component(half);
    [
        face_centre - du - dv,
        face_centre + du - dv,
        face_centre + du + dv,
        face_centre - du + dv,
    ]
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn extend(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Twelve world-space triangles for one posed cubelet
    pub fn cubelet(cubelet: &PosedCubelet) -> Self {
        let mut mesh = Self::with_capacity(12);
        let half = cubelet.size / 2.0;

        for (axis, side) in FACES {
            let corners = face_quad(cubelet.position, half, axis, side).map(|corner| {
                cubelet.model.transform_point(corner).unwrap_or(corner)
            });
            let normal = cubelet.model.transform_vector(axis.unit() * side);
            let color = FaceColor::for_face(axis, side);
            let vertex = |i: usize| Vertex::new(corners[i], normal);

            mesh.add_triangle(Triangle::new(vertex(0), vertex(1), vertex(2), color));
            mesh.add_triangle(Triangle::new(vertex(0), vertex(2), vertex(3), color));
        }

        mesh
    }

    /// Every visible cubelet of the puzzle
    pub fn puzzle(puzzle: &Puzzle) -> Self {
        let posed = puzzle.posed_cubelets();
        let mut mesh = Self::with_capacity(posed.len() * 12);
        for cubelet in posed.iter().filter(|c| c.visible) {
            mesh.extend(Self::cubelet(cubelet));
        }
        mesh
    }

    /// Two-triangle hover quad; empty while the pointer is hidden
    pub fn pointer(pointer: &Pointer) -> Self {
        let mut mesh = Self::new();
        if !pointer.visible {
            return mesh;
        }

        let axis = Axis::ALL
            .into_iter()
            .find(|a| a.component(pointer.size) == 0.0)
            .unwrap_or(Axis::Z);
        let half = pointer.matrix.transform_vector(pointer.size / 2.0);
        let corners = face_quad(pointer.position, half, axis, 1.0);
        let normal = axis.unit();
        let vertex = |i: usize| Vertex::new(corners[i], normal);

        mesh.add_triangle(Triangle::new(vertex(0), vertex(1), vertex(2), FaceColor::Black));
        mesh.add_triangle(Triangle::new(vertex(0), vertex(2), vertex(3), FaceColor::Red));
        mesh
    }

    /// Flat `xyz` positions, three vertices per triangle.
    pub fn positions_f32(&self) -> Vec<f32> {
        self.triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .flat_map(|v| [v.position.x as f32, v.position.y as f32, v.position.z as f32])
            .collect()
    }

    /// Flat `rgba` colours, one per vertex.
    pub fn colors_f32(&self) -> Vec<f32> {
        self.triangles
            .iter()
            .flat_map(|t| std::iter::repeat(t.color.rgba()).take(3))
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::matrix::Matrix4;

    fn unit_cubelet() -> PosedCubelet {
        PosedCubelet {
            id: crate::cubelet::CubeletId::from_place(Vector3::ZERO),
            place: Vector3::ZERO,
            position: Vector3::ZERO,
            size: Vector3::splat(1.0),
            matrix: Matrix4::identity(),
            model: Matrix4::identity(),
            visible: true,
        }
    }

    #[test]
    fn test_cubelet_faces_point_outward() {
        let mesh = Mesh::cubelet(&unit_cubelet());
        assert_eq!(mesh.len(), 12);
        for triangle in &mesh.triangles {
            let normal = triangle.calculate_normal();
            assert!(normal.approx_eq(triangle.vertices[0].normal, 1e-12));
            assert!(triangle.centroid().dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_face_colours() {
        let mesh = Mesh::cubelet(&unit_cubelet());
        assert_eq!(mesh.triangles[0].color, FaceColor::Yellow);
        assert_eq!(mesh.triangles[0].vertices[0].normal, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(mesh.triangles[11].color, FaceColor::Green);
    }

    #[test]
    fn test_puzzle_buffers() {
        let puzzle = Puzzle::build(Vector3::ZERO, [2, 2, 2], 0.05).unwrap();
        let mesh = Mesh::puzzle(&puzzle);
        assert_eq!(mesh.len(), 8 * 12);
        assert_eq!(mesh.positions_f32().len(), 8 * 12 * 3 * 3);
        assert_eq!(mesh.colors_f32().len(), 8 * 12 * 3 * 4);
        assert_eq!(&mesh.colors_f32()[..4], &FaceColor::Yellow.rgba());
    }

    #[test]
    fn test_turned_cubelet_carries_its_stickers() {
        let mut puzzle = Puzzle::build(Vector3::ZERO, [3, 3, 3], 0.05).unwrap();
        puzzle.enqueue_turn(Action::layer_turn(Axis::X, 1.0, 0.5), 0.0);
        puzzle.tick(0.0);
        let moved = puzzle
            .posed_cubelets()
            .into_iter()
            .find(|c| c.place == Vector3::new(1.0, 0.0, -1.0))
            .unwrap();
        let top = &Mesh::cubelet(&moved).triangles[0];
        assert_eq!(top.color, FaceColor::Yellow);
        assert!(top.vertices[0].normal.approx_eq(Vector3::new(0.0, 0.0, -1.0), 1e-12));
    }

    #[test]
    fn test_pointer_quad() {
        let mut pointer = Pointer::new(Vector3::ZERO);
        assert_eq!(Mesh::pointer(&pointer).len(), 2);
        pointer.hide();
        assert!(Mesh::pointer(&pointer).is_empty());
    }
}
