/// Row-major 3x3 and 4x4 matrices
///
/// `a * b` is the ordinary matrix product and `m * v` treats `v` as a column
/// vector. The `transmul*` family multiplies by the transpose instead, so
/// `m.transmul_vec(v) == m.transpose() * v` always holds.
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::error::{AlgebraError, OperandKind};
use crate::vector::{Vector3, Vector4};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3 {
    pub x: Vector3,
    pub y: Vector3,
    pub z: Vector3,
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix3 {
    pub const fn new(x: Vector3, y: Vector3, z: Vector3) -> Self {
        Self { x, y, z }
    }

    pub const fn identity() -> Self {
        Self::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        )
    }

    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self::new(
            Vector3::from_array(rows[0]),
            Vector3::from_array(rows[1]),
            Vector3::from_array(rows[2]),
        )
    }

    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        [self.x.to_array(), self.y.to_array(), self.z.to_array()]
    }

    pub fn row(&self, index: usize) -> Result<Vector3, AlgebraError> {
        [self.x, self.y, self.z]
            .get(index)
            .copied()
            .ok_or(AlgebraError::OutOfBounds {
                container: OperandKind::Matrix3,
                index,
                extent: 3,
            })
    }

    pub fn transpose(&self) -> Self {
        Self::new(
            Vector3::new(self.x.x, self.y.x, self.z.x),
            Vector3::new(self.x.y, self.y.y, self.z.y),
            Vector3::new(self.x.z, self.y.z, self.z.z),
        )
    }

    pub fn determinant(&self) -> f64 {
        self.x.x * self.y.y * self.z.z
            + self.x.y * self.y.z * self.z.x
            + self.x.z * self.y.x * self.z.y
            - self.x.z * self.y.y * self.z.x
            - self.x.x * self.y.z * self.z.y
            - self.x.y * self.y.x * self.z.z
    }

    /// Inverse via the adjugate, or `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }
        let r = self.to_rows();
        let mut adj = [[0.0; 3]; 3];
        for (i, row) in adj.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                // adjugate is the transposed cofactor matrix
                let (r0, r1) = others3(j);
                let (c0, c1) = others3(i);
                let minor = r[r0][c0] * r[r1][c1] - r[r0][c1] * r[r1][c0];
                let cofactor = if (i + j) % 2 == 0 { minor } else { -minor };
                *cell = cofactor / det;
            }
        }
        Some(Self::from_rows(adj))
    }

    /// `transpose(self) * v`.
    pub fn transmul_vec(&self, v: Vector3) -> Vector3 {
        self.transpose() * v
    }

    /// `transpose(self) * rhs`.
    pub fn transmul(&self, rhs: &Matrix3) -> Matrix3 {
        self.transpose() * *rhs
    }

    /// Embeds this matrix as the upper-left block, with `w_row` as last row.
    pub fn to_matrix4(&self, w_row: Vector4) -> Matrix4 {
        Matrix4::new(
            self.x.to_vector4(0.0),
            self.y.to_vector4(0.0),
            self.z.to_vector4(0.0),
            w_row,
        )
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.approx_eq(other.x, epsilon)
            && self.y.approx_eq(other.y, epsilon)
            && self.z.approx_eq(other.z, epsilon)
    }
}

fn others3(skip: usize) -> (usize, usize) {
    match skip {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

impl Add for Matrix3 {
    type Output = Matrix3;
    fn add(self, rhs: Matrix3) -> Matrix3 {
        Matrix3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Add<f64> for Matrix3 {
    type Output = Matrix3;
    fn add(self, rhs: f64) -> Matrix3 {
        Matrix3::new(self.x + rhs, self.y + rhs, self.z + rhs)
    }
}

impl Mul<f64> for Matrix3 {
    type Output = Matrix3;
    fn mul(self, rhs: f64) -> Matrix3 {
        Matrix3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;
    fn mul(self, v: Vector3) -> Vector3 {
        Vector3::new(self.x.dot(v), self.y.dot(v), self.z.dot(v))
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;
    fn mul(self, rhs: Matrix3) -> Matrix3 {
        let t = rhs.transpose();
        let row = |r: Vector3| Vector3::new(r.dot(t.x), r.dot(t.y), r.dot(t.z));
        Matrix3::new(row(self.x), row(self.y), row(self.z))
    }
}

/// Row-major 4x4 matrix: poses, rotations and view-projection transforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    pub x: Vector4,
    pub y: Vector4,
    pub z: Vector4,
    pub w: Vector4,
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    pub const fn new(x: Vector4, y: Vector4, z: Vector4, w: Vector4) -> Self {
        Self { x, y, z, w }
    }

    pub const fn identity() -> Self {
        Self::new(
            Vector4::new(1.0, 0.0, 0.0, 0.0),
            Vector4::new(0.0, 1.0, 0.0, 0.0),
            Vector4::new(0.0, 0.0, 1.0, 0.0),
            Vector4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self::new(
            Vector4::from_array(rows[0]),
            Vector4::from_array(rows[1]),
            Vector4::from_array(rows[2]),
            Vector4::from_array(rows[3]),
        )
    }

    pub fn to_rows(&self) -> [[f64; 4]; 4] {
        [
            self.x.to_array(),
            self.y.to_array(),
            self.z.to_array(),
            self.w.to_array(),
        ]
    }

    /// Row-major flat array.
    pub fn to_array(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (i, row) in self.to_rows().iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(row);
        }
        out
    }

    /// Column-major flat array, the layout WebGL uniforms expect.
    pub fn to_column_major(&self) -> [f64; 16] {
        self.transpose().to_array()
    }

    pub fn row(&self, index: usize) -> Result<Vector4, AlgebraError> {
        [self.x, self.y, self.z, self.w]
            .get(index)
            .copied()
            .ok_or(AlgebraError::OutOfBounds {
                container: OperandKind::Matrix4,
                index,
                extent: 4,
            })
    }

    pub fn at(&self, row: usize, col: usize) -> Result<f64, AlgebraError> {
        self.row(row)?.get(col).map_err(|_| AlgebraError::OutOfBounds {
            container: OperandKind::Matrix4,
            index: col,
            extent: 4,
        })
    }

    pub fn transpose(&self) -> Self {
        Self::new(
            Vector4::new(self.x.x, self.y.x, self.z.x, self.w.x),
            Vector4::new(self.x.y, self.y.y, self.z.y, self.w.y),
            Vector4::new(self.x.z, self.y.z, self.z.z, self.w.z),
            Vector4::new(self.x.w, self.y.w, self.z.w, self.w.w),
        )
    }

    /// Upper-left 3x3 block.
    pub fn to_matrix3(&self) -> Matrix3 {
        Matrix3::new(
            self.x.to_vector3(),
            self.y.to_vector3(),
            self.z.to_vector3(),
        )
    }

    /// The 3x3 matrix left after deleting `row` and `col`.
    pub fn minor(&self, row: usize, col: usize) -> Matrix3 {
        let rows = self.to_rows();
        let mut out = [[0.0; 3]; 3];
        let kept_rows = (0..4).filter(|r| *r != row);
        for (dst, r) in out.iter_mut().zip(kept_rows) {
            let kept_cols = (0..4).filter(|c| *c != col);
            for (cell, c) in dst.iter_mut().zip(kept_cols) {
                *cell = rows[r][c];
            }
        }
        Matrix3::from_rows(out)
    }

    /// Signed cofactor of entry (`row`, `col`).
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let minor = self.minor(row, col).determinant();
        if (row + col) % 2 == 0 {
            minor
        } else {
            -minor
        }
    }

    /// Cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        self.x
            .to_array()
            .iter()
            .enumerate()
            .map(|(col, v)| v * self.cofactor(0, col))
            .sum()
    }

    /// Matrix of cofactors.
    pub fn comatrix(&self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.cofactor(r, c);
            }
        }
        Self::from_rows(out)
    }

    pub fn adjugate(&self) -> Self {
        self.comatrix().transpose()
    }

    /// Inverse via the adjugate, or `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }
        Some(self.adjugate() * (1.0 / det))
    }

    /// `transpose(self) * v`.
    pub fn transmul_vec(&self, v: Vector4) -> Vector4 {
        self.transpose() * v
    }

    /// `transpose(self) * rhs`.
    pub fn transmul(&self, rhs: &Matrix4) -> Matrix4 {
        self.transpose() * *rhs
    }

    /// Transforms a point with `w = 1` and applies the perspective divide.
    ///
    /// Returns `None` when the point maps to infinity.
    pub fn transform_point(&self, p: Vector3) -> Option<Vector3> {
        let h = *self * p.to_vector4(1.0);
        if h.w.abs() < f64::EPSILON {
            return None;
        }
        Some(h.to_vector3() / h.w)
    }

    /// Transforms a direction by the upper-left 3x3 block (no translation).
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.to_matrix3() * v
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.approx_eq(other.x, epsilon)
            && self.y.approx_eq(other.y, epsilon)
            && self.z.approx_eq(other.z, epsilon)
            && self.w.approx_eq(other.w, epsilon)
    }
}

impl Add for Matrix4 {
    type Output = Matrix4;
    fn add(self, rhs: Matrix4) -> Matrix4 {
        Matrix4::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Add<f64> for Matrix4 {
    type Output = Matrix4;
    fn add(self, rhs: f64) -> Matrix4 {
        Matrix4::new(self.x + rhs, self.y + rhs, self.z + rhs, self.w + rhs)
    }
}

impl Mul<f64> for Matrix4 {
    type Output = Matrix4;
    fn mul(self, rhs: f64) -> Matrix4 {
        Matrix4::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;
    fn mul(self, v: Vector4) -> Vector4 {
        Vector4::new(self.x.dot(v), self.y.dot(v), self.z.dot(v), self.w.dot(v))
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;
    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let t = rhs.transpose();
        let row = |r: Vector4| Vector4::new(r.dot(t.x), r.dot(t.y), r.dot(t.z), r.dot(t.w));
        Matrix4::new(row(self.x), row(self.y), row(self.z), row(self.w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample() -> Matrix4 {
        Matrix4::from_rows([
            [2.0, 0.5, -1.0, 3.0],
            [0.0, 1.5, 2.0, -1.0],
            [1.0, -2.0, 0.5, 0.25],
            [0.5, 0.0, 1.0, 1.0],
        ])
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = sample();
        let inv = m.inverse().unwrap();
        assert!((m * inv).approx_eq(&Matrix4::identity(), 1e-12));
        assert!((inv * m).approx_eq(&Matrix4::identity(), 1e-12));
    }

    #[test]
    fn test_inverse_round_trip_seeded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            // Diagonal dominance keeps every sample well conditioned.
            let m = Matrix4::from_rows(std::array::from_fn(|r| {
                std::array::from_fn(|c| rng.gen_range(-1.0..1.0) + if r == c { 5.0 } else { 0.0 })
            }));
            let inv = m.inverse().unwrap();
            assert!((m * inv).approx_eq(&Matrix4::identity(), 1e-9), "{m:?}");
        }
    }

    #[test]
    fn test_inverse_matches_nalgebra() {
        let m = sample();
        let ours = m.inverse().unwrap();
        let theirs = nalgebra::Matrix4::from_row_slice(&m.to_array())
            .try_inverse()
            .unwrap();
        let theirs = Matrix4::from_rows(std::array::from_fn(|r| std::array::from_fn(|c| theirs[(r, c)])));
        assert!(ours.approx_eq(&theirs, 1e-12));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let mut rows = sample().to_rows();
        rows[3] = rows[0];
        assert!(Matrix4::from_rows(rows).inverse().is_none());
        assert_eq!(Matrix4::from_rows(rows).determinant(), 0.0);
    }

    #[test]
    fn test_determinant_of_scaling() {
        let m = Matrix4::scaling(Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(m.determinant(), 24.0);
        assert_eq!(Matrix3::from_rows([[2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 4.0]]).determinant(), 24.0);
    }

    #[test]
    fn test_transmultiply_is_transpose_multiply() {
        let m = sample();
        let v = Vector4::new(1.0, -2.0, 0.5, 1.0);
        assert_eq!(m.transmul_vec(v), m.transpose() * v);

        let m3 = m.to_matrix3();
        let v3 = Vector3::new(0.25, 1.0, -3.0);
        assert_eq!(m3.transmul_vec(v3), m3.transpose() * v3);
        assert_eq!(m.transmul(&Matrix4::identity()), m.transpose());
    }

    #[test]
    fn test_matrix3_inverse() {
        let m = sample().to_matrix3();
        let inv = m.inverse().unwrap();
        assert!((m * inv).approx_eq(&Matrix3::identity(), 1e-12));
    }

    #[test]
    fn test_row_out_of_bounds() {
        assert!(matches!(
            Matrix4::identity().at(1, 4),
            Err(AlgebraError::OutOfBounds { index: 4, extent: 4, .. })
        ));
        assert!(Matrix3::identity().row(3).is_err());
    }

    #[test]
    fn test_column_major_layout() {
        let m = Matrix4::translation(Vector3::new(7.0, 8.0, 9.0));
        let cols = m.to_column_major();
        assert_eq!(&cols[12..15], &[7.0, 8.0, 9.0]);
    }
}
