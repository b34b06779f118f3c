/// Dynamically shaped algebra operands
///
/// Typed code uses the operator impls directly. `Value` covers the places
/// where the operand shape is only known at runtime, such as flat arrays
/// arriving from JavaScript.
use crate::error::{AlgebraError, OperandKind, Operation};
use crate::matrix::{Matrix3, Matrix4};
use crate::quaternion::Quaternion;
use crate::vector::{Vector2, Vector3, Vector4};

/// Quaternions add, subtract and divide componentwise like a Vector4.
fn quaternion_value(v: Vector4) -> Value {
    Value::Quaternion(Quaternion::from_vector4(v))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    Quaternion(Quaternion),
    Matrix3(Matrix3),
    Matrix4(Matrix4),
}

impl Value {
    pub fn kind(&self) -> OperandKind {
        match self {
            Value::Scalar(_) => OperandKind::Scalar,
            Value::Vector2(_) => OperandKind::Vector2,
            Value::Vector3(_) => OperandKind::Vector3,
            Value::Vector4(_) => OperandKind::Vector4,
            Value::Quaternion(_) => OperandKind::Quaternion,
            Value::Matrix3(_) => OperandKind::Matrix3,
            Value::Matrix4(_) => OperandKind::Matrix4,
        }
    }

    /// Decodes a flat row-major array by its length: 1, 2, 3, 4, 9 or 16.
    pub fn from_slice(values: &[f64]) -> Result<Value, AlgebraError> {
        let v = |i: usize| values[i];
        match values.len() {
            1 => Ok(Value::Scalar(v(0))),
            2 => Ok(Value::Vector2(Vector2::new(v(0), v(1)))),
            3 => Ok(Value::Vector3(Vector3::new(v(0), v(1), v(2)))),
            4 => Ok(Value::Vector4(Vector4::new(v(0), v(1), v(2), v(3)))),
            9 => Ok(Value::Matrix3(Matrix3::from_rows(std::array::from_fn(|r| {
                std::array::from_fn(|c| v(r * 3 + c))
            })))),
            16 => Ok(Value::Matrix4(Matrix4::from_rows(std::array::from_fn(|r| {
                std::array::from_fn(|c| v(r * 4 + c))
            })))),
            len => Err(AlgebraError::UnsupportedOperandKind {
                op: Operation::Decode,
                lhs: OperandKind::Array(len),
                rhs: OperandKind::Array(len),
            }),
        }
    }

    pub fn into_matrix4(self) -> Result<Matrix4, AlgebraError> {
        match self {
            Value::Matrix4(m) => Ok(m),
            other => Err(AlgebraError::UnsupportedOperandKind {
                op: Operation::Decode,
                lhs: OperandKind::Matrix4,
                rhs: other.kind(),
            }),
        }
    }

    pub fn into_vector3(self) -> Result<Vector3, AlgebraError> {
        match self {
            Value::Vector3(v) => Ok(v),
            other => Err(AlgebraError::UnsupportedOperandKind {
                op: Operation::Decode,
                lhs: OperandKind::Vector3,
                rhs: other.kind(),
            }),
        }
    }

    fn unsupported(&self, op: Operation, rhs: &Value) -> AlgebraError {
        AlgebraError::UnsupportedOperandKind {
            op,
            lhs: self.kind(),
            rhs: rhs.kind(),
        }
    }

    pub fn add(&self, rhs: &Value) -> Result<Value, AlgebraError> {
        use Value::*;
        Ok(match (*self, *rhs) {
            (Scalar(a), Scalar(b)) => Scalar(a + b),
            (Vector2(a), Scalar(b)) => Vector2(a + b),
            (Vector2(a), Vector2(b)) => Vector2(a + b),
            (Vector3(a), Scalar(b)) => Vector3(a + b),
            (Vector3(a), Vector3(b)) => Vector3(a + b),
            (Vector4(a), Scalar(b)) => Vector4(a + b),
            (Vector4(a), Vector4(b)) => Vector4(a + b),
            (Quaternion(a), Scalar(b)) => quaternion_value(a.to_vector4() + b),
            (Quaternion(a), Quaternion(b)) => quaternion_value(a.to_vector4() + b.to_vector4()),
            (Matrix3(a), Scalar(b)) => Matrix3(a + b),
            (Matrix3(a), Matrix3(b)) => Matrix3(a + b),
            (Matrix4(a), Scalar(b)) => Matrix4(a + b),
            (Matrix4(a), Matrix4(b)) => Matrix4(a + b),
            _ => return Err(self.unsupported(Operation::Add, rhs)),
        })
    }

    pub fn sub(&self, rhs: &Value) -> Result<Value, AlgebraError> {
        use Value::*;
        Ok(match (*self, *rhs) {
            (Scalar(a), Scalar(b)) => Scalar(a - b),
            (Vector2(a), Scalar(b)) => Vector2(a - b),
            (Vector2(a), Vector2(b)) => Vector2(a - b),
            (Vector3(a), Scalar(b)) => Vector3(a - b),
            (Vector3(a), Vector3(b)) => Vector3(a - b),
            (Vector4(a), Scalar(b)) => Vector4(a - b),
            (Vector4(a), Vector4(b)) => Vector4(a - b),
            (Quaternion(a), Scalar(b)) => quaternion_value(a.to_vector4() - b),
            (Quaternion(a), Quaternion(b)) => quaternion_value(a.to_vector4() - b.to_vector4()),
            (Matrix3(a), Scalar(b)) => Matrix3(a + -b),
            (Matrix3(a), Matrix3(b)) => Matrix3(a + b * -1.0),
            (Matrix4(a), Scalar(b)) => Matrix4(a + -b),
            (Matrix4(a), Matrix4(b)) => Matrix4(a + b * -1.0),
            _ => return Err(self.unsupported(Operation::Sub, rhs)),
        })
    }

    /// Componentwise for vectors, Hamilton product for quaternions and
    /// matrix semantics for matrices.
    pub fn multiply(&self, rhs: &Value) -> Result<Value, AlgebraError> {
        use Value::*;
        Ok(match (*self, *rhs) {
            (Scalar(a), Scalar(b)) => Scalar(a * b),
            (Vector2(a), Scalar(b)) => Vector2(a * b),
            (Vector2(a), Vector2(b)) => Vector2(a * b),
            (Vector3(a), Scalar(b)) => Vector3(a * b),
            (Vector3(a), Vector3(b)) => Vector3(a * b),
            (Vector4(a), Scalar(b)) => Vector4(a * b),
            (Vector4(a), Vector4(b)) => Vector4(a * b),
            (Quaternion(a), Quaternion(b)) => Quaternion(a * b),
            (Quaternion(a), Scalar(b)) => quaternion_value(a.to_vector4() * b),
            (Matrix3(a), Scalar(b)) => Matrix3(a * b),
            (Matrix3(a), Vector3(b)) => Vector3(a * b),
            (Matrix3(a), Matrix3(b)) => Matrix3(a * b),
            (Matrix4(a), Scalar(b)) => Matrix4(a * b),
            (Matrix4(a), Vector4(b)) => Vector4(a * b),
            (Matrix4(a), Vector3(b)) => match a.transform_point(b) {
                Some(p) => Vector3(p),
                None => Vector3(crate::vector::Vector3::splat(f64::INFINITY)),
            },
            (Matrix4(a), Matrix4(b)) => Matrix4(a * b),
            _ => return Err(self.unsupported(Operation::Multiply, rhs)),
        })
    }

    /// Componentwise division; matrices only divide by scalars.
    pub fn divide(&self, rhs: &Value) -> Result<Value, AlgebraError> {
        use Value::*;
        Ok(match (*self, *rhs) {
            (Scalar(a), Scalar(b)) => Scalar(a / b),
            (Vector2(a), Scalar(b)) => Vector2(a / b),
            (Vector2(a), Vector2(b)) => Vector2(a / b),
            (Vector3(a), Scalar(b)) => Vector3(a / b),
            (Vector3(a), Vector3(b)) => Vector3(a / b),
            (Vector4(a), Scalar(b)) => Vector4(a / b),
            (Vector4(a), Vector4(b)) => Vector4(a / b),
            (Quaternion(a), Scalar(b)) => quaternion_value(a.to_vector4() / b),
            (Quaternion(a), Quaternion(b)) => quaternion_value(a.to_vector4() / b.to_vector4()),
            (Matrix3(a), Scalar(b)) => Matrix3(a * (1.0 / b)),
            (Matrix4(a), Scalar(b)) => Matrix4(a * (1.0 / b)),
            _ => return Err(self.unsupported(Operation::Divide, rhs)),
        })
    }
}
