/// Error types for the algebra kernel and the puzzle container
use std::fmt;

use thiserror::Error;

/// Arithmetic operation named in an [`AlgebraError::UnsupportedOperandKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Multiply,
    Divide,
    Decode,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Decode => "decode",
        };
        f.write_str(name)
    }
}

/// Shape of an operand handed to a dynamic algebra operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Scalar,
    Vector2,
    Vector3,
    Vector4,
    Quaternion,
    Matrix3,
    Matrix4,
    /// Flat array of the given length
    Array(usize),
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandKind::Scalar => f.write_str("scalar"),
            OperandKind::Vector2 => f.write_str("Vector2"),
            OperandKind::Vector3 => f.write_str("Vector3"),
            OperandKind::Vector4 => f.write_str("Vector4"),
            OperandKind::Quaternion => f.write_str("Quaternion"),
            OperandKind::Matrix3 => f.write_str("Matrix3"),
            OperandKind::Matrix4 => f.write_str("Matrix4"),
            OperandKind::Array(len) => write!(f, "array[{len}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlgebraError {
    #[error("cannot {op} {lhs} by {rhs}")]
    UnsupportedOperandKind {
        op: Operation,
        lhs: OperandKind,
        rhs: OperandKind,
    },
    #[error("index {index} out of bounds for {container} of extent {extent}")]
    OutOfBounds {
        container: OperandKind,
        index: usize,
        extent: usize,
    },
    #[error("unknown elementwise function `{0}`")]
    UnknownFunction(String),
}

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("puzzle dimensions must be equal and at least 1 on every axis, got {0:?}")]
    InvalidDimensions([usize; 3]),
    #[error("padding {padding} leaves no room for cubelets of increment {increment}")]
    InvalidPadding { padding: f64, increment: f64 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("turn notation error at `{fragment}`: {message}")]
    Notation { fragment: String, message: String },
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Algebra(#[from] AlgebraError),
}
