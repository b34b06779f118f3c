/// Vector value types with componentwise arithmetic
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AlgebraError, OperandKind};
use crate::mask::{Coord, Mask3};
use crate::quaternion::Quaternion;

/// Elementwise numeric function applied by the `math` helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFn {
    /// Rounds half-way cases toward positive infinity (`-1.5` becomes `-1`)
    Round,
    /// Rounds the magnitude and reapplies the sign (`-1.5` becomes `-2`)
    SymRound,
    Floor,
    Ceil,
    Trunc,
    Abs,
    Sign,
    Sqrt,
}

impl MathFn {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            MathFn::Round => round_half_up(value),
            MathFn::SymRound => symround(value),
            MathFn::Floor => value.floor(),
            MathFn::Ceil => value.ceil(),
            MathFn::Trunc => value.trunc(),
            MathFn::Abs => value.abs(),
            MathFn::Sign => sign(value),
            MathFn::Sqrt => value.sqrt(),
        }
    }
}

impl FromStr for MathFn {
    type Err = AlgebraError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "round" => Ok(MathFn::Round),
            "symround" => Ok(MathFn::SymRound),
            "floor" => Ok(MathFn::Floor),
            "ceil" => Ok(MathFn::Ceil),
            "trunc" => Ok(MathFn::Trunc),
            "abs" => Ok(MathFn::Abs),
            "sign" => Ok(MathFn::Sign),
            "sqrt" => Ok(MathFn::Sqrt),
            other => Err(AlgebraError::UnknownFunction(other.to_string())),
        }
    }
}

/// Sign of `value`, with zero mapping to zero.
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Rounds to the nearest integer, half-way cases toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Symmetric rounding: round the magnitude, then reapply the sign.
///
/// Unlike [`round_half_up`] this treats both signs alike at half-integers,
/// so `symround(-1.5) == -2.0` and `symround(1.5) == 2.0`.
pub fn symround(value: f64) -> f64 {
    sign(value) * round_half_up(value.abs())
}

/// Implements the componentwise operators for a vector type, with either a
/// scalar or a same-shape right-hand side.
macro_rules! componentwise {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = $ty;
            fn add(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Add<f64> for $ty {
            type Output = $ty;
            fn add(self, rhs: f64) -> $ty {
                $ty { $($field: self.$field + rhs),+ }
            }
        }

        impl Sub for $ty {
            type Output = $ty;
            fn sub(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Sub<f64> for $ty {
            type Output = $ty;
            fn sub(self, rhs: f64) -> $ty {
                $ty { $($field: self.$field - rhs),+ }
            }
        }

        impl Mul for $ty {
            type Output = $ty;
            fn mul(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field * rhs.$field),+ }
            }
        }

        impl Mul<f64> for $ty {
            type Output = $ty;
            fn mul(self, rhs: f64) -> $ty {
                $ty { $($field: self.$field * rhs),+ }
            }
        }

        impl Div for $ty {
            type Output = $ty;
            fn div(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field / rhs.$field),+ }
            }
        }

        impl Div<f64> for $ty {
            type Output = $ty;
            fn div(self, rhs: f64) -> $ty {
                $ty { $($field: self.$field / rhs),+ }
            }
        }

        impl Neg for $ty {
            type Output = $ty;
            fn neg(self) -> $ty {
                $ty { $($field: -self.$field),+ }
            }
        }

        impl $ty {
            /// Applies a named elementwise function to every component.
            pub fn math(self, func: MathFn) -> Self {
                $ty { $($field: func.apply(self.$field)),+ }
            }

            /// Applies `f` to every component.
            pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
                $ty { $($field: f(self.$field)),+ }
            }

            /// Componentwise remainder by a scalar.
            pub fn rem(self, rhs: f64) -> Self {
                $ty { $($field: self.$field % rhs),+ }
            }

            pub fn symround(self) -> Self {
                self.math(MathFn::SymRound)
            }

            /// Replaces every component exactly equal to `from` with `to`.
            pub fn replace(self, from: f64, to: f64) -> Self {
                $ty { $($field: if self.$field == from { to } else { self.$field }),+ }
            }

            pub fn dot(self, rhs: Self) -> f64 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            pub fn length_squared(self) -> f64 {
                self.dot(self)
            }

            pub fn length(self) -> f64 {
                self.length_squared().sqrt()
            }

            pub fn normalize(self) -> Self {
                self / self.length()
            }

            /// True when every component is within `epsilon` of `other`'s.
            pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
                true $(&& (self.$field - other.$field).abs() <= epsilon)+
            }
        }
    };
}

/// 2D vector, used for screen-normalized viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

componentwise!(Vector2 { x, y });

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn identity() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    pub fn to_vector3(self, z: f64) -> Vector3 {
        Vector3::new(self.x, self.y, z)
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn get(self, index: usize) -> Result<f64, AlgebraError> {
        self.to_array()
            .get(index)
            .copied()
            .ok_or(AlgebraError::OutOfBounds {
                container: OperandKind::Vector2,
                index,
                extent: 2,
            })
    }
}

/// 3D vector: lattice places, render positions, extents and rotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

componentwise!(Vector3 { x, y, z });

impl Vector3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// All-ones vector, the neutral element of componentwise multiply.
    pub const fn identity() -> Self {
        Self::splat(1.0)
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn to_vector4(self, w: f64) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }

    pub fn get(self, index: usize) -> Result<f64, AlgebraError> {
        self.to_array()
            .get(index)
            .copied()
            .ok_or(AlgebraError::OutOfBounds {
                container: OperandKind::Vector3,
                index,
                extent: 3,
            })
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Projects this coordinate onto the axes `mask` constrains.
    ///
    /// Wildcard axes of `mask` stay wildcards; fixed axes become the product
    /// of this component and the mask value.
    pub fn mask(self, mask: &Mask3) -> Mask3 {
        let pick = |value: f64, coord: Coord| match coord {
            Coord::Fixed(m) => Coord::Fixed(value * m),
            Coord::Wildcard => Coord::Wildcard,
        };
        Mask3::new(
            pick(self.x, mask.x),
            pick(self.y, mask.y),
            pick(self.z, mask.z),
        )
    }

    /// Non-zero components become `1`, zero components become wildcards.
    pub fn to_mask(self) -> Mask3 {
        let pick = |value: f64| {
            if value == 0.0 {
                Coord::Wildcard
            } else {
                Coord::Fixed(1.0)
            }
        };
        Mask3::new(pick(self.x), pick(self.y), pick(self.z))
    }

    /// Rotates this vector by `q` (`q * v * q⁻¹` for a unit quaternion).
    pub fn apply_quaternion(self, q: Quaternion) -> Self {
        let ix = q.w * self.x + q.y * self.z - q.z * self.y;
        let iy = q.w * self.y + q.z * self.x - q.x * self.z;
        let iz = q.w * self.z + q.x * self.y - q.y * self.x;
        let iw = -q.x * self.x - q.y * self.y - q.z * self.z;

        Self::new(
            ix * q.w - iw * q.x - iy * q.z + iz * q.y,
            iy * q.w - iw * q.y - iz * q.x + ix * q.z,
            iz * q.w - iw * q.z - ix * q.y + iy * q.x,
        )
    }
}

/// 4D vector: homogeneous coordinates and matrix rows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

componentwise!(Vector4 { x, y, z, w });

impl Vector4 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    pub fn from_array(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn to_vector3(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn get(self, index: usize) -> Result<f64, AlgebraError> {
        self.to_array()
            .get(index)
            .copied()
            .ok_or(AlgebraError::OutOfBounds {
                container: OperandKind::Vector4,
                index,
                extent: 4,
            })
    }

    /// Rotates the xyz part by `q`, keeping `w`.
    pub fn apply_quaternion(self, q: Quaternion) -> Self {
        self.to_vector3().apply_quaternion(q).to_vector4(self.w)
    }
}
