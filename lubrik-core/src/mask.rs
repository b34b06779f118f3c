/// Per-axis wildcard masks used to select layers of the lattice
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vector::Vector3;

/// One axis of a mask: either a fixed value or unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Coord {
    Fixed(f64),
    Wildcard,
}

impl Coord {
    pub fn is_wildcard(self) -> bool {
        matches!(self, Coord::Wildcard)
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Coord::Fixed(v) => Some(v),
            Coord::Wildcard => None,
        }
    }

    /// True when `value` satisfies this axis constraint.
    pub fn matches(self, value: f64) -> bool {
        match self {
            Coord::Fixed(v) => v == value,
            Coord::Wildcard => true,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coord::Fixed(v) => write!(f, "{v}"),
            Coord::Wildcard => f.write_str("*"),
        }
    }
}

/// Lattice axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Axis> {
        Axis::ALL.get(index).copied()
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vector3 {
        let mut v = [0.0; 3];
        v[self.index()] = 1.0;
        Vector3::from_array(v)
    }

    pub fn component(self, v: Vector3) -> f64 {
        v.to_array()[self.index()]
    }

    pub fn letter(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

/// A 3-axis selector: a lattice coordinate whose wildcard axes match anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mask3 {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

impl Mask3 {
    pub const fn new(x: Coord, y: Coord, z: Coord) -> Self {
        Self { x, y, z }
    }

    /// Mask with every axis a wildcard; selects the whole puzzle.
    pub const fn any() -> Self {
        Self::new(Coord::Wildcard, Coord::Wildcard, Coord::Wildcard)
    }

    /// Fully constrained mask equal to `v`.
    pub fn exact(v: Vector3) -> Self {
        Self::new(Coord::Fixed(v.x), Coord::Fixed(v.y), Coord::Fixed(v.z))
    }

    /// `1` on `axis`, wildcard elsewhere.
    pub fn axis(axis: Axis) -> Self {
        Self::any().with(axis, Coord::Fixed(1.0))
    }

    pub fn with(mut self, axis: Axis, coord: Coord) -> Self {
        match axis {
            Axis::X => self.x = coord,
            Axis::Y => self.y = coord,
            Axis::Z => self.z = coord,
        }
        self
    }

    pub fn get(&self, axis: Axis) -> Coord {
        self.to_array()[axis.index()]
    }

    pub fn to_array(&self) -> [Coord; 3] {
        [self.x, self.y, self.z]
    }

    /// True when `place` agrees with every fixed axis.
    pub fn matches(&self, place: Vector3) -> bool {
        self.x.matches(place.x) && self.y.matches(place.y) && self.z.matches(place.z)
    }

    /// Axes carrying a fixed value.
    pub fn fixed_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL
            .into_iter()
            .filter(move |axis| !self.get(*axis).is_wildcard())
    }

    /// Euclidean length over the fixed axes; wildcards count as absent.
    pub fn length(&self) -> f64 {
        self.to_array()
            .iter()
            .filter_map(|c| c.value())
            .map(|v| v * v)
            .sum::<f64>()
            .sqrt()
    }

    /// The only fixed axis, if exactly one axis is fixed.
    pub fn single_axis(&self) -> Option<Axis> {
        let mut fixed = self.fixed_axes();
        match (fixed.next(), fixed.next()) {
            (Some(axis), None) => Some(axis),
            _ => None,
        }
    }

    /// Numeric vector with wildcards replaced by `fill`.
    pub fn to_vector(&self, fill: f64) -> Vector3 {
        let pick = |c: Coord| c.value().unwrap_or(fill);
        Vector3::new(pick(self.x), pick(self.y), pick(self.z))
    }
}

impl fmt::Display for Mask3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
