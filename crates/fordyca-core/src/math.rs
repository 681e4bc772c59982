//! 2D geometry at a fixed grid resolution.
//!
//! Real-valued locations ([`Vec2`]) are mapped onto discrete grid cells
//! ([`DiscreteCoord`]) by flooring at the grid resolution. A cell's real
//! location is its lower-left corner; its center is offset by half a
//! cell in X and Y.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// Slack used when converting real coordinates to cells and when testing
/// multiples, so values like `2.9999999999` land on cell 3.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// A real-valued 2D vector or point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vec2 {
    /// The origin.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Construct a vector from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    /// `true` if either component is NaN.
    pub fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// A discrete grid cell coordinate.
///
/// Ordered row-major on `(x, y)` so collections of coordinates sort
/// deterministically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscreteCoord {
    /// Cell index along X.
    pub x: u32,
    /// Cell index along Y.
    pub y: u32,
}

impl DiscreteCoord {
    /// Construct a coordinate from its components.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for DiscreteCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Map a real location to the cell containing it.
///
/// Negative components clamp to cell 0; callers are expected to have
/// bounds-checked against the grid already.
pub fn real_to_discrete(v: Vec2, resolution: f64) -> DiscreteCoord {
    let axis = |r: f64| ((r / resolution) + GEOMETRY_EPSILON).floor().max(0.0) as u32;
    DiscreteCoord::new(axis(v.x), axis(v.y))
}

/// Real location of the lower-left corner of a cell.
pub fn discrete_to_real(c: DiscreteCoord, resolution: f64) -> Vec2 {
    Vec2::new(c.x as f64 * resolution, c.y as f64 * resolution)
}

/// Real location of the center of a cell.
pub fn cell_center(c: DiscreteCoord, resolution: f64) -> Vec2 {
    discrete_to_real(c, resolution) + Vec2::new(resolution / 2.0, resolution / 2.0)
}

/// Snap a real location to the center of the cell containing it.
pub fn snap_to_cell_center(v: Vec2, resolution: f64) -> Vec2 {
    cell_center(real_to_discrete(v, resolution), resolution)
}

/// `true` if `value` is an integer multiple of `base`, allowing for
/// floating point error in the quotient.
pub fn is_multiple_of(value: f64, base: f64) -> bool {
    if base <= 0.0 || !base.is_finite() || !value.is_finite() {
        return false;
    }
    let ratio = value / base;
    (ratio - ratio.round()).abs() < 1e-6
}

/// A closed real interval `[lb, ub]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RealRange {
    lb: f64,
    ub: f64,
}

impl RealRange {
    /// Construct a range; the bounds are reordered if given backwards.
    pub fn new(lb: f64, ub: f64) -> Self {
        if lb <= ub {
            Self { lb, ub }
        } else {
            Self { lb: ub, ub: lb }
        }
    }

    /// A range of width `span` centered on `center`.
    pub fn centered(center: f64, span: f64) -> Self {
        Self::new(center - span / 2.0, center + span / 2.0)
    }

    /// Lower bound.
    pub fn lb(&self) -> f64 {
        self.lb
    }

    /// Upper bound.
    pub fn ub(&self) -> f64 {
        self.ub
    }

    /// Midpoint of the range.
    pub fn center(&self) -> f64 {
        (self.lb + self.ub) / 2.0
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.ub - self.lb
    }

    /// `true` if `v` lies in `[lb, ub]`.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.lb && v <= self.ub
    }

    /// `true` if the open interiors of the two ranges intersect.
    ///
    /// Ranges that merely share an endpoint do not overlap, so two cells
    /// side by side on the grid are not in conflict.
    pub fn overlaps_with(&self, other: &RealRange) -> bool {
        self.lb < other.ub - GEOMETRY_EPSILON && other.lb < self.ub - GEOMETRY_EPSILON
    }

    /// Clamp `v` into the range.
    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.lb, self.ub)
    }
}

impl fmt::Display for RealRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.lb, self.ub)
    }
}
