//! Nests: where robots deliver blocks.

use fordyca_core::entity::square_spans;
use fordyca_core::{Entity2D, NestId, RealRange, Vec2};

/// An axis-aligned rectangular nest.
#[derive(Clone, Debug, PartialEq)]
pub struct Nest {
    id: NestId,
    center: Vec2,
    xdim: f64,
    ydim: f64,
}

impl Nest {
    /// A nest of `xdim` by `ydim` centered on `center`.
    pub fn new(id: NestId, center: Vec2, xdim: f64, ydim: f64) -> Self {
        Self {
            id,
            center,
            xdim,
            ydim,
        }
    }

    /// Nest id.
    pub fn id(&self) -> NestId {
        self.id
    }

    /// `true` if `point` lies inside the nest.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.xrspan().contains(point.x) && self.yrspan().contains(point.y)
    }
}

impl Entity2D for Nest {
    fn rcenter2d(&self) -> Vec2 {
        self.center
    }

    fn xrspan(&self) -> RealRange {
        square_spans(self.center, self.xdim).0
    }

    fn yrspan(&self) -> RealRange {
        square_spans(self.center, self.ydim).1
    }
}
