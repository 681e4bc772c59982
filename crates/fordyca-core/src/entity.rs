//! The [`Entity2D`] extent trait.
//!
//! Every arena entity that takes part in placement decisions (blocks,
//! caches, clusters, nests) exposes its center and axis-aligned extent
//! through this trait, so overlap checks can be written once.

use crate::math::{RealRange, Vec2};

/// An entity occupying an axis-aligned rectangle in the arena.
pub trait Entity2D {
    /// Real-valued center of the entity.
    fn rcenter2d(&self) -> Vec2;

    /// Extent along X.
    fn xrspan(&self) -> RealRange;

    /// Extent along Y.
    fn yrspan(&self) -> RealRange;

    /// `true` if this entity's extent overlaps the rectangle `xspan x yspan`
    /// in both axes.
    fn overlaps_rect(&self, xspan: &RealRange, yspan: &RealRange) -> bool {
        self.xrspan().overlaps_with(xspan) && self.yrspan().overlaps_with(yspan)
    }

    /// `true` if the extents of the two entities overlap.
    fn overlaps(&self, other: &dyn Entity2D) -> bool {
        self.overlaps_rect(&other.xrspan(), &other.yrspan())
    }
}

/// X and Y extents of a square of side `dim` centered on `center`.
pub fn square_spans(center: Vec2, dim: f64) -> (RealRange, RealRange) {
    (
        RealRange::centered(center.x, dim),
        RealRange::centered(center.y, dim),
    )
}
