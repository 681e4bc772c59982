//! Blocks: the unit of foraged material.

use fordyca_core::math::{cell_center, discrete_to_real};
use fordyca_core::{BlockId, DiscreteCoord, Entity2D, RealRange, RobotId, Vec2};

/// A block occupying exactly one grid cell, or carried by a robot.
///
/// The real anchor is the lower-left corner of the block's cell. While a
/// block is carried its anchor is the last cell it was on and it is not
/// present on the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    id: BlockId,
    ranchor: Vec2,
    danchor: DiscreteCoord,
    dim: f64,
    carried_by: Option<RobotId>,
}

impl Block {
    /// A free block on cell `danchor` of a grid with the given resolution.
    pub fn new(id: BlockId, danchor: DiscreteCoord, resolution: f64) -> Self {
        Self {
            id,
            ranchor: discrete_to_real(danchor, resolution),
            danchor,
            dim: resolution,
            carried_by: None,
        }
    }

    /// Block id.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Real location of the lower-left corner.
    pub fn ranchor2d(&self) -> Vec2 {
        self.ranchor
    }

    /// Cell the block is on.
    pub fn danchor2d(&self) -> DiscreteCoord {
        self.danchor
    }

    /// Side length.
    pub fn dim(&self) -> f64 {
        self.dim
    }

    /// The robot carrying the block, if any.
    pub fn carried_by(&self) -> Option<RobotId> {
        self.carried_by
    }

    /// `true` if a robot is carrying the block.
    pub fn is_carried_by_robot(&self) -> bool {
        self.carried_by.is_some()
    }

    /// Move the block onto `danchor`, dropping it if carried.
    pub fn move_to(&mut self, danchor: DiscreteCoord) {
        self.danchor = danchor;
        self.ranchor = discrete_to_real(danchor, self.dim);
        self.carried_by = None;
    }

    /// Mark the block as carried by `robot`.
    pub fn robot_pickup(&mut self, robot: RobotId) {
        self.carried_by = Some(robot);
    }
}

impl Entity2D for Block {
    fn rcenter2d(&self) -> Vec2 {
        cell_center(self.danchor, self.dim)
    }

    fn xrspan(&self) -> RealRange {
        RealRange::new(self.ranchor.x, self.ranchor.x + self.dim)
    }

    fn yrspan(&self) -> RealRange {
        RealRange::new(self.ranchor.y, self.ranchor.y + self.dim)
    }
}
