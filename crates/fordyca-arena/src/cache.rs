//! Caches: square block depots centered on a host cell.

use crate::error::ArenaError;
use crate::grid::ArenaGrid;
use fordyca_core::entity::square_spans;
use fordyca_core::math::{cell_center, is_multiple_of, real_to_discrete, GEOMETRY_EPSILON};
use fordyca_core::{BlockId, CacheId, DiscreteCoord, Entity2D, RealRange, Timestep, Vec2};

/// Fewest blocks a cache may hold. A cache that drops below this is
/// depleted and removed from the arena.
pub const CACHE_MIN_BLOCKS: usize = 2;

/// Per-cache usage counts, read by metric collectors and cleared at the
/// end of each collection interval.
pub trait UtilizationMetrics {
    /// Blocks currently held.
    fn n_blocks(&self) -> usize;

    /// Blocks robots picked up from the cache since the last reset.
    fn total_block_pickups(&self) -> u32;

    /// Blocks robots dropped into the cache since the last reset.
    fn total_block_drops(&self) -> u32;

    /// Clear the pickup and drop counts.
    fn reset_metrics(&mut self);
}

/// A cache committed to (or being materialized on) the arena.
///
/// All of a cache's blocks sit on its host cell; the remaining cells of
/// its square extent are reserved so nothing else is placed there.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaCache {
    id: CacheId,
    dimension: f64,
    resolution: f64,
    rcenter: Vec2,
    dcenter: DiscreteCoord,
    blocks: Vec<BlockId>,
    creation_ts: Timestep,
    pickups: u32,
    drops: u32,
}

impl ArenaCache {
    /// Build a cache, checking the grid contract: `rcenter` must be a cell
    /// center, `dimension` an odd multiple of `resolution`, and at least
    /// [`CACHE_MIN_BLOCKS`] blocks given.
    pub fn new(
        id: CacheId,
        dimension: f64,
        resolution: f64,
        rcenter: Vec2,
        blocks: Vec<BlockId>,
        creation_ts: Timestep,
    ) -> Result<Self, ArenaError> {
        let invalid = |reason: String| ArenaError::InvalidCache { cache: id, reason };
        if !is_multiple_of(dimension, resolution) || (dimension / resolution).round() as u64 % 2 == 0 {
            return Err(invalid(format!(
                "dimension {dimension} is not an odd multiple of {resolution}"
            )));
        }
        let dcenter = real_to_discrete(rcenter, resolution);
        if rcenter.distance(cell_center(dcenter, resolution)) > GEOMETRY_EPSILON * 1e3 {
            return Err(invalid(format!("center {rcenter} is not a cell center")));
        }
        if blocks.len() < CACHE_MIN_BLOCKS {
            return Err(invalid(format!(
                "{} blocks, need at least {CACHE_MIN_BLOCKS}",
                blocks.len()
            )));
        }
        Ok(Self {
            id,
            dimension,
            resolution,
            rcenter,
            dcenter,
            blocks,
            creation_ts,
            pickups: 0,
            drops: 0,
        })
    }

    /// Cache id.
    pub fn id(&self) -> CacheId {
        self.id
    }

    /// Side length of the square extent.
    pub fn dimension(&self) -> f64 {
        self.dimension
    }

    /// Host cell.
    pub fn dcenter2d(&self) -> DiscreteCoord {
        self.dcenter
    }

    /// Blocks held, host-cell block first.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Number of blocks held.
    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// `true` if `block` is in this cache.
    pub fn contains_block(&self, block: BlockId) -> bool {
        self.blocks.contains(&block)
    }

    /// Timestep the cache was created on.
    pub fn creation_ts(&self) -> Timestep {
        self.creation_ts
    }

    /// A robot takes `block` out of the cache. Returns `false`, counting
    /// nothing, if the block was not in it.
    pub fn block_pickup(&mut self, block: BlockId) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| *b != block);
        let taken = self.blocks.len() != before;
        if taken {
            self.pickups += 1;
        }
        taken
    }

    /// A robot drops `block` into the cache. Returns `false`, counting
    /// nothing, if the block was already in it.
    pub fn block_drop(&mut self, block: BlockId) -> bool {
        if self.contains_block(block) {
            return false;
        }
        self.blocks.push(block);
        self.drops += 1;
        true
    }

    /// `true` if the cache holds too few blocks to remain in the arena.
    pub fn is_depleted(&self) -> bool {
        self.blocks.len() < CACHE_MIN_BLOCKS
    }

    /// Cells covered by the extent, host included, clipped to the grid.
    pub fn extent_cells(&self, grid: &ArenaGrid) -> Vec<DiscreteCoord> {
        grid.cells_in_span(&self.xrspan(), &self.yrspan())
    }

    /// Number of cells along each side of the extent.
    pub fn cells_per_side(&self) -> u32 {
        (self.dimension / self.resolution).round() as u32
    }
}

impl UtilizationMetrics for ArenaCache {
    fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    fn total_block_pickups(&self) -> u32 {
        self.pickups
    }

    fn total_block_drops(&self) -> u32 {
        self.drops
    }

    fn reset_metrics(&mut self) {
        self.pickups = 0;
        self.drops = 0;
    }
}

impl Entity2D for ArenaCache {
    fn rcenter2d(&self) -> Vec2 {
        self.rcenter
    }

    fn xrspan(&self) -> RealRange {
        square_spans(self.rcenter, self.dimension).0
    }

    fn yrspan(&self) -> RealRange {
        square_spans(self.rcenter, self.dimension).1
    }
}
