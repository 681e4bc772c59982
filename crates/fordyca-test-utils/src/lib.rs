//! Arena fixtures and invariant checks for FORDYCA development.
//!
//! [`TestArenaBuilder`] lays out nests, clusters and blocks for a test
//! scenario. The [`fixtures`] module holds ready-made scenarios and the
//! assertions integration tests run after a creation pass.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use fordyca_arena::{ArenaConfig, ArenaError, ArenaMap, BlockCluster, Nest};
use fordyca_core::{BlockId, ClusterId, DiscreteCoord, NestId, RealRange, RobotId, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Builder for arenas with preconfigured entities.
///
/// Blocks get consecutive ids in the order they are added.
pub struct TestArenaBuilder {
    config: ArenaConfig,
    nests: Vec<Nest>,
    clusters: Vec<(RealRange, RealRange, Vec<DiscreteCoord>)>,
    blocks: Vec<DiscreteCoord>,
    carried: Vec<(DiscreteCoord, RobotId)>,
}

impl TestArenaBuilder {
    pub fn new(x_size: f64, y_size: f64) -> Self {
        Self {
            config: ArenaConfig::new(x_size, y_size),
            nests: Vec::new(),
            clusters: Vec::new(),
            blocks: Vec::new(),
            carried: Vec::new(),
        }
    }

    pub fn resolution(mut self, resolution: f64) -> Self {
        self.config.resolution = resolution;
        self
    }

    pub fn nest(mut self, center: Vec2, xdim: f64, ydim: f64) -> Self {
        let id = NestId(self.nests.len() as u32);
        self.nests.push(Nest::new(id, center, xdim, ydim));
        self
    }

    /// A cluster over `xspan x yspan` with blocks on `cells`.
    pub fn cluster(mut self, xspan: RealRange, yspan: RealRange, cells: &[(u32, u32)]) -> Self {
        let cells = cells.iter().map(|&(x, y)| DiscreteCoord::new(x, y)).collect();
        self.clusters.push((xspan, yspan, cells));
        self
    }

    pub fn block(mut self, x: u32, y: u32) -> Self {
        self.blocks.push(DiscreteCoord::new(x, y));
        self
    }

    pub fn blocks(mut self, cells: &[(u32, u32)]) -> Self {
        self.blocks
            .extend(cells.iter().map(|&(x, y)| DiscreteCoord::new(x, y)));
        self
    }

    /// A block that starts on `(x, y)` and is then picked up by `robot`.
    pub fn carried_block(mut self, x: u32, y: u32, robot: RobotId) -> Self {
        self.carried.push((DiscreteCoord::new(x, y), robot));
        self
    }

    /// `n` blocks on distinct random empty cells outside the nests,
    /// seeded for reproducibility. Add nests, clusters and carried blocks
    /// first so their cells are avoided.
    pub fn random_blocks(mut self, n: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let xd = self.config.x_cells();
        let yd = self.config.y_cells();
        let res = self.config.resolution;
        let mut placed = 0;
        while placed < n {
            let c = DiscreteCoord::new(rng.random_range(0..xd), rng.random_range(0..yd));
            let center = fordyca_core::math::cell_center(c, res);
            let taken = self.blocks.contains(&c)
                || self.clusters.iter().any(|(_, _, cells)| cells.contains(&c))
                || self.carried.iter().any(|(cell, _)| *cell == c);
            if taken || self.nests.iter().any(|nest| nest.contains_point(center)) {
                continue;
            }
            self.blocks.push(c);
            placed += 1;
        }
        self
    }

    pub fn build(self) -> Result<ArenaMap, ArenaError> {
        let mut map = ArenaMap::new(&self.config)?;
        let mut next = 0u32;
        let mut alloc = || {
            let id = BlockId(next);
            next += 1;
            id
        };
        for nest in self.nests {
            map.nest_add(nest);
        }
        for (i, (xspan, yspan, cells)) in self.clusters.into_iter().enumerate() {
            let mut cluster = BlockCluster::new(ClusterId(i as u32), xspan, yspan);
            for cell in cells {
                let id = alloc();
                map.block_add(id, cell)?;
                cluster.block_add(id);
            }
            map.cluster_add(cluster);
        }
        for cell in self.blocks {
            map.block_add(alloc(), cell)?;
        }
        for (cell, robot) in self.carried {
            let id = alloc();
            map.block_add(id, cell)?;
            map.block_pickup(id, robot)?;
        }
        Ok(map)
    }
}
