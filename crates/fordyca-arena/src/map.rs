//! The arena map: grid plus every entity on it.

use crate::block::Block;
use crate::cache::ArenaCache;
use crate::cell::CellState;
use crate::cluster::BlockCluster;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::grid::ArenaGrid;
use crate::nest::Nest;
use fordyca_core::math::cell_center;
use fordyca_core::{BlockId, CacheId, DiscreteCoord, RobotId};
use indexmap::IndexMap;
use rand::Rng;
use tracing::{debug, trace};

/// Every block in the arena, in insertion order.
pub type BlockStore = IndexMap<BlockId, Block>;

/// Random cells tried before single-block distribution gives up.
pub const DISTRIBUTE_MAX_ATTEMPTS: u32 = 1000;

/// Hands out cache ids. Ids are never reused, including ids of caches
/// discarded before they were committed.
#[derive(Clone, Debug, Default)]
pub struct CacheIdAllocator {
    next: u32,
}

impl CacheIdAllocator {
    /// Allocate the next id.
    pub fn next_id(&mut self) -> CacheId {
        let id = CacheId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

/// Grid, blocks, caches, clusters and nests of one arena.
#[derive(Clone, Debug)]
pub struct ArenaMap {
    grid: ArenaGrid,
    blocks: BlockStore,
    caches: Vec<ArenaCache>,
    clusters: Vec<BlockCluster>,
    nests: Vec<Nest>,
    cache_ids: CacheIdAllocator,
}

impl ArenaMap {
    /// An empty arena with the given geometry.
    pub fn new(config: &ArenaConfig) -> Result<Self, ArenaError> {
        Ok(Self {
            grid: ArenaGrid::new(config)?,
            blocks: BlockStore::new(),
            caches: Vec::new(),
            clusters: Vec::new(),
            nests: Vec::new(),
            cache_ids: CacheIdAllocator::default(),
        })
    }

    /// The grid.
    pub fn grid(&self) -> &ArenaGrid {
        &self.grid
    }

    /// Grid resolution.
    pub fn resolution(&self) -> f64 {
        self.grid.resolution()
    }

    /// All blocks.
    pub fn blocks(&self) -> &BlockStore {
        &self.blocks
    }

    /// Look up a block.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// Committed caches.
    pub fn caches(&self) -> &[ArenaCache] {
        &self.caches
    }

    /// Look up a committed cache.
    pub fn cache(&self, id: CacheId) -> Option<&ArenaCache> {
        self.caches.iter().find(|c| c.id() == id)
    }

    /// Block clusters.
    pub fn clusters(&self) -> &[BlockCluster] {
        &self.clusters
    }

    /// Nests.
    pub fn nests(&self) -> &[Nest] {
        &self.nests
    }

    /// Add a nest.
    pub fn nest_add(&mut self, nest: Nest) {
        self.nests.push(nest);
    }

    /// Add a block cluster.
    pub fn cluster_add(&mut self, cluster: BlockCluster) {
        self.clusters.push(cluster);
    }

    /// Place a new free block on `coord`, which must be empty.
    pub fn block_add(&mut self, id: BlockId, coord: DiscreteCoord) -> Result<(), ArenaError> {
        if self.blocks.contains_key(&id) {
            return Err(ArenaError::DuplicateBlock(id));
        }
        let cell = self.grid.access(coord)?;
        if !cell.is_empty() {
            return Err(ArenaError::CellConflict {
                coord,
                reason: format!("expected empty, found {:?}", cell.state()),
            });
        }
        self.grid.set_state(coord, CellState::HasBlock(id))?;
        self.blocks.insert(id, Block::new(id, coord, self.grid.resolution()));
        Ok(())
    }

    /// A robot picks up `id`, from the grid or from a cache.
    ///
    /// Returns the cache the block was taken from, if any. The cache may be
    /// left depleted; see [`ArenaMap::cache_remove`].
    pub fn block_pickup(&mut self, id: BlockId, robot: RobotId) -> Result<Option<CacheId>, ArenaError> {
        let block = self.blocks.get_mut(&id).ok_or(ArenaError::UnknownBlock(id))?;
        if block.is_carried_by_robot() {
            block.robot_pickup(robot);
            return Ok(None);
        }
        let coord = block.danchor2d();
        block.robot_pickup(robot);

        let mut from_cache = None;
        match self.grid.access(coord)?.state().clone() {
            CellState::HasBlock(b) if b == id => {
                self.grid.set_state(coord, CellState::Empty)?;
            }
            CellState::HasCache { cache, mut blocks } => {
                blocks.retain(|b| *b != id);
                self.grid.set_state(coord, CellState::HasCache { cache, blocks })?;
                if let Some(c) = self.caches.iter_mut().find(|c| c.id() == cache) {
                    c.block_pickup(id);
                }
                from_cache = Some(cache);
            }
            other => {
                return Err(ArenaError::CellConflict {
                    coord,
                    reason: format!("block {id} not on its anchor cell, found {other:?}"),
                });
            }
        }
        trace!(block = %id, robot = %robot, ?from_cache, "block picked up");
        Ok(from_cache)
    }

    /// A robot drops the block it carries into committed cache `cache`.
    ///
    /// The block joins the host cell and the cache's drop count goes up.
    pub fn block_drop_in_cache(&mut self, id: BlockId, cache: CacheId) -> Result<(), ArenaError> {
        let block = self.blocks.get(&id).ok_or(ArenaError::UnknownBlock(id))?;
        if !block.is_carried_by_robot() {
            return Err(ArenaError::BlockNotCarried(id));
        }
        let target = self
            .caches
            .iter_mut()
            .find(|c| c.id() == cache)
            .ok_or(ArenaError::UnknownCache(cache))?;
        let host = target.dcenter2d();
        let mut blocks = match self.grid.access(host)?.state() {
            CellState::HasCache { cache: c, blocks } if *c == cache => blocks.clone(),
            other => {
                return Err(ArenaError::CellConflict {
                    coord: host,
                    reason: format!("expected host of {cache}, found {other:?}"),
                });
            }
        };
        target.block_drop(id);
        blocks.push(id);
        self.grid.set_state(host, CellState::HasCache { cache, blocks })?;
        if let Some(block) = self.blocks.get_mut(&id) {
            block.move_to(host);
        }
        trace!(block = %id, cache = %cache, "block dropped in cache");
        Ok(())
    }

    /// Commit caches built by a creation pass. Each cache's host cell must
    /// already be marked as hosting it.
    pub fn caches_add(&mut self, caches: Vec<ArenaCache>) -> Result<(), ArenaError> {
        for cache in caches {
            let host = cache.dcenter2d();
            match self.grid.access(host)?.state() {
                CellState::HasCache { cache: id, .. } if *id == cache.id() => {}
                other => {
                    return Err(ArenaError::CellConflict {
                        coord: host,
                        reason: format!("expected host of {}, found {other:?}", cache.id()),
                    });
                }
            }
            debug!(cache = %cache.id(), center = %host, n_blocks = cache.n_blocks(), "cache committed");
            self.caches.push(cache);
        }
        Ok(())
    }

    /// Remove a depleted cache, clearing its extent. A block left on the
    /// host cell stays there as a free block.
    pub fn cache_remove(&mut self, id: CacheId) -> Result<ArenaCache, ArenaError> {
        let pos = self
            .caches
            .iter()
            .position(|c| c.id() == id)
            .ok_or(ArenaError::UnknownCache(id))?;
        if !self.caches[pos].is_depleted() {
            return Err(ArenaError::InvalidCache {
                cache: id,
                reason: format!("still holds {} blocks", self.caches[pos].n_blocks()),
            });
        }
        let cache = self.caches.remove(pos);
        for coord in cache.extent_cells(&self.grid) {
            if self.grid.access(coord)?.cache() == Some(id) {
                self.grid.set_state(coord, CellState::Empty)?;
            }
        }
        if let Some(&last) = cache.blocks().first() {
            self.grid.set_state(cache.dcenter2d(), CellState::HasBlock(last))?;
        }
        debug!(cache = %id, "cache removed");
        Ok(cache)
    }

    /// The cache id allocator.
    pub fn cache_ids(&self) -> &CacheIdAllocator {
        &self.cache_ids
    }

    /// Split into a mutable grid/block view and read-only entities, for a
    /// cache creation pass.
    pub fn split_mut(&mut self) -> (ArenaMut<'_>, ArenaEntities<'_>) {
        (
            ArenaMut {
                grid: &mut self.grid,
                blocks: &mut self.blocks,
                cache_ids: &mut self.cache_ids,
            },
            ArenaEntities {
                caches: &self.caches,
                clusters: &self.clusters,
                nests: &self.nests,
            },
        )
    }
}

/// Read-only view of the arena's placement-relevant entities.
#[derive(Clone, Copy, Debug)]
pub struct ArenaEntities<'a> {
    /// Committed caches.
    pub caches: &'a [ArenaCache],
    /// Block clusters.
    pub clusters: &'a [BlockCluster],
    /// Nests.
    pub nests: &'a [Nest],
}

/// Mutable view of the grid and block store.
#[derive(Debug)]
pub struct ArenaMut<'a> {
    grid: &'a mut ArenaGrid,
    blocks: &'a mut BlockStore,
    cache_ids: &'a mut CacheIdAllocator,
}

impl ArenaMut<'_> {
    /// The grid.
    pub fn grid(&self) -> &ArenaGrid {
        self.grid
    }

    /// All blocks.
    pub fn blocks(&self) -> &BlockStore {
        self.blocks
    }

    /// Look up a block, failing if it does not exist.
    pub fn block(&self, id: BlockId) -> Result<&Block, ArenaError> {
        self.blocks.get(&id).ok_or(ArenaError::UnknownBlock(id))
    }

    /// Replace a cell's state.
    pub fn cell_set(&mut self, coord: DiscreteCoord, state: CellState) -> Result<(), ArenaError> {
        self.grid.set_state(coord, state)
    }

    /// Move a block's anchor to `coord`. Cell states are left to the
    /// caller.
    pub fn block_move(&mut self, id: BlockId, coord: DiscreteCoord) -> Result<(), ArenaError> {
        if !self.grid.contains(coord) {
            return Err(ArenaError::CoordOutOfBounds {
                coord,
                bounds: format!("[0, {}) x [0, {})", self.grid.xdsize(), self.grid.ydsize()),
            });
        }
        self.blocks
            .get_mut(&id)
            .ok_or(ArenaError::UnknownBlock(id))?
            .move_to(coord);
        Ok(())
    }

    /// Allocate a cache id.
    pub fn next_cache_id(&mut self) -> CacheId {
        self.cache_ids.next_id()
    }

    /// Drop `id` as a free block on a random empty cell outside every
    /// nest. The block's previous cell is cleared if it still shows it.
    pub fn distribute_single_block<R: Rng + ?Sized>(
        &mut self,
        id: BlockId,
        nests: &[Nest],
        rng: &mut R,
    ) -> Result<DiscreteCoord, ArenaError> {
        let old = self.block(id)?.danchor2d();
        if self.grid.access(old)?.block() == Some(id) {
            self.grid.set_state(old, CellState::Empty)?;
        }
        let res = self.grid.resolution();
        for _ in 0..DISTRIBUTE_MAX_ATTEMPTS {
            let coord = DiscreteCoord::new(
                rng.random_range(0..self.grid.xdsize()),
                rng.random_range(0..self.grid.ydsize()),
            );
            if !self.grid.access(coord)?.is_empty() {
                continue;
            }
            let center = cell_center(coord, res);
            if nests.iter().any(|n| n.contains_point(center)) {
                continue;
            }
            self.grid.set_state(coord, CellState::HasBlock(id))?;
            self.block_move(id, coord)?;
            trace!(block = %id, cell = %coord, "block distributed");
            return Ok(coord);
        }
        Err(ArenaError::NoFreeCell {
            block: id,
            attempts: DISTRIBUTE_MAX_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::UtilizationMetrics;
    use fordyca_core::{NestId, Timestep, Vec2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use smallvec::smallvec;

    fn map() -> ArenaMap {
        ArenaMap::new(&ArenaConfig::new(20.0, 20.0)).unwrap()
    }

    #[test]
    fn block_add_marks_cell() {
        let mut m = map();
        m.block_add(BlockId(0), DiscreteCoord::new(3, 3)).unwrap();
        assert_eq!(m.grid().access(DiscreteCoord::new(3, 3)).unwrap().block(), Some(BlockId(0)));
        assert!(matches!(
            m.block_add(BlockId(1), DiscreteCoord::new(3, 3)),
            Err(ArenaError::CellConflict { .. })
        ));
        assert!(matches!(
            m.block_add(BlockId(0), DiscreteCoord::new(4, 4)),
            Err(ArenaError::DuplicateBlock(_))
        ));
    }

    #[test]
    fn pickup_clears_free_cell() {
        let mut m = map();
        m.block_add(BlockId(0), DiscreteCoord::new(3, 3)).unwrap();
        assert_eq!(m.block_pickup(BlockId(0), RobotId(1)).unwrap(), None);
        assert!(m.grid().access(DiscreteCoord::new(3, 3)).unwrap().is_empty());
        assert!(m.block(BlockId(0)).unwrap().is_carried_by_robot());
    }

    #[test]
    fn distribution_avoids_nest_and_occupied_cells() {
        let mut m = ArenaMap::new(&ArenaConfig::new(4.0, 4.0)).unwrap();
        m.nest_add(Nest::new(NestId(0), Vec2::new(1.0, 2.0), 2.0, 4.0));
        m.block_add(BlockId(0), DiscreteCoord::new(2, 0)).unwrap();
        m.block_add(BlockId(1), DiscreteCoord::new(3, 0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (mut arena, ents) = m.split_mut();
        for _ in 0..5 {
            let c = arena.distribute_single_block(BlockId(0), ents.nests, &mut rng).unwrap();
            assert!(c.x >= 2);
            assert_ne!(c, DiscreteCoord::new(3, 0));
            assert_eq!(arena.block(BlockId(0)).unwrap().danchor2d(), c);
        }
        let occupied = m.grid().cells().filter(|c| !c.is_empty()).count();
        assert_eq!(occupied, 2);
    }

    #[test]
    fn distribution_fails_on_full_grid() {
        let mut m = ArenaMap::new(&ArenaConfig::new(2.0, 1.0)).unwrap();
        m.block_add(BlockId(0), DiscreteCoord::new(0, 0)).unwrap();
        m.block_add(BlockId(1), DiscreteCoord::new(1, 0)).unwrap();
        m.block_pickup(BlockId(1), RobotId(0)).unwrap();
        m.block_add(BlockId(2), DiscreteCoord::new(1, 0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (mut arena, ents) = m.split_mut();
        assert!(matches!(
            arena.distribute_single_block(BlockId(1), ents.nests, &mut rng),
            Err(ArenaError::NoFreeCell { .. })
        ));
    }

    fn committed_cache(m: &mut ArenaMap) -> CacheId {
        let host = DiscreteCoord::new(5, 5);
        let (mut arena, _) = m.split_mut();
        let id = arena.next_cache_id();
        for b in [BlockId(0), BlockId(1)] {
            arena.block_move(b, host).unwrap();
        }
        arena
            .cell_set(host, CellState::HasCache { cache: id, blocks: smallvec![BlockId(0), BlockId(1)] })
            .unwrap();
        let cache = ArenaCache::new(
            id,
            1.0,
            1.0,
            Vec2::new(5.5, 5.5),
            vec![BlockId(0), BlockId(1)],
            Timestep(3),
        )
        .unwrap();
        m.caches_add(vec![cache]).unwrap();
        id
    }

    #[test]
    fn pickup_from_cache_then_remove() {
        let mut m = map();
        m.block_add(BlockId(0), DiscreteCoord::new(1, 1)).unwrap();
        m.block_add(BlockId(1), DiscreteCoord::new(2, 2)).unwrap();
        m.grid.set_state(DiscreteCoord::new(1, 1), CellState::Empty).unwrap();
        m.grid.set_state(DiscreteCoord::new(2, 2), CellState::Empty).unwrap();
        let id = committed_cache(&mut m);

        assert!(matches!(m.cache_remove(id), Err(ArenaError::InvalidCache { .. })));
        assert_eq!(m.block_pickup(BlockId(1), RobotId(0)).unwrap(), Some(id));
        let removed = m.cache_remove(id).unwrap();
        assert_eq!(removed.blocks(), &[BlockId(0)]);
        assert!(m.caches().is_empty());
        assert_eq!(
            m.grid().access(DiscreteCoord::new(5, 5)).unwrap().block(),
            Some(BlockId(0))
        );
    }

    #[test]
    fn pickups_and_drops_update_cache_counts() {
        let mut m = map();
        m.block_add(BlockId(0), DiscreteCoord::new(1, 1)).unwrap();
        m.block_add(BlockId(1), DiscreteCoord::new(2, 2)).unwrap();
        m.block_add(BlockId(2), DiscreteCoord::new(9, 9)).unwrap();
        m.grid.set_state(DiscreteCoord::new(1, 1), CellState::Empty).unwrap();
        m.grid.set_state(DiscreteCoord::new(2, 2), CellState::Empty).unwrap();
        let id = committed_cache(&mut m);
        let host = DiscreteCoord::new(5, 5);

        assert!(matches!(
            m.block_drop_in_cache(BlockId(2), id),
            Err(ArenaError::BlockNotCarried(_))
        ));
        m.block_pickup(BlockId(2), RobotId(4)).unwrap();
        m.block_drop_in_cache(BlockId(2), id).unwrap();
        assert_eq!(m.grid().access(host).unwrap().block_count(), 3);
        assert_eq!(m.block(BlockId(2)).unwrap().danchor2d(), host);
        assert!(!m.block(BlockId(2)).unwrap().is_carried_by_robot());

        m.block_pickup(BlockId(0), RobotId(1)).unwrap();
        m.block_pickup(BlockId(1), RobotId(2)).unwrap();
        let cache = m.cache(id).unwrap();
        assert_eq!(cache.total_block_pickups(), 2);
        assert_eq!(cache.total_block_drops(), 1);
        assert!(cache.is_depleted());

        let removed = m.cache_remove(id).unwrap();
        assert_eq!(removed.total_block_pickups(), 2);
        assert_eq!(m.grid().access(host).unwrap().block(), Some(BlockId(2)));
        assert!(matches!(
            m.block_drop_in_cache(BlockId(0), id),
            Err(ArenaError::UnknownCache(_))
        ));
    }

    #[test]
    fn commit_requires_host_cell() {
        let mut m = map();
        let cache = ArenaCache::new(
            CacheId(9),
            1.0,
            1.0,
            Vec2::new(5.5, 5.5),
            vec![BlockId(0), BlockId(1)],
            Timestep(0),
        )
        .unwrap();
        assert!(matches!(m.caches_add(vec![cache]), Err(ArenaError::CellConflict { .. })));
    }
}
