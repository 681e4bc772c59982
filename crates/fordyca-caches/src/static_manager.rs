//! Static caches re-created at fixed locations.

use crate::config::CachesConfig;
use crate::creator::BaseCreator;
use crate::dimension::dimension_check;
use crate::dynamic::CreationResult;
use crate::error::CacheError;
use crate::manager::BaseManager;
use crate::verifier::CacheVerifier;
use fordyca_arena::{ArenaCache, ArenaEntities, ArenaMap, ArenaMut, Block, CACHE_MIN_BLOCKS};
use fordyca_core::entity::square_spans;
use fordyca_core::math::real_to_discrete;
use fordyca_core::{BlockId, CacheId, ConfigError, DiscreteCoord, Entity2D, Timestep, Vec2};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Maintains one cache at each of a fixed set of locations.
#[derive(Clone, Debug)]
pub struct StaticCacheManager {
    base: BaseManager,
    config: CachesConfig,
    creator: BaseCreator,
    locs: Vec<Vec2>,
}

impl StaticCacheManager {
    /// A manager for caches at `locs`, which should come from
    /// [`static_cache_locs`](crate::static_cache_locs).
    pub fn new(config: CachesConfig, map: &ArenaMap, locs: Vec<Vec2>) -> Result<Self, CacheError> {
        config.validate()?;
        if config.static_.size < CACHE_MIN_BLOCKS {
            return Err(ConfigError::InvalidParameter {
                name: "caches.static.size",
                reason: format!(
                    "{} is below the cache minimum of {CACHE_MIN_BLOCKS}",
                    config.static_.size
                ),
            }
            .into());
        }
        let creator = BaseCreator::new(dimension_check(config.dimension, map.resolution())?);
        Ok(Self {
            base: BaseManager::new(),
            config,
            creator,
            locs,
        })
    }

    /// Cache locations.
    pub fn locs(&self) -> &[Vec2] {
        &self.locs
    }

    /// Shared bookkeeping.
    pub fn base(&self) -> &BaseManager {
        &self.base
    }

    /// Shared bookkeeping, mutably (depletion handling).
    pub fn base_mut(&mut self) -> &mut BaseManager {
        &mut self.base
    }

    /// (Re)create a cache at every location that does not currently host
    /// one.
    ///
    /// If any such location cannot be given [`CACHE_MIN_BLOCKS`] blocks,
    /// nothing is created. A built cache that fails verification is an
    /// error; the pass is unwound first, so every block is back on its
    /// cell and no cache cells remain.
    pub fn create(&mut self, map: &mut ArenaMap, t: Timestep) -> Result<Vec<CacheId>, CacheError> {
        if !self.config.static_.enable {
            return Ok(Vec::new());
        }
        let allocs = self.blocks_alloc(map);
        if allocs.is_empty() {
            return Ok(Vec::new());
        }
        if let Some((loc, blocks)) = allocs.iter().find(|(_, b)| b.len() < CACHE_MIN_BLOCKS) {
            warn!(
                loc = %loc,
                n_blocks = blocks.len(),
                n_caches = map.caches().len(),
                "not enough free blocks for every static cache"
            );
            return Ok(Vec::new());
        }

        let created = {
            let (mut arena, ents) = map.split_mut();
            let mut origins = Vec::new();
            for (loc, blocks) in &allocs {
                let host = real_to_discrete(*loc, arena.grid().resolution());
                if let Some(b) = arena.grid().access(host)?.block() {
                    origins.push((b, host));
                }
                for &b in blocks {
                    origins.push((b, arena.block(b)?.danchor2d()));
                }
            }
            origins.sort_unstable_by_key(|(b, _)| *b);
            origins.dedup_by_key(|(b, _)| *b);

            let mut created = Vec::with_capacity(allocs.len());
            let built = self.build_all(&mut arena, &ents, allocs, t, &mut created);
            if let Err(e) = built {
                warn!(error = %e, n_caches = created.len(), "static cache creation failed, unwinding");
                self.creator.caches_unwind(&mut arena, &created, &origins)?;
                return Err(e);
            }
            created
        };
        self.base.commit(
            map,
            CreationResult {
                created,
                n_discarded: 0,
            },
        )
    }

    fn build_all(
        &self,
        arena: &mut ArenaMut<'_>,
        ents: &ArenaEntities<'_>,
        allocs: Vec<(Vec2, Vec<BlockId>)>,
        t: Timestep,
        created: &mut Vec<ArenaCache>,
    ) -> Result<(), CacheError> {
        for (loc, blocks) in allocs {
            created.push(self.creator.create_single_cache(arena, loc, blocks, t)?);
        }
        let verifier = CacheVerifier::new(arena.grid(), arena.blocks(), ents.clusters, ents.nests);
        let all: Vec<&ArenaCache> = ents.caches.iter().chain(created.iter()).collect();
        for cache in created.iter() {
            verifier.verify(cache, &all)?;
        }
        self.creator.cache_extents_configure(arena, created)
    }

    /// Blocks for each location lacking a cache: up to `size` free blocks
    /// from anywhere, plus any free block already under the extent.
    fn blocks_alloc(&self, map: &ArenaMap) -> Vec<(Vec2, Vec<BlockId>)> {
        let resolution = map.resolution();
        let host_cells: Vec<DiscreteCoord> = self
            .locs
            .iter()
            .map(|l| real_to_discrete(*l, resolution))
            .collect();
        let in_cache = |b: &Block| map.caches().iter().any(|c| c.contains_block(b.id()));
        let mut allocated: HashSet<BlockId> = HashSet::new();
        let mut out = Vec::new();

        for (loc, host) in self.locs.iter().zip(&host_cells) {
            if map.caches().iter().any(|c| c.dcenter2d() == *host) {
                continue;
            }
            let mut blocks: Vec<BlockId> = map
                .blocks()
                .values()
                .filter(|b| {
                    !b.is_carried_by_robot()
                        && !host_cells.contains(&b.danchor2d())
                        && !allocated.contains(&b.id())
                        && !in_cache(b)
                })
                .take(self.config.static_.size)
                .map(Block::id)
                .collect();

            let (xspan, yspan) = square_spans(*loc, self.creator.cache_dim());
            let hidden: Vec<BlockId> = map
                .blocks()
                .values()
                .filter(|b| {
                    !b.is_carried_by_robot()
                        && !in_cache(b)
                        && !allocated.contains(&b.id())
                        && !blocks.contains(&b.id())
                        && b.overlaps_rect(&xspan, &yspan)
                })
                .map(Block::id)
                .collect();
            blocks.extend(hidden);

            debug!(loc = %loc, blocks = ?blocks, "static cache allocation");
            allocated.extend(blocks.iter().copied());
            out.push((*loc, blocks));
        }
        out
    }
}
