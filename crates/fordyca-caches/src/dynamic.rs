//! Dynamic cache creation from free blocks.

use crate::center::CacheCenterCalculator;
use crate::config::CachesConfig;
use crate::creator::BaseCreator;
use crate::dimension::dimension_check;
use crate::error::CacheError;
use crate::verifier::CacheVerifier;
use fordyca_arena::{ArenaCache, ArenaMut, Block, BlockCluster, Nest, CACHE_MIN_BLOCKS};
use fordyca_core::entity::square_spans;
use fordyca_core::{BlockId, Entity2D, Timestep};
use indexmap::IndexSet;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Read-only inputs to one creation pass.
#[derive(Clone, Copy, Debug)]
pub struct DynamicCreationParams<'a> {
    /// Caches already in the arena.
    pub existing: &'a [ArenaCache],
    /// Block clusters.
    pub clusters: &'a [BlockCluster],
    /// Nests.
    pub nests: &'a [Nest],
    /// Current timestep, stamped on created caches.
    pub t: Timestep,
}

/// Outcome of a creation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreationResult {
    /// Caches built and verified this pass, not yet committed to the map.
    pub created: Vec<ArenaCache>,
    /// Candidates abandoned after a center search or verification failure.
    pub n_discarded: usize,
}

/// Groups nearby free blocks into new caches.
#[derive(Clone, Debug)]
pub struct DynamicCacheCreator {
    base: BaseCreator,
    min_dist: f64,
    min_blocks: usize,
    strict_constraints: bool,
}

impl DynamicCacheCreator {
    /// Build a creator from validated configuration for a grid of the
    /// given resolution.
    pub fn new(config: &CachesConfig, resolution: f64) -> Result<Self, CacheError> {
        config.validate()?;
        Ok(Self {
            base: BaseCreator::new(dimension_check(config.dimension, resolution)?),
            min_dist: config.dynamic.min_dist,
            min_blocks: config.dynamic.min_blocks,
            strict_constraints: config.dynamic.strict_constraints,
        })
    }

    /// Side length of the caches this creator builds.
    pub fn cache_dim(&self) -> f64 {
        self.base.cache_dim()
    }

    /// Run one creation pass over `usable` blocks.
    ///
    /// Each usable block not yet placed seeds a candidate group. Blocks in
    /// `absorbable` lying under a new cache are swept into it and removed
    /// from the set. Caches that fail verification are torn down and
    /// their blocks scattered. The returned caches have their extents
    /// reserved on the grid but are not in the arena map yet.
    pub fn create_all<R: Rng + ?Sized>(
        &self,
        arena: &mut ArenaMut<'_>,
        params: &DynamicCreationParams<'_>,
        usable: &[BlockId],
        absorbable: &mut IndexSet<BlockId>,
        rng: &mut R,
    ) -> Result<CreationResult, CacheError> {
        let mut result = CreationResult::default();
        let mut used: HashSet<BlockId> = HashSet::new();
        let calculator = CacheCenterCalculator::new(
            arena.grid(),
            self.cache_dim(),
            params.clusters,
            params.nests,
        );

        for &anchor in usable {
            if used.contains(&anchor) {
                continue;
            }
            let group = self.candidate_group(arena, anchor, usable, &used)?;
            let required = if self.strict_constraints {
                self.min_blocks
            } else {
                CACHE_MIN_BLOCKS
            };
            if group.len() < required {
                debug!(
                    anchor = %anchor,
                    n_blocks = group.len(),
                    required,
                    "not enough blocks near anchor"
                );
                continue;
            }

            let center = {
                let blocks: Vec<&Block> = group
                    .iter()
                    .map(|b| arena.block(*b))
                    .collect::<Result<_, _>>()?;
                let avoid: Vec<&ArenaCache> =
                    params.existing.iter().chain(result.created.iter()).collect();
                calculator.calc(&blocks, &avoid, rng)
            };
            let Some(center) = center else {
                warn!(anchor = %anchor, n_blocks = group.len(), "no center for candidate cache");
                result.n_discarded += 1;
                continue;
            };

            let mut members = group;
            let (xspan, yspan) = square_spans(center, self.cache_dim());
            for &b in absorbable.iter() {
                if used.contains(&b) || members.contains(&b) {
                    continue;
                }
                if arena.block(b)?.overlaps_rect(&xspan, &yspan) {
                    debug!(block = %b, "block absorbed into candidate cache");
                    members.push(b);
                }
            }

            let cache = self
                .base
                .create_single_cache(arena, center, members, params.t)?;
            used.extend(cache.blocks().iter().copied());

            let verdict = {
                let verifier = CacheVerifier::new(
                    arena.grid(),
                    arena.blocks(),
                    params.clusters,
                    params.nests,
                );
                let others: Vec<&ArenaCache> =
                    params.existing.iter().chain(result.created.iter()).collect();
                verifier.verify(&cache, &others)
            };
            match verdict {
                Ok(()) => {
                    self.base
                        .cache_extents_configure(arena, std::slice::from_ref(&cache))?;
                    for b in cache.blocks() {
                        absorbable.shift_remove(b);
                    }
                    result.created.push(cache);
                }
                Err(e) => {
                    warn!(cache = %cache.id(), error = %e, "discarding cache that failed verification");
                    self.base.cache_delete(arena, cache, params.nests, rng)?;
                    result.n_discarded += 1;
                }
            }
        }

        debug!(
            n_created = result.created.len(),
            n_discarded = result.n_discarded,
            "dynamic creation pass complete"
        );
        Ok(result)
    }

    /// `anchor` plus unused usable blocks within `min_dist` of any group
    /// member, scanned in `usable` order until the group reaches
    /// `min_blocks` or stops growing.
    fn candidate_group(
        &self,
        arena: &ArenaMut<'_>,
        anchor: BlockId,
        usable: &[BlockId],
        used: &HashSet<BlockId>,
    ) -> Result<Vec<BlockId>, CacheError> {
        let mut group = vec![anchor];
        let mut centers = vec![arena.block(anchor)?.rcenter2d()];
        loop {
            let mut grew = false;
            for &cand in usable {
                if group.len() >= self.min_blocks {
                    return Ok(group);
                }
                if used.contains(&cand) || group.contains(&cand) {
                    continue;
                }
                let c = arena.block(cand)?.rcenter2d();
                if centers.iter().any(|m| m.distance(c) <= self.min_dist) {
                    group.push(cand);
                    centers.push(c);
                    grew = true;
                }
            }
            if !grew || group.len() >= self.min_blocks {
                return Ok(group);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DynamicCacheConfig;
    use fordyca_arena::{ArenaConfig, ArenaMap};
    use fordyca_core::{DiscreteCoord, NestId, Vec2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(min_blocks: usize, strict: bool) -> CachesConfig {
        CachesConfig {
            dimension: 3.0,
            dynamic: DynamicCacheConfig {
                enable: true,
                min_dist: 3.0,
                min_blocks,
                strict_constraints: strict,
            },
            ..Default::default()
        }
    }

    fn map_with(cells: &[(u32, u32)]) -> ArenaMap {
        let mut map = ArenaMap::new(&ArenaConfig::new(60.0, 60.0)).unwrap();
        for (i, &(x, y)) in cells.iter().enumerate() {
            map.block_add(BlockId(i as u32), DiscreteCoord::new(x, y)).unwrap();
        }
        map
    }

    fn run(map: &mut ArenaMap, config: &CachesConfig, seed: u64) -> CreationResult {
        let usable: Vec<BlockId> = map.blocks().keys().copied().collect();
        let mut absorbable: IndexSet<BlockId> = usable.iter().copied().collect();
        run_with(map, config, &usable, &mut absorbable, seed)
    }

    fn run_with(
        map: &mut ArenaMap,
        config: &CachesConfig,
        usable: &[BlockId],
        absorbable: &mut IndexSet<BlockId>,
        seed: u64,
    ) -> CreationResult {
        let creator = DynamicCacheCreator::new(config, map.resolution()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (mut arena, ents) = map.split_mut();
        let params = DynamicCreationParams {
            existing: ents.caches,
            clusters: ents.clusters,
            nests: ents.nests,
            t: Timestep(1),
        };
        creator
            .create_all(&mut arena, &params, usable, absorbable, &mut rng)
            .unwrap()
    }

    #[test]
    fn dimension_is_normalized() {
        let mut c = config(4, true);
        c.dimension = 4.0;
        let creator = DynamicCacheCreator::new(&c, 1.0).unwrap();
        assert_eq!(creator.cache_dim(), 3.0);
    }

    #[test]
    fn close_group_becomes_one_cache() {
        let mut map = map_with(&[(20, 20), (21, 20), (20, 21), (22, 22)]);
        let res = run(&mut map, &config(4, true), 1);
        assert_eq!(res.created.len(), 1);
        assert_eq!(res.n_discarded, 0);
        assert_eq!(res.created[0].n_blocks(), 4);
    }

    #[test]
    fn strict_mode_rejects_small_groups() {
        let mut map = map_with(&[(20, 20), (21, 20), (20, 21)]);
        let res = run(&mut map, &config(4, true), 1);
        assert!(res.created.is_empty());
        assert_eq!(res.n_discarded, 0);
        assert_eq!(map.grid().cells().filter(|c| c.block().is_some()).count(), 3);
    }

    #[test]
    fn relaxed_mode_accepts_small_groups() {
        let mut map = map_with(&[(20, 20), (21, 20), (20, 21)]);
        let res = run(&mut map, &config(4, false), 1);
        assert_eq!(res.created.len(), 1);
        assert_eq!(res.created[0].n_blocks(), 3);
    }

    #[test]
    fn nearby_free_block_is_absorbed() {
        // the group is full after two blocks; the third lies under the
        // extent of the cache at (39.5, 38.5)
        let mut cfg = config(2, true);
        cfg.dynamic.min_dist = 1.5;
        let mut map = map_with(&[(38, 38), (39, 38), (40, 39)]);
        let res = run(&mut map, &cfg, 2);
        assert_eq!(res.created.len(), 1);
        assert_eq!(res.created[0].n_blocks(), 3);
    }

    #[test]
    fn group_stops_at_min_blocks() {
        let cells: Vec<(u32, u32)> = (0..6).map(|i| (20 + i, 20)).collect();
        let mut map = map_with(&cells);
        let mut cfg = config(2, true);
        cfg.dynamic.min_dist = 1.0;
        let res = run(&mut map, &cfg, 4);
        let placed: usize = res.created.iter().map(ArenaCache::n_blocks).sum();
        let free = map.grid().cells().filter(|c| c.block().is_some()).count();
        assert_eq!(placed + free, 6);
        for c in &res.created {
            assert!(c.n_blocks() >= 2);
        }
    }

    #[test]
    fn failed_verification_rolls_back() {
        // the cache lands on (21, 20); block 2 sits under its extent but
        // may not be absorbed, so the free-block check fails
        let mut map = map_with(&[(20, 20), (21, 20), (21, 21)]);
        let usable = [BlockId(0), BlockId(1)];
        let mut absorbable: IndexSet<BlockId> = usable.iter().copied().collect();
        let res = run_with(&mut map, &config(2, true), &usable, &mut absorbable, 6);

        assert!(res.created.is_empty());
        // block 1 is not retried as an anchor after the rollback
        assert_eq!(res.n_discarded, 1);
        assert_eq!(map.grid().cells().filter(|c| c.cache().is_some()).count(), 0);
        assert_eq!(map.grid().cells().filter(|c| c.block().is_some()).count(), 3);
        for b in map.blocks().values() {
            assert_eq!(map.grid().access(b.danchor2d()).unwrap().block(), Some(b.id()));
        }
        assert_eq!(
            map.block(BlockId(2)).unwrap().danchor2d(),
            DiscreteCoord::new(21, 21)
        );
        assert_eq!(absorbable.len(), 2);
    }

    #[test]
    fn center_failure_leaves_blocks_in_place() {
        let mut map = map_with(&[(20, 20), (21, 20)]);
        map.nest_add(Nest::new(NestId(0), Vec2::new(30.0, 30.0), 60.0, 60.0));
        let usable = [BlockId(0), BlockId(1)];
        let mut absorbable: IndexSet<BlockId> = usable.iter().copied().collect();
        let res = run_with(&mut map, &config(2, true), &usable, &mut absorbable, 7);

        assert!(res.created.is_empty());
        // members are released, so the second anchor forms the group again
        assert_eq!(res.n_discarded, 2);
        assert_eq!(map.grid().cells().filter(|c| c.cache().is_some()).count(), 0);
        assert_eq!(
            map.grid().access(DiscreteCoord::new(20, 20)).unwrap().block(),
            Some(BlockId(0))
        );
        assert_eq!(
            map.grid().access(DiscreteCoord::new(21, 20)).unwrap().block(),
            Some(BlockId(1))
        );
        assert_eq!(absorbable.len(), 2);
    }
}
