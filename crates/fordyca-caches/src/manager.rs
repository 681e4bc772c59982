//! Cache managers: the entry points the simulation loop calls each tick.

use crate::alloc::{
    absorbable_filter, creation_blocks_alloc, creation_blocks_alloc_check, usable_filter,
    CreationBlocks,
};
use crate::config::CachesConfig;
use crate::dynamic::{CreationResult, DynamicCacheCreator, DynamicCreationParams};
use crate::error::CacheError;
use crate::metrics::{LifecycleCounters, LifecycleMetrics};
use fordyca_arena::{ArenaCache, ArenaMap};
use fordyca_core::{CacheId, Timestep};
use rand::Rng;
use tracing::{debug, info};

// ── BaseManager ────────────────────────────────────────────────────

/// Bookkeeping shared by the dynamic and static managers: lifecycle
/// counters, committing created caches, and removing depleted ones.
#[derive(Clone, Debug, Default)]
pub struct BaseManager {
    counters: LifecycleCounters,
}

impl BaseManager {
    /// A manager with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw counters.
    pub fn counters(&self) -> &LifecycleCounters {
        &self.counters
    }

    /// Move the caches of a finished creation pass into the map and count
    /// them. Returns the ids committed.
    pub fn commit(
        &mut self,
        map: &mut ArenaMap,
        result: CreationResult,
    ) -> Result<Vec<CacheId>, CacheError> {
        let ids: Vec<CacheId> = result.created.iter().map(ArenaCache::id).collect();
        self.counters.record_created(result.created.len());
        self.counters.record_discarded(result.n_discarded);
        map.caches_add(result.created)?;
        Ok(ids)
    }

    /// Remove a depleted cache from the map and record its age at `t`.
    pub fn cache_depleted(
        &mut self,
        map: &mut ArenaMap,
        id: CacheId,
        t: Timestep,
    ) -> Result<ArenaCache, CacheError> {
        let cache = map.cache_remove(id)?;
        let age = t - cache.creation_ts();
        self.counters.record_depletion(age);
        info!(cache = %id, age = %age, "cache depleted");
        Ok(cache)
    }

    /// Remove every cache in the map that has dropped below the minimum
    /// block count.
    pub fn depleted_caches_remove(
        &mut self,
        map: &mut ArenaMap,
        t: Timestep,
    ) -> Result<Vec<ArenaCache>, CacheError> {
        let depleted: Vec<CacheId> = map
            .caches()
            .iter()
            .filter(|c| c.is_depleted())
            .map(ArenaCache::id)
            .collect();
        depleted
            .into_iter()
            .map(|id| self.cache_depleted(map, id, t))
            .collect()
    }
}

impl LifecycleMetrics for BaseManager {
    fn caches_created(&self) -> usize {
        self.counters.caches_created()
    }

    fn caches_discarded(&self) -> usize {
        self.counters.caches_discarded()
    }

    fn caches_depleted(&self) -> usize {
        self.counters.caches_depleted()
    }

    fn cache_depletion_ages(&self) -> &[Timestep] {
        self.counters.cache_depletion_ages()
    }

    fn reset_metrics(&mut self) {
        self.counters.reset_metrics();
    }
}

// ── DynamicCacheManager ────────────────────────────────────────────

/// Creates caches from free blocks once per tick.
#[derive(Clone, Debug)]
pub struct DynamicCacheManager {
    base: BaseManager,
    config: CachesConfig,
    creator: DynamicCacheCreator,
}

impl DynamicCacheManager {
    /// Validate `config` and normalize its dimension against `map`'s grid.
    pub fn new(config: CachesConfig, map: &ArenaMap) -> Result<Self, CacheError> {
        let creator = DynamicCacheCreator::new(&config, map.resolution())?;
        debug!(
            cache_dim = creator.cache_dim(),
            min_dist = config.dynamic.min_dist,
            min_blocks = config.dynamic.min_blocks,
            "dynamic cache manager ready"
        );
        Ok(Self {
            base: BaseManager::new(),
            config,
            creator,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &CachesConfig {
        &self.config
    }

    /// Normalized cache side length.
    pub fn cache_dim(&self) -> f64 {
        self.creator.cache_dim()
    }

    /// Shared bookkeeping.
    pub fn base(&self) -> &BaseManager {
        &self.base
    }

    /// Shared bookkeeping, mutably (depletion handling).
    pub fn base_mut(&mut self) -> &mut BaseManager {
        &mut self.base
    }

    /// Run a creation pass at timestep `t` and commit the new caches to
    /// `map`. Returns their ids; empty when dynamic creation is disabled
    /// or nothing could be built.
    pub fn create<R: Rng + ?Sized>(
        &mut self,
        map: &mut ArenaMap,
        t: Timestep,
        rng: &mut R,
    ) -> Result<Vec<CacheId>, CacheError> {
        if !self.config.dynamic.enable {
            debug!("dynamic cache creation disabled");
            return Ok(Vec::new());
        }
        let CreationBlocks {
            usable,
            mut absorbable,
        } = self.creation_blocks_alloc(map);

        let result = {
            let (mut arena, ents) = map.split_mut();
            let params = DynamicCreationParams {
                existing: ents.caches,
                clusters: ents.clusters,
                nests: ents.nests,
                t,
            };
            self.creator
                .create_all(&mut arena, &params, &usable, &mut absorbable, rng)?
        };
        self.base.commit(map, result)
    }

    /// Partition the map's blocks with the dynamic usable and absorbable
    /// filters, logging anything suspicious about the split.
    pub fn creation_blocks_alloc(&self, map: &ArenaMap) -> CreationBlocks {
        let alloc = creation_blocks_alloc(
            map.blocks(),
            map.caches(),
            map.clusters(),
            usable_filter,
            absorbable_filter,
        );
        creation_blocks_alloc_check(
            &alloc,
            map.blocks(),
            map.caches(),
            map.clusters(),
            self.config.dynamic.min_blocks,
        );
        alloc
    }
}

impl LifecycleMetrics for DynamicCacheManager {
    fn caches_created(&self) -> usize {
        self.base.caches_created()
    }

    fn caches_discarded(&self) -> usize {
        self.base.caches_discarded()
    }

    fn caches_depleted(&self) -> usize {
        self.base.caches_depleted()
    }

    fn cache_depletion_ages(&self) -> &[Timestep] {
        self.base.cache_depletion_ages()
    }

    fn reset_metrics(&mut self) {
        self.base.reset_metrics();
    }
}
