//! FORDYCA: cache management for swarm foraging arenas.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all FORDYCA sub-crates. For most users, adding `fordyca` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use fordyca::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut map = ArenaMap::new(&ArenaConfig::new(40.0, 40.0)).unwrap();
//! for (i, (x, y)) in [(10, 10), (11, 10), (10, 11), (11, 11)].into_iter().enumerate() {
//!     map.block_add(BlockId(i as u32), DiscreteCoord::new(x, y)).unwrap();
//! }
//!
//! let mut config = CachesConfig::default();
//! config.dynamic.enable = true;
//! let mut mgr = DynamicCacheManager::new(config, &map).unwrap();
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
//!
//! let created = mgr.create(&mut map, Timestep(1), &mut rng).unwrap();
//! assert_eq!(created.len(), 1);
//! assert_eq!(mgr.caches_created(), 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `fordyca-core` | IDs, geometry, `Entity2D`, `ConfigError` |
//! | [`arena`] | `fordyca-arena` | Grid, cells, blocks, caches, clusters, nests |
//! | [`caches`] | `fordyca-caches` | Cache creation, verification, lifecycle managers |
//! | [`site`] | `fordyca-site` | Constrained cache site selection |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, geometry and IDs (`fordyca-core`).
pub use fordyca_core as types;

/// Arena model (`fordyca-arena`).
///
/// [`arena::ArenaMap`] owns the grid, the block store and every committed
/// cache; [`arena::ArenaMap::split_mut`] gives a creation pass disjoint
/// borrows of them.
pub use fordyca_arena as arena;

/// Cache creation and lifecycle (`fordyca-caches`).
///
/// [`caches::DynamicCacheManager`] runs one creation pass per tick;
/// [`caches::StaticCacheManager`] keeps caches at fixed locations.
pub use fordyca_caches as caches;

/// Cache site selection (`fordyca-site`).
pub use fordyca_site as site;

/// Common imports for typical FORDYCA usage.
///
/// ```rust
/// use fordyca::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use fordyca_core::{
        BlockId, CacheId, ClusterId, ConfigError, DiscreteCoord, Entity2D, NestId, RealRange,
        RobotId, Timestep, Vec2,
    };

    // Arena
    pub use fordyca_arena::{
        ArenaCache, ArenaConfig, ArenaError, ArenaMap, Block, BlockCluster, Nest,
    };

    // Caches
    pub use fordyca_caches::{
        static_cache_locs, BlockDistribution, CacheError, CachesConfig, DynamicCacheConfig,
        DynamicCacheManager, LifecycleMetrics, StaticCacheConfig, StaticCacheManager,
        UtilizationMetrics,
    };

    // Site selection
    pub use fordyca_site::{CacheSiteSelector, SiteSelectionConfig};
}
