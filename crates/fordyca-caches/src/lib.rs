//! Cache creation and lifecycle management for FORDYCA arenas.
//!
//! A dynamic creation pass runs once per tick:
//!
//! 1. [`creation_blocks_alloc`] partitions the arena's blocks into
//!    *usable* blocks (may seed a new cache) and *absorbable* blocks (may
//!    be swept into one because they lie under its extent).
//! 2. [`DynamicCacheCreator::create_all`] groups nearby usable blocks,
//!    finds a conflict-free center for each group with the
//!    [`CacheCenterCalculator`], materializes the cache on the grid and
//!    checks it with the [`CacheVerifier`], rolling back failures.
//! 3. [`DynamicCacheManager::create`] commits the survivors to the arena
//!    map and updates the [`LifecycleMetrics`] counters.
//!
//! Static caches at fixed locations are handled by
//! [`StaticCacheManager`], using locations from [`static_cache_locs`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alloc;
pub mod center;
pub mod config;
pub mod creator;
pub mod dimension;
pub mod dynamic;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod static_locs;
pub mod static_manager;
pub mod verifier;

pub use alloc::{
    absorbable_filter, creation_blocks_alloc, creation_blocks_alloc_check, usable_filter,
    CreationBlocks,
};
pub use center::{CacheCenterCalculator, OVERLAP_SEARCH_MAX_TRIES};
pub use config::{CachesConfig, DynamicCacheConfig, StaticCacheConfig};
pub use creator::BaseCreator;
pub use dimension::dimension_check;
pub use dynamic::{CreationResult, DynamicCacheCreator, DynamicCreationParams};
pub use error::{CacheError, VerifyError};
pub use manager::{BaseManager, DynamicCacheManager};
pub use metrics::{LifecycleCounters, LifecycleMetrics, UtilizationMetrics};
pub use static_locs::{static_cache_locs, BlockDistribution};
pub use static_manager::StaticCacheManager;
pub use verifier::CacheVerifier;
