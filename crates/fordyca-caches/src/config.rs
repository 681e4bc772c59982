//! Cache subsystem configuration.

use fordyca_arena::CACHE_MIN_BLOCKS;
use fordyca_core::ConfigError;

// ── DynamicCacheConfig ─────────────────────────────────────────────

/// Parameters for dynamic cache creation.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicCacheConfig {
    /// Whether caches are created dynamically from free blocks. Default: false.
    pub enable: bool,
    /// Largest distance between two blocks for them to join the same
    /// candidate cache, in meters. Default: 3.0.
    pub min_dist: f64,
    /// Blocks a candidate group needs before a cache is attempted.
    /// Default: 4. Must be at least [`CACHE_MIN_BLOCKS`].
    pub min_blocks: usize,
    /// When false, groups smaller than `min_blocks` (but at least
    /// [`CACHE_MIN_BLOCKS`]) are still turned into caches. Default: true.
    pub strict_constraints: bool,
}

impl DynamicCacheConfig {
    /// Default grouping distance.
    pub const DEFAULT_MIN_DIST: f64 = 3.0;

    /// Default group size.
    pub const DEFAULT_MIN_BLOCKS: usize = 4;
}

impl Default for DynamicCacheConfig {
    fn default() -> Self {
        Self {
            enable: false,
            min_dist: Self::DEFAULT_MIN_DIST,
            min_blocks: Self::DEFAULT_MIN_BLOCKS,
            strict_constraints: true,
        }
    }
}

// ── StaticCacheConfig ──────────────────────────────────────────────

/// Parameters for caches at fixed arena locations.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticCacheConfig {
    /// Whether static caches are maintained. Default: false.
    pub enable: bool,
    /// Blocks placed in each static cache when it is (re)created.
    /// Default: 2. Must be at least [`CACHE_MIN_BLOCKS`].
    pub size: usize,
}

impl StaticCacheConfig {
    /// Default static cache size.
    pub const DEFAULT_SIZE: usize = CACHE_MIN_BLOCKS;
}

impl Default for StaticCacheConfig {
    fn default() -> Self {
        Self {
            enable: false,
            size: Self::DEFAULT_SIZE,
        }
    }
}

// ── CachesConfig ───────────────────────────────────────────────────

/// Top-level cache configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct CachesConfig {
    /// Requested cache side length in meters. Normalized to an odd
    /// number of grid cells by [`dimension_check`](crate::dimension_check).
    /// Default: 3.0.
    pub dimension: f64,
    /// Dynamic cache parameters.
    pub dynamic: DynamicCacheConfig,
    /// Static cache parameters.
    pub static_: StaticCacheConfig,
}

impl CachesConfig {
    /// Default cache side length.
    pub const DEFAULT_DIMENSION: f64 = 3.0;

    /// Check every parameter against its allowed domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dimension.is_finite() || self.dimension <= 0.0 {
            return Err(ConfigError::InvalidDimension {
                name: "caches.dimension",
                value: self.dimension,
            });
        }
        if !self.dynamic.min_dist.is_finite() || self.dynamic.min_dist <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "caches.dynamic.min_dist",
                reason: format!("must be finite and positive, got {}", self.dynamic.min_dist),
            });
        }
        if self.dynamic.min_blocks < CACHE_MIN_BLOCKS {
            return Err(ConfigError::InvalidParameter {
                name: "caches.dynamic.min_blocks",
                reason: format!(
                    "{} is below the cache minimum of {CACHE_MIN_BLOCKS}",
                    self.dynamic.min_blocks
                ),
            });
        }
        if self.static_.enable && self.static_.size < CACHE_MIN_BLOCKS {
            return Err(ConfigError::InvalidParameter {
                name: "caches.static.size",
                reason: format!(
                    "{} is below the cache minimum of {CACHE_MIN_BLOCKS}",
                    self.static_.size
                ),
            });
        }
        Ok(())
    }
}

impl Default for CachesConfig {
    fn default() -> Self {
        Self {
            dimension: Self::DEFAULT_DIMENSION,
            dynamic: DynamicCacheConfig::default(),
            static_: StaticCacheConfig::default(),
        }
    }
}
