//! Error types for cache creation and verification.

use fordyca_arena::ArenaError;
use fordyca_core::{BlockId, CacheId, ClusterId, ConfigError, NestId};
use std::error::Error;
use std::fmt;

// ── VerifyError ────────────────────────────────────────────────────

/// The first check a candidate cache failed during verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyError {
    /// The host cell does not record this cache.
    HostCellMismatch {
        /// The cache being verified.
        cache: CacheId,
        /// What the host cell holds instead.
        found: String,
    },
    /// The host cell and the cache disagree on how many blocks it holds.
    BlockCountMismatch {
        /// The cache being verified.
        cache: CacheId,
        /// Blocks on the host cell.
        cell: usize,
        /// Blocks in the cache.
        cache_count: usize,
    },
    /// The cache holds fewer than the minimum number of blocks.
    TooFewBlocks {
        /// The cache being verified.
        cache: CacheId,
        /// Blocks it holds.
        n_blocks: usize,
    },
    /// A cache block is not anchored on the host cell.
    BlockNotOnHost {
        /// The cache being verified.
        cache: CacheId,
        /// The misplaced block.
        block: BlockId,
    },
    /// A free block lies inside the cache extent.
    FreeBlockOverlap {
        /// The cache being verified.
        cache: CacheId,
        /// The overlapping block.
        block: BlockId,
    },
    /// The cache extent overlaps a block cluster.
    ClusterOverlap {
        /// The cache being verified.
        cache: CacheId,
        /// The overlapped cluster.
        cluster: ClusterId,
    },
    /// The cache extent overlaps a nest.
    NestOverlap {
        /// The cache being verified.
        cache: CacheId,
        /// The overlapped nest.
        nest: NestId,
    },
    /// A block is listed twice in the same cache.
    DuplicateBlock {
        /// The cache being verified.
        cache: CacheId,
        /// The duplicated block.
        block: BlockId,
    },
    /// A block belongs to two caches at once.
    BlockInTwoCaches {
        /// The shared block.
        block: BlockId,
        /// The cache being verified.
        cache: CacheId,
        /// The other cache holding it.
        other: CacheId,
    },
    /// Two cache extents overlap.
    CacheOverlap {
        /// The cache being verified.
        cache: CacheId,
        /// The overlapped cache.
        other: CacheId,
    },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostCellMismatch { cache, found } => {
                write!(f, "{cache}: host cell holds {found}")
            }
            Self::BlockCountMismatch {
                cache,
                cell,
                cache_count,
            } => write!(f, "{cache}: host cell has {cell} blocks, cache has {cache_count}"),
            Self::TooFewBlocks { cache, n_blocks } => {
                write!(f, "{cache}: only {n_blocks} blocks")
            }
            Self::BlockNotOnHost { cache, block } => {
                write!(f, "{cache}: block {block} not on the host cell")
            }
            Self::FreeBlockOverlap { cache, block } => {
                write!(f, "{cache}: free block {block} inside extent")
            }
            Self::ClusterOverlap { cache, cluster } => {
                write!(f, "{cache}: overlaps {cluster}")
            }
            Self::NestOverlap { cache, nest } => write!(f, "{cache}: overlaps {nest}"),
            Self::DuplicateBlock { cache, block } => {
                write!(f, "{cache}: block {block} listed twice")
            }
            Self::BlockInTwoCaches {
                block,
                cache,
                other,
            } => write!(f, "block {block} in both {cache} and {other}"),
            Self::CacheOverlap { cache, other } => write!(f, "{cache}: overlaps {other}"),
        }
    }
}

impl Error for VerifyError {}

// ── CacheError ─────────────────────────────────────────────────────

/// Errors that abort a cache management operation.
#[derive(Clone, Debug, PartialEq)]
pub enum CacheError {
    /// The arena contract was broken.
    Arena(ArenaError),
    /// Configuration failed validation.
    Config(ConfigError),
    /// A cache that must be valid failed verification.
    Verify(VerifyError),
    /// The configured dimension cannot hold even one grid cell.
    Dimension {
        /// Requested dimension.
        dimension: f64,
        /// Grid resolution.
        resolution: f64,
    },
    /// Static caches need exactly one nest.
    NestCount {
        /// Number of nests in the arena.
        count: usize,
    },
    /// The block distribution cannot host static caches.
    UnsupportedDistribution {
        /// Why the layout was rejected.
        reason: String,
    },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(e) => write!(f, "arena: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Verify(e) => write!(f, "verification failed: {e}"),
            Self::Dimension {
                dimension,
                resolution,
            } => write!(
                f,
                "cache dimension {dimension} is smaller than the grid resolution {resolution}"
            ),
            Self::NestCount { count } => {
                write!(f, "static caches need exactly one nest, arena has {count}")
            }
            Self::UnsupportedDistribution { reason } => {
                write!(f, "unsupported block distribution: {reason}")
            }
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Verify(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for CacheError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<ConfigError> for CacheError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<VerifyError> for CacheError {
    fn from(e: VerifyError) -> Self {
        Self::Verify(e)
    }
}
