//! Error types for arena map operations.

use fordyca_core::{BlockId, CacheId, ConfigError, DiscreteCoord};
use std::error::Error;
use std::fmt;

/// Errors arising from arena construction or grid/entity mutation.
///
/// Every variant signals a broken contract between the cache subsystem
/// and the arena (a cell in an unexpected state, an id that does not
/// exist). Callers treat them as fatal.
#[derive(Clone, Debug, PartialEq)]
pub enum ArenaError {
    /// The arena configuration failed validation.
    Config(ConfigError),
    /// A discrete coordinate is outside the grid.
    CoordOutOfBounds {
        /// The offending coordinate.
        coord: DiscreteCoord,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// A cell was not in the state the operation requires.
    CellConflict {
        /// The offending cell.
        coord: DiscreteCoord,
        /// What was expected and what was found.
        reason: String,
    },
    /// No block with this id exists in the block store.
    UnknownBlock(BlockId),
    /// No committed cache with this id exists in the map.
    UnknownCache(CacheId),
    /// A block id was added to the store twice.
    DuplicateBlock(BlockId),
    /// A drop was requested for a block no robot is carrying.
    BlockNotCarried(BlockId),
    /// A cache violates the grid contract (center not on a cell center,
    /// dimension not an odd number of cells, too few blocks).
    InvalidCache {
        /// The cache in question.
        cache: CacheId,
        /// What was wrong.
        reason: String,
    },
    /// No empty cell outside the nests could be found for a block.
    NoFreeCell {
        /// The block being placed.
        block: BlockId,
        /// How many cells were tried.
        attempts: u32,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid arena configuration: {e}"),
            Self::CoordOutOfBounds { coord, bounds } => {
                write!(f, "cell {coord} out of bounds: {bounds}")
            }
            Self::CellConflict { coord, reason } => {
                write!(f, "cell {coord} in unexpected state: {reason}")
            }
            Self::UnknownBlock(id) => write!(f, "no such block: {id}"),
            Self::UnknownCache(id) => write!(f, "no such cache: {id}"),
            Self::DuplicateBlock(id) => write!(f, "block {id} already in the arena"),
            Self::BlockNotCarried(id) => write!(f, "block {id} is not being carried"),
            Self::InvalidCache { cache, reason } => {
                write!(f, "invalid cache {cache}: {reason}")
            }
            Self::NoFreeCell { block, attempts } => {
                write!(f, "no free cell for block {block} after {attempts} attempts")
            }
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ArenaError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
