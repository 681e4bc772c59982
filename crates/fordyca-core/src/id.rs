//! Strongly-typed identifiers and the [`Timestep`] counter.

use std::fmt;
use std::ops::Sub;

/// Identifies a block within the arena.
///
/// Block IDs are assigned when the arena is populated and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

impl From<u32> for BlockId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a cache within the arena.
///
/// Allocated from the arena map when a cache is materialized on the grid,
/// including candidates that are later discarded, so IDs of discarded
/// caches are never handed out twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheId(pub u32);

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cache{}", self.0)
    }
}

impl From<u32> for CacheId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a block cluster produced by a clustered block distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster{}", self.0)
    }
}

impl From<u32> for ClusterId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a nest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NestId(pub u32);

impl fmt::Display for NestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nest{}", self.0)
    }
}

impl From<u32> for NestId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies the robot currently carrying a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RobotId(pub u32);

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fb{}", self.0)
    }
}

impl From<u32> for RobotId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing simulation timestep.
///
/// Incremented once per control-step loop. Differences between two
/// timesteps are themselves timesteps (e.g. a cache's age at depletion).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestep(pub u64);

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Timestep {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl Sub for Timestep {
    type Output = Timestep;

    /// Saturating difference, so an age is never negative.
    fn sub(self, rhs: Self) -> Self::Output {
        Timestep(self.0.saturating_sub(rhs.0))
    }
}
