//! Grid cells and their occupancy state.

use fordyca_core::{BlockId, CacheId, DiscreteCoord};
use smallvec::SmallVec;

/// What currently occupies a grid cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CellState {
    /// Nothing.
    #[default]
    Empty,
    /// A single free block.
    HasBlock(BlockId),
    /// The host cell of a cache, holding all of its blocks.
    HasCache {
        /// The cache hosted here.
        cache: CacheId,
        /// Blocks in the cache, host-cell block first.
        blocks: SmallVec<[BlockId; 8]>,
    },
    /// Part of a cache's extent other than its host cell.
    CacheExtent(CacheId),
}

/// A single cell of the arena grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    loc: DiscreteCoord,
    state: CellState,
}

impl Cell {
    pub(crate) fn new(loc: DiscreteCoord) -> Self {
        Self {
            loc,
            state: CellState::Empty,
        }
    }

    /// Location of the cell on the grid.
    pub fn loc(&self) -> DiscreteCoord {
        self.loc
    }

    /// Current occupancy.
    pub fn state(&self) -> &CellState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    /// `true` if nothing occupies the cell.
    pub fn is_empty(&self) -> bool {
        matches!(self.state, CellState::Empty)
    }

    /// The free block on this cell, if any.
    pub fn block(&self) -> Option<BlockId> {
        match self.state {
            CellState::HasBlock(id) => Some(id),
            _ => None,
        }
    }

    /// The cache this cell hosts or belongs to the extent of.
    pub fn cache(&self) -> Option<CacheId> {
        match self.state {
            CellState::HasCache { cache, .. } | CellState::CacheExtent(cache) => Some(cache),
            _ => None,
        }
    }

    /// Number of blocks physically on the cell.
    pub fn block_count(&self) -> usize {
        match &self.state {
            CellState::HasBlock(_) => 1,
            CellState::HasCache { blocks, .. } => blocks.len(),
            CellState::Empty | CellState::CacheExtent(_) => 0,
        }
    }

    /// `true` if the cell hosts a cache.
    pub fn state_has_cache(&self) -> bool {
        matches!(self.state, CellState::HasCache { .. })
    }

    /// `true` if the cell is in a cache's extent but is not its host.
    pub fn state_in_cache_extent(&self) -> bool {
        matches!(self.state, CellState::CacheExtent(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn new_cell_is_empty() {
        let cell = Cell::new(DiscreteCoord::new(3, 4));
        assert!(cell.is_empty());
        assert_eq!(cell.block_count(), 0);
        assert_eq!(cell.loc(), DiscreteCoord::new(3, 4));
    }

    #[test]
    fn cache_host_reports_blocks() {
        let mut cell = Cell::new(DiscreteCoord::new(0, 0));
        cell.set_state(CellState::HasCache {
            cache: CacheId(2),
            blocks: smallvec![BlockId(1), BlockId(5)],
        });
        assert!(cell.state_has_cache());
        assert_eq!(cell.cache(), Some(CacheId(2)));
        assert_eq!(cell.block_count(), 2);
        assert_eq!(cell.block(), None);
    }

    #[test]
    fn extent_cell_has_no_blocks() {
        let mut cell = Cell::new(DiscreteCoord::new(0, 0));
        cell.set_state(CellState::CacheExtent(CacheId(1)));
        assert!(cell.state_in_cache_extent());
        assert_eq!(cell.cache(), Some(CacheId(1)));
        assert_eq!(cell.block_count(), 0);
    }
}
