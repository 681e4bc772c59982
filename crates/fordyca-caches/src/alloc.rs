//! Partitioning blocks into those available for cache creation.

use fordyca_arena::{ArenaCache, Block, BlockCluster, BlockStore};
use fordyca_core::BlockId;
use indexmap::IndexSet;
use tracing::{debug, error, warn};

/// Blocks available to one creation pass.
///
/// `usable` blocks may seed or join a candidate group. `absorbable` is a
/// superset: blocks that may be swept into a cache because they lie under
/// its extent. Both keep the block store's order so a pass is
/// reproducible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreationBlocks {
    /// Blocks that may form new caches.
    pub usable: Vec<BlockId>,
    /// Blocks that may be absorbed into new caches.
    pub absorbable: IndexSet<BlockId>,
}

/// Apply the usable and absorbable filters to every block in the store.
pub fn creation_blocks_alloc<U, A>(
    blocks: &BlockStore,
    caches: &[ArenaCache],
    clusters: &[BlockCluster],
    usable: U,
    absorbable: A,
) -> CreationBlocks
where
    U: Fn(&Block, &[ArenaCache], &[BlockCluster]) -> bool,
    A: Fn(&Block, &[ArenaCache], &[BlockCluster]) -> bool,
{
    let mut out = CreationBlocks::default();
    for block in blocks.values() {
        if usable(block, caches, clusters) {
            out.usable.push(block.id());
        }
        if absorbable(block, caches, clusters) {
            out.absorbable.insert(block.id());
        }
    }
    debug!(
        n_usable = out.usable.len(),
        n_absorbable = out.absorbable.len(),
        "creation blocks allocated"
    );
    out
}

fn in_any_cache(block: &Block, caches: &[ArenaCache]) -> bool {
    caches.iter().any(|c| c.contains_block(block.id()))
}

/// Dynamic creation's usable filter: not in a cache, not in a cluster,
/// not carried.
pub fn usable_filter(block: &Block, caches: &[ArenaCache], clusters: &[BlockCluster]) -> bool {
    !in_any_cache(block, caches)
        && !clusters.iter().any(|c| c.contains_block(block.id()))
        && !block.is_carried_by_robot()
}

/// Dynamic creation's absorbable filter: not in a cache, not carried.
/// Clustered blocks can be absorbed but never seed a cache.
pub fn absorbable_filter(block: &Block, caches: &[ArenaCache], _clusters: &[BlockCluster]) -> bool {
    !in_any_cache(block, caches) && !block.is_carried_by_robot()
}

/// Sanity-check an allocation against the arena's own counts.
///
/// Logs a warning if fewer than `min_blocks` blocks are usable, and an
/// error if the number of blocks that should be usable (all blocks minus
/// carried, cached and clustered ones) differs from the allocation.
/// Returns `false` on the latter. Never aborts the pass.
pub fn creation_blocks_alloc_check(
    alloc: &CreationBlocks,
    blocks: &BlockStore,
    caches: &[ArenaCache],
    clusters: &[BlockCluster],
    min_blocks: usize,
) -> bool {
    let n_usable = alloc.usable.len();
    if n_usable < min_blocks {
        warn!(n_usable, min_blocks, "free block count below minimum for new caches");
    }

    let n_carried = blocks.values().filter(|b| b.is_carried_by_robot()).count();
    let n_cached: usize = caches.iter().map(ArenaCache::n_blocks).sum();
    let n_clustered = blocks
        .values()
        .filter(|b| {
            !b.is_carried_by_robot()
                && !in_any_cache(b, caches)
                && clusters.iter().any(|c| c.contains_block(b.id()))
        })
        .count();
    let expected = blocks
        .len()
        .saturating_sub(n_carried)
        .saturating_sub(n_cached)
        .saturating_sub(n_clustered);
    if expected != n_usable {
        error!(
            expected,
            n_usable, n_carried, n_cached, n_clustered, "block allocation disagrees with arena counts"
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use fordyca_arena::{ArenaConfig, ArenaMap, CellState};
    use fordyca_core::{ClusterId, DiscreteCoord, RealRange, RobotId, Timestep, Vec2};

    fn arena() -> ArenaMap {
        let mut map = ArenaMap::new(&ArenaConfig::new(20.0, 20.0)).unwrap();
        for i in 0..6 {
            map.block_add(BlockId(i), DiscreteCoord::new(i, 1)).unwrap();
        }
        let mut cluster =
            BlockCluster::new(ClusterId(0), RealRange::new(4.0, 6.0), RealRange::new(0.0, 3.0));
        cluster.block_add(BlockId(4));
        cluster.block_add(BlockId(5));
        map.cluster_add(cluster);
        map.block_pickup(BlockId(3), RobotId(0)).unwrap();
        map
    }

    fn with_cache(map: &mut ArenaMap) {
        let host = DiscreteCoord::new(10, 10);
        for b in [BlockId(0), BlockId(1)] {
            map.block_pickup(b, RobotId(9)).unwrap();
        }
        let (mut arena, _) = map.split_mut();
        let id = arena.next_cache_id();
        for b in [BlockId(0), BlockId(1)] {
            arena.block_move(b, host).unwrap();
        }
        arena
            .cell_set(
                host,
                CellState::HasCache {
                    cache: id,
                    blocks: [BlockId(0), BlockId(1)].into_iter().collect(),
                },
            )
            .unwrap();
        let cache = ArenaCache::new(
            id,
            1.0,
            1.0,
            Vec2::new(10.5, 10.5),
            vec![BlockId(0), BlockId(1)],
            Timestep(0),
        )
        .unwrap();
        map.caches_add(vec![cache]).unwrap();
    }

    #[test]
    fn cluster_blocks_are_absorbable_but_not_usable() {
        let map = arena();
        let alloc = creation_blocks_alloc(
            map.blocks(),
            map.caches(),
            map.clusters(),
            usable_filter,
            absorbable_filter,
        );
        assert_eq!(alloc.usable, vec![BlockId(0), BlockId(1), BlockId(2)]);
        let absorbable: Vec<_> = alloc.absorbable.iter().copied().collect();
        assert_eq!(
            absorbable,
            vec![BlockId(0), BlockId(1), BlockId(2), BlockId(4), BlockId(5)]
        );
        assert!(creation_blocks_alloc_check(
            &alloc,
            map.blocks(),
            map.caches(),
            map.clusters(),
            2
        ));
    }

    #[test]
    fn cached_blocks_are_excluded() {
        let mut map = arena();
        with_cache(&mut map);
        let alloc = creation_blocks_alloc(
            map.blocks(),
            map.caches(),
            map.clusters(),
            usable_filter,
            absorbable_filter,
        );
        assert_eq!(alloc.usable, vec![BlockId(2)]);
        assert!(!alloc.absorbable.contains(&BlockId(0)));
        assert!(creation_blocks_alloc_check(
            &alloc,
            map.blocks(),
            map.caches(),
            map.clusters(),
            4
        ));
    }

    #[test]
    fn mismatched_filter_fails_the_check() {
        let map = arena();
        let alloc = creation_blocks_alloc(
            map.blocks(),
            map.caches(),
            map.clusters(),
            |_, _, _| true,
            absorbable_filter,
        );
        assert_eq!(alloc.usable.len(), 6);
        assert!(!creation_blocks_alloc_check(
            &alloc,
            map.blocks(),
            map.caches(),
            map.clusters(),
            2
        ));
    }
}
