//! Post-creation sanity checks for caches.

use crate::error::VerifyError;
use fordyca_arena::{ArenaCache, ArenaGrid, BlockCluster, BlockStore, CellState, Nest, CACHE_MIN_BLOCKS};
use fordyca_core::Entity2D;
use std::collections::HashSet;

/// Checks a freshly built cache against the grid and every other entity.
#[derive(Clone, Copy, Debug)]
pub struct CacheVerifier<'a> {
    grid: &'a ArenaGrid,
    blocks: &'a BlockStore,
    clusters: &'a [BlockCluster],
    nests: &'a [Nest],
}

impl<'a> CacheVerifier<'a> {
    /// A verifier over the current arena state.
    pub fn new(
        grid: &'a ArenaGrid,
        blocks: &'a BlockStore,
        clusters: &'a [BlockCluster],
        nests: &'a [Nest],
    ) -> Self {
        Self {
            grid,
            blocks,
            clusters,
            nests,
        }
    }

    /// Run every check on `cache`, with `others` the caches it must
    /// coexist with. A cache with the same id in `others` is skipped.
    pub fn verify(&self, cache: &ArenaCache, others: &[&ArenaCache]) -> Result<(), VerifyError> {
        let others: Vec<&ArenaCache> = others
            .iter()
            .copied()
            .filter(|c| c.id() != cache.id())
            .collect();
        self.check_internal(cache)?;
        self.check_free_blocks(cache, &others)?;
        self.check_clusters(cache)?;
        self.check_nests(cache)?;
        Self::check_cross(cache, &others)?;
        Self::check_pairwise(cache, &others)
    }

    fn check_internal(&self, cache: &ArenaCache) -> Result<(), VerifyError> {
        let id = cache.id();
        let host = cache.dcenter2d();
        let cell = self
            .grid
            .access(host)
            .map_err(|e| VerifyError::HostCellMismatch {
                cache: id,
                found: e.to_string(),
            })?;
        match cell.state() {
            CellState::HasCache { cache: cid, blocks } if *cid == id => {
                if blocks.len() != cache.n_blocks() {
                    return Err(VerifyError::BlockCountMismatch {
                        cache: id,
                        cell: blocks.len(),
                        cache_count: cache.n_blocks(),
                    });
                }
            }
            other => {
                return Err(VerifyError::HostCellMismatch {
                    cache: id,
                    found: format!("{other:?}"),
                })
            }
        }
        if cache.n_blocks() < CACHE_MIN_BLOCKS {
            return Err(VerifyError::TooFewBlocks {
                cache: id,
                n_blocks: cache.n_blocks(),
            });
        }
        let mut seen = HashSet::with_capacity(cache.n_blocks());
        for &b in cache.blocks() {
            if !seen.insert(b) {
                return Err(VerifyError::DuplicateBlock { cache: id, block: b });
            }
            let on_host = self
                .blocks
                .get(&b)
                .is_some_and(|block| block.danchor2d() == host && !block.is_carried_by_robot());
            if !on_host {
                return Err(VerifyError::BlockNotOnHost { cache: id, block: b });
            }
        }
        Ok(())
    }

    fn check_free_blocks(&self, cache: &ArenaCache, others: &[&ArenaCache]) -> Result<(), VerifyError> {
        let free = self.blocks.values().filter(|b| {
            !b.is_carried_by_robot()
                && !cache.contains_block(b.id())
                && !others.iter().any(|c| c.contains_block(b.id()))
        });
        for block in free {
            if cache.overlaps(block) {
                return Err(VerifyError::FreeBlockOverlap {
                    cache: cache.id(),
                    block: block.id(),
                });
            }
        }
        Ok(())
    }

    fn check_clusters(&self, cache: &ArenaCache) -> Result<(), VerifyError> {
        match self.clusters.iter().find(|c| cache.overlaps(*c)) {
            Some(c) => Err(VerifyError::ClusterOverlap {
                cache: cache.id(),
                cluster: c.id(),
            }),
            None => Ok(()),
        }
    }

    fn check_nests(&self, cache: &ArenaCache) -> Result<(), VerifyError> {
        match self.nests.iter().find(|n| cache.overlaps(*n)) {
            Some(n) => Err(VerifyError::NestOverlap {
                cache: cache.id(),
                nest: n.id(),
            }),
            None => Ok(()),
        }
    }

    fn check_cross(cache: &ArenaCache, others: &[&ArenaCache]) -> Result<(), VerifyError> {
        for &b in cache.blocks() {
            if let Some(other) = others.iter().find(|c| c.contains_block(b)) {
                return Err(VerifyError::BlockInTwoCaches {
                    block: b,
                    cache: cache.id(),
                    other: other.id(),
                });
            }
        }
        Ok(())
    }

    fn check_pairwise(cache: &ArenaCache, others: &[&ArenaCache]) -> Result<(), VerifyError> {
        match others.iter().find(|c| cache.overlaps(**c)) {
            Some(other) => Err(VerifyError::CacheOverlap {
                cache: cache.id(),
                other: other.id(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creator::BaseCreator;
    use fordyca_arena::{ArenaConfig, ArenaMap};
    use fordyca_core::{BlockId, CacheId, ClusterId, DiscreteCoord, NestId, RealRange, Timestep, Vec2};

    fn setup(cells: &[(u32, u32)]) -> ArenaMap {
        let mut map = ArenaMap::new(&ArenaConfig::new(30.0, 30.0)).unwrap();
        for (i, &(x, y)) in cells.iter().enumerate() {
            map.block_add(BlockId(i as u32), DiscreteCoord::new(x, y)).unwrap();
        }
        map
    }

    fn build(map: &mut ArenaMap, center: Vec2, blocks: &[u32]) -> ArenaCache {
        let (mut arena, _) = map.split_mut();
        BaseCreator::new(3.0)
            .create_single_cache(
                &mut arena,
                center,
                blocks.iter().map(|b| BlockId(*b)).collect(),
                Timestep(0),
            )
            .unwrap()
    }

    fn verifier(map: &ArenaMap) -> CacheVerifier<'_> {
        CacheVerifier::new(map.grid(), map.blocks(), map.clusters(), map.nests())
    }

    #[test]
    fn clean_cache_passes() {
        let mut map = setup(&[(5, 5), (6, 5), (20, 20)]);
        let cache = build(&mut map, Vec2::new(5.5, 5.5), &[0, 1]);
        assert_eq!(verifier(&map).verify(&cache, &[]), Ok(()));
    }

    #[test]
    fn free_block_in_extent_fails() {
        let mut map = setup(&[(5, 5), (6, 5), (4, 4)]);
        let cache = build(&mut map, Vec2::new(5.5, 5.5), &[0, 1]);
        assert_eq!(
            verifier(&map).verify(&cache, &[]),
            Err(VerifyError::FreeBlockOverlap {
                cache: cache.id(),
                block: BlockId(2)
            })
        );
    }

    #[test]
    fn nest_and_cluster_overlap_fail() {
        let mut map = setup(&[(5, 5), (6, 5), (15, 15), (16, 15)]);
        map.nest_add(Nest::new(NestId(0), Vec2::new(3.0, 3.0), 4.0, 4.0));
        map.cluster_add(BlockCluster::new(
            ClusterId(3),
            RealRange::new(16.0, 20.0),
            RealRange::new(16.0, 20.0),
        ));
        let near_nest = build(&mut map, Vec2::new(5.5, 5.5), &[0, 1]);
        let near_cluster = build(&mut map, Vec2::new(15.5, 15.5), &[2, 3]);
        assert_eq!(
            verifier(&map).verify(&near_nest, &[]),
            Err(VerifyError::NestOverlap {
                cache: near_nest.id(),
                nest: NestId(0)
            })
        );
        assert_eq!(
            verifier(&map).verify(&near_cluster, &[]),
            Err(VerifyError::ClusterOverlap {
                cache: near_cluster.id(),
                cluster: ClusterId(3)
            })
        );
    }

    #[test]
    fn overlapping_caches_fail() {
        let mut map = setup(&[(5, 5), (6, 5), (7, 7), (8, 7)]);
        let a = build(&mut map, Vec2::new(5.5, 5.5), &[0, 1]);
        let b = build(&mut map, Vec2::new(7.5, 7.5), &[2, 3]);
        assert_eq!(
            verifier(&map).verify(&b, &[&a, &b]),
            Err(VerifyError::CacheOverlap {
                cache: b.id(),
                other: a.id()
            })
        );
    }

    #[test]
    fn shared_block_fails_cross_check() {
        let mut map = setup(&[(5, 5), (6, 5)]);
        let a = build(&mut map, Vec2::new(5.5, 5.5), &[0, 1]);
        let ghost = ArenaCache::new(
            CacheId(99),
            3.0,
            1.0,
            Vec2::new(20.5, 20.5),
            vec![BlockId(0), BlockId(1)],
            Timestep(0),
        )
        .unwrap();
        assert_eq!(
            verifier(&map).verify(&a, &[&ghost]),
            Err(VerifyError::BlockInTwoCaches {
                block: BlockId(0),
                cache: a.id(),
                other: CacheId(99)
            })
        );
    }

    #[test]
    fn cache_missing_from_host_cell_fails() {
        let map = setup(&[(5, 5), (6, 5)]);
        let phantom = ArenaCache::new(
            CacheId(7),
            3.0,
            1.0,
            Vec2::new(5.5, 5.5),
            vec![BlockId(0), BlockId(1)],
            Timestep(0),
        )
        .unwrap();
        assert!(matches!(
            verifier(&map).verify(&phantom, &[]),
            Err(VerifyError::HostCellMismatch { .. })
        ));
    }
}
