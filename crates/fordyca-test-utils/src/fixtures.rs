//! Ready-made scenarios and arena invariant checks.
//!
//! - [`two_groups`]: two tight groups of five blocks far apart.
//! - [`sparse_group`]: an anchor with only two neighbours.
//! - [`foraging_arena`]: a nest, a cluster and scattered free blocks.
//!
//! The `assert_*` helpers panic with a description of the first
//! violation, for use after a creation pass.

use crate::TestArenaBuilder;
use fordyca_arena::{ArenaMap, CellState};
use fordyca_core::{BlockId, Entity2D, RealRange, Vec2};
use std::collections::HashMap;

/// 100 x 100 arena with five blocks around (10, 10) and five around
/// (50, 50).
pub fn two_groups() -> ArenaMap {
    TestArenaBuilder::new(100.0, 100.0)
        .blocks(&[(10, 10), (11, 10), (10, 11), (11, 11), (9, 10)])
        .blocks(&[(50, 50), (51, 50), (50, 51), (51, 51), (49, 50)])
        .build()
        .expect("two_groups fixture")
}

/// 100 x 100 arena with three blocks within 3.0 of each other and
/// nothing else nearby.
pub fn sparse_group() -> ArenaMap {
    TestArenaBuilder::new(100.0, 100.0)
        .blocks(&[(30, 30), (31, 30), (30, 32)])
        .build()
        .expect("sparse_group fixture")
}

/// 60 x 60 arena with a central nest, one cluster in the north-east and
/// `n_free` scattered blocks.
pub fn foraging_arena(n_free: usize, seed: u64) -> ArenaMap {
    TestArenaBuilder::new(60.0, 60.0)
        .nest(Vec2::new(30.0, 30.0), 6.0, 6.0)
        .cluster(
            RealRange::new(44.0, 50.0),
            RealRange::new(44.0, 50.0),
            &[(45, 45), (46, 46), (47, 45), (48, 48)],
        )
        .random_blocks(n_free, seed)
        .build()
        .expect("foraging_arena fixture")
}

/// Every block is either carried, free on its own cell, or on the host
/// cell of exactly one cache, and every cache's host cell lists exactly
/// that cache's blocks.
pub fn assert_block_conservation(map: &ArenaMap) {
    let mut seen: HashMap<BlockId, &'static str> = HashMap::new();
    for cell in map.grid().cells() {
        match cell.state() {
            CellState::HasBlock(b) => {
                assert!(seen.insert(*b, "free").is_none(), "block {b} on two cells");
                assert_eq!(
                    map.block(*b).map(|blk| blk.danchor2d()),
                    Some(cell.loc()),
                    "block {b} anchor disagrees with its cell"
                );
            }
            CellState::HasCache { cache, blocks } => {
                let c = map
                    .cache(*cache)
                    .unwrap_or_else(|| panic!("host cell {} names unknown {cache}", cell.loc()));
                assert_eq!(c.blocks(), blocks.as_slice(), "{cache} host cell out of sync");
                for b in blocks {
                    assert!(seen.insert(*b, "cached").is_none(), "block {b} placed twice");
                }
            }
            CellState::Empty | CellState::CacheExtent(_) => {}
        }
    }
    for b in map.blocks().values() {
        if b.is_carried_by_robot() {
            assert!(!seen.contains_key(&b.id()), "carried block {} on the grid", b.id());
        } else {
            assert!(seen.contains_key(&b.id()), "block {} lost", b.id());
        }
    }
}

/// No two caches overlap, and no cache overlaps a cluster or nest.
pub fn assert_no_cache_overlap(map: &ArenaMap) {
    let caches = map.caches();
    for (i, a) in caches.iter().enumerate() {
        for b in &caches[i + 1..] {
            assert!(!a.overlaps(b), "{} overlaps {}", a.id(), b.id());
        }
        for cl in map.clusters() {
            assert!(!a.overlaps(cl), "{} overlaps {}", a.id(), cl.id());
        }
        for n in map.nests() {
            assert!(!a.overlaps(n), "{} overlaps {}", a.id(), n.id());
        }
    }
}

/// Every cache spans an odd number of cells and is centered on its host
/// cell.
pub fn assert_cache_geometry(map: &ArenaMap) {
    let res = map.resolution();
    for c in map.caches() {
        assert_eq!(c.cells_per_side() % 2, 1, "{} has even extent", c.id());
        let expected = fordyca_core::math::cell_center(c.dcenter2d(), res);
        assert!(
            c.rcenter2d().distance(expected) < 1e-9,
            "{} center {} off its host cell",
            c.id(),
            c.rcenter2d()
        );
    }
}
