//! Benchmark profiles for FORDYCA cache management.
//!
//! - [`reference_arena`]: 100x100 arena with a nest, four clusters and
//!   scattered free blocks
//! - [`stress_arena`]: 300x300 arena at ten times the block count
//! - [`dynamic_profile`]: cache configuration used by both

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use fordyca_arena::{ArenaConfig, ArenaError, ArenaMap, BlockCluster, Nest};
use fordyca_caches::CachesConfig;
use fordyca_core::{BlockId, ClusterId, DiscreteCoord, NestId, RealRange, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build the reference arena: 100x100, 400 free blocks plus 64 in
/// clusters.
pub fn reference_arena(seed: u64) -> Result<ArenaMap, ArenaError> {
    profile_arena(100, 400, seed)
}

/// Build the stress arena: 300x300, 4000 free blocks plus 64 in
/// clusters.
pub fn stress_arena(seed: u64) -> Result<ArenaMap, ArenaError> {
    profile_arena(300, 4000, seed)
}

/// Dynamic caches enabled, groups of 3 within 2.5 of each other.
pub fn dynamic_profile() -> CachesConfig {
    let mut config = CachesConfig::default();
    config.dynamic.enable = true;
    config.dynamic.min_dist = 2.5;
    config.dynamic.min_blocks = 3;
    config
}

/// A square arena of `size` cells with a central nest, one 4x4 cluster
/// near each corner and `n_free` blocks placed by a seeded RNG.
fn profile_arena(size: u32, n_free: u32, seed: u64) -> Result<ArenaMap, ArenaError> {
    let side = size as f64;
    let mut map = ArenaMap::new(&ArenaConfig::new(side, side))?;
    let nest = Nest::new(NestId(0), Vec2::new(side / 2.0, side / 2.0), 8.0, 8.0);

    let mut next = 0u32;
    for (i, (cx, cy)) in [(8, 8), (size - 12, 8), (8, size - 12), (size - 12, size - 12)]
        .into_iter()
        .enumerate()
    {
        let mut cluster = BlockCluster::new(
            ClusterId(i as u32),
            RealRange::new(cx as f64, cx as f64 + 4.0),
            RealRange::new(cy as f64, cy as f64 + 4.0),
        );
        for dx in 0..4 {
            for dy in 0..4 {
                map.block_add(BlockId(next), DiscreteCoord::new(cx + dx, cy + dy))?;
                cluster.block_add(BlockId(next));
                next += 1;
            }
        }
        map.cluster_add(cluster);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut placed = 0;
    while placed < n_free {
        let coord = DiscreteCoord::new(rng.random_range(1..size - 1), rng.random_range(1..size - 1));
        let center = Vec2::new(coord.x as f64 + 0.5, coord.y as f64 + 0.5);
        if nest.contains_point(center) || !map.grid().access(coord)?.is_empty() {
            continue;
        }
        map.block_add(BlockId(next), coord)?;
        next += 1;
        placed += 1;
    }
    map.nest_add(nest);
    Ok(map)
}
