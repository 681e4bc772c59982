//! Runs dynamic cache creation over a small foraging arena.
//!
//! Blocks are scattered at random outside the nest, a few ticks of
//! creation passes run with robots picking blocks out of caches in
//! between, and a forager then asks for a new cache site.
//!
//! ```text
//! RUST_LOG=fordyca_caches=debug cargo run --example creation_pass
//! ```

use fordyca::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

const ARENA_SIZE: f64 = 48.0;
const N_BLOCKS: u32 = 120;
const TICKS: u64 = 5;

fn build_arena(rng: &mut ChaCha8Rng) -> Result<ArenaMap, ArenaError> {
    let mut map = ArenaMap::new(&ArenaConfig::new(ARENA_SIZE, ARENA_SIZE))?;
    let nest = Nest::new(NestId(0), Vec2::new(24.0, 24.0), 6.0, 6.0);
    let mut placed = 0;
    while placed < N_BLOCKS {
        let coord = DiscreteCoord::new(rng.random_range(1..47), rng.random_range(1..47));
        let center = Vec2::new(coord.x as f64 + 0.5, coord.y as f64 + 0.5);
        if nest.contains_point(center) || map.grid().access(coord)?.block().is_some() {
            continue;
        }
        map.block_add(BlockId(placed), coord)?;
        placed += 1;
    }
    map.nest_add(nest);
    Ok(map)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut map = build_arena(&mut rng)?;

    let mut config = CachesConfig::default();
    config.dynamic.enable = true;
    config.dynamic.min_dist = 2.5;
    config.dynamic.min_blocks = 3;
    let mut mgr = DynamicCacheManager::new(config, &map)?;

    let mut robot = 0;
    for t in 0..TICKS {
        let created = mgr.create(&mut map, Timestep(t), &mut rng)?;
        println!("tick {t}: created {} caches, {} in arena", created.len(), map.caches().len());

        // each cache loses one block to a passing robot
        let picks: Vec<BlockId> = map
            .caches()
            .iter()
            .filter_map(|c| c.blocks().last().copied())
            .collect();
        for block in picks {
            map.block_pickup(block, RobotId(robot))?;
            robot += 1;
        }
        let depleted = mgr.base_mut().depleted_caches_remove(&mut map, Timestep(t))?;
        if !depleted.is_empty() {
            println!("tick {t}: {} caches depleted", depleted.len());
        }
    }

    println!(
        "created={} discarded={} depleted={} ages={:?}",
        mgr.caches_created(),
        mgr.caches_discarded(),
        mgr.caches_depleted(),
        mgr.cache_depletion_ages()
    );

    let mut selector = CacheSiteSelector::new(SiteSelectionConfig {
        nest_loc: Vec2::new(24.0, 24.0),
        site_xrange: RealRange::new(2.0, ARENA_SIZE - 2.0),
        site_yrange: RealRange::new(2.0, ARENA_SIZE - 2.0),
        ..Default::default()
    })?;
    let known: Vec<&ArenaCache> = map.caches().iter().collect();
    match selector.select(&known, &[], Vec2::new(8.0, 40.0), &mut rng) {
        Some(site) => println!("new cache site: {site}"),
        None => println!("no acceptable cache site"),
    }
    Ok(())
}
