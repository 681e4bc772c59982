//! Integration test: end-to-end dynamic creation passes on fixture arenas.
//!
//! Runs the dynamic manager against small hand-built arenas and checks
//! the caches it commits, the blocks it leaves free, and the lifecycle
//! counters it reports.

use fordyca_arena::ArenaMap;
use fordyca_caches::{CachesConfig, DynamicCacheConfig, DynamicCacheManager, LifecycleMetrics};
use fordyca_core::{Entity2D, RobotId, Timestep, Vec2};
use fordyca_test_utils::fixtures::{
    assert_block_conservation, assert_cache_geometry, assert_no_cache_overlap, foraging_arena,
    sparse_group, two_groups,
};
use fordyca_test_utils::TestArenaBuilder;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn dynamic_config(min_blocks: usize, min_dist: f64, strict: bool) -> CachesConfig {
    CachesConfig {
        dimension: 3.0,
        dynamic: DynamicCacheConfig {
            enable: true,
            min_dist,
            min_blocks,
            strict_constraints: strict,
        },
        ..Default::default()
    }
}

fn run_pass(map: &mut ArenaMap, config: CachesConfig, seed: u64) -> DynamicCacheManager {
    let mut mgr = DynamicCacheManager::new(config, map).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    mgr.create(map, Timestep(1), &mut rng).unwrap();
    mgr
}

#[test]
fn two_distant_groups_make_two_caches() {
    let mut map = two_groups();
    let mgr = run_pass(&mut map, dynamic_config(4, 3.0, true), 7);

    assert_eq!(map.caches().len(), 2);
    assert_eq!(mgr.caches_created(), 2);
    assert_eq!(mgr.caches_discarded(), 0);
    for (cache, group) in map
        .caches()
        .iter()
        .zip([Vec2::new(10.5, 10.5), Vec2::new(50.5, 50.5)])
    {
        assert!(cache.n_blocks() >= 4);
        assert!(
            cache.rcenter2d().distance(group) <= 3.0,
            "{} at {} far from its group",
            cache.id(),
            cache.rcenter2d()
        );
    }
    assert_block_conservation(&map);
    assert_no_cache_overlap(&map);
    assert_cache_geometry(&map);
}

#[test]
fn sparse_anchor_in_strict_mode_makes_nothing() {
    let mut map = sparse_group();
    let mgr = run_pass(&mut map, dynamic_config(4, 3.0, true), 7);

    assert!(map.caches().is_empty());
    assert_eq!(mgr.caches_created(), 0);
    let free = map.grid().cells().filter(|c| c.block().is_some()).count();
    assert_eq!(free, 3);
    assert_block_conservation(&map);
}

#[test]
fn sparse_anchor_in_relaxed_mode_makes_a_cache() {
    let mut map = sparse_group();
    run_pass(&mut map, dynamic_config(4, 3.0, false), 7);
    assert_eq!(map.caches().len(), 1);
    assert_eq!(map.caches()[0].n_blocks(), 3);
    assert_block_conservation(&map);
}

#[test]
fn even_dimension_is_normalized_down() {
    let mut map = two_groups();
    let mut config = dynamic_config(4, 3.0, true);
    config.dimension = 4.0;
    let mgr = run_pass(&mut map, config, 1);
    assert_eq!(mgr.cache_dim(), 3.0);
    for cache in map.caches() {
        assert_eq!(cache.dimension(), 3.0);
    }
}

#[test]
fn carried_and_clustered_blocks_never_seed_caches() {
    let mut map = TestArenaBuilder::new(40.0, 40.0)
        .cluster(
            fordyca_core::RealRange::new(4.0, 8.0),
            fordyca_core::RealRange::new(4.0, 8.0),
            &[(5, 5), (6, 5), (5, 6), (6, 6)],
        )
        .carried_block(20, 20, RobotId(0))
        .carried_block(21, 20, RobotId(1))
        .build()
        .unwrap();
    let mgr = run_pass(&mut map, dynamic_config(2, 3.0, true), 3);
    assert!(map.caches().is_empty());
    assert_eq!(mgr.caches_discarded(), 0);
    assert_block_conservation(&map);
}

#[test]
fn blocks_beside_a_cluster_form_a_cache_outside_it() {
    let mut map = TestArenaBuilder::new(40.0, 40.0)
        .cluster(
            fordyca_core::RealRange::new(10.0, 16.0),
            fordyca_core::RealRange::new(10.0, 16.0),
            &[(11, 11), (12, 12)],
        )
        .blocks(&[(16, 12), (17, 12), (16, 13), (17, 13)])
        .build()
        .unwrap();
    run_pass(&mut map, dynamic_config(4, 3.0, true), 9);
    assert_eq!(map.caches().len(), 1);
    assert_no_cache_overlap(&map);
    assert_block_conservation(&map);
}

#[test]
fn repeated_passes_do_not_reuse_blocks() {
    let mut map = foraging_arena(120, 21);
    let mut mgr = DynamicCacheManager::new(dynamic_config(3, 2.0, true), &map).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for t in 0..5 {
        mgr.create(&mut map, Timestep(t), &mut rng).unwrap();
        assert_block_conservation(&map);
        assert_no_cache_overlap(&map);
        assert_cache_geometry(&map);
    }
    assert_eq!(mgr.caches_created(), map.caches().len());
}

#[test]
fn identical_seeds_give_identical_arenas() {
    let run = |seed| {
        let mut map = foraging_arena(80, 4);
        run_pass(&mut map, dynamic_config(3, 2.5, false), seed);
        map.caches()
            .iter()
            .map(|c| (c.dcenter2d(), c.blocks().to_vec()))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(17), run(17));
}
