//! Integration test: cache depletion and re-creation across ticks.

use fordyca_caches::{CachesConfig, DynamicCacheManager, LifecycleMetrics};
use fordyca_core::{RobotId, Timestep};
use fordyca_test_utils::fixtures::{assert_block_conservation, two_groups};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn depleted_cache_is_removed_and_aged() {
    let mut map = two_groups();
    let mut config = CachesConfig::default();
    config.dynamic.enable = true;
    let mut mgr = DynamicCacheManager::new(config, &map).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    let ids = mgr.create(&mut map, Timestep(100), &mut rng).unwrap();
    assert_eq!(ids.len(), 2);

    let victim = ids[0];
    let blocks = map.cache(victim).unwrap().blocks().to_vec();
    for (i, b) in blocks.iter().skip(1).enumerate() {
        map.block_pickup(*b, RobotId(i as u32)).unwrap();
    }
    let removed = mgr
        .base_mut()
        .depleted_caches_remove(&mut map, Timestep(160))
        .unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id(), victim);
    assert_eq!(map.caches().len(), 1);
    assert_eq!(mgr.cache_depletion_ages(), &[Timestep(60)]);
    assert_block_conservation(&map);

    mgr.reset_metrics();
    assert_eq!(mgr.caches_created(), 0);
    assert_eq!(mgr.caches_depleted(), 0);
}
