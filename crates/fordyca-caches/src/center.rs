//! Conflict-free cache center computation.

use fordyca_arena::{ArenaCache, ArenaGrid, Block, BlockCluster, Nest};
use fordyca_core::entity::square_spans;
use fordyca_core::math::{snap_to_cell_center, GEOMETRY_EPSILON};
use fordyca_core::{Entity2D, RealRange, Vec2};
use rand::Rng;
use tracing::{debug, trace, warn};

/// Deconfliction passes before a center search gives up.
pub const OVERLAP_SEARCH_MAX_TRIES: u32 = 100;

/// Finds where a cache built from a group of blocks can be placed.
///
/// The first guess is the centroid of the blocks snapped to its cell
/// center. Each pass then pulls the center inside the arena boundary and
/// pushes it off any nest, cluster or cache it overlaps, by whole cells so
/// it stays on a cell center. The search succeeds on the first pass that
/// moves nothing.
///
/// A move that would return the center to a spot it already held is taken
/// along the other axis instead, so a cache wedged between two obstacles
/// does not bounce between them until the pass budget runs out.
#[derive(Clone, Copy, Debug)]
pub struct CacheCenterCalculator<'a> {
    resolution: f64,
    xrsize: f64,
    yrsize: f64,
    cache_dim: f64,
    clusters: &'a [BlockCluster],
    nests: &'a [Nest],
}

impl<'a> CacheCenterCalculator<'a> {
    /// A calculator for caches of side `cache_dim` on `grid`.
    pub fn new(
        grid: &ArenaGrid,
        cache_dim: f64,
        clusters: &'a [BlockCluster],
        nests: &'a [Nest],
    ) -> Self {
        Self {
            resolution: grid.resolution(),
            xrsize: grid.xrsize(),
            yrsize: grid.yrsize(),
            cache_dim,
            clusters,
            nests,
        }
    }

    /// Compute a center for a cache made of `blocks` that avoids every
    /// nest, cluster and `existing` cache, or `None` if no such center was
    /// found.
    pub fn calc<R: Rng + ?Sized>(
        &self,
        blocks: &[&Block],
        existing: &[&ArenaCache],
        rng: &mut R,
    ) -> Option<Vec2> {
        if blocks.is_empty() {
            return None;
        }
        let sum = blocks.iter().fold(Vec2::ZERO, |acc, b| acc + b.rcenter2d());
        let guess = snap_to_cell_center(sum / blocks.len() as f64, self.resolution);

        let Some(xbounds) = self.center_bounds(self.xrsize) else {
            warn!(arena = self.xrsize, dim = self.cache_dim, "arena too narrow for a cache");
            return None;
        };
        let Some(ybounds) = self.center_bounds(self.yrsize) else {
            warn!(arena = self.yrsize, dim = self.cache_dim, "arena too short for a cache");
            return None;
        };

        let mut center = guess;
        let mut visited = vec![center];
        for pass in 0..OVERLAP_SEARCH_MAX_TRIES {
            let mut moved = false;

            let bounded = Vec2::new(xbounds.clamp(center.x), ybounds.clamp(center.y));
            if bounded != center {
                trace!(from = %center, to = %bounded, "center pulled inside boundary");
                center = bounded;
                visited.push(center);
                moved = true;
            }

            let obstacles = self
                .nests
                .iter()
                .map(|n| n as &dyn Entity2D)
                .chain(self.clusters.iter().map(|c| c as &dyn Entity2D))
                .chain(existing.iter().map(|c| *c as &dyn Entity2D));
            for obstacle in obstacles {
                let (xspan, yspan) = square_spans(center, self.cache_dim);
                if obstacle.overlaps_rect(&xspan, &yspan) {
                    let next = self.deconflict(center, obstacle, &visited, rng);
                    trace!(from = %center, to = %next, "center moved off obstacle");
                    center = next;
                    visited.push(center);
                    moved = true;
                }
            }

            if !moved {
                debug!(%guess, %center, passes = pass + 1, "cache center found");
                return Some(center);
            }
        }
        warn!(
            %guess,
            n_blocks = blocks.len(),
            tries = OVERLAP_SEARCH_MAX_TRIES,
            "no conflict-free cache center"
        );
        None
    }

    /// Cell centers a cache center may occupy along an axis of length
    /// `size`: those within `[dim, size - dim]`.
    fn center_bounds(&self, size: f64) -> Option<RealRange> {
        let res = self.resolution;
        let lo = ((self.cache_dim / res) - 0.5 - GEOMETRY_EPSILON).ceil();
        let hi = (((size - self.cache_dim) / res) - 0.5 + GEOMETRY_EPSILON).floor();
        if lo > hi {
            return None;
        }
        Some(RealRange::new((lo + 0.5) * res, (hi + 0.5) * res))
    }

    /// Move `center` along one axis so the cache no longer overlaps
    /// `obstacle`, choosing the axis that needs the shorter move unless
    /// that lands on a `visited` center.
    fn deconflict<R: Rng + ?Sized>(
        &self,
        center: Vec2,
        obstacle: &dyn Entity2D,
        visited: &[Vec2],
        rng: &mut R,
    ) -> Vec2 {
        let ocenter = obstacle.rcenter2d();
        let dx = self.axis_shift(center.x, ocenter.x, &obstacle.xrspan(), rng);
        let dy = self.axis_shift(center.y, ocenter.y, &obstacle.yrspan(), rng);

        let use_x = if (dx.abs() - dy.abs()).abs() < GEOMETRY_EPSILON {
            rng.random_bool(0.5)
        } else {
            dx.abs() < dy.abs()
        };
        let along_x = snap_to_cell_center(Vec2::new(center.x + dx, center.y), self.resolution);
        let along_y = snap_to_cell_center(Vec2::new(center.x, center.y + dy), self.resolution);
        let (preferred, other) = if use_x {
            (along_x, along_y)
        } else {
            (along_y, along_x)
        };
        let seen = |v: Vec2| visited.iter().any(|p| p.distance(v) < GEOMETRY_EPSILON);
        if seen(preferred) && !seen(other) {
            other
        } else {
            preferred
        }
    }

    /// Signed whole-cell shift on one axis that clears `span`, moving away
    /// from the obstacle's center coordinate `ocenter`.
    fn axis_shift<R: Rng + ?Sized>(
        &self,
        center: f64,
        ocenter: f64,
        span: &RealRange,
        rng: &mut R,
    ) -> f64 {
        let half = self.cache_dim / 2.0;
        let positive = if center > ocenter + GEOMETRY_EPSILON {
            true
        } else if center < ocenter - GEOMETRY_EPSILON {
            false
        } else {
            rng.random_bool(0.5)
        };
        let distance = if positive {
            span.ub() + half - center
        } else {
            center + half - span.lb()
        };
        let cells = (distance / self.resolution - GEOMETRY_EPSILON).ceil().max(1.0);
        let shift = cells * self.resolution;
        if positive {
            shift
        } else {
            -shift
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fordyca_arena::ArenaConfig;
    use fordyca_core::math::{cell_center, real_to_discrete};
    use fordyca_core::{BlockId, CacheId, ClusterId, DiscreteCoord, NestId, Timestep};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid(size: f64) -> ArenaGrid {
        ArenaGrid::new(&ArenaConfig::new(size, size)).unwrap()
    }

    fn blocks_at(cells: &[(u32, u32)]) -> Vec<Block> {
        cells
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Block::new(BlockId(i as u32), DiscreteCoord::new(x, y), 1.0))
            .collect()
    }

    fn is_cell_center(v: Vec2) -> bool {
        v.distance(cell_center(real_to_discrete(v, 1.0), 1.0)) < 1e-6
    }

    fn cache_at(id: u32, center: Vec2) -> ArenaCache {
        ArenaCache::new(CacheId(id), 3.0, 1.0, center, vec![BlockId(90), BlockId(91)], Timestep(0))
            .unwrap()
    }

    #[test]
    fn unobstructed_center_is_snapped_centroid() {
        let g = grid(100.0);
        let calc = CacheCenterCalculator::new(&g, 3.0, &[], &[]);
        let blocks = blocks_at(&[(10, 10), (11, 10), (10, 11), (12, 12)]);
        let refs: Vec<&Block> = blocks.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let c = calc.calc(&refs, &[], &mut rng).unwrap();
        // centroid (11.25, 11.25) lies in cell (11, 11)
        assert_eq!(c, Vec2::new(11.5, 11.5));
    }

    #[test]
    fn center_is_pulled_off_the_boundary() {
        let g = grid(20.0);
        let calc = CacheCenterCalculator::new(&g, 3.0, &[], &[]);
        let blocks = blocks_at(&[(0, 0), (1, 0), (19, 19), (19, 18)]);
        let refs: Vec<&Block> = blocks[..2].iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(calc.calc(&refs, &[], &mut rng), Some(Vec2::new(3.5, 3.5)));
        let refs: Vec<&Block> = blocks[2..].iter().collect();
        assert_eq!(calc.calc(&refs, &[], &mut rng), Some(Vec2::new(16.5, 16.5)));
    }

    #[test]
    fn center_avoids_existing_cache() {
        let g = grid(100.0);
        let calc = CacheCenterCalculator::new(&g, 3.0, &[], &[]);
        let blocks = blocks_at(&[(20, 20), (21, 20)]);
        let refs: Vec<&Block> = blocks.iter().collect();
        let existing = cache_at(0, Vec2::new(21.5, 21.5));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let c = calc.calc(&refs, &[&existing], &mut rng).unwrap();
        let (xs, ys) = square_spans(c, 3.0);
        assert!(!existing.overlaps_rect(&xs, &ys));
        assert!(is_cell_center(c));
        assert!(c.distance(Vec2::new(21.5, 20.5)) <= 3.0 + 1e-9);
    }

    #[test]
    fn center_avoids_nest_and_cluster() {
        let g = grid(50.0);
        let nests = [Nest::new(NestId(0), Vec2::new(25.0, 25.0), 6.0, 6.0)];
        let mut cluster =
            BlockCluster::new(ClusterId(0), RealRange::new(30.0, 36.0), RealRange::new(10.0, 40.0));
        cluster.block_add(BlockId(50));
        let clusters = [cluster];
        let calc = CacheCenterCalculator::new(&g, 3.0, &clusters, &nests);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for cells in [[(24, 24), (25, 25)], [(31, 20), (32, 21)], [(28, 25), (29, 25)]] {
            let blocks = blocks_at(&cells);
            let refs: Vec<&Block> = blocks.iter().collect();
            let c = calc.calc(&refs, &[], &mut rng).unwrap();
            let (xs, ys) = square_spans(c, 3.0);
            assert!(!nests[0].overlaps_rect(&xs, &ys), "{c} overlaps nest");
            assert!(!clusters[0].overlaps_rect(&xs, &ys), "{c} overlaps cluster");
            assert!(is_cell_center(c));
        }
    }

    #[test]
    fn impossible_placement_gives_none() {
        let g = grid(20.0);
        let nests = [Nest::new(NestId(0), Vec2::new(10.0, 10.0), 20.0, 20.0)];
        let calc = CacheCenterCalculator::new(&g, 3.0, &[], &nests);
        let blocks = blocks_at(&[(5, 5), (6, 6)]);
        let refs: Vec<&Block> = blocks.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(calc.calc(&refs, &[], &mut rng), None);
    }

    #[test]
    fn tiny_arena_gives_none() {
        let g = grid(5.0);
        let calc = CacheCenterCalculator::new(&g, 3.0, &[], &[]);
        let blocks = blocks_at(&[(2, 2), (2, 3)]);
        let refs: Vec<&Block> = blocks.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(calc.calc(&refs, &[], &mut rng), None);
    }

    #[test]
    fn no_blocks_gives_none() {
        let g = grid(20.0);
        let calc = CacheCenterCalculator::new(&g, 3.0, &[], &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(calc.calc(&[], &[], &mut rng), None);
    }

    #[test]
    fn equal_seeds_give_equal_centers() {
        let g = grid(60.0);
        let blocks = blocks_at(&[(30, 30), (30, 31), (31, 30)]);
        let refs: Vec<&Block> = blocks.iter().collect();
        let existing = [
            cache_at(0, Vec2::new(30.5, 30.5)),
            cache_at(1, Vec2::new(33.5, 30.5)),
            cache_at(2, Vec2::new(30.5, 33.5)),
        ];
        let existing: Vec<&ArenaCache> = existing.iter().collect();
        let calc = CacheCenterCalculator::new(&g, 3.0, &[], &[]);
        let a = calc.calc(&refs, &existing, &mut ChaCha8Rng::seed_from_u64(42));
        let b = calc.calc(&refs, &existing, &mut ChaCha8Rng::seed_from_u64(42));
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
