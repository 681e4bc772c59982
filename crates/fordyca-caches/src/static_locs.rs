//! Fixed cache locations for static cache management.

use crate::error::CacheError;
use fordyca_arena::ArenaMap;
use fordyca_core::math::snap_to_cell_center;
use fordyca_core::{Entity2D, Vec2};

/// How blocks were distributed in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockDistribution {
    /// One cluster.
    SingleSource,
    /// Two clusters on opposite sides of the nest.
    DualSource,
    /// Four clusters around a central nest.
    QuadSource,
    /// Blocks scattered uniformly.
    Random,
    /// Blocks in clusters with power-law distributed sizes.
    PowerLaw,
}

/// Quad-source clusters must be within this distance of the nest center
/// on one axis.
const AXIS_ALIGN_TOL: f64 = 0.5;

/// Where static caches go for a given block distribution.
///
/// - Single and dual source: halfway between the nest and each cluster.
/// - Quad source: at 30% or 67.5% of the arena along the axis of each
///   cluster, which must sit level with the nest in X or Y.
/// - Random and power law: four caches at a quarter and three quarters of
///   each axis.
///
/// Every location is snapped to the center of its cell. Arenas with more
/// or fewer than one nest are rejected.
pub fn static_cache_locs(
    map: &ArenaMap,
    distribution: BlockDistribution,
) -> Result<Vec<Vec2>, CacheError> {
    let [nest] = map.nests() else {
        return Err(CacheError::NestCount {
            count: map.nests().len(),
        });
    };
    let n = nest.rcenter2d();
    let xr = map.grid().xrsize();
    let yr = map.grid().yrsize();

    let locs: Vec<Vec2> = match distribution {
        BlockDistribution::SingleSource | BlockDistribution::DualSource => map
            .clusters()
            .iter()
            .map(|c| (c.rcenter2d() + n) / 2.0)
            .collect(),
        BlockDistribution::QuadSource => {
            let mut out = Vec::with_capacity(map.clusters().len());
            for cluster in map.clusters() {
                let c = cluster.rcenter2d();
                let level_y = (c.y - n.y).abs() < AXIS_ALIGN_TOL;
                let level_x = (c.x - n.x).abs() < AXIS_ALIGN_TOL;
                let loc = if level_y && c.x < n.x {
                    Vec2::new(xr * 0.30, c.y)
                } else if level_y && c.x > n.x {
                    Vec2::new(xr * 0.675, c.y)
                } else if level_x && c.y < n.y {
                    Vec2::new(c.x, yr * 0.30)
                } else if level_x && c.y > n.y {
                    Vec2::new(c.x, yr * 0.675)
                } else {
                    return Err(CacheError::UnsupportedDistribution {
                        reason: format!(
                            "quad source {} at {c} not level with nest at {n}",
                            cluster.id()
                        ),
                    });
                };
                out.push(loc);
            }
            out
        }
        BlockDistribution::Random | BlockDistribution::PowerLaw => vec![
            Vec2::new(xr * 0.25, yr * 0.5),
            Vec2::new(xr * 0.75, yr * 0.5),
            Vec2::new(xr * 0.5, yr * 0.25),
            Vec2::new(xr * 0.5, yr * 0.75),
        ],
    };
    let resolution = map.resolution();
    Ok(locs
        .into_iter()
        .map(|v| snap_to_cell_center(v, resolution))
        .collect())
}
