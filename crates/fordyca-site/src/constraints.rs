//! Proximity constraints on a cache site.

use crate::config::SiteSelectionConfig;
use fordyca_arena::{ArenaCache, Block};
use fordyca_core::{BlockId, CacheId, Entity2D, Vec2};

/// Violation tolerance when checking a returned site.
pub const CONSTRAINT_TOL: f64 = 1e-8;

/// One minimum-distance requirement.
///
/// The constraint value `prox - |s - center|` is satisfied when `<= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SiteConstraint {
    /// Stay away from a known cache's center.
    Cache {
        /// The cache.
        id: CacheId,
        /// Its center.
        center: Vec2,
        /// Minimum distance.
        prox: f64,
    },
    /// Stay away from a known block.
    Block {
        /// The block.
        id: BlockId,
        /// Its center.
        center: Vec2,
        /// Minimum distance.
        prox: f64,
    },
    /// Stay away from the nest center.
    Nest {
        /// Nest center.
        center: Vec2,
        /// Minimum distance.
        prox: f64,
    },
}

impl SiteConstraint {
    /// Constraint value at `site`; positive means violated by that much.
    /// A NaN site violates maximally.
    pub fn value(&self, site: Vec2) -> f64 {
        if site.is_nan() {
            return f64::MAX;
        }
        let (center, prox) = match *self {
            Self::Cache { center, prox, .. }
            | Self::Block { center, prox, .. }
            | Self::Nest { center, prox } => (center, prox),
        };
        prox - site.distance(center)
    }
}

/// Every constraint bound for one selection call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SiteConstraintSet {
    constraints: Vec<SiteConstraint>,
}

impl SiteConstraintSet {
    /// Bind each known cache, each known block and the nest to its
    /// configured proximity.
    pub fn new(caches: &[&ArenaCache], blocks: &[&Block], config: &SiteSelectionConfig) -> Self {
        let mut constraints = Vec::with_capacity(caches.len() + blocks.len() + 1);
        constraints.extend(caches.iter().map(|c| SiteConstraint::Cache {
            id: c.id(),
            center: c.rcenter2d(),
            prox: config.cache_prox_dist,
        }));
        constraints.extend(blocks.iter().map(|b| SiteConstraint::Block {
            id: b.id(),
            center: b.rcenter2d(),
            prox: config.block_prox_dist,
        }));
        constraints.push(SiteConstraint::Nest {
            center: config.nest_loc,
            prox: config.nest_prox_dist,
        });
        Self { constraints }
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// `true` if there are no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// The constraints in binding order: caches, blocks, nest.
    pub fn iter(&self) -> impl Iterator<Item = &SiteConstraint> {
        self.constraints.iter()
    }

    /// Sum of squared violations at `site`, zero when feasible.
    pub fn penalty(&self, site: Vec2) -> f64 {
        if site.is_nan() {
            return f64::MAX;
        }
        let sum: f64 = self
            .constraints
            .iter()
            .map(|c| c.value(site).max(0.0))
            .map(|g| g * g)
            .sum();
        sum.min(f64::MAX)
    }

    /// Constraints violated at `site` by more than [`CONSTRAINT_TOL`].
    pub fn violated(&self, site: Vec2) -> impl Iterator<Item = &SiteConstraint> + '_ {
        self.constraints
            .iter()
            .filter(move |c| c.value(site) > CONSTRAINT_TOL)
    }

    /// `true` if no constraint is violated beyond [`CONSTRAINT_TOL`].
    pub fn satisfied(&self, site: Vec2) -> bool {
        self.violated(site).next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fordyca_core::DiscreteCoord;

    fn config() -> SiteSelectionConfig {
        SiteSelectionConfig {
            nest_loc: Vec2::new(20.0, 20.0),
            cache_prox_dist: 5.0,
            block_prox_dist: 2.0,
            nest_prox_dist: 6.0,
            ..Default::default()
        }
    }

    #[test]
    fn binds_caches_blocks_and_nest() {
        let block = Block::new(BlockId(0), DiscreteCoord::new(3, 3), 1.0);
        let set = SiteConstraintSet::new(&[], &[&block], &config());
        assert_eq!(set.len(), 2);
        assert!(matches!(
            set.iter().last(),
            Some(SiteConstraint::Nest { prox, .. }) if *prox == 6.0
        ));
    }

    #[test]
    fn nest_violation() {
        let set = SiteConstraintSet::new(&[], &[], &config());
        assert!(!set.satisfied(Vec2::new(22.0, 20.0)));
        assert!(set.satisfied(Vec2::new(26.0, 20.0)));
        assert!((set.penalty(Vec2::new(22.0, 20.0)) - 16.0).abs() < 1e-12);
        assert_eq!(set.penalty(Vec2::new(30.0, 20.0)), 0.0);
    }

    #[test]
    fn block_violation_is_reported() {
        let block = Block::new(BlockId(4), DiscreteCoord::new(3, 3), 1.0);
        let set = SiteConstraintSet::new(&[], &[&block], &config());
        let bad: Vec<_> = set.violated(Vec2::new(4.0, 3.5)).collect();
        assert_eq!(bad.len(), 1);
        assert!(matches!(bad[0], SiteConstraint::Block { id: BlockId(4), .. }));
    }

    #[test]
    fn nan_violates_everything() {
        let set = SiteConstraintSet::new(&[], &[], &config());
        assert!(!set.satisfied(Vec2::new(f64::NAN, f64::NAN)));
        assert_eq!(set.penalty(Vec2::new(f64::NAN, 0.0)), f64::MAX);
    }
}
