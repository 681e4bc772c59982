//! Site selection configuration.

use fordyca_core::{ConfigError, RealRange, Vec2};

/// Parameters for [`CacheSiteSelector`](crate::CacheSiteSelector).
#[derive(Clone, Debug, PartialEq)]
pub struct SiteSelectionConfig {
    /// Center of the nest. Default: (50, 50).
    pub nest_loc: Vec2,
    /// Minimum distance from a site to the center of any known cache.
    /// Default: 8.0.
    pub cache_prox_dist: f64,
    /// Minimum distance from a site to any known block. Default: 4.0.
    pub block_prox_dist: f64,
    /// Minimum distance from a site to the nest center. Default: 8.0.
    pub nest_prox_dist: f64,
    /// X extent of the search box. Default: [2, 98].
    pub site_xrange: RealRange,
    /// Y extent of the search box. Default: [2, 98].
    pub site_yrange: RealRange,
    /// When true, a site violating any constraint is rejected instead of
    /// returned. Default: true.
    pub strict_constraints: bool,
}

impl SiteSelectionConfig {
    /// Default cache proximity.
    pub const DEFAULT_CACHE_PROX_DIST: f64 = 8.0;

    /// Default block proximity.
    pub const DEFAULT_BLOCK_PROX_DIST: f64 = 4.0;

    /// Default nest proximity.
    pub const DEFAULT_NEST_PROX_DIST: f64 = 8.0;

    /// Check every parameter, returning the first violation.
    ///
    /// The nest need not lie inside the search box.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nest_loc.is_nan() || !self.nest_loc.x.is_finite() || !self.nest_loc.y.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "site.nest_loc",
                reason: format!("must be finite, got {}", self.nest_loc),
            });
        }
        for (name, value) in [
            ("site.cache_prox_dist", self.cache_prox_dist),
            ("site.block_prox_dist", self.block_prox_dist),
            ("site.nest_prox_dist", self.nest_prox_dist),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be finite and >= 0, got {value}"),
                });
            }
        }
        for (name, range) in [
            ("site.xrange", self.site_xrange),
            ("site.yrange", self.site_yrange),
        ] {
            if !range.lb().is_finite() || !range.ub().is_finite() {
                return Err(ConfigError::InvalidRange {
                    name,
                    reason: format!("bounds must be finite, got {range}"),
                });
            }
            if range.span() <= 0.0 {
                return Err(ConfigError::InvalidRange {
                    name,
                    reason: format!("must have positive width, got {range}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for SiteSelectionConfig {
    fn default() -> Self {
        Self {
            nest_loc: Vec2::new(50.0, 50.0),
            cache_prox_dist: Self::DEFAULT_CACHE_PROX_DIST,
            block_prox_dist: Self::DEFAULT_BLOCK_PROX_DIST,
            nest_prox_dist: Self::DEFAULT_NEST_PROX_DIST,
            site_xrange: RealRange::new(2.0, 98.0),
            site_yrange: RealRange::new(2.0, 98.0),
            strict_constraints: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SiteSelectionConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_negative_proximity() {
        let cfg = SiteSelectionConfig {
            block_prox_dist: -1.0,
            ..Default::default()
        };
        match cfg.validate() {
            Err(ConfigError::InvalidParameter { name, .. }) => {
                assert_eq!(name, "site.block_prox_dist")
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn rejects_degenerate_range() {
        let cfg = SiteSelectionConfig {
            site_yrange: RealRange::new(5.0, 5.0),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRange { name: "site.yrange", .. })
        ));
    }

    #[test]
    fn rejects_nan_nest() {
        let cfg = SiteSelectionConfig {
            nest_loc: Vec2::new(f64::NAN, 1.0),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
