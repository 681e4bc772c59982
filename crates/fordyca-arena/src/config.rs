//! Arena configuration parameters.

use fordyca_core::ConfigError;

/// Geometry of the arena grid.
///
/// The arena is a rectangle of `x_size` by `y_size` meters discretized into
/// square cells of side `resolution`. Validated when an
/// [`ArenaMap`](crate::ArenaMap) is built from it.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaConfig {
    /// Side length of one grid cell in meters.
    ///
    /// Default: 1.0. Must be finite and positive. Blocks are exactly one
    /// cell in size.
    pub resolution: f64,

    /// Arena extent along X in meters.
    ///
    /// Default: 100.0. Must be a positive multiple of `resolution`.
    pub x_size: f64,

    /// Arena extent along Y in meters.
    ///
    /// Default: 100.0. Must be a positive multiple of `resolution`.
    pub y_size: f64,
}

impl ArenaConfig {
    /// Default grid resolution.
    pub const DEFAULT_RESOLUTION: f64 = 1.0;

    /// Default arena side length.
    pub const DEFAULT_SIZE: f64 = 100.0;

    /// Create a config for an `x_size` by `y_size` arena at the default
    /// resolution.
    pub fn new(x_size: f64, y_size: f64) -> Self {
        Self {
            resolution: Self::DEFAULT_RESOLUTION,
            x_size,
            y_size,
        }
    }

    /// Override the grid resolution.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Number of cells along X.
    pub fn x_cells(&self) -> u32 {
        (self.x_size / self.resolution).round() as u32
    }

    /// Number of cells along Y.
    pub fn y_cells(&self) -> u32 {
        (self.y_size / self.resolution).round() as u32
    }

    /// Check that the geometry describes a non-empty grid of whole cells.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(ConfigError::InvalidResolution {
                value: self.resolution,
            });
        }
        for (name, value) in [("arena.x_size", self.x_size), ("arena.y_size", self.y_size)] {
            if !value.is_finite() || value < self.resolution {
                return Err(ConfigError::InvalidDimension { name, value });
            }
            if !fordyca_core::math::is_multiple_of(value, self.resolution) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!(
                        "{value} is not a multiple of the resolution {}",
                        self.resolution
                    ),
                });
            }
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, Self::DEFAULT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a_hundred_cells_square() {
        let config = ArenaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.x_cells(), 100);
        assert_eq!(config.y_cells(), 100);
    }

    #[test]
    fn fine_resolution_scales_cell_count() {
        let config = ArenaConfig::new(12.0, 6.0).with_resolution(0.2);
        assert!(config.validate().is_ok());
        assert_eq!(config.x_cells(), 60);
        assert_eq!(config.y_cells(), 30);
    }

    #[test]
    fn rejects_bad_resolution() {
        let config = ArenaConfig::default().with_resolution(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn rejects_partial_cells() {
        let config = ArenaConfig::new(10.5, 10.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "arena.x_size", .. })
        ));
    }
}
