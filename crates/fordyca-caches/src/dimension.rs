//! Cache dimension normalization.

use crate::error::CacheError;
use fordyca_core::math::GEOMETRY_EPSILON;

/// Largest odd multiple of `resolution` that does not exceed `dimension`.
///
/// Caches must span an odd number of cells so their center falls on a
/// single host cell. Configured dimensions are often a hair off a whole
/// number of cells after parsing; the quotient is floored with a
/// tolerance of [`GEOMETRY_EPSILON`] cells, so the result never exceeds
/// `dimension + GEOMETRY_EPSILON * resolution`.
pub fn dimension_check(dimension: f64, resolution: f64) -> Result<f64, CacheError> {
    let too_small = CacheError::Dimension {
        dimension,
        resolution,
    };
    if !dimension.is_finite() || !resolution.is_finite() || resolution <= 0.0 {
        return Err(too_small);
    }
    let mut cells = (dimension / resolution + GEOMETRY_EPSILON).floor();
    if cells < 1.0 {
        return Err(too_small);
    }
    if cells % 2.0 == 0.0 {
        cells -= 1.0;
    }
    Ok(cells * resolution)
}
