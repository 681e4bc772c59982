//! The cache site utility function.

use fordyca_core::Vec2;

/// Distances below this are treated as this, so the utility stays finite
/// at the robot's own location.
pub const UTILITY_DIST_FLOOR: f64 = 0.01;

/// Utility of a prospective cache site for a robot at `position`.
///
/// `u(s) = exp(-|s - m| / max(|p - n|, F)) / (max(|s - p|, F) * max(|s - m|, F))`
/// with `p` the robot, `n` the nest, `m` their midpoint and `F` the
/// [`UTILITY_DIST_FLOOR`]. Higher is better.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SiteUtility {
    position: Vec2,
    nest_loc: Vec2,
}

impl SiteUtility {
    /// Utility for a robot at `position` returning to `nest_loc`.
    pub fn new(position: Vec2, nest_loc: Vec2) -> Self {
        Self { position, nest_loc }
    }

    /// Robot position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Midpoint between robot and nest.
    pub fn midpoint(&self) -> Vec2 {
        (self.position + self.nest_loc) / 2.0
    }

    /// Evaluate at `site`. A NaN site gets the worst utility.
    pub fn eval(&self, site: Vec2) -> f64 {
        if site.is_nan() {
            return f64::MIN;
        }
        let m = self.midpoint();
        let scale = self.position.distance(self.nest_loc).max(UTILITY_DIST_FLOOR);
        let to_mid = site.distance(m).max(UTILITY_DIST_FLOOR);
        let to_robot = site.distance(self.position).max(UTILITY_DIST_FLOOR);
        (-site.distance(m) / scale).exp() / (to_robot * to_mid)
    }
}
