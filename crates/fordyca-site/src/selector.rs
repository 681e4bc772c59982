//! The cache site selector.

use crate::config::SiteSelectionConfig;
use crate::constraints::SiteConstraintSet;
use crate::error::OptimizerError;
use crate::isres::{Isres, OptStatus, Problem};
use crate::utility::SiteUtility;
use fordyca_arena::{ArenaCache, Block};
use fordyca_core::{ConfigError, Vec2};
use rand::Rng;
use tracing::{debug, info, warn};

/// Relative utility change at which the search stops.
pub const UTILITY_TOL: f64 = 1e-2;

/// Utility at which the search stops outright.
pub const STOPVAL: f64 = 1e6;

/// Evaluation budget for one selection.
pub const MAX_ITERATIONS: usize = 5000;

struct SiteProblem<'a> {
    utility: SiteUtility,
    constraints: &'a SiteConstraintSet,
}

impl Problem for SiteProblem<'_> {
    fn objective(&self, x: &[f64]) -> f64 {
        self.utility.eval(Vec2::new(x[0], x[1]))
    }

    fn penalty(&self, x: &[f64]) -> f64 {
        self.constraints.penalty(Vec2::new(x[0], x[1]))
    }
}

/// Chooses where a robot should start a new cache.
#[derive(Clone, Debug)]
pub struct CacheSiteSelector {
    config: SiteSelectionConfig,
    last_status: Option<Result<OptStatus, OptimizerError>>,
}

impl CacheSiteSelector {
    /// A selector for `config`.
    pub fn new(config: SiteSelectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            last_status: None,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &SiteSelectionConfig {
        &self.config
    }

    /// How the most recent optimization ended, `None` before the first.
    pub fn last_status(&self) -> Option<&Result<OptStatus, OptimizerError>> {
        self.last_status.as_ref()
    }

    /// Best site for a robot at `position` that knows about `caches` and
    /// `blocks`.
    ///
    /// Returns `None` if the optimizer fails, or if strict constraints are
    /// on and the site found violates any of them beyond
    /// [`CONSTRAINT_TOL`](crate::CONSTRAINT_TOL).
    pub fn select<R: Rng + ?Sized>(
        &mut self,
        caches: &[&ArenaCache],
        blocks: &[&Block],
        position: Vec2,
        rng: &mut R,
    ) -> Option<Vec2> {
        let constraints = SiteConstraintSet::new(caches, blocks, &self.config);
        info!(
            n_caches = caches.len(),
            n_blocks = blocks.len(),
            n_constraints = constraints.len(),
            "cache site constraints"
        );
        let problem = SiteProblem {
            utility: SiteUtility::new(position, self.config.nest_loc),
            constraints: &constraints,
        };

        let (xr, yr) = (self.config.site_xrange, self.config.site_yrange);
        let guess = [
            rng.random_range(xr.lb()..=xr.ub()),
            rng.random_range(yr.lb()..=yr.ub()),
        ];
        debug!(x = guess[0], y = guess[1], xrange = %xr, yrange = %yr, "initial guess");

        let result = Isres::new(vec![xr.lb(), yr.lb()], vec![xr.ub(), yr.ub()]).and_then(|opt| {
            opt.ftol_rel(UTILITY_TOL)
                .stopval(STOPVAL)
                .maxeval(MAX_ITERATIONS)
                .maximize(&problem, &guess, rng)
        });
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "cache site optimization failed");
                self.last_status = Some(Err(e));
                return None;
            }
        };
        self.last_status = Some(Ok(outcome.status));

        let site = Vec2::new(outcome.x[0], outcome.x[1]);
        info!(
            site = %site,
            utility = outcome.value,
            status = %outcome.status,
            evaluations = outcome.evaluations,
            "computed cache site"
        );

        let violated: Vec<_> = constraints.violated(site).collect();
        if violated.is_empty() {
            return Some(site);
        }
        if self.config.strict_constraints {
            warn!(site = %site, violated = ?violated, "discarding cache site: violates constraints");
            None
        } else {
            debug!(site = %site, violated = ?violated, "accepting cache site despite violations");
            Some(site)
        }
    }
}
