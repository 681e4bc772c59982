//! Cache lifecycle metrics.
//!
//! [`LifecycleCounters`] accumulates what happened to caches over one
//! collection interval; metric collectors read it through the
//! [`LifecycleMetrics`] trait and reset it at interval boundaries.
//! Per-cache pickup and drop counts live on each cache, behind
//! [`UtilizationMetrics`].

use fordyca_core::Timestep;

pub use fordyca_arena::UtilizationMetrics;

/// Read access to cache lifecycle counts.
pub trait LifecycleMetrics {
    /// Caches created since the last reset.
    fn caches_created(&self) -> usize;

    /// Candidate caches discarded since the last reset.
    fn caches_discarded(&self) -> usize;

    /// Caches depleted since the last reset.
    fn caches_depleted(&self) -> usize;

    /// Age of each cache depleted since the last reset, in timesteps.
    fn cache_depletion_ages(&self) -> &[Timestep];

    /// Clear all counts at the end of a collection interval.
    fn reset_metrics(&mut self);
}

/// Counters updated by the cache managers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LifecycleCounters {
    /// Caches created.
    pub created: usize,
    /// Candidates discarded.
    pub discarded: usize,
    /// Caches depleted.
    pub depleted: usize,
    /// Ages of depleted caches.
    pub depletion_ages: Vec<Timestep>,
}

impl LifecycleCounters {
    /// Record `n` newly created caches.
    pub fn record_created(&mut self, n: usize) {
        self.created += n;
    }

    /// Record `n` discarded candidates.
    pub fn record_discarded(&mut self, n: usize) {
        self.discarded += n;
    }

    /// Record one depleted cache and its age.
    pub fn record_depletion(&mut self, age: Timestep) {
        self.depleted += 1;
        self.depletion_ages.push(age);
    }
}

impl LifecycleMetrics for LifecycleCounters {
    fn caches_created(&self) -> usize {
        self.created
    }

    fn caches_discarded(&self) -> usize {
        self.discarded
    }

    fn caches_depleted(&self) -> usize {
        self.depleted
    }

    fn cache_depletion_ages(&self) -> &[Timestep] {
        &self.depletion_ages
    }

    fn reset_metrics(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_counters_are_zero() {
        let m = LifecycleCounters::default();
        assert_eq!(m.caches_created(), 0);
        assert_eq!(m.caches_discarded(), 0);
        assert_eq!(m.caches_depleted(), 0);
        assert!(m.cache_depletion_ages().is_empty());
    }

    #[test]
    fn counts_accumulate_until_reset() {
        let mut m = LifecycleCounters::default();
        m.record_created(2);
        m.record_created(1);
        m.record_discarded(4);
        m.record_depletion(Timestep(120));
        assert_eq!(m.caches_created(), 3);
        assert_eq!(m.caches_discarded(), 4);
        assert_eq!(m.caches_depleted(), 1);
        assert_eq!(m.cache_depletion_ages(), &[Timestep(120)]);

        m.reset_metrics();
        assert_eq!(m, LifecycleCounters::default());
    }
}
