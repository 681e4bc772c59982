//! Improved stochastic ranking evolution strategy (ISRES).
//!
//! A box-bounded, derivative-free optimizer for problems with inequality
//! constraints, after Runarsson and Yao (2005). Each generation:
//!
//! 1. Evaluate the objective and the constraint penalty of every individual.
//! 2. Rank the population by stochastic ranking: neighbours are compared
//!    by objective when both are feasible or with probability
//!    [`RANKING_PF`], otherwise by penalty.
//! 3. Keep the best `mu = ceil(lambda / 7)` as parents.
//! 4. Produce `lambda` offspring: the first `mu - 1` by differential
//!    variation towards the best parent, the rest by lognormal
//!    self-adaptive Gaussian mutation with step-size smoothing.
//!
//! Stops on a feasible value at or above the stop value, on a feasible
//! improvement smaller than the relative tolerance, or when the
//! evaluation budget runs out. The point returned is the best seen:
//! feasible points beat infeasible ones, then higher objective or lower
//! penalty wins.

use crate::error::OptimizerError;
use rand::Rng;
use std::fmt;
use tracing::trace;

/// Probability of comparing infeasible neighbours by objective.
pub const RANKING_PF: f64 = 0.45;

/// Differential variation step.
const GAMMA: f64 = 0.85;

/// Step-size smoothing factor.
const ALPHA: f64 = 0.2;

/// Expected rate of convergence for the learning rates.
const PHI: f64 = 1.0;

/// Retries for a mutated coordinate that leaves the box.
const MUTATION_RETRIES: usize = 10;

/// A maximization problem with inequality constraints.
pub trait Problem {
    /// Value to maximize at `x`. Non-finite values rank last.
    fn objective(&self, x: &[f64]) -> f64;

    /// Sum of squared constraint violations at `x`; zero when feasible.
    fn penalty(&self, _x: &[f64]) -> f64 {
        0.0
    }
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptStatus {
    /// A feasible point reached the stop value.
    StopvalReached,
    /// A feasible improvement fell below the relative tolerance.
    FtolReached,
    /// The evaluation budget ran out.
    MaxevalReached,
}

impl fmt::Display for OptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopvalReached => write!(f, "STOPVAL_REACHED"),
            Self::FtolReached => write!(f, "FTOL_REACHED"),
            Self::MaxevalReached => write!(f, "MAXEVAL_REACHED"),
        }
    }
}

/// Result of a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct OptOutcome {
    /// Best point found.
    pub x: Vec<f64>,
    /// Objective at `x`.
    pub value: f64,
    /// Constraint penalty at `x`.
    pub penalty: f64,
    /// Why the run stopped.
    pub status: OptStatus,
    /// Objective evaluations performed.
    pub evaluations: usize,
}

#[derive(Clone, Debug)]
struct Individual {
    x: Vec<f64>,
    sigma: Vec<f64>,
    value: f64,
    penalty: f64,
}

impl Individual {
    fn feasible(&self) -> bool {
        self.penalty <= 0.0
    }

    fn beats(&self, other: &Individual) -> bool {
        match (self.feasible(), other.feasible()) {
            (true, true) => self.value > other.value,
            (true, false) => true,
            (false, true) => false,
            (false, false) => self.penalty < other.penalty,
        }
    }
}

/// ISRES optimizer over a fixed box.
#[derive(Clone, Debug)]
pub struct Isres {
    lower: Vec<f64>,
    upper: Vec<f64>,
    ftol_rel: f64,
    stopval: f64,
    maxeval: usize,
    population: usize,
}

impl Isres {
    /// Default relative tolerance (disabled).
    pub const DEFAULT_FTOL_REL: f64 = 0.0;

    /// Default evaluation budget.
    pub const DEFAULT_MAXEVAL: usize = 5000;

    /// An optimizer over the box `[lower, upper]`.
    ///
    /// Population size defaults to `20 * (n + 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::InvalidArgs`] if the bounds are empty,
    /// differ in length, are non-finite, or are inverted.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, OptimizerError> {
        if lower.is_empty() || lower.len() != upper.len() {
            return Err(OptimizerError::InvalidArgs {
                reason: format!(
                    "bounds must be non-empty and equal length, got {} and {}",
                    lower.len(),
                    upper.len()
                ),
            });
        }
        for (j, (lb, ub)) in lower.iter().zip(&upper).enumerate() {
            if !lb.is_finite() || !ub.is_finite() || lb > ub {
                return Err(OptimizerError::InvalidArgs {
                    reason: format!("bounds for coordinate {j} are unusable: [{lb}, {ub}]"),
                });
            }
        }
        let population = 20 * (lower.len() + 1);
        Ok(Self {
            lower,
            upper,
            ftol_rel: Self::DEFAULT_FTOL_REL,
            stopval: f64::INFINITY,
            maxeval: Self::DEFAULT_MAXEVAL,
            population,
        })
    }

    /// Stop when a feasible improvement is smaller than `tol` relative to
    /// the previous best.
    pub fn ftol_rel(mut self, tol: f64) -> Self {
        self.ftol_rel = tol;
        self
    }

    /// Stop once a feasible point reaches `value`.
    pub fn stopval(mut self, value: f64) -> Self {
        self.stopval = value;
        self
    }

    /// Evaluation budget.
    pub fn maxeval(mut self, n: usize) -> Self {
        self.maxeval = n;
        self
    }

    /// Population size (`lambda`).
    pub fn population(mut self, n: usize) -> Self {
        self.population = n;
        self
    }

    /// Problem dimension.
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Maximize `problem` starting from `x0`.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::InvalidArgs`] if `x0` has the wrong
    /// length or lies outside the box, or a stopping criterion is
    /// unusable, and [`OptimizerError::Failure`] if the objective never
    /// evaluates to a finite value.
    pub fn maximize<P, R>(
        &self,
        problem: &P,
        x0: &[f64],
        rng: &mut R,
    ) -> Result<OptOutcome, OptimizerError>
    where
        P: Problem + ?Sized,
        R: Rng + ?Sized,
    {
        self.check_args(x0)?;
        let n = self.dim();
        let lambda = self.population;
        let mu = lambda.div_ceil(7).max(1);
        let tau = PHI / (2.0 * (n as f64).sqrt()).sqrt();
        let tau_prime = PHI / (2.0 * n as f64).sqrt();
        let sigma0: Vec<f64> = self
            .lower
            .iter()
            .zip(&self.upper)
            .map(|(lb, ub)| (ub - lb) / (n as f64).sqrt())
            .collect();

        let mut pop: Vec<Individual> = (0..lambda)
            .map(|k| {
                let x = if k == 0 {
                    x0.to_vec()
                } else {
                    self.lower
                        .iter()
                        .zip(&self.upper)
                        .map(|(lb, ub)| rng.random_range(*lb..=*ub))
                        .collect()
                };
                Individual {
                    x,
                    sigma: sigma0.clone(),
                    value: f64::MIN,
                    penalty: f64::MAX,
                }
            })
            .collect();

        let mut evaluations = 0;
        let mut finite = false;
        let mut best: Option<Individual> = None;
        let mut generation = 0usize;

        let status = 'run: loop {
            let prev_best = best.as_ref().filter(|b| b.feasible()).map(|b| b.value);
            for ind in &mut pop {
                if evaluations >= self.maxeval {
                    break 'run OptStatus::MaxevalReached;
                }
                evaluations += 1;
                let value = problem.objective(&ind.x);
                ind.value = if value.is_finite() {
                    finite = true;
                    value
                } else {
                    f64::MIN
                };
                let penalty = problem.penalty(&ind.x);
                ind.penalty = if penalty.is_nan() { f64::MAX } else { penalty };

                if best.as_ref().is_none_or(|b| ind.beats(b)) {
                    best = Some(ind.clone());
                }
                if ind.feasible() && finite && ind.value >= self.stopval {
                    break 'run OptStatus::StopvalReached;
                }
            }

            if let (Some(old), Some(b)) = (prev_best, best.as_ref().filter(|b| b.feasible())) {
                let change = (b.value - old).abs();
                if b.value > old && change < self.ftol_rel * old.abs() {
                    break 'run OptStatus::FtolReached;
                }
            }

            let order = self.stochastic_rank(&pop, rng);
            let parents: Vec<Individual> = order[..mu].iter().map(|&i| pop[i].clone()).collect();
            trace!(
                generation,
                best = ?best.as_ref().map(|b| b.value),
                penalty = ?best.as_ref().map(|b| b.penalty),
                "isres generation"
            );
            pop = (0..lambda)
                .map(|k| self.offspring(&parents, k, mu, tau, tau_prime, rng))
                .collect();
            generation += 1;
        };

        match best {
            Some(b) if finite => Ok(OptOutcome {
                x: b.x,
                value: b.value,
                penalty: b.penalty,
                status,
                evaluations,
            }),
            _ => Err(OptimizerError::Failure { evaluations }),
        }
    }

    fn check_args(&self, x0: &[f64]) -> Result<(), OptimizerError> {
        if x0.len() != self.dim() {
            return Err(OptimizerError::InvalidArgs {
                reason: format!("starting point has {} coordinates, expected {}", x0.len(), self.dim()),
            });
        }
        let inside = x0
            .iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(x, (lb, ub))| x >= lb && x <= ub);
        if !inside {
            return Err(OptimizerError::InvalidArgs {
                reason: format!("starting point {x0:?} is outside the bounds"),
            });
        }
        if self.maxeval == 0 || self.population < 2 {
            return Err(OptimizerError::InvalidArgs {
                reason: format!(
                    "need maxeval >= 1 and population >= 2, got {} and {}",
                    self.maxeval, self.population
                ),
            });
        }
        if self.ftol_rel.is_nan() || self.ftol_rel < 0.0 || self.stopval.is_nan() {
            return Err(OptimizerError::InvalidArgs {
                reason: format!(
                    "ftol_rel {} and stopval {} must be usable",
                    self.ftol_rel, self.stopval
                ),
            });
        }
        Ok(())
    }

    /// Population indices, best first.
    fn stochastic_rank<R: Rng + ?Sized>(&self, pop: &[Individual], rng: &mut R) -> Vec<usize> {
        let mut order: Vec<usize> = (0..pop.len()).collect();
        for _ in 0..pop.len() {
            let mut swapped = false;
            for j in 0..pop.len() - 1 {
                let (a, b) = (&pop[order[j]], &pop[order[j + 1]]);
                let by_value = (a.feasible() && b.feasible()) || rng.random_bool(RANKING_PF);
                let swap = if by_value {
                    b.value > a.value
                } else {
                    b.penalty < a.penalty
                };
                if swap {
                    order.swap(j, j + 1);
                    swapped = true;
                }
            }
            if !swapped {
                break;
            }
        }
        order
    }

    fn offspring<R: Rng + ?Sized>(
        &self,
        parents: &[Individual],
        k: usize,
        mu: usize,
        tau: f64,
        tau_prime: f64,
        rng: &mut R,
    ) -> Individual {
        let i = k % mu;
        let parent = &parents[i];

        if k + 1 < mu {
            let x: Vec<f64> = parent
                .x
                .iter()
                .zip(&parents[0].x)
                .zip(&parents[i + 1].x)
                .map(|((xi, x0), xn)| xi + GAMMA * (x0 - xn))
                .collect();
            if self.in_bounds(&x) {
                return Individual {
                    x,
                    sigma: parent.sigma.clone(),
                    value: f64::MIN,
                    penalty: f64::MAX,
                };
            }
        }

        let global = tau_prime * gaussian(rng);
        let mut x = Vec::with_capacity(parent.x.len());
        let mut sigma = Vec::with_capacity(parent.sigma.len());
        for j in 0..parent.x.len() {
            let s = parent.sigma[j] * (global + tau * gaussian(rng)).exp();
            let (lb, ub) = (self.lower[j], self.upper[j]);
            let xj = (0..MUTATION_RETRIES)
                .map(|_| parent.x[j] + s * gaussian(rng))
                .find(|v| *v >= lb && *v <= ub)
                .unwrap_or(parent.x[j]);
            x.push(xj);
            sigma.push(parent.sigma[j] + ALPHA * (s - parent.sigma[j]));
        }
        Individual {
            x,
            sigma,
            value: f64::MIN,
            penalty: f64::MAX,
        }
    }

    fn in_bounds(&self, x: &[f64]) -> bool {
        x.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(v, (lb, ub))| *v >= *lb && *v <= *ub)
    }
}

/// Standard normal sample by the Box-Muller transform.
fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-300);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
