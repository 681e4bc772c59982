//! Optimizer errors.

use std::error::Error;
use std::fmt;

/// Errors returned by the [`Isres`](crate::Isres) adapter.
#[derive(Clone, Debug, PartialEq)]
pub enum OptimizerError {
    /// Bounds, starting point, or stopping criteria are unusable.
    InvalidArgs {
        /// Description of what went wrong.
        reason: String,
    },
    /// The objective never produced a finite value.
    Failure {
        /// Evaluations spent before giving up.
        evaluations: usize,
    },
}

impl fmt::Display for OptimizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgs { reason } => write!(f, "invalid optimizer arguments: {reason}"),
            Self::Failure { evaluations } => {
                write!(f, "no finite objective value after {evaluations} evaluations")
            }
        }
    }
}

impl Error for OptimizerError {}
