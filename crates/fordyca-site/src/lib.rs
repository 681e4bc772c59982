//! Future cache site selection.
//!
//! A forager that decides to start a new cache asks
//! [`CacheSiteSelector`] where to drop its block. The choice maximizes
//! [`SiteUtility`], which favors points near the robot and the midpoint
//! between robot and nest, subject to a [`SiteConstraintSet`] keeping the
//! site away from known caches, known blocks, and the nest.
//!
//! The search is a derivative-free, box-bounded evolution strategy with
//! stochastic ranking ([`isres`]), kept behind a narrow adapter so the
//! selector only sees a `Result`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod constraints;
pub mod error;
pub mod isres;
pub mod selector;
pub mod utility;

pub use config::SiteSelectionConfig;
pub use constraints::{SiteConstraint, SiteConstraintSet, CONSTRAINT_TOL};
pub use error::OptimizerError;
pub use isres::{Isres, OptOutcome, OptStatus, Problem};
pub use selector::{CacheSiteSelector, MAX_ITERATIONS, STOPVAL, UTILITY_TOL};
pub use utility::{SiteUtility, UTILITY_DIST_FLOOR};
