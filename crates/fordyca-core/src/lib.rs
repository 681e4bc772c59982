//! Core types and traits for FORDYCA cache management.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the workspace: entity
//! identifiers, 2D geometry at a grid resolution, the [`Entity2D`]
//! extent trait, and the shared [`ConfigError`] type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod entity;
pub mod error;
pub mod id;
pub mod math;

pub use entity::{square_spans, Entity2D};
pub use error::ConfigError;
pub use id::{BlockId, CacheId, ClusterId, NestId, RobotId, Timestep};
pub use math::{DiscreteCoord, RealRange, Vec2};
