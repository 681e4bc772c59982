//! Arena model for FORDYCA cache management.
//!
//! This crate provides the narrow world interface the cache core reads
//! and mutates: a discrete [`ArenaGrid`] of [`Cell`]s, the [`Block`]
//! store, committed [`ArenaCache`]s, and the read-only [`BlockCluster`]
//! and [`Nest`] exclusion zones, all owned by an [`ArenaMap`].
//!
//! # Borrowing during creation
//!
//! A cache creation pass mutates the grid and relocates blocks while
//! reading existing caches, clusters, and nests. [`ArenaMap::split_mut`]
//! hands out disjoint borrows for exactly that: an [`ArenaMut`] over
//! the grid and block store, and an [`ArenaEntities`] over everything
//! else.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod cache;
pub mod cell;
pub mod cluster;
pub mod config;
pub mod error;
pub mod grid;
pub mod map;
pub mod nest;

pub use block::Block;
pub use cache::{ArenaCache, UtilizationMetrics, CACHE_MIN_BLOCKS};
pub use cell::{Cell, CellState};
pub use cluster::BlockCluster;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use grid::ArenaGrid;
pub use map::{ArenaEntities, ArenaMap, ArenaMut, BlockStore, CacheIdAllocator};
pub use nest::Nest;
