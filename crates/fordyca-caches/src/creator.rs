//! Grid-level cache construction shared by the dynamic and static
//! creators.

use crate::error::CacheError;
use fordyca_arena::{ArenaCache, ArenaError, ArenaMut, CellState, Nest};
use fordyca_core::math::real_to_discrete;
use fordyca_core::{BlockId, DiscreteCoord, Timestep, Vec2};
use rand::Rng;
use tracing::{debug, info};

/// Builds, extends and tears down caches of one dimension on the grid.
#[derive(Clone, Copy, Debug)]
pub struct BaseCreator {
    cache_dim: f64,
}

impl BaseCreator {
    /// A creator for caches of side `cache_dim`, already normalized with
    /// [`dimension_check`](crate::dimension_check).
    pub fn new(cache_dim: f64) -> Self {
        Self { cache_dim }
    }

    /// Side length of the caches this creator builds.
    pub fn cache_dim(&self) -> f64 {
        self.cache_dim
    }

    /// Gather `blocks` onto the cell containing `center` and build a cache
    /// there.
    ///
    /// A free block already on the host cell joins the cache at the front
    /// of its block list. The old cells of the gathered blocks are cleared.
    /// The extent is not reserved; see
    /// [`cache_extents_configure`](Self::cache_extents_configure).
    pub fn create_single_cache(
        &self,
        arena: &mut ArenaMut<'_>,
        center: Vec2,
        mut blocks: Vec<BlockId>,
        t: Timestep,
    ) -> Result<ArenaCache, CacheError> {
        let resolution = arena.grid().resolution();
        let host = real_to_discrete(center, resolution);
        match arena.grid().access(host)?.state() {
            CellState::Empty => {}
            CellState::HasBlock(b) => {
                let b = *b;
                if let Some(pos) = blocks.iter().position(|x| *x == b) {
                    blocks.remove(pos);
                } else {
                    debug!(block = %b, cell = %host, "host cell block joins cache");
                }
                blocks.insert(0, b);
            }
            other => {
                return Err(ArenaError::CellConflict {
                    coord: host,
                    reason: format!("cache host must be empty or hold a block, found {other:?}"),
                }
                .into());
            }
        }

        let id = arena.next_cache_id();
        let cache = ArenaCache::new(id, self.cache_dim, resolution, center, blocks, t)?;

        for &b in cache.blocks() {
            let old = arena.block(b)?.danchor2d();
            if arena.grid().access(old)?.block() == Some(b) {
                arena.cell_set(old, CellState::Empty)?;
            }
            arena.block_move(b, host)?;
        }
        arena.cell_set(
            host,
            CellState::HasCache {
                cache: id,
                blocks: cache.blocks().iter().copied().collect(),
            },
        )?;
        info!(
            cache = %id,
            center = %center,
            cell = %host,
            n_blocks = cache.n_blocks(),
            blocks = ?cache.blocks(),
            "cache created"
        );
        Ok(cache)
    }

    /// Reserve the extent cells (all but the host) of each cache. Every
    /// such cell must be empty.
    pub fn cache_extents_configure(
        &self,
        arena: &mut ArenaMut<'_>,
        caches: &[ArenaCache],
    ) -> Result<(), CacheError> {
        for cache in caches {
            let host = cache.dcenter2d();
            for coord in cache.extent_cells(arena.grid()) {
                if coord == host {
                    continue;
                }
                let cell = arena.grid().access(coord)?;
                if !cell.is_empty() {
                    return Err(ArenaError::CellConflict {
                        coord,
                        reason: format!(
                            "extent of {} must be empty, found {:?}",
                            cache.id(),
                            cell.state()
                        ),
                    }
                    .into());
                }
                arena.cell_set(coord, CellState::CacheExtent(cache.id()))?;
            }
        }
        Ok(())
    }

    /// Undo a cache that was built but will not be kept: clear its cells
    /// and scatter its blocks as free blocks outside the nests.
    pub fn cache_delete<R: Rng + ?Sized>(
        &self,
        arena: &mut ArenaMut<'_>,
        cache: ArenaCache,
        nests: &[Nest],
        rng: &mut R,
    ) -> Result<(), CacheError> {
        for coord in cache.extent_cells(arena.grid()) {
            if arena.grid().access(coord)?.cache() == Some(cache.id()) {
                arena.cell_set(coord, CellState::Empty)?;
            }
        }
        for &b in cache.blocks() {
            arena.distribute_single_block(b, nests, rng)?;
        }
        debug!(cache = %cache.id(), n_blocks = cache.n_blocks(), "cache deleted, blocks redistributed");
        Ok(())
    }

    /// Undo `caches` without scattering their blocks: clear every cell
    /// still showing one of them, then put each block in `origins` back
    /// on its recorded cell as a free block.
    pub fn caches_unwind(
        &self,
        arena: &mut ArenaMut<'_>,
        caches: &[ArenaCache],
        origins: &[(BlockId, DiscreteCoord)],
    ) -> Result<(), CacheError> {
        for cache in caches {
            for coord in cache.extent_cells(arena.grid()) {
                if arena.grid().access(coord)?.cache() == Some(cache.id()) {
                    arena.cell_set(coord, CellState::Empty)?;
                }
            }
        }
        for &(b, coord) in origins {
            arena.block_move(b, coord)?;
            arena.cell_set(coord, CellState::HasBlock(b))?;
        }
        debug!(n_caches = caches.len(), n_blocks = origins.len(), "caches unwound");
        Ok(())
    }
}
