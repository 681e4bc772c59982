//! The discrete arena grid.

use crate::cell::{Cell, CellState};
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use fordyca_core::math::GEOMETRY_EPSILON;
use fordyca_core::{DiscreteCoord, RealRange};

/// Row-major grid of [`Cell`]s at a fixed resolution.
#[derive(Clone, Debug)]
pub struct ArenaGrid {
    resolution: f64,
    xdsize: u32,
    ydsize: u32,
    cells: Vec<Cell>,
}

impl ArenaGrid {
    /// Build an all-empty grid from a validated config.
    pub fn new(config: &ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let xdsize = config.x_cells();
        let ydsize = config.y_cells();
        let mut cells = Vec::with_capacity(xdsize as usize * ydsize as usize);
        for y in 0..ydsize {
            for x in 0..xdsize {
                cells.push(Cell::new(DiscreteCoord::new(x, y)));
            }
        }
        Ok(Self {
            resolution: config.resolution,
            xdsize,
            ydsize,
            cells,
        })
    }

    /// Side length of one cell.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Number of cells along X.
    pub fn xdsize(&self) -> u32 {
        self.xdsize
    }

    /// Number of cells along Y.
    pub fn ydsize(&self) -> u32 {
        self.ydsize
    }

    /// Arena extent along X in meters.
    pub fn xrsize(&self) -> f64 {
        self.xdsize as f64 * self.resolution
    }

    /// Arena extent along Y in meters.
    pub fn yrsize(&self) -> f64 {
        self.ydsize as f64 * self.resolution
    }

    /// `true` if `coord` is on the grid.
    pub fn contains(&self, coord: DiscreteCoord) -> bool {
        coord.x < self.xdsize && coord.y < self.ydsize
    }

    fn index(&self, coord: DiscreteCoord) -> Result<usize, ArenaError> {
        if !self.contains(coord) {
            return Err(ArenaError::CoordOutOfBounds {
                coord,
                bounds: format!("[0, {}) x [0, {})", self.xdsize, self.ydsize),
            });
        }
        Ok(coord.y as usize * self.xdsize as usize + coord.x as usize)
    }

    /// The cell at `coord`.
    pub fn access(&self, coord: DiscreteCoord) -> Result<&Cell, ArenaError> {
        let i = self.index(coord)?;
        Ok(&self.cells[i])
    }

    /// Replace the state of the cell at `coord`.
    pub fn set_state(&mut self, coord: DiscreteCoord, state: CellState) -> Result<(), ArenaError> {
        let i = self.index(coord)?;
        self.cells[i].set_state(state);
        Ok(())
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Cells whose interiors intersect the rectangle `xspan x yspan`,
    /// clipped to the grid, in row-major order.
    pub fn cells_in_span(&self, xspan: &RealRange, yspan: &RealRange) -> Vec<DiscreteCoord> {
        let (x0, x1) = Self::axis_cells(xspan, self.resolution, self.xdsize);
        let (y0, y1) = Self::axis_cells(yspan, self.resolution, self.ydsize);
        let mut out = Vec::new();
        for y in y0..y1 {
            for x in x0..x1 {
                out.push(DiscreteCoord::new(x, y));
            }
        }
        out
    }

    /// Half-open cell index range `[lo, hi)` covered by `span` on one axis.
    fn axis_cells(span: &RealRange, resolution: f64, len: u32) -> (u32, u32) {
        let lo = (span.lb() / resolution + GEOMETRY_EPSILON).floor().max(0.0);
        let hi = (span.ub() / resolution - GEOMETRY_EPSILON).ceil().max(0.0);
        let lo = (lo as u32).min(len);
        let hi = (hi as u32).min(len);
        (lo, hi.max(lo))
    }
}
