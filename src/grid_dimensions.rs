use std::cmp;

use log::trace;

use crate::cells::GridCoordinate;
use crate::units::{CellsCount, ColumnIndex, Height, RowIndex, Width};

/// Largest extent along either axis. Every in-bounds cell must be addressable with an `i32`.
const MAX_EXTENT: usize = i32::MAX as usize;

/// The size of a maze grid. Both extents are always odd.
///
/// Carving moves two cells at a time from (1, 1), so an odd extent is what leaves a solid
/// wall ring around the maze with passages and walls alternating inside it.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct MazeDimensions {
    width: Width,
    height: Height,
}

impl MazeDimensions {
    /// Even extents are bumped up by one. An extent of 0 becomes 1.
    ///
    /// Anything below 3 along an axis gives a degenerate grid: still safe to generate and query,
    /// but without a meaningful maze in it.
    pub fn new(width: usize, height: usize) -> MazeDimensions {
        let dimensions = MazeDimensions {
            width: Width(force_odd(width)),
            height: Height(force_odd(height)),
        };
        trace!("Requested {}x{} grid, normalised to {}x{}",
               width,
               height,
               dimensions.width.0,
               dimensions.height.0);
        dimensions
    }

    #[inline(always)]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline(always)]
    pub fn size(&self) -> CellsCount {
        CellsCount(self.width.0 * self.height.0)
    }

    /// Whether the grid is large enough to hold a maze with a distinct start and exit.
    pub fn is_degenerate(&self) -> bool {
        self.width.0 < 3 || self.height.0 < 3
    }

    #[inline]
    pub fn start(&self) -> GridCoordinate {
        GridCoordinate::new(1, 1)
    }

    /// The exit corner, diagonally opposite the start.
    /// Lies outside the grid when the grid is degenerate.
    #[inline]
    pub fn end(&self) -> GridCoordinate {
        GridCoordinate::new(self.width.0 as i32 - 2, self.height.0 as i32 - 2)
    }

    /// Number of cells the carver can visit: those with odd x and odd z.
    pub fn carvable_cells_count(&self) -> CellsCount {
        CellsCount(((self.width.0 - 1) / 2) * ((self.height.0 - 1) / 2))
    }

    #[inline]
    pub fn contains(&self, coord: GridCoordinate) -> bool {
        coord.x >= 0 && coord.z >= 0 && (coord.x as usize) < self.width.0 &&
        (coord.z as usize) < self.height.0
    }

    /// Strictly inside the outer ring of wall cells.
    #[inline]
    pub fn is_interior(&self, coord: GridCoordinate) -> bool {
        coord.x > 0 && coord.z > 0 && (coord.x as usize) < self.width.0 - 1 &&
        (coord.z as usize) < self.height.0 - 1
    }

    #[inline]
    pub fn is_border(&self, coord: GridCoordinate) -> bool {
        self.contains(coord) && !self.is_interior(coord)
    }

    /// Convert a coordinate to a one dimensional index in the range 0..size.
    /// Returns None if the coordinate is outside the grid.
    #[inline]
    pub fn row_major_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.z as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn coordinate_from_row_major_index(&self, index: usize) -> GridCoordinate {
        let RowIndex(z) = RowIndex(index / self.width.0);
        let ColumnIndex(x) = ColumnIndex(index % self.width.0);
        GridCoordinate::new(x as i32, z as i32)
    }
}

fn force_odd(extent: usize) -> usize {
    let capped = cmp::min(extent, MAX_EXTENT);
    if capped % 2 == 0 {
        capped + 1
    } else {
        capped
    }
}
