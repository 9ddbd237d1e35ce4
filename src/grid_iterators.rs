use std::fmt;

use crate::cells::GridCoordinate;
use crate::grid_dimensions::MazeDimensions;
use crate::units::{Height, RowIndex, Width};

/// Visits every coordinate of a grid in row-major order.
#[derive(Clone)]
pub struct CellIter {
    dimensions: MazeDimensions,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub fn new(dimensions: MazeDimensions) -> CellIter {
        CellIter {
            dimensions,
            current_cell_number: 0,
            cells_count: dimensions.size().0,
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = self.dimensions.coordinate_from_row_major_index(self.current_cell_number);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

/// Yields whole rows of coordinates, north to south.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    current_row: usize,
    width: Width,
    height: Height,
}

impl RowIter {
    pub fn new(dimensions: MazeDimensions) -> RowIter {
        RowIter {
            current_row: 0,
            width: dimensions.width(),
            height: dimensions.height(),
        }
    }
}

impl ExactSizeIterator for RowIter {} // default impl using size_hint()
impl Iterator for RowIter {
    type Item = Vec<GridCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.height.0 {
            return None;
        }

        let RowIndex(z) = RowIndex(self.current_row);
        let coords = (0..self.width.0)
            .map(|x| GridCoordinate::new(x as i32, z as i32))
            .collect();
        self.current_row += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.height.0 - self.current_row;
        (remaining, Some(remaining))
    }
}
