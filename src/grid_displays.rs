use std::fmt;

use itertools::Itertools;

use crate::cells::{CellKind, GridCoordinate};
use crate::grid::OccupancyGrid;
use crate::grid_traits::GridDisplay;
use crate::pathing::Distances;
use crate::utils::FnvHashSet;

pub const WALL_GLYPH: char = '#';
pub const PASSAGE_GLYPH: char = ' ';
pub const EXIT_GLYPH: char = 'E';

impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: GridCoordinate) -> Option<char> {
        // One base 36 digit, wrapping round on long mazes.
        self.distance_from_start_to(coord)
            .and_then(|d| std::char::from_digit(d % 36, 36))
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[GridCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> Option<char> {
        if self.on_path_coordinates.contains(&coord) {
            Some('.')
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: Vec<GridCoordinate>,
    end_coordinates: Vec<GridCoordinate>,
}
impl StartEndPointsDisplay {
    pub fn new(starts: Vec<GridCoordinate>, ends: Vec<GridCoordinate>) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> Option<char> {
        if self.start_coordinates.contains(&coord) {
            Some('S')
        } else if self.end_coordinates.contains(&coord) {
            Some('E')
        } else {
            None
        }
    }
}

/// One line of text per row, one glyph per cell, no trailing newline.
pub fn render_text(grid: &OccupancyGrid, grid_display: Option<&dyn GridDisplay>) -> String {
    grid.iter_row()
        .map(|row| {
            row.into_iter()
                .map(|coord| render_cell(grid, grid_display, coord))
                .collect::<String>()
        })
        .join("\n")
}

fn render_cell(grid: &OccupancyGrid,
               grid_display: Option<&dyn GridDisplay>,
               coord: GridCoordinate)
               -> char {
    match grid.cell_kind(coord) {
        None | Some(CellKind::Wall) => WALL_GLYPH,
        Some(kind) => {
            grid_display.and_then(|displayer| displayer.render_cell_body(coord))
                .unwrap_or(if kind == CellKind::Exit {
                    EXIT_GLYPH
                } else {
                    PASSAGE_GLYPH
                })
        }
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", render_text(self, None))
    }
}
