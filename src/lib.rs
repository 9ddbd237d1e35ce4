//! **maze_carver** carves perfect mazes into odd sized occupancy grids by recursive
//! backtracking, and can route find through them and dump them as text or PNG images.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_displays;
pub mod grid_iterators;
pub mod grid_traits;
pub mod pathing;
pub mod renderers;
pub mod units;
mod utils;

pub use crate::cells::{CellKind, GridCoordinate};
pub use crate::generators::MazeGenerator;
pub use crate::grid::OccupancyGrid;
