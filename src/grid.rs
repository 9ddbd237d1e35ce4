use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};
use smallvec::SmallVec;

use crate::cells::{CellKind, CompassPrimary, GridCoordinate};
use crate::grid_dimensions::MazeDimensions;
use crate::grid_iterators::{CellIter, RowIter};
use crate::units::{CellsCount, Height, LinksCount, Width};
use crate::utils;

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

/// A rectangle of cells, each a wall, a passage or the exit.
///
/// Callers only ever see this through shared references; the cells are written by the
/// generator that owns it.
#[derive(Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    cells: Vec<CellKind>,
    dimensions: MazeDimensions,
}

impl fmt::Debug for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "OccupancyGrid :: width: {:?}, height: {:?}, open cells: {:?}",
               self.dimensions.width().0,
               self.dimensions.height().0,
               self.open_cells_count().0)
    }
}

impl OccupancyGrid {
    /// A grid of solid wall.
    pub fn walled(dimensions: MazeDimensions) -> OccupancyGrid {
        OccupancyGrid {
            cells: vec![CellKind::Wall; dimensions.size().0],
            dimensions,
        }
    }

    #[inline]
    pub fn dimensions(&self) -> &MazeDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.dimensions.width()
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.dimensions.height()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// None for coordinates outside the grid.
    #[inline]
    pub fn cell_kind(&self, coord: GridCoordinate) -> Option<CellKind> {
        self.dimensions.row_major_index(coord).map(|index| self.cells[index])
    }

    /// Anything outside the grid counts as wall.
    #[inline]
    pub fn is_wall(&self, coord: GridCoordinate) -> bool {
        self.cell_kind(coord).map_or(true, |kind| kind == CellKind::Wall)
    }

    /// Nothing outside the grid is ever the exit.
    #[inline]
    pub fn is_exit(&self, coord: GridCoordinate) -> bool {
        self.cell_kind(coord) == Some(CellKind::Exit)
    }

    #[inline]
    pub fn is_open(&self, coord: GridCoordinate) -> bool {
        !self.is_wall(coord)
    }

    /// Overwrite a cell. Writes outside the grid are dropped and report false.
    pub(crate) fn set_cell_kind(&mut self, coord: GridCoordinate, kind: CellKind) -> bool {
        if let Some(index) = self.dimensions.row_major_index(coord) {
            self.cells[index] = kind;
            true
        } else {
            false
        }
    }

    /// Cells directly North, East, South or West that are inside the grid.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Adjacent cells that are open, i.e. joined to `coord` by a passage if `coord` is open too.
    pub fn open_neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .filter(|neighbour| self.is_open(*neighbour))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        coord.offset(direction, 1).filter(|neighbour| self.dimensions.contains(*neighbour))
    }

    pub fn open_cells_count(&self) -> CellsCount {
        CellsCount(self.cells.iter().filter(|kind| kind.is_open()).count())
    }

    /// Number of adjacent pairs of open cells.
    pub fn open_links_count(&self) -> LinksCount {
        LinksCount(self.iter_links().count())
    }

    /// Every cell holding the exit, in row-major order.
    pub fn exits(&self) -> Vec<GridCoordinate> {
        self.iter().filter(|coord| self.is_exit(*coord)).collect()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.dimensions)
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.dimensions)
    }

    /// Pairs of adjacent open cells. Each pair appears once, the second member lying East or
    /// South of the first.
    pub fn iter_links(&self) -> LinksIter {
        LinksIter {
            grid: self,
            cells: self.iter(),
            pending_south: None,
        }
    }

    /// The open cells as graph nodes, joined wherever two open cells are adjacent.
    /// Nodes are added in row-major order.
    pub fn passage_graph(&self) -> UnGraph<GridCoordinate, ()> {
        let open_count = self.open_cells_count().0;
        let mut graph = UnGraph::with_capacity(open_count, open_count);
        let mut node_indices = utils::fnv_hashmap::<GridCoordinate, NodeIndex>(open_count);

        for coord in self.iter().filter(|coord| self.is_open(*coord)) {
            node_indices.insert(coord, graph.add_node(coord));
        }
        for (a, b) in self.iter_links() {
            if let (Some(a_index), Some(b_index)) = (node_indices.get(&a), node_indices.get(&b)) {
                graph.add_edge(*a_index, *b_index, ());
            }
        }

        graph
    }
}

pub struct LinksIter<'a> {
    grid: &'a OccupancyGrid,
    cells: CellIter,
    pending_south: Option<(GridCoordinate, GridCoordinate)>,
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (GridCoordinate, GridCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(link) = self.pending_south.take() {
            return Some(link);
        }

        let grid = self.grid;
        for coord in &mut self.cells {
            if !grid.is_open(coord) {
                continue;
            }

            let linked_in = |dir| {
                grid.neighbour_at_direction(coord, dir)
                    .filter(|neighbour| grid.is_open(*neighbour))
                    .map(|neighbour| (coord, neighbour))
            };
            let east = linked_in(CompassPrimary::East);
            let south = linked_in(CompassPrimary::South);

            match (east, south) {
                (Some(east_link), south_link) => {
                    self.pending_south = south_link;
                    return Some(east_link);
                }
                (None, Some(south_link)) => return Some(south_link),
                (None, None) => continue,
            }
        }

        None
    }
}

impl<'a> fmt::Debug for LinksIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: cells iter : {:?}", self.cells)
    }
}
