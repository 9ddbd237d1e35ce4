use smallvec::SmallVec;

use crate::cells::GridCoordinate;
use crate::grid::OccupancyGrid;
use crate::units::CellsCount;
use crate::utils::{self, FnvHashMap};

/// Steps from a start cell to every open cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// Flood fill outwards from `start_coordinate` through open cells.
    /// Returns None if the start is a wall or outside the grid.
    pub fn new(grid: &OccupancyGrid, start_coordinate: GridCoordinate) -> Option<Distances> {
        if grid.is_wall(start_coordinate) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.open_cells_count().0);
        distances.insert(start_coordinate, 0);

        // Every step costs the same, so the first time a cell is reached is by a shortest route
        // and the map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link_coordinate in grid.open_neighbours(*cell_coord) {
                    if !distances.contains_key(&link_coordinate) {
                        distances.insert(link_coordinate, distance_to_cell + 1);
                        new_frontier.push(link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// None when `coord` cannot be reached from the start.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    /// How many cells the start can reach, itself included.
    #[inline]
    pub fn reachable_count(&self) -> CellsCount {
        CellsCount(self.distances.len())
    }

    /// The cells at the maximum distance, in row-major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[GridCoordinate; 8]> {
        let furthest_distance = self.max();
        let mut furthest = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .collect::<SmallVec<[GridCoordinate; 8]>>();
        furthest.sort_by_key(|coord| (coord.z, coord.x));
        furthest
    }
}

/// Walk back from `end_point` towards the start, always to an adjacent open cell one step
/// closer. Returns the path from start to end inclusive, or None if `end_point` is unreachable.
pub fn shortest_path(grid: &OccupancyGrid,
                     distances_from_start: &Distances,
                     end_point: GridCoordinate)
                     -> Option<Vec<GridCoordinate>> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let mut path = vec![end_point];
    let mut current_coord = end_point;

    while current_distance > 0 {
        let closer = grid.open_neighbours(current_coord)
            .into_iter()
            .find(|neighbour| {
                distances_from_start.distance_from_start_to(*neighbour) ==
                Some(current_distance - 1)
            })?;

        current_coord = closer;
        current_distance -= 1;
        path.push(current_coord);
    }

    path.reverse();
    Some(path)
}

/// The longest route through a perfect maze.
///
/// The cell furthest from an arbitrary open cell is one end of the longest path; the cell
/// furthest from that is the other. Starts from the first open cell in row-major order. If open
/// cells are split into separate regions only that cell's region is considered.
pub fn longest_path(grid: &OccupancyGrid) -> Option<Vec<GridCoordinate>> {
    let arbitrary_start_point = grid.iter().find(|coord| grid.is_open(*coord))?;

    let first_distances = Distances::new(grid, arbitrary_start_point)?;
    let long_path_start_coordinate = *first_distances.furthest_points_on_grid().first()?;

    let distances_from_start = Distances::new(grid, long_path_start_coordinate)?;
    let end_point = *distances_from_start.furthest_points_on_grid().first()?;

    shortest_path(grid, &distances_from_start, end_point)
}
