use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::cells::{CellKind, CompassPrimary, GridCoordinate};
use crate::grid::OccupancyGrid;
use crate::grid_dimensions::MazeDimensions;
use crate::pathing;
use crate::units::{Height, LinksCount, Width};

/// Owns a maze grid and carves a fresh perfect maze into it on every `generate`.
///
/// Until the first `generate` the grid is solid wall, so every query is answerable at any point.
#[derive(Debug)]
pub struct MazeGenerator<R: Rng = StdRng> {
    dimensions: MazeDimensions,
    grid: OccupancyGrid,
    rng: R,
    carved_links: LinksCount,
}

impl MazeGenerator<StdRng> {
    /// A generator drawing its randomness from the operating system.
    pub fn new(width: usize, height: usize) -> MazeGenerator<StdRng> {
        MazeGenerator::with_rng(width, height, StdRng::from_entropy())
    }

    /// A generator that always carves the same sequence of mazes for the same seed.
    pub fn with_seed(width: usize, height: usize, seed: u64) -> MazeGenerator<StdRng> {
        MazeGenerator::with_rng(width, height, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MazeGenerator<R> {
    /// Even dimensions are bumped up to the next odd number.
    pub fn with_rng(width: usize, height: usize, rng: R) -> MazeGenerator<R> {
        let dimensions = MazeDimensions::new(width, height);
        MazeGenerator {
            dimensions,
            grid: OccupancyGrid::walled(dimensions),
            rng,
            carved_links: LinksCount(0),
        }
    }

    /// Replace the grid with a newly carved maze and return it.
    ///
    /// The start is forced open and the end forced to the exit once carving is done. Carving
    /// visits every odd cell of a non degenerate grid, so both were carved already; on a
    /// degenerate grid the forced writes are simply dropped where they fall outside it.
    pub fn generate(&mut self) -> &OccupancyGrid {
        let mut grid = OccupancyGrid::walled(self.dimensions);

        let start = self.dimensions.start();
        let end = self.dimensions.end();
        let carved_links = carve_passages(&mut grid, start, &mut self.rng);
        grid.set_cell_kind(start, CellKind::Passage);
        grid.set_cell_kind(end, CellKind::Exit);

        debug!("Carved {}x{} maze: {} links, {} open cells",
               self.dimensions.width().0,
               self.dimensions.height().0,
               carved_links.0,
               grid.open_cells_count().0);

        self.grid = grid;
        self.carved_links = carved_links;
        &self.grid
    }

    /// The most recently generated grid.
    #[inline]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    #[inline]
    pub fn dimensions(&self) -> &MazeDimensions {
        &self.dimensions
    }

    /// True outside the grid as well as on walls.
    #[inline]
    pub fn is_wall(&self, x: i32, z: i32) -> bool {
        self.grid.is_wall(GridCoordinate::new(x, z))
    }

    /// False everywhere outside the grid.
    #[inline]
    pub fn is_exit(&self, x: i32, z: i32) -> bool {
        self.grid.is_exit(GridCoordinate::new(x, z))
    }

    #[inline]
    pub fn start(&self) -> GridCoordinate {
        self.dimensions.start()
    }

    #[inline]
    pub fn end(&self) -> GridCoordinate {
        self.dimensions.end()
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.dimensions.width()
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.dimensions.height()
    }

    /// How many two-cell carving moves the last generation made.
    #[inline]
    pub fn carved_links(&self) -> LinksCount {
        self.carved_links
    }

    /// The route from the start to the end through the current grid, both ends included.
    pub fn solution(&self) -> Option<Vec<GridCoordinate>> {
        let distances = pathing::Distances::new(&self.grid, self.start())?;
        pathing::shortest_path(&self.grid, &distances, self.end())
    }
}

/// One cell of the depth first walk: where we are and which directions are left to try.
#[derive(Debug)]
struct CarveFrame {
    coord: GridCoordinate,
    directions: [CompassPrimary; 4],
    next_direction: usize,
}

/// Apply the recursive backtracker maze generation algorithm from `start`.
///
/// Every visited cell is opened and gets its own random ordering of the four compass
/// directions. Each direction in turn looks two cells away; if that cell is strictly inside the
/// border ring and still wall it has never been visited, so the wall between the two is knocked
/// through and the walk continues from there, only coming back to try the remaining directions
/// once everything reachable from there has been carved. A dead end with nothing left to try
/// hands back to the cell it was entered from.
///
/// Never revisiting a cell is what makes this a perfect maze: the carved passages form a
/// spanning tree of the odd cells.
///
/// The backtracking is held in an explicit stack of frames rather than the call stack, so
/// large grids cannot overflow it. The order of visits and of random draws is the same as the
/// recursive formulation.
///
/// Returns the number of links carved, which is one less than the number of odd cells visited.
fn carve_passages<R: Rng + ?Sized>(grid: &mut OccupancyGrid,
                                   start: GridCoordinate,
                                   rng: &mut R)
                                   -> LinksCount {
    let mut carved_links = 0;
    let mut stack = vec![enter_cell(grid, start, rng)];

    while let Some(frame) = stack.last_mut() {
        if frame.next_direction == frame.directions.len() {
            let _ = stack.pop();
            continue;
        }

        let coord = frame.coord;
        let direction = frame.directions[frame.next_direction];
        frame.next_direction += 1;

        if let Some(neighbour) = coord.offset(direction, 2) {
            if is_unvisited_interior(grid, neighbour) {
                if let Some(midpoint_wall) = coord.offset(direction, 1) {
                    grid.set_cell_kind(midpoint_wall, CellKind::Passage);
                }
                carved_links += 1;
                stack.push(enter_cell(grid, neighbour, rng));
            }
        }
    }

    LinksCount(carved_links)
}

fn enter_cell<R: Rng + ?Sized>(grid: &mut OccupancyGrid,
                               coord: GridCoordinate,
                               rng: &mut R)
                               -> CarveFrame {
    grid.set_cell_kind(coord, CellKind::Passage);

    let mut directions = CompassPrimary::ALL;
    directions.shuffle(rng);

    CarveFrame {
        coord,
        directions,
        next_direction: 0,
    }
}

#[inline]
fn is_unvisited_interior(grid: &OccupancyGrid, coord: GridCoordinate) -> bool {
    grid.dimensions().is_interior(coord) && grid.cell_kind(coord) == Some(CellKind::Wall)
}

#[cfg(test)]
mod tests {

    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::grid_displays::render_text;
    use crate::pathing::Distances;
    use crate::units::CellsCount;

    fn assert_maze_invariants(grid: &OccupancyGrid) {
        let dims = *grid.dimensions();
        let end = dims.end();

        for coord in grid.iter().filter(|coord| dims.is_border(*coord)) {
            assert!(grid.is_wall(coord), "border cell {} is open", coord);
        }

        assert_eq!(grid.exits(), vec![end]);
        assert!(grid.is_open(dims.start()));

        let distances = Distances::new(grid, dims.start()).expect("start is open");
        assert!(distances.distance_from_start_to(end).is_some());
        assert_eq!(distances.reachable_count(), grid.open_cells_count());

        let graph = grid.passage_graph();
        assert_eq!(graph.edge_count() + 1, graph.node_count());
        assert_eq!(connected_components(&graph), 1);
        assert!(!is_cyclic_undirected(&graph));
    }

    #[test]
    fn five_by_five() {
        let mut generator = MazeGenerator::with_seed(5, 5, 7);
        assert_eq!(generator.width(), Width(5));
        assert_eq!(generator.height(), Height(5));
        assert_eq!(generator.start(), GridCoordinate::new(1, 1));
        assert_eq!(generator.end(), GridCoordinate::new(3, 3));

        let grid = generator.generate();
        for i in 0..5 {
            assert!(grid.is_wall(GridCoordinate::new(0, i)));
            assert!(grid.is_wall(GridCoordinate::new(4, i)));
            assert!(grid.is_wall(GridCoordinate::new(i, 0)));
            assert!(grid.is_wall(GridCoordinate::new(i, 4)));
        }
        assert_eq!(grid.cell_kind(GridCoordinate::new(3, 3)), Some(CellKind::Exit));
        // Only the four odd cells and three of the four walls between them are ever carved,
        // the centre is never touched.
        assert!(grid.is_wall(GridCoordinate::new(2, 2)));
        assert_eq!(grid.open_cells_count(), CellsCount(7));
        assert_maze_invariants(grid);
        assert!(generator.is_exit(3, 3));
    }

    #[test]
    fn even_dimensions_are_made_odd() {
        let mut generator = MazeGenerator::with_seed(10, 6, 1);
        assert_eq!(generator.width(), Width(11));
        assert_eq!(generator.height(), Height(7));
        assert_eq!(generator.end(), GridCoordinate::new(9, 5));
        let grid = generator.generate();
        assert_eq!(grid.width(), Width(11));
        assert_eq!(grid.height(), Height(7));
        assert_maze_invariants(grid);
    }

    #[test]
    fn queries_outside_the_grid() {
        let mut generator = MazeGenerator::with_seed(9, 7, 3);
        let _ = generator.generate();
        let (w, h) = (generator.width().0 as i32, generator.height().0 as i32);

        for &(x, z) in &[(-1, -1), (w, h), (1000, 1000), (w, 1), (1, h), (i32::MIN, i32::MAX)] {
            assert!(generator.is_wall(x, z));
            assert!(!generator.is_exit(x, z));
        }
    }

    #[test]
    fn before_generation_everything_is_wall() {
        let generator = MazeGenerator::with_seed(7, 7, 0);
        assert!(generator.grid().iter().all(|coord| generator.grid().is_wall(coord)));
        assert!(!generator.is_exit(5, 5));
        assert_eq!(generator.carved_links(), LinksCount(0));
        assert_eq!(generator.solution(), None);
    }

    #[test]
    fn reaches_the_exit_for_many_seeds() {
        for seed in 0..1000 {
            let size = 5 + (seed as usize % 12);
            let mut generator = MazeGenerator::with_seed(size, size + 2, seed);
            let grid = generator.generate();
            let distances = Distances::new(grid, grid.dimensions().start()).expect("start is open");
            assert!(distances.distance_from_start_to(grid.dimensions().end()).is_some(),
                    "seed {} size {} has no route to the exit",
                    seed,
                    size);
        }
    }

    #[test]
    fn every_odd_cell_is_carved() {
        let mut generator = MazeGenerator::with_seed(21, 15, 99);
        let carvable = generator.dimensions().carvable_cells_count().0;
        let grid = generator.generate();
        for coord in grid.iter().filter(|c| c.x % 2 == 1 && c.z % 2 == 1) {
            assert!(grid.is_open(coord));
        }
        // Each link opens the wall between two cells plus the cell reached.
        assert_eq!(generator.carved_links(), LinksCount(carvable - 1));
        assert_eq!(generator.grid().open_cells_count(),
                   CellsCount(1 + 2 * generator.carved_links().0));
    }

    #[test]
    fn even_cells_are_never_both_axes_open() {
        let mut generator = MazeGenerator::with_seed(31, 31, 5);
        let grid = generator.generate();
        for coord in grid.iter().filter(|c| c.x % 2 == 0 && c.z % 2 == 0) {
            assert!(grid.is_wall(coord));
        }
    }

    #[test]
    fn regeneration_keeps_the_invariants() {
        let mut generator = MazeGenerator::with_seed(15, 11, 2024);
        let first = generator.generate().clone();
        assert_maze_invariants(&first);

        let mut any_different = false;
        for _ in 0..10 {
            let next = generator.generate();
            assert_maze_invariants(next);
            any_different |= *next != first;
        }
        assert!(any_different);
    }

    #[test]
    fn same_seed_same_maze() {
        let mut a = MazeGenerator::with_seed(25, 17, 42);
        let mut b = MazeGenerator::with_seed(25, 17, 42);
        for _ in 0..3 {
            assert_eq!(a.generate(), b.generate());
            assert_eq!(a.carved_links(), b.carved_links());
        }
    }

    #[test]
    fn injected_rng() {
        // A constant source still yields a valid, fully carved maze.
        let mut generator = MazeGenerator::with_rng(11, 11, StepRng::new(0, 0));
        let grid = generator.generate();
        assert_maze_invariants(grid);
        assert_eq!(generator.carved_links(), LinksCount(24));
    }

    #[test]
    fn solution_runs_from_start_to_exit() {
        let mut generator = MazeGenerator::with_seed(13, 9, 11);
        let _ = generator.generate();
        let path = generator.solution().expect("the exit is reachable");
        assert_eq!(path.first(), Some(&generator.start()));
        assert_eq!(path.last(), Some(&generator.end()));
        for step in path.windows(2) {
            let (a, b) = (step[0], step[1]);
            assert_eq!((a.x - b.x).abs() + (a.z - b.z).abs(), 1);
            assert!(generator.grid().is_open(b));
        }
    }

    #[test]
    fn large_maze_does_not_overflow_the_stack() {
        let mut generator = MazeGenerator::with_seed(1001, 1001, 8);
        let grid = generator.generate();
        assert_eq!(grid.exits(), vec![GridCoordinate::new(999, 999)]);
        assert_eq!(generator.carved_links(), LinksCount(500 * 500 - 1));
    }

    #[test]
    fn degenerate_sizes_do_not_panic() {
        for &(w, h) in &[(0, 0), (1, 1), (1, 9), (9, 1), (0, 5)] {
            let mut generator = MazeGenerator::with_seed(w, h, 1);
            let grid = generator.generate();
            assert!(grid.iter().all(|coord| grid.is_wall(coord)));
            assert!(!generator.is_exit(generator.end().x, generator.end().z));
            assert_eq!(generator.carved_links(), LinksCount(0));
        }
    }

    #[test]
    fn three_by_three_has_the_exit_on_the_start() {
        let mut generator = MazeGenerator::with_seed(3, 3, 1);
        assert_eq!(generator.start(), generator.end());
        let grid = generator.generate();
        assert_eq!(grid.exits(), vec![GridCoordinate::new(1, 1)]);
        assert_eq!(grid.open_cells_count(), CellsCount(1));
    }

    fn carve_recursively<R: Rng>(grid: &mut OccupancyGrid, coord: GridCoordinate, rng: &mut R) {
        grid.set_cell_kind(coord, CellKind::Passage);
        let mut directions = CompassPrimary::ALL;
        directions.shuffle(rng);
        for direction in directions.iter() {
            if let (Some(wall), Some(next)) = (coord.offset(*direction, 1),
                                               coord.offset(*direction, 2)) {
                if is_unvisited_interior(grid, next) {
                    grid.set_cell_kind(wall, CellKind::Passage);
                    carve_recursively(grid, next, rng);
                }
            }
        }
    }

    #[test]
    fn explicit_stack_matches_recursive_carving() {
        for seed in 0..300 {
            let (width, height) = (5 + (seed as usize % 20), 5 + (seed as usize % 13));
            let mut generator = MazeGenerator::with_seed(width, height, seed);
            let carved = generator.generate();

            let dims = MazeDimensions::new(width, height);
            let mut expected = OccupancyGrid::walled(dims);
            carve_recursively(&mut expected, dims.start(), &mut StdRng::seed_from_u64(seed));
            expected.set_cell_kind(dims.start(), CellKind::Passage);
            expected.set_cell_kind(dims.end(), CellKind::Exit);

            assert_eq!(*carved, expected, "seed {} size {}x{}", seed, width, height);
        }
    }

    #[test]
    fn fixed_rng_carves_a_known_maze() {
        // A zero source shuffles every cell's directions to East, South, West, North.
        let mut generator = MazeGenerator::with_rng(5, 5, StepRng::new(0, 0));
        assert_eq!(render_text(generator.generate(), None),
                   "#####\n\
                    #   #\n\
                    ### #\n\
                    #  E#\n\
                    #####");

        let mut generator = MazeGenerator::with_rng(7, 7, StepRng::new(0, 0));
        assert_eq!(render_text(generator.generate(), None),
                   "#######\n\
                    #     #\n\
                    ##### #\n\
                    #   # #\n\
                    # ### #\n\
                    #    E#\n\
                    #######");
        assert_eq!(generator.carved_links(), LinksCount(8));
    }

    #[test]
    fn quickcheck_maze_invariants() {
        fn p(width: u8, height: u8, seed: u64) -> TestResult {
            let (width, height) = (width as usize % 48, height as usize % 48);
            if width < 3 || height < 3 {
                return TestResult::discard();
            }
            let mut generator = MazeGenerator::with_seed(width, height, seed);
            let open_cells = {
                let grid = generator.generate();
                assert_maze_invariants(grid);
                grid.open_cells_count().0
            };
            TestResult::from_bool(open_cells == 1 + 2 * generator.carved_links().0)
        }
        quickcheck(p as fn(u8, u8, u64) -> TestResult)
    }

    #[test]
    fn quickcheck_dimension_normalisation() {
        fn p(width: u8, height: u8) -> bool {
            let generator = MazeGenerator::with_seed(width as usize, height as usize, 0);
            let expected = |n: usize| if n % 2 == 0 { n + 1 } else { n };
            generator.width() == Width(expected(width as usize)) &&
            generator.height() == Height(expected(height as usize))
        }
        quickcheck(p as fn(u8, u8) -> bool)
    }
}
