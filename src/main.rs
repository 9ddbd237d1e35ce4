use std::fs;
use std::path::Path;

use docopt::Docopt;
use log::{info, warn};
use serde_derive::Deserialize;
use maze_carver::{
    generators::MazeGenerator,
    grid::OccupancyGrid,
    grid_displays::{self, PathDisplay, StartEndPointsDisplay},
    grid_traits::GridDisplay,
    pathing,
    renderers,
};

const USAGE: &str = "Maze carver

Usage:
    maze_carver -h | --help
    maze_carver [options] [text] [image]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The grid width in a w*h grid [default: 21].
    --grid-height=<h>      The grid height in a w*h grid [default: 21].
    --seed=<s>             Seed the random number generator to carve a repeatable maze.
    --text-out=<path>      Output file path for a textual rendering of a maze. Defaults to stdout.
    --show-distances       Show the distance from the start to every other open cell.
    --show-path            Show the path from the start to the exit.
    --image-out=<path>     Output file path for an image rendering of a maze. Always PNG format [default: maze.png].
    --cell-pixels=<n>      Pixel count along one side of a cell [default: 10] max 255.
    --colour-distances     Indicate the distance from the start to any cell by the cell's background colour.
    --mark-start-end       Mark the start and the exit.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.

Even sizes are bumped up to the next odd number.
Without text or image the maze is printed as text.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    cmd_text: bool,
    flag_text_out: String,
    flag_show_distances: bool,
    flag_show_path: bool,
    cmd_image: bool,
    flag_image_out: String,
    flag_cell_pixels: u8,
    flag_colour_distances: bool,
    flag_mark_start_end: bool,
    flag_save_edges: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            ImageSaveError(::image::ImageError);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };

    let mut generator = if let Some(seed) = args.flag_seed {
        MazeGenerator::with_seed(width, height, seed)
    } else {
        MazeGenerator::new(width, height)
    };
    let _ = generator.generate();
    info!("Generated a {}x{} maze with {} passages",
          generator.width().0,
          generator.height().0,
          generator.carved_links().0);

    if generator.dimensions().is_degenerate() {
        warn!("A {}x{} grid is too small to carve; the maze is solid wall",
              generator.width().0,
              generator.height().0);
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(generator.grid(), &args.flag_save_edges)?;
    }

    let do_text_render = args.cmd_text || !args.cmd_image;
    if do_text_render {
        let text = maze_text(&generator, &args)?;
        if args.flag_text_out.is_empty() {
            println!("{}", text);
        } else {
            fs::write(&args.flag_text_out, text + "\n")
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
            info!("Wrote maze text to {}", args.flag_text_out);
        }
    }

    if args.cmd_image {
        save_maze_image(&generator, &args)?;
    }

    Ok(())
}

/// Distances win over the path, which wins over the start and end marks.
fn maze_text(generator: &MazeGenerator, maze_args: &MazeArgs) -> Result<String> {
    let grid = generator.grid();

    if maze_args.flag_show_distances {
        let distances = pathing::Distances::new(grid, generator.start())
            .ok_or("The maze start is not open so there are no distances to show.")?;
        return Ok(grid_displays::render_text(grid, Some(&distances as &dyn GridDisplay)));
    }

    if maze_args.flag_show_path {
        if let Some(path) = generator.solution() {
            let display_path = PathDisplay::new(&path);
            return Ok(grid_displays::render_text(grid, Some(&display_path as &dyn GridDisplay)));
        }
        warn!("No route from {} to {}", generator.start(), generator.end());
    }

    if maze_args.flag_mark_start_end {
        let display_start_end_points = StartEndPointsDisplay::new(vec![generator.start()],
                                                                  vec![generator.end()]);
        return Ok(grid_displays::render_text(grid,
                                             Some(&display_start_end_points as &dyn GridDisplay)));
    }

    Ok(grid_displays::render_text(grid, None))
}

fn save_maze_image(generator: &MazeGenerator, maze_args: &MazeArgs) -> Result<()> {
    let grid = generator.grid();

    let distances = if maze_args.flag_colour_distances {
        pathing::Distances::new(grid, generator.start())
    } else {
        None
    };
    let path_opt = if maze_args.flag_show_path {
        generator.solution()
    } else {
        None
    };

    let render_options = renderers::RenderOptionsBuilder::new()
        .cell_side_pixels_length(maze_args.flag_cell_pixels)
        .colour_distances(maze_args.flag_colour_distances)
        .distances(distances.as_ref())
        .show_path(maze_args.flag_show_path)
        .path(path_opt.as_deref())
        .mark_start_end(maze_args.flag_mark_start_end)
        .start(Some(generator.start()))
        .end(Some(generator.end()))
        .build();

    renderers::save_png(grid, &render_options, Path::new(&maze_args.flag_image_out))
        .chain_err(|| format!("Failed to write maze image {}", maze_args.flag_image_out))?;
    Ok(())
}

fn save_maze_graph(maze_grid: &OccupancyGrid, file_path: &str) -> Result<()> {

    let graph = maze_grid.passage_graph();
    let dimensions = maze_grid.dimensions();

    let mut graph_data = format!("{} {}\n", maze_grid.size(), graph.edge_count());

    for edge in graph.raw_edges() {
        let index_a = dimensions.row_major_index(graph[edge.source()])
            .ok_or("Passage graph node outside the grid")?;
        let index_b = dimensions.row_major_index(graph[edge.target()])
            .ok_or("Passage graph node outside the grid")?;

        graph_data.push_str(&format!("{} {}\n", index_a + 1, index_b + 1));
    }

    fs::write(file_path, graph_data)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;
    info!("Wrote {} maze edges to {}", graph.edge_count(), file_path);

    Ok(())
}
