use std::path::Path;

use image::error::{LimitError, LimitErrorKind};
use image::{ImageError, ImageResult, Rgb, RgbImage};
use log::info;

use crate::cells::{CellKind, GridCoordinate};
use crate::grid::OccupancyGrid;
use crate::pathing::Distances;
use crate::utils::{self, FnvHashSet};

const WALL_COLOUR: Rgb<u8> = Rgb([0x20, 0x20, 0x20]);
const PASSAGE_COLOUR: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const EXIT_COLOUR: Rgb<u8> = Rgb([0x00, 0xc0, 0x00]);
const START_COLOUR: Rgb<u8> = Rgb([0x00, 0x00, 0xff]);
const PATH_COLOUR: Rgb<u8> = Rgb([0xff, 0x80, 0x00]);

#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    cell_side_pixels_length: u32,
    colour_distances: bool,
    mark_start_end: bool,
    show_path: bool,
    distances: Option<&'a Distances>,
    start: Option<GridCoordinate>,
    end: Option<GridCoordinate>,
    path: Option<&'a [GridCoordinate]>,
}

#[derive(Debug, Clone)]
pub struct RenderOptionsBuilder<'a> {
    options: RenderOptions<'a>,
}

impl<'a> Default for RenderOptionsBuilder<'a> {
    fn default() -> Self {
        RenderOptionsBuilder::new()
    }
}

impl<'a> RenderOptionsBuilder<'a> {
    pub fn new() -> RenderOptionsBuilder<'a> {
        RenderOptionsBuilder {
            options: RenderOptions {
                cell_side_pixels_length: 10,
                colour_distances: false,
                mark_start_end: false,
                show_path: false,
                distances: None,
                start: None,
                end: None,
                path: None,
            },
        }
    }

    /// Clamped to at least one pixel.
    pub fn cell_side_pixels_length(mut self, cell_side_pixels_length: u8) -> Self {
        self.options.cell_side_pixels_length = u32::from(cell_side_pixels_length.max(1));
        self
    }
    pub fn colour_distances(mut self, colour_distances: bool) -> Self {
        self.options.colour_distances = colour_distances;
        self
    }
    pub fn mark_start_end(mut self, mark_start_end: bool) -> Self {
        self.options.mark_start_end = mark_start_end;
        self
    }
    pub fn show_path(mut self, show_path: bool) -> Self {
        self.options.show_path = show_path;
        self
    }
    pub fn distances(mut self, distances: Option<&'a Distances>) -> Self {
        self.options.distances = distances;
        self
    }
    pub fn start(mut self, start: Option<GridCoordinate>) -> Self {
        self.options.start = start;
        self
    }
    pub fn end(mut self, end: Option<GridCoordinate>) -> Self {
        self.options.end = end;
        self
    }
    pub fn path(mut self, path: Option<&'a [GridCoordinate]>) -> Self {
        self.options.path = path;
        self
    }
    pub fn build(self) -> RenderOptions<'a> {
        self.options
    }
}

/// Draw every cell of the grid as a filled square.
///
/// Later layers win: distance shading over plain passages, then the path, then the start and
/// end marks. Fails with a dimension limit error if the image would not fit in memory.
pub fn render_occupancy_grid(grid: &OccupancyGrid,
                             options: &RenderOptions)
                             -> ImageResult<RgbImage> {
    let cell_pixels = options.cell_side_pixels_length;
    let (img_width, img_height) = image_dimensions(grid, cell_pixels)
        .ok_or_else(|| ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError)))?;
    let mut image = RgbImage::from_pixel(img_width, img_height, WALL_COLOUR);

    let path_cells: FnvHashSet<GridCoordinate> = match (options.show_path, options.path) {
        (true, Some(path)) => path.iter().cloned().collect(),
        _ => utils::fnv_hashset(0),
    };

    for coord in grid.iter() {
        let colour = match grid.cell_kind(coord) {
            None | Some(CellKind::Wall) => continue,
            Some(CellKind::Exit) => EXIT_COLOUR,
            Some(CellKind::Passage) => passage_colour(coord, options),
        };
        let colour = if path_cells.contains(&coord) { PATH_COLOUR } else { colour };
        fill_cell(&mut image, coord, cell_pixels, colour);
    }

    if options.mark_start_end {
        if let Some(start) = options.start.filter(|s| grid.is_open(*s)) {
            fill_cell(&mut image, start, cell_pixels, START_COLOUR);
        }
        if let Some(end) = options.end.filter(|e| grid.is_open(*e)) {
            fill_cell(&mut image, end, cell_pixels, EXIT_COLOUR);
        }
    }

    Ok(image)
}

/// Render and write out as a PNG.
pub fn save_png(grid: &OccupancyGrid, options: &RenderOptions, path: &Path) -> ImageResult<()> {
    let image = render_occupancy_grid(grid, options)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    info!("Wrote {}x{} pixel maze image to {}",
          image.width(),
          image.height(),
          path.display());
    Ok(())
}

/// Pixel width and height, or None if either side or the RGB buffer length overflows.
fn image_dimensions(grid: &OccupancyGrid, cell_pixels: u32) -> Option<(u32, u32)> {
    let img_width = u32::try_from(grid.width().0).ok()?.checked_mul(cell_pixels)?;
    let img_height = u32::try_from(grid.height().0).ok()?.checked_mul(cell_pixels)?;
    let _buffer_len = (img_width as usize).checked_mul(img_height as usize)?.checked_mul(3)?;
    Some((img_width, img_height))
}

fn passage_colour(coord: GridCoordinate, options: &RenderOptions) -> Rgb<u8> {
    if !options.colour_distances {
        return PASSAGE_COLOUR;
    }

    let distances = match options.distances {
        Some(d) => d,
        None => return PASSAGE_COLOUR,
    };
    match distances.distance_from_start_to(coord) {
        Some(distance) => distance_colour(distance, distances.max()),
        None => PASSAGE_COLOUR,
    }
}

/// White at the start fading to a dark green at the furthest point.
fn distance_colour(distance: u32, max_distance: u32) -> Rgb<u8> {
    let intensity = if max_distance == 0 {
        1.0
    } else {
        (max_distance - distance.min(max_distance)) as f32 / max_distance as f32
    };
    let dark = (255.0 * intensity).round() as u8;
    let bright = (128.0 + 127.0 * intensity).round() as u8;
    Rgb([dark, bright, dark])
}

fn fill_cell(image: &mut RgbImage, coord: GridCoordinate, cell_pixels: u32, colour: Rgb<u8>) {
    let x1 = coord.x as u32 * cell_pixels;
    let z1 = coord.z as u32 * cell_pixels;
    for px in x1..(x1 + cell_pixels).min(image.width()) {
        for pz in z1..(z1 + cell_pixels).min(image.height()) {
            image.put_pixel(px, pz, colour);
        }
    }
}
