use crate::cells::GridCoordinate;

pub trait GridDisplay {
    /// Glyph to show for an open cell instead of the plain passage or exit glyph.
    /// Walls are always drawn as walls.
    fn render_cell_body(&self, _: GridCoordinate) -> Option<char> {
        None
    }
}
