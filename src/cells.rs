use std::fmt;

/// What occupies a single square of the maze grid.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Default)]
pub enum CellKind {
    #[default]
    Wall,
    Passage,
    Exit,
}

impl CellKind {
    /// Anything that is not a wall can be walked through.
    #[inline]
    pub fn is_open(self) -> bool {
        self != CellKind::Wall
    }
}

/// A grid position. `x` is the column, `z` is the row.
///
/// Signed so that callers mapping world positions onto the grid can ask about
/// positions left of or above the maze without any conversion of their own.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: i32,
    pub z: i32,
}

impl GridCoordinate {
    #[inline]
    pub fn new(x: i32, z: i32) -> GridCoordinate {
        GridCoordinate { x, z }
    }

    /// The coordinate `distance` cells away in the given direction.
    /// Returns None if that position is not representable.
    pub fn offset(self, direction: CompassPrimary, distance: i32) -> Option<GridCoordinate> {
        let (dx, dz) = direction.unit_offset();
        let x = dx.checked_mul(distance).and_then(|d| self.x.checked_add(d))?;
        let z = dz.checked_mul(distance).and_then(|d| self.z.checked_add(d))?;
        Some(GridCoordinate { x, z })
    }
}

impl From<(i32, i32)> for GridCoordinate {
    fn from(x_z_pair: (i32, i32)) -> GridCoordinate {
        GridCoordinate::new(x_z_pair.0, x_z_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    /// (dx, dz) of a single step. North is towards row 0.
    #[inline]
    pub fn unit_offset(self) -> (i32, i32) {
        match self {
            CompassPrimary::North => (0, -1),
            CompassPrimary::East => (1, 0),
            CompassPrimary::South => (0, 1),
            CompassPrimary::West => (-1, 0),
        }
    }
}
