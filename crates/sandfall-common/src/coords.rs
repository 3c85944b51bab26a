//! Grid coordinates and neighbour directions.

use serde::{Deserialize, Serialize};

/// Integer cell coordinate on the simulation grid.
///
/// Coordinates are signed so neighbour probes may step off the grid; the
/// grid store treats anything outside `[0, W) x [0, H)` as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column (grows to the right)
    pub x: i32,
    /// Row (grows downward)
    pub y: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a world-space position to the cell containing it.
    #[must_use]
    pub fn from_world(world_x: f32, world_y: f32, cell_size: f32) -> Self {
        Self {
            x: (world_x / cell_size).floor() as i32,
            y: (world_y / cell_size).floor() as i32,
        }
    }

    /// Returns the coordinate shifted by the given offset.
    ///
    /// Saturates at the `i32` range, which is far outside any grid.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Returns the neighbouring coordinate in a cardinal direction.
    #[must_use]
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        self.offset(dx, dy)
    }

    /// Iterates the eight surrounding coordinates (Moore neighbourhood).
    pub fn moore_neighbors(self) -> impl Iterator<Item = GridCoord> {
        MOORE_OFFSETS
            .iter()
            .map(move |&(dx, dy)| self.offset(dx, dy))
    }

    /// Chebyshev distance to another coordinate.
    #[must_use]
    pub fn chebyshev(self, other: Self) -> i32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        i32::try_from(dx.max(dy)).unwrap_or(i32::MAX)
    }
}

const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Cardinal direction on the grid.
///
/// `Down` is toward increasing `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward `y - 1`
    Up,
    /// Toward `x + 1`
    Right,
    /// Toward `y + 1`
    Down,
    /// Toward `x - 1`
    Left,
}

impl Direction {
    /// All four directions, in draw order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Maps an index in `0..4` to a direction (wrapping).
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Cell offset `(dx, dy)` for this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}
