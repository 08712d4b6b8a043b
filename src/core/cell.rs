//! Board coordinates.
//!
//! A `Cell` is a `(row, col)` pair. Components are signed so that targets
//! naming cells off the board can still be represented (and then degraded
//! by the resolver) instead of wrapping or panicking.
//!
//! Cells order row-major, which is the enumeration order of the grid and the
//! iteration order of every cell-keyed map in `GameState`.

use serde::{Deserialize, Serialize};

/// A board coordinate, 0-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    /// Create a new cell.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The cell `distance` steps away in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction, distance: i32) -> Self {
        let (dr, dc) = direction.delta();
        Self {
            row: self.row + dr * distance,
            col: self.col + dc * distance,
        }
    }

    /// The four axis neighbours, in `Direction::ALL` order.
    ///
    /// Neighbours may lie off the board; callers filter with `Grid::contains`.
    #[must_use]
    pub fn neighbors(self) -> [Cell; 4] {
        Direction::ALL.map(|d| self.step(d, 1))
    }

    /// Manhattan distance, saturating at `u32::MAX` for far-apart cells.
    #[must_use]
    pub const fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row).saturating_add(self.col.abs_diff(other.col))
    }

    /// True if `other` is one of the four axis neighbours.
    #[must_use]
    pub const fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Axis direction, clockwise from up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in clockwise order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// `(row, col)` delta of one step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }
}
