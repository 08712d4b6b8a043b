//! Static board geometry.
//!
//! The grid records the terrain a match starts with. Walls never change;
//! boxes are copied into `GameState` at construction and destroyed there, so
//! the grid itself stays read-only for the whole match.
//!
//! ## Layout legend
//!
//! | Symbol | Terrain                          |
//! |--------|----------------------------------|
//! | `.`    | open floor                       |
//! | `X`    | wall                             |
//! | `0`    | box                              |
//! | `1`    | box hiding a range-boost item    |
//! | `2`    | box hiding a capacity-boost item |

use im::Vector;
use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::entity::ItemKind;
use super::error::GridError;

/// Terrain of one cell at match start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Open,
    /// Destructible box, optionally hiding an item revealed on destruction.
    Box(Option<ItemKind>),
    /// Indestructible; blocks movement and blasts.
    Wall,
}

impl Terrain {
    /// Parse a layout symbol.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Terrain::Open),
            'X' => Some(Terrain::Wall),
            '0' => Some(Terrain::Box(None)),
            '1' => Some(Terrain::Box(Some(ItemKind::ExtraRange))),
            '2' => Some(Terrain::Box(Some(ItemKind::ExtraBomb))),
            _ => None,
        }
    }

    /// Layout symbol for this terrain.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Terrain::Open => '.',
            Terrain::Wall => 'X',
            Terrain::Box(None) => '0',
            Terrain::Box(Some(ItemKind::ExtraRange)) => '1',
            Terrain::Box(Some(ItemKind::ExtraBomb)) => '2',
        }
    }
}

/// The layout played by the original runner (13 columns, 11 rows).
pub const STANDARD_LAYOUT: [&str; 11] = [
    "...0.0.0.0...",
    ".0.........0.",
    ".............",
    ".0..0.0.0..0.",
    ".............",
    "0..0.0.0.0..0",
    ".............",
    ".0..0.0.0..0.",
    ".............",
    ".0.........0.",
    "...0.0.0.0...",
];

/// Corner start cells on the standard layout, in player id order.
pub const START_CELLS: [Cell; 4] = [
    Cell::new(0, 0),
    Cell::new(10, 12),
    Cell::new(0, 12),
    Cell::new(10, 0),
];

/// Rectangular board, row-major.
///
/// Backed by `im::Vector` so that cloning a state that embeds the grid is
/// O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vector<Terrain>,
}

impl Grid {
    /// Create an all-open grid.
    ///
    /// # Panics
    ///
    /// If `width` or `height` is 0. `from_rows` reports the same case as
    /// `GridError::EmptyLayout`.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "Grid must have at least one cell");
        Self {
            width,
            height,
            cells: std::iter::repeat(Terrain::Open).take(width * height).collect(),
        }
    }

    /// Parse a grid from layout rows (see the module legend).
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        if width == 0 {
            return Err(GridError::EmptyLayout);
        }

        let mut cells = Vector::new();
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(GridError::RaggedRow { row, expected: width, found });
            }
            for (col, symbol) in line.chars().enumerate() {
                let terrain = Terrain::from_symbol(symbol)
                    .ok_or(GridError::UnknownSymbol { symbol, row, col })?;
                cells.push_back(terrain);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// The standard 13x11 match layout.
    #[must_use]
    pub fn standard() -> Self {
        match Self::from_rows(&STANDARD_LAYOUT) {
            Ok(grid) => grid,
            Err(err) => unreachable!("standard layout is well-formed: {err}"),
        }
    }

    /// Return a copy with one cell's terrain replaced.
    pub fn with_terrain(mut self, cell: Cell, terrain: Terrain) -> Result<Self, GridError> {
        let index = self.index(cell)?;
        self.cells.set(index, terrain);
        Ok(self)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a cell lies on the board.
    #[inline]
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.height
            && (cell.col as usize) < self.width
    }

    /// Bounds-checked terrain lookup.
    pub fn terrain(&self, cell: Cell) -> Result<Terrain, GridError> {
        let index = self.index(cell)?;
        Ok(self.cells[index])
    }

    /// Check if a cell is on the board and is a wall.
    #[must_use]
    pub fn is_wall(&self, cell: Cell) -> bool {
        matches!(self.terrain(cell), Ok(Terrain::Wall))
    }

    /// All cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let width = self.width;
        (0..self.width * self.height).map(move |i| Cell::new((i / width) as i32, (i % width) as i32))
    }

    /// All cells paired with their terrain, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Terrain)> + '_ {
        self.cells().zip(self.cells.iter().copied())
    }

    /// On-board axis neighbours of a cell.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors().into_iter().filter(move |c| self.contains(*c))
    }

    /// Render the grid back to layout rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|r| {
                (0..self.width)
                    .map(|c| self.cells[r * self.width + c].symbol())
                    .collect()
            })
            .collect()
    }

    fn index(&self, cell: Cell) -> Result<usize, GridError> {
        if !self.contains(cell) {
            return Err(GridError::OutOfBounds {
                cell,
                width: self.width,
                height: self.height,
            });
        }
        Ok(cell.row as usize * self.width + cell.col as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(&[".X0", "1.2"]).unwrap();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.terrain(Cell::new(0, 1)), Ok(Terrain::Wall));
        assert_eq!(grid.terrain(Cell::new(0, 2)), Ok(Terrain::Box(None)));
        assert_eq!(grid.terrain(Cell::new(1, 0)), Ok(Terrain::Box(Some(ItemKind::ExtraRange))));
        assert_eq!(grid.terrain(Cell::new(1, 2)), Ok(Terrain::Box(Some(ItemKind::ExtraBomb))));
        assert_eq!(grid.to_rows(), vec![".X0".to_string(), "1.2".to_string()]);
    }

    #[test]
    fn test_layout_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(Grid::from_rows(&empty), Err(GridError::EmptyLayout));
        assert_eq!(
            Grid::from_rows(&["...", ".."]),
            Err(GridError::RaggedRow { row: 1, expected: 3, found: 2 })
        );
        assert_eq!(
            Grid::from_rows(&["..?"]),
            Err(GridError::UnknownSymbol { symbol: '?', row: 0, col: 2 })
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = Grid::new(3, 3);

        assert!(grid.contains(Cell::new(2, 2)));
        assert!(!grid.contains(Cell::new(3, 0)));
        assert!(!grid.contains(Cell::new(0, -1)));
        assert_eq!(
            grid.terrain(Cell::new(-1, 0)),
            Err(GridError::OutOfBounds { cell: Cell::new(-1, 0), width: 3, height: 3 })
        );
    }

    #[test]
    #[should_panic(expected = "Grid must have at least one cell")]
    fn test_zero_sized_grid_rejected() {
        let _ = Grid::new(0, 3);
    }

    #[test]
    fn test_cells_row_major() {
        let grid = Grid::new(2, 2);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
        );
    }

    #[test]
    fn test_neighbors_clipped_at_edges() {
        let grid = Grid::new(3, 3);
        let corner: Vec<_> = grid.neighbors(Cell::new(0, 0)).collect();
        assert_eq!(corner, vec![Cell::new(0, 1), Cell::new(1, 0)]);
        assert_eq!(grid.neighbors(Cell::new(1, 1)).count(), 4);
    }

    #[test]
    fn test_with_terrain_keeps_original() {
        let grid = Grid::new(3, 3);
        let walled = grid.clone().with_terrain(Cell::new(1, 1), Terrain::Wall).unwrap();

        assert!(walled.is_wall(Cell::new(1, 1)));
        assert!(!grid.is_wall(Cell::new(1, 1)));
        assert!(grid.clone().with_terrain(Cell::new(9, 9), Terrain::Wall).is_err());
    }

    #[test]
    fn test_standard_layout() {
        let grid = Grid::standard();
        assert_eq!(grid.width(), 13);
        assert_eq!(grid.height(), 11);
        for start in START_CELLS {
            assert_eq!(grid.terrain(start), Ok(Terrain::Open));
        }
    }
}
