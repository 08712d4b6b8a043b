//! Error taxonomy.
//!
//! Only construction-time problems are errors. Malformed actions are
//! degraded to "stay" by the resolver and search timeouts fall back to a
//! legal action, so neither appears here.

use super::cell::Cell;
use super::player::PlayerId;

/// Errors raised by grid construction and bounds-checked queries.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A query named a cell outside the board.
    #[error("cell {cell} is outside the {width}x{height} grid")]
    OutOfBounds { cell: Cell, width: usize, height: usize },

    /// Layout with no rows or no columns.
    #[error("layout is empty")]
    EmptyLayout,

    /// A layout row whose length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    /// A layout symbol outside the legend.
    #[error("unknown terrain symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
}

/// Errors raised when building a `GameState`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Two bombs recorded on the same cell.
    #[error("more than one bomb on cell {0}")]
    DuplicateBomb(Cell),

    /// A player placed on a wall or a box.
    #[error("{player} starts on blocked cell {cell}")]
    BlockedStart { player: PlayerId, cell: Cell },

    /// An entity refers to a player id not present in the roster.
    #[error("unknown {0}")]
    UnknownPlayer(PlayerId),

    /// Roster size outside the supported range.
    #[error("unsupported player count {0}")]
    PlayerCount(usize),
}

/// Errors raised when parsing the textual `MOVE x y` / `BOMB x y` form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    #[error("empty action")]
    Empty,

    #[error("unknown command {0:?}, expected MOVE or BOMB")]
    UnknownCommand(String),

    #[error("missing coordinate")]
    MissingCoordinate,

    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),
}
