//! Per-player intents for one turn.
//!
//! An action is a target cell plus a flag asking to drop a bomb on the
//! player's current cell before moving. Legal targets are the player's own
//! cell or one of its four neighbours; anything else is degraded to "stay"
//! by the resolver rather than rejected.
//!
//! ## Text form
//!
//! Actions print and parse as `MOVE x y` / `BOMB x y`, where `x` is the
//! column and `y` the row. Tokens after the coordinates are a free-form
//! message and are ignored.
//!
//! ```
//! use hypersonic::core::{Action, Cell};
//!
//! let action: Action = "BOMB 4 1 hello".parse().unwrap();
//! assert_eq!(action, Action::bomb_and_move(Cell::new(1, 4)));
//! assert_eq!(action.to_string(), "BOMB 4 1");
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::cell::Cell;
use super::error::ActionParseError;
use super::player::{PlayerId, PlayerMap};

/// One player's intent for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Cell to end the turn on.
    pub target: Cell,

    /// Drop a bomb on the current cell before moving.
    pub place_bomb: bool,
}

impl Action {
    /// Move to `target` without placing a bomb.
    #[must_use]
    pub const fn move_to(target: Cell) -> Self {
        Self {
            target,
            place_bomb: false,
        }
    }

    /// Stay on `cell`. Same as `move_to` with the player's own cell.
    #[must_use]
    pub const fn stay(cell: Cell) -> Self {
        Self::move_to(cell)
    }

    /// Place a bomb on the current cell, then move to `target`.
    #[must_use]
    pub const fn bomb_and_move(target: Cell) -> Self {
        Self {
            target,
            place_bomb: true,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let command = if self.place_bomb { "BOMB" } else { "MOVE" };
        write!(f, "{} {} {}", command, self.target.col, self.target.row)
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let command = tokens.next().ok_or(ActionParseError::Empty)?;
        let place_bomb = match command.to_ascii_uppercase().as_str() {
            "MOVE" => false,
            "BOMB" => true,
            _ => return Err(ActionParseError::UnknownCommand(command.to_string())),
        };

        let mut coordinate = || -> Result<i32, ActionParseError> {
            let token = tokens.next().ok_or(ActionParseError::MissingCoordinate)?;
            token
                .parse()
                .map_err(|_| ActionParseError::InvalidCoordinate(token.to_string()))
        };
        let x = coordinate()?;
        let y = coordinate()?;

        Ok(Self {
            target: Cell::new(y, x),
            place_bomb,
        })
    }
}

/// The actions submitted for one turn, one slot per player.
///
/// A `None` slot means "stay". Slots of dead players are ignored.
pub type TurnActions = PlayerMap<Option<Action>>;

/// A resolved action with metadata for match history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who submitted the action.
    pub player: PlayerId,

    /// The action as submitted (before degradation).
    pub action: Action,

    /// Turn number the action was resolved in.
    pub turn: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32) -> Self {
        Self { player, action, turn }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let c = Cell::new(1, 2);

        assert!(!Action::move_to(c).place_bomb);
        assert_eq!(Action::stay(c), Action::move_to(c));
        assert!(Action::bomb_and_move(c).place_bomb);
    }

    #[test]
    fn test_display_uses_column_then_row() {
        assert_eq!(Action::move_to(Cell::new(3, 7)).to_string(), "MOVE 7 3");
        assert_eq!(Action::bomb_and_move(Cell::new(0, 1)).to_string(), "BOMB 1 0");
    }

    #[test]
    fn test_parse() {
        assert_eq!("MOVE 7 3".parse::<Action>(), Ok(Action::move_to(Cell::new(3, 7))));
        assert_eq!("bomb 0 0".parse::<Action>(), Ok(Action::bomb_and_move(Cell::new(0, 0))));
        assert_eq!(
            "MOVE -5 0 off we go".parse::<Action>(),
            Ok(Action::move_to(Cell::new(0, -5)))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Action>(), Err(ActionParseError::Empty));
        assert_eq!(
            "SLEEP 0 0".parse::<Action>(),
            Err(ActionParseError::UnknownCommand("SLEEP".to_string()))
        );
        assert_eq!("MOVE 1".parse::<Action>(), Err(ActionParseError::MissingCoordinate));
        assert_eq!(
            "MOVE 0, 0".parse::<Action>(),
            Err(ActionParseError::InvalidCoordinate("0,".to_string()))
        );
    }

    #[test]
    fn test_action_record_serialization() {
        let record = ActionRecord::new(PlayerId::new(1), Action::bomb_and_move(Cell::new(2, 2)), 3);

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
