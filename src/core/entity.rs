//! Entity kinds: players, bombs and items.
//!
//! The set of kinds is fixed, so snapshots carry them as the closed
//! `Entity` enum rather than behind a trait.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::config::RulesConfig;
use super::player::PlayerId;

/// Power-up kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    /// +1 blast range.
    ExtraRange,
    /// +1 bomb capacity.
    ExtraBomb,
}

/// A player and its bomb inventory.
///
/// `capacity` and `range` only ever grow (item pickups). `bombs_placed`
/// counts this player's bombs still on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub cell: Cell,
    pub alive: bool,
    /// Maximum concurrently live bombs.
    pub capacity: u8,
    /// Blast reach beyond the bomb cell, per direction.
    pub range: u8,
    pub bombs_placed: u8,
    /// Boxes destroyed by this player's bombs (tie-break score).
    pub boxes_destroyed: u32,
    /// Turn number of the resolve that killed this player.
    pub eliminated_on: Option<u32>,
}

impl Player {
    /// Create a living player with the configured starting inventory.
    #[must_use]
    pub fn new(id: PlayerId, cell: Cell, config: &RulesConfig) -> Self {
        Self {
            id,
            cell,
            alive: true,
            capacity: config.initial_capacity,
            range: config.initial_range,
            bombs_placed: 0,
            boxes_destroyed: 0,
            eliminated_on: None,
        }
    }

    /// Bombs this player may still place.
    #[must_use]
    pub fn bombs_left(&self) -> u8 {
        self.capacity.saturating_sub(self.bombs_placed)
    }

    /// Alive and under capacity.
    #[must_use]
    pub fn can_place_bomb(&self) -> bool {
        self.alive && self.bombs_left() > 0
    }

    pub(crate) fn collect(&mut self, item: ItemKind) {
        match item {
            ItemKind::ExtraBomb => self.capacity = self.capacity.saturating_add(1),
            ItemKind::ExtraRange => self.range = self.range.saturating_add(1),
        }
    }
}

/// A live bomb.
///
/// `range` is captured from the owner at placement; later upgrades do not
/// affect bombs already on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bomb {
    pub owner: PlayerId,
    pub cell: Cell,
    /// Resolves remaining until the bomb explodes on its own.
    pub countdown: u8,
    pub range: u8,
}

impl Bomb {
    #[must_use]
    pub fn new(owner: PlayerId, cell: Cell, countdown: u8, range: u8) -> Self {
        Self {
            owner,
            cell,
            countdown,
            range,
        }
    }
}

/// One observed entity of a turn snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    Player(Player),
    Bomb(Bomb),
    Item { cell: Cell, kind: ItemKind },
}

impl Entity {
    /// The cell this entity occupies.
    #[must_use]
    pub fn cell(&self) -> Cell {
        match self {
            Entity::Player(p) => p.cell,
            Entity::Bomb(b) => b.cell,
            Entity::Item { cell, .. } => *cell,
        }
    }
}
