//! Game state: the value the turn resolver consumes and produces.
//!
//! ## Layout
//!
//! - `grid`: static terrain (walls never change)
//! - `players`: one entry per roster slot, dead players included
//! - `bombs`, `boxes`, `items`: per-cell occupancy keyed by `Cell`
//!
//! ## Cloning
//!
//! Occupancy maps are `im::OrdMap` and the grid is backed by `im::Vector`,
//! so `clone()` is O(1) structural sharing. Search branches each hold their
//! own clone; mutating one never shows through another.
//!
//! Ordered maps also fix iteration order (row-major), which keeps every
//! resolve deterministic.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::config::RulesConfig;
use super::entity::{Bomb, Entity, ItemKind, Player};
use super::error::StateError;
use super::grid::{Grid, Terrain};
use super::player::{PlayerId, PlayerMap, MAX_PLAYERS};

/// Complete state of one match at the start of a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) grid: Grid,

    /// Resolved turns so far (0 before the first resolve).
    pub(crate) turn: u32,

    pub(crate) players: PlayerMap<Player>,

    /// Live bombs. Keyed by cell, so at most one bomb per cell.
    pub(crate) bombs: OrdMap<Cell, Bomb>,

    /// Boxes still standing, with the item each hides.
    pub(crate) boxes: OrdMap<Cell, Option<ItemKind>>,

    /// Face-up items on open floor.
    pub(crate) items: OrdMap<Cell, ItemKind>,
}

impl GameState {
    /// Create the opening state of a match.
    ///
    /// Player `i` starts on `starts[i]` with the configured inventory. Boxes
    /// are taken from the grid layout.
    pub fn new(grid: Grid, starts: &[Cell], config: &RulesConfig) -> Result<Self, StateError> {
        if starts.is_empty() || starts.len() > MAX_PLAYERS {
            return Err(StateError::PlayerCount(starts.len()));
        }

        let players = PlayerMap::new(starts.len(), |id| Player::new(id, starts[id.index()], config));
        let boxes = Self::boxes_of(&grid);
        let state = Self {
            grid,
            turn: 0,
            players,
            bombs: OrdMap::new(),
            boxes,
            items: OrdMap::new(),
        };

        for player in state.players.values() {
            state.check_start(player.id, player.cell)?;
        }
        Ok(state)
    }

    /// Rebuild a state from one turn's observed input.
    ///
    /// Roster slots with no player entity are treated as dead. Each
    /// player's `bombs_placed` is recounted from the bombs on the board.
    pub fn from_snapshot(snapshot: &Snapshot, config: &RulesConfig) -> Result<Self, StateError> {
        let count = snapshot.player_count;
        if count == 0 || count > MAX_PLAYERS {
            return Err(StateError::PlayerCount(count));
        }

        let grid = Grid::from_rows(&snapshot.rows)?;
        let boxes = Self::boxes_of(&grid);
        let mut players = PlayerMap::new(count, |id| {
            let mut ghost = Player::new(id, Cell::new(0, 0), config);
            ghost.alive = false;
            ghost
        });
        let mut bombs = OrdMap::new();
        let mut items = OrdMap::new();

        for entity in &snapshot.entities {
            let cell = entity.cell();
            grid.terrain(cell)?;
            match entity {
                Entity::Player(player) => {
                    if !players.contains(player.id) {
                        return Err(StateError::UnknownPlayer(player.id));
                    }
                    let id = player.id;
                    let mut player = player.clone();
                    player.bombs_placed = 0;
                    players[id] = player;
                }
                Entity::Bomb(bomb) => {
                    if !players.contains(bomb.owner) {
                        return Err(StateError::UnknownPlayer(bomb.owner));
                    }
                    if bombs.insert(cell, *bomb).is_some() {
                        return Err(StateError::DuplicateBomb(cell));
                    }
                }
                Entity::Item { kind, .. } => {
                    items.insert(cell, *kind);
                }
            }
        }

        for bomb in bombs.values() {
            let owner = &mut players[bomb.owner];
            owner.bombs_placed = owner.bombs_placed.saturating_add(1);
        }

        let state = Self {
            grid,
            turn: snapshot.turn,
            players,
            bombs,
            boxes,
            items,
        };
        for player in state.players.values().filter(|p| p.alive) {
            state.check_start(player.id, player.cell)?;
        }
        Ok(state)
    }

    /// Describe this state as one turn's observed input.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let width = self.grid.width();
        let mut rows = vec![String::with_capacity(width); self.grid.height()];
        for (cell, terrain) in self.grid.iter() {
            let terrain = match terrain {
                Terrain::Box(_) => self.boxes.get(&cell).map_or(Terrain::Open, |&item| Terrain::Box(item)),
                other => other,
            };
            rows[cell.row as usize].push(terrain.symbol());
        }

        let entities = self
            .players
            .values()
            .filter(|p| p.alive)
            .cloned()
            .map(Entity::Player)
            .chain(self.bombs.values().copied().map(Entity::Bomb))
            .chain(self.items.iter().map(|(&cell, &kind)| Entity::Item { cell, kind }))
            .collect();

        Snapshot {
            rows,
            entities,
            turn: self.turn,
            player_count: self.players.player_count(),
        }
    }

    fn boxes_of(grid: &Grid) -> OrdMap<Cell, Option<ItemKind>> {
        grid.iter()
            .filter_map(|(cell, terrain)| match terrain {
                Terrain::Box(item) => Some((cell, item)),
                _ => None,
            })
            .collect()
    }

    fn check_start(&self, player: PlayerId, cell: Cell) -> Result<(), StateError> {
        if self.grid.terrain(cell)? == Terrain::Wall || self.has_box(cell) {
            return Err(StateError::BlockedStart { player, cell });
        }
        Ok(())
    }

    // === Queries ===

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// Living players in id order.
    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.values().filter(|p| p.alive)
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    /// Live bombs, row-major.
    pub fn bombs(&self) -> impl Iterator<Item = &Bomb> {
        self.bombs.values()
    }

    #[must_use]
    pub fn bomb_at(&self, cell: Cell) -> Option<&Bomb> {
        self.bombs.get(&cell)
    }

    #[must_use]
    pub fn has_box(&self, cell: Cell) -> bool {
        self.boxes.contains_key(&cell)
    }

    /// Standing boxes with their hidden item, row-major.
    pub fn boxes(&self) -> impl Iterator<Item = (Cell, Option<ItemKind>)> + '_ {
        self.boxes.iter().map(|(&c, &i)| (c, i))
    }

    #[must_use]
    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    #[must_use]
    pub fn item_at(&self, cell: Cell) -> Option<ItemKind> {
        self.items.get(&cell).copied()
    }

    /// Face-up items, row-major.
    pub fn items(&self) -> impl Iterator<Item = (Cell, ItemKind)> + '_ {
        self.items.iter().map(|(&c, &k)| (c, k))
    }

    /// True if a player could step onto `cell` this turn: on the board,
    /// not a wall, no box, no bomb.
    #[must_use]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.grid.contains(cell)
            && !self.grid.is_wall(cell)
            && !self.has_box(cell)
            && !self.bombs.contains_key(&cell)
    }
}

/// One turn's observed input: current layout rows plus visible entities.
///
/// Layout rows use the `Grid` legend; boxes already destroyed appear as
/// open floor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: Vec<String>,
    pub entities: Vec<Entity>,
    pub turn: u32,
    pub player_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_state() -> GameState {
        GameState::new(
            Grid::new(5, 5),
            &[Cell::new(0, 0), Cell::new(4, 4)],
            &RulesConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_state() {
        let state = open_state();

        assert_eq!(state.player_count(), 2);
        assert_eq!(state.turn(), 0);
        assert_eq!(state.alive_count(), 2);
        assert_eq!(state.player(PlayerId::new(1)).cell, Cell::new(4, 4));
        assert_eq!(state.bombs().count(), 0);
    }

    #[test]
    fn test_boxes_copied_from_grid() {
        let grid = Grid::from_rows(&["..1", ".X.", "0.."]).unwrap();
        let state = GameState::new(grid, &[Cell::new(0, 0)], &RulesConfig::default()).unwrap();

        assert_eq!(state.box_count(), 2);
        assert!(state.has_box(Cell::new(2, 0)));
        assert_eq!(
            state.boxes().collect::<Vec<_>>(),
            vec![(Cell::new(0, 2), Some(ItemKind::ExtraRange)), (Cell::new(2, 0), None)]
        );
        assert!(!state.is_walkable(Cell::new(1, 1)));
        assert!(!state.is_walkable(Cell::new(0, 2)));
        assert!(!state.is_walkable(Cell::new(-1, 0)));
        assert!(state.is_walkable(Cell::new(0, 1)));
    }

    #[test]
    fn test_blocked_start_rejected() {
        let grid = Grid::from_rows(&["0..", "..."]).unwrap();
        let err = GameState::new(grid, &[Cell::new(0, 0)], &RulesConfig::default()).unwrap_err();
        assert_eq!(
            err,
            StateError::BlockedStart { player: PlayerId::new(0), cell: Cell::new(0, 0) }
        );
    }

    #[test]
    fn test_player_count_rejected() {
        let err = GameState::new(Grid::new(3, 3), &[], &RulesConfig::default()).unwrap_err();
        assert_eq!(err, StateError::PlayerCount(0));
    }

    #[test]
    fn test_clone_is_independent() {
        let state = open_state();
        let mut branch = state.clone();

        branch.players[PlayerId::new(0)].cell = Cell::new(1, 0);
        branch.bombs.insert(Cell::new(2, 2), Bomb::new(PlayerId::new(0), Cell::new(2, 2), 8, 2));

        assert_eq!(state.player(PlayerId::new(0)).cell, Cell::new(0, 0));
        assert!(state.bomb_at(Cell::new(2, 2)).is_none());
        assert_ne!(state, branch);
    }

    #[test]
    fn test_from_snapshot() {
        let config = RulesConfig::default();
        let mut player = Player::new(PlayerId::new(1), Cell::new(1, 2), &config);
        player.bombs_placed = 5;
        let snapshot = Snapshot {
            rows: vec!["...".into(), "...".into()],
            entities: vec![
                Entity::Player(player),
                Entity::Bomb(Bomb::new(PlayerId::new(1), Cell::new(0, 2), 3, 2)),
                Entity::Item { cell: Cell::new(0, 0), kind: ItemKind::ExtraBomb },
            ],
            turn: 7,
            player_count: 2,
        };

        let state = GameState::from_snapshot(&snapshot, &config).unwrap();

        assert_eq!(state.turn(), 7);
        assert!(!state.player(PlayerId::new(0)).alive);
        assert_eq!(state.player(PlayerId::new(1)).bombs_placed, 1);
        assert_eq!(state.item_at(Cell::new(0, 0)), Some(ItemKind::ExtraBomb));
        assert_eq!(state.bomb_at(Cell::new(0, 2)).map(|b| b.countdown), Some(3));
    }

    #[test]
    fn test_snapshot_rejects_duplicate_bomb() {
        let bomb = Bomb::new(PlayerId::new(0), Cell::new(0, 1), 3, 2);
        let snapshot = Snapshot {
            rows: vec!["...".into()],
            entities: vec![Entity::Bomb(bomb), Entity::Bomb(bomb)],
            turn: 0,
            player_count: 1,
        };

        let err = GameState::from_snapshot(&snapshot, &RulesConfig::default()).unwrap_err();
        assert_eq!(err, StateError::DuplicateBomb(Cell::new(0, 1)));
    }

    #[test]
    fn test_snapshot_rejects_out_of_bounds_entity() {
        let snapshot = Snapshot {
            rows: vec!["...".into()],
            entities: vec![Entity::Item { cell: Cell::new(3, 0), kind: ItemKind::ExtraRange }],
            turn: 0,
            player_count: 1,
        };

        let err = GameState::from_snapshot(&snapshot, &RulesConfig::default()).unwrap_err();
        assert!(matches!(err, StateError::Grid(_)));
    }

    #[test]
    fn test_snapshot_reflects_destroyed_boxes() {
        let grid = Grid::from_rows(&[".0", "0."]).unwrap();
        let mut state = GameState::new(grid, &[Cell::new(0, 0)], &RulesConfig::default()).unwrap();
        state.boxes.remove(&Cell::new(0, 1));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.rows, vec!["..".to_string(), "0.".to_string()]);

        let rebuilt = GameState::from_snapshot(&snapshot, &RulesConfig::default()).unwrap();
        assert_eq!(rebuilt.box_count(), 1);
        assert_eq!(rebuilt.player(PlayerId::new(0)), state.player(PlayerId::new(0)));
    }
}
