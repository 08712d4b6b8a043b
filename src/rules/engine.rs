//! Turn resolver: the authoritative state transition.
//!
//! `resolve` runs the phases of one turn in a fixed order:
//!
//! 1. Validate: targets that are not the actor's cell or a walkable
//!    neighbour degrade to "stay" (the bomb flag survives).
//! 2. Place bombs in ascending player id order, on pre-move cells.
//! 3. Move every living player to its validated target at once.
//! 4. Pick up items on post-move cells.
//! 5. Tick every bomb, including ones placed this turn.
//! 6. Detonate countdown-zero bombs and their chain to a fixed point;
//!    owners get their capacity back.
//! 7. Destroy covered boxes (revealing items), kill covered players.
//! 8. Advance the turn counter.
//!
//! The input state is never touched: the resolver clones it (O(1)) and
//! works on the clone.

use smallvec::SmallVec;

use super::blast;
use crate::core::{
    Action, Bomb, Cell, GameState, Grid, Player, PlayerId, RulesConfig, StateError, TurnActions,
    START_CELLS,
};

/// Result of a completed match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Nobody won: every player died, possibly in the same blast.
    Draw,
    /// Several survivors tied on destroyed boxes at the turn limit.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// Legal actions of one player. Five targets, each with and without a bomb.
pub type ActionList = SmallVec<[Action; 10]>;

/// Rules seen by the decision engine.
///
/// Search only needs these four operations; `TurnResolver` is the
/// implementation every match uses.
pub trait RulesEngine {
    fn config(&self) -> &RulesConfig;

    /// Actions `player` may submit. Empty for dead players.
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> ActionList;

    /// Produce the next state. Must be deterministic and must not modify
    /// `state`.
    fn resolve(&self, state: &GameState, actions: &TurnActions) -> GameState;

    /// `Some(result)` once the match is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;
}

/// The Hypersonic rule set.
#[derive(Clone, Debug, Default)]
pub struct TurnResolver {
    config: RulesConfig,
}

impl TurnResolver {
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    /// Opening state on `grid` with player `i` on `starts[i]`.
    pub fn new_game(&self, grid: Grid, starts: &[Cell]) -> Result<GameState, StateError> {
        GameState::new(grid, starts, &self.config)
    }

    /// Opening state on the standard layout with corner starts.
    pub fn standard_game(&self, player_count: usize) -> Result<GameState, StateError> {
        let starts = START_CELLS
            .get(..player_count)
            .ok_or(StateError::PlayerCount(player_count))?;
        self.new_game(Grid::standard(), starts)
    }

    /// Degrade an illegal target to "stay".
    ///
    /// A target is legal if it is the player's own cell, or an on-board
    /// neighbour holding no wall, box or bomb. The bomb flag is kept; phase
    /// 2 decides whether the bomb is actually placed.
    #[must_use]
    pub fn validate(&self, state: &GameState, player: &Player, action: Action) -> Action {
        let target = action.target;
        if target == player.cell || (player.cell.is_adjacent(target) && state.is_walkable(target)) {
            return action;
        }

        tracing::debug!(player = %player.id, %action, "illegal target, staying");
        Action {
            target: player.cell,
            place_bomb: action.place_bomb,
        }
    }

    /// Final standings, best first.
    ///
    /// Survivors lead, ordered by destroyed boxes (most first) then id.
    /// Eliminated players follow, latest elimination first, with the same
    /// tie-breaks.
    #[must_use]
    pub fn ranking(&self, state: &GameState) -> Vec<PlayerId> {
        let mut players: Vec<&Player> = state.players().values().collect();
        players.sort_by(|a, b| {
            b.alive
                .cmp(&a.alive)
                .then_with(|| b.eliminated_on.cmp(&a.eliminated_on))
                .then_with(|| b.boxes_destroyed.cmp(&a.boxes_destroyed))
                .then_with(|| a.id.cmp(&b.id))
        });
        players.into_iter().map(|p| p.id).collect()
    }

    fn place_bombs(&self, next: &mut GameState, intents: &[(PlayerId, Action)]) {
        for &(id, action) in intents {
            if !action.place_bomb {
                continue;
            }
            let player = &next.players[id];
            let cell = player.cell;
            if next.bombs.contains_key(&cell) || !player.can_place_bomb() {
                tracing::debug!(player = %id, %cell, "bomb not placed");
                continue;
            }

            let bomb = Bomb::new(id, cell, self.config.fuse_length, player.range);
            next.bombs.insert(cell, bomb);
            let player = &mut next.players[id];
            player.bombs_placed = player.bombs_placed.saturating_add(1);
            tracing::debug!(player = %id, %cell, range = bomb.range, "bomb placed");
        }
    }

    fn pick_up_items(next: &mut GameState) {
        let mut taken: SmallVec<[Cell; 4]> = SmallVec::new();
        for player in next.players.iter_mut().map(|(_, p)| p).filter(|p| p.alive) {
            if let Some(kind) = next.items.get(&player.cell) {
                player.collect(*kind);
                taken.push(player.cell);
            }
        }
        for cell in taken {
            next.items.remove(&cell);
        }
    }

    fn explode(next: &mut GameState) {
        next.bombs = std::mem::take(&mut next.bombs)
            .into_iter()
            .map(|(cell, mut bomb)| {
                bomb.countdown = bomb.countdown.saturating_sub(1);
                (cell, bomb)
            })
            .collect();

        let due: Vec<Cell> = next
            .bombs
            .values()
            .filter(|b| b.countdown == 0)
            .map(|b| b.cell)
            .collect();
        if due.is_empty() {
            return;
        }

        let detonation = blast::detonate(next, due);

        for cell in &detonation.bombs {
            if let Some(bomb) = next.bombs.remove(cell) {
                let owner = &mut next.players[bomb.owner];
                debug_assert!(owner.bombs_placed > 0, "bomb without placement");
                owner.bombs_placed = owner.bombs_placed.saturating_sub(1);
                tracing::debug!(owner = %bomb.owner, %cell, "bomb exploded");
            }
        }

        for (cell, owners) in &detonation.covered {
            if let Some(hidden) = next.boxes.remove(cell) {
                if let Some(kind) = hidden {
                    next.items.insert(*cell, kind);
                }
                for owner in owners {
                    next.players[*owner].boxes_destroyed += 1;
                }
            }
        }

        let resolved_turn = next.turn + 1;
        for (id, player) in next.players.iter_mut() {
            if player.alive && detonation.covers(player.cell) {
                player.alive = false;
                player.eliminated_on = Some(resolved_turn);
                tracing::debug!(player = %id, cell = %player.cell, turn = resolved_turn, "player eliminated");
            }
        }
    }
}

impl RulesEngine for TurnResolver {
    fn config(&self) -> &RulesConfig {
        &self.config
    }

    fn legal_actions(&self, state: &GameState, player: PlayerId) -> ActionList {
        let mut actions = ActionList::new();
        let player = state.player(player);
        if !player.alive {
            return actions;
        }

        let bomb_ok = player.can_place_bomb() && state.bomb_at(player.cell).is_none();
        let targets = std::iter::once(player.cell)
            .chain(player.cell.neighbors().into_iter().filter(|c| state.is_walkable(*c)));
        for target in targets {
            actions.push(Action::move_to(target));
            if bomb_ok {
                actions.push(Action::bomb_and_move(target));
            }
        }
        actions
    }

    fn resolve(&self, state: &GameState, actions: &TurnActions) -> GameState {
        let mut next = state.clone();

        let intents: SmallVec<[(PlayerId, Action); 4]> = state
            .players()
            .values()
            .filter_map(|player| {
                let submitted = actions
                    .contains(player.id)
                    .then(|| actions[player.id])
                    .flatten();
                if !player.alive {
                    if let Some(action) = submitted {
                        tracing::debug!(player = %player.id, %action, "action from dead player ignored");
                    }
                    return None;
                }
                let action = submitted.unwrap_or(Action::stay(player.cell));
                Some((player.id, self.validate(state, player, action)))
            })
            .collect();

        self.place_bombs(&mut next, &intents);

        for &(id, action) in &intents {
            next.players[id].cell = action.target;
        }

        Self::pick_up_items(&mut next);
        Self::explode(&mut next);

        next.turn += 1;
        next
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        let survivors: Vec<&Player> = state.alive_players().collect();
        let last_standing = if state.player_count() > 1 { 1 } else { 0 };

        if survivors.len() > last_standing && state.turn() < self.config.max_turns {
            return None;
        }

        match survivors.as_slice() {
            [] => Some(GameResult::Draw),
            [only] => Some(GameResult::Winner(only.id)),
            _ => {
                let best = survivors.iter().map(|p| p.boxes_destroyed).max().unwrap_or(0);
                let winners: Vec<PlayerId> = survivors
                    .iter()
                    .filter(|p| p.boxes_destroyed == best)
                    .map(|p| p.id)
                    .collect();
                match winners.as_slice() {
                    [only] => Some(GameResult::Winner(*only)),
                    _ => Some(GameResult::Winners(winners)),
                }
            }
        }
    }
}
