//! Nodes and edges of the search tree.
//!
//! A node stands for "the controlled player is about to act"; its edges are
//! that player's legal actions. Nodes hold statistics only, no game state:
//! each iteration replays the path from the root with freshly sampled
//! opponent actions, so the state behind a node varies between visits.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Action, PlayerId, PlayerMap};
use crate::rules::ActionList;

/// Index into the `MCTSTree` arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// No node: the root's parent, or an edge not expanded yet.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            f.write_str("node -")
        } else {
            write!(f, "node {}", self.0)
        }
    }
}

/// One candidate action of the controlled player, with the rewards seen
/// behind it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub action: Action,
    pub child: NodeId,
    pub visits: u32,
    /// Summed rewards of every player over all visits.
    pub total_reward: PlayerMap<f64>,
}

impl Edge {
    #[must_use]
    pub fn new(action: Action, player_count: usize) -> Self {
        Self {
            action,
            child: NodeId::NONE,
            visits: 0,
            total_reward: PlayerMap::with_value(player_count, 0.0),
        }
    }

    /// Average reward of `player` through this edge, 0 if unvisited.
    #[must_use]
    pub fn mean_reward(&self, player: PlayerId) -> f64 {
        match self.visits {
            0 => 0.0,
            n => self.total_reward[player] / f64::from(n),
        }
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.child.is_none()
    }

    /// Fold one backed-up reward vector into the totals.
    pub fn record(&mut self, rewards: &PlayerMap<f64>) {
        self.visits += 1;
        for (player, reward) in rewards.iter() {
            self.total_reward[player] += reward;
        }
    }
}

/// A decision point of the controlled player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    pub parent: NodeId,
    /// Turns below the root.
    pub depth: u16,
    pub visits: u32,
    /// Set when no decision follows: the match is over or the controlled
    /// player is dead. Holds the rewards to back up on every visit.
    pub terminal: Option<PlayerMap<f64>>,
    pub edges: SmallVec<[Edge; 10]>,
}

impl MCTSNode {
    #[must_use]
    pub fn new(parent: NodeId, depth: u16) -> Self {
        Self {
            parent,
            depth,
            visits: 0,
            terminal: None,
            edges: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn root() -> Self {
        Self::new(NodeId::NONE, 0)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Give the node one unexpanded edge per action.
    pub fn open(&mut self, actions: ActionList, player_count: usize) {
        self.edges = actions.into_iter().map(|a| Edge::new(a, player_count)).collect();
    }

    #[must_use]
    pub fn has_unexpanded(&self) -> bool {
        self.edges.iter().any(|e| !e.is_expanded())
    }

    /// Indices of edges without a child yet.
    pub fn unexpanded_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_expanded())
            .map(|(i, _)| i)
    }

    /// Most visited edge. Ties go to the earliest edge.
    #[must_use]
    pub fn most_visited(&self) -> Option<&Edge> {
        self.edges
            .iter()
            .reduce(|best, e| if e.visits > best.visits { e } else { best })
    }
}
