//! Arena-backed search tree.
//!
//! Nodes live in one `Vec` and refer to each other by `NodeId`. The root is
//! always slot 0. The tree is cleared for every decision; nothing carries
//! over between turns.

use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId};
use crate::core::Action;

/// Upper bound on the arena's initial allocation.
const PREALLOCATE: usize = 4096;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    nodes: Vec<MCTSNode>,
    player_count: usize,
}

impl MCTSTree {
    /// A tree holding only a root, with room for up to `capacity` nodes
    /// before reallocating.
    #[must_use]
    pub fn with_capacity(player_count: usize, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.clamp(1, PREALLOCATE));
        nodes.push(MCTSNode::root());
        Self { nodes, player_count }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.index()]
    }

    /// Hang a fresh node under edge `edge_idx` of `parent`.
    pub fn add_child(&mut self, parent: NodeId, edge_idx: usize) -> NodeId {
        let depth = self.get(parent).depth.saturating_add(1);
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(MCTSNode::new(parent, depth));
        self.get_mut(parent).edges[edge_idx].child = id;
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Drop every node but a fresh root.
    pub fn reset(&mut self, player_count: usize) {
        self.nodes.clear();
        self.nodes.push(MCTSNode::root());
        self.player_count = player_count;
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        self.get(self.root())
    }

    /// The line the search currently believes in: most visited edge at
    /// every level, down to the first unexpanded one.
    #[must_use]
    pub fn principal_variation(&self) -> Vec<Action> {
        let mut line = Vec::new();
        let mut node = self.root_node();
        while let Some(edge) = node.most_visited().filter(|e| e.visits > 0) {
            line.push(edge.action);
            if !edge.is_expanded() {
                break;
            }
            node = self.get(edge.child);
        }
        line
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            node_count: self.nodes.len(),
            ..TreeStats::default()
        };
        for node in &self.nodes {
            stats.max_depth = stats.max_depth.max(node.depth);
            stats.terminal_count += usize::from(node.is_terminal());
            stats.total_edges += node.edges.len();
            stats.expanded_edges += node.edges.iter().filter(|e| e.is_expanded()).count();
        }
        stats
    }
}

/// Shape of a search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub terminal_count: usize,
    pub total_edges: usize,
    pub expanded_edges: usize,
}

impl TreeStats {
    /// Average edges per node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.node_count == 0 {
            0.0
        } else {
            self.total_edges as f64 / self.node_count as f64
        }
    }
}
