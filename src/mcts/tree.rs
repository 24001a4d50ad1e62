//! Arena holding the search tree of one decision.
//!
//! Nodes live in a flat `Vec` and point at each other by [`NodeId`]. The
//! arena owns every node; parent links are plain indices, so there is no
//! ownership cycle and dropping the arena frees the whole tree.

use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId};
use crate::board::Move;
use crate::core::Player;

/// Search tree rooted at the position being decided.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    nodes: Vec<MCTSNode>,
}

impl MCTSTree {
    /// A tree holding only a root with `to_move` to play.
    #[must_use]
    pub fn new(to_move: Player) -> Self {
        Self::with_capacity(to_move, 0)
    }

    /// Like [`MCTSTree::new`], reserving room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(to_move: Player, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MCTSNode::root(to_move));
        Self { nodes }
    }

    /// The root is always the first arena slot.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    #[inline]
    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        &self.nodes[0]
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Append the child reached by playing `mv` at `parent`.
    ///
    /// The child has the other player to move and sits one level deeper.
    pub fn add_child(&mut self, parent: NodeId, mv: Move) -> NodeId {
        let (to_move, depth) = {
            let p = self.get(parent);
            (p.to_move.opponent(), p.depth + 1)
        };
        let child = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(MCTSNode::new(parent, mv, to_move, depth));
        self.get_mut(parent).children.push(child);
        child
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the root always exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth of the deepest node.
    #[must_use]
    pub fn max_depth(&self) -> u16 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Free every node and start over from a fresh root.
    ///
    /// The old arena is released in one go.
    pub fn reset(&mut self, to_move: Player) {
        self.nodes = vec![MCTSNode::root(to_move)];
    }

    /// Make room for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Nodes the arena can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }
}
