//! MCTS node structures.
//!
//! Uses arena-based allocation with index references (NodeId); a child
//! knows its parent by index only, the arena owns every node.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Move;
use crate::core::fixed::fixed_div;
use crate::core::{Fixed, Player};

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the MCTS tree.
///
/// `score` accumulates results from the perspective of the player whose
/// move led here, i.e. the opponent of `to_move`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    /// Move that led here (NONE for root).
    pub mv: Move,

    /// Player to move at this node.
    pub to_move: Player,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Depth in tree (root = 0).
    pub depth: u16,

    /// Total visits to this node.
    pub visits: u32,

    /// Sum of backpropagated scores.
    pub score: Fixed,

    /// One child per legal move, in move order.
    /// SmallVec keeps boards up to 4x4 inline.
    pub children: SmallVec<[NodeId; 16]>,
}

impl MCTSNode {
    /// Create a new node.
    #[must_use]
    pub fn new(parent: NodeId, mv: Move, to_move: Player, depth: u16) -> Self {
        Self {
            mv,
            to_move,
            parent,
            depth,
            visits: 0,
            score: Fixed::ZERO,
            children: SmallVec::new(),
        }
    }

    /// Create a root node.
    #[must_use]
    pub fn root(to_move: Player) -> Self {
        Self::new(NodeId::NONE, Move::NONE, to_move, 0)
    }

    /// Whether children have been generated.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Average score, zero before the first visit.
    #[must_use]
    pub fn mean_score(&self) -> Fixed {
        if self.visits == 0 {
            Fixed::ZERO
        } else {
            fixed_div(self.score, Fixed::from_int(u64::from(self.visits)))
        }
    }
}
