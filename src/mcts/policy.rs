//! Child selection policy.
//!
//! Selection is trait-based so the UCT formula can be swapped without
//! touching the search loop.

use super::node::NodeId;
use super::tree::MCTSTree;
use crate::core::fixed::{fixed_div, fixed_log, fixed_mul, fixed_sqrt};
use crate::core::Fixed;

/// Policy for selecting which child node to descend into.
pub trait SelectionPolicy: Send + Sync {
    /// Pick a child of `node`, or `None` if no candidate qualifies.
    fn select(&self, tree: &MCTSTree, node: NodeId, exploration: Fixed) -> Option<NodeId>;
}

/// UCT in Q16.16.
///
/// Formula: score/visits + C * sqrt(ln(N) / visits). Unvisited children
/// score [`Fixed::MAX`]; ties go to the earliest child.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uct;

/// UCT score of a child with `visits` visits and summed `score` under a
/// parent visited `parent_visits` times.
#[must_use]
pub fn uct_score(parent_visits: u32, visits: u32, score: Fixed, exploration: Fixed) -> Fixed {
    if visits == 0 {
        return Fixed::MAX;
    }
    let n = Fixed::from_int(u64::from(visits));
    let mean = fixed_div(score, n);
    let ln_parent = fixed_log(Fixed::from_int(u64::from(parent_visits)));
    let explore = fixed_mul(exploration, fixed_sqrt(fixed_div(ln_parent, n)));
    mean + explore
}

impl SelectionPolicy for Uct {
    fn select(&self, tree: &MCTSTree, node: NodeId, exploration: Fixed) -> Option<NodeId> {
        let parent = tree.get(node);
        let mut best: Option<(NodeId, Fixed)> = None;

        for &child_id in &parent.children {
            let child = tree.get(child_id);
            let score = uct_score(parent.visits, child.visits, child.score, exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }

        best.map(|(id, _)| id)
    }
}
