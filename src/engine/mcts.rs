//! MCTS-backed decision engine.

use crate::board::{Board, Move};
use crate::core::{GameRng, Player};
use crate::mcts::{MCTSConfig, MCTSSearch, SearchStats};

use super::DecisionEngine;

/// Runs a fresh fixed-budget search for every decision.
pub struct MctsEngine {
    search: MCTSSearch<GameRng>,
}

impl MctsEngine {
    /// Engine seeded from `config.seed`.
    #[must_use]
    pub fn new(config: MCTSConfig) -> Self {
        Self {
            search: MCTSSearch::new(config),
        }
    }

    /// Engine drawing rollouts from `rng`.
    #[must_use]
    pub fn with_rng(config: MCTSConfig, rng: GameRng) -> Self {
        Self {
            search: MCTSSearch::with_rng(config, rng),
        }
    }

    /// Statistics of the latest decision.
    #[must_use]
    pub fn last_stats(&self) -> &SearchStats {
        self.search.stats()
    }
}

impl DecisionEngine for MctsEngine {
    fn decide(&mut self, board: &Board, player: Player) -> Option<Move> {
        self.search.search(board, player)
    }

    fn name(&self) -> &'static str {
        "mcts"
    }
}
