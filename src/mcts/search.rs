//! Core MCTS search algorithm.
//!
//! Each iteration walks from the root, expanding nodes on their first
//! visit, rolling out uniformly random games from fresh nodes and
//! backpropagating the result with the perspective flipped at every level.
//! Decided positions are scored directly without a rollout.

use std::time::Instant;

use tracing::{debug, error};

use crate::board::{available_moves, calculate_win_value, check_win, Board, Move};
use crate::core::{Fixed, GameRng, Player, RandomSource, Result, SimError};

use super::config::MCTSConfig;
use super::node::NodeId;
use super::policy::{SelectionPolicy, Uct};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Main MCTS search context.
///
/// Generic over the random source. The search tree only exists while
/// [`MCTSSearch::search`] runs; its arena is freed once the move is picked.
pub struct MCTSSearch<R: RandomSource = GameRng> {
    /// Search configuration.
    config: MCTSConfig,

    /// Exploration constant in fixed point.
    exploration: Fixed,

    /// The search tree.
    tree: MCTSTree,

    /// RNG for rollouts.
    rng: R,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Statistics of the latest search.
    stats: SearchStats,

    /// Root child visit counts of the latest search.
    root_visits: Vec<(Move, u32)>,
}

impl MCTSSearch<GameRng> {
    /// Create a search seeded from `config.seed`.
    #[must_use]
    pub fn new(config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> MCTSSearch<R> {
    /// Create a search drawing rollouts from `rng`.
    pub fn with_rng(config: MCTSConfig, rng: R) -> Self {
        Self {
            exploration: config.exploration_fixed(),
            tree: MCTSTree::new(Player::X),
            config,
            rng,
            selection: Box::new(Uct),
            stats: SearchStats::default(),
            root_visits: Vec::new(),
        }
    }

    /// Set a custom selection policy.
    #[must_use]
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Run the configured number of iterations and pick a move for `player`.
    ///
    /// Returns `None` when the position is already decided or has no
    /// empty cell. `board` is never modified; every iteration plays on a
    /// scratch copy.
    pub fn search(&mut self, board: &Board, player: Player) -> Option<Move> {
        let start = Instant::now();
        self.stats.reset();
        self.root_visits.clear();
        self.tree.reset(player);
        self.tree.reserve(self.config.iterations as usize);

        if check_win(board).is_decided() {
            debug!(%player, "search on decided position");
            return None;
        }

        for _ in 0..self.config.iterations {
            let mut scratch = board.clone();
            if let Err(err) = self.iteration(&mut scratch) {
                error!(%err, "search iteration aborted");
                break;
            }
            self.stats.iterations += 1;
        }

        self.stats.nodes_allocated = self.tree.len() as u32;
        self.stats.max_depth = self.tree.max_depth();
        self.stats.time_us = start.elapsed().as_micros() as u64;

        let best = self.best_move();
        self.root_visits = self.collect_root_visits();
        self.tree.reset(player);

        debug!(
            %player,
            best = %best.unwrap_or(Move::NONE),
            stats = %self.stats,
            "search finished"
        );
        best
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, board: &mut Board) -> Result<()> {
        let mut current = self.tree.root();

        loop {
            let to_move = self.tree.get(current).to_move;
            let outcome = check_win(board);

            if outcome.is_decided() {
                self.stats.terminal_hits += 1;
                self.backpropagate(current, calculate_win_value(outcome, to_move.opponent()));
                return Ok(());
            }

            if !self.tree.get(current).is_expanded() {
                self.expand(current, board);
            }

            if self.tree.get(current).visits == 0 {
                let score = self.rollout(board, to_move)?;
                self.stats.simulations += 1;
                self.backpropagate(current, score);
                return Ok(());
            }

            let child = self.select(current)?;
            board.place(self.tree.get(child).mv, to_move)?;
            current = child;
        }
    }

    /// Add one child per legal move.
    fn expand(&mut self, node: NodeId, board: &Board) {
        for mv in available_moves(board) {
            self.tree.add_child(node, mv);
        }
    }

    /// Child to descend into, falling back to a uniform pick.
    fn select(&mut self, node: NodeId) -> Result<NodeId> {
        if let Some(child) = self.selection.select(&self.tree, node, self.exploration) {
            return Ok(child);
        }
        let children = &self.tree.get(node).children;
        if children.is_empty() {
            return Err(SimError::InvalidState(format!("{node} has no children to select")));
        }
        Ok(children[self.rng.gen_index(children.len())])
    }

    /// Play random moves until the game ends.
    ///
    /// The result is scored for the player who moved into the starting
    /// position, matching the perspective of the node's statistics.
    fn rollout(&mut self, board: &mut Board, to_move: Player) -> Result<Fixed> {
        let mover = to_move.opponent();
        let mut player = to_move;

        loop {
            let outcome = check_win(board);
            if outcome.is_decided() {
                return Ok(calculate_win_value(outcome, mover));
            }
            let moves = available_moves(board);
            let mv = moves[self.rng.gen_index(moves.len())];
            board.place(mv, player)?;
            player = player.opponent();
        }
    }

    /// Add `score` along the path to the root, flipping it at every step.
    fn backpropagate(&mut self, from: NodeId, score: Fixed) {
        let mut current = from;
        let mut score = score;

        loop {
            let node = self.tree.get_mut(current);
            node.visits += 1;
            node.score += score;

            if node.parent.is_none() {
                break;
            }
            current = node.parent;
            score = score.complement();
        }
    }

    /// Most visited root child, ties to the lowest move index.
    fn best_move(&self) -> Option<Move> {
        let mut best: Option<(Move, u32)> = None;
        for &child_id in &self.tree.root_node().children {
            let child = self.tree.get(child_id);
            match best {
                Some((_, visits)) if child.visits <= visits => {}
                _ => best = Some((child.mv, child.visits)),
            }
        }
        best.map(|(mv, _)| mv)
    }

    fn collect_root_visits(&self) -> Vec<(Move, u32)> {
        self.tree
            .root_node()
            .children
            .iter()
            .map(|&id| {
                let child = self.tree.get(id);
                (child.mv, child.visits)
            })
            .collect()
    }

    /// Visit count of every root child of the latest search, in move order.
    #[must_use]
    pub fn root_visits(&self) -> &[(Move, u32)] {
        &self.root_visits
    }

    /// Statistics of the latest search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The search arena; outside a search it holds only a root.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Restart the rollout stream.
    pub fn reseed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    fn board(glyphs: &str) -> Board {
        Board::from_glyphs(GameConfig::new(3, 3), glyphs).unwrap()
    }

    fn search(iterations: u32, seed: u64) -> MCTSSearch {
        MCTSSearch::new(MCTSConfig::default().with_iterations(iterations).with_seed(seed))
    }

    #[test]
    fn test_search_returns_legal_move() {
        let b = Board::new(GameConfig::new(3, 3));
        let mv = search(200, 1).search(&b, Player::X).unwrap();
        assert!(available_moves(&b).contains(&mv));
    }

    #[test]
    fn test_search_stats() {
        let b = Board::new(GameConfig::new(3, 3));
        let mut mcts = search(50, 1);
        mcts.search(&b, Player::X);

        let stats = mcts.stats();
        assert_eq!(stats.iterations, 50);
        assert!(stats.simulations > 0);
        // a root plus the nine children of the first expansion
        assert!(stats.nodes_allocated >= 10);
    }

    #[test]
    fn test_root_visits_account_for_every_iteration() {
        let b = Board::new(GameConfig::new(3, 3));
        let mut mcts = search(300, 5);
        mcts.search(&b, Player::X);

        let child_total: u32 = mcts.root_visits().iter().map(|(_, v)| v).sum();
        assert_eq!(mcts.root_visits().len(), 9);
        assert_eq!(mcts.stats().iterations, 300);
        // the first iteration rolls out from the root itself
        assert_eq!(child_total, 299);
    }

    #[test]
    fn test_decided_board_has_no_move() {
        let won = board("XXX OO. ...");
        assert_eq!(search(50, 1).search(&won, Player::O), None);

        let full = board("XOX XOO OXX");
        assert_eq!(search(50, 1).search(&full, Player::X), None);
    }

    #[test]
    fn test_search_does_not_mutate_board() {
        let b = board("X.. .O. ...");
        let before = b.clone();
        search(100, 3).search(&b, Player::X);
        assert_eq!(b, before);
    }

    #[test]
    fn test_takes_immediate_win() {
        let b = board("XX. OO. ...");
        let mv = search(500, 9).search(&b, Player::X);
        assert_eq!(mv, Some(Move::new(2)));
    }

    #[test]
    fn test_search_deterministic() {
        let b = board("X.. ... ..O");
        let a = {
            let mut s = search(200, 12345);
            let mv = s.search(&b, Player::X);
            (mv, s.root_visits().to_vec())
        };
        let b2 = {
            let mut s = search(200, 12345);
            let mv = s.search(&b, Player::X);
            (mv, s.root_visits().to_vec())
        };
        assert_eq!(a, b2);
    }

    #[test]
    fn test_tree_freed_after_decision() {
        let b = Board::new(GameConfig::new(4, 3));
        let mut mcts = search(2000, 2);
        assert!(mcts.search(&b, Player::O).is_some());

        assert!(mcts.stats().nodes_allocated > 1000);
        assert_eq!(mcts.tree().len(), 1);
        assert_eq!(mcts.tree().capacity(), 1);
        assert!(!mcts.tree().root_node().is_expanded());
        assert_eq!(mcts.tree().root_node().to_move, Player::O);
        // the visit counts survive the arena
        assert_eq!(mcts.root_visits().len(), 16);
    }

    #[test]
    fn test_root_visits_cleared_on_decided_board() {
        let mut mcts = search(50, 4);
        mcts.search(&Board::new(GameConfig::new(3, 3)), Player::X);
        assert!(!mcts.root_visits().is_empty());

        assert_eq!(mcts.search(&board("XXX OO. ..."), Player::O), None);
        assert!(mcts.root_visits().is_empty());
        assert_eq!(mcts.tree().len(), 1);
    }
}
