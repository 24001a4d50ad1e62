//! MCTS integration tests on real boards.

use irq_tictactoe::board::{available_moves, Board, Move};
use irq_tictactoe::core::{GameConfig, GameRng, Player};
use irq_tictactoe::engine::{DecisionEngine, EngineKind, MctsEngine};
use irq_tictactoe::mcts::{MCTSConfig, MCTSSearch};

fn board(glyphs: &str) -> Board {
    Board::from_glyphs(GameConfig::new(3, 3), glyphs).unwrap()
}

fn config(iterations: u32, seed: u64) -> MCTSConfig {
    MCTSConfig::default().with_iterations(iterations).with_seed(seed)
}

// =============================================================================
// Basic Search Tests
// =============================================================================

#[test]
fn test_mcts_returns_legal_move() {
    let b = Board::new(GameConfig::new(4, 3));
    let mut search = MCTSSearch::new(config(200, 42));

    let mv = search.search(&b, Player::X).expect("empty board has moves");

    assert!(available_moves(&b).contains(&mv));
}

#[test]
fn test_mcts_with_low_iterations() {
    let b = board("X.. .O. ...");
    let mut search = MCTSSearch::new(config(1, 42));

    // a single iteration only visits the root, yet a move still comes back
    let mv = search.search(&b, Player::X);
    assert_eq!(mv, Some(Move::new(1)));
}

/// With exactly one legal move every seed must return it.
#[test]
fn test_single_legal_move_for_every_seed() {
    let b = board("XOX OXX O.O");
    let expected = available_moves(&b);
    assert_eq!(expected, vec![Move::new(7)]);

    for seed in 0..64 {
        let mut engine = MctsEngine::new(config(16, seed));
        assert_eq!(engine.decide(&b, Player::X), Some(Move::new(7)), "seed {seed}");
    }
}

/// A board with no empty cell yields no move.
#[test]
fn test_full_board_has_no_move() {
    let b = board("XOX XOO OXX");
    let mut engine = MctsEngine::new(config(50, 1));
    assert_eq!(engine.decide(&b, Player::O), None);
}

// =============================================================================
// Terminal-Aware Play
// =============================================================================

/// X completes its row instead of wandering off.
#[test]
fn test_finishes_winning_row() {
    let b = board("XX. OO. ...");
    for seed in [1, 2, 3] {
        let mut search = MCTSSearch::new(config(1000, seed));
        assert_eq!(search.search(&b, Player::X), Some(Move::new(2)), "seed {seed}");
    }
}

/// The same holds for O, on a column.
#[test]
fn test_finishes_winning_column_for_o() {
    let b = board("OX. OX. .X.");
    // X already has the middle column, so the position is decided
    assert_eq!(MCTSSearch::new(config(100, 1)).search(&b, Player::O), None);

    let b = board("OX. OX. ..X");
    let mut search = MCTSSearch::new(config(1000, 4));
    assert_eq!(search.search(&b, Player::O), Some(Move::new(6)));
}

/// Winning beats blocking.
#[test]
fn test_prefers_win_over_block() {
    let b = board("XX. OO. X..");
    let mut search = MCTSSearch::new(config(2000, 7));
    assert_eq!(search.search(&b, Player::O), Some(Move::new(5)));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_seed_same_search() {
    let b = Board::new(GameConfig::new(4, 3));

    let mut a = MCTSSearch::new(config(300, 99));
    let mut c = MCTSSearch::new(config(300, 99));

    assert_eq!(a.search(&b, Player::X), c.search(&b, Player::X));
    assert_eq!(a.root_visits(), c.root_visits());
    assert_eq!(a.stats().simulations, c.stats().simulations);
}

#[test]
fn test_engine_factory_uses_forked_streams() {
    let b = Board::new(GameConfig::new(3, 3));
    let cfg = config(100, 5);

    let mut parent = GameRng::new(5);
    let mut first = EngineKind::Mcts.build(&cfg, parent.fork());
    let mut parent_again = GameRng::new(5);
    let mut second = EngineKind::Mcts.build(&cfg, parent_again.fork());

    assert_eq!(first.decide(&b, Player::X), second.decide(&b, Player::X));
}

#[test]
fn test_search_stats_are_populated() {
    let b = Board::new(GameConfig::new(3, 3));
    let mut search = MCTSSearch::new(config(500, 3));
    search.search(&b, Player::X);

    let stats = search.stats();
    assert_eq!(stats.iterations, 500);
    assert!(stats.simulations > 0);
    // every iteration ends in exactly one rollout or one terminal score
    assert_eq!(stats.simulations + stats.terminal_hits, 500);
    assert!(stats.nodes_allocated > 9);
}

// =============================================================================
// Tree Lifetime
// =============================================================================

/// Nothing of the tree outlives the decision except its counters.
#[test]
fn test_tree_released_after_decision() {
    let b = Board::new(GameConfig::new(4, 3));
    let mut search = MCTSSearch::new(config(2000, 11));

    let mv = search.search(&b, Player::X);
    assert!(mv.is_some());
    assert!(search.stats().nodes_allocated > 1000);

    assert_eq!(search.tree().len(), 1);
    assert_eq!(search.tree().capacity(), 1);

    let visits: u32 = search.root_visits().iter().map(|(_, v)| v).sum();
    assert_eq!(visits, 1999);
    let best = search.root_visits().iter().max_by_key(|(m, v)| (*v, std::cmp::Reverse(*m)));
    assert_eq!(best.map(|(m, _)| *m), mv);
}
