//! Uniformly random decision engine.
//!
//! Stands in for any alternate strategy: it honours the same contract as
//! [`super::MctsEngine`] and is what O plays by default.

use crate::board::{available_moves, check_win, Board, Move};
use crate::core::{Player, RandomSource};

use super::DecisionEngine;

/// Picks a legal move uniformly at random.
pub struct RandomEngine<R: RandomSource = crate::core::GameRng> {
    rng: R,
}

impl<R: RandomSource> RandomEngine<R> {
    /// Engine drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RandomSource> DecisionEngine for RandomEngine<R> {
    fn decide(&mut self, board: &Board, _player: Player) -> Option<Move> {
        if check_win(board).is_decided() {
            return None;
        }
        let moves = available_moves(board);
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.gen_index(moves.len())])
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameRng};

    #[test]
    fn test_only_legal_moves() {
        let board = Board::from_glyphs(GameConfig::new(3, 3), "X.O .X. O..").unwrap();
        let legal = available_moves(&board);
        let mut engine = RandomEngine::new(GameRng::new(5));

        for _ in 0..100 {
            let mv = engine.decide(&board, Player::O).unwrap();
            assert!(legal.contains(&mv));
        }
    }

    #[test]
    fn test_decided_board() {
        let board = Board::from_glyphs(GameConfig::new(3, 3), "OOO XX. X..").unwrap();
        let mut engine = RandomEngine::new(GameRng::new(5));
        assert_eq!(engine.decide(&board, Player::X), None);
    }
}
