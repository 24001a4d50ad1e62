//! Win/draw detection, legal moves and outcome scoring.
//!
//! Lines are scanned family by family (rows, columns, primary diagonals,
//! secondary diagonals) from every start cell whose run of `goal` cells
//! stays on the board. The first winning run found decides the outcome.

use serde::{Deserialize, Serialize};

use super::grid::{Board, Cell, Move};
use crate::core::{Fixed, Player};

/// State of a game, derived purely from the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves remain and nobody has won.
    InProgress,
    /// A player completed a winning run.
    Win(Player),
    /// The board is full with no winner.
    Draw,
}

impl Outcome {
    /// Whether the game is over.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// The winner, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Outcome::Win(player) => Some(player),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "in progress"),
            Outcome::Win(player) => write!(f, "{player} wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// Step (row, column) of each line family in scan order.
const LINE_FAMILIES: [(isize, isize); 4] = [
    (0, 1),  // row
    (1, 0),  // column
    (1, 1),  // primary diagonal
    (1, -1), // secondary diagonal
];

/// Judge the board.
///
/// With `allow_exceed` disabled a run only wins if it cannot be extended
/// in either direction by another cell of the same player, i.e. the run
/// is exactly `goal` long.
#[must_use]
pub fn check_win(board: &Board) -> Outcome {
    let size = board.size() as isize;

    for (di, dj) in LINE_FAMILIES {
        for i in 0..size {
            for j in 0..size {
                if let Some(player) = segment_winner(board, i, j, di, dj) {
                    return Outcome::Win(player);
                }
            }
        }
    }

    if board.cells().iter().any(|c| c.is_empty()) {
        Outcome::InProgress
    } else {
        Outcome::Draw
    }
}

/// Cell at signed coordinates, `None` when off the board.
fn lookup(board: &Board, i: isize, j: isize) -> Option<Cell> {
    let size = board.size() as isize;
    if i < 0 || j < 0 || i >= size || j >= size {
        return None;
    }
    Some(board.at(i as usize, j as usize))
}

/// Owner of the `goal`-long run starting at (i, j) in direction (di, dj).
fn segment_winner(board: &Board, i: isize, j: isize, di: isize, dj: isize) -> Option<Player> {
    let goal = board.config().goal as isize;

    // run must fit on the board
    lookup(board, i + (goal - 1) * di, j + (goal - 1) * dj)?;

    let player = lookup(board, i, j)?.player()?;
    let owned = Cell::Taken(player);
    let complete = (1..goal).all(|k| lookup(board, i + k * di, j + k * dj) == Some(owned));
    if !complete {
        return None;
    }

    if !board.config().allow_exceed {
        let before = lookup(board, i - di, j - dj);
        let after = lookup(board, i + goal * di, j + goal * dj);
        if before == Some(owned) || after == Some(owned) {
            return None;
        }
    }

    Some(player)
}

/// Every empty cell, in increasing index order.
///
/// An empty result means the board is full.
#[must_use]
pub fn available_moves(board: &Board) -> Vec<Move> {
    board
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_empty())
        .map(|(i, _)| Move::new(i as u16))
        .collect()
}

/// Score of `outcome` as seen by `viewer`: 1.0 for a win, 0.0 for a loss,
/// 0.5 for a draw or an undecided position.
#[must_use]
pub fn calculate_win_value(outcome: Outcome, viewer: Player) -> Fixed {
    match outcome {
        Outcome::Win(winner) if winner == viewer => Fixed::ONE,
        Outcome::Win(_) => Fixed::ZERO,
        Outcome::Draw | Outcome::InProgress => Fixed::HALF,
    }
}

impl Board {
    /// Shorthand for [`check_win`].
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        check_win(self)
    }
}
