//! Board engine integration tests.
//!
//! Covers win detection across geometries, the exact-goal rule, legal move
//! enumeration and the frame wire format.

use irq_tictactoe::board::{
    available_moves, calculate_win_value, check_win, frame_len, render, Board, Cell, Move, Outcome,
};
use irq_tictactoe::core::{Fixed, GameConfig, Player};

fn board(size: usize, goal: usize, glyphs: &str) -> Board {
    Board::from_glyphs(GameConfig::new(size, goal), glyphs).unwrap()
}

// =============================================================================
// Win Detection
// =============================================================================

/// Every row, column and both diagonals of a 3x3 board win.
#[test]
fn test_every_line_wins_on_3x3() {
    let lines: [[usize; 3]; 8] = [
        [0, 1, 2],
        [3, 4, 5],
        [6, 7, 8],
        [0, 3, 6],
        [1, 4, 7],
        [2, 5, 8],
        [0, 4, 8],
        [2, 4, 6],
    ];

    for line in lines {
        for player in Player::ALL {
            let mut b = Board::new(GameConfig::new(3, 3));
            for cell in line {
                b.place(Move::new(cell as u16), player).unwrap();
            }
            assert_eq!(check_win(&b), Outcome::Win(player), "line {line:?}");
        }
    }
}

/// Two in a row is not enough when the goal is three.
#[test]
fn test_short_run_is_in_progress() {
    let b = board(3, 3, "XX. OO. ...");
    assert_eq!(check_win(&b), Outcome::InProgress);
}

/// Runs may start anywhere as long as they fit on the board.
#[test]
fn test_goal_three_on_larger_board() {
    let b = board(5, 3, "..... ..... ....O ...O. ..O..");
    assert_eq!(check_win(&b), Outcome::Win(Player::O));

    let b = board(5, 3, "..... ..... ..XXX ..... .....");
    assert_eq!(check_win(&b), Outcome::Win(Player::X));

    // wraps across rows do not count
    let b = board(5, 3, "...XX X.... ..... ..... .....");
    assert_eq!(check_win(&b), Outcome::InProgress);
}

/// With `allow_exceed` off only runs of exactly `goal` win.
#[test]
fn test_exact_goal_rule() {
    let exact = GameConfig::new(5, 3).exact_goal();

    let four = Board::from_glyphs(exact, "XXXX. ..... ..... ..... .....").unwrap();
    assert_eq!(check_win(&four), Outcome::InProgress);

    let three = Board::from_glyphs(exact, "XXX.X ..... ..... ..... .....").unwrap();
    assert_eq!(check_win(&three), Outcome::Win(Player::X));

    let blocked = Board::from_glyphs(exact, "OXXXO ..... ..... ..... .....").unwrap();
    assert_eq!(check_win(&blocked), Outcome::Win(Player::X));

    let col = Board::from_glyphs(exact, "O.... O.... O.... O.... .....").unwrap();
    assert_eq!(check_win(&col), Outcome::InProgress);
}

/// A full board with no line is a draw; a full board with a line is a win.
#[test]
fn test_full_board() {
    assert_eq!(check_win(&board(3, 3, "XOX XXO OXO")), Outcome::Draw);
    assert_eq!(check_win(&board(3, 3, "XXX OOX XOO")), Outcome::Win(Player::X));
}

/// A one-cell board is won by its first move.
#[test]
fn test_single_cell_board() {
    let mut b = Board::new(GameConfig::new(1, 1));
    assert_eq!(check_win(&b), Outcome::InProgress);
    b.place(Move::new(0), Player::O).unwrap();
    assert_eq!(check_win(&b), Outcome::Win(Player::O));
}

// =============================================================================
// Legal Moves and Scoring
// =============================================================================

/// Moves are every empty cell in increasing order.
#[test]
fn test_available_moves_tracks_board() {
    let mut b = Board::new(GameConfig::new(4, 3));
    assert_eq!(available_moves(&b).len(), 16);

    b.place(Move::new(5), Player::X).unwrap();
    b.place(Move::new(0), Player::O).unwrap();

    let moves = available_moves(&b);
    assert_eq!(moves.len(), 14);
    assert!(!moves.contains(&Move::new(0)));
    assert!(!moves.contains(&Move::new(5)));
    assert!(moves.windows(2).all(|w| w[0] < w[1]));
}

/// Outcome scores from both viewpoints.
#[test]
fn test_win_value_viewpoints() {
    let outcome = check_win(&board(3, 3, "OOO XX. X.."));
    assert_eq!(calculate_win_value(outcome, Player::O), Fixed::ONE);
    assert_eq!(calculate_win_value(outcome, Player::X), Fixed::ZERO);
}

// =============================================================================
// Frames
// =============================================================================

/// A 4x4 frame follows the fixed layout.
#[test]
fn test_frame_layout_4x4() {
    let mut b = Board::new(GameConfig::new(4, 3));
    b.place(Move::new(0), Player::X).unwrap();
    b.place(Move::new(15), Player::O).unwrap();

    let frame = render(&b);
    assert_eq!(frame.len(), frame_len(4));

    let text = frame.to_string();
    let rows: Vec<&str> = text.split('\n').collect();
    // 8 grid rows, the blank terminator, and the empty tail after it
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0], "|X| | | |");
    assert_eq!(rows[1], "---------");
    assert_eq!(rows[6], "| | | |O|");
    assert_eq!(rows[8], "");
    assert!(rows.iter().take(8).all(|r| r.len() == 2 * 4 + 1));
}

/// Frames are concatenable: the glyph of every cell is at a fixed offset.
#[test]
fn test_frame_offsets() {
    let b = board(3, 3, "XO. .X. O.X");
    let frame = render(&b);
    let stride = 2 * (2 * 3 + 2);

    for row in 0..3 {
        for col in 0..3 {
            let glyph = frame.as_bytes()[row * stride + 2 * col + 1];
            let expected = match b.at(row, col) {
                Cell::Empty => b' ',
                Cell::Taken(p) => p.symbol() as u8,
            };
            assert_eq!(glyph, expected);
        }
    }
}
