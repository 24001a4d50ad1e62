//! Property tests for the rules, fixed-point math and the frame buffer.

use proptest::prelude::*;

use irq_tictactoe::board::{
    available_moves, calculate_win_value, check_win, frame_len, render, Board, Cell, Move, Outcome,
};
use irq_tictactoe::core::fixed::{fixed_div, fixed_mul};
use irq_tictactoe::core::{Fixed, GameConfig, Player};
use irq_tictactoe::pipeline::{FrameBuffer, ReadStatus};

/// Board geometry with `1 <= goal <= size`.
fn geometry() -> impl Strategy<Value = GameConfig> {
    (1usize..=7)
        .prop_flat_map(|size| (Just(size), 1..=size, any::<bool>()))
        .prop_map(|(size, goal, allow_exceed)| GameConfig {
            allow_exceed,
            ..GameConfig::new(size, goal)
        })
}

/// A board filled from a random cell assignment, ignoring reachability.
fn board() -> impl Strategy<Value = Board> {
    geometry().prop_flat_map(|config| {
        prop::collection::vec(0u8..3, config.cell_count()).prop_map(move |cells| {
            let mut board = Board::new(config);
            for (index, cell) in cells.into_iter().enumerate() {
                if let Some(player) = Player::from_index(cell as usize) {
                    board.place(Move::new(index as u16), player).unwrap();
                }
            }
            board
        })
    })
}

proptest! {
    /// Swapping every mark swaps the winner.
    #[test]
    fn prop_check_win_is_symmetric(board in board()) {
        let swapped = check_win(&board.with_players_swapped());
        let expected = match check_win(&board) {
            Outcome::Win(player) => Outcome::Win(player.opponent()),
            other => other,
        };
        prop_assert_eq!(swapped, expected);
    }

    /// A legal move fills exactly that cell and nothing else.
    #[test]
    fn prop_available_move_fills_one_cell(board in board(), pick in any::<prop::sample::Index>()) {
        let moves = available_moves(&board);
        prop_assert_eq!(moves.len(), board.empty_count());
        prop_assume!(!moves.is_empty());

        let mv = moves[pick.index(moves.len())];
        let mut after = board.clone();
        after.place(mv, Player::O).unwrap();

        prop_assert_eq!(after.empty_count(), board.empty_count() - 1);
        for i in 0..board.cell_count() {
            if i == mv.index() {
                prop_assert_eq!(after.get(i), Cell::Taken(Player::O));
            } else {
                prop_assert_eq!(after.get(i), board.get(i));
            }
        }
    }

    /// Win values from the two viewpoints always sum to one.
    #[test]
    fn prop_win_values_complement(board in board()) {
        let outcome = check_win(&board);
        let x = calculate_win_value(outcome, Player::X);
        let o = calculate_win_value(outcome, Player::O);
        prop_assert_eq!(x + o, Fixed::ONE);
        prop_assert_eq!(x.complement(), o);
    }

    /// Every rendered frame has the advertised length.
    #[test]
    fn prop_frame_length(board in board()) {
        prop_assert_eq!(render(&board).len(), frame_len(board.size()));
    }

    /// `(a * b) / b` recovers `a` within one ulp for any divisor of at
    /// least one.
    #[test]
    fn prop_mul_then_div(a in 0u64..(1 << 32), b in Fixed::ONE.raw()..(1 << 32)) {
        let (a, b) = (Fixed(a), Fixed(b));
        let back = fixed_div(fixed_mul(a, b), b);
        prop_assert!(back.raw().abs_diff(a.raw()) <= 1, "a={:?} b={:?} back={:?}", a, b, back);
    }

    /// `(a / b) * b` recovers `a` within a rounding step.
    #[test]
    fn prop_div_then_mul(a in 0u64..(1 << 24), b in (1u64 << 16)..(1 << 24)) {
        let (a, b) = (Fixed(a), Fixed(b));
        let back = fixed_mul(fixed_div(a, b), b);
        let error = back.raw().abs_diff(a.raw());
        // the quotient is off by at most half an ulp, scaled by b
        prop_assert!(error <= (b.raw() >> 16) + 1, "a={:?} b={:?} back={:?}", a, b, back);
    }

    /// The buffer keeps the earliest bytes that fit and drops the rest.
    #[test]
    fn prop_buffer_keeps_prefix(
        capacity in 1usize..256,
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..16),
    ) {
        let buffer = FrameBuffer::new(capacity);
        let mut written = Vec::new();
        for chunk in &chunks {
            let stored = buffer.push(chunk);
            written.extend_from_slice(&chunk[..stored]);
        }

        let total: usize = chunks.iter().map(Vec::len).sum();
        let kept = capacity.min(total);
        let all: Vec<u8> = chunks.concat();
        prop_assert_eq!(&written[..], &all[..kept]);
        prop_assert_eq!(buffer.dropped_bytes(), (total - kept) as u64);

        let mut out = vec![0u8; capacity];
        let status = buffer.read(&mut out, true).unwrap();
        if kept == 0 {
            prop_assert_eq!(status, ReadStatus::WouldBlock);
        } else {
            prop_assert_eq!(status, ReadStatus::Ready(kept));
            prop_assert_eq!(&out[..kept], &all[..kept]);
        }
    }
}
