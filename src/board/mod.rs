//! The board engine.
//!
//! - [`Board`], [`Cell`] and [`Move`]: the grid and its indices
//! - [`check_win`], [`available_moves`], [`calculate_win_value`]: the rules
//! - [`render`]: the fixed-size ASCII [`Frame`] streamed to readers

pub mod frame;
pub mod grid;
pub mod rules;

pub use frame::{frame_len, render, Frame};
pub use grid::{Board, Cell, Move};
pub use rules::{available_moves, calculate_win_value, check_win, Outcome};
