//! Monte Carlo Tree Search over the board engine.
//!
//! ## Overview
//!
//! - **Arena tree**: nodes live in a flat vector and refer to each other by
//!   [`NodeId`]; the whole tree is dropped after every decision
//! - **Fixed-point UCT**: selection runs on Q16.16 arithmetic, so a search
//!   is reproducible bit for bit from its seed
//! - **Terminal-aware**: decided positions are scored directly, never
//!   diluted by random rollouts
//!
//! ## Usage
//!
//! ```rust
//! use irq_tictactoe::board::{Board, Move};
//! use irq_tictactoe::core::{GameConfig, Player};
//! use irq_tictactoe::mcts::{MCTSConfig, MCTSSearch};
//!
//! let board = Board::from_glyphs(GameConfig::new(3, 3), "XX. OO. ...").unwrap();
//! let mut search = MCTSSearch::new(MCTSConfig::default().with_iterations(500));
//!
//! assert_eq!(search.search(&board, Player::X), Some(Move::new(2)));
//! println!("{:?}", search.stats());
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::MCTSConfig;
pub use node::{MCTSNode, NodeId};
pub use policy::{uct_score, SelectionPolicy, Uct};
pub use search::MCTSSearch;
pub use stats::SearchStats;
pub use tree::MCTSTree;
