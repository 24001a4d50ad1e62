//! # irq-tictactoe
//!
//! A simulated interrupt-driven device that plays tic-tac-toe between two
//! pluggable AIs and streams rendered boards to readers.
//!
//! ## Design Principles
//!
//! 1. **Staged like a driver**: a periodic timer hands off to a
//!    non-blocking dispatch stage, which queues work for a blocking worker
//!    pool. Only the workers touch the board, one at a time.
//!
//! 2. **Deterministic search**: MCTS scores run on Q16.16 fixed point and
//!    every engine owns a seeded random stream, so a decision is
//!    reproducible from its seed.
//!
//! 3. **Lossy, never corrupting output**: frames go into a bounded buffer
//!    that truncates what does not fit and never rewrites what is there.
//!
//! ## Modules
//!
//! - `core`: players, RNG, fixed-point math, configuration, errors
//! - `board`: grid, win detection, legal moves, frame rendering
//! - `mcts`: arena-based Monte Carlo Tree Search
//! - `engine`: the decision-engine contract and its implementations
//! - `pipeline`: timer, dispatch, workers, frame buffer and session
//!
//! ## Example
//!
//! ```no_run
//! use irq_tictactoe::{Session, SimConfig};
//!
//! let config = SimConfig::default().with_tick_period_ms(20);
//! let session = Session::create(config).unwrap();
//! let handle = session.open().unwrap();
//!
//! for _ in 0..5 {
//!     let frame = handle.read_frame().unwrap();
//!     print!("{}", String::from_utf8_lossy(&frame));
//! }
//! ```

pub mod board;
pub mod core;
pub mod engine;
pub mod mcts;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::{
    EngineAssignment, Fixed, GameConfig, GameRng, PipelineConfig, Player, PlayerMap,
    RandomSource, Result, SimConfig, SimError,
};

pub use crate::board::{
    available_moves, calculate_win_value, check_win, render, Board, Cell, Frame, Move, Outcome,
};

pub use crate::mcts::{MCTSConfig, MCTSSearch, SearchStats};

pub use crate::engine::{DecisionEngine, EngineKind, MctsEngine, RandomEngine};

pub use crate::pipeline::{FrameBuffer, ReadStatus, Session, SessionHandle, SessionStats};
