//! Core types: players, randomness, fixed-point numbers, configuration
//! and errors.
//!
//! Everything here is independent of the board rules and the pipeline.

pub mod config;
pub mod error;
pub mod fixed;
pub mod player;
pub mod rng;

pub use config::{EngineAssignment, GameConfig, PipelineConfig, SimConfig, MAX_BOARD_SIZE};
pub use error::{Result, SimError};
pub use fixed::Fixed;
pub use player::{Player, PlayerMap};
pub use rng::{GameRng, RandomSource};
