//! Decision engines.
//!
//! Every AI player implements [`DecisionEngine`]. The pipeline picks the
//! engine for whoever is to move and treats them as interchangeable:
//!
//! - [`MctsEngine`]: fixed-point Monte Carlo Tree Search
//! - [`RandomEngine`]: uniformly random legal move
//!
//! [`EngineKind`] names the shipped engines in configuration files.

pub mod mcts;
pub mod random;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Move};
use crate::core::{GameRng, Player};
use crate::mcts::MCTSConfig;

pub use mcts::MctsEngine;
pub use random::RandomEngine;

/// Decision engine trait.
///
/// ## Implementation Notes
///
/// - `decide` must leave `board` untouched and keep no reference to it
/// - it must finish in bounded time
/// - it returns `None` only when no legal move exists
pub trait DecisionEngine: Send {
    /// Pick a move for `player`.
    fn decide(&mut self, board: &Board, player: Player) -> Option<Move>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

impl<E: DecisionEngine + ?Sized> DecisionEngine for Box<E> {
    fn decide(&mut self, board: &Board, player: Player) -> Option<Move> {
        (**self).decide(board, player)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Engines selectable from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// [`MctsEngine`].
    Mcts,
    /// [`RandomEngine`].
    Random,
}

impl EngineKind {
    /// Instantiate the engine with its own random stream.
    #[must_use]
    pub fn build(self, mcts: &MCTSConfig, rng: GameRng) -> Box<dyn DecisionEngine> {
        match self {
            EngineKind::Mcts => Box::new(MctsEngine::with_rng(mcts.clone(), rng)),
            EngineKind::Random => Box::new(RandomEngine::new(rng)),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Mcts => write!(f, "mcts"),
            EngineKind::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mcts" => Ok(EngineKind::Mcts),
            "random" => Ok(EngineKind::Random),
            other => Err(format!("unknown engine {other:?} (expected mcts or random)")),
        }
    }
}
