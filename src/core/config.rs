//! Runtime configuration.
//!
//! Board geometry, search budget, tick period, buffer capacity and the
//! engine assigned to each player are all chosen at session creation.
//!
//! Configs can be built in code with the `with_*` builders or loaded from
//! TOML; missing keys fall back to the defaults.
//!
//! ```
//! use irq_tictactoe::core::SimConfig;
//!
//! let config = SimConfig::from_toml_str(
//!     r#"
//!     [game]
//!     board_size = 3
//!     goal = 3
//!
//!     [pipeline]
//!     tick_period_ms = 10
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.game.board_size, 3);
//! assert_eq!(config.pipeline.buffer_capacity, 4096);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};
use super::player::Player;
use crate::engine::EngineKind;
use crate::mcts::MCTSConfig;

/// Largest supported board edge (column labels run `a..=z`).
pub const MAX_BOARD_SIZE: usize = 26;

/// Board geometry and win rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Edge length of the square board.
    pub board_size: usize,

    /// Run length that wins.
    pub goal: usize,

    /// Whether a run longer than `goal` still counts as a win.
    pub allow_exceed: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 4,
            goal: 3,
            allow_exceed: true,
        }
    }
}

impl GameConfig {
    /// Create a game config for an `n`×`n` board needing `goal` in a row.
    #[must_use]
    pub fn new(board_size: usize, goal: usize) -> Self {
        Self {
            board_size,
            goal,
            allow_exceed: true,
        }
    }

    /// Require runs of exactly `goal` cells.
    #[must_use]
    pub fn exact_goal(mut self) -> Self {
        self.allow_exceed = false;
        self
    }

    /// Number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.board_size * self.board_size
    }

    /// Check geometry bounds.
    pub fn validate(&self) -> Result<()> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(SimError::InvalidConfig(format!(
                "board_size must be in 1..={MAX_BOARD_SIZE}, got {}",
                self.board_size
            )));
        }
        if self.goal == 0 || self.goal > self.board_size {
            return Err(SimError::InvalidConfig(format!(
                "goal must be in 1..={}, got {}",
                self.board_size, self.goal
            )));
        }
        Ok(())
    }
}

/// Timing and buffering of the event pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Period of the timer stage in milliseconds.
    pub tick_period_ms: u64,

    /// Capacity of the frame buffer in bytes.
    pub buffer_capacity: usize,

    /// Number of worker-stage threads.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 100,
            buffer_capacity: 4096,
            workers: 2,
        }
    }
}

impl PipelineConfig {
    /// Timer period as a `Duration`.
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Check pipeline bounds.
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(SimError::InvalidConfig("tick_period_ms must be > 0".into()));
        }
        if self.buffer_capacity == 0 {
            return Err(SimError::InvalidConfig("buffer_capacity must be > 0".into()));
        }
        if self.workers == 0 {
            return Err(SimError::InvalidConfig("workers must be > 0".into()));
        }
        Ok(())
    }
}

/// Engine assigned to each player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineAssignment {
    /// Engine playing X.
    pub x: EngineKind,

    /// Engine playing O.
    pub o: EngineKind,
}

impl Default for EngineAssignment {
    fn default() -> Self {
        Self {
            x: EngineKind::Mcts,
            o: EngineKind::Random,
        }
    }
}

impl EngineAssignment {
    /// Engine kind for `player`.
    #[must_use]
    pub fn get(&self, player: Player) -> EngineKind {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }
}

/// Complete configuration of a simulated device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Board geometry.
    pub game: GameConfig,

    /// Search parameters shared by every MCTS engine.
    pub mcts: MCTSConfig,

    /// Pipeline timing and buffering.
    pub pipeline: PipelineConfig,

    /// Engine assigned to each player.
    pub engines: EngineAssignment,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            mcts: MCTSConfig::default(),
            pipeline: PipelineConfig::default(),
            engines: EngineAssignment::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        self.mcts.validate()?;
        self.pipeline.validate()
    }

    /// Replace the game geometry.
    #[must_use]
    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    /// Replace the search parameters.
    #[must_use]
    pub fn with_mcts(mut self, mcts: MCTSConfig) -> Self {
        self.mcts = mcts;
        self
    }

    /// Set the timer period.
    #[must_use]
    pub fn with_tick_period_ms(mut self, ms: u64) -> Self {
        self.pipeline.tick_period_ms = ms;
        self
    }

    /// Set the frame buffer capacity in bytes.
    #[must_use]
    pub fn with_buffer_capacity(mut self, bytes: usize) -> Self {
        self.pipeline.buffer_capacity = bytes;
        self
    }

    /// Set the worker pool size.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.pipeline.workers = workers;
        self
    }

    /// Assign engines to X and O.
    #[must_use]
    pub fn with_engines(mut self, x: EngineKind, o: EngineKind) -> Self {
        self.engines = EngineAssignment { x, o };
        self
    }
}
