//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::core::{Fixed, Result, SimError};

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSConfig {
    /// Search iterations per decision.
    /// Fixes per-move latency independently of wall-clock jitter.
    pub iterations: u32,

    /// UCT exploration constant (default: sqrt(2) = 1.414).
    /// Converted to fixed point once per search.
    pub exploration_constant: f64,

    /// Random seed for rollouts.
    /// Same seed produces identical searches.
    pub seed: u64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            exploration_constant: std::f64::consts::SQRT_2,
            seed: 42,
        }
    }
}

impl MCTSConfig {
    /// Create a new config with a custom iteration budget.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create a new config with custom exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Exploration constant in Q16.16.
    #[must_use]
    pub fn exploration_fixed(&self) -> Fixed {
        Fixed::from_f64(self.exploration_constant)
    }

    /// Check parameter bounds.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(SimError::InvalidConfig("mcts.iterations must be > 0".into()));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "mcts.exploration_constant must be finite and >= 0, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}
