//! Per-decision search counters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Counters of the latest [`super::MCTSSearch::search`] call.
///
/// Every completed iteration ends in exactly one rollout or one terminal
/// score, so `simulations + terminal_hits == iterations`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Iterations that ran to completion.
    pub iterations: u32,

    /// Iterations that ended in a random rollout.
    pub simulations: u32,

    /// Iterations that ended on an already decided position.
    pub terminal_hits: u32,

    /// Arena size when the search finished.
    pub nodes_allocated: u32,

    /// Deepest node created.
    pub max_depth: u16,

    /// Wall time of the search in microseconds.
    pub time_us: u64,
}

impl SearchStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Iterations completed per second of wall time.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        self.per_second(self.iterations)
    }

    /// Rollouts completed per second of wall time.
    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        self.per_second(self.simulations)
    }

    /// Share of iterations that reached a decided position inside the tree.
    #[must_use]
    pub fn terminal_ratio(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        f64::from(self.terminal_hits) / f64::from(self.iterations)
    }

    fn per_second(&self, count: u32) -> f64 {
        if self.time_us == 0 {
            return 0.0;
        }
        f64::from(count) * 1e6 / self.time_us as f64
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations ({} rollouts, {} terminal), {} nodes, depth {}, {}us",
            self.iterations,
            self.simulations,
            self.terminal_hits,
            self.nodes_allocated,
            self.max_depth,
            self.time_us
        )
    }
}
