//! Solver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TspError};

/// Tuning knobs for a branch-and-bound solve.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_tsp_exact::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit(Duration::from_secs(5))
///     .with_threads(4)
///     .with_trace(true);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.epsilon, 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Distance from 0 or 1 under which an edge value counts as integral.
    pub epsilon: f64,
    /// Wall-clock budget, measured from the start of the solve.
    pub time_limit: Option<Duration>,
    /// Maximum number of nodes taken off the open list.
    pub node_limit: Option<u64>,
    /// Worker threads; 1 runs the sequential search.
    pub threads: usize,
    /// Seed the incumbent with a nearest-neighbour + 2-opt tour.
    pub warm_start: bool,
    /// Record one [`NodeRecord`](crate::search::NodeRecord) per explored node.
    pub record_trace: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            time_limit: None,
            node_limit: None,
            threads: 1,
            warm_start: false,
            record_trace: false,
        }
    }
}

impl SolverConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_warm_start(mut self, enabled: bool) -> Self {
        self.warm_start = enabled;
        self
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }

    /// Rejects settings the search cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0 && self.epsilon < 0.5) {
            return Err(TspError::InvalidConfig(format!(
                "epsilon must lie in (0, 0.5), got {}",
                self.epsilon
            )));
        }
        if self.threads == 0 {
            return Err(TspError::InvalidConfig("threads must be at least 1".into()));
        }
        Ok(())
    }
}
