//! Outcome of a solve.

use serde::{Deserialize, Serialize};

use super::control::StopReason;
use super::stats::SearchStatistics;
use super::trace::SearchTrace;
use crate::models::Tour;

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// The tree was exhausted; the tour is proven optimal.
    Optimal,
    /// The search stopped early; the tour (if any) is the best known,
    /// not proven optimal.
    Interrupted(StopReason),
    /// The tree was exhausted without finding any tour.
    Infeasible,
}

/// Result of [`BranchAndBound::solve`](super::BranchAndBound::solve).
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    status: SolveStatus,
    tour: Option<Tour>,
    statistics: SearchStatistics,
    trace: Option<SearchTrace>,
}

impl SolveOutcome {
    pub(crate) fn new(
        status: SolveStatus,
        tour: Option<Tour>,
        statistics: SearchStatistics,
        trace: Option<SearchTrace>,
    ) -> Self {
        Self {
            status,
            tour,
            statistics,
            trace,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Returns `true` only for a completed search with a tour.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    pub fn tour(&self) -> Option<&Tour> {
        self.tour.as_ref()
    }

    /// Tour cost, `+∞` when no tour was found.
    pub fn cost(&self) -> f64 {
        self.tour.as_ref().map_or(f64::INFINITY, Tour::cost)
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Per-node trace, present when the solve ran with tracing enabled.
    pub fn trace(&self) -> Option<&SearchTrace> {
        self.trace.as_ref()
    }

    pub fn into_tour(self) -> Option<Tour> {
        self.tour
    }
}
