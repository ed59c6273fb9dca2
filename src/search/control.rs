//! Cancellation and resource limits checked between node pops.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;

/// Why a search stopped before exhausting the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The external stop flag was raised.
    Cancelled,
    TimeLimit,
    NodeLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            StopReason::Cancelled => "stop signal received",
            StopReason::TimeLimit => "time limit reached",
            StopReason::NodeLimit => "node limit reached",
        };
        f.write_str(msg)
    }
}

/// Caller-side handle for stopping a running search.
///
/// Limits set here combine with those of [`SolverConfig`]; the tighter one
/// wins.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use u_tsp_exact::search::SearchControl;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let control = SearchControl::new().with_stop_flag(Arc::clone(&flag));
/// assert!(!control.is_cancelled());
/// flag.store(true, Ordering::Relaxed);
/// assert!(control.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    stop_flag: Option<Arc<AtomicBool>>,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl SearchControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
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

    pub fn is_cancelled(&self) -> bool {
        self.stop_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::Relaxed))
    }

    /// Fixes the deadline for a solve starting at `started`.
    pub(crate) fn arm(&self, config: &SolverConfig, started: Instant) -> ArmedControl<'_> {
        let time_limit = tighter(self.time_limit, config.time_limit);
        ArmedControl {
            control: self,
            deadline: time_limit.map(|d| started + d),
            node_limit: tighter(self.node_limit, config.node_limit),
        }
    }
}

fn tighter<T: Ord>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Limits resolved against a start instant.
#[derive(Debug, Clone)]
pub(crate) struct ArmedControl<'a> {
    control: &'a SearchControl,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
}

impl ArmedControl<'_> {
    /// Checked before popping the next node; `popped` is the number of nodes
    /// taken so far.
    pub(crate) fn check(&self, popped: u64) -> Option<StopReason> {
        if self.control.is_cancelled() {
            return Some(StopReason::Cancelled);
        }
        if self.node_limit.is_some_and(|limit| popped >= limit) {
            return Some(StopReason::NodeLimit);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(StopReason::TimeLimit);
        }
        None
    }
}
