//! Branch-and-bound orchestration.
//!
//! - [`BranchAndBound`] — solver entry point (sequential or worker pool)
//! - [`SearchControl`] — stop flag and limits supplied by the caller
//! - [`Incumbent`], [`SharedIncumbent`] — best tour bookkeeping
//! - [`SearchStatistics`], [`SearchTrace`] — what the search did
//! - [`SolveOutcome`] — status, tour, and statistics of a solve

mod bnb;
mod control;
mod expand;
mod incumbent;
mod parallel;
mod result;
mod stats;
mod trace;

pub use bnb::BranchAndBound;
pub use control::{SearchControl, StopReason};
pub use incumbent::{Incumbent, SharedIncumbent};
pub use result::{SolveOutcome, SolveStatus};
pub use stats::SearchStatistics;
pub use trace::{NodeRecord, NodeState, SearchTrace};
