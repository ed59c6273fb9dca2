//! Branching on fractional edge variables.
//!
//! - [`BranchConstraint`] — an equality fixing one edge to 0 or 1
//! - [`Node`] — the constraint path from the root to a search node
//! - [`BranchingPolicy`] — most-fractional selection and child construction

mod constraint;
mod policy;

pub use constraint::{BranchConstraint, EdgeFix, Node};
pub use policy::{BranchDecision, BranchingPolicy};
