//! Error type shared by every stage of a solve.

use thiserror::Error;

/// Errors surfaced to the caller of a solve.
///
/// Pruning an infeasible node or stopping on cancellation is not an error;
/// those are reported through [`SolveOutcome`](crate::search::SolveOutcome).
#[derive(Debug, Error)]
pub enum TspError {
    /// The instance cannot hold a Hamiltonian cycle (fewer than 3 vertices,
    /// mismatched distance matrix, non-finite costs).
    #[error("malformed instance: {0}")]
    MalformedInstance(String),
    /// The LP backend could not be instantiated.
    #[error("relaxation solver unavailable: {0}")]
    SolverUnavailable(String),
    /// The LP backend failed on a node for a reason other than infeasibility.
    #[error("relaxation solver error: {0}")]
    Relaxation(String),
    /// An accepted integral assignment is not a single Hamiltonian cycle.
    #[error("invalid integral solution: {0}")]
    InvalidIntegralSolution(String),
    /// The search reached a state the formulation should make impossible.
    #[error("search invariant violated: {0}")]
    InvariantViolation(String),
    /// A branch constraint names an edge with no decision variable.
    #[error("invalid branch constraint: {0}")]
    InvalidBranchConstraint(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TspError>;
