//! Branch constraints and search-tree nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The value an edge variable is fixed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeFix {
    /// `x[i][j] = 0`
    Excluded,
    /// `x[i][j] = 1`
    Included,
}

impl EdgeFix {
    /// Right-hand side of the equality this fix adds.
    pub fn value(self) -> f64 {
        match self {
            EdgeFix::Excluded => 0.0,
            EdgeFix::Included => 1.0,
        }
    }
}

/// An equality `x[from][to] = value` layered on the base formulation.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::branching::{BranchConstraint, EdgeFix};
///
/// let c = BranchConstraint::exclude(0, 1);
/// assert_eq!(c.edge(), (0, 1));
/// assert_eq!(c.fix, EdgeFix::Excluded);
/// assert_eq!(c.to_string(), "x[0][1] = 0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchConstraint {
    pub from: usize,
    pub to: usize,
    pub fix: EdgeFix,
}

impl BranchConstraint {
    pub fn new(from: usize, to: usize, fix: EdgeFix) -> Self {
        Self { from, to, fix }
    }

    /// Forbids the edge `from → to`.
    pub fn exclude(from: usize, to: usize) -> Self {
        Self::new(from, to, EdgeFix::Excluded)
    }

    /// Forces the edge `from → to`.
    pub fn include(from: usize, to: usize) -> Self {
        Self::new(from, to, EdgeFix::Included)
    }

    pub fn edge(&self) -> (usize, usize) {
        (self.from, self.to)
    }
}

impl fmt::Display for BranchConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x[{}][{}] = {}", self.from, self.to, self.fix.value())
    }
}

/// A node of the search tree: the constraint path from the root.
///
/// Nodes are immutable. [`child`](Node::child) copies the parent's path and
/// appends one constraint, so siblings never share mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: u64,
    parent: Option<u64>,
    parent_bound: Option<f64>,
    constraints: Vec<BranchConstraint>,
}

impl Node {
    /// The unconstrained root.
    pub fn root() -> Self {
        Self::with_constraints(Vec::new())
    }

    /// A root node carrying caller-supplied constraints.
    pub fn with_constraints(constraints: Vec<BranchConstraint>) -> Self {
        Self {
            id: 0,
            parent: None,
            parent_bound: None,
            constraints,
        }
    }

    /// Extends this node's path by one constraint.
    ///
    /// `id` must be unique within the search; `bound` is this node's
    /// relaxation objective, recorded on the child for tracing.
    pub fn child(&self, id: u64, constraint: BranchConstraint, bound: f64) -> Self {
        let mut constraints = Vec::with_capacity(self.constraints.len() + 1);
        constraints.extend_from_slice(&self.constraints);
        constraints.push(constraint);
        Self {
            id,
            parent: Some(self.id),
            parent_bound: Some(bound),
            constraints,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn parent(&self) -> Option<u64> {
        self.parent
    }

    /// Relaxation objective of the parent, `None` at the root.
    pub fn parent_bound(&self) -> Option<f64> {
        self.parent_bound
    }

    pub fn constraints(&self) -> &[BranchConstraint] {
        &self.constraints
    }

    /// Number of constraints on the path.
    pub fn depth(&self) -> usize {
        self.constraints.len()
    }
}
