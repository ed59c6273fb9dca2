//! Per-node record of a search, for replay and auditing.

use serde::{Deserialize, Serialize};

use crate::branching::BranchConstraint;

/// Terminal state of an explored node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    /// Relaxation infeasible or unbounded.
    Infeasible,
    /// Relaxation bound no better than the incumbent.
    BoundPruned,
    /// Integral relaxation; its tour was offered to the incumbent.
    Accepted,
    /// Split into two children.
    Branched,
}

/// One explored node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u64,
    pub parent: Option<u64>,
    pub depth: usize,
    /// Constraint added by this node's parent, `None` at the root.
    pub last_constraint: Option<BranchConstraint>,
    /// Relaxation objective of the parent.
    pub parent_bound: Option<f64>,
    /// Relaxation objective, present when the relaxation was optimal.
    pub bound: Option<f64>,
    pub state: NodeState,
}

/// Ordered list of explored nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchTrace {
    records: Vec<NodeRecord>,
}

impl SearchTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: NodeRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sequence of branching constraints in exploration order.
    pub fn branching_path(&self) -> Vec<BranchConstraint> {
        self.records.iter().filter_map(|r| r.last_constraint).collect()
    }

    /// Appends another trace, then sorts by node id.
    pub(crate) fn merge(&mut self, other: SearchTrace) {
        self.records.extend(other.records);
        self.records.sort_by_key(|r| r.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, constraint: Option<BranchConstraint>) -> NodeRecord {
        NodeRecord {
            id,
            parent: id.checked_sub(1),
            depth: id as usize,
            last_constraint: constraint,
            parent_bound: None,
            bound: Some(1.0),
            state: NodeState::Branched,
        }
    }

    #[test]
    fn test_branching_path() {
        let mut t = SearchTrace::new();
        t.push(record(0, None));
        t.push(record(2, Some(BranchConstraint::include(0, 1))));
        t.push(record(1, Some(BranchConstraint::exclude(0, 1))));
        assert_eq!(t.len(), 3);
        assert_eq!(
            t.branching_path(),
            vec![BranchConstraint::include(0, 1), BranchConstraint::exclude(0, 1)]
        );
    }

    #[test]
    fn test_merge_sorts_by_id() {
        let mut a = SearchTrace::new();
        a.push(record(3, None));
        let mut b = SearchTrace::new();
        b.push(record(1, None));
        a.merge(b);
        let ids: Vec<u64> = a.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
