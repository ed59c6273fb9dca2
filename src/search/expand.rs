//! Processing of a single search node (build, solve, classify).
//!
//! Shared by the sequential and the parallel search; it touches no search
//! state except through the `upper_bound` callback, which is read right
//! before the bounding test.

use log::{trace, warn};

use crate::branching::{BranchDecision, BranchingPolicy, Node};
use crate::decode::decode_tour;
use crate::error::{Result, TspError};
use crate::models::{Instance, Tour};
use crate::relaxation::{Formulation, RelaxationSolver, RelaxationStatus};

use super::trace::{NodeRecord, NodeState};

/// What became of a node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expansion {
    Infeasible,
    BoundPruned { bound: f64 },
    Integral { bound: f64, tour: Tour },
    Branch { bound: f64, from: usize, to: usize },
}

impl Expansion {
    pub(crate) fn bound(&self) -> Option<f64> {
        match self {
            Expansion::Infeasible => None,
            Expansion::BoundPruned { bound }
            | Expansion::Integral { bound, .. }
            | Expansion::Branch { bound, .. } => Some(*bound),
        }
    }

    pub(crate) fn state(&self) -> NodeState {
        match self {
            Expansion::Infeasible => NodeState::Infeasible,
            Expansion::BoundPruned { .. } => NodeState::BoundPruned,
            Expansion::Integral { .. } => NodeState::Accepted,
            Expansion::Branch { .. } => NodeState::Branched,
        }
    }

    pub(crate) fn record(&self, node: &Node) -> NodeRecord {
        NodeRecord {
            id: node.id(),
            parent: node.parent(),
            depth: node.depth(),
            last_constraint: node.constraints().last().copied(),
            parent_bound: node.parent_bound(),
            bound: self.bound(),
            state: self.state(),
        }
    }
}

/// Runs steps build → solve → bound → branch-or-decode for one node.
pub(crate) struct NodeEvaluator<'a, S> {
    instance: &'a Instance,
    solver: &'a S,
    policy: BranchingPolicy,
}

impl<'a, S: RelaxationSolver> NodeEvaluator<'a, S> {
    pub(crate) fn new(instance: &'a Instance, solver: &'a S, epsilon: f64) -> Self {
        Self {
            instance,
            solver,
            policy: BranchingPolicy::new(epsilon),
        }
    }

    pub(crate) fn expand<F>(&self, node: &Node, upper_bound: F) -> Result<Expansion>
    where
        F: Fn() -> f64,
    {
        let formulation = Formulation::build(self.instance, node.constraints())?;
        let result = self.solver.solve(&formulation)?;

        match result.status {
            RelaxationStatus::Optimal => {}
            RelaxationStatus::Infeasible => {
                trace!("node {} (depth {}): infeasible", node.id(), node.depth());
                return Ok(Expansion::Infeasible);
            }
            RelaxationStatus::Unbounded => {
                warn!(
                    "node {}: {} reported an unbounded relaxation; pruning",
                    node.id(),
                    self.solver.name()
                );
                return Ok(Expansion::Infeasible);
            }
            RelaxationStatus::SolverError => {
                return Err(TspError::Relaxation(format!(
                    "{} failed on node {}: {}",
                    self.solver.name(),
                    node.id(),
                    result.message.as_deref().unwrap_or("no details")
                )));
            }
        }

        let bound = result.objective;
        let upper = upper_bound();
        if bound >= upper {
            trace!(
                "node {} (depth {}): bound {bound:.6} >= incumbent {upper:.6}",
                node.id(),
                node.depth()
            );
            return Ok(Expansion::BoundPruned { bound });
        }

        let values = result.edge_values(&formulation);
        match self.policy.decide(&values) {
            BranchDecision::Integral => {
                let tour = decode_tour(&values, self.instance.distances(), self.policy.epsilon())?;
                trace!(
                    "node {} (depth {}): integral, tour cost {:.6}",
                    node.id(),
                    node.depth(),
                    tour.cost()
                );
                Ok(Expansion::Integral { bound, tour })
            }
            BranchDecision::Branch { from, to, value } => {
                trace!(
                    "node {} (depth {}): bound {bound:.6}, branching on x[{from}][{to}] = {value:.6}",
                    node.id(),
                    node.depth()
                );
                Ok(Expansion::Branch { bound, from, to })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::BranchConstraint;
    use crate::relaxation::MicrolpSolver;

    fn unit_square() -> Instance {
        Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    #[test]
    fn test_expand_prunes_on_bound() {
        let inst = unit_square();
        let eval = NodeEvaluator::new(&inst, &MicrolpSolver, 1e-6);
        let e = eval.expand(&Node::root(), || 1.0).expect("solved");
        assert!(matches!(e, Expansion::BoundPruned { .. }));
        assert_eq!(e.state(), NodeState::BoundPruned);
    }

    #[test]
    fn test_expand_reports_infeasible() {
        let inst = unit_square();
        let eval = NodeEvaluator::new(&inst, &MicrolpSolver, 1e-6);
        let node = Node::with_constraints(vec![
            BranchConstraint::include(0, 1),
            BranchConstraint::include(0, 2),
        ]);
        let e = eval.expand(&node, || f64::INFINITY).expect("solved");
        assert_eq!(e, Expansion::Infeasible);
        assert!(e.bound().is_none());
    }

    #[test]
    fn test_expand_fixed_tour_is_integral() {
        let inst = unit_square();
        let eval = NodeEvaluator::new(&inst, &MicrolpSolver, 1e-6);
        let node = Node::with_constraints(vec![
            BranchConstraint::include(0, 1),
            BranchConstraint::include(1, 2),
            BranchConstraint::include(2, 3),
        ]);
        match eval.expand(&node, || f64::INFINITY).expect("solved") {
            Expansion::Integral { bound, tour } => {
                assert!((bound - 4.0).abs() < 1e-6);
                assert_eq!(tour.order(), &[0, 1, 2, 3]);
            }
            other => panic!("expected integral node, got {other:?}"),
        }
    }

    #[test]
    fn test_record_carries_node_identity() {
        let node = Node::root().child(5, BranchConstraint::exclude(1, 2), 3.0);
        let record = Expansion::BoundPruned { bound: 3.5 }.record(&node);
        assert_eq!(record.id, 5);
        assert_eq!(record.parent, Some(0));
        assert_eq!(record.depth, 1);
        assert_eq!(record.last_constraint, Some(BranchConstraint::exclude(1, 2)));
        assert_eq!(record.parent_bound, Some(3.0));
        assert_eq!(record.bound, Some(3.5));
    }
}
