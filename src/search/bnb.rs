//! Branch-and-bound over MTZ relaxations.
//!
//! # Algorithm
//!
//! Nodes are kept on a LIFO open list. For each popped node:
//!
//! 1. Build the node's formulation from scratch and solve it.
//! 2. Infeasible (or unbounded) relaxation: discard the subtree.
//! 3. Relaxation objective ≥ incumbent cost: discard the subtree.
//! 4. Integral relaxation: decode the tour and keep it if strictly cheaper.
//! 5. Otherwise branch on the most fractional edge and push the `= 0` child,
//!    then the `= 1` child, so the `= 1` child is explored first.
//!
//! The search ends when the open list is empty, or earlier when a stop
//! condition fires between pops. Exploration order is fully determined by
//! the instance, so repeated runs produce the same tour and trace.

use std::time::Instant;

use log::{debug, error, info};

use crate::branching::{BranchConstraint, BranchingPolicy, Node};
use crate::config::SolverConfig;
use crate::error::{Result, TspError};
use crate::heuristic::warm_start_tour;
use crate::models::Instance;
use crate::relaxation::{MicrolpSolver, RelaxationSolver};

use super::control::{ArmedControl, SearchControl, StopReason};
use super::expand::{Expansion, NodeEvaluator};
use super::incumbent::Incumbent;
use super::parallel;
use super::result::{SolveOutcome, SolveStatus};
use super::stats::SearchStatistics;
use super::trace::SearchTrace;

/// Exact TSP solver.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::models::Instance;
/// use u_tsp_exact::search::BranchAndBound;
/// use u_tsp_exact::SolverConfig;
///
/// let instance = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let outcome = BranchAndBound::new(SolverConfig::default()).solve(&instance).unwrap();
/// assert!(outcome.is_optimal());
/// assert!((outcome.cost() - 4.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct BranchAndBound<S = MicrolpSolver> {
    config: SolverConfig,
    solver: S,
}

impl BranchAndBound<MicrolpSolver> {
    /// Creates a solver backed by `microlp`.
    pub fn new(config: SolverConfig) -> Self {
        Self::with_solver(config, MicrolpSolver)
    }
}

impl Default for BranchAndBound<MicrolpSolver> {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

/// State carried out of a search loop.
pub(crate) struct SearchRun {
    pub(crate) incumbent: Incumbent,
    pub(crate) statistics: SearchStatistics,
    pub(crate) trace: Option<SearchTrace>,
    pub(crate) stop: Option<StopReason>,
}

impl<S: RelaxationSolver> BranchAndBound<S> {
    /// Creates a solver backed by a custom relaxation backend.
    pub fn with_solver(config: SolverConfig, solver: S) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Solves `instance` to optimality.
    pub fn solve(&self, instance: &Instance) -> Result<SolveOutcome> {
        self.solve_with_control(instance, &SearchControl::new())
    }

    /// Solves `instance`, stopping early if `control` says so.
    pub fn solve_with_control(
        &self,
        instance: &Instance,
        control: &SearchControl,
    ) -> Result<SolveOutcome> {
        self.solve_from(instance, Vec::new(), control)
    }

    /// Solves `instance` below a root node that already carries `root`
    /// constraints.
    ///
    /// With a non-empty root, exhausting the tree without a tour yields
    /// [`SolveStatus::Infeasible`]. With an empty root the formulation
    /// always admits a tour, so the same situation is reported as
    /// [`TspError::InvariantViolation`].
    pub fn solve_from(
        &self,
        instance: &Instance,
        root: Vec<BranchConstraint>,
        control: &SearchControl,
    ) -> Result<SolveOutcome> {
        self.config.validate()?;
        instance.validate()?;
        self.solver.ensure_available()?;

        let started = Instant::now();
        let armed = control.arm(&self.config, started);
        let constrained_root = !root.is_empty();
        info!(
            "solving {} vertices with {} ({} thread(s), {} root constraint(s))",
            instance.len(),
            self.solver.name(),
            self.config.threads,
            root.len()
        );

        let mut incumbent = Incumbent::new();
        if self.config.warm_start && !constrained_root {
            if let Some(tour) = warm_start_tour(instance.distances()) {
                debug!("warm start tour with cost {:.6}", tour.cost());
                incumbent.try_improve(tour);
            }
        }

        let evaluator = NodeEvaluator::new(instance, &self.solver, self.config.epsilon);
        let root = Node::with_constraints(root);
        let mut run = if self.config.threads > 1 {
            parallel::search(
                &evaluator,
                root,
                incumbent,
                &armed,
                self.config.threads,
                self.config.record_trace,
            )?
        } else {
            self.sequential(&evaluator, root, incumbent, &armed)?
        };
        run.statistics.elapsed = started.elapsed();

        let tour = run.incumbent.into_tour();
        let status = match (run.stop, &tour) {
            (Some(reason), _) => SolveStatus::Interrupted(reason),
            (None, Some(_)) => SolveStatus::Optimal,
            (None, None) if constrained_root => SolveStatus::Infeasible,
            (None, None) => {
                error!("search exhausted without a tour on an unconstrained root");
                return Err(TspError::InvariantViolation(
                    "no tour found although the unconstrained formulation admits one".into(),
                ));
            }
        };

        match &tour {
            Some(t) => info!(
                "{:?}: cost {:.6} after {} nodes in {:.2?}",
                status, t.cost(), run.statistics.nodes_explored, run.statistics.elapsed
            ),
            None => info!(
                "{:?}: no tour after {} nodes in {:.2?}",
                status, run.statistics.nodes_explored, run.statistics.elapsed
            ),
        }
        Ok(SolveOutcome::new(status, tour, run.statistics, run.trace))
    }

    fn sequential(
        &self,
        evaluator: &NodeEvaluator<'_, S>,
        root: Node,
        mut incumbent: Incumbent,
        armed: &ArmedControl<'_>,
    ) -> Result<SearchRun> {
        let mut statistics = SearchStatistics::default();
        let mut trace = self.config.record_trace.then(SearchTrace::new);
        let mut open = vec![root];
        let mut next_id: u64 = 1;
        let mut popped: u64 = 0;
        let mut stop = None;

        while !open.is_empty() {
            if let Some(reason) = armed.check(popped) {
                debug!("stopping with {} open node(s): {reason}", open.len());
                stop = Some(reason);
                break;
            }
            let Some(node) = open.pop() else {
                break;
            };
            popped += 1;

            let expansion = evaluator.expand(&node, || incumbent.cost())?;
            statistics.on_node_explored(node.depth());
            if node.parent().is_none() {
                statistics.root_lower_bound = expansion.bound();
            }
            if let Some(trace) = trace.as_mut() {
                trace.push(expansion.record(&node));
            }

            match expansion {
                Expansion::Infeasible => statistics.on_pruned_infeasible(),
                Expansion::BoundPruned { .. } => statistics.on_pruned_bound(),
                Expansion::Integral { tour, .. } => {
                    let cost = tour.cost();
                    let improved = incumbent.try_improve(tour);
                    if improved {
                        debug!("node {}: new incumbent with cost {cost:.6}", node.id());
                    }
                    statistics.on_integral(improved);
                }
                Expansion::Branch { bound, from, to } => {
                    statistics.on_branched();
                    open.extend(BranchingPolicy::children(&node, from, to, bound, next_id));
                    next_id += 2;
                }
            }
        }

        Ok(SearchRun {
            incumbent,
            statistics,
            trace,
            stop,
        })
    }
}
