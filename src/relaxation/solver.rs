//! Adapter between [`Formulation`] and an LP backend.

use log::trace;
use microlp::{ComparisonOp, OptimizationDirection, Problem};

use super::formulation::{Direction, Formulation, Relation};
use super::values::EdgeValues;
use crate::error::Result;

/// Termination status reported for one relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationStatus {
    Optimal,
    Infeasible,
    Unbounded,
    SolverError,
}

/// Normalized output of one LP solve.
///
/// `objective` and `values` are meaningful only when `status` is
/// [`RelaxationStatus::Optimal`]; otherwise `objective` is NaN and `values`
/// is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationResult {
    pub status: RelaxationStatus,
    pub objective: f64,
    pub values: Vec<f64>,
    pub message: Option<String>,
}

impl RelaxationResult {
    pub fn optimal(objective: f64, values: Vec<f64>) -> Self {
        Self {
            status: RelaxationStatus::Optimal,
            objective,
            values,
            message: None,
        }
    }

    /// A non-optimal result carrying no values.
    pub fn without_solution(status: RelaxationStatus, message: Option<String>) -> Self {
        Self {
            status,
            objective: f64::NAN,
            values: Vec::new(),
            message,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == RelaxationStatus::Optimal
    }

    /// Extracts the `x[i][j]` values into a dense grid.
    ///
    /// Entries are 0 when the result holds no values.
    pub fn edge_values(&self, formulation: &Formulation) -> EdgeValues {
        let n = formulation.size();
        let mut grid = EdgeValues::zeros(n);
        for i in 0..n {
            for j in 0..n {
                let value = formulation
                    .edge_column(i, j)
                    .and_then(|col| self.values.get(col));
                if let Some(&v) = value {
                    grid.set(i, j, v);
                }
            }
        }
        grid
    }
}

/// A continuous LP backend.
///
/// Implementations must not keep state between calls: every node hands over
/// a freshly built model, and the parallel search shares one solver across
/// worker threads.
pub trait RelaxationSolver: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Checks that the backend can be instantiated.
    ///
    /// Called once before any node is solved; an error here aborts the solve
    /// with [`TspError::SolverUnavailable`](crate::error::TspError::SolverUnavailable).
    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    /// Solves the continuous relaxation of `formulation`.
    ///
    /// Infeasibility, unboundedness and backend failures are statuses, not
    /// errors; `Err` is reserved for an unavailable backend.
    fn solve(&self, formulation: &Formulation) -> Result<RelaxationResult>;
}

/// Pure-Rust dual simplex backend provided by `microlp`.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::models::Instance;
/// use u_tsp_exact::relaxation::{Formulation, MicrolpSolver, RelaxationSolver, RelaxationStatus};
///
/// let instance = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let f = Formulation::build(&instance, &[]).unwrap();
/// let result = MicrolpSolver.solve(&f).unwrap();
/// assert_eq!(result.status, RelaxationStatus::Optimal);
/// assert!(result.objective <= 4.0 + 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpSolver;

impl RelaxationSolver for MicrolpSolver {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&self, formulation: &Formulation) -> Result<RelaxationResult> {
        let direction = match formulation.direction() {
            Direction::Minimize => OptimizationDirection::Minimize,
            Direction::Maximize => OptimizationDirection::Maximize,
        };
        let mut problem = Problem::new(direction);
        let columns: Vec<_> = formulation
            .variables()
            .iter()
            .map(|v| problem.add_var(v.objective, (v.lower, v.upper)))
            .collect();

        for row in formulation.constraints() {
            let op = match row.relation {
                Relation::Eq => ComparisonOp::Eq,
                Relation::Le => ComparisonOp::Le,
                Relation::Ge => ComparisonOp::Ge,
            };
            let terms: Vec<_> = row
                .terms
                .iter()
                .map(|&(col, coeff)| (columns[col], coeff))
                .collect();
            problem.add_constraint(terms, op, row.rhs);
        }

        let result = match problem.solve() {
            Ok(solution) => {
                let values = columns.iter().map(|&var| solution[var]).collect();
                RelaxationResult::optimal(solution.objective(), values)
            }
            Err(microlp::Error::Infeasible) => {
                RelaxationResult::without_solution(RelaxationStatus::Infeasible, None)
            }
            Err(microlp::Error::Unbounded) => {
                RelaxationResult::without_solution(RelaxationStatus::Unbounded, None)
            }
            Err(e) => RelaxationResult::without_solution(
                RelaxationStatus::SolverError,
                Some(e.to_string()),
            ),
        };
        trace!(
            "{}: {} columns, {} rows -> {:?}",
            self.name(),
            columns.len(),
            formulation.constraints().len(),
            result.status
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::BranchConstraint;
    use crate::models::Instance;

    fn unit_square() -> Instance {
        Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    fn solve(instance: &Instance, branch: &[BranchConstraint]) -> (Formulation, RelaxationResult) {
        let f = Formulation::build(instance, branch).expect("valid");
        let r = MicrolpSolver.solve(&f).expect("available");
        (f, r)
    }

    #[test]
    fn test_root_relaxation_is_optimal_and_feasible() {
        let (f, r) = solve(&unit_square(), &[]);
        assert!(r.is_optimal());
        assert_eq!(r.values.len(), f.variables().len());
        let x = r.edge_values(&f);
        for i in 0..4 {
            let out: f64 = (0..4).map(|j| x.get(i, j)).sum();
            let inc: f64 = (0..4).map(|j| x.get(j, i)).sum();
            assert!((out - 1.0).abs() < 1e-6);
            assert!((inc - 1.0).abs() < 1e-6);
        }
        // the LP objective matches the edge costs of its own solution
        let weighted = x.weighted_sum(|i, j| unit_square().distance(i, j));
        assert!((weighted - r.objective).abs() < 1e-6);
        assert!(r.objective <= 4.0 + 1e-6);
    }

    #[test]
    fn test_contradictory_constraints_are_infeasible() {
        let branch = [
            BranchConstraint::include(0, 1),
            BranchConstraint::exclude(0, 1),
        ];
        let (_, r) = solve(&unit_square(), &branch);
        assert_eq!(r.status, RelaxationStatus::Infeasible);
        assert!(r.values.is_empty());
        assert!(r.objective.is_nan());
    }

    #[test]
    fn test_excluding_every_exit_is_infeasible() {
        let branch = [
            BranchConstraint::exclude(0, 1),
            BranchConstraint::exclude(0, 2),
            BranchConstraint::exclude(0, 3),
        ];
        let (_, r) = solve(&unit_square(), &branch);
        assert_eq!(r.status, RelaxationStatus::Infeasible);
    }

    #[test]
    fn test_fixed_edge_is_respected() {
        let (f, r) = solve(&unit_square(), &[BranchConstraint::include(0, 2)]);
        assert!(r.is_optimal());
        assert!((r.edge_values(&f).get(0, 2) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_edge_values_empty_on_failure() {
        let f = Formulation::build(&unit_square(), &[]).expect("valid");
        let r = RelaxationResult::without_solution(RelaxationStatus::SolverError, None);
        assert_eq!(r.edge_values(&f), EdgeValues::zeros(4));
    }
}
