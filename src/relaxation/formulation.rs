//! MTZ linear relaxation of the TSP.
//!
//! # Model
//!
//! For an instance of `n` vertices with costs `d`:
//!
//! ```text
//! minimize    Σ_{i≠j} d[i][j] · x[i][j]
//! subject to  Σ_j x[i][j] = 1                      for every i   (out-degree)
//!             Σ_i x[i][j] = 1                      for every j   (in-degree)
//!             u[i] - u[j] + n · x[i][j] ≤ n - 1    for i, j ≥ 1, i ≠ j
//!             x[i][j] = v                          for every branch constraint
//!             0 ≤ x[i][j] ≤ 1,  0 ≤ u[i] ≤ n - 1
//! ```
//!
//! Vertex 0 is the reference point of the cycle and has no `u` variable.
//! The `u` variables stay continuous: the MTZ rows cut off every integral
//! subtour that avoids vertex 0, and integrality of `x` is left to branching.
//!
//! # Reference
//!
//! Miller, C.E., Tucker, A.W., Zemlin, R.A. (1960). "Integer programming
//! formulation of traveling salesman problems", *Journal of the ACM* 7(4),
//! 326-329.

use crate::branching::BranchConstraint;
use crate::error::{Result, TspError};
use crate::models::Instance;

/// Bounds and objective coefficient of one LP column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub lower: f64,
    pub upper: f64,
    pub objective: f64,
}

/// Relation between a constraint's left- and right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Le,
    Ge,
}

/// Where a row of the model comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowKind {
    OutDegree(usize),
    InDegree(usize),
    Mtz(usize, usize),
    Branch(BranchConstraint),
}

/// One linear row: `Σ coeff · var  (relation)  rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub terms: Vec<(usize, f64)>,
    pub relation: Relation,
    pub rhs: f64,
    pub kind: RowKind,
}

/// Objective direction of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

/// A complete, backend-independent LP model for one search node.
///
/// Columns are laid out as all `x[i][j]` (row-major, diagonal skipped)
/// followed by `u[1..n]`.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::models::Instance;
/// use u_tsp_exact::branching::BranchConstraint;
/// use u_tsp_exact::relaxation::Formulation;
///
/// let instance = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let f = Formulation::build(&instance, &[BranchConstraint::exclude(0, 1)]).unwrap();
/// // 12 edge columns + 3 ordering columns
/// assert_eq!(f.variables().len(), 15);
/// // 4 out-degree + 4 in-degree + 6 MTZ + 1 branch row
/// assert_eq!(f.constraints().len(), 15);
/// ```
#[derive(Debug, Clone)]
pub struct Formulation {
    size: usize,
    direction: Direction,
    variables: Vec<Variable>,
    edge_columns: Vec<Option<usize>>,
    order_columns: Vec<Option<usize>>,
    constraints: Vec<LinearConstraint>,
}

impl Formulation {
    /// Builds the base model plus one equality row per branch constraint.
    ///
    /// Contradictory constraints are passed through unchanged; they show up
    /// as an infeasible relaxation rather than a build error.
    pub fn build(instance: &Instance, branch: &[BranchConstraint]) -> Result<Self> {
        instance.validate()?;
        let n = instance.len();

        let mut variables = Vec::with_capacity(n * n - 1);
        let mut edge_columns = vec![None; n * n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                edge_columns[i * n + j] = Some(variables.len());
                variables.push(Variable {
                    lower: 0.0,
                    upper: 1.0,
                    objective: instance.distance(i, j),
                });
            }
        }

        let order_bound = (n - 1) as f64;
        let mut order_columns = vec![None; n];
        for col in order_columns.iter_mut().skip(1) {
            *col = Some(variables.len());
            variables.push(Variable {
                lower: 0.0,
                upper: order_bound,
                objective: 0.0,
            });
        }

        let mut f = Self {
            size: n,
            direction: Direction::Minimize,
            variables,
            edge_columns,
            order_columns,
            constraints: Vec::new(),
        };
        f.add_degree_rows();
        f.add_mtz_rows();
        for &c in branch {
            f.add_branch_row(c)?;
        }
        Ok(f)
    }

    fn add_degree_rows(&mut self) {
        let n = self.size;
        for i in 0..n {
            let terms = (0..n)
                .filter_map(|j| self.edge_column(i, j).map(|col| (col, 1.0)))
                .collect();
            self.constraints.push(LinearConstraint {
                terms,
                relation: Relation::Eq,
                rhs: 1.0,
                kind: RowKind::OutDegree(i),
            });
        }
        for j in 0..n {
            let terms = (0..n)
                .filter_map(|i| self.edge_column(i, j).map(|col| (col, 1.0)))
                .collect();
            self.constraints.push(LinearConstraint {
                terms,
                relation: Relation::Eq,
                rhs: 1.0,
                kind: RowKind::InDegree(j),
            });
        }
    }

    fn add_mtz_rows(&mut self) {
        let n = self.size;
        let big = n as f64;
        for i in 1..n {
            for j in 1..n {
                if i == j {
                    continue;
                }
                let (Some(ui), Some(uj), Some(xij)) = (
                    self.order_columns[i],
                    self.order_columns[j],
                    self.edge_column(i, j),
                ) else {
                    continue;
                };
                self.constraints.push(LinearConstraint {
                    terms: vec![(ui, 1.0), (uj, -1.0), (xij, big)],
                    relation: Relation::Le,
                    rhs: big - 1.0,
                    kind: RowKind::Mtz(i, j),
                });
            }
        }
    }

    fn add_branch_row(&mut self, c: BranchConstraint) -> Result<()> {
        let col = self.edge_column(c.from, c.to).ok_or_else(|| {
            TspError::InvalidBranchConstraint(format!(
                "{c} has no edge variable in an instance of {} vertices",
                self.size
            ))
        })?;
        self.constraints.push(LinearConstraint {
            terms: vec![(col, 1.0)],
            relation: Relation::Eq,
            rhs: c.fix.value(),
            kind: RowKind::Branch(c),
        });
        Ok(())
    }

    /// Number of vertices in the underlying instance.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Column of `x[from][to]`; `None` on the diagonal or out of range.
    #[inline]
    pub fn edge_column(&self, from: usize, to: usize) -> Option<usize> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.edge_columns[from * self.size + to]
    }

    /// Column of `u[vertex]`; `None` for vertex 0.
    pub fn order_column(&self, vertex: usize) -> Option<usize> {
        self.order_columns.get(vertex).copied().flatten()
    }

    /// Branch rows in the order they were added.
    pub fn branch_constraints(&self) -> impl Iterator<Item = BranchConstraint> + '_ {
        self.constraints.iter().filter_map(|row| match row.kind {
            RowKind::Branch(c) => Some(c),
            _ => None,
        })
    }
}
