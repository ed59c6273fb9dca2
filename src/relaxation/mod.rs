//! LP relaxations of the TSP.
//!
//! - [`Formulation`] — MTZ model for one search node
//! - [`RelaxationSolver`] — backend seam, with [`MicrolpSolver`] as default
//! - [`EdgeValues`] — dense grid of edge-variable values

mod formulation;
mod solver;
mod values;

pub use formulation::{
    Direction, Formulation, LinearConstraint, Relation, RowKind, Variable,
};
pub use solver::{MicrolpSolver, RelaxationResult, RelaxationSolver, RelaxationStatus};
pub use values::{is_near_binary, EdgeValues};
