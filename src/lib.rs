//! # u-tsp-exact
//!
//! Exact solver for the symmetric and asymmetric Travelling Salesman
//! Problem. Optimality is proven by branch-and-bound over LP relaxations of
//! the Miller-Tucker-Zemlin (MTZ) formulation.
//!
//! ## Modules
//!
//! - [`models`] — Instance, vertex, and tour types
//! - [`distance`] — Dense cost matrix
//! - [`relaxation`] — MTZ formulation and the LP backend seam
//! - [`branching`] — Edge-fixing constraints, search nodes, variable choice
//! - [`decode`] — Integral edge assignment to tour
//! - [`heuristic`] — Nearest-neighbour and 2-opt warm start
//! - [`search`] — Branch-and-bound orchestrator (sequential and parallel)
//! - [`config`] — Solver configuration
//!
//! ## Example
//!
//! ```
//! use u_tsp_exact::models::Instance;
//! use u_tsp_exact::{BranchAndBound, SolverConfig};
//!
//! let instance = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
//! let outcome = BranchAndBound::new(SolverConfig::default()).solve(&instance).unwrap();
//! let tour = outcome.tour().unwrap();
//! assert_eq!(tour.order()[0], 0);
//! assert!((tour.cost() - 4.0).abs() < 1e-6);
//! ```

pub mod branching;
pub mod config;
pub mod decode;
pub mod distance;
pub mod error;
pub mod heuristic;
pub mod models;
pub mod relaxation;
pub mod search;

pub use config::SolverConfig;
pub use error::{Result, TspError};
pub use search::{BranchAndBound, SolveOutcome, SolveStatus};
