//! Domain model types for the travelling salesman problem.
//!
//! Provides planar vertices, the instance that owns them together with
//! its cost matrix, and the cyclic tour returned by a solve.

mod instance;
mod tour;
mod vertex;

pub use instance::{Instance, MIN_VERTICES};
pub use tour::Tour;
pub use vertex::Vertex;
