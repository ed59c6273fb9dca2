//! Travel cost matrices.
//!
//! Provides the dense cost matrix an [`Instance`](crate::models::Instance)
//! derives from its vertices.

mod matrix;

pub use matrix::{DistanceMatrix, DIAGONAL_SENTINEL};
