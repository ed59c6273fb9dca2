//! Upper-bound heuristics used to warm-start the search.
//!
//! - [`nearest_neighbor_tour`] — greedy construction from vertex 0
//! - [`two_opt_improve`] — segment-reversal local search
//! - [`warm_start_tour`] — both, in sequence

mod nearest_neighbor;
mod two_opt;

pub use nearest_neighbor::nearest_neighbor_tour;
pub use two_opt::two_opt_improve;

use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Nearest-neighbour tour polished by 2-opt.
pub fn warm_start_tour(distances: &DistanceMatrix) -> Option<Tour> {
    nearest_neighbor_tour(distances).map(|t| two_opt_improve(&t, distances))
}
