//! Cyclic tour type.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;

/// An ordered cycle over vertex indices with its authoritative cost.
///
/// The closing edge back to `order[0]` is implicit. Tours produced by the
/// solver always start at vertex 0.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::models::{Instance, Tour};
///
/// let instance = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
/// let tour = Tour::from_order(vec![0, 1, 2], instance.distances());
/// assert!((tour.cost() - 4.0).abs() < 1e-10);
/// assert_eq!(tour.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 0)]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    order: Vec<usize>,
    cost: f64,
}

impl Tour {
    /// Creates a tour with a precomputed cost.
    pub fn new(order: Vec<usize>, cost: f64) -> Self {
        Self { order, cost }
    }

    /// Creates a tour, summing its cost from the matrix.
    pub fn from_order(order: Vec<usize>, distances: &DistanceMatrix) -> Self {
        let cost = cycle_length(&order, distances);
        Self { order, cost }
    }

    /// Visit order, starting vertex first.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of vertices visited.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Directed edges of the cycle, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.order.len();
        (0..n).map(move |k| (self.order[k], self.order[(k + 1) % n]))
    }

    /// Returns `true` if the directed edge `from → to` is on the tour.
    pub fn contains_edge(&self, from: usize, to: usize) -> bool {
        self.edges().any(|e| e == (from, to))
    }

    /// Vertex visited right after `vertex`, if it is on the tour.
    pub fn successor(&self, vertex: usize) -> Option<usize> {
        let pos = self.order.iter().position(|&v| v == vertex)?;
        Some(self.order[(pos + 1) % self.order.len()])
    }

    /// Recomputes the cycle length against a matrix.
    ///
    /// Display helper; [`cost`](Tour::cost) is the value the solver used.
    pub fn length(&self, distances: &DistanceMatrix) -> f64 {
        cycle_length(&self.order, distances)
    }
}

/// Total cost of `order[0] → … → order[n-1] → order[0]`.
fn cycle_length(order: &[usize], distances: &DistanceMatrix) -> f64 {
    if order.len() < 2 {
        return 0.0;
    }
    let n = order.len();
    (0..n)
        .map(|k| distances.get(order[k], order[(k + 1) % n]))
        .sum()
}
