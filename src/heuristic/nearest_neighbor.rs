//! Nearest-neighbour tour construction.
//!
//! Starting from vertex 0, repeatedly moves to the closest unvisited vertex,
//! then closes the cycle.
//!
//! # Complexity
//!
//! O(n²).

use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Builds a tour greedily from vertex 0.
///
/// Ties go to the lower vertex index. Returns `None` for an empty matrix.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::models::Instance;
/// use u_tsp_exact::heuristic::nearest_neighbor_tour;
///
/// let instance = Instance::from_points(&[(0.0, 0.0), (10.0, 0.0), (1.0, 0.0)]);
/// let tour = nearest_neighbor_tour(instance.distances()).unwrap();
/// assert_eq!(tour.order(), &[0, 2, 1]);
/// ```
pub fn nearest_neighbor_tour(distances: &DistanceMatrix) -> Option<Tour> {
    let n = distances.size();
    if n == 0 {
        return None;
    }

    let mut unvisited: Vec<usize> = (1..n).collect();
    let mut order = Vec::with_capacity(n);
    order.push(0);
    let mut current = 0;
    while let Some(next) = distances.nearest_neighbor(current, &unvisited) {
        unvisited.retain(|&v| v != next);
        order.push(next);
        current = next;
    }
    Some(Tour::from_order(order, distances))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Instance;

    #[test]
    fn test_nn_line() {
        let inst = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let tour = nearest_neighbor_tour(inst.distances()).expect("non-empty");
        assert_eq!(tour.order(), &[0, 1, 2, 3]);
        // 1 + 1 + 1 + 3
        assert!((tour.cost() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_nn_chooses_nearest() {
        let inst = Instance::from_points(&[(0.0, 0.0), (10.0, 0.0), (1.0, 0.0)]);
        let tour = nearest_neighbor_tour(inst.distances()).expect("non-empty");
        assert_eq!(tour.order(), &[0, 2, 1]);
    }

    #[test]
    fn test_nn_visits_every_vertex_once() {
        let inst = Instance::from_points(&[
            (5.0, 5.0),
            (0.0, 0.0),
            (10.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
        ]);
        let tour = nearest_neighbor_tour(inst.distances()).expect("non-empty");
        let mut seen = tour.order().to_vec();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_nn_empty() {
        assert!(nearest_neighbor_tour(&DistanceMatrix::new(0)).is_none());
    }
}
