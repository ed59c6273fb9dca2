//! 2-opt improvement of a closed tour.
//!
//! # Algorithm
//!
//! For each pair of positions `i < j` on the tour (vertex 0 stays fixed
//! in front), compute the change in length from reversing `order[i..=j]`:
//!
//! ```text
//! delta = d(prev_i, t[j]) + d(t[i], next_j) - d(prev_i, t[i]) - d(t[j], next_j)
//! ```
//!
//! If delta < 0, reverse the segment and keep scanning (first improvement).
//! Repeat until a full pass finds nothing.
//!
//! With asymmetric costs the reversed segment is traversed the other way, so
//! the delta also adds the change along `t[i..=j]`. Every accepted move
//! strictly shortens the tour, which bounds the number of passes.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Applies 2-opt to `tour`, keeping its first vertex in place.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::models::{Instance, Tour};
/// use u_tsp_exact::heuristic::two_opt_improve;
///
/// let instance = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let crossing = Tour::from_order(vec![0, 2, 1, 3], instance.distances());
/// let improved = two_opt_improve(&crossing, instance.distances());
/// assert!((improved.cost() - 4.0).abs() < 1e-10);
/// ```
pub fn two_opt_improve(tour: &Tour, distances: &DistanceMatrix) -> Tour {
    let order = tour.order();
    if order.len() < 4 {
        return tour.clone();
    }

    let start = order[0];
    let symmetric = distances.is_symmetric(1e-12);
    let mut current = order[1..].to_vec();
    let mut improved = true;

    while improved {
        improved = false;
        let n = current.len();

        for i in 0..n - 1 {
            for j in i + 1..n {
                let mut delta = two_opt_delta(&current, start, distances, i, j);
                if !symmetric {
                    delta += inner_reversal_delta(&current[i..=j], distances);
                }
                if delta < -1e-10 {
                    current[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }

    let mut full = Vec::with_capacity(order.len());
    full.push(start);
    full.extend(current);
    let candidate = Tour::from_order(full, distances);
    if candidate.cost() < tour.cost() {
        candidate
    } else {
        tour.clone()
    }
}

/// Length change from reversing `route[i..=j]`, where `route` is the tour
/// without its fixed `start` vertex.
fn two_opt_delta(
    route: &[usize],
    start: usize,
    distances: &DistanceMatrix,
    i: usize,
    j: usize,
) -> f64 {
    let n = route.len();
    let prev_i = if i == 0 { start } else { route[i - 1] };
    let next_j = if j == n - 1 { start } else { route[j + 1] };

    let old_cost = distances.get(prev_i, route[i]) + distances.get(route[j], next_j);
    let new_cost = distances.get(prev_i, route[j]) + distances.get(route[i], next_j);

    new_cost - old_cost
}

/// Change in the cost of the edges inside `segment` when it is walked
/// backwards. Zero for symmetric costs.
fn inner_reversal_delta(segment: &[usize], distances: &DistanceMatrix) -> f64 {
    segment
        .windows(2)
        .map(|w| distances.get(w[1], w[0]) - distances.get(w[0], w[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Instance;

    #[test]
    fn test_2opt_already_optimal() {
        let inst = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let tour = Tour::from_order(vec![0, 1, 2, 3], inst.distances());
        let improved = two_opt_improve(&tour, inst.distances());
        assert_eq!(improved, tour);
    }

    #[test]
    fn test_2opt_removes_crossing() {
        let inst = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let tour = Tour::from_order(vec![0, 2, 1, 3], inst.distances());
        let improved = two_opt_improve(&tour, inst.distances());
        assert!((improved.cost() - 4.0).abs() < 1e-10);
        assert_eq!(improved.order()[0], 0);
    }

    #[test]
    fn test_2opt_small_tour_untouched() {
        let inst = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let tour = Tour::from_order(vec![0, 2, 1], inst.distances());
        assert_eq!(two_opt_improve(&tour, inst.distances()), tour);
    }

    #[test]
    fn test_2opt_does_not_worsen() {
        let inst = Instance::from_points(&[
            (5.0, 5.0),
            (0.0, 0.0),
            (10.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
        ]);
        let tour = Tour::from_order(vec![0, 1, 4, 2, 3], inst.distances());
        let improved = two_opt_improve(&tour, inst.distances());
        assert!(improved.cost() <= tour.cost() + 1e-10);
    }

    #[test]
    fn test_2opt_terminates_on_asymmetric_costs() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let n = rng.random_range(5..=9);
            let mut dm = DistanceMatrix::new(n);
            for i in 0..n {
                for j in 0..n {
                    dm.set(i, j, rng.random_range(0..100) as f64);
                }
            }
            let start = Tour::from_order((0..n).collect(), &dm);
            let improved = two_opt_improve(&start, &dm);
            assert!(improved.cost() <= start.cost());
            assert!((improved.cost() - improved.length(&dm)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_inner_reversal_delta() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 1.0);
        dm.set(1, 0, 4.0);
        dm.set(1, 2, 2.0);
        dm.set(2, 1, 2.0);
        assert_eq!(inner_reversal_delta(&[0, 1, 2], &dm), 3.0);
        assert_eq!(inner_reversal_delta(&[2], &dm), 0.0);
    }
}
