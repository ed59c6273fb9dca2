//! Integral assignment to tour decoding.
//!
//! Walks the unit edges of an integral relaxation from vertex 0 and checks
//! that the walk is a single Hamiltonian cycle. A failure here means the
//! formulation let a subtour through, so it is reported as an error and
//! never turned into a tour.

use crate::distance::DistanceMatrix;
use crate::error::{Result, TspError};
use crate::models::Tour;
use crate::relaxation::EdgeValues;

/// Decodes an integral edge assignment into a tour starting at vertex 0.
///
/// The tour cost is the sum of the costs of the decoded edges.
///
/// # Errors
///
/// [`TspError::InvalidIntegralSolution`] if some vertex has zero or several
/// unit out-edges, or if the walk closes before visiting every vertex.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::decode::decode_tour;
/// use u_tsp_exact::models::Instance;
/// use u_tsp_exact::relaxation::EdgeValues;
///
/// let instance = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let values = EdgeValues::from_successors(&[3, 0, 1, 2]);
/// let tour = decode_tour(&values, instance.distances(), 1e-6).unwrap();
/// assert_eq!(tour.order(), &[0, 3, 2, 1]);
/// assert!((tour.cost() - 4.0).abs() < 1e-10);
///
/// // two 2-cycles: 0 ↔ 1 and 2 ↔ 3
/// let subtours = EdgeValues::from_successors(&[1, 0, 3, 2]);
/// assert!(decode_tour(&subtours, instance.distances(), 1e-6).is_err());
/// ```
pub fn decode_tour(values: &EdgeValues, distances: &DistanceMatrix, epsilon: f64) -> Result<Tour> {
    let n = values.size();
    if n == 0 || distances.size() != n {
        return Err(TspError::InvalidIntegralSolution(format!(
            "assignment over {n} vertices does not match a cost matrix of {}",
            distances.size()
        )));
    }
    let successors = successors(values, epsilon)?;

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut cost = 0.0;
    let mut current = 0;
    loop {
        visited[current] = true;
        order.push(current);
        let next = successors[current];
        cost += distances.get(current, next);
        if next == 0 {
            break;
        }
        if visited[next] {
            return Err(TspError::InvalidIntegralSolution(format!(
                "walk from vertex 0 re-enters vertex {next} after {} steps",
                order.len()
            )));
        }
        current = next;
    }

    if order.len() != n {
        return Err(TspError::InvalidIntegralSolution(format!(
            "cycle through vertex 0 covers {} of {n} vertices",
            order.len()
        )));
    }
    Ok(Tour::new(order, cost))
}

/// The unique unit out-edge of every vertex.
fn successors(values: &EdgeValues, epsilon: f64) -> Result<Vec<usize>> {
    let n = values.size();
    let mut succ = Vec::with_capacity(n);
    for i in 0..n {
        let mut unit = (0..n).filter(|&j| j != i && (values.get(i, j) - 1.0).abs() <= epsilon);
        match (unit.next(), unit.next()) {
            (Some(j), None) => succ.push(j),
            (None, _) => {
                return Err(TspError::InvalidIntegralSolution(format!(
                    "vertex {i} has no unit out-edge"
                )))
            }
            (Some(a), Some(b)) => {
                return Err(TspError::InvalidIntegralSolution(format!(
                    "vertex {i} has several unit out-edges ({a}, {b}, ...)"
                )))
            }
        }
    }
    Ok(succ)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Instance;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn unit_square() -> Instance {
        Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    #[test]
    fn test_decode_perimeter() {
        let inst = unit_square();
        let values = EdgeValues::from_successors(&[1, 2, 3, 0]);
        let tour = decode_tour(&values, inst.distances(), 1e-6).expect("hamiltonian");
        assert_eq!(tour.order(), &[0, 1, 2, 3]);
        assert!((tour.cost() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_decode_tolerates_noise() {
        let inst = unit_square();
        let mut values = EdgeValues::from_successors(&[2, 3, 1, 0]);
        values.set(0, 2, 1.0 - 5e-7);
        values.set(1, 0, 4e-7);
        let tour = decode_tour(&values, inst.distances(), 1e-6).expect("hamiltonian");
        assert_eq!(tour.order(), &[0, 2, 1, 3]);
    }

    #[test]
    fn test_decode_rejects_missing_out_edge() {
        let inst = unit_square();
        let mut values = EdgeValues::from_successors(&[1, 2, 3, 0]);
        values.set(2, 3, 0.5);
        assert!(matches!(
            decode_tour(&values, inst.distances(), 1e-6),
            Err(TspError::InvalidIntegralSolution(_))
        ));
    }

    #[test]
    fn test_decode_rejects_double_out_edge() {
        let inst = unit_square();
        let mut values = EdgeValues::from_successors(&[1, 2, 3, 0]);
        values.set(0, 3, 1.0);
        assert!(matches!(
            decode_tour(&values, inst.distances(), 1e-6),
            Err(TspError::InvalidIntegralSolution(_))
        ));
    }

    #[test]
    fn test_decode_rejects_tail_into_cycle() {
        // 0 → 1 → 2 → 1: vertex 0 is never re-entered
        let inst = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let values = EdgeValues::from_successors(&[1, 2, 1]);
        assert!(matches!(
            decode_tour(&values, inst.distances(), 1e-6),
            Err(TspError::InvalidIntegralSolution(_))
        ));
    }

    #[test]
    fn test_decode_size_mismatch() {
        let inst = unit_square();
        let values = EdgeValues::from_successors(&[1, 2, 0]);
        assert!(decode_tour(&values, inst.distances(), 1e-6).is_err());
    }

    fn points(max: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), 4..=max)
    }

    proptest! {
        #[test]
        fn prop_injected_two_subtour_is_rejected(pts in points(9), split in 0usize..1000) {
            let inst = Instance::from_points(&pts);
            let n = inst.len();
            // 2-cycle on {a, b}, Hamiltonian path-cycle on the rest
            let a = split % n;
            let b = (a + 1) % n;
            let rest: Vec<usize> = (0..n).filter(|&v| v != a && v != b).collect();
            let mut succ = vec![0; n];
            succ[a] = b;
            succ[b] = a;
            for k in 0..rest.len() {
                succ[rest[k]] = rest[(k + 1) % rest.len()];
            }
            let values = EdgeValues::from_successors(&succ);
            let result = decode_tour(&values, inst.distances(), 1e-6);
            prop_assert!(matches!(result, Err(TspError::InvalidIntegralSolution(_))));
        }

        #[test]
        fn prop_permutation_cycle_round_trips(pts in points(9), seed in any::<u64>()) {
            let inst = Instance::from_points(&pts);
            let n = inst.len();
            let mut rest: Vec<usize> = (1..n).collect();
            rest.shuffle(&mut StdRng::seed_from_u64(seed));
            let mut order = vec![0];
            order.extend(rest);
            let mut succ = vec![0; n];
            for k in 0..n {
                succ[order[k]] = order[(k + 1) % n];
            }
            let tour = decode_tour(&EdgeValues::from_successors(&succ), inst.distances(), 1e-6)
                .expect("hamiltonian");
            prop_assert_eq!(tour.order(), &order[..]);
            let expected = Tour::from_order(order.clone(), inst.distances()).cost();
            prop_assert!((tour.cost() - expected).abs() < 1e-9);
        }
    }
}
