//! Branching variable selection.

use super::constraint::{BranchConstraint, EdgeFix, Node};
use crate::relaxation::EdgeValues;

/// What the search should do with an optimal relaxation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BranchDecision {
    /// Every edge value is 0 or 1 within tolerance; decode and accept.
    Integral,
    /// Split on `x[from][to]`, the variable closest to ½.
    Branch { from: usize, to: usize, value: f64 },
}

/// Most-fractional branching with a deterministic tie-break.
///
/// Among all edges with a strictly positive value, picks the one minimizing
/// `|x - 0.5|`; ties go to the first edge in row-major `(i, j)` order.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::branching::{BranchDecision, BranchingPolicy};
/// use u_tsp_exact::relaxation::EdgeValues;
///
/// let mut values = EdgeValues::zeros(3);
/// values.set(0, 1, 0.5);
/// values.set(0, 2, 0.5);
/// values.set(1, 2, 0.7);
///
/// let policy = BranchingPolicy::new(1e-6);
/// assert_eq!(
///     policy.decide(&values),
///     BranchDecision::Branch { from: 0, to: 1, value: 0.5 }
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchingPolicy {
    epsilon: f64,
}

impl BranchingPolicy {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Classifies an optimal relaxation as integral or picks a branching edge.
    pub fn decide(&self, values: &EdgeValues) -> BranchDecision {
        if values.is_integral(self.epsilon) {
            return BranchDecision::Integral;
        }
        let mut best: Option<(usize, usize, f64, f64)> = None;
        for (i, j, v) in values.iter() {
            if v <= 0.0 {
                continue;
            }
            let gap = (v - 0.5).abs();
            match best {
                Some((_, _, _, best_gap)) if gap >= best_gap => {}
                _ => best = Some((i, j, v, gap)),
            }
        }
        match best {
            Some((from, to, value, _)) => BranchDecision::Branch { from, to, value },
            // unreachable for a non-integral grid: some entry lies strictly inside (0, 1)
            None => BranchDecision::Integral,
        }
    }

    /// Children of `parent` for a branch on `from → to`, in push order.
    ///
    /// The `= 0` child comes first so that a LIFO open list explores the
    /// `= 1` child first. Ids are `next_id` and `next_id + 1`.
    pub fn children(
        parent: &Node,
        from: usize,
        to: usize,
        bound: f64,
        next_id: u64,
    ) -> [Node; 2] {
        [
            parent.child(next_id, BranchConstraint::new(from, to, EdgeFix::Excluded), bound),
            parent.child(
                next_id + 1,
                BranchConstraint::new(from, to, EdgeFix::Included),
                bound,
            ),
        ]
    }
}

impl Default for BranchingPolicy {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_solution_needs_no_branch() {
        let mut values = EdgeValues::from_successors(&[1, 2, 0]);
        values.set(0, 2, 3e-7);
        assert_eq!(BranchingPolicy::default().decide(&values), BranchDecision::Integral);
    }

    #[test]
    fn test_picks_value_closest_to_half() {
        let mut values = EdgeValues::zeros(4);
        values.set(0, 1, 0.9);
        values.set(1, 2, 0.2);
        values.set(2, 3, 0.45);
        values.set(3, 0, 1.0);
        let decision = BranchingPolicy::default().decide(&values);
        assert_eq!(decision, BranchDecision::Branch { from: 2, to: 3, value: 0.45 });
    }

    #[test]
    fn test_tie_goes_to_first_in_row_major_order() {
        let mut values = EdgeValues::zeros(3);
        values.set(2, 0, 0.4);
        values.set(1, 0, 0.6);
        values.set(1, 2, 0.4);
        // |0.6 - 0.5| == |0.4 - 0.5|; (1, 0) precedes (1, 2) and (2, 0)
        let decision = BranchingPolicy::default().decide(&values);
        assert_eq!(decision, BranchDecision::Branch { from: 1, to: 0, value: 0.6 });
    }

    #[test]
    fn test_near_binary_noise_never_beats_fractional() {
        let mut values = EdgeValues::zeros(3);
        values.set(0, 1, 1e-9);
        values.set(0, 2, 1.0 - 1e-9);
        values.set(2, 1, 0.97);
        let decision = BranchingPolicy::default().decide(&values);
        assert_eq!(decision, BranchDecision::Branch { from: 2, to: 1, value: 0.97 });
    }

    #[test]
    fn test_children_order_and_paths() {
        let parent = Node::with_constraints(vec![BranchConstraint::exclude(3, 1)]);
        let [zero, one] = BranchingPolicy::children(&parent, 0, 2, 2.5, 10);
        assert_eq!(zero.id(), 10);
        assert_eq!(one.id(), 11);
        assert_eq!(zero.constraints().last(), Some(&BranchConstraint::exclude(0, 2)));
        assert_eq!(one.constraints().last(), Some(&BranchConstraint::include(0, 2)));
        assert_eq!(zero.constraints()[0], parent.constraints()[0]);
        assert_eq!(one.parent_bound(), Some(2.5));
    }
}
