//! Counters collected during a search.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Statistics of one branch-and-bound run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStatistics {
    /// Nodes whose relaxation was solved.
    pub nodes_explored: u64,
    /// Nodes discarded because their relaxation was infeasible or unbounded.
    pub pruned_infeasible: u64,
    /// Nodes discarded because their bound could not beat the incumbent.
    pub pruned_bound: u64,
    /// Nodes split into two children.
    pub branched: u64,
    /// Nodes whose relaxation was integral.
    pub integral_nodes: u64,
    /// Times the incumbent was replaced by a cheaper tour.
    pub incumbent_updates: u64,
    /// Longest constraint path seen.
    pub max_depth: usize,
    /// Relaxation objective at the root, if it was solved.
    pub root_lower_bound: Option<f64>,
    pub elapsed: Duration,
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self {
            nodes_explored: 0,
            pruned_infeasible: 0,
            pruned_bound: 0,
            branched: 0,
            integral_nodes: 0,
            incumbent_updates: 0,
            max_depth: 0,
            root_lower_bound: None,
            elapsed: Duration::ZERO,
        }
    }
}

impl SearchStatistics {
    #[inline]
    pub fn on_node_explored(&mut self, depth: usize) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_pruned_infeasible(&mut self) {
        self.pruned_infeasible = self.pruned_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruned_bound(&mut self) {
        self.pruned_bound = self.pruned_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_branched(&mut self) {
        self.branched = self.branched.saturating_add(1);
    }

    #[inline]
    pub fn on_integral(&mut self, improved: bool) {
        self.integral_nodes = self.integral_nodes.saturating_add(1);
        if improved {
            self.incumbent_updates = self.incumbent_updates.saturating_add(1);
        }
    }

    /// Folds a worker's counters into this one.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.pruned_infeasible = self.pruned_infeasible.saturating_add(other.pruned_infeasible);
        self.pruned_bound = self.pruned_bound.saturating_add(other.pruned_bound);
        self.branched = self.branched.saturating_add(other.branched);
        self.integral_nodes = self.integral_nodes.saturating_add(other.integral_nodes);
        self.incumbent_updates = self.incumbent_updates.saturating_add(other.incumbent_updates);
        self.max_depth = self.max_depth.max(other.max_depth);
        if self.root_lower_bound.is_none() {
            self.root_lower_bound = other.root_lower_bound;
        }
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Branch-and-Bound Statistics:")?;
        writeln!(f, "  Nodes explored:        {}", self.nodes_explored)?;
        writeln!(f, "  Pruned (infeasible):   {}", self.pruned_infeasible)?;
        writeln!(f, "  Pruned (bound):        {}", self.pruned_bound)?;
        writeln!(f, "  Branched:              {}", self.branched)?;
        writeln!(f, "  Integral nodes:        {}", self.integral_nodes)?;
        writeln!(f, "  Incumbent updates:     {}", self.incumbent_updates)?;
        writeln!(f, "  Max depth:             {}", self.max_depth)?;
        match self.root_lower_bound {
            Some(b) => writeln!(f, "  Root lower bound:      {b:.6}")?,
            None => writeln!(f, "  Root lower bound:      -")?,
        }
        writeln!(f, "  Total time:            {:.2?}", self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut s = SearchStatistics::default();
        s.on_node_explored(0);
        s.on_node_explored(3);
        s.on_pruned_bound();
        s.on_branched();
        s.on_integral(true);
        s.on_integral(false);
        assert_eq!(s.nodes_explored, 2);
        assert_eq!(s.max_depth, 3);
        assert_eq!(s.pruned_bound, 1);
        assert_eq!(s.integral_nodes, 2);
        assert_eq!(s.incumbent_updates, 1);
    }

    #[test]
    fn test_merge() {
        let mut a = SearchStatistics::default();
        a.on_node_explored(2);
        let mut b = SearchStatistics {
            root_lower_bound: Some(3.0),
            ..Default::default()
        };
        b.on_node_explored(5);
        b.on_pruned_infeasible();
        a.merge(&b);
        assert_eq!(a.nodes_explored, 2);
        assert_eq!(a.max_depth, 5);
        assert_eq!(a.pruned_infeasible, 1);
        assert_eq!(a.root_lower_bound, Some(3.0));
    }

    #[test]
    fn test_display_mentions_counts() {
        let mut s = SearchStatistics::default();
        s.on_node_explored(1);
        let text = s.to_string();
        assert!(text.contains("Nodes explored:        1"));
        assert!(text.contains("Root lower bound:      -"));
    }
}
