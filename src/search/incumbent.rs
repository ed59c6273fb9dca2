//! Best-known tour bookkeeping.
//!
//! [`Incumbent`] is the plain record owned by the sequential search.
//! [`SharedIncumbent`] wraps it for the worker pool: the tour lives behind a
//! `Mutex`, and its cost is mirrored into an atomic so that the bound check
//! before pruning reads the latest value without taking the lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::models::Tour;

/// Best integral tour found so far. Cost is `+∞` until a tour is installed.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::models::Tour;
/// use u_tsp_exact::search::Incumbent;
///
/// let mut inc = Incumbent::new();
/// assert_eq!(inc.cost(), f64::INFINITY);
/// assert!(inc.try_improve(Tour::new(vec![0, 1, 2], 10.0)));
/// assert!(!inc.try_improve(Tour::new(vec![0, 2, 1], 10.0)));
/// assert_eq!(inc.tour().unwrap().order(), &[0, 1, 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Incumbent {
    best: Option<Tour>,
}

impl Incumbent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cost(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, Tour::cost)
    }

    pub fn tour(&self) -> Option<&Tour> {
        self.best.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.best.is_some()
    }

    /// Installs `tour` if it is strictly cheaper than the current best.
    pub fn try_improve(&mut self, tour: Tour) -> bool {
        if tour.cost() < self.cost() {
            self.best = Some(tour);
            true
        } else {
            false
        }
    }

    pub fn into_tour(self) -> Option<Tour> {
        self.best
    }
}

/// An [`Incumbent`] shared between worker threads.
#[derive(Debug)]
pub struct SharedIncumbent {
    cost_bits: AtomicU64,
    inner: Mutex<Incumbent>,
}

impl Default for SharedIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedIncumbent {
    pub fn new() -> Self {
        Self::from_incumbent(Incumbent::new())
    }

    pub fn from_incumbent(incumbent: Incumbent) -> Self {
        Self {
            cost_bits: AtomicU64::new(incumbent.cost().to_bits()),
            inner: Mutex::new(incumbent),
        }
    }

    /// Current best cost, `+∞` when empty.
    #[inline]
    pub fn cost(&self) -> f64 {
        f64::from_bits(self.cost_bits.load(Ordering::Acquire))
    }

    /// Installs `tour` if it is strictly cheaper, re-checking under the lock.
    pub fn try_install(&self, tour: Tour) -> bool {
        if tour.cost() >= self.cost() {
            return false;
        }
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let cost = tour.cost();
        if guard.try_improve(tour) {
            self.cost_bits.store(cost.to_bits(), Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Clone of the current best tour.
    pub fn snapshot(&self) -> Option<Tour> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tour()
            .cloned()
    }

    pub fn into_inner(self) -> Incumbent {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_incumbent_starts_empty() {
        let inc = Incumbent::new();
        assert!(!inc.is_set());
        assert!(inc.tour().is_none());
        assert!(inc.cost().is_infinite());
    }

    #[test]
    fn test_incumbent_strict_improvement() {
        let mut inc = Incumbent::new();
        assert!(inc.try_improve(Tour::new(vec![0, 1, 2], 5.0)));
        assert!(!inc.try_improve(Tour::new(vec![0, 2, 1], 5.0)));
        assert!(!inc.try_improve(Tour::new(vec![0, 2, 1], 6.0)));
        assert!(inc.try_improve(Tour::new(vec![0, 2, 1], 4.5)));
        assert_eq!(inc.cost(), 4.5);
        assert_eq!(inc.into_tour().expect("set").order(), &[0, 2, 1]);
    }

    #[test]
    fn test_shared_incumbent_mirrors_cost() {
        let shared = SharedIncumbent::new();
        assert!(shared.cost().is_infinite());
        assert!(shared.try_install(Tour::new(vec![0, 1, 2], 7.0)));
        assert_eq!(shared.cost(), 7.0);
        assert!(!shared.try_install(Tour::new(vec![0, 2, 1], 7.0)));
        assert_eq!(shared.snapshot().expect("set").order(), &[0, 1, 2]);
    }

    #[test]
    fn test_shared_incumbent_concurrent_installs_keep_minimum() {
        let shared = Arc::new(SharedIncumbent::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for k in 0..50 {
                        let cost = 1000.0 - (t * 50 + k) as f64;
                        shared.try_install(Tour::new(vec![0, 1, 2], cost));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("worker panicked");
        }
        assert_eq!(shared.cost(), 1000.0 - 399.0);
        let inner = Arc::try_unwrap(shared).expect("sole owner").into_inner();
        assert_eq!(inner.cost(), 601.0);
    }
}
