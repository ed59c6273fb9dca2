//! Worker-pool variant of the search.
//!
//! Workers share one LIFO open list behind a `Mutex` and sleep on a
//! `Condvar` while the list is empty but other workers still hold nodes.
//! The tree is exhausted once the list is empty and no node is in flight.
//!
//! The incumbent is a [`SharedIncumbent`]: every bound test reads its
//! atomic cost right before comparing, so pruning uses the best tour known
//! to any worker at that moment. Exploration order, node ids, and the
//! optimal tour chosen among equal-cost ones depend on scheduling; the
//! optimal cost does not.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use log::{debug, warn};

use crate::branching::{BranchingPolicy, Node};
use crate::error::Result;
use crate::relaxation::RelaxationSolver;

use super::bnb::SearchRun;
use super::control::{ArmedControl, StopReason};
use super::expand::{Expansion, NodeEvaluator};
use super::incumbent::{Incumbent, SharedIncumbent};
use super::stats::SearchStatistics;
use super::trace::SearchTrace;

struct OpenList {
    nodes: Vec<Node>,
    in_flight: usize,
    next_id: u64,
    popped: u64,
    stop: Option<StopReason>,
    failed: bool,
}

struct Pool<'p, 'a, S> {
    evaluator: &'p NodeEvaluator<'a, S>,
    armed: &'p ArmedControl<'p>,
    open: Mutex<OpenList>,
    wake: Condvar,
    incumbent: SharedIncumbent,
    record_trace: bool,
}

#[derive(Default)]
struct WorkerRun {
    statistics: SearchStatistics,
    trace: Option<SearchTrace>,
}

/// Runs the search on `threads` workers and merges what they found.
pub(crate) fn search<'a, S: RelaxationSolver>(
    evaluator: &NodeEvaluator<'a, S>,
    root: Node,
    incumbent: Incumbent,
    armed: &ArmedControl<'_>,
    threads: usize,
    record_trace: bool,
) -> Result<SearchRun> {
    let pool = Pool {
        evaluator,
        armed,
        open: Mutex::new(OpenList {
            nodes: vec![root],
            in_flight: 0,
            next_id: 1,
            popped: 0,
            stop: None,
            failed: false,
        }),
        wake: Condvar::new(),
        incumbent: SharedIncumbent::from_incumbent(incumbent),
        record_trace,
    };

    let joined: Vec<Result<WorkerRun>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|worker| {
                let pool = &pool;
                scope.spawn(move || pool.work(worker))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect()
    });

    let mut statistics = SearchStatistics::default();
    let mut trace = record_trace.then(SearchTrace::new);
    let mut first_error = None;
    for run in joined {
        match run {
            Ok(run) => {
                statistics.merge(&run.statistics);
                if let (Some(all), Some(part)) = (trace.as_mut(), run.trace) {
                    all.merge(part);
                }
            }
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }

    let stop = pool.lock().stop;
    Ok(SearchRun {
        incumbent: pool.incumbent.into_inner(),
        statistics,
        trace,
        stop,
    })
}

impl<S: RelaxationSolver> Pool<'_, '_, S> {
    fn lock(&self) -> MutexGuard<'_, OpenList> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until a node is available. `None` means the worker should exit.
    fn next_node(&self, worker: usize) -> Option<Node> {
        let mut open = self.lock();
        loop {
            if open.failed || open.stop.is_some() {
                return None;
            }
            if !open.nodes.is_empty() {
                if let Some(reason) = self.armed.check(open.popped) {
                    debug!("worker {worker}: stopping with {} open node(s): {reason}", open.nodes.len());
                    open.stop = Some(reason);
                    self.wake.notify_all();
                    return None;
                }
                let node = open.nodes.pop();
                open.popped += 1;
                open.in_flight += 1;
                return node;
            }
            if open.in_flight == 0 {
                self.wake.notify_all();
                return None;
            }
            open = self.wake.wait(open).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Marks the current node done, pushing its children if any.
    fn finish(&self, node: &Node, branch: Option<(f64, usize, usize)>) {
        let mut open = self.lock();
        if let Some((bound, from, to)) = branch {
            let children = BranchingPolicy::children(node, from, to, bound, open.next_id);
            open.next_id += 2;
            open.nodes.extend(children);
        }
        open.in_flight -= 1;
        self.wake.notify_all();
    }

    fn fail(&self) {
        let mut open = self.lock();
        open.failed = true;
        open.in_flight -= 1;
        self.wake.notify_all();
    }

    fn work(&self, worker: usize) -> Result<WorkerRun> {
        let mut run = WorkerRun {
            statistics: SearchStatistics::default(),
            trace: self.record_trace.then(SearchTrace::new),
        };

        while let Some(node) = self.next_node(worker) {
            let expanded = panic::catch_unwind(AssertUnwindSafe(|| {
                self.evaluator.expand(&node, || self.incumbent.cost())
            }));
            let expansion = match expanded {
                Ok(Ok(e)) => e,
                // Release the node so the other workers stop waiting on it.
                Err(payload) => {
                    self.fail();
                    panic::resume_unwind(payload);
                }
                Ok(Err(e)) => {
                    warn!("worker {worker}: node {} failed: {e}", node.id());
                    self.fail();
                    return Err(e);
                }
            };

            run.statistics.on_node_explored(node.depth());
            if node.parent().is_none() {
                run.statistics.root_lower_bound = expansion.bound();
            }
            if let Some(trace) = run.trace.as_mut() {
                trace.push(expansion.record(&node));
            }

            let mut branch = None;
            match expansion {
                Expansion::Infeasible => run.statistics.on_pruned_infeasible(),
                Expansion::BoundPruned { .. } => run.statistics.on_pruned_bound(),
                Expansion::Integral { tour, .. } => {
                    let cost = tour.cost();
                    let improved = self.incumbent.try_install(tour);
                    if improved {
                        debug!("worker {worker}: node {} new incumbent with cost {cost:.6}", node.id());
                    }
                    run.statistics.on_integral(improved);
                }
                Expansion::Branch { bound, from, to } => {
                    run.statistics.on_branched();
                    branch = Some((bound, from, to));
                }
            }
            self.finish(&node, branch);
        }

        Ok(run)
    }
}
