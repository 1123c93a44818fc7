//! Operation tallies for frontier and ledger, as a decorator.
//!
//! [`Instrumented`] wraps any [`Frontier`] or [`Ledger`] and records every
//! operation into a shared [`Tally`]. The engine sees only the trait, so
//! instrumentation never changes traversal order.
//!
//! Costs are unit per call (average-case hash-set and deque operations);
//! a priority-queue push or pop is charged `log2(len)` rounded up.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::contract::{Cost, SearchNode};
use crate::engine::Search;
use crate::error::SearchError;
use crate::frontier::{Frontier, FrontierView};
use crate::key::Entry;
use crate::ledger::{HashLedger, Ledger};
use crate::policy::SearchPolicy;
use crate::strategy::Strategy;

/// Counter values at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyCounts {
    pub frontier_ops: u64,
    pub ledger_ops: u64,
    /// Entries currently held by the frontier.
    pub frontier_len: usize,
    /// Nodes currently held by the ledger's visited set.
    pub visited_len: usize,
    /// Largest `frontier_len + visited_len` observed.
    pub peak_space: usize,
}

impl TallyCounts {
    #[must_use]
    pub fn total_ops(&self) -> u64 {
        self.frontier_ops + self.ledger_ops
    }

    #[must_use]
    pub fn space(&self) -> usize {
        self.frontier_len + self.visited_len
    }
}

#[derive(Debug, Default)]
struct TallyState {
    counts: TallyCounts,
    samples: Vec<TallyCounts>,
}

/// Shared handle to the counters. Clones observe the same counters.
#[derive(Debug, Clone, Default)]
pub struct Tally(Rc<RefCell<TallyState>>);

impl Tally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counter values.
    #[must_use]
    pub fn counts(&self) -> TallyCounts {
        self.0.borrow().counts
    }

    /// Append the current values to the sample series (one per step).
    pub fn sample(&self) {
        let mut state = self.0.borrow_mut();
        let counts = state.counts;
        state.samples.push(counts);
    }

    /// All samples taken so far.
    #[must_use]
    pub fn samples(&self) -> Vec<TallyCounts> {
        self.0.borrow().samples.clone()
    }

    fn frontier_op(&self, ops: u64, len: usize) {
        let mut state = self.0.borrow_mut();
        let c = &mut state.counts;
        c.frontier_ops += ops;
        c.frontier_len = len;
        c.peak_space = c.peak_space.max(c.space());
    }

    fn ledger_op(&self, ops: u64, len: usize) {
        let mut state = self.0.borrow_mut();
        let c = &mut state.counts;
        c.ledger_ops += ops;
        c.visited_len = len;
        c.peak_space = c.peak_space.max(c.space());
    }
}

/// Decorator that forwards to `inner` and reports to a [`Tally`].
#[derive(Debug)]
pub struct Instrumented<T> {
    inner: T,
    tally: Tally,
    /// Whether pushes and pops cost `log2(len)` instead of 1.
    logarithmic: bool,
}

impl<T> Instrumented<T> {
    /// Wrap `inner`, charging unit cost per operation.
    #[must_use]
    pub fn new(inner: T, tally: Tally) -> Self {
        Self {
            inner,
            tally,
            logarithmic: false,
        }
    }

    /// Wrap a heap-backed frontier, charging `log2(len)` per push/pop.
    #[must_use]
    pub fn logarithmic(inner: T, tally: Tally) -> Self {
        Self {
            inner,
            tally,
            logarithmic: true,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn log2_ceil(len: usize) -> u64 {
    match len {
        0 | 1 => 1,
        n => u64::from(usize::BITS - (n - 1).leading_zeros()),
    }
}

impl<T> Instrumented<T> {
    fn heap_cost(&self, len: usize) -> u64 {
        if self.logarithmic {
            log2_ceil(len)
        } else {
            1
        }
    }
}

impl<N: SearchNode, F: Frontier<N>> Frontier<N> for Instrumented<F> {
    fn push(&mut self, entry: Entry<N>) {
        self.inner.push(entry);
        let len = self.inner.len();
        self.tally.frontier_op(self.heap_cost(len), len);
    }

    fn pop(&mut self) -> Option<Entry<N>> {
        let cost = self.heap_cost(self.inner.len());
        let entry = self.inner.pop();
        self.tally.frontier_op(cost, self.inner.len());
        entry
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn clear(&mut self) {
        self.inner.clear();
        self.tally.frontier_op(0, 0);
    }

    fn view(&self) -> FrontierView<N> {
        self.inner.view()
    }

    fn high_water(&self) -> usize {
        self.inner.high_water()
    }
}

impl<N: SearchNode, L: Ledger<N>> Ledger<N> for Instrumented<L> {
    fn finalize(&mut self, node: &N) -> bool {
        let added = self.inner.finalize(node);
        self.tally.ledger_op(1, self.inner.visited_len());
        added
    }

    fn is_finalized(&self, node: &N) -> bool {
        self.tally.ledger_op(1, self.inner.visited_len());
        self.inner.is_finalized(node)
    }

    fn discover(&mut self, node: &N) -> bool {
        self.tally.ledger_op(1, self.inner.visited_len());
        self.inner.discover(node)
    }

    fn is_discovered(&self, node: &N) -> bool {
        self.tally.ledger_op(1, self.inner.visited_len());
        self.inner.is_discovered(node)
    }

    fn record_cost(&mut self, node: &N, cost: Cost) -> bool {
        self.tally.ledger_op(1, self.inner.visited_len());
        self.inner.record_cost(node, cost)
    }

    fn best_cost(&self, node: &N) -> Option<Cost> {
        self.tally.ledger_op(1, self.inner.visited_len());
        self.inner.best_cost(node)
    }

    fn visited(&self) -> Arc<Vec<N>> {
        self.inner.visited()
    }

    fn visited_len(&self) -> usize {
        self.inner.visited_len()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.tally.ledger_op(0, 0);
    }
}

/// Build an engine whose frontier and ledger both report to a fresh tally.
///
/// # Errors
///
/// Returns [`SearchError::UnsupportedPolicy`] if the policy is invalid.
pub fn instrumented_search<N: SearchNode + 'static>(
    start: N,
    policy: SearchPolicy,
) -> Result<(Search<N>, Tally), SearchError> {
    let tally = Tally::new();
    let frontier = policy.strategy.frontier::<N>();
    let frontier: Box<dyn Frontier<N>> = match policy.strategy {
        Strategy::BestFirst | Strategy::AStar => {
            Box::new(Instrumented::logarithmic(frontier, tally.clone()))
        }
        _ => Box::new(Instrumented::new(frontier, tally.clone())),
    };
    let ledger = Box::new(Instrumented::new(HashLedger::<N>::new(), tally.clone()));
    let search = Search::with_parts(start, policy, frontier, ledger)?;
    Ok((search, tally))
}
