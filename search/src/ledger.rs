//! Visited and cost bookkeeping for one search run.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::contract::{Cost, SearchNode};

/// Bookkeeping of finalized nodes, discovered nodes, and best known costs.
///
/// "Finalized" means expanded: the node was popped, was not a goal, and its
/// children were admitted. "Discovered" is the breadth-first enqueue mark.
pub trait Ledger<N: SearchNode> {
    /// Mark `node` finalized. Returns `false` if it already was.
    fn finalize(&mut self, node: &N) -> bool;

    fn is_finalized(&self, node: &N) -> bool;

    /// Mark `node` discovered. Returns `false` if it already was.
    fn discover(&mut self, node: &N) -> bool;

    fn is_discovered(&self, node: &N) -> bool;

    /// Record `cost` for `node` if it is strictly cheaper than any cost
    /// recorded so far. Returns whether it was recorded.
    ///
    /// Ties keep the existing record (first-seen wins).
    fn record_cost(&mut self, node: &N, cost: Cost) -> bool;

    fn best_cost(&self, node: &N) -> Option<Cost>;

    /// Finalized nodes in finalization order.
    ///
    /// The list is shared, not copied. A holder keeps seeing the list as
    /// it was when taken; the ledger copies on its next write instead.
    fn visited(&self) -> Arc<Vec<N>>;

    fn visited_len(&self) -> usize;

    /// Forget everything (iterative-deepening bound increments).
    fn reset(&mut self);
}

/// Hash-based ledger keeping finalization order for snapshots.
#[derive(Debug)]
pub struct HashLedger<N> {
    finalized: HashSet<N>,
    order: Arc<Vec<N>>,
    discovered: HashSet<N>,
    costs: HashMap<N, Cost>,
}

impl<N> HashLedger<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            finalized: HashSet::new(),
            order: Arc::new(Vec::new()),
            discovered: HashSet::new(),
            costs: HashMap::new(),
        }
    }
}

impl<N> Default for HashLedger<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: SearchNode> Ledger<N> for HashLedger<N> {
    fn finalize(&mut self, node: &N) -> bool {
        if !self.finalized.insert(node.clone()) {
            return false;
        }
        Arc::make_mut(&mut self.order).push(node.clone());
        true
    }

    fn is_finalized(&self, node: &N) -> bool {
        self.finalized.contains(node)
    }

    fn discover(&mut self, node: &N) -> bool {
        self.discovered.insert(node.clone())
    }

    fn is_discovered(&self, node: &N) -> bool {
        self.discovered.contains(node)
    }

    fn record_cost(&mut self, node: &N, cost: Cost) -> bool {
        match self.costs.get_mut(node) {
            Some(best) if cost < *best => {
                *best = cost;
                true
            }
            Some(_) => false,
            None => {
                self.costs.insert(node.clone(), cost);
                true
            }
        }
    }

    fn best_cost(&self, node: &N) -> Option<Cost> {
        self.costs.get(node).copied()
    }

    fn visited(&self) -> Arc<Vec<N>> {
        Arc::clone(&self.order)
    }

    fn visited_len(&self) -> usize {
        self.order.len()
    }

    fn reset(&mut self) {
        self.finalized.clear();
        self.order = Arc::new(Vec::new());
        self.discovered.clear();
        self.costs.clear();
    }
}
