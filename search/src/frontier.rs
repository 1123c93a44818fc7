//! Frontier disciplines: stack, queue, and priority heap.
//!
//! Every frontier tracks a high-water mark of its size. A [`FrontierView`]
//! lists pending nodes in the order they would be popped, one entry per
//! node identity, so a driver can render them without knowing the
//! discipline.
//!
//! Storage sits behind an `Arc` and is copied on write. Taking a view is
//! O(1); the frontier pays for a copy only if it is mutated while a view
//! is still alive.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::contract::SearchNode;
use crate::key::{Entry, FrontierKey};

/// "Next node to expand" container.
pub trait Frontier<N: SearchNode> {
    /// Insert an entry according to the discipline.
    fn push(&mut self, entry: Entry<N>);

    /// Remove the next entry to expand.
    fn pop(&mut self) -> Option<Entry<N>>;

    /// Number of pending entries, duplicates included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every pending entry. The high-water mark is kept.
    fn clear(&mut self);

    /// Read-only view of the pending entries at this instant.
    fn view(&self) -> FrontierView<N>;

    /// Largest `len()` observed since construction.
    fn high_water(&self) -> usize;
}

/// Boxed frontiers forward to their contents, so decorators can wrap a
/// `Box<dyn Frontier<N>>`.
impl<N: SearchNode, F: Frontier<N> + ?Sized> Frontier<N> for Box<F> {
    fn push(&mut self, entry: Entry<N>) {
        (**self).push(entry);
    }

    fn pop(&mut self) -> Option<Entry<N>> {
        (**self).pop()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn view(&self) -> FrontierView<N> {
        (**self).view()
    }

    fn high_water(&self) -> usize {
        (**self).high_water()
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

enum Pending<N> {
    /// Push order; pops from the back.
    Stack(Arc<Vec<Entry<N>>>),
    /// Pop order.
    Queue(Arc<VecDeque<Entry<N>>>),
    /// Heap order; pop order is recovered by sorting on the key.
    Heap(Arc<BinaryHeap<HeapSlot<N>>>),
    /// Pop order, for frontiers outside this module.
    Listed(Arc<[N]>),
}

/// Frozen view of a frontier, shared with the frontier's own storage.
///
/// Pop order is only worked out when asked for, by [`nodes`](Self::nodes)
/// or the `Debug`/`PartialEq` impls.
pub struct FrontierView<N> {
    pending: Pending<N>,
}

impl<N> FrontierView<N> {
    /// View over nodes already listed in pop order.
    #[must_use]
    pub fn from_pop_order(nodes: Vec<N>) -> Self {
        Self {
            pending: Pending::Listed(nodes.into()),
        }
    }

    /// Pending entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.pending {
            Pending::Stack(entries) => entries.len(),
            Pending::Queue(entries) => entries.len(),
            Pending::Heap(heap) => heap.len(),
            Pending::Listed(nodes) => nodes.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every pending node in pop order, duplicates included.
    fn in_pop_order(&self) -> Vec<&N> {
        match &self.pending {
            Pending::Stack(entries) => entries.iter().rev().map(|e| &e.node).collect(),
            Pending::Queue(entries) => entries.iter().map(|e| &e.node).collect(),
            Pending::Heap(heap) => {
                let mut slots: Vec<&HeapSlot<N>> = heap.iter().collect();
                slots.sort_by(|a, b| a.key.0.cmp(&b.key.0));
                slots.into_iter().map(|s| &s.entry.node).collect()
            }
            Pending::Listed(nodes) => nodes.iter().collect(),
        }
    }
}

impl<N: Clone + Eq + Hash> FrontierView<N> {
    /// Pending nodes in pop order, first occurrence of each identity only.
    #[must_use]
    pub fn nodes(&self) -> Vec<N> {
        let mut seen = HashSet::new();
        self.in_pop_order()
            .into_iter()
            .filter(|n| seen.insert(*n))
            .cloned()
            .collect()
    }
}

impl<N> Clone for FrontierView<N> {
    fn clone(&self) -> Self {
        let pending = match &self.pending {
            Pending::Stack(entries) => Pending::Stack(Arc::clone(entries)),
            Pending::Queue(entries) => Pending::Queue(Arc::clone(entries)),
            Pending::Heap(heap) => Pending::Heap(Arc::clone(heap)),
            Pending::Listed(nodes) => Pending::Listed(Arc::clone(nodes)),
        };
        Self { pending }
    }
}

impl<N: PartialEq> PartialEq for FrontierView<N> {
    fn eq(&self, other: &Self) -> bool {
        self.in_pop_order() == other.in_pop_order()
    }
}

impl<N: Eq> Eq for FrontierView<N> {}

impl<N: fmt::Debug> fmt::Debug for FrontierView<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.in_pop_order()).finish()
    }
}

// ---------------------------------------------------------------------------
// Disciplines
// ---------------------------------------------------------------------------

/// LIFO stack (depth-first, iterative deepening).
#[derive(Debug)]
pub struct StackFrontier<N> {
    entries: Arc<Vec<Entry<N>>>,
    high_water: usize,
}

impl<N> StackFrontier<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Vec::new()),
            high_water: 0,
        }
    }
}

impl<N> Default for StackFrontier<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: SearchNode> Frontier<N> for StackFrontier<N> {
    fn push(&mut self, entry: Entry<N>) {
        let entries = Arc::make_mut(&mut self.entries);
        entries.push(entry);
        self.high_water = self.high_water.max(entries.len());
    }

    fn pop(&mut self) -> Option<Entry<N>> {
        Arc::make_mut(&mut self.entries).pop()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries = Arc::new(Vec::new());
    }

    fn view(&self) -> FrontierView<N> {
        FrontierView {
            pending: Pending::Stack(Arc::clone(&self.entries)),
        }
    }

    fn high_water(&self) -> usize {
        self.high_water
    }
}

/// FIFO queue (breadth-first).
#[derive(Debug)]
pub struct QueueFrontier<N> {
    entries: Arc<VecDeque<Entry<N>>>,
    high_water: usize,
}

impl<N> QueueFrontier<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(VecDeque::new()),
            high_water: 0,
        }
    }
}

impl<N> Default for QueueFrontier<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: SearchNode> Frontier<N> for QueueFrontier<N> {
    fn push(&mut self, entry: Entry<N>) {
        let entries = Arc::make_mut(&mut self.entries);
        entries.push_back(entry);
        self.high_water = self.high_water.max(entries.len());
    }

    fn pop(&mut self) -> Option<Entry<N>> {
        Arc::make_mut(&mut self.entries).pop_front()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries = Arc::new(VecDeque::new());
    }

    fn view(&self) -> FrontierView<N> {
        FrontierView {
            pending: Pending::Queue(Arc::clone(&self.entries)),
        }
    }

    fn high_water(&self) -> usize {
        self.high_water
    }
}

/// Heap slot ordered by key only.
///
/// `BinaryHeap` is a max-heap, so the key is wrapped in `Reverse` to pop
/// the lowest key first.
#[derive(Debug, Clone)]
struct HeapSlot<N> {
    key: Reverse<FrontierKey>,
    entry: Entry<N>,
}

impl<N> PartialEq for HeapSlot<N> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<N> Eq for HeapSlot<N> {}

impl<N> PartialOrd for HeapSlot<N> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for HeapSlot<N> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-priority queue on [`FrontierKey`] (best-first, A*).
///
/// Insertion and extraction are O(log n). A node re-inserted with a better
/// key leaves its old entry in place; callers discard the stale entry when
/// it surfaces.
#[derive(Debug)]
pub struct PriorityFrontier<N> {
    heap: Arc<BinaryHeap<HeapSlot<N>>>,
    high_water: usize,
}

impl<N> PriorityFrontier<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: Arc::new(BinaryHeap::new()),
            high_water: 0,
        }
    }
}

impl<N> Default for PriorityFrontier<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: SearchNode> Frontier<N> for PriorityFrontier<N> {
    fn push(&mut self, entry: Entry<N>) {
        let heap = Arc::make_mut(&mut self.heap);
        heap.push(HeapSlot {
            key: Reverse(entry.key),
            entry,
        });
        self.high_water = self.high_water.max(heap.len());
    }

    fn pop(&mut self) -> Option<Entry<N>> {
        Arc::make_mut(&mut self.heap).pop().map(|slot| slot.entry)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn clear(&mut self) {
        self.heap = Arc::new(BinaryHeap::new());
    }

    fn view(&self) -> FrontierView<N> {
        FrontierView {
            pending: Pending::Heap(Arc::clone(&self.heap)),
        }
    }

    fn high_water(&self) -> usize {
        self.high_water
    }
}
