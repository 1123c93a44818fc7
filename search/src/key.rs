//! Frontier ordering key and entries.

use crate::contract::Cost;

/// The frontier ordering key: `(priority, depth, creation_order)`.
///
/// Lower `priority` first, then shallower depth, then older `creation_order`.
/// Ties never fall through to node identity, so extraction order is fully
/// determined by insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierKey {
    /// Strategy-owned priority (`distance()` for best-first, `g + h` for A*).
    pub priority: Cost,
    pub depth: u32,
    pub creation_order: u64,
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority
            .cmp(&other.priority)
            .then(self.depth.cmp(&other.depth))
            .then(self.creation_order.cmp(&other.creation_order))
    }
}

/// A pending node together with its depth and ordering key.
#[derive(Debug, Clone)]
pub struct Entry<N> {
    pub node: N,
    /// Depth of `node` in the tree being explored (start = 0).
    pub depth: u32,
    pub key: FrontierKey,
}

impl<N> Entry<N> {
    /// Build an entry. Unprioritized frontiers ignore `priority`.
    #[must_use]
    pub fn new(node: N, depth: u32, priority: Cost, creation_order: u64) -> Self {
        Self {
            node,
            depth,
            key: FrontierKey {
                priority,
                depth,
                creation_order,
            },
        }
    }
}
