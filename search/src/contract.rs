//! Node capability contract.

use std::hash::Hash;
use std::sync::Arc;

/// Path cost and heuristic unit. Always non-negative.
pub type Cost = u64;

/// Trait every state-space node implements to be searchable.
///
/// Strategies depend only on this trait, never on a concrete domain type.
///
/// # Contract
///
/// - Equality and hashing compare *domain state only*. Two nodes reached via
///   different parents are equal when their states are equal.
/// - `children` is pure and deterministic for a fixed state: same node, same
///   successors, same order. It must not mutate `self`.
/// - Each child's [`parent`](SearchNode::parent) is the node it was generated
///   from, so back-link chains point strictly toward the start.
/// - Cloning is cheap. Implementations keep their state behind `Arc`.
///
/// Violations are not detected at runtime; traversal behaviour is then
/// unspecified.
pub trait SearchNode: Clone + Eq + Hash {
    /// Successors reachable by one domain transition. May be empty.
    fn children(&self) -> Vec<Self>;

    /// Goal predicate. No side effects.
    fn is_goal(&self) -> bool;

    /// Heuristic estimate of the remaining cost to a goal.
    ///
    /// Used by best-first and A*. Admissibility is the implementor's
    /// responsibility; the engine does not check it.
    fn distance(&self) -> Cost {
        0
    }

    /// Accumulated path cost from the start node.
    ///
    /// Defaults to the node's depth, i.e. a uniform step cost of 1.
    fn cost(&self) -> Cost {
        Cost::from(self.depth())
    }

    /// The node this one was generated from (`None` for the start node).
    fn parent(&self) -> Option<&Self>;

    /// Number of back-links between this node and the start node.
    fn depth(&self) -> u32 {
        let mut depth = 0;
        let mut cursor = self.parent();
        while let Some(node) = cursor {
            depth += 1;
            cursor = node.parent();
        }
        depth
    }

    /// Ordered nodes from the start node to `self`, inclusive.
    fn path(&self) -> Vec<Self> {
        let mut path = vec![self.clone()];
        let mut cursor = self.parent();
        while let Some(node) = cursor {
            path.push(node.clone());
            cursor = node.parent();
        }
        path.reverse();
        path
    }
}

/// Release a chain of `Arc` back-links one link at a time.
///
/// The derived drop glue for `parent: Option<Arc<Self>>` recurses once per
/// link and overflows the stack on long paths. Call this from `Drop` with
/// the node's taken parent and a closure that takes the parent out of an
/// unwrapped link. The walk stops at the first link something else still
/// holds.
///
/// ```
/// use std::sync::Arc;
/// use wayfind_search::contract::release_chain;
///
/// struct Link {
///     parent: Option<Arc<Link>>,
/// }
///
/// impl Drop for Link {
///     fn drop(&mut self) {
///         release_chain(self.parent.take(), |link| link.parent.take());
///     }
/// }
///
/// let mut tip = Link { parent: None };
/// for _ in 0..200_000 {
///     tip = Link { parent: Some(Arc::new(tip)) };
/// }
/// drop(tip);
/// ```
pub fn release_chain<T>(
    mut link: Option<Arc<T>>,
    take_parent: impl Fn(&mut T) -> Option<Arc<T>>,
) {
    while let Some(node) = link {
        link = match Arc::try_unwrap(node) {
            Ok(mut node) => take_parent(&mut node),
            Err(_) => None,
        };
    }
}
