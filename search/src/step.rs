//! Values handed to the driver by the step channel.

use std::sync::Arc;

use crate::frontier::FrontierView;

/// Progress view emitted after every step.
///
/// The visited list and frontier are shared with the engine rather than
/// copied, so taking a snapshot costs the same at step ten and at step ten
/// million. The engine copies its storage only if a snapshot is still alive
/// when it next writes; the driver may keep a snapshot as long as it likes
/// and it will not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<N> {
    /// The node popped in this step.
    pub current: N,
    /// Finalized nodes, in finalization order.
    pub visited: Arc<Vec<N>>,
    /// Pending nodes. `FrontierView::nodes` lists them in pop order.
    pub frontier: FrontierView<N>,
    /// Active depth bound (iterative deepening only).
    pub depth_bound: Option<u32>,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination<N> {
    /// A goal node was popped.
    GoalReached(N),
    /// No goal is reachable under the strategy's admission rules.
    Exhausted,
}

impl<N> Termination<N> {
    /// The goal node, if one was found.
    #[must_use]
    pub fn goal(&self) -> Option<&N> {
        match self {
            Self::GoalReached(node) => Some(node),
            Self::Exhausted => None,
        }
    }
}

/// Result of one `step` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<N> {
    /// One node was finalized and its children admitted.
    Expanded(Snapshot<N>),
    /// The popped node is a goal. It is `current` and is not finalized.
    Goal(Snapshot<N>),
    /// The run is over. Returned exactly once.
    Done(Termination<N>),
    /// The caller cancelled. Nothing was expanded.
    Cancelled,
}

impl<N> Step<N> {
    /// The snapshot carried by `Expanded` and `Goal`.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot<N>> {
        match self {
            Self::Expanded(s) | Self::Goal(s) => Some(s),
            Self::Done(_) | Self::Cancelled => None,
        }
    }

    /// Whether this step ends the stepping loop.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Cancelled)
    }
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes finalized, summed across iterative-deepening passes.
    pub expansions: u64,
    /// Popped entries discarded because the node was already finalized.
    pub stale_pops: u64,
    /// Children rejected by the strategy's admission rule.
    pub duplicates_suppressed: u64,
    /// Children rejected because they would exceed the depth bound.
    pub depth_cutoffs: u64,
    /// Iterative-deepening restarts.
    pub bound_restarts: u64,
    /// Largest frontier size observed.
    pub frontier_high_water: usize,
}
