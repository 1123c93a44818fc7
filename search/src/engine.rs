//! Step-driven search engine.
//!
//! [`Search`] is an explicit state machine. Every `step` performs at most one
//! pop-expand-admit cycle and returns; all paused state (frontier, ledger,
//! depth bound) lives in the struct.
//!
//! ```text
//! Idle --start()--> Running --goal popped--> Finishing --step--> Finished
//!                      |  \--frontier empty------------------------^
//!                      \--step(cancel = true)--> Cancelled
//! ```

use tracing::{debug, info};

use crate::contract::{Cost, SearchNode};
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::key::Entry;
use crate::ledger::{HashLedger, Ledger};
use crate::policy::SearchPolicy;
use crate::step::{SearchStats, Snapshot, Step, Termination};
use crate::strategy::Strategy;

#[derive(Debug)]
enum Phase<N> {
    Idle,
    Running,
    /// A goal was popped and reported; the next step reports `Done`.
    Finishing(N),
    Finished,
    Cancelled,
}

/// One search run over a state space, driven one expansion at a time.
///
/// The engine owns its frontier and ledger exclusively; it is not reentrant
/// and does no work between calls.
pub struct Search<N: SearchNode + 'static> {
    start: N,
    policy: SearchPolicy,
    frontier: Box<dyn Frontier<N>>,
    ledger: Box<dyn Ledger<N>>,
    phase: Phase<N>,
    depth_bound: u32,
    /// Whether the current iterative-deepening pass rejected any child for
    /// exceeding the bound.
    cutoff_in_pass: bool,
    next_creation_order: u64,
    stats: SearchStats,
}

impl<N: SearchNode + 'static> Search<N> {
    /// Build an engine with the strategy's own frontier and a [`HashLedger`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnsupportedPolicy`] if the policy is invalid.
    pub fn new(start: N, policy: SearchPolicy) -> Result<Self, SearchError> {
        let frontier = policy.strategy.frontier();
        Self::with_parts(start, policy, frontier, Box::new(HashLedger::<N>::new()))
    }

    /// Build an engine around caller-supplied frontier and ledger.
    ///
    /// The frontier must implement the discipline the strategy expects.
    /// This is the seam for decorators such as
    /// [`Instrumented`](crate::instrument::Instrumented).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnsupportedPolicy`] if the policy is invalid.
    pub fn with_parts(
        start: N,
        policy: SearchPolicy,
        frontier: Box<dyn Frontier<N>>,
        ledger: Box<dyn Ledger<N>>,
    ) -> Result<Self, SearchError> {
        policy.validate()?;
        Ok(Self {
            start,
            policy,
            frontier,
            ledger,
            phase: Phase::Idle,
            depth_bound: 0,
            cutoff_in_pass: false,
            next_creation_order: 0,
            stats: SearchStats::default(),
        })
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.policy.strategy
    }

    #[must_use]
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    #[must_use]
    pub fn start_node(&self) -> &N {
        &self.start
    }

    /// Active depth bound (iterative deepening only).
    #[must_use]
    pub fn depth_bound(&self) -> Option<u32> {
        (self.policy.strategy == Strategy::IterativeDeepening).then_some(self.depth_bound)
    }

    /// Whether no further `step` call will succeed.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, Phase::Finished | Phase::Cancelled)
    }

    #[must_use]
    pub fn stats(&self) -> SearchStats {
        SearchStats {
            frontier_high_water: self.frontier.high_water(),
            ..self.stats
        }
    }

    /// Seed the frontier with the start node. Must precede any `step`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::AlreadyStarted`] on a second call.
    pub fn start(&mut self) -> Result<(), SearchError> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(SearchError::AlreadyStarted);
        }
        self.seed();
        self.phase = Phase::Running;
        info!(strategy = %self.policy.strategy, "search started");
        Ok(())
    }

    /// Advance by exactly one expansion, or cancel.
    ///
    /// With `cancel == true` the run stops before popping another node, its
    /// frontier and ledger are discarded, and [`Step::Cancelled`] is returned.
    ///
    /// # Errors
    ///
    /// - [`SearchError::NotStarted`] before [`start`](Self::start).
    /// - [`SearchError::Finished`] after [`Step::Done`] was returned.
    /// - [`SearchError::Cancelled`] after a cancelling call.
    pub fn step(&mut self, cancel: bool) -> Result<Step<N>, SearchError> {
        match self.phase {
            Phase::Idle => return Err(SearchError::NotStarted),
            Phase::Finished => return Err(SearchError::Finished),
            Phase::Cancelled => return Err(SearchError::Cancelled),
            Phase::Running | Phase::Finishing(_) => {}
        }

        if cancel {
            self.frontier.clear();
            self.ledger.reset();
            self.phase = Phase::Cancelled;
            info!(
                strategy = %self.policy.strategy,
                expansions = self.stats.expansions,
                "search cancelled"
            );
            return Ok(Step::Cancelled);
        }

        match std::mem::replace(&mut self.phase, Phase::Finished) {
            Phase::Finishing(goal) => {
                info!(
                    strategy = %self.policy.strategy,
                    expansions = self.stats.expansions,
                    depth = goal.depth(),
                    cost = goal.cost(),
                    "goal reached"
                );
                Ok(Step::Done(Termination::GoalReached(goal)))
            }
            _ => Ok(self.advance()),
        }
    }

    /// Iterate non-cancelling steps up to and including `Done`.
    ///
    /// Yields nothing if the engine was never started or is already
    /// terminated.
    pub fn steps(&mut self) -> impl Iterator<Item = Step<N>> + '_ {
        let mut done = false;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let step = self.step(false).ok()?;
            done = step.is_terminal();
            Some(step)
        })
    }

    /// Start if needed, then step until the run terminates.
    ///
    /// Iterative deepening on an infinite goal-less space never returns
    /// unless `max_depth_bound` is set.
    ///
    /// # Errors
    ///
    /// Returns the step-channel error if the run was already terminated.
    pub fn run_to_completion(&mut self) -> Result<Termination<N>, SearchError> {
        if matches!(self.phase, Phase::Idle) {
            self.start()?;
        }
        loop {
            if let Step::Done(termination) = self.step(false)? {
                return Ok(termination);
            }
        }
    }

    /// One pop-expand-admit cycle. `self.phase` is `Finished` on entry and
    /// is set to the follow-up phase here.
    fn advance(&mut self) -> Step<N> {
        loop {
            let Some(entry) = self.frontier.pop() else {
                if self.deepen() {
                    continue;
                }
                self.phase = Phase::Finished;
                info!(
                    strategy = %self.policy.strategy,
                    expansions = self.stats.expansions,
                    "frontier exhausted"
                );
                return Step::Done(Termination::Exhausted);
            };

            if self.ledger.is_finalized(&entry.node) {
                self.stats.stale_pops += 1;
                continue;
            }

            if entry.node.is_goal() {
                let snapshot = self.snapshot(entry.node.clone());
                self.phase = Phase::Finishing(entry.node);
                return Step::Goal(snapshot);
            }

            self.ledger.finalize(&entry.node);
            self.stats.expansions += 1;
            self.admit_children(&entry);
            debug!(
                strategy = %self.policy.strategy,
                expansion = self.stats.expansions,
                depth = entry.depth,
                frontier = self.frontier.len(),
                visited = self.ledger.visited_len(),
                "expanded"
            );
            self.phase = Phase::Running;
            return Step::Expanded(self.snapshot(entry.node));
        }
    }

    fn admit_children(&mut self, parent: &Entry<N>) {
        let child_depth = parent.depth + 1;
        for child in parent.node.children() {
            match self.policy.strategy {
                Strategy::DepthFirst => {
                    if self.ledger.is_finalized(&child) {
                        self.stats.duplicates_suppressed += 1;
                    } else {
                        self.push(child, child_depth, 0);
                    }
                }
                Strategy::BreadthFirst => {
                    if self.ledger.discover(&child) {
                        self.push(child, child_depth, 0);
                    } else {
                        self.stats.duplicates_suppressed += 1;
                    }
                }
                Strategy::BestFirst => {
                    if self.ledger.is_finalized(&child) {
                        self.stats.duplicates_suppressed += 1;
                    } else {
                        let h = child.distance();
                        self.push(child, child_depth, h);
                    }
                }
                Strategy::IterativeDeepening => {
                    if child_depth > self.depth_bound {
                        self.stats.depth_cutoffs += 1;
                        self.cutoff_in_pass = true;
                    } else if self.ledger.is_finalized(&child) {
                        self.stats.duplicates_suppressed += 1;
                    } else {
                        self.push(child, child_depth, 0);
                    }
                }
                Strategy::AStar => {
                    if self.ledger.is_finalized(&child) {
                        self.stats.duplicates_suppressed += 1;
                        continue;
                    }
                    let g = child.cost();
                    if self.ledger.record_cost(&child, g) {
                        let f = g.saturating_add(child.distance());
                        self.push(child, child_depth, f);
                    } else {
                        self.stats.duplicates_suppressed += 1;
                    }
                }
            }
        }
    }

    fn push(&mut self, node: N, depth: u32, priority: Cost) {
        let order = self.next_creation_order;
        self.next_creation_order += 1;
        self.frontier.push(Entry::new(node, depth, priority, order));
    }

    fn seed(&mut self) {
        let start = self.start.clone();
        let priority = match self.policy.strategy {
            Strategy::BestFirst => start.distance(),
            Strategy::AStar => {
                let g = start.cost();
                self.ledger.record_cost(&start, g);
                g.saturating_add(start.distance())
            }
            Strategy::BreadthFirst => {
                self.ledger.discover(&start);
                0
            }
            Strategy::DepthFirst | Strategy::IterativeDeepening => 0,
        };
        self.push(start, 0, priority);
    }

    /// Restart iterative deepening one bound deeper.
    ///
    /// Returns `false` when deepening cannot help: the strategy is not
    /// iterative deepening, the last pass saw no cutoff (the reachable graph
    /// is fully explored), or the policy's bound cap was reached.
    fn deepen(&mut self) -> bool {
        if self.policy.strategy != Strategy::IterativeDeepening || !self.cutoff_in_pass {
            return false;
        }
        if self
            .policy
            .max_depth_bound
            .is_some_and(|cap| self.depth_bound >= cap)
        {
            return false;
        }
        self.depth_bound += 1;
        self.stats.bound_restarts += 1;
        self.cutoff_in_pass = false;
        self.frontier.clear();
        self.ledger.reset();
        self.seed();
        info!(depth_bound = self.depth_bound, "depth bound raised");
        true
    }

    fn snapshot(&self, current: N) -> Snapshot<N> {
        Snapshot {
            current,
            visited: self.ledger.visited(),
            frontier: self.frontier.view(),
            depth_bound: self.depth_bound(),
        }
    }
}

impl<N: SearchNode + std::fmt::Debug + 'static> std::fmt::Debug for Search<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Search")
            .field("strategy", &self.policy.strategy)
            .field("phase", &self.phase)
            .field("depth_bound", &self.depth_bound)
            .field("frontier_len", &self.frontier.len())
            .field("visited_len", &self.ledger.visited_len())
            .field("stats", &self.stats)
            .finish()
    }
}
