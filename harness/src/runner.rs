//! Step pump: drive a [`Search`] to completion, one `step` at a time.
//!
//! The engine never bounds a run itself. A step budget is enforced here by
//! passing `cancel = true` on the step after the budget is spent, which is
//! exactly what an interactive driver does when its user presses stop.

use wayfind_search::{Search, SearchError, SearchNode, SearchStats, Snapshot, Step, Termination};

/// Observer verdict after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Cancel,
}

/// Sees every snapshot the engine emits.
pub trait StepObserver<N> {
    /// Called after each `Expanded` or `Goal` step. `step` counts from 1.
    fn on_step(&mut self, step: u64, snapshot: &Snapshot<N>) -> Control;
}

impl<N, F> StepObserver<N> for F
where
    F: FnMut(u64, &Snapshot<N>) -> Control,
{
    fn on_step(&mut self, step: u64, snapshot: &Snapshot<N>) -> Control {
        self(step, snapshot)
    }
}

/// Observer that never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unobserved;

impl<N> StepObserver<N> for Unobserved {
    fn on_step(&mut self, _step: u64, _snapshot: &Snapshot<N>) -> Control {
        Control::Continue
    }
}

/// Why a run was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// `max_steps` snapshots were emitted without reaching a goal.
    StepBudget,
    /// The observer returned [`Control::Cancel`].
    Observer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome<N> {
    GoalReached(N),
    Exhausted,
    Cancelled { reason: CancelReason },
}

impl<N> RunOutcome<N> {
    /// Short lowercase label for logs and transcripts.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::GoalReached(_) => "goal_reached",
            Self::Exhausted => "exhausted",
            Self::Cancelled {
                reason: CancelReason::StepBudget,
            } => "cancelled_step_budget",
            Self::Cancelled {
                reason: CancelReason::Observer,
            } => "cancelled_observer",
        }
    }
}

/// Everything a driver needs after a run.
#[derive(Debug, Clone)]
pub struct RunReport<N> {
    pub outcome: RunOutcome<N>,
    /// Snapshots emitted (`Expanded` plus `Goal`).
    pub steps: u64,
    /// Start-to-goal path; empty unless a goal was reached.
    pub path: Vec<N>,
    pub stats: SearchStats,
}

/// Start `search` and pump it until it finishes or is cancelled.
///
/// `max_steps` bounds the number of snapshots. A budget of zero cancels
/// before the first pop. A goal step is never cut off by the budget: if the
/// last budgeted step found the goal, the run still reports it.
///
/// # Errors
///
/// Returns the engine's [`SearchError`] if `search` was already started.
pub fn run<N: SearchNode + 'static>(
    search: &mut Search<N>,
    max_steps: Option<u64>,
    observer: &mut dyn StepObserver<N>,
) -> Result<RunReport<N>, SearchError> {
    search.start()?;
    let mut steps = 0u64;
    let mut cancel = (max_steps == Some(0)).then_some(CancelReason::StepBudget);

    let outcome = loop {
        match search.step(cancel.is_some())? {
            Step::Expanded(snapshot) => {
                steps += 1;
                if observer.on_step(steps, &snapshot) == Control::Cancel {
                    cancel = Some(CancelReason::Observer);
                } else if max_steps.is_some_and(|max| steps >= max) {
                    cancel = Some(CancelReason::StepBudget);
                }
            }
            Step::Goal(snapshot) => {
                steps += 1;
                // The next call yields Done; cancelling now would drop the goal.
                let _ = observer.on_step(steps, &snapshot);
            }
            Step::Done(Termination::GoalReached(goal)) => break RunOutcome::GoalReached(goal),
            Step::Done(Termination::Exhausted) => break RunOutcome::Exhausted,
            Step::Cancelled => {
                let reason = cancel.unwrap_or(CancelReason::Observer);
                break RunOutcome::Cancelled { reason };
            }
        }
    };

    let path = match &outcome {
        RunOutcome::GoalReached(goal) => goal.path(),
        _ => Vec::new(),
    };
    let stats = search.stats();
    tracing::info!(
        strategy = %search.strategy(),
        outcome = outcome.label(),
        steps,
        path_len = path.len(),
        expansions = stats.expansions,
        "run finished"
    );
    Ok(RunReport {
        outcome,
        steps,
        path,
        stats,
    })
}
