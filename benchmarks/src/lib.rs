//! Shared helpers for wayfind benchmark suites.

use std::collections::{HashSet, VecDeque};

use wayfind_harness::config::{RunConfig, SpaceKind};
use wayfind_harness::worlds::grid::{GridLayout, GridNode, GridSpace};
use wayfind_search::{Search, SearchNode, SearchPolicy, SearchStats, Strategy, Termination};

/// Obstacle-free `rows x cols` grid from the top-left to the bottom-right corner.
///
/// # Panics
///
/// Panics if either dimension is zero. Benchmark setup failures are fatal.
#[must_use]
pub fn open_grid(rows: usize, cols: usize) -> GridSpace {
    let layout = GridLayout {
        rows,
        cols,
        obstacles: Vec::new(),
        start: (0, 0),
        goal: (rows - 1, cols - 1),
        ..GridLayout::default()
    };
    GridSpace::new(layout).expect("open grid")
}

/// The first `n` distinct nodes reachable from the grid start, in
/// breadth-first order. Fewer if the grid is smaller than `n`.
#[must_use]
pub fn distinct_nodes(space: &GridSpace, n: usize) -> Vec<GridNode> {
    let start = space.start_node();
    let mut seen = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start]);
    let mut out = Vec::with_capacity(n);
    while let Some(node) = queue.pop_front() {
        if out.len() == n {
            break;
        }
        for child in node.children() {
            if seen.insert(child.clone()) {
                queue.push_back(child);
            }
        }
        out.push(node);
    }
    out
}

/// Demo configuration for `strategy` over `space`.
#[must_use]
pub fn demo_config(strategy: Strategy, space: SpaceKind) -> RunConfig {
    RunConfig {
        strategy,
        space,
        ..RunConfig::default()
    }
}

/// Run a fresh search to completion and return how it ended.
///
/// # Panics
///
/// Panics if the engine rejects the policy or reports a phase error.
pub fn solve<N: SearchNode + 'static>(
    start: N,
    policy: SearchPolicy,
) -> (Termination<N>, SearchStats) {
    let mut search = Search::new(start, policy).expect("valid policy");
    let termination = search.run_to_completion().expect("fresh search");
    (termination, search.stats())
}

/// Take up to `steps` steps, reading every snapshot the way a driver would,
/// and return how many steps were taken.
///
/// # Panics
///
/// Panics if the engine rejects the policy.
pub fn walk<N: SearchNode + 'static>(start: N, policy: SearchPolicy, steps: usize) -> usize {
    let mut search = Search::new(start, policy).expect("valid policy");
    search.start().expect("fresh search");
    search
        .steps()
        .take(steps)
        .map(|step| {
            step.snapshot()
                .map_or(0, |s| s.visited.len() + s.frontier.len())
        })
        .fold(0, |taken, seen| {
            std::hint::black_box(seen);
            taken + 1
        })
}
