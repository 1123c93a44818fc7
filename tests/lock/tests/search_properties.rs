//! Lock tests for the engine's behavioural guarantees, checked on seeded
//! random digraphs against brute-force reference answers.

use lock_tests::{random_graph, Node};
use wayfind_search::{
    Search, SearchError, SearchNode, SearchPolicy, Snapshot, Step, Strategy, Termination,
};

const SEEDS: u64 = 60;

fn search(start: Node, strategy: Strategy) -> Search<Node> {
    let mut search = Search::new(start, SearchPolicy::new(strategy)).unwrap();
    search.start().unwrap();
    search
}

/// All snapshots of a run plus its termination.
fn trace(start: Node, strategy: Strategy) -> (Vec<Snapshot<Node>>, Termination<Node>) {
    let mut search = search(start, strategy);
    let mut snapshots = Vec::new();
    loop {
        match search.step(false).unwrap() {
            Step::Expanded(s) | Step::Goal(s) => snapshots.push(s),
            Step::Done(t) => return (snapshots, t),
            Step::Cancelled => unreachable!("never cancelled"),
        }
    }
}

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

#[test]
fn every_strategy_terminates_and_agrees_on_reachability() {
    for seed in 0..SEEDS {
        let graph = random_graph(seed, 14, 3, 9);
        let reachable = graph.min_edges("n0").is_some();
        let start = graph.start("n0");
        for strategy in Strategy::ALL {
            let (snapshots, termination) = trace(start.clone(), strategy);
            match termination {
                Termination::GoalReached(goal) => {
                    assert!(reachable, "seed {seed} {strategy}: found unreachable goal");
                    assert!(goal.is_goal());
                    assert_eq!(goal.path()[0], start);
                    let last = snapshots.last().unwrap();
                    assert_eq!(last.current, goal, "goal must be the last snapshot's current");
                }
                Termination::Exhausted => {
                    assert!(!reachable, "seed {seed} {strategy}: missed a reachable goal");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Optimality
// ---------------------------------------------------------------------------

#[test]
fn breadth_first_goal_depth_is_minimal() {
    for seed in 0..SEEDS {
        let graph = random_graph(seed, 20, 3, 9);
        let expected = graph.min_edges("n0");
        let start = graph.start("n0");
        let mut search = search(start, Strategy::BreadthFirst);
        let found = search.run_to_completion().unwrap();
        assert_eq!(found.goal().map(SearchNode::depth), expected, "seed {seed}");
    }
}

#[test]
fn a_star_goal_cost_is_minimal_with_zero_heuristic() {
    for seed in 0..SEEDS {
        let graph = random_graph(seed, 20, 3, 9);
        let expected = graph.min_cost("n0");
        let mut search = search(graph.start("n0"), Strategy::AStar);
        let found = search.run_to_completion().unwrap();
        assert_eq!(found.goal().map(SearchNode::cost), expected, "seed {seed}");
    }
}

#[test]
fn a_star_goal_cost_is_minimal_with_admissible_heuristic() {
    for seed in 0..SEEDS {
        let graph = random_graph(seed, 20, 3, 9).with_half_exact_estimates();
        let expected = graph.min_cost("n0");
        let mut search = search(graph.start("n0"), Strategy::AStar);
        let found = search.run_to_completion().unwrap();
        assert_eq!(found.goal().map(SearchNode::cost), expected, "seed {seed}");
    }
}

#[test]
fn goal_path_cost_matches_node_cost() {
    for seed in 0..SEEDS {
        let graph = random_graph(seed, 16, 3, 9);
        let mut search = search(graph.start("n0"), Strategy::AStar);
        if let Termination::GoalReached(goal) = search.run_to_completion().unwrap() {
            let path = goal.path();
            assert_eq!(path.len() as u32, goal.depth() + 1);
            let costs: Vec<_> = path.iter().map(SearchNode::cost).collect();
            assert!(costs.windows(2).all(|w| w[0] < w[1]), "seed {seed}: {costs:?}");
        }
    }
}

// ---------------------------------------------------------------------------
// Visited monotonicity
// ---------------------------------------------------------------------------

#[test]
fn visited_only_grows_within_a_bound() {
    for seed in 0..SEEDS {
        let graph = random_graph(seed, 14, 3, 9);
        let start = graph.start("n0");
        for strategy in Strategy::ALL {
            let (snapshots, _) = trace(start.clone(), strategy);
            for pair in snapshots.windows(2) {
                let (before, after) = (&pair[0], &pair[1]);
                if before.depth_bound != after.depth_bound {
                    assert_eq!(strategy, Strategy::IterativeDeepening);
                    continue;
                }
                assert!(
                    after.visited.starts_with(&before.visited),
                    "seed {seed} {strategy}: visited shrank or reordered"
                );
                assert!(after.visited.len() <= before.visited.len() + 1);
            }
            for snapshot in &snapshots {
                let mut unique = snapshot.visited.to_vec();
                unique.sort_by(|a, b| a.label.cmp(&b.label));
                unique.dedup();
                assert_eq!(
                    unique.len(),
                    snapshot.visited.len(),
                    "seed {seed} {strategy}: finalized twice"
                );
            }
        }
    }
}

#[test]
fn frontier_snapshot_never_lists_a_node_twice() {
    for seed in 0..SEEDS {
        let graph = random_graph(seed, 14, 4, 9);
        let start = graph.start("n0");
        for strategy in Strategy::ALL {
            let (snapshots, _) = trace(start.clone(), strategy);
            for snapshot in snapshots {
                let mut labels: Vec<_> = snapshot
                    .frontier
                    .nodes()
                    .iter()
                    .map(|n| n.label.clone())
                    .collect();
                let len = labels.len();
                labels.sort();
                labels.dedup();
                assert_eq!(labels.len(), len, "seed {seed} {strategy}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cancellation idempotence
// ---------------------------------------------------------------------------

#[test]
fn cancellation_is_final_at_every_point() {
    let graph = random_graph(3, 14, 3, 9);
    let start = graph.start("n0");
    for strategy in Strategy::ALL {
        for after in 0..6 {
            let mut search = search(start.clone(), strategy);
            let mut done = false;
            for _ in 0..after {
                if search.step(false).unwrap().is_terminal() {
                    done = true;
                    break;
                }
            }
            if done {
                assert_eq!(search.step(true), Err(SearchError::Finished));
                continue;
            }
            let expansions = search.stats().expansions;
            assert_eq!(search.step(true), Ok(Step::Cancelled), "{strategy} after {after}");
            for cancel in [false, true, false] {
                assert_eq!(search.step(cancel), Err(SearchError::Cancelled));
            }
            assert_eq!(search.stats().expansions, expansions, "no expansion after cancel");
            assert!(search.is_terminated());
        }
    }
}

#[test]
fn misuse_fails_fast() {
    let start = random_graph(1, 6, 2, 3).start("n0");
    let mut search = Search::new(start, SearchPolicy::new(Strategy::DepthFirst)).unwrap();
    assert_eq!(search.step(false), Err(SearchError::NotStarted));
    search.start().unwrap();
    assert_eq!(search.start(), Err(SearchError::AlreadyStarted));
    search.run_to_completion().unwrap();
    assert_eq!(search.step(false), Err(SearchError::Finished));
    assert_eq!(search.step(false), Err(SearchError::Finished));
}
