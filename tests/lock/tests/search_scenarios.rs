//! Lock tests for the documented concrete scenarios and the demo worlds.

use lock_tests::{binary_tree, labels, Graph, Node};
use wayfind_harness::config::RunConfig;
use wayfind_harness::runner::{run, RunOutcome, Unobserved};
use wayfind_harness::worlds::grid::{GridHeuristic, GridLayout, GridSpace};
use wayfind_search::{Search, SearchNode, SearchPolicy, Step, Strategy, Termination};

/// `S -> A (1) -> G (1)` and `S -> B (5) -> G (1)`.
fn two_routes() -> Node {
    Graph::default()
        .edge("S", "A", 1)
        .edge("S", "B", 5)
        .edge("A", "G", 1)
        .edge("B", "G", 1)
        .goal("G")
        .start("S")
}

// ---------------------------------------------------------------------------
// Two routes to one goal
// ---------------------------------------------------------------------------

#[test]
fn breadth_first_takes_the_first_found_route() {
    let mut search = Search::new(two_routes(), SearchPolicy::new(Strategy::BreadthFirst)).unwrap();
    search.start().unwrap();
    let steps: Vec<_> = search.steps().collect();

    let expanded: Vec<&str> = steps
        .iter()
        .filter_map(|s| match s {
            Step::Expanded(snapshot) => Some(&*snapshot.current.label),
            _ => None,
        })
        .collect();
    assert_eq!(expanded, ["S", "A", "B"], "exactly two expansions beyond S");

    let Some(Step::Done(Termination::GoalReached(goal))) = steps.last() else {
        panic!("expected goal, got {:?}", steps.last());
    };
    assert_eq!(labels(&goal.path()), ["S", "A", "G"]);
    assert_eq!(goal.depth(), 2);
}

#[test]
fn a_star_takes_the_cheaper_route() {
    let mut search = Search::new(two_routes(), SearchPolicy::new(Strategy::AStar)).unwrap();
    let Termination::GoalReached(goal) = search.run_to_completion().unwrap() else {
        panic!("goal is reachable");
    };
    assert_eq!(goal.cost(), 2);
    assert_eq!(labels(&goal.path()), ["S", "A", "G"]);
}

#[test]
fn best_first_is_greedy_on_distance() {
    // The estimate lures best-first down the expensive branch.
    let start = Graph::default()
        .edge("S", "A", 1)
        .edge("S", "B", 5)
        .edge("A", "G", 1)
        .edge("B", "G", 1)
        .goal("G")
        .estimate("A", 9)
        .estimate("B", 1)
        .start("S");
    let mut search = Search::new(start, SearchPolicy::new(Strategy::BestFirst)).unwrap();
    let Termination::GoalReached(goal) = search.run_to_completion().unwrap() else {
        panic!("goal is reachable");
    };
    assert_eq!(labels(&goal.path()), ["S", "B", "G"]);
    assert_eq!(goal.cost(), 6);
}

// ---------------------------------------------------------------------------
// Iterative deepening: goal at depth 3, branching factor 2
// ---------------------------------------------------------------------------

#[test]
fn iterative_deepening_restarts_at_every_bound() {
    let start = binary_tree(3).goal("t000").start("t");
    let mut search = Search::new(start, SearchPolicy::new(Strategy::IterativeDeepening)).unwrap();
    search.start().unwrap();

    let mut root_bounds = Vec::new();
    let mut goal_bound = None;
    for step in search.steps() {
        match step {
            Step::Expanded(s) if &*s.current.label == "t" => {
                root_bounds.push(s.depth_bound.unwrap());
            }
            Step::Goal(s) => goal_bound = s.depth_bound,
            _ => {}
        }
    }
    assert_eq!(root_bounds, [0, 1, 2, 3], "start re-expanded at every bound");
    assert_eq!(goal_bound, Some(3));
    let stats = search.stats();
    assert_eq!(stats.bound_restarts, 3);
    // Bounds 0..=2 expand every node within the bound: 1 + 3 + 7. The
    // leftmost leaf is popped last, so bound 3 expands the other 14.
    assert_eq!(stats.expansions, 1 + 3 + 7 + 14);
}

#[test]
fn iterative_deepening_exhausts_finite_goalless_tree() {
    let start = binary_tree(2).start("t");
    let mut search = Search::new(start, SearchPolicy::new(Strategy::IterativeDeepening)).unwrap();
    assert_eq!(search.run_to_completion().unwrap(), Termination::Exhausted);
    assert_eq!(search.depth_bound(), Some(2));
}

#[test]
fn iterative_deepening_respects_bound_cap() {
    let start = binary_tree(4).goal("t1111").start("t");
    let policy = SearchPolicy::new(Strategy::IterativeDeepening).with_max_depth_bound(2);
    let mut search = Search::new(start, policy).unwrap();
    assert_eq!(search.run_to_completion().unwrap(), Termination::Exhausted);
    assert_eq!(search.stats().bound_restarts, 2);
}

// ---------------------------------------------------------------------------
// Demo worlds
// ---------------------------------------------------------------------------

#[test]
fn demo_grid_is_solved_by_every_strategy() {
    for strategy in Strategy::ALL {
        let config = RunConfig {
            strategy,
            ..RunConfig::default()
        };
        let space = config.grid_space().unwrap();
        let mut search = Search::new(space.start_node(), config.policy().unwrap()).unwrap();
        let report = run(&mut search, None, &mut Unobserved).unwrap();
        let RunOutcome::GoalReached(goal) = &report.outcome else {
            panic!("{strategy}: {:?}", report.outcome);
        };
        assert_eq!(goal.pos(), (12, 37), "{strategy}");
        assert_eq!(report.path.first().map(|n| n.pos()), Some((12, 12)));
    }
}

#[test]
fn grid_a_star_with_chebyshev_matches_breadth_first_length() {
    let layout = GridLayout {
        heuristic: GridHeuristic::Chebyshev,
        ..GridLayout::default()
    };
    let space = GridSpace::new(layout).unwrap();
    let mut bfs =
        Search::new(space.start_node(), SearchPolicy::new(Strategy::BreadthFirst)).unwrap();
    let mut astar = Search::new(space.start_node(), SearchPolicy::new(Strategy::AStar)).unwrap();
    let bfs_goal = bfs.run_to_completion().unwrap();
    let astar_goal = astar.run_to_completion().unwrap();
    let depth = bfs_goal.goal().unwrap().depth();
    assert_eq!(astar_goal.goal().unwrap().cost(), u64::from(depth));
    assert!(astar.stats().expansions <= bfs.stats().expansions);
}

#[test]
fn demo_autocorrect_and_puzzle() {
    let config = RunConfig::default();

    let space = config.autocorrect_space().unwrap();
    let mut search =
        Search::new(space.start_node(), SearchPolicy::new(Strategy::BreadthFirst)).unwrap();
    let Termination::GoalReached(word) = search.run_to_completion().unwrap() else {
        panic!("demo word has a correction");
    };
    assert_eq!(word.text(), "birthday");

    let space = config.puzzle_space().unwrap();
    let mut search = Search::new(space.start_node(), SearchPolicy::new(Strategy::AStar)).unwrap();
    let Termination::GoalReached(board) = search.run_to_completion().unwrap() else {
        panic!("shuffled boards are solvable");
    };
    assert!(board.is_goal());
    assert!(board.cost() <= u64::from(config.puzzle.shuffle_moves));
}

// ---------------------------------------------------------------------------
// Long chains
// ---------------------------------------------------------------------------

#[test]
fn depth_first_walks_a_long_chain_and_drops_its_goal() {
    const LEN: u32 = 100_000;
    let mut graph = Graph::default();
    for i in 0..LEN {
        graph = graph.edge(&format!("n{i}"), &format!("n{}", i + 1), 1);
    }
    let start = graph.goal(&format!("n{LEN}")).start("n0");

    let mut search = Search::new(start, SearchPolicy::new(Strategy::DepthFirst)).unwrap();
    search.start().unwrap();
    let mut snapshots = 0u32;
    let mut end = None;
    for step in search.steps() {
        match step {
            Step::Expanded(snapshot) | Step::Goal(snapshot) => {
                assert!(snapshot.frontier.len() <= 1);
                snapshots += 1;
            }
            Step::Done(termination) => end = Some(termination),
            Step::Cancelled => unreachable!("never cancelled"),
        }
    }
    assert_eq!(snapshots, LEN + 1);

    let Some(Termination::GoalReached(goal)) = end else {
        panic!("chain end is a goal");
    };
    assert_eq!(goal.depth(), LEN);
    assert_eq!(goal.cost(), u64::from(LEN));
    assert_eq!(search.stats().expansions, u64::from(LEN));
    drop(search);
    drop(goal);
}
