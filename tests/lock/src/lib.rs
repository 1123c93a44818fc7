//! Shared fixtures for the lock tests: explicit weighted digraphs.
//!
//! A [`Graph`] is built edge by edge (or generated from a seed), frozen
//! into an `Arc`, and explored through [`Node`]s. The graph also answers
//! the reference questions the properties are checked against: fewest
//! edges to a goal and cheapest cost to a goal.

#![forbid(unsafe_code)]

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wayfind_search::contract::release_chain;
use wayfind_search::{Cost, SearchNode};

#[derive(Debug, Default, Clone)]
pub struct Graph {
    edges: HashMap<String, Vec<(String, Cost)>>,
    goals: HashSet<String>,
    estimates: HashMap<String, Cost>,
}

impl Graph {
    #[must_use]
    pub fn edge(mut self, from: &str, to: &str, cost: Cost) -> Self {
        self.edges
            .entry(from.to_string())
            .or_default()
            .push((to.to_string(), cost));
        self
    }

    #[must_use]
    pub fn goal(mut self, label: &str) -> Self {
        self.goals.insert(label.to_string());
        self
    }

    #[must_use]
    pub fn estimate(mut self, label: &str, h: Cost) -> Self {
        self.estimates.insert(label.to_string(), h);
        self
    }

    /// Freeze the graph and return the node for `label`.
    #[must_use]
    pub fn start(self, label: &str) -> Node {
        Node {
            label: label.into(),
            cost: 0,
            graph: Arc::new(self),
            parent: None,
        }
    }

    fn successors(&self, label: &str) -> &[(String, Cost)] {
        self.edges.get(label).map(Vec::as_slice).unwrap_or_default()
    }

    /// Fewest edges from `start` to any goal.
    #[must_use]
    pub fn min_edges(&self, start: &str) -> Option<u32> {
        let mut seen = HashSet::from([start.to_string()]);
        let mut queue = VecDeque::from([(start.to_string(), 0u32)]);
        while let Some((label, depth)) = queue.pop_front() {
            if self.goals.contains(&label) {
                return Some(depth);
            }
            for (next, _) in self.successors(&label) {
                if seen.insert(next.clone()) {
                    queue.push_back((next.clone(), depth + 1));
                }
            }
        }
        None
    }

    /// Cheapest cost from `start` to any goal (Dijkstra).
    #[must_use]
    pub fn min_cost(&self, start: &str) -> Option<Cost> {
        let mut best: HashMap<String, Cost> = HashMap::from([(start.to_string(), 0)]);
        let mut heap = BinaryHeap::from([Reverse((0, start.to_string()))]);
        while let Some(Reverse((cost, label))) = heap.pop() {
            if best.get(&label).is_some_and(|&b| b < cost) {
                continue;
            }
            if self.goals.contains(&label) {
                return Some(cost);
            }
            for (next, step) in self.successors(&label) {
                let c = cost + step;
                if best.get(next).map_or(true, |&b| c < b) {
                    best.insert(next.clone(), c);
                    heap.push(Reverse((c, next.clone())));
                }
            }
        }
        None
    }

    /// Replace every estimate with half the true remaining cost to the
    /// nearest goal (0 where no goal is reachable). Admissible by
    /// construction.
    #[must_use]
    pub fn with_half_exact_estimates(mut self) -> Self {
        let labels: Vec<String> = self
            .edges
            .iter()
            .flat_map(|(from, out)| {
                std::iter::once(from.clone()).chain(out.iter().map(|(to, _)| to.clone()))
            })
            .collect();
        let estimates = labels
            .into_iter()
            .map(|l| {
                let h = self.min_cost(&l).map_or(0, |c| c / 2);
                (l, h)
            })
            .collect();
        self.estimates = estimates;
        self
    }
}

/// Seeded random digraph over `n0..n{nodes-1}`, cycles allowed.
///
/// Each node gets up to `out_degree` edges with cost 1..=`max_cost`; about
/// one node in eight is a goal, never `n0`.
#[must_use]
pub fn random_graph(seed: u64, nodes: usize, out_degree: usize, max_cost: Cost) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::default();
    for from in 0..nodes {
        for _ in 0..rng.gen_range(0..=out_degree) {
            let to = rng.gen_range(0..nodes);
            let cost = rng.gen_range(1..=max_cost);
            graph = graph.edge(&format!("n{from}"), &format!("n{to}"), cost);
        }
    }
    for i in 1..nodes {
        if rng.gen_ratio(1, 8) {
            graph = graph.goal(&format!("n{i}"));
        }
    }
    graph
}

/// Complete binary tree of `depth` levels below the root `t`. Children of
/// `t` are `t0`, `t1`; children of `t0` are `t00`, `t01`, and so on.
#[must_use]
pub fn binary_tree(depth: usize) -> Graph {
    let mut graph = Graph::default();
    let mut level = vec!["t".to_string()];
    for _ in 0..depth {
        let mut next = Vec::new();
        for parent in &level {
            for bit in ["0", "1"] {
                let child = format!("{parent}{bit}");
                graph = graph.edge(parent, &child, 1);
                next.push(child);
            }
        }
        level = next;
    }
    graph
}

#[derive(Clone)]
pub struct Node {
    pub label: Arc<str>,
    cost: Cost,
    graph: Arc<Graph>,
    parent: Option<Arc<Node>>,
}

impl Node {
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

impl SearchNode for Node {
    fn children(&self) -> Vec<Self> {
        let parent = Arc::new(self.clone());
        self.graph
            .successors(&self.label)
            .iter()
            .map(|(to, step)| Self {
                label: to.as_str().into(),
                cost: self.cost + step,
                graph: Arc::clone(&self.graph),
                parent: Some(Arc::clone(&parent)),
            })
            .collect()
    }

    fn is_goal(&self) -> bool {
        self.graph.goals.contains(&*self.label)
    }

    fn distance(&self) -> Cost {
        self.graph.estimates.get(&*self.label).copied().unwrap_or(0)
    }

    fn cost(&self) -> Cost {
        self.cost
    }

    fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        release_chain(self.parent.take(), |node| node.parent.take());
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Labels of `nodes`, in order.
#[must_use]
pub fn labels(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| &*n.label).collect()
}
