//! Strategy selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::contract::SearchNode;
use crate::frontier::{Frontier, PriorityFrontier, QueueFrontier, StackFrontier};

/// The five traversal strategies.
///
/// | Strategy | Frontier | Priority key |
/// |---|---|---|
/// | `DepthFirst` | stack | none |
/// | `BreadthFirst` | queue | none |
/// | `BestFirst` | heap | `distance()` |
/// | `IterativeDeepening` | stack + depth | none, bounded by the depth bound |
/// | `AStar` | heap | `cost() + distance()` |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    DepthFirst,
    #[default]
    BreadthFirst,
    BestFirst,
    IterativeDeepening,
    AStar,
}

impl Strategy {
    /// All strategies, in documentation order.
    pub const ALL: [Strategy; 5] = [
        Strategy::DepthFirst,
        Strategy::BreadthFirst,
        Strategy::BestFirst,
        Strategy::IterativeDeepening,
        Strategy::AStar,
    ];

    /// Stable lowercase name (also the CLI spelling).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DepthFirst => "depthfirst",
            Self::BreadthFirst => "breadthfirst",
            Self::BestFirst => "bestfirst",
            Self::IterativeDeepening => "iterativedeepening",
            Self::AStar => "astar",
        }
    }

    /// Whether the strategy orders by `distance()`.
    #[must_use]
    pub fn uses_heuristic(self) -> bool {
        matches!(self, Self::BestFirst | Self::AStar)
    }

    /// Whether the strategy keeps a best-cost ledger.
    #[must_use]
    pub fn uses_cost(self) -> bool {
        matches!(self, Self::AStar)
    }

    /// A fresh, empty frontier with this strategy's discipline.
    #[must_use]
    pub fn frontier<N: SearchNode + 'static>(self) -> Box<dyn Frontier<N>> {
        match self {
            Self::DepthFirst | Self::IterativeDeepening => Box::new(StackFrontier::new()),
            Self::BreadthFirst => Box::new(QueueFrontier::new()),
            Self::BestFirst | Self::AStar => Box::new(PriorityFrontier::new()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown strategy `{0}` (expected one of depthfirst, breadthfirst, bestfirst, \
     iterativedeepening, astar)"
)]
pub struct ParseStrategyError(pub String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    /// Case-insensitive; `-` and `_` are ignored, so `a-star` and
    /// `Iterative_Deepening` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "depthfirst" | "dfs" => Ok(Self::DepthFirst),
            "breadthfirst" | "bfs" => Ok(Self::BreadthFirst),
            "bestfirst" | "greedy" => Ok(Self::BestFirst),
            "iterativedeepening" | "iddfs" => Ok(Self::IterativeDeepening),
            "astar" => Ok(Self::AStar),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}
