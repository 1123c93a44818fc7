//! Rectangular grid with rectangular obstacles and 8-way moves.
//!
//! Positions are `(y, x)`, row first. Obstacles are half-open rectangles
//! `y1 <= y < y2`, `x1 <= x < x2`. Every move costs 1, diagonals included.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use wayfind_search::contract::release_chain;
use wayfind_search::{Cost, SearchNode, Strategy};

use super::WorldError;

/// Neighbour offsets `(dy, dx)`, clockwise from north.
const MOVES: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Half-open obstacle rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub y1: usize,
    pub y2: usize,
    pub x1: usize,
    pub x2: usize,
}

impl Rect {
    #[must_use]
    pub const fn new(y1: usize, y2: usize, x1: usize, x2: usize) -> Self {
        Self { y1, y2, x1, x2 }
    }

    #[must_use]
    pub fn contains(&self, (y, x): (usize, usize)) -> bool {
        (self.y1..self.y2).contains(&y) && (self.x1..self.x2).contains(&x)
    }
}

/// Estimate of the remaining distance to the goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridHeuristic {
    /// `dy² + dx²`. Pulls hard toward the goal; overestimates, so A* paths
    /// are not guaranteed optimal with it.
    #[default]
    SquaredEuclidean,
    /// `max(|dy|, |dx|)`. Exact on an open grid with diagonal moves.
    Chebyshev,
}

/// Grid parameters. Validated by [`GridSpace::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub obstacles: Vec<Rect>,
    pub start: (usize, usize),
    pub goal: (usize, usize),
    pub heuristic: GridHeuristic,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            rows: 25,
            cols: 50,
            obstacles: demo_obstacles(Strategy::BreadthFirst),
            start: (12, 12),
            goal: (12, 37),
            heuristic: GridHeuristic::SquaredEuclidean,
        }
    }
}

/// Demo obstacle layouts.
///
/// Best-first gets a pocket around the goal's approach that a greedy walk
/// runs straight into; every other strategy gets two offset walls.
#[must_use]
pub fn demo_obstacles(strategy: Strategy) -> Vec<Rect> {
    match strategy {
        Strategy::BestFirst => vec![
            Rect::new(5, 15, 33, 35),
            Rect::new(5, 7, 20, 35),
            Rect::new(13, 15, 20, 35),
        ],
        _ => vec![Rect::new(10, 20, 15, 25), Rect::new(5, 15, 30, 35)],
    }
}

/// A validated grid, cheap to clone.
#[derive(Debug, Clone)]
pub struct GridSpace {
    layout: Arc<GridLayout>,
}

impl GridSpace {
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidGrid`] if the grid is empty, or if start
    /// or goal is out of bounds or inside an obstacle.
    pub fn new(layout: GridLayout) -> Result<Self, WorldError> {
        if layout.rows == 0 || layout.cols == 0 {
            return Err(WorldError::InvalidGrid {
                detail: format!("empty grid {}x{}", layout.rows, layout.cols),
            });
        }
        for (name, pos) in [("start", layout.start), ("goal", layout.goal)] {
            if !layout.is_open(pos) {
                return Err(WorldError::InvalidGrid {
                    detail: format!("{name} {pos:?} is outside the grid or blocked"),
                });
            }
        }
        Ok(Self {
            layout: Arc::new(layout),
        })
    }

    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[must_use]
    pub fn start_node(&self) -> GridNode {
        GridNode {
            pos: self.layout.start,
            layout: Arc::clone(&self.layout),
            parent: None,
        }
    }
}

impl GridLayout {
    /// In bounds and not inside any obstacle.
    #[must_use]
    pub fn is_open(&self, pos: (usize, usize)) -> bool {
        pos.0 < self.rows && pos.1 < self.cols && !self.obstacles.iter().any(|r| r.contains(pos))
    }

    fn estimate(&self, (y, x): (usize, usize)) -> Cost {
        let dy = y.abs_diff(self.goal.0) as Cost;
        let dx = x.abs_diff(self.goal.1) as Cost;
        match self.heuristic {
            GridHeuristic::SquaredEuclidean => {
                dy.saturating_mul(dy).saturating_add(dx.saturating_mul(dx))
            }
            GridHeuristic::Chebyshev => dy.max(dx),
        }
    }
}

/// One cell reached by a chain of moves.
#[derive(Clone)]
pub struct GridNode {
    pos: (usize, usize),
    layout: Arc<GridLayout>,
    parent: Option<Arc<GridNode>>,
}

impl GridNode {
    #[must_use]
    pub fn pos(&self) -> (usize, usize) {
        self.pos
    }
}

impl SearchNode for GridNode {
    fn children(&self) -> Vec<Self> {
        let parent = Arc::new(self.clone());
        MOVES
            .iter()
            .filter_map(|&(dy, dx)| {
                let y = self.pos.0.checked_add_signed(dy)?;
                let x = self.pos.1.checked_add_signed(dx)?;
                self.layout.is_open((y, x)).then(|| Self {
                    pos: (y, x),
                    layout: Arc::clone(&self.layout),
                    parent: Some(Arc::clone(&parent)),
                })
            })
            .collect()
    }

    fn is_goal(&self) -> bool {
        self.pos == self.layout.goal
    }

    fn distance(&self) -> Cost {
        self.layout.estimate(self.pos)
    }

    fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }
}

impl Drop for GridNode {
    fn drop(&mut self) {
        release_chain(self.parent.take(), |node| node.parent.take());
    }
}

impl PartialEq for GridNode {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for GridNode {}

impl Hash for GridNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.hash(state);
    }
}

impl fmt::Debug for GridNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GridNode{:?}", self.pos)
    }
}

impl fmt::Display for GridNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.pos.0, self.pos.1)
    }
}
