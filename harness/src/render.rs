//! Plain-text rendering of grid snapshots.

use wayfind_search::{SearchNode, Snapshot};

use crate::worlds::grid::{GridNode, GridSpace};

/// What a cell shows. Later marks overwrite earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Blank,
    Obstacle,
    Start,
    Goal,
    Queued,
    QueuedGoal,
    Visited,
    Current,
    Path,
}

impl Cell {
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::Blank => '.',
            Self::Obstacle => '#',
            Self::Start => 'S',
            Self::Goal => 'G',
            Self::Queued => 'o',
            Self::QueuedGoal => 'g',
            Self::Visited => 'x',
            Self::Current => '@',
            Self::Path => '*',
        }
    }
}

/// Classify every cell for one snapshot.
///
/// Marks go down in this order: start, goal, queued, visited, current,
/// then the path back from `current` when `show_path` is set.
#[must_use]
pub fn classify(
    space: &GridSpace,
    snapshot: &Snapshot<GridNode>,
    show_path: bool,
) -> Vec<Vec<Cell>> {
    let layout = space.layout();
    let mut cells: Vec<Vec<Cell>> = (0..layout.rows)
        .map(|y| {
            (0..layout.cols)
                .map(|x| {
                    if layout.is_open((y, x)) {
                        Cell::Blank
                    } else {
                        Cell::Obstacle
                    }
                })
                .collect()
        })
        .collect();

    let mut mark = |(y, x): (usize, usize), cell: Cell| cells[y][x] = cell;
    mark(layout.start, Cell::Start);
    mark(layout.goal, Cell::Goal);
    for node in snapshot.frontier.nodes() {
        let cell = if node.pos() == layout.goal {
            Cell::QueuedGoal
        } else {
            Cell::Queued
        };
        mark(node.pos(), cell);
    }
    for node in snapshot.visited.iter() {
        mark(node.pos(), Cell::Visited);
    }
    mark(snapshot.current.pos(), Cell::Current);
    if show_path {
        let current = snapshot.current.pos();
        for node in snapshot.current.path() {
            if node.pos() != current {
                mark(node.pos(), Cell::Path);
            }
        }
    }
    cells
}

/// One line per row, one glyph per cell.
#[must_use]
pub fn render_grid(space: &GridSpace, snapshot: &Snapshot<GridNode>, show_path: bool) -> String {
    let cells = classify(space, snapshot, show_path);
    let mut out = String::with_capacity(cells.len() * (space.layout().cols + 1));
    for row in cells {
        out.extend(row.into_iter().map(Cell::glyph));
        out.push('\n');
    }
    out
}
