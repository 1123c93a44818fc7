//! Run configuration loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration:
//! breadth-first over the demo grid.
//!
//! ```toml
//! strategy = "astar"
//! space = "grid"
//! max_steps = 5000
//!
//! [grid]
//! heuristic = "chebyshev"
//! obstacles = [{ y1 = 10, y2 = 20, x1 = 15, x2 = 25 }]
//!
//! [puzzle]
//! size = 3
//! shuffle_moves = 25
//! seed = 7
//!
//! [autocorrect]
//! text = "brithdya"
//! transitions = "td"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wayfind_search::{SearchPolicy, Strategy};

use crate::worlds::autocorrect::{AutocorrectSpace, Transitions};
use crate::worlds::grid::{demo_obstacles, GridHeuristic, GridLayout, GridSpace, Rect};
use crate::worlds::lexicon::Lexicon;
use crate::worlds::puzzle::PuzzleSpace;
use crate::worlds::WorldError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {detail}")]
    Invalid { detail: String },

    #[error(transparent)]
    World(#[from] WorldError),
}

/// Which state space to search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceKind {
    #[default]
    Grid,
    Puzzle,
    Autocorrect,
}

impl SpaceKind {
    pub const ALL: [Self; 3] = [Self::Grid, Self::Puzzle, Self::Autocorrect];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Puzzle => "puzzle",
            Self::Autocorrect => "autocorrect",
        }
    }
}

impl fmt::Display for SpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpaceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::Invalid {
                detail: format!("unknown space {s:?} (expected grid, puzzle, or autocorrect)"),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub strategy: Strategy,

    #[serde(default)]
    pub space: SpaceKind,

    /// Snapshot budget; the driver cancels once it is spent.
    #[serde(default)]
    pub max_steps: Option<u64>,

    /// Iterative deepening only.
    #[serde(default)]
    pub max_depth_bound: Option<u32>,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub puzzle: PuzzleConfig,

    #[serde(default)]
    pub autocorrect: AutocorrectConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
    #[serde(default = "default_grid_start")]
    pub start: (usize, usize),
    #[serde(default = "default_grid_goal")]
    pub goal: (usize, usize),
    /// `None` picks the demo layout for the strategy.
    #[serde(default)]
    pub obstacles: Option<Vec<Rect>>,
    #[serde(default)]
    pub heuristic: GridHeuristic,
}

fn default_rows() -> usize {
    25
}
fn default_cols() -> usize {
    50
}
fn default_grid_start() -> (usize, usize) {
    (12, 12)
}
fn default_grid_goal() -> (usize, usize) {
    (12, 37)
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            start: default_grid_start(),
            goal: default_grid_goal(),
            obstacles: None,
            heuristic: GridHeuristic::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleConfig {
    #[serde(default = "default_puzzle_size")]
    pub size: usize,
    #[serde(default = "default_shuffle_moves")]
    pub shuffle_moves: u32,
    #[serde(default)]
    pub seed: u64,
    /// Explicit board, row-major with `0` as blank. Overrides the shuffle.
    #[serde(default)]
    pub tiles: Option<Vec<u8>>,
}

fn default_puzzle_size() -> usize {
    3
}
fn default_shuffle_moves() -> u32 {
    20
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            size: default_puzzle_size(),
            shuffle_moves: default_shuffle_moves(),
            seed: 0,
            tiles: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutocorrectConfig {
    #[serde(default = "default_text")]
    pub text: String,
    /// Any of `i`, `t`, `d`.
    #[serde(default = "default_transitions")]
    pub transitions: String,
    /// One word per line. `None` uses the built-in list.
    #[serde(default)]
    pub lexicon: Option<PathBuf>,
}

fn default_text() -> String {
    "brithdya".to_string()
}
fn default_transitions() -> String {
    "td".to_string()
}

impl Default for AutocorrectConfig {
    fn default() -> Self {
        Self {
            text: default_text(),
            transitions: default_transitions(),
            lexicon: None,
        }
    }
}

impl RunConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = text.parse()?;
        tracing::debug!(
            path = %path.display(),
            strategy = %config.strategy,
            space = %config.space,
            "loaded config"
        );
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the depth-bound cap is set for a
    /// strategy other than iterative deepening.
    pub fn policy(&self) -> Result<SearchPolicy, ConfigError> {
        let mut policy = SearchPolicy::new(self.strategy);
        policy.max_depth_bound = self.max_depth_bound;
        policy.validate().map_err(|e| ConfigError::Invalid {
            detail: e.to_string(),
        })?;
        Ok(policy)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::World`] if the layout is invalid.
    pub fn grid_space(&self) -> Result<GridSpace, ConfigError> {
        let g = &self.grid;
        let layout = GridLayout {
            rows: g.rows,
            cols: g.cols,
            obstacles: g
                .obstacles
                .clone()
                .unwrap_or_else(|| demo_obstacles(self.strategy)),
            start: g.start,
            goal: g.goal,
            heuristic: g.heuristic,
        };
        Ok(GridSpace::new(layout)?)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::World`] for a bad size or tile set.
    pub fn puzzle_space(&self) -> Result<PuzzleSpace, ConfigError> {
        let p = &self.puzzle;
        let space = match &p.tiles {
            Some(tiles) => PuzzleSpace::from_tiles(p.size, tiles.clone())?,
            None => PuzzleSpace::shuffled(p.size, p.shuffle_moves, p.seed)?,
        };
        Ok(space)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::World`] for unknown transitions or an
    /// unreadable lexicon file.
    pub fn autocorrect_space(&self) -> Result<AutocorrectSpace, ConfigError> {
        let a = &self.autocorrect;
        let transitions: Transitions = a.transitions.parse()?;
        let lexicon = match &a.lexicon {
            Some(path) => Lexicon::from_file(path)?,
            None => Lexicon::builtin(),
        };
        Ok(AutocorrectSpace::new(a.text.clone(), lexicon, transitions))
    }
}

impl FromStr for RunConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
