//! n×n sliding-tile puzzle.
//!
//! Tiles are numbered `1..n²`, `0` is the blank. The solved board reads
//! `1, 2, ..., n²-1` row by row with the blank last.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use wayfind_search::contract::release_chain;
use wayfind_search::{Cost, SearchNode};

use super::WorldError;

/// Blank moves `(dy, dx)`: up, right, down, left.
const MOVES: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Board layout, row-major.
type Tiles = Arc<[u8]>;

/// A starting board. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleSpace {
    size: usize,
    tiles: Tiles,
}

impl PuzzleSpace {
    /// The solved board.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidPuzzle`] unless `2 <= size <= 15`.
    pub fn solved(size: usize) -> Result<Self, WorldError> {
        if !(2..=15).contains(&size) {
            return Err(WorldError::InvalidPuzzle {
                detail: format!("size {size} is outside 2..=15"),
            });
        }
        Ok(Self {
            size,
            tiles: solved_tiles(size).into(),
        })
    }

    /// A board given row by row.
    ///
    /// Boards that are not a permutation of `0..size²` are rejected. Boards
    /// from the other parity class are accepted; they exhaust.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidPuzzle`] for a bad size or tile set.
    pub fn from_tiles(size: usize, tiles: Vec<u8>) -> Result<Self, WorldError> {
        let mut space = Self::solved(size)?;
        let mut sorted = tiles.clone();
        sorted.sort_unstable();
        if sorted.iter().copied().ne(0..tile_count(size)) {
            return Err(WorldError::InvalidPuzzle {
                detail: format!("tiles must be a permutation of 0..{}", size * size),
            });
        }
        space.tiles = tiles.into();
        Ok(space)
    }

    /// Random walk of `moves` blank moves from the solved board.
    ///
    /// The walk never immediately undoes its previous move. Same seed, same
    /// board; every board produced this way is solvable.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidPuzzle`] for a bad size.
    pub fn shuffled(size: usize, moves: u32, seed: u64) -> Result<Self, WorldError> {
        let mut space = Self::solved(size)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tiles = space.tiles.to_vec();
        let mut blank = tiles.len() - 1;
        let mut previous: Option<usize> = None;
        for _ in 0..moves {
            let options: Vec<usize> = MOVES
                .iter()
                .filter_map(|&m| slide_target(size, blank, m))
                .filter(|&target| Some(target) != previous)
                .collect();
            let Some(&target) = options.choose(&mut rng) else {
                break;
            };
            tiles.swap(blank, target);
            previous = Some(blank);
            blank = target;
        }
        space.tiles = tiles.into();
        Ok(space)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn start_node(&self) -> PuzzleNode {
        PuzzleNode {
            size: self.size,
            tiles: Arc::clone(&self.tiles),
            parent: None,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn tile_count(size: usize) -> u8 {
    (size * size) as u8
}

fn solved_tiles(size: usize) -> Vec<u8> {
    let mut tiles: Vec<u8> = (1..tile_count(size)).collect();
    tiles.push(0);
    tiles
}

/// Index the blank moves to, if the move stays on the board.
fn slide_target(size: usize, blank: usize, (dy, dx): (isize, isize)) -> Option<usize> {
    let y = (blank / size).checked_add_signed(dy)?;
    let x = (blank % size).checked_add_signed(dx)?;
    (y < size && x < size).then_some(y * size + x)
}

/// One board reached by a chain of slides.
#[derive(Clone)]
pub struct PuzzleNode {
    size: usize,
    tiles: Tiles,
    parent: Option<Arc<PuzzleNode>>,
}

impl PuzzleNode {
    #[must_use]
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    fn blank(&self) -> usize {
        self.tiles.iter().position(|&t| t == 0).unwrap_or(0)
    }
}

impl SearchNode for PuzzleNode {
    fn children(&self) -> Vec<Self> {
        let parent = Arc::new(self.clone());
        let blank = self.blank();
        MOVES
            .iter()
            .filter_map(|&m| slide_target(self.size, blank, m))
            .map(|target| {
                let mut tiles = self.tiles.to_vec();
                tiles.swap(blank, target);
                Self {
                    size: self.size,
                    tiles: tiles.into(),
                    parent: Some(Arc::clone(&parent)),
                }
            })
            .collect()
    }

    fn is_goal(&self) -> bool {
        self.tiles.iter().copied().eq(solved_tiles(self.size))
    }

    /// Sum over tiles of Manhattan distance to the solved position.
    fn distance(&self) -> Cost {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t != 0)
            .map(|(i, &t)| {
                let home = usize::from(t) - 1;
                let dy = (i / self.size).abs_diff(home / self.size);
                let dx = (i % self.size).abs_diff(home % self.size);
                (dy + dx) as Cost
            })
            .sum()
    }

    fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }
}

impl Drop for PuzzleNode {
    fn drop(&mut self) {
        release_chain(self.parent.take(), |node| node.parent.take());
    }
}

impl PartialEq for PuzzleNode {
    fn eq(&self, other: &Self) -> bool {
        self.tiles == other.tiles
    }
}

impl Eq for PuzzleNode {}

impl Hash for PuzzleNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tiles.hash(state);
    }
}

impl fmt::Debug for PuzzleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PuzzleNode({self})")
    }
}

/// Rows separated by `/`, blank as `_`: `1 2 3/4 5 6/7 8 _`.
impl fmt::Display for PuzzleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.tiles.chunks(self.size).enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            for (j, &tile) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                if tile == 0 {
                    f.write_str("_")?;
                } else {
                    write!(f, "{tile}")?;
                }
            }
        }
        Ok(())
    }
}
