//! State spaces the engine can search.
//!
//! Each world keeps its immutable layout behind an `Arc` shared by every
//! node, so cloning a node copies a position and two pointers.

pub mod autocorrect;
pub mod grid;
pub mod lexicon;
pub mod puzzle;

/// A world could not be built from the given parameters.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("invalid grid: {detail}")]
    InvalidGrid { detail: String },

    #[error("invalid puzzle: {detail}")]
    InvalidPuzzle { detail: String },

    #[error("invalid transitions {given:?}: unknown kind {kind:?} (expected any of i, t, d)")]
    InvalidTransitions { given: String, kind: char },

    #[error("failed to read lexicon: {0}")]
    Lexicon(#[from] std::io::Error),
}
