//! Wayfind Search: step-driven graph search over any state space.
//!
//! This crate is the engine only. State spaces, rendering, and the driver
//! live in `wayfind_harness` and `wayfind_cli`.
//!
//! # Crate dependency graph
//!
//! ```text
//! wayfind_search  ←  wayfind_harness  ←  wayfind_cli
//! (engine, frontier)  (worlds, runner)    (driver binary)
//! ```
//!
//! # Key types
//!
//! - [`SearchNode`]: the capability contract every state-space node implements
//! - [`Strategy`]: depth-first, breadth-first, best-first, iterative deepening, A*
//! - [`Search`]: the step-driven engine (`start`, then `step(cancel)`)
//! - [`Step`] / [`Snapshot`]: what the driver sees after every expansion
//! - [`Frontier`] / [`Ledger`]: the seams the engine is parameterized by
//! - [`instrument::Instrumented`]: operation-counting decorator for those seams

#![forbid(unsafe_code)]

pub mod contract;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod instrument;
pub mod key;
pub mod ledger;
pub mod policy;
pub mod step;
pub mod strategy;

pub use contract::{Cost, SearchNode};
pub use engine::Search;
pub use error::SearchError;
pub use frontier::{Frontier, FrontierView};
pub use ledger::Ledger;
pub use policy::SearchPolicy;
pub use step::{SearchStats, Snapshot, Step, Termination};
pub use strategy::Strategy;
