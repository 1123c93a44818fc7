//! Wayfind Harness: concrete state spaces and the driver-side plumbing.
//!
//! The harness does NOT implement search. It supplies worlds for the
//! engine to explore and owns everything a driver does around the step
//! channel: configuration, pumping steps under a budget, recording
//! transcripts, and rendering snapshots.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod digest;
pub mod render;
pub mod runner;
pub mod transcript;
pub mod worlds;
