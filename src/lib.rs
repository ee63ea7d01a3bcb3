//! Cauldron engine library.
//!
//! Exposes the ingredient and action model, the action comparators, the
//! turn planner, and the turn protocol for use by the binaries, the
//! integration tests, and the benchmarks.

pub mod board;
pub mod engine;
pub mod eval;
pub mod logging;
pub mod protocol;
pub mod search;
pub mod selfplay;
