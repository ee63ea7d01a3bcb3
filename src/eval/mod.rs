//! Action evaluation.
//!
//! Comparators used to rank candidate actions and potion orders.

pub(crate) mod heuristic;

pub use heuristic::{easier_potion_for, is_less_than};
