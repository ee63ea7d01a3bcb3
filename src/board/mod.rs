//! Game-state types.
//!
//! Contains the ingredient vector algebra, the candidate actions of a turn,
//! and the per-side witch state.

pub mod action;
pub mod ingredients;
pub mod witch;

pub use action::{Action, ActionKind};
pub use ingredients::{Ingredients, INGREDIENT_TIERS, MAX_INGREDIENTS};
pub use witch::{SideHistory, TurnMemory, Witch};

/// Number of potion orders visible on the counter at once.
pub const MAX_ORDERS: usize = 5;

/// Brew count that ends a game.
pub const MAX_BREWED: u32 = 3;
