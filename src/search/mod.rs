//! Action selection.
//!
//! Ranks candidate actions and plans each turn around a target potion
//! order. There is no lookahead: every decision uses the current turn only.

pub mod planner;
pub mod ranker;

pub use planner::{build_candidates, choose_action, plan_turn, Choice, PlanError, TurnPlan};
pub use ranker::{pick, pick_by};
