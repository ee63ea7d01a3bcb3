//! Turn output formatting.
//!
//! The game host reads the first tokens of the line as the command; anything
//! after it is free-form and shown as a speech bubble.

use crate::board::action::Action;
use crate::search::planner::TurnPlan;

/// Formats the command for an action: `BREW <id>`, `CAST <id>`, or `REST`.
pub fn format_action(action: &Action) -> String {
    action.to_string()
}

/// Formats the full output line for a planned turn, optionally followed by
/// the running brew counts of both sides.
pub fn format_turn_line(plan: &TurnPlan, diagnostics: bool) -> String {
    let command = format_action(&plan.action());
    if diagnostics {
        format!(
            "{} ME: {} VS OPNT: {}",
            command, plan.me.brewed, plan.opponent.brewed
        )
    } else {
        command
    }
}
