//! Candidate actions for one turn.
//!
//! Every potion order and spell visible in the turn input becomes an
//! [`Action`]. Actions are rebuilt from scratch each turn and never mutated
//! afterwards; the planner only reads them.

use std::fmt;

use super::ingredients::Ingredients;
use super::witch::Witch;

/// The kind of an action, mirroring the type tokens of the turn input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// A potion order: negative delta, pays `points`, consumed once.
    Brew,
    /// One of my spells.
    Cast,
    /// One of the opponent's spells.
    OpponentCast,
    /// A tome spell. Accepted by the grammar but never evaluated.
    Learn,
    /// Refreshes every exhausted spell. Always legal.
    Rest,
}

impl ActionKind {
    /// Returns the protocol token for this kind.
    pub const fn token(self) -> &'static str {
        match self {
            ActionKind::Brew => "BREW",
            ActionKind::Cast => "CAST",
            ActionKind::OpponentCast => "OPPONENT_CAST",
            ActionKind::Learn => "LEARN",
            ActionKind::Rest => "REST",
        }
    }

    /// Parses a kind from its protocol token.
    pub fn from_token(token: &str) -> Option<ActionKind> {
        match token {
            "BREW" => Some(ActionKind::Brew),
            "CAST" => Some(ActionKind::Cast),
            "OPPONENT_CAST" => Some(ActionKind::OpponentCast),
            "LEARN" => Some(ActionKind::Learn),
            "REST" => Some(ActionKind::Rest),
            _ => None,
        }
    }

    /// True for spell kinds that transform ingredients.
    pub const fn is_spell(self) -> bool {
        matches!(self, ActionKind::Cast | ActionKind::OpponentCast)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A single candidate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub id: i32,
    pub kind: ActionKind,
    pub delta: Ingredients,
    pub points: i32,
    pub castable: bool,
    pub repeatable: bool,
    /// Tier-0 ingredients taxed onto a tome spell. Carried, unused.
    pub tax_count: i32,
    /// Position of a tome spell. Carried, unused.
    pub tome_index: i32,
}

impl Action {
    /// The rest action injected into every candidate list.
    pub const fn rest() -> Action {
        Action {
            id: 0,
            kind: ActionKind::Rest,
            delta: Ingredients::ZERO,
            points: 0,
            castable: false,
            repeatable: false,
            tax_count: 0,
            tome_index: 0,
        }
    }

    /// A potion order.
    pub const fn brew(id: i32, delta: Ingredients, points: i32) -> Action {
        Action {
            id,
            kind: ActionKind::Brew,
            delta,
            points,
            castable: false,
            repeatable: false,
            tax_count: 0,
            tome_index: 0,
        }
    }

    /// A spell of the given kind.
    pub const fn spell(id: i32, kind: ActionKind, delta: Ingredients, castable: bool) -> Action {
        Action {
            id,
            kind,
            delta,
            points: 0,
            castable,
            repeatable: false,
            tax_count: 0,
            tome_index: 0,
        }
    }

    /// Returns whether `witch` can perform this action right now.
    ///
    /// # Panics
    ///
    /// Panics on a `Learn` action, which has no evaluation path. Turns
    /// containing one are rejected before planning.
    pub fn is_possible_for(&self, witch: &Witch) -> bool {
        match self.kind {
            ActionKind::Brew => witch.ingredients.add(self.delta).is_legit(),
            ActionKind::Cast => {
                witch.me && self.castable && witch.ingredients.add(self.delta).is_legit()
            }
            ActionKind::OpponentCast => {
                !witch.me && self.castable && witch.ingredients.add(self.delta).is_legit()
            }
            ActionKind::Rest => true,
            ActionKind::Learn => panic!("no evaluation path for LEARN action {}", self.id),
        }
    }

    /// Returns whether this action supplies an ingredient `witch` lacks
    /// for brewing `target`.
    ///
    /// Only spells are ever filtered out; any other kind, or a target that is
    /// not a potion order, is always needed.
    pub fn is_needed_for(&self, witch: &Witch, target: &Action) -> bool {
        if target.kind != ActionKind::Brew || !self.kind.is_spell() {
            return true;
        }
        let after = witch.ingredients.add(target.delta);
        let needed = after
            .iter()
            .zip(self.delta.iter())
            .any(|(have, gives)| have < 0 && gives > 0);
        log::trace!(
            "spell {} {} needed for order {}: {}",
            self.id,
            self.delta,
            target.id,
            needed
        );
        needed
    }
}

/// Writes the protocol command for this action: `BREW <id>`, `CAST <id>`,
/// or the bare kind token otherwise.
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ActionKind::Brew | ActionKind::Cast => write!(f, "{} {}", self.kind, self.id),
            _ => write!(f, "{}", self.kind),
        }
    }
}
