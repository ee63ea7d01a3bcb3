//! Action comparators.
//!
//! Both comparators answer "is `a` worse than `b`?"; the ranker keeps the
//! best action under them. Neither is a weighted score: [`is_less_than`] is
//! a short-circuit chain of clauses whose order sets their priority.

use crate::board::action::{Action, ActionKind};
use crate::board::witch::Witch;

/// Returns true if `a` ranks below `other` for the final pick.
///
/// REST is never preferred over anything. Otherwise `a` loses when it is a
/// non-brew facing a different kind, when it pays fewer points, or when its
/// delta does not sit strictly further from the even split than `other`'s.
pub fn is_less_than(a: &Action, other: &Action) -> bool {
    other.kind != ActionKind::Rest
        && ((a.kind != other.kind && a.kind != ActionKind::Brew)
            || a.points < other.points
            || !a.delta.is_more_balanced_than(other.delta))
}

/// Orders potion orders by the complexity left after brewing them from
/// `witch`'s inventory. The ranker's maximum is the easiest order.
///
/// # Panics
///
/// The returned comparator panics when given anything but two `Brew`
/// actions.
pub fn easier_potion_for(witch: Witch) -> impl Fn(&Action, &Action) -> bool {
    move |ai: &Action, aj: &Action| {
        assert!(
            ai.kind == ActionKind::Brew && aj.kind == ActionKind::Brew,
            "easier_potion_for compares potion orders only, got {} and {}",
            ai.kind,
            aj.kind
        );
        witch.ingredients.add(ai.delta).complexity()
            < witch.ingredients.add(aj.delta).complexity()
    }
}
