//! Best-action selection.
//!
//! Picks the maximum of a candidate list under an injected "is worse than"
//! comparator. Among candidates that do not lose to the running best, the
//! later one wins, so the result matches taking the last element of a
//! stable ascending sort.

use crate::board::action::Action;
use crate::eval::is_less_than;

/// Picks the best action under [`is_less_than`]. An empty list yields REST.
pub fn pick(actions: &[Action]) -> Action {
    pick_by(actions, is_less_than)
}

/// Picks the best action under `less`. An empty list yields REST.
pub fn pick_by<F>(actions: &[Action], less: F) -> Action
where
    F: Fn(&Action, &Action) -> bool,
{
    let mut iter = actions.iter();
    let Some(first) = iter.next() else {
        return Action::rest();
    };
    let mut best = first;
    for candidate in iter {
        if !less(candidate, best) {
            best = candidate;
        }
    }
    *best
}
