//! Turn planning.
//!
//! One call per turn: observe both witches, pick the easiest potion order as
//! the target, keep only the actions that move toward it, fall back to every
//! feasible action when that leaves nothing useful, and rank what remains.
//! Nothing is carried between calls except the [`TurnMemory`] passed in and
//! returned.

use crate::board::action::{Action, ActionKind};
use crate::board::witch::{SideHistory, TurnMemory, Witch};
use crate::eval::easier_potion_for;
use crate::protocol::parser::TurnInput;
use crate::search::ranker::{pick, pick_by};

/// Errors that stop a turn before planning starts.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("unsupported action type {kind} for action {id}")]
    UnsupportedAction { id: i32, kind: ActionKind },
}

/// The outcome of selecting an action from a candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// The action to emit.
    pub action: Action,
    /// The potion order being worked toward, or REST when there is none.
    pub target: Action,
    /// Whether the stuck fallback replaced the filtered set.
    pub stuck: bool,
}

/// The full result of planning one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPlan {
    pub choice: Choice,
    pub me: Witch,
    pub opponent: Witch,
    /// Memory to hand to the next turn.
    pub memory: TurnMemory,
}

impl TurnPlan {
    /// The action chosen for this turn.
    pub fn action(&self) -> Action {
        self.choice.action
    }
}

/// Builds the candidate list: the injected REST first, then every input
/// action in order.
///
/// An input REST record is folded into the injected one. LEARN has no
/// evaluation path and rejects the whole turn.
pub fn build_candidates(actions: &[Action]) -> Result<Vec<Action>, PlanError> {
    let mut candidates = Vec::with_capacity(actions.len() + 1);
    candidates.push(Action::rest());
    for action in actions {
        match action.kind {
            ActionKind::Brew | ActionKind::Cast | ActionKind::OpponentCast => {
                candidates.push(*action)
            }
            ActionKind::Rest => {}
            ActionKind::Learn => {
                return Err(PlanError::UnsupportedAction {
                    id: action.id,
                    kind: action.kind,
                })
            }
        }
    }
    Ok(candidates)
}

/// Selects this turn's action for `me` from a validated candidate list.
pub fn choose_action(candidates: &[Action], me: &Witch) -> Choice {
    let orders: Vec<Action> = candidates
        .iter()
        .filter(|a| a.kind == ActionKind::Brew)
        .copied()
        .collect();
    let target = pick_by(&orders, easier_potion_for(*me));
    log::debug!("target potion: {} {}", target, target.delta);

    let mut primary = Vec::with_capacity(candidates.len());
    let mut emergency = Vec::with_capacity(candidates.len());
    for action in candidates {
        if !action.is_possible_for(me) {
            continue;
        }
        emergency.push(*action);
        if action.kind == ActionKind::Cast && action.castable && !action.is_needed_for(me, &target)
        {
            continue;
        }
        primary.push(*action);
    }

    // An exhausted spell means REST can still unlock something useful.
    let stuck = primary.len() <= 1
        && !candidates
            .iter()
            .any(|a| a.kind == ActionKind::Cast && !a.castable);
    log::debug!(
        "candidates: {} primary, {} emergency, stuck: {}",
        primary.len(),
        emergency.len(),
        stuck
    );

    let pool = if stuck { &emergency } else { &primary };
    let action = pick(pool);
    log::debug!("chosen: {}", action);

    Choice {
        action,
        target,
        stuck,
    }
}

/// Plans one turn from parsed input and the previous turn's memory.
pub fn plan_turn(turn: &TurnInput, memory: &TurnMemory) -> Result<TurnPlan, PlanError> {
    let candidates = build_candidates(&turn.actions)?;

    let me = memory.me.observe(turn.me.ingredients, turn.me.score, true);
    let opponent = memory
        .opponent
        .observe(turn.opponent.ingredients, turn.opponent.score, false);

    let choice = choose_action(&candidates, &me);

    Ok(TurnPlan {
        choice,
        me,
        opponent,
        memory: TurnMemory {
            me: SideHistory::after(&me),
            opponent: SideHistory::after(&opponent),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ingredients::Ingredients;
    use crate::protocol::parser::WitchInput;

    fn cast(id: i32, delta: Ingredients, castable: bool) -> Action {
        Action::spell(id, ActionKind::Cast, delta, castable)
    }

    fn turn(actions: Vec<Action>, me: Ingredients, my_score: i32) -> TurnInput {
        TurnInput {
            actions,
            me: WitchInput {
                ingredients: me,
                score: my_score,
            },
            opponent: WitchInput {
                ingredients: Ingredients::new(3, 0, 0, 0),
                score: 0,
            },
        }
    }

    #[test]
    fn candidates_start_with_rest() {
        let order = Action::brew(44, Ingredients::new(-2, 0, 0, 0), 6);
        let candidates = build_candidates(&[order]).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].kind, ActionKind::Rest);
        assert_eq!(candidates[1], order);
    }

    #[test]
    fn input_rest_is_folded_into_injected_rest() {
        let candidates = build_candidates(&[Action::rest()]).unwrap();
        assert_eq!(candidates, vec![Action::rest()]);
    }

    #[test]
    fn learn_rejects_the_turn() {
        let learn = Action::spell(31, ActionKind::Learn, Ingredients::new(0, 0, 1, 0), true);
        let err = build_candidates(&[learn]).unwrap_err();
        assert!(matches!(
            err,
            PlanError::UnsupportedAction {
                id: 31,
                kind: ActionKind::Learn
            }
        ));
        assert_eq!(err.to_string(), "unsupported action type LEARN for action 31");
    }

    #[test]
    fn affordable_order_is_brewed() {
        let order = Action::brew(60, Ingredients::new(-2, -2, 0, 0), 5);
        let plan = plan_turn(
            &turn(vec![order], Ingredients::new(3, 3, 0, 0), 0),
            &TurnMemory::default(),
        )
        .unwrap();
        assert_eq!(plan.action(), order);
        assert_eq!(plan.choice.target, order);
        assert!(!plan.choice.stuck);
    }

    #[test]
    fn needed_spell_beats_rest() {
        let order = Action::brew(60, Ingredients::new(-2, 0, 0, 0), 5);
        let spell = cast(78, Ingredients::new(2, 0, 0, 0), true);
        let plan = plan_turn(
            &turn(vec![order, spell], Ingredients::ZERO, 0),
            &TurnMemory::default(),
        )
        .unwrap();
        assert_eq!(plan.action(), spell);
    }

    #[test]
    fn all_spells_exhausted_means_rest() {
        let order = Action::brew(60, Ingredients::new(0, 0, -2, 0), 5);
        let spells = vec![
            order,
            cast(78, Ingredients::new(2, 0, 0, 0), false),
            cast(79, Ingredients::new(-1, 1, 0, 0), false),
        ];
        let plan = plan_turn(&turn(spells, Ingredients::ZERO, 0), &TurnMemory::default()).unwrap();
        assert_eq!(plan.action().kind, ActionKind::Rest);
        assert!(!plan.choice.stuck);
    }

    #[test]
    fn unneeded_spell_is_filtered_while_another_is_exhausted() {
        let order = Action::brew(60, Ingredients::new(0, 0, -2, 0), 5);
        let useless = cast(78, Ingredients::new(2, 0, 0, 0), true);
        let exhausted = cast(80, Ingredients::new(0, -1, 1, 0), false);
        let me = Witch::new(Ingredients::ZERO, 0, true);
        let candidates = build_candidates(&[order, useless, exhausted]).unwrap();
        let choice = choose_action(&candidates, &me);
        assert_eq!(choice.action.kind, ActionKind::Rest);
        assert!(!choice.stuck);
    }

    #[test]
    fn stuck_falls_back_to_any_feasible_action() {
        // Nothing supplies tier 2 directly and no spell is exhausted, so the
        // filter is dropped and the tier-0 spell is cast.
        let order = Action::brew(60, Ingredients::new(0, 0, -2, 0), 5);
        let useless = cast(78, Ingredients::new(2, 0, 0, 0), true);
        let me = Witch::new(Ingredients::ZERO, 0, true);
        let candidates = build_candidates(&[order, useless]).unwrap();
        let choice = choose_action(&candidates, &me);
        assert!(choice.stuck);
        assert_eq!(choice.action, useless);
    }

    #[test]
    fn target_is_the_easiest_order() {
        let easy = Action::brew(61, Ingredients::new(-1, -1, 0, 0), 4);
        let hard = Action::brew(62, Ingredients::new(0, 0, -2, -2), 18);
        let me = Witch::new(Ingredients::ZERO, 0, true);
        let candidates = build_candidates(&[hard, easy]).unwrap();
        assert_eq!(choose_action(&candidates, &me).target, easy);
    }

    #[test]
    fn no_orders_targets_rest() {
        let spell = cast(78, Ingredients::new(2, 0, 0, 0), true);
        let me = Witch::new(Ingredients::ZERO, 0, true);
        let candidates = build_candidates(&[spell]).unwrap();
        let choice = choose_action(&candidates, &me);
        assert_eq!(choice.target.kind, ActionKind::Rest);
        assert_eq!(choice.action, spell);
    }

    #[test]
    fn opponent_spells_are_ignored() {
        let delta = Ingredients::new(2, 0, 0, 0);
        let theirs = Action::spell(90, ActionKind::OpponentCast, delta, true);
        let me = Witch::new(Ingredients::ZERO, 0, true);
        let candidates = build_candidates(&[theirs]).unwrap();
        assert_eq!(choose_action(&candidates, &me).action.kind, ActionKind::Rest);
    }

    #[test]
    fn oversized_inventory_cannot_brew() {
        let order = Action::brew(44, Ingredients::ZERO, 5);
        let plan = plan_turn(
            &turn(vec![order], Ingredients::new(i32::MAX, 5, 0, 0), 0),
            &TurnMemory::default(),
        )
        .unwrap();
        assert_eq!(plan.action().kind, ActionKind::Rest);
        assert!(plan.choice.stuck);
    }

    #[test]
    fn memory_tracks_brews_for_both_sides() {
        let memory = TurnMemory {
            me: SideHistory {
                last_score: 0,
                brewed: 0,
            },
            opponent: SideHistory {
                last_score: 7,
                brewed: 1,
            },
        };
        let mut input = turn(vec![], Ingredients::ZERO, 9);
        input.opponent.score = 7;
        let plan = plan_turn(&input, &memory).unwrap();
        assert_eq!(plan.me.brewed, 1);
        assert_eq!(plan.opponent.brewed, 1);
        assert_eq!(plan.memory.me, SideHistory { last_score: 9, brewed: 1 });
        assert_eq!(plan.memory.opponent, SideHistory { last_score: 7, brewed: 1 });
    }
}
