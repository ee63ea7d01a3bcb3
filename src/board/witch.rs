//! Player state.
//!
//! A [`Witch`] is rebuilt from the turn input every turn. The only values
//! that survive between turns are kept in a [`TurnMemory`]: the last
//! observed score and the running brew count for each side.

use super::ingredients::Ingredients;

/// One side's inventory and score for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Witch {
    pub ingredients: Ingredients,
    pub score: i32,
    /// True for the side this engine plays.
    pub me: bool,
    /// Potions brewed so far, inferred from score increases.
    pub brewed: u32,
}

impl Witch {
    /// Creates a witch with no brew history.
    pub fn new(ingredients: Ingredients, score: i32, me: bool) -> Self {
        Witch {
            ingredients,
            score,
            me,
            brewed: 0,
        }
    }
}

/// What one side carries from the previous turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideHistory {
    pub last_score: i32,
    pub brewed: u32,
}

impl SideHistory {
    /// Builds this turn's witch from the observed inventory and score.
    ///
    /// A score above the last recorded one counts as exactly one completed
    /// brew.
    pub fn observe(&self, ingredients: Ingredients, score: i32, me: bool) -> Witch {
        let brewed = if score > self.last_score {
            self.brewed + 1
        } else {
            self.brewed
        };
        Witch {
            ingredients,
            score,
            me,
            brewed,
        }
    }

    /// The history to carry into the next turn after observing `witch`.
    pub fn after(witch: &Witch) -> SideHistory {
        SideHistory {
            last_score: witch.score,
            brewed: witch.brewed,
        }
    }
}

/// Cross-turn state for both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnMemory {
    pub me: SideHistory,
    pub opponent: SideHistory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_increase_counts_one_brew() {
        let history = SideHistory {
            last_score: 4,
            brewed: 1,
        };
        let witch = history.observe(Ingredients::ZERO, 19, true);
        assert_eq!(witch.brewed, 2);
        assert_eq!(witch.score, 19);
        assert!(witch.me);
    }

    #[test]
    fn unchanged_score_keeps_count() {
        let history = SideHistory {
            last_score: 4,
            brewed: 1,
        };
        assert_eq!(history.observe(Ingredients::ZERO, 4, false).brewed, 1);
    }

    #[test]
    fn first_turn_with_zero_score_counts_nothing() {
        let witch = SideHistory::default().observe(Ingredients::new(3, 0, 0, 0), 0, true);
        assert_eq!(witch.brewed, 0);
    }

    #[test]
    fn history_carries_score_and_count() {
        let witch = SideHistory::default().observe(Ingredients::ZERO, 12, true);
        let next = SideHistory::after(&witch);
        assert_eq!(next, SideHistory { last_score: 12, brewed: 1 });
        assert_eq!(next.observe(Ingredients::ZERO, 12, true).brewed, 1);
    }
}
