//! Ingredient vectors.
//!
//! An inventory or an action delta is a fixed 4-tuple of signed counts, one
//! per ingredient tier (tier 0 is the cheapest, tier 3 the most valuable).
//! Vectors are plain `Copy` values; every transformation returns a new one.

use std::fmt;
use std::ops::{Add, Index};

/// Number of ingredient tiers.
pub const INGREDIENT_TIERS: usize = 4;

/// Maximum number of ingredients a witch can hold.
pub const MAX_INGREDIENTS: i32 = 10;

/// A 4-dimensional ingredient vector, indexed by tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Ingredients(pub [i32; INGREDIENT_TIERS]);

impl Ingredients {
    /// The empty vector.
    pub const ZERO: Ingredients = Ingredients([0; INGREDIENT_TIERS]);

    /// Creates a vector from its four tier counts.
    pub const fn new(i0: i32, i1: i32, i2: i32, i3: i32) -> Self {
        Ingredients([i0, i1, i2, i3])
    }

    /// Component-wise sum, saturating at the `i32` bounds. The result may be
    /// illegitimate; check with [`Ingredients::is_legit`].
    pub fn add(self, delta: Ingredients) -> Ingredients {
        let mut out = self.0;
        for (q, d) in out.iter_mut().zip(delta.0) {
            *q = q.saturating_add(d);
        }
        Ingredients(out)
    }

    /// True when no tier is negative and the total fits the inventory.
    pub fn is_legit(self) -> bool {
        let mut sum = 0i64;
        for q in self.0 {
            if q < 0 {
                return false;
            }
            sum += i64::from(q);
        }
        sum <= i64::from(MAX_INGREDIENTS)
    }

    /// Euclidean distance from the even split where every tier holds
    /// `MAX_INGREDIENTS / 4`. Zero means perfectly even.
    pub fn balance(self) -> f64 {
        let even = MAX_INGREDIENTS as f64 / INGREDIENT_TIERS as f64;
        self.0
            .iter()
            .map(|&q| {
                let d = q as f64 - even;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Compares raw balance values: true when `self` sits strictly further
    /// from the even split than `other`.
    pub fn is_more_balanced_than(self, other: Ingredients) -> bool {
        self.balance() > other.balance()
    }

    /// Total ingredient count, saturating at the `i32` bounds.
    pub fn sum(self) -> i32 {
        self.0.iter().fold(0i32, |acc, &q| acc.saturating_add(q))
    }

    /// Weighted sum where tier `i` weighs `i + 1`.
    ///
    /// Order deltas are negative, so a harder order yields a more negative
    /// value once added to an inventory.
    pub fn complexity(self) -> i32 {
        self.0
            .iter()
            .enumerate()
            .fold(0i32, |acc, (i, &q)| {
                acc.saturating_add(q.saturating_mul(i as i32 + 1))
            })
    }

    /// Iterates the tier counts in order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }
}

impl Add for Ingredients {
    type Output = Ingredients;

    fn add(self, rhs: Ingredients) -> Ingredients {
        Ingredients::add(self, rhs)
    }
}

impl Index<usize> for Ingredients {
    type Output = i32;

    fn index(&self, tier: usize) -> &i32 {
        &self.0[tier]
    }
}

impl From<[i32; INGREDIENT_TIERS]> for Ingredients {
    fn from(tiers: [i32; INGREDIENT_TIERS]) -> Self {
        Ingredients(tiers)
    }
}

impl fmt::Display for Ingredients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[{} {} {} {}]", a, b, c, d)
    }
}
