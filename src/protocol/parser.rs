//! Turn input parser.
//!
//! Reads one turn at a time from a whitespace-separated token stream:
//! the action count, that many action records, then my inventory and score
//! and the opponent's. Lines are pulled lazily so a turn never blocks on
//! input that belongs to the next one.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::board::action::{Action, ActionKind};
use crate::board::ingredients::Ingredients;

/// Upper bound on the action list reserved up front.
const MAX_PREALLOCATED_ACTIONS: usize = 64;

/// Errors that can occur while reading a turn.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("input ended while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("invalid integer for {field}: '{token}'")]
    InvalidInteger { field: &'static str, token: String },

    #[error("invalid flag for {field}: '{token}', expected 0 or 1")]
    InvalidFlag { field: &'static str, token: String },

    #[error("negative action count: {0}")]
    NegativeActionCount(i32),

    #[error("unknown action type '{0}'")]
    UnknownActionType(String),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// A side's inventory and score as given by the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WitchInput {
    pub ingredients: Ingredients,
    pub score: i32,
}

/// Everything the input provides for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnInput {
    /// Actions in input order.
    pub actions: Vec<Action>,
    pub me: WitchInput,
    pub opponent: WitchInput,
}

/// Pulls turns from a buffered reader.
pub struct TurnReader<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TurnReader<R> {
    pub fn new(reader: R) -> Self {
        TurnReader {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Reads the next turn. Returns `Ok(None)` when input ends cleanly
    /// before a new turn starts.
    pub fn read_turn(&mut self) -> Result<Option<TurnInput>, ParseError> {
        let Some(first) = self.next_token()? else {
            return Ok(None);
        };
        let count = parse_int(&first, "action count")?;
        if count < 0 {
            return Err(ParseError::NegativeActionCount(count));
        }

        // The count is untrusted; a truncated turn must still fail as EOF.
        let mut actions = Vec::with_capacity((count as usize).min(MAX_PREALLOCATED_ACTIONS));
        for _ in 0..count {
            actions.push(self.read_action()?);
        }

        let me = self.read_witch()?;
        let opponent = self.read_witch()?;

        Ok(Some(TurnInput {
            actions,
            me,
            opponent,
        }))
    }

    /// Parses `id type d0 d1 d2 d3 points tomeIndex taxCount castable repeatable`.
    fn read_action(&mut self) -> Result<Action, ParseError> {
        let id = self.int("action id")?;
        let token = self.token("action type")?;
        let kind =
            ActionKind::from_token(&token).ok_or(ParseError::UnknownActionType(token))?;
        let delta = self.ingredients("action delta")?;
        let points = self.int("price")?;
        let tome_index = self.int("tome index")?;
        let tax_count = self.int("tax count")?;
        let castable = self.flag("castable")?;
        let repeatable = self.flag("repeatable")?;

        Ok(Action {
            id,
            kind,
            delta,
            points,
            castable,
            repeatable,
            tax_count,
            tome_index,
        })
    }

    fn read_witch(&mut self) -> Result<WitchInput, ParseError> {
        let ingredients = self.ingredients("inventory")?;
        let score = self.int("score")?;
        Ok(WitchInput { ingredients, score })
    }

    fn ingredients(&mut self, field: &'static str) -> Result<Ingredients, ParseError> {
        let mut tiers = [0; 4];
        for q in tiers.iter_mut() {
            *q = self.int(field)?;
        }
        Ok(Ingredients(tiers))
    }

    fn flag(&mut self, field: &'static str) -> Result<bool, ParseError> {
        let token = self.token(field)?;
        match token.as_str() {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(ParseError::InvalidFlag { field, token }),
        }
    }

    fn int(&mut self, field: &'static str) -> Result<i32, ParseError> {
        let token = self.token(field)?;
        parse_int(&token, field)
    }

    fn token(&mut self, field: &'static str) -> Result<String, ParseError> {
        self.next_token()?.ok_or(ParseError::UnexpectedEof(field))
    }

    fn next_token(&mut self) -> Result<Option<String>, ParseError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

fn parse_int(token: &str, field: &'static str) -> Result<i32, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidInteger {
        field,
        token: token.to_string(),
    })
}

/// Parses a single turn from text.
pub fn parse_turn(text: &str) -> Result<Option<TurnInput>, ParseError> {
    TurnReader::new(text.as_bytes()).read_turn()
}
