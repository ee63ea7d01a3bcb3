//! Turn protocol handling.
//!
//! Parsing of the per-turn input records and formatting of the single
//! command line the engine answers with.

pub mod format;
pub mod parser;

pub use format::{format_action, format_turn_line};
pub use parser::{parse_turn, ParseError, TurnInput, TurnReader, WitchInput};
