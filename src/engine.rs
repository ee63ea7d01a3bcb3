//! Engine state management.
//!
//! Holds the only state that crosses turns (the last score and brew count of
//! each side) and drives the read-plan-write loop over a turn stream.

use std::io::{BufRead, Write};

use crate::board::witch::TurnMemory;
use crate::protocol::format::format_turn_line;
use crate::protocol::parser::{ParseError, TurnInput, TurnReader};
use crate::search::planner::{plan_turn, PlanError, TurnPlan};

/// Errors that abort the engine loop.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("bad turn input: {0}")]
    Parse(#[from] ParseError),

    #[error("cannot plan turn: {0}")]
    Plan(#[from] PlanError),

    #[error("failed to write action: {0}")]
    Io(#[from] std::io::Error),
}

/// Engine options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Append the brew counts of both sides after the command.
    pub diagnostics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { diagnostics: true }
    }
}

/// Holds the mutable state of the engine between turns.
pub struct Engine {
    pub memory: TurnMemory,
    pub config: EngineConfig,
    turns: u32,
}

impl Engine {
    /// Creates an engine with empty turn memory.
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            memory: TurnMemory::default(),
            config,
            turns: 0,
        }
    }

    /// Number of turns answered so far.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Plans one turn, writes its command line, and advances the memory.
    pub fn handle_turn<W: Write>(
        &mut self,
        turn: &TurnInput,
        out: &mut W,
    ) -> Result<TurnPlan, EngineError> {
        let plan = plan_turn(turn, &self.memory)?;
        writeln!(out, "{}", format_turn_line(&plan, self.config.diagnostics))?;
        out.flush()?;

        self.memory = plan.memory;
        self.turns += 1;
        log::debug!(
            "turn {}: score {} vs {}, brewed {} vs {}",
            self.turns,
            plan.me.score,
            plan.opponent.score,
            plan.me.brewed,
            plan.opponent.brewed
        );
        Ok(plan)
    }

    /// Answers every turn in `input` until it ends. The first fatal error
    /// stops the loop.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), EngineError> {
        let mut reader = TurnReader::new(input);
        while let Some(turn) = reader.read_turn()? {
            self.handle_turn(&turn, out)?;
        }
        log::info!("input closed after {} turns", self.turns);
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}
