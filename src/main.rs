//! Cauldron -- a turn-local decision engine for a potion-brewing duel.
//!
//! This binary reads one turn of game state at a time from stdin and writes
//! exactly one command line per turn to stdout. Diagnostics go to stderr.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use clap::Parser;

use cauldron::engine::{Engine, EngineConfig};
use cauldron::logging;

/// Answers each turn of a potion-brewing duel with a single command.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print only the command, without the brew counts.
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut engine = Engine::new(EngineConfig {
        diagnostics: !args.quiet,
    });

    match engine.run(stdin.lock(), &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cauldron: {}", e);
            ExitCode::FAILURE
        }
    }
}
