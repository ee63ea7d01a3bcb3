//! Self-play game generation CLI.
//!
//! Plays the engine against itself and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use cauldron::board::{MAX_BREWED, MAX_ORDERS};
use cauldron::logging;
use cauldron::selfplay::{self, SelfPlayConfig};

/// Plays the cauldron engine against itself.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of games to play.
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Turn limit per game.
    #[arg(long, default_value_t = 100)]
    max_turns: u32,

    /// Brews that end a game.
    #[arg(long, default_value_t = MAX_BREWED)]
    brew_limit: u32,

    /// Orders kept on the counter.
    #[arg(long, default_value_t = MAX_ORDERS)]
    order_slots: usize,

    /// Number of parallel threads.
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Random seed, 0 for entropy.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output file path (default: stdout).
    #[arg(long)]
    output: Option<String>,

    /// Suppress per-game progress and the summary.
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging, including every planner decision.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = SelfPlayConfig {
        num_games: args.games,
        max_turns: args.max_turns,
        brew_limit: args.brew_limit,
        order_slots: args.order_slots,
        threads: args.threads.max(1),
        seed: args.seed,
        quiet: args.quiet,
    };

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(BufWriter::new(f)),
            Err(e) => {
                eprintln!("selfplay: cannot create {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if !config.quiet {
        log::info!(
            "Self-play: {} games, {} turns max, {} brews to win, {} threads, seed {}",
            config.num_games,
            config.max_turns,
            config.brew_limit,
            config.threads,
            config.seed
        );
    }

    let start = Instant::now();
    let mut games = Vec::with_capacity(config.num_games);
    let mut write_error = None;
    let result = selfplay::run_self_play_with_callback(&config, |game| {
        if write_error.is_none() {
            if let Err(e) = selfplay::write_game_json(&game, &mut out) {
                write_error = Some(e);
            }
        }
        games.push(game);
    });

    if let Err(e) = result {
        eprintln!("selfplay: {}", e);
        return ExitCode::FAILURE;
    }
    if let Some(e) = write_error.or_else(|| out.flush().err()) {
        eprintln!("selfplay: failed to write records: {}", e);
        return ExitCode::FAILURE;
    }

    if !config.quiet {
        selfplay::print_summary(&games);
        log::info!("Total time: {:.1}s", start.elapsed().as_secs_f64());
    }
    ExitCode::SUCCESS
}
