//! Self-play referee.
//!
//! Plays the planner against itself under simplified duel rules: a shared
//! counter of potion orders, four starter spells per side, and simultaneous
//! moves. Each turn both sides see the same kind of input the game host
//! sends, so the whole pipeline from [`TurnInput`] to the chosen action is
//! exercised. Games are recorded for offline inspection as JSONL.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::action::{Action, ActionKind};
use crate::board::ingredients::{Ingredients, INGREDIENT_TIERS};
use crate::board::witch::TurnMemory;
use crate::board::{MAX_BREWED, MAX_ORDERS};
use crate::protocol::format::format_action;
use crate::protocol::parser::{TurnInput, WitchInput};
use crate::search::planner::{plan_turn, PlanError};

/// Deltas of the spells each side starts with.
const STARTER_SPELLS: [Ingredients; 4] = [
    Ingredients::new(2, 0, 0, 0),
    Ingredients::new(-1, 1, 0, 0),
    Ingredients::new(0, -1, 1, 0),
    Ingredients::new(0, 0, -1, 1),
];

/// Inventory each side starts with.
const STARTING_INVENTORY: Ingredients = Ingredients::new(3, 0, 0, 0);

/// Errors that stop a self-play run.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("game {game_id}: {source}")]
    Plan {
        game_id: usize,
        #[source]
        source: PlanError,
    },
}

/// Configuration for self-play games.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Turn limit before a game is stopped.
    pub max_turns: u32,
    /// Brews that end the game.
    pub brew_limit: u32,
    /// Orders kept on the counter.
    pub order_slots: usize,
    /// Worker threads; 1 plays sequentially.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            max_turns: 100,
            brew_limit: MAX_BREWED,
            order_slots: MAX_ORDERS,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// A single recorded turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub turn: u32,
    /// Commands issued by each side.
    pub actions: [String; 2],
    /// Whether each command was legal against the referee's state.
    pub legal: [bool; 2],
    /// Scores after the turn resolved.
    pub scores: [i32; 2],
    /// Inventories after the turn resolved.
    pub inventories: [[i32; INGREDIENT_TIERS]; 2],
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub turns: Vec<TurnRecord>,
    pub final_scores: [i32; 2],
    pub brewed: [u32; 2],
    /// The side with the higher score, or none on a tie.
    pub winner: Option<Side>,
}

#[derive(Debug, Clone)]
struct Spell {
    id: i32,
    delta: Ingredients,
    castable: bool,
}

#[derive(Debug, Clone)]
struct Player {
    ingredients: Ingredients,
    score: i32,
    brewed: u32,
    spells: Vec<Spell>,
    memory: TurnMemory,
}

impl Player {
    fn input(&self) -> WitchInput {
        WitchInput {
            ingredients: self.ingredients,
            score: self.score,
        }
    }
}

/// Referee state for one game.
struct Table {
    orders: Vec<Action>,
    players: [Player; 2],
    next_id: i32,
}

impl Table {
    fn new(config: &SelfPlayConfig, rng: &mut SmallRng) -> Self {
        let mut next_id = 0;
        let mut starter = || {
            STARTER_SPELLS
                .iter()
                .map(|&delta| {
                    next_id += 1;
                    Spell {
                        id: next_id,
                        delta,
                        castable: true,
                    }
                })
                .collect::<Vec<_>>()
        };
        let left = starter();
        let right = starter();
        let player = |spells| Player {
            ingredients: STARTING_INVENTORY,
            score: 0,
            brewed: 0,
            spells,
            memory: TurnMemory::default(),
        };

        let mut table = Table {
            orders: Vec::with_capacity(config.order_slots),
            players: [player(left), player(right)],
            next_id,
        };
        table.refill(config.order_slots, rng);
        table
    }

    /// Tops the counter up with fresh random orders.
    fn refill(&mut self, slots: usize, rng: &mut SmallRng) {
        while self.orders.len() < slots {
            self.next_id += 1;
            self.orders.push(random_order(self.next_id, rng));
        }
    }

    /// Renders the turn input as `side` would receive it.
    fn turn_input(&self, side: Side) -> TurnInput {
        let me = &self.players[side.index()];
        let rival = &self.players[1 - side.index()];

        let mut actions = self.orders.clone();
        for spell in &me.spells {
            actions.push(Action::spell(
                spell.id,
                ActionKind::Cast,
                spell.delta,
                spell.castable,
            ));
        }
        for spell in &rival.spells {
            actions.push(Action::spell(
                spell.id,
                ActionKind::OpponentCast,
                spell.delta,
                spell.castable,
            ));
        }

        TurnInput {
            actions,
            me: me.input(),
            opponent: rival.input(),
        }
    }

    /// Asks the planner for `side`'s action and stores its memory.
    fn decide(&mut self, side: Side) -> Result<Action, PlanError> {
        let input = self.turn_input(side);
        let player = &mut self.players[side.index()];
        let plan = plan_turn(&input, &player.memory)?;
        player.memory = plan.memory;
        Ok(plan.action())
    }

    /// Applies `action` for `side` against the start-of-turn counter.
    /// Returns the id of a brewed order, if any, and whether the action was
    /// legal.
    fn apply(&mut self, side: Side, action: &Action) -> (Option<i32>, bool) {
        let player = &mut self.players[side.index()];
        match action.kind {
            ActionKind::Brew => {
                let Some(order) = self.orders.iter().find(|o| o.id == action.id) else {
                    return (None, false);
                };
                let after = player.ingredients.add(order.delta);
                if !after.is_legit() {
                    return (None, false);
                }
                player.ingredients = after;
                player.score += order.points;
                player.brewed += 1;
                (Some(order.id), true)
            }
            ActionKind::Cast => {
                let Some(spell) = player
                    .spells
                    .iter_mut()
                    .find(|s| s.id == action.id && s.castable)
                else {
                    return (None, false);
                };
                let after = player.ingredients.add(spell.delta);
                if !after.is_legit() {
                    return (None, false);
                }
                player.ingredients = after;
                spell.castable = false;
                (None, true)
            }
            ActionKind::Rest => {
                for spell in player.spells.iter_mut() {
                    spell.castable = true;
                }
                (None, true)
            }
            ActionKind::OpponentCast | ActionKind::Learn => (None, false),
        }
    }

    fn finished(&self, brew_limit: u32) -> bool {
        self.players.iter().any(|p| p.brewed >= brew_limit)
    }
}

/// Generates a potion order consuming two to five ingredients, priced at its
/// complexity plus a small random bonus.
fn random_order(id: i32, rng: &mut SmallRng) -> Action {
    let total = rng.gen_range(2..=5);
    let mut tiers = [0; INGREDIENT_TIERS];
    for _ in 0..total {
        tiers[rng.gen_range(0..INGREDIENT_TIERS)] += 1;
    }
    let cost = Ingredients(tiers);
    let price = cost.complexity() + rng.gen_range(0..=3);
    Action::brew(id, Ingredients(tiers.map(|q| -q)), price)
}

/// Plays one game to completion. A planner error ends the game and is
/// returned instead of a record.
pub fn play_game(
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, SelfPlayError> {
    let mut table = Table::new(config, rng);
    let mut turns = Vec::new();
    let plan_error = |source| SelfPlayError::Plan { game_id, source };

    for turn in 1..=config.max_turns {
        let left = table.decide(Side::Left).map_err(plan_error)?;
        let right = table.decide(Side::Right).map_err(plan_error)?;

        let (left_brewed, left_legal) = table.apply(Side::Left, &left);
        let (right_brewed, right_legal) = table.apply(Side::Right, &right);
        for (side, action, legal) in [
            (Side::Left, &left, left_legal),
            (Side::Right, &right, right_legal),
        ] {
            if !legal {
                log::warn!(
                    "game {} turn {}: {:?} played illegal {}",
                    game_id,
                    turn,
                    side,
                    action
                );
            }
        }

        // Both sides may brew the same order; it leaves the counter once.
        table
            .orders
            .retain(|o| Some(o.id) != left_brewed && Some(o.id) != right_brewed);
        table.refill(config.order_slots, rng);

        turns.push(TurnRecord {
            turn,
            actions: [format_action(&left), format_action(&right)],
            legal: [left_legal, right_legal],
            scores: [table.players[0].score, table.players[1].score],
            inventories: [table.players[0].ingredients.0, table.players[1].ingredients.0],
        });

        if table.finished(config.brew_limit) {
            break;
        }
    }

    let final_scores = [table.players[0].score, table.players[1].score];
    let winner = match final_scores[0].cmp(&final_scores[1]) {
        std::cmp::Ordering::Greater => Some(Side::Left),
        std::cmp::Ordering::Less => Some(Side::Right),
        std::cmp::Ordering::Equal => None,
    };

    Ok(GameRecord {
        game_id,
        turns,
        final_scores,
        brewed: [table.players[0].brewed, table.players[1].brewed],
        winner,
    })
}

/// Returns the RNG for game `game_id`. Seeded runs give every game its own
/// stream so results do not depend on scheduling.
fn game_rng(config: &SelfPlayConfig, game_id: usize) -> SmallRng {
    if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn outcome(game: &GameRecord) -> String {
    match game.winner {
        Some(side) => format!("{:?} wins", side),
        None => "draw".to_string(),
    }
}

/// Runs self-play and collects all game records.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    })?;
    Ok(games)
}

/// Runs self-play, calling `on_game` with each completed game record.
///
/// Games arrive in completion order, which differs from `game_id` order
/// when playing in parallel.
pub fn run_self_play_with_callback<F>(
    config: &SelfPlayConfig,
    on_game: F,
) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    if config.threads > 1 {
        run_self_play_parallel(config, on_game)
    } else {
        run_self_play_sequential(config, on_game)
    }
}

/// Sequential self-play: plays games one at a time and stops at the first
/// failed game.
fn run_self_play_sequential<F>(
    config: &SelfPlayConfig,
    mut on_game: F,
) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let game_start = Instant::now();
        let game = play_game(config, i, &mut game_rng(config, i))?;
        if !config.quiet {
            log::info!(
                "Game {}/{}: {} after {} turns ({:.2}s)",
                i + 1,
                config.num_games,
                outcome(&game),
                game.turns.len(),
                game_start.elapsed().as_secs_f64(),
            );
        }
        on_game(game);
    }
    Ok(())
}

/// Parallel self-play on a rayon pool. Completed games are handed to the
/// callback on the calling thread. Games already running when one fails
/// still finish, but only the first error is returned and no record is
/// delivered after it.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<Result<GameRecord, SelfPlayError>>();
    let mut first_error = None;

    std::thread::scope(|scope| {
        let completed = &completed;
        scope.spawn(move || {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let game_start = Instant::now();
                        let game = match play_game(config, i, &mut game_rng(config, i)) {
                            Ok(game) => game,
                            Err(e) => {
                                let _ = tx.send(Err(e));
                                return;
                            }
                        };
                        if !config.quiet {
                            let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                            log::info!(
                                "Game {}/{}: {} after {} turns ({:.2}s)",
                                n,
                                config.num_games,
                                outcome(&game),
                                game.turns.len(),
                                game_start.elapsed().as_secs_f64(),
                            );
                        }
                        let _ = tx.send(Ok(game));
                    });
            });
        });

        for result in rx {
            match result {
                Ok(game) if first_error.is_none() => on_game(game),
                Ok(_) => {}
                Err(e) => {
                    log::error!("{}", e);
                    first_error.get_or_insert(e);
                }
            }
        }
    });

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        write_game_json(game, out)?;
    }
    out.flush()
}

/// Writes a single game record as one JSON line.
pub fn write_game_json<W: Write>(game: &GameRecord, out: &mut W) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, game)?;
    writeln!(out)
}

/// Logs aggregate results over a set of games.
pub fn print_summary(games: &[GameRecord]) {
    let total = games.len();
    let left = games.iter().filter(|g| g.winner == Some(Side::Left)).count();
    let right = games.iter().filter(|g| g.winner == Some(Side::Right)).count();
    let draws = total - left - right;
    let turns: usize = games.iter().map(|g| g.turns.len()).sum();
    let illegal: usize = games
        .iter()
        .flat_map(|g| g.turns.iter())
        .map(|t| t.legal.iter().filter(|&&l| !l).count())
        .sum();

    log::info!("=== Self-play summary ===");
    log::info!("Games: {}", total);
    log::info!("Left wins: {}", left);
    log::info!("Right wins: {}", right);
    log::info!("Draws: {}", draws);
    log::info!(
        "Average length: {:.1} turns",
        turns as f64 / total.max(1) as f64
    );
    log::info!("Illegal actions: {}", illegal);
}
