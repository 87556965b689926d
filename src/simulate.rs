//! Headless batch simulation.
//!
//! Plays many demo sessions with random agents: each turn the active
//! player spends a few random tools against random tiles it does not own,
//! then its team earns income per held tile and may buy a replacement
//! tool. Records final territory per team, for balancing the tool
//! profiles against each other.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::GameError;
use crate::game::GameModel;
use crate::grid::Coord;
use crate::session::demo_session;
use crate::team::Money;
use crate::tools::{PressureTool, ToolKind};

/// Configuration for batch simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of sessions to play.
    pub num_games: usize,
    /// Turn rotations per session.
    pub turns: usize,
    /// Tool uses attempted by the active player each turn.
    pub actions_per_turn: usize,
    /// Money earned per held tile at the end of the team's turn.
    pub income_per_tile: Money,
    /// Number of parallel threads for concurrent sessions.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            num_games: 10,
            turns: 60,
            actions_per_turn: 2,
            income_per_tile: 2,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// Outcome of one simulated session.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub turns: usize,
    pub attempts: usize,
    pub successes: usize,
    pub purchases: usize,
    /// Tiles held per team, indexed by team id.
    pub tiles: Vec<usize>,
    pub unowned: usize,
    /// Team holding the most tiles, if unique.
    pub leader: Option<String>,
}

/// Every tool slot of the active player that still has uses.
fn usable_slots(game: &GameModel) -> Vec<(ToolKind, usize)> {
    game.active_player()
        .inventory()
        .flat_map(|(kind, sets)| {
            sets.iter()
                .enumerate()
                .filter(|(_, set)| !set.is_depleted())
                .map(move |(slot, _)| (kind.clone(), slot))
        })
        .collect()
}

/// End-of-turn economy for the active team: income, then at most one purchase.
fn settle_turn(
    game: &mut GameModel,
    config: &SimConfig,
    rng: &mut SmallRng,
) -> Result<bool, GameError> {
    let buyer = game.active_ref();
    let held = game.ownership_summary().tiles_of(buyer.team);
    let team = game.team(buyer.team)?;
    let room = game.money_limit().saturating_sub(team.money());
    let income = Money::try_from(held)
        .unwrap_or(Money::MAX)
        .saturating_mul(config.income_per_tile)
        .min(room);
    let balance = game.deposit(buyer.team, income)?;

    let affordable: Vec<ToolKind> = game
        .catalog()
        .kinds()
        .into_iter()
        .filter(|kind| {
            game.catalog()
                .prototype(kind)
                .is_ok_and(|tool| tool.cost() <= balance)
        })
        .collect();
    if affordable.is_empty() {
        return Ok(false);
    }
    let kind = &affordable[rng.gen_range(0..affordable.len())];
    game.purchase_tools(buyer, kind, 1)?;
    Ok(true)
}

/// Plays a single demo session with random agents.
pub fn play_game(
    config: &SimConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, GameError> {
    let mut game = demo_session().build(Duration::ZERO)?;
    let period = game.turn_period();
    let mut now = Duration::ZERO;
    let mut attempts = 0;
    let mut successes = 0;
    let mut purchases = 0;

    for _ in 0..config.turns {
        let active = game.active_ref();
        for _ in 0..config.actions_per_turn {
            let slots = usable_slots(&game);
            let targets: Vec<Coord> = game
                .grid()
                .tiles()
                .filter(|t| !t.is_owned_by(active.team))
                .map(|t| t.coord())
                .collect();
            if slots.is_empty() || targets.is_empty() {
                break;
            }
            let (kind, slot) = &slots[rng.gen_range(0..slots.len())];
            let target = targets[rng.gen_range(0..targets.len())];
            attempts += 1;
            if game.use_tool(active, kind, *slot, target)? {
                successes += 1;
            }
        }
        if settle_turn(&mut game, config, rng)? {
            purchases += 1;
        }
        now += period;
        game.tick(now);
    }

    let summary = game.ownership_summary();
    let tiles: Vec<usize> = game
        .teams()
        .iter()
        .map(|t| summary.tiles_of(t.id()))
        .collect();
    let best = tiles.iter().copied().max().unwrap_or(0);
    let leader = if tiles.iter().filter(|&&n| n == best).count() == 1 {
        tiles
            .iter()
            .position(|&n| n == best)
            .map(|idx| game.teams()[idx].name().to_string())
    } else {
        None
    };

    Ok(GameRecord {
        game_id,
        turns: config.turns,
        attempts,
        successes,
        purchases,
        tiles,
        unowned: summary.unowned,
        leader,
    })
}

fn rng_for(config: &SimConfig, game_id: usize) -> SmallRng {
    if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn report(config: &SimConfig, n: usize, game: &GameRecord, elapsed: Duration) {
    if config.quiet {
        return;
    }
    let outcome = match &game.leader {
        Some(team) => format!("team {} leads", team),
        None => "tied".to_string(),
    };
    eprintln!(
        "Game {}/{}: {} with {:?} ({:.2}s)",
        n,
        config.num_games,
        outcome,
        game.tiles,
        elapsed.as_secs_f64()
    );
}

/// Runs all sessions and returns their records, ordered by game id.
pub fn run_simulations(config: &SimConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_simulations_with_callback(config, |g| games.push(g));
    games.sort_by_key(|g| g.game_id);
    games
}

/// Runs all sessions, calling `on_game` with each completed record.
/// Sessions that fail are reported on stderr and skipped.
pub fn run_simulations_with_callback<F>(config: &SimConfig, on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_parallel(config, on_game);
    } else {
        run_sequential(config, on_game);
    }
}

fn run_sequential<F>(config: &SimConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let mut rng = rng_for(config, i);
        let start = Instant::now();
        match play_game(config, i, &mut rng) {
            Ok(game) => {
                report(config, i + 1, &game, start.elapsed());
                on_game(game);
            }
            Err(e) => eprintln!("game {} failed: {}", i, e),
        }
    }
}

/// Plays sessions concurrently on a rayon pool; completed records travel
/// back to the calling thread over a channel.
fn run_parallel<F>(config: &SimConfig, mut on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("failed to build thread pool ({}), running sequentially", e);
            return run_sequential(config, on_game);
        }
    };

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let mut rng = rng_for(config, i);
                        let start = Instant::now();
                        match play_game(config, i, &mut rng) {
                            Ok(game) => {
                                let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                                report(config, n, &game, start.elapsed());
                                let _ = tx.send(game);
                            }
                            Err(e) => eprintln!("game {} failed: {}", i, e),
                        }
                    });
            });
        });

        for game in rx {
            on_game(game);
        }
    });
}

/// Writes records as JSONL, one object per line.
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints a summary of simulation results to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let total = games.len().max(1) as f64;
    let attempts: usize = games.iter().map(|g| g.attempts).sum();
    let successes: usize = games.iter().map(|g| g.successes).sum();
    let ties = games.iter().filter(|g| g.leader.is_none()).count();

    eprintln!("=== Simulation Summary ===");
    eprintln!("Games: {}", games.len());
    eprintln!(
        "Tool uses: {} attempted, {} succeeded ({:.1}%)",
        attempts,
        successes,
        100.0 * successes as f64 / attempts.max(1) as f64
    );
    eprintln!("Ties: {}", ties);

    let team_count = games.iter().map(|g| g.tiles.len()).max().unwrap_or(0);
    for team in 0..team_count {
        let held: usize = games.iter().filter_map(|g| g.tiles.get(team)).sum();
        eprintln!("  team {}: {:.1} tiles on average", team, held as f64 / total);
    }
}
