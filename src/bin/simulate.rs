//! Batch simulation CLI.
//!
//! Plays demo sessions with random agents and outputs one record per game
//! as JSONL.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --turns N       Turn rotations per game (default: 60)
//!   --actions N     Tool uses attempted per turn (default: 2)
//!   --income N      Money earned per held tile each turn (default: 2)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress progress and summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use pressurefront::simulate::{self, SimConfig};

/// Parses the value following `flag`, exiting with usage on failure.
fn value_of<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|v| v.parse::<T>()) {
        Some(Ok(v)) => v,
        _ => {
            eprintln!("invalid {} value", flag);
            print_usage();
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SimConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.num_games = value_of(&args, i, "--games");
            }
            "--turns" => {
                i += 1;
                config.turns = value_of(&args, i, "--turns");
            }
            "--actions" => {
                i += 1;
                config.actions_per_turn = value_of(&args, i, "--actions");
            }
            "--income" => {
                i += 1;
                config.income_per_tile = value_of(&args, i, "--income");
            }
            "--threads" => {
                i += 1;
                config.threads = value_of(&args, i, "--threads");
            }
            "--seed" => {
                i += 1;
                config.seed = value_of(&args, i, "--seed");
            }
            "--output" => {
                i += 1;
                output_path = Some(value_of(&args, i, "--output"));
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if !config.quiet {
        eprintln!(
            "Simulate: {} games, {} turns, {} actions/turn, income {}, {} threads",
            config.num_games,
            config.turns,
            config.actions_per_turn,
            config.income_per_tile,
            config.threads
        );
    }

    let start = Instant::now();
    let games = simulate::run_simulations(&config);
    let elapsed = start.elapsed();

    if !config.quiet {
        eprintln!(
            "Completed {} games in {:.1}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        simulate::print_summary(&games);
    }

    let written = match &output_path {
        Some(path) => File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            simulate::write_jsonl(&games, &mut writer)
        }),
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            simulate::write_jsonl(&games, &mut writer)
        }
    };

    match (written, output_path) {
        (Err(e), _) => {
            eprintln!("failed to write output: {}", e);
            process::exit(1);
        }
        (Ok(()), Some(path)) if !config.quiet => {
            eprintln!("Wrote {} games to {}", games.len(), path);
        }
        _ => {}
    }
}

fn print_usage() {
    eprintln!("Usage: simulate [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --turns N        Turn rotations per game (default: 60)");
    eprintln!("  --actions N      Tool uses attempted per turn (default: 2)");
    eprintln!("  --income N       Money earned per held tile each turn (default: 2)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}
