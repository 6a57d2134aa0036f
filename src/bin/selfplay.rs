// Self-play benchmark for the 2048 AI
//
// Usage:
//   cargo run --release --bin selfplay -- [options]
//
// Options:
//   --games <n>            Number of games (default: 10)
//   --algorithm <name>     Search algorithm (default: from config)
//   --difficulty <name>    Difficulty level (default: from config)
//   --size <n>             Board dimension (default: 4)
//   --max-moves <n>        Move cap per game (default: 10000)
//   --seed <n>             First seed; game k uses seed + k (default: 0)
//   --config <path>        Path to Fancy2048.toml (default: Fancy2048.toml)

use std::env;
use std::process;
use std::str::FromStr;

use fancy_2048_ai::config::Config;
use fancy_2048_ai::selfplay::SelfPlayRunner;
use fancy_2048_ai::types::{Algorithm, Difficulty};

fn print_usage() {
    eprintln!("2048 AI Self-Play Benchmark");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  selfplay [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --games <N>            Number of games to play (default: 10)");
    eprintln!("  --algorithm <NAME>     expectimax, alpha_beta, monte_carlo, minimax, neural");
    eprintln!("  --difficulty <NAME>    easy, normal, hard, expert");
    eprintln!("  --size <N>             Board dimension (default: 4)");
    eprintln!("  --max-moves <N>        Move cap per game (default: 10000)");
    eprintln!("  --seed <N>             First seed; game k uses seed + k (default: 0)");
    eprintln!("  --config <path>        Path to Fancy2048.toml (default: Fancy2048.toml)");
    eprintln!("  --help                 Show this help message");
}

fn parse_arg<T: FromStr>(args: &[String], i: usize, name: &str) -> T
where
    T::Err: std::fmt::Display,
{
    let value = match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires an argument", name);
            process::exit(1);
        }
    };
    match value.parse::<T>() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: invalid value '{}' for {}: {}", value, name, e);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    let mut config_path = "Fancy2048.toml".to_string();
    let mut games: u64 = 10;
    let mut algorithm: Option<Algorithm> = None;
    let mut difficulty: Option<Difficulty> = None;
    let mut size: usize = 4;
    let mut max_moves: u32 = 10_000;
    let mut first_seed: u64 = 0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                games = parse_arg(&args, i, "--games");
                i += 1;
            }
            "--algorithm" => {
                algorithm = Some(parse_arg(&args, i, "--algorithm"));
                i += 1;
            }
            "--difficulty" => {
                difficulty = Some(parse_arg(&args, i, "--difficulty"));
                i += 1;
            }
            "--size" => {
                size = parse_arg(&args, i, "--size");
                i += 1;
            }
            "--max-moves" => {
                max_moves = parse_arg(&args, i, "--max-moves");
                i += 1;
            }
            "--seed" => {
                first_seed = parse_arg(&args, i, "--seed");
                i += 1;
            }
            "--config" => {
                config_path = parse_arg(&args, i, "--config");
                i += 1;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if size < 2 {
        eprintln!("Error: --size must be at least 2");
        process::exit(1);
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    let algorithm = algorithm.unwrap_or_else(|| config.defaults.algorithm());
    let difficulty = difficulty.unwrap_or_else(|| config.defaults.difficulty());

    println!(
        "Playing {} game(s) with {} ({}) on a {}x{} board...",
        games,
        algorithm.as_str(),
        difficulty.as_str(),
        size,
        size
    );

    let runner = SelfPlayRunner::new(config, algorithm, difficulty)
        .with_board_size(size)
        .with_max_moves(max_moves);
    let seeds: Vec<u64> = (0..games).map(|k| first_seed + k).collect();
    let results = runner.run(&seeds);
    runner.print_report(&results);
}
