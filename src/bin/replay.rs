// Standalone replay tool for analyzing 2048 AI decision logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                    Replay all entries
//   --entries <e1,e2>        Replay specific entries (1-based, comma-separated)
//   --validate <e:move,...>  Check that entries logged one of the expected moves
//   --seed <n>               Seed jitter and rollouts
//   --verbose                Show detailed output for each entry
//   --config <path>          Path to Fancy2048.toml (default: Fancy2048.toml)

use std::env;
use std::process;

use fancy_2048_ai::config::Config;
use fancy_2048_ai::replay::ReplayEngine;
use fancy_2048_ai::types::Direction;

enum Mode {
    All,
    Entries(String),
    Validate(String),
}

fn print_usage() {
    eprintln!("2048 AI Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                     Replay every logged decision");
    eprintln!("  --entries <E1,E2,...>     Replay specific entries (1-based, comma-separated)");
    eprintln!("  --validate <E:M,...>      Validate logged moves (format: entry:move, '|' for alternatives)");
    eprintln!("  --seed <N>                Seed jitter and rollouts for repeatable replays");
    eprintln!("  --verbose                 Show detailed output for each entry");
    eprintln!("  --config <path>           Path to Fancy2048.toml (default: Fancy2048.toml)");
    eprintln!("  --help                    Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all decisions");
    eprintln!("  replay fancy2048_debug.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific entries with a fixed seed");
    eprintln!("  replay fancy2048_debug.jsonl --entries 5,10,15 --seed 42");
    eprintln!();
    eprintln!("  # Validate expected moves");
    eprintln!("  replay fancy2048_debug.jsonl --validate 5:up,10:left|down");
}

fn parse_entries(s: &str) -> Result<Vec<usize>, String> {
    s.split(',')
        .map(|e| {
            e.trim()
                .parse::<usize>()
                .map_err(|err| format!("Invalid entry number '{}': {}", e, err))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(usize, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() != 2 {
                return Err(format!("Invalid format '{}'. Expected 'entry:move'", pair));
            }

            let entry = parts[0]
                .parse::<usize>()
                .map_err(|e| format!("Invalid entry number '{}': {}", parts[0], e))?;

            // Support multiple acceptable moves separated by '|'
            let moves: Result<Vec<Direction>, String> = parts[1]
                .split('|')
                .map(|m| m.trim().parse::<Direction>())
                .collect();

            Ok((entry, moves?))
        })
        .collect()
}

fn option_value(args: &[String], i: usize, name: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires an argument", name);
            process::exit(1);
        }
    }
}

fn main() {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Fancy2048.toml".to_string();
    let mut verbose = false;
    let mut seed = None;
    let mut mode = None;

    // Parse arguments
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                mode = Some(Mode::All);
            }
            "--entries" => {
                mode = Some(Mode::Entries(option_value(&args, i, "--entries")));
                i += 1;
            }
            "--validate" => {
                mode = Some(Mode::Validate(option_value(&args, i, "--validate")));
                i += 1;
            }
            "--seed" => {
                let value = option_value(&args, i, "--seed");
                match value.parse::<u64>() {
                    Ok(s) => seed = Some(s),
                    Err(e) => {
                        eprintln!("Error: invalid seed '{}': {}", value, e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--config" => {
                config_path = option_value(&args, i, "--config");
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            eprintln!("Error: Must specify --all, --entries, or --validate");
            print_usage();
            process::exit(1);
        }
    };

    // Load configuration
    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let mut engine = ReplayEngine::new(config, verbose);
    if let Some(seed) = seed {
        engine = engine.with_seed(seed);
    }

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} entries...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Entries(arg) => {
            let positions = match parse_entries(&arg) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error parsing entries: {}", e);
                    process::exit(1);
                }
            };

            println!("Replaying {} specific entr(ies)...\n", positions.len());
            match engine.replay_entries(&entries, &positions) {
                Ok(results) => {
                    engine.print_report(&results);
                }
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(arg) => {
            let expected_moves = match parse_expected_moves(&arg) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error parsing expected moves: {}", e);
                    process::exit(1);
                }
            };

            println!(
                "Validating {} expected move(s)...\n",
                expected_moves.len()
            );
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => {
                    println!("✓ All expected moves validated successfully!");
                }
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
