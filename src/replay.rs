// Replay module for analyzing logged decisions and debugging move selection
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run the selector on each logged board
// 3. Compare logged vs replayed moves
// 4. Generate summary reports

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::DebugLogEntry;
use crate::types::{Direction, MoveDecision};

/// Result of replaying a single logged decision
#[derive(Debug, Clone)]
pub struct ReplayResult {
    /// 1-based position of the entry in the log
    pub entry: usize,
    pub original_move: Option<Direction>,
    pub replayed_move: Option<Direction>,
    pub matches: bool,
    pub original_evaluation: Option<f64>,
    pub replayed_evaluation: Option<f64>,
    pub nodes_evaluated: u64,
    pub computation_time_ms: f64,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_entries: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    bot: Bot,
    verbose: bool,
    seed: Option<u64>,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            bot: Bot::new(config),
            verbose,
            seed: None,
        }
    }

    /// Seeds jitter and rollouts so repeated replays agree with each other
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<DebugLogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DebugLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the selector on one logged board with the logged algorithm and difficulty
    pub fn replay_decision(&self, entry: &DebugLogEntry) -> MoveDecision {
        let logged = &entry.decision;
        match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.bot.get_best_move_with_rng(
                    &entry.board,
                    entry.score,
                    logged.algorithm,
                    logged.difficulty,
                    &mut rng,
                )
            }
            None => self.bot.get_best_move(
                &entry.board,
                entry.score,
                logged.algorithm,
                logged.difficulty,
            ),
        }
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, index: usize, entry: &DebugLogEntry) -> ReplayResult {
        if self.verbose {
            info!("Replaying entry {}...", index);
        }

        let replayed = self.replay_decision(entry);
        let original_move = entry.decision.direction;
        let matches = original_move == replayed.direction;

        let result = ReplayResult {
            entry: index,
            original_move,
            replayed_move: replayed.direction,
            matches,
            original_evaluation: entry.decision.evaluation,
            replayed_evaluation: replayed.evaluation,
            nodes_evaluated: replayed.nodes_evaluated,
            computation_time_ms: replayed.computation_time_ms,
        };

        if self.verbose {
            if matches {
                info!(
                    "Entry {}: ✓ MATCH - {} (nodes: {}, time: {:.1}ms)",
                    index,
                    move_str(result.replayed_move),
                    result.nodes_evaluated,
                    result.computation_time_ms
                );
            } else {
                warn!(
                    "Entry {}: ✗ MISMATCH - Original: {}, Replayed: {} (nodes: {}, time: {:.1}ms)",
                    index,
                    move_str(result.original_move),
                    move_str(result.replayed_move),
                    result.nodes_evaluated,
                    result.computation_time_ms
                );
            }
        }

        result
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[DebugLogEntry]) -> Vec<ReplayResult> {
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| self.replay_entry(i + 1, entry))
            .collect()
    }

    /// Replays specific entries (1-based positions) from a log file
    pub fn replay_entries(
        &self,
        entries: &[DebugLogEntry],
        positions: &[usize],
    ) -> Result<Vec<ReplayResult>, String> {
        positions
            .iter()
            .map(|&pos| {
                let entry = pos
                    .checked_sub(1)
                    .and_then(|i| entries.get(i))
                    .ok_or_else(|| format!("Entry {} not found in log file", pos))?;
                Ok(self.replay_entry(pos, entry))
            })
            .collect()
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_entries = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_entries - matches;
        let match_rate = if total_entries > 0 {
            (matches as f64 / total_entries as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_entries,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Entries:  {}", stats.total_entries);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let count = results.len() as f64;
            let avg_time = results.iter().map(|r| r.computation_time_ms).sum::<f64>() / count;
            let avg_nodes = results.iter().map(|r| r.nodes_evaluated as f64).sum::<f64>() / count;

            println!("Average Nodes Evaluated:    {:.0}", avg_nodes);
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Entry {}: {} → {} (nodes: {}, time: {:.1}ms)",
                    result.entry,
                    move_str(result.original_move),
                    move_str(result.replayed_move),
                    result.nodes_evaluated,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific entries logged one of the acceptable moves
    pub fn validate_expected_moves(
        &self,
        entries: &[DebugLogEntry],
        expected_moves: &[(usize, Vec<Direction>)],
    ) -> Result<(), String> {
        for (pos, acceptable) in expected_moves {
            let entry = pos
                .checked_sub(1)
                .and_then(|i| entries.get(i))
                .ok_or_else(|| format!("Entry {} not found in log", pos))?;

            let actual = entry
                .decision
                .direction
                .ok_or_else(|| format!("Entry {}: no move was logged (game over)", pos))?;

            if !acceptable.contains(&actual) {
                return Err(format!(
                    "Entry {}: Expected one of {:?}, but got {}",
                    pos,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual.as_str()
                ));
            }
        }

        Ok(())
    }
}

fn move_str(direction: Option<Direction>) -> &'static str {
    direction.map_or("none", |d| d.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::types::{Algorithm, Difficulty};
    use std::io::Write;

    fn entry(rows: Vec<Vec<u32>>, direction: Option<Direction>) -> DebugLogEntry {
        DebugLogEntry {
            board: Board::from_rows(&rows).unwrap(),
            score: 0,
            decision: MoveDecision {
                direction,
                nodes_evaluated: 0,
                computation_time_ms: 0.0,
                evaluation: None,
                algorithm: Algorithm::Expectimax,
                difficulty: Difficulty::Easy,
                depth: 3,
            },
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn checkerboard() -> Vec<Vec<u32>> {
        vec![
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
        ]
    }

    #[test]
    fn test_load_log_file_round_trips_entries() {
        let path = std::env::temp_dir().join(format!("fancy2048_replay_{}.jsonl", std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            let logged = entry(checkerboard(), None);
            writeln!(file, "{}", serde_json::to_string(&logged).unwrap()).unwrap();
            writeln!(file).unwrap();
        }

        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = engine.load_log_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].board.to_rows(), checkerboard());
        assert_eq!(entries[0].decision.direction, None);
    }

    #[test]
    fn test_replay_of_game_over_entry_matches() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false).with_seed(7);
        let results = engine.replay_all(&[entry(checkerboard(), None)]);

        assert_eq!(results.len(), 1);
        assert!(results[0].matches);
        assert_eq!(results[0].replayed_move, None);

        let stats = engine.generate_stats(&results);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.match_rate, 100.0);
    }

    #[test]
    fn test_replay_entries_rejects_missing_positions() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![entry(checkerboard(), None)];
        assert!(engine.replay_entries(&entries, &[0]).is_err());
        assert!(engine.replay_entries(&entries, &[2]).is_err());
    }

    #[test]
    fn test_validate_expected_moves() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let rows = vec![
            vec![2, 2, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ];
        let entries = vec![entry(rows, Some(Direction::Left))];

        assert!(engine
            .validate_expected_moves(&entries, &[(1, vec![Direction::Left, Direction::Right])])
            .is_ok());
        assert!(engine
            .validate_expected_moves(&entries, &[(1, vec![Direction::Up])])
            .is_err());
    }
}
