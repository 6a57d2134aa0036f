// Self-play runner for measuring algorithm strength
//
// Plays complete games with the Bot choosing every move. Games run in
// parallel on rayon's pool; each game owns a seeded StdRng so a seed always
// produces the same game for a fixed configuration and unlimited time.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::board::Board;
use crate::bot::Bot;
use crate::config::Config;
use crate::types::{Algorithm, Difficulty};

/// Outcome of one self-play game
#[derive(Debug, Clone)]
pub struct GameSummary {
    pub seed: u64,
    pub final_board: Board,
    pub score: u64,
    pub max_tile: u32,
    pub moves: u32,
    /// False when the game stopped at the move cap instead of running out of moves
    pub game_over: bool,
    pub total_nodes: u64,
    pub elapsed_ms: f64,
}

/// Aggregate statistics over a batch of games
#[derive(Debug, Default)]
pub struct SelfPlayReport {
    pub games: usize,
    pub mean_score: f64,
    pub best_score: u64,
    pub mean_moves: f64,
    pub mean_decision_ms: f64,
    /// Number of games whose largest tile reached each value
    pub max_tile_counts: BTreeMap<u32, usize>,
}

pub struct SelfPlayRunner {
    bot: Bot,
    algorithm: Algorithm,
    difficulty: Difficulty,
    board_size: usize,
    max_moves: u32,
}

impl SelfPlayRunner {
    pub fn new(config: Config, algorithm: Algorithm, difficulty: Difficulty) -> Self {
        SelfPlayRunner {
            bot: Bot::new(config),
            algorithm,
            difficulty,
            board_size: 4,
            max_moves: 10_000,
        }
    }

    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    pub fn with_max_moves(mut self, max_moves: u32) -> Self {
        self.max_moves = max_moves;
        self
    }

    /// Plays one game to completion or to the move cap
    pub fn play_game(&self, seed: u64) -> GameSummary {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::new_game(self.board_size, &mut rng);
        let mut score = 0u64;
        let mut moves = 0u32;
        let mut total_nodes = 0u64;
        let mut game_over = false;

        while moves < self.max_moves {
            let decision = self.bot.get_best_move_with_rng(
                &board,
                score,
                self.algorithm,
                self.difficulty,
                &mut rng,
            );
            total_nodes += decision.nodes_evaluated;

            let direction = match decision.direction {
                Some(direction) => direction,
                None => {
                    game_over = true;
                    break;
                }
            };

            let transition = board.apply(direction);
            score += transition.score_delta;
            let next = transition.board;
            board = next.spawn_random_tile(&mut rng).unwrap_or(next);
            moves += 1;
        }

        if !game_over {
            game_over = board.is_terminal();
        }

        let summary = GameSummary {
            seed,
            max_tile: board.max_tile(),
            final_board: board,
            score,
            moves,
            game_over,
            total_nodes,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        };

        info!(
            "Game {}: score {}, max tile {}, {} moves ({:.0}ms)",
            seed, summary.score, summary.max_tile, summary.moves, summary.elapsed_ms
        );
        summary
    }

    /// Plays one game per seed in parallel; results come back in seed order
    pub fn run(&self, seeds: &[u64]) -> Vec<GameSummary> {
        seeds.par_iter().map(|&seed| self.play_game(seed)).collect()
    }

    pub fn report(&self, games: &[GameSummary]) -> SelfPlayReport {
        if games.is_empty() {
            return SelfPlayReport::default();
        }

        let count = games.len() as f64;
        let total_moves: u32 = games.iter().map(|g| g.moves).sum();
        let total_ms: f64 = games.iter().map(|g| g.elapsed_ms).sum();
        let mut max_tile_counts = BTreeMap::new();
        for game in games {
            *max_tile_counts.entry(game.max_tile).or_insert(0) += 1;
        }

        SelfPlayReport {
            games: games.len(),
            mean_score: games.iter().map(|g| g.score as f64).sum::<f64>() / count,
            best_score: games.iter().map(|g| g.score).max().unwrap_or(0),
            mean_moves: total_moves as f64 / count,
            mean_decision_ms: if total_moves > 0 {
                total_ms / total_moves as f64
            } else {
                0.0
            },
            max_tile_counts,
        }
    }

    pub fn print_report(&self, games: &[GameSummary]) {
        let report = self.report(games);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                   SELF-PLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Algorithm:      {}", self.algorithm.as_str());
        println!("Difficulty:     {}", self.difficulty.as_str());
        println!("Games:          {}", report.games);
        println!("Mean Score:     {:.1}", report.mean_score);
        println!("Best Score:     {}", report.best_score);
        println!("Mean Moves:     {:.1}", report.mean_moves);
        println!("Mean Decision:  {:.1}ms", report.mean_decision_ms);
        println!("═══════════════════════════════════════════════════════════");

        for (tile, count) in report.max_tile_counts.iter().rev() {
            println!(
                "  {:>6}: {:>4} ({:.1}%)",
                tile,
                count,
                *count as f64 / report.games as f64 * 100.0
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_runner(max_moves: u32) -> SelfPlayRunner {
        let mut config = Config::default_hardcoded();
        config.timing.time_budget_ms = 50;
        SelfPlayRunner::new(config, Algorithm::Expectimax, Difficulty::Easy)
            .with_max_moves(max_moves)
    }

    #[test]
    fn test_move_cap_is_respected() {
        let runner = quick_runner(5);
        let game = runner.play_game(1);

        assert!(game.moves <= 5);
        assert!(game.max_tile >= 2);
        assert_eq!(game.final_board.size(), 4);
    }

    #[test]
    fn test_report_aggregates_games() {
        let runner = quick_runner(3);
        let games = runner.run(&[1, 2, 3]);
        let report = runner.report(&games);

        assert_eq!(report.games, 3);
        assert_eq!(games.iter().map(|g| g.seed).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(report.max_tile_counts.values().sum::<usize>(), 3);
        assert!(report.best_score as f64 >= report.mean_score);
    }

    #[test]
    fn test_empty_report() {
        let runner = quick_runner(1);
        let report = runner.report(&[]);
        assert_eq!(report.games, 0);
        assert_eq!(report.mean_score, 0.0);
    }
}
