// Move selection for the 2048 AI
//
// Bot resolves difficulty into a search budget, builds a fresh evaluator and
// search context for every decision, and dispatches to the chosen algorithm.
// Game over is reported as a decision without a move, never as an error.

use log::info;
use rand::RngCore;
use serde_json::{json, Value};
use std::time::Instant;

use crate::board::Board;
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::heuristic::build_evaluator;
use crate::search::{strategy_for, SearchBudget, SearchContext, SearchState};
use crate::types::{Algorithm, Difficulty, MoveDecision, MoveRequest};

/// 2048 AI with OOP-style API
/// Takes static configuration and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            logger: DebugLogger::disabled(),
        }
    }

    /// Creates a Bot that appends every HTTP decision to a JSONL log
    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        Bot { config, logger }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns service metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "name": "fancy-2048-ai",
            "version": env!("CARGO_PKG_VERSION"),
            "algorithms": Algorithm::all().iter().map(|a| a.as_str()).collect::<Vec<_>>(),
            "difficulties": Difficulty::all().iter().map(|d| d.as_str()).collect::<Vec<_>>(),
            "default_algorithm": self.config.defaults.algorithm().as_str(),
            "default_difficulty": self.config.defaults.difficulty().as_str(),
            "time_budget_ms": self.config.timing.time_budget_ms,
        })
    }

    /// Computes the best move for a board using the thread-local RNG for jitter and rollouts
    pub fn get_best_move(
        &self,
        board: &Board,
        score: u64,
        algorithm: Algorithm,
        difficulty: Difficulty,
    ) -> MoveDecision {
        Self::decide(
            &self.config,
            board,
            score,
            algorithm,
            difficulty,
            &mut rand::rng(),
        )
    }

    /// Same as `get_best_move` with a caller-supplied RNG, for reproducible decisions
    pub fn get_best_move_with_rng(
        &self,
        board: &Board,
        score: u64,
        algorithm: Algorithm,
        difficulty: Difficulty,
        rng: &mut dyn RngCore,
    ) -> MoveDecision {
        Self::decide(&self.config, board, score, algorithm, difficulty, rng)
    }

    /// Computes and returns the next move for an HTTP request
    /// Corresponds to POST /move endpoint
    ///
    /// The CPU-bound search runs on tokio's blocking pool; the search's own
    /// deadline bounds how long this future stays pending.
    ///
    /// # Returns
    /// * `Result<MoveDecision, String>` - The decision, or a message describing a malformed request
    pub async fn get_move(&self, request: MoveRequest) -> Result<MoveDecision, String> {
        let board = Board::from_rows(&request.board)?;
        if let Some(size) = request.size {
            if size != board.size() {
                return Err(format!(
                    "Declared size {} does not match board dimension {}",
                    size,
                    board.size()
                ));
            }
        }

        let algorithm = Algorithm::parse_or(
            request.algorithm.as_deref(),
            self.config.defaults.algorithm(),
        );
        let difficulty = Difficulty::parse_or(
            request.difficulty.as_deref(),
            self.config.defaults.difficulty(),
        );
        let score = request.score;
        let config = self.config.clone();
        let search_board = board.clone();

        let decision = tokio::task::spawn_blocking(move || {
            Bot::decide(
                &config,
                &search_board,
                score,
                algorithm,
                difficulty,
                &mut rand::rng(),
            )
        })
        .await
        .map_err(|e| format!("Search task failed: {}", e))?;

        self.logger.log_decision(board, score, decision.clone());
        Ok(decision)
    }

    /// One complete move decision
    ///
    /// A terminal board short-circuits to a decision without a move. Otherwise
    /// the selected strategy runs against a context that lives only for this call.
    fn decide(
        config: &Config,
        board: &Board,
        score: u64,
        algorithm: Algorithm,
        difficulty: Difficulty,
        rng: &mut dyn RngCore,
    ) -> MoveDecision {
        let start_time = Instant::now();
        let level = *config.difficulty.for_difficulty(difficulty);

        if board.is_terminal() {
            info!("No legal moves: game over");
            return MoveDecision {
                direction: None,
                nodes_evaluated: 0,
                computation_time_ms: elapsed_ms(start_time),
                evaluation: None,
                algorithm,
                difficulty,
                depth: level.depth,
            };
        }

        let budget = SearchBudget {
            depth: level.depth,
            simulations: level.mcts_simulations,
            randomness: level.randomness,
        };
        let evaluator = build_evaluator(&config.heuristic);
        let mut ctx = SearchContext::new(
            evaluator.as_ref(),
            &config.search,
            config.timing.time_budget(),
        );
        let strategy = strategy_for(algorithm);
        let state = SearchState::new(board.clone(), score);

        let outcome = strategy.search(&state, &budget, &mut ctx, rng);

        let decision = MoveDecision {
            direction: outcome.best_move,
            nodes_evaluated: outcome.nodes_evaluated,
            computation_time_ms: elapsed_ms(start_time),
            evaluation: outcome.evaluation,
            algorithm,
            difficulty,
            depth: level.depth,
        };

        info!(
            "{} ({}): chose {} (eval: {}, nodes: {}, tt entries: {}, tt hit rate: {:.1}%, time: {:.1}ms)",
            strategy.name(),
            difficulty.as_str(),
            decision.direction.map_or("none", |d| d.as_str()),
            decision
                .evaluation
                .map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v)),
            decision.nodes_evaluated,
            ctx.transposition_entries(),
            ctx.transposition_hit_rate() * 100.0,
            decision.computation_time_ms
        );

        decision
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
