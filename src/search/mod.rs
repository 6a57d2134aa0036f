//! Move search for 2048.
//!
//! Every algorithm implements [`SearchStrategy`] and shares one
//! [`SearchContext`] per move decision. The context owns the deadline, node
//! counter, transposition table and evaluation cache. It is created fresh for
//! each decision and dropped afterwards, so concurrent decisions for different
//! games never share state.
//!
//! - [`Expectimax`]: MAX layer over moves, CHANCE layer over tile spawns.
//! - [`AlphaBeta`]: the same tree with alpha/beta bookkeeping in the MAX layer.
//! - [`Minimax`]: worst-case tile placement, pruned in both layers.
//! - [`MonteCarlo`]: UCB1 tree search with random rollouts.

use rand::{Rng, RngCore};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::board::{Board, BoardKey};
use crate::config::SearchConfig;
use crate::heuristic::Evaluator;
use crate::types::{Algorithm, Direction};

mod alpha_beta;
mod expectimax;
pub mod mcts;
mod minimax;

pub use alpha_beta::AlphaBeta;
pub use expectimax::Expectimax;
pub use mcts::MonteCarlo;
pub use minimax::Minimax;

/// A board together with the score accumulated to reach it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub board: Board,
    pub score: u64,
}

impl SearchState {
    pub fn new(board: Board, score: u64) -> Self {
        SearchState { board, score }
    }

    /// Applies a move; `None` when the move leaves the board unchanged
    pub fn after_move(&self, direction: Direction) -> Option<SearchState> {
        let transition = self.board.apply(direction);
        if !transition.changed {
            return None;
        }
        Some(SearchState {
            board: transition.board,
            score: self.score + transition.score_delta,
        })
    }

    /// Places a tile without touching the score
    pub fn with_tile(&self, row: usize, col: usize, value: u32) -> SearchState {
        SearchState {
            board: self.board.with_tile(row, col, value),
            score: self.score,
        }
    }
}

/// Limits for one decision, resolved from difficulty
#[derive(Debug, Clone, Copy)]
pub struct SearchBudget {
    pub depth: u32,
    pub simulations: u32,
    /// Relative jitter applied to root move values; 0 disables it
    pub randomness: f64,
}

/// Result of one search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub best_move: Option<Direction>,
    /// Unjittered value of the chosen move
    pub evaluation: Option<f64>,
    pub nodes_evaluated: u64,
}

/// Common interface for every search algorithm
pub trait SearchStrategy {
    fn name(&self) -> &'static str;

    /// Chooses a move for `state`; never mutates it
    fn search(
        &self,
        state: &SearchState,
        budget: &SearchBudget,
        ctx: &mut SearchContext<'_>,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome;
}

/// Returns the strategy object for an algorithm
pub fn strategy_for(algorithm: Algorithm) -> Box<dyn SearchStrategy> {
    match algorithm {
        Algorithm::Expectimax => Box::new(Expectimax),
        Algorithm::AlphaBeta => Box::new(AlphaBeta),
        Algorithm::MonteCarlo => Box::new(MonteCarlo),
        Algorithm::Minimax => Box::new(Minimax),
        Algorithm::NeuralHeuristic => {
            log::warn!("Neural heuristic is not available, searching with expectimax");
            Box::new(Expectimax)
        }
    }
}

/// Hash map that clears itself once it grows past its capacity
#[derive(Debug)]
pub struct BoundedCache<K> {
    entries: HashMap<K, f64>,
    capacity: usize,
    lookups: u64,
    hits: u64,
}

impl<K: Hash + Eq> BoundedCache<K> {
    pub fn new(capacity: usize) -> Self {
        BoundedCache {
            entries: HashMap::new(),
            capacity,
            lookups: 0,
            hits: 0,
        }
    }

    pub fn get(&mut self, key: &K) -> Option<f64> {
        self.lookups += 1;
        let found = self.entries.get(key).copied();
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    pub fn insert(&mut self, key: K, value: f64) {
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

/// Transposition key: identical boards only share a value at the same remaining depth
///
/// The score is part of the key only when the evaluator reads it; otherwise the
/// same board reached through different merges shares one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranspositionKey {
    board: BoardKey,
    score: Option<u64>,
    depth: u32,
}

impl TranspositionKey {
    pub fn new(state: &SearchState, depth: u32, include_score: bool) -> Self {
        TranspositionKey {
            board: state.board.key(),
            score: include_score.then_some(state.score),
            depth,
        }
    }
}

/// Per-invocation search state: deadline, counters and caches
pub struct SearchContext<'a> {
    evaluator: &'a dyn Evaluator,
    settings: SearchConfig,
    started: Instant,
    time_budget: Duration,
    nodes: u64,
    transpositions: BoundedCache<TranspositionKey>,
    evaluations: BoundedCache<BoardKey>,
}

impl<'a> SearchContext<'a> {
    pub fn new(evaluator: &'a dyn Evaluator, settings: &SearchConfig, time_budget: Duration) -> Self {
        SearchContext {
            evaluator,
            settings: settings.clone(),
            started: Instant::now(),
            time_budget,
            nodes: 0,
            transpositions: BoundedCache::new(settings.cache_capacity),
            evaluations: BoundedCache::new(settings.cache_capacity),
        }
    }

    pub fn settings(&self) -> &SearchConfig {
        &self.settings
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// True once the wall-clock budget is spent
    pub fn timed_out(&self) -> bool {
        self.started.elapsed() > self.time_budget
    }

    pub fn count_node(&mut self) {
        self.nodes += 1;
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Heuristic value of a state, memoized by board
    pub fn evaluate(&mut self, state: &SearchState) -> f64 {
        let key = state.board.key();
        let board_value = match self.evaluations.get(&key) {
            Some(value) => value,
            None => {
                let value = self.evaluator.evaluate_board(&state.board);
                self.evaluations.insert(key, value);
                value
            }
        };
        board_value + self.evaluator.score_term(state.score)
    }

    /// Key for `state` at `depth`, scoped to what the evaluator can distinguish
    pub fn transposition_key(&self, state: &SearchState, depth: u32) -> TranspositionKey {
        TranspositionKey::new(state, depth, self.evaluator.uses_score())
    }

    pub fn lookup_transposition(&mut self, key: &TranspositionKey) -> Option<f64> {
        self.transpositions.get(key)
    }

    pub fn store_transposition(&mut self, key: TranspositionKey, value: f64) {
        self.transpositions.insert(key, value);
    }

    pub fn transposition_entries(&self) -> usize {
        self.transpositions.len()
    }

    pub fn transposition_hit_rate(&self) -> f64 {
        self.transpositions.hit_rate()
    }

    pub fn evaluation_entries(&self) -> usize {
        self.evaluations.len()
    }

    /// (tile value, probability) pairs for one spawned tile
    pub fn spawn_outcomes(&self) -> [(u32, f64); 2] {
        let two = self.settings.two_tile_probability;
        [(2, two), (4, 1.0 - two)]
    }
}

/// Adds difficulty jitter: value + (U[0,1) - 0.5) · randomness · value
pub fn jitter(value: f64, randomness: f64, rng: &mut dyn RngCore) -> f64 {
    if randomness == 0.0 {
        return value;
    }
    value + (rng.random::<f64>() - 0.5) * randomness * value
}

/// Root loop shared by the value-based strategies
///
/// Tries each legal move in fixed order, scores it with `value_of`, and keeps
/// the first move with the highest jittered value. Stops trying further moves
/// once the deadline has passed; at least one legal move is always scored.
pub(crate) fn choose_root_move<F>(
    state: &SearchState,
    budget: &SearchBudget,
    ctx: &mut SearchContext<'_>,
    rng: &mut dyn RngCore,
    mut value_of: F,
) -> SearchOutcome
where
    F: FnMut(&SearchState, &mut SearchContext<'_>) -> f64,
{
    let mut best_move = None;
    let mut best_adjusted = f64::NEG_INFINITY;
    let mut evaluation = None;

    for direction in Direction::all() {
        let child = match state.after_move(direction) {
            Some(child) => child,
            None => continue,
        };

        let value = value_of(&child, ctx);
        let adjusted = jitter(value, budget.randomness, rng);
        log::debug!(
            "root {}: value {:.3} (adjusted {:.3})",
            direction.as_str(),
            value,
            adjusted
        );

        if best_move.is_none() || adjusted > best_adjusted {
            best_adjusted = adjusted;
            best_move = Some(direction);
            evaluation = Some(value);
        }

        if ctx.timed_out() {
            log::debug!("time budget spent after root move {}", direction.as_str());
            break;
        }
    }

    SearchOutcome {
        best_move,
        evaluation,
        nodes_evaluated: ctx.nodes(),
    }
}
