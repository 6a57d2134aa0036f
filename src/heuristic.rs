//! Board evaluation heuristics
//!
//! Two evaluators share the [`Evaluator`] trait:
//! - [`WeightedHeuristic`]: empty cells, smoothness, monotonicity, max tile,
//!   snake ordering and corner placement, all on log2 tile values.
//! - [`PositionalHeuristic`]: a position-matrix variant that weights tiles by
//!   their distance from the board edge.
//!
//! Both reward the same qualities: sparse boards, smooth neighbours, ordered
//! rows and columns, and the largest tile parked in a corner. Evaluators are
//! pure; memoization lives in the per-invocation search context.

use crate::board::{log2_tile, Board};
use crate::config::{HeuristicConfig, HeuristicVariant, PositionalWeights, WeightedWeights};

/// Scores a board from the player's point of view; higher is better
pub trait Evaluator: Send + Sync {
    /// Board-only part of the evaluation
    fn evaluate_board(&self, board: &Board) -> f64;

    /// Contribution of the running score; zero unless an evaluator opts in
    fn score_term(&self, _score: u64) -> f64 {
        0.0
    }

    /// Whether `score_term` can be non-zero; otherwise equal boards evaluate equally at any score
    fn uses_score(&self) -> bool {
        false
    }

    fn evaluate(&self, board: &Board, score: u64) -> f64 {
        self.evaluate_board(board) + self.score_term(score)
    }
}

/// Builds the evaluator selected in config
pub fn build_evaluator(config: &HeuristicConfig) -> Box<dyn Evaluator> {
    match config.variant {
        HeuristicVariant::Weighted => Box::new(WeightedHeuristic::new(
            config.weighted.clone(),
            config.terminal_penalty,
        )),
        HeuristicVariant::Positional => Box::new(PositionalHeuristic::new(
            config.positional.clone(),
            config.terminal_penalty,
        )),
    }
}

/// Unweighted factor values of the weighted heuristic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicBreakdown {
    pub empty_cells: f64,
    pub smoothness: f64,
    pub monotonicity: f64,
    pub max_tile: f64,
    pub snake: f64,
    pub corner: f64,
    pub game_over: bool,
}

#[derive(Debug, Clone)]
pub struct WeightedHeuristic {
    weights: WeightedWeights,
    terminal_penalty: f64,
}

impl WeightedHeuristic {
    pub fn new(weights: WeightedWeights, terminal_penalty: f64) -> Self {
        WeightedHeuristic {
            weights,
            terminal_penalty,
        }
    }

    pub fn breakdown(&self, board: &Board) -> HeuristicBreakdown {
        let empty = board.empty_count();
        let max_tile = board.max_tile();

        HeuristicBreakdown {
            empty_cells: ((empty + 1) as f64).log2(),
            smoothness: smoothness(board),
            monotonicity: monotonicity(board),
            max_tile: if max_tile > 0 { log2_tile(max_tile) as f64 } else { 0.0 },
            snake: snake_pattern(board),
            corner: corner_bonus(board),
            game_over: empty == 0 && board.is_terminal(),
        }
    }
}

impl Evaluator for WeightedHeuristic {
    fn evaluate_board(&self, board: &Board) -> f64 {
        let f = self.breakdown(board);
        let w = &self.weights;

        let mut score = w.empty_cells * f.empty_cells
            + w.smoothness * f.smoothness
            + w.monotonicity * f.monotonicity
            + w.max_tile * f.max_tile
            + w.snake * f.snake
            + w.corner * f.corner;

        if f.game_over {
            score -= self.terminal_penalty;
        }
        score
    }

    fn score_term(&self, score: u64) -> f64 {
        if self.weights.score == 0.0 {
            return 0.0;
        }
        self.weights.score * ((score + 1) as f64).log2()
    }

    fn uses_score(&self) -> bool {
        self.weights.score != 0.0
    }
}

/// Negated sum of log2 differences between adjacent non-empty tiles
pub fn smoothness(board: &Board) -> f64 {
    let n = board.size();
    let mut total = 0.0;

    for row in 0..n {
        for col in 0..n {
            let value = board.get(row, col);
            if value == 0 {
                continue;
            }
            let current = log2_tile(value) as f64;

            if col + 1 < n && board.get(row, col + 1) != 0 {
                total -= (current - log2_tile(board.get(row, col + 1)) as f64).abs();
            }
            if row + 1 < n && board.get(row + 1, col) != 0 {
                total -= (current - log2_tile(board.get(row + 1, col)) as f64).abs();
            }
        }
    }
    total
}

/// Monotonicity on log2 values, one score per axis
///
/// Along every row (then every column) the non-empty tiles are compared with
/// their predecessor, the first cell of the line acting as the starting point
/// even when empty. Decreasing steps accumulate into one penalty total and
/// increasing steps into the other, summed over all lines of the axis. Each
/// axis contributes the smaller penalty (the max of two non-positive totals),
/// so a board ordered in one uniform direction per axis scores 0.
pub fn monotonicity(board: &Board) -> f64 {
    let n = board.size();
    let mut horizontal = [0.0f64; 2];
    let mut vertical = [0.0f64; 2];

    for line in 0..n {
        let row: Vec<u32> = (0..n).map(|col| board.get(line, col)).collect();
        let column: Vec<u32> = (0..n).map(|r| board.get(r, line)).collect();
        accumulate_monotonic_penalties(&row, &mut horizontal);
        accumulate_monotonic_penalties(&column, &mut vertical);
    }

    horizontal[0].max(horizontal[1]) + vertical[0].max(vertical[1])
}

fn accumulate_monotonic_penalties(line: &[u32], totals: &mut [f64; 2]) {
    let mut current = log2_tile(line[0]) as f64;

    for &value in line.iter().skip(1).filter(|&&v| v != 0) {
        let next = log2_tile(value) as f64;
        if current > next {
            totals[0] += next - current;
        } else if next > current {
            totals[1] += current - next;
        }
        current = next;
    }
}

/// Cells in boustrophedon order: even rows left to right, odd rows right to left
pub fn snake_path(size: usize) -> Vec<(usize, usize)> {
    let mut path = Vec::with_capacity(size * size);
    for row in 0..size {
        if row % 2 == 0 {
            path.extend((0..size).map(|col| (row, col)));
        } else {
            path.extend((0..size).rev().map(|col| (row, col)));
        }
    }
    path
}

/// Rewards tiles that decrease along the snake path
///
/// For each consecutive pair of non-empty cells on the path, adds log2 of the
/// larger tile when the pair is non-increasing and subtracts it otherwise.
pub fn snake_pattern(board: &Board) -> f64 {
    let path = snake_path(board.size());
    let mut total = 0.0;

    for pair in path.windows(2) {
        let a = board.get(pair[0].0, pair[0].1);
        let b = board.get(pair[1].0, pair[1].1);
        if a == 0 || b == 0 {
            continue;
        }
        if a >= b {
            total += log2_tile(a) as f64;
        } else {
            total -= log2_tile(b) as f64;
        }
    }
    total
}

/// log2 of the max tile when it sits in a corner, else 0
pub fn corner_bonus(board: &Board) -> f64 {
    let max_tile = board.max_tile();
    if max_tile == 0 {
        return 0.0;
    }

    let last = board.size() - 1;
    let corners = [(0, 0), (0, last), (last, 0), (last, last)];
    if corners.iter().any(|&(r, c)| board.get(r, c) == max_tile) {
        log2_tile(max_tile) as f64
    } else {
        0.0
    }
}

/// Position-matrix evaluator
#[derive(Debug, Clone)]
pub struct PositionalHeuristic {
    weights: PositionalWeights,
    terminal_penalty: f64,
}

impl PositionalHeuristic {
    pub fn new(weights: PositionalWeights, terminal_penalty: f64) -> Self {
        PositionalHeuristic {
            weights,
            terminal_penalty,
        }
    }
}

impl Evaluator for PositionalHeuristic {
    fn evaluate_board(&self, board: &Board) -> f64 {
        let w = &self.weights;
        let empty = board.empty_count() as f64;

        let mut score = w.position * position_score(board)
            + w.monotonicity * line_monotonicity(board)
            + w.smoothness * smoothness(board)
            + w.empty_cells * empty * empty
            + w.max_tile_position * max_tile_position(board);

        if board.is_terminal() {
            score -= self.terminal_penalty;
        }
        score
    }
}

/// Weight of a cell: (N - distance to nearest edge)^1.5
pub fn position_weight(row: usize, col: usize, size: usize) -> f64 {
    let edge_distance = row.min(size - 1 - row).min(col.min(size - 1 - col));
    ((size - edge_distance) as f64).powf(1.5)
}

/// Σ tile · log2(tile) · position weight
pub fn position_score(board: &Board) -> f64 {
    let n = board.size();
    let mut total = 0.0;
    for row in 0..n {
        for col in 0..n {
            let value = board.get(row, col);
            if value > 0 {
                total += value as f64 * log2_tile(value) as f64 * position_weight(row, col, n);
            }
        }
    }
    total
}

/// Per-line monotonicity: each row and column scores -min(increasing, decreasing)
pub fn line_monotonicity(board: &Board) -> f64 {
    let n = board.size();
    let mut total = 0.0;
    for i in 0..n {
        let row: Vec<u32> = (0..n).map(|col| board.get(i, col)).collect();
        let column: Vec<u32> = (0..n).map(|r| board.get(r, i)).collect();
        total += single_line_monotonicity(&row) + single_line_monotonicity(&column);
    }
    total
}

fn single_line_monotonicity(line: &[u32]) -> f64 {
    let mut increasing = 0.0f64;
    let mut decreasing = 0.0f64;

    for pair in line.windows(2) {
        let current = log2_tile(pair[0]) as f64;
        let next = log2_tile(pair[1]) as f64;
        if current > next {
            decreasing += current - next;
        } else if current < next {
            increasing += next - current;
        }
    }
    -increasing.min(decreasing)
}

/// 2·max in a corner, max on an edge, otherwise 0 (first max in row-major order)
pub fn max_tile_position(board: &Board) -> f64 {
    let n = board.size();
    let mut best = (0u32, 0usize, 0usize);
    for row in 0..n {
        for col in 0..n {
            let value = board.get(row, col);
            if value > best.0 {
                best = (value, row, col);
            }
        }
    }

    let (max_tile, row, col) = best;
    if max_tile == 0 {
        return 0.0;
    }

    let row_edge = row == 0 || row == n - 1;
    let col_edge = col == 0 || col == n - 1;
    if row_edge && col_edge {
        max_tile as f64 * 2.0
    } else if row_edge || col_edge {
        max_tile as f64
    } else {
        0.0
    }
}
