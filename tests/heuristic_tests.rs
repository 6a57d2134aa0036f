//! Heuristic Evaluation Tests
//!
//! Individual factors on hand-built boards, plus the terminal penalty on both
//! evaluator variants.

use fancy_2048_ai::board::Board;
use fancy_2048_ai::config::{Config, HeuristicVariant, WeightedWeights};
use fancy_2048_ai::heuristic::{
    build_evaluator, corner_bonus, line_monotonicity, max_tile_position, monotonicity,
    position_weight, smoothness, snake_pattern, Evaluator, PositionalHeuristic, WeightedHeuristic,
};

fn board(rows: &[[u32; 4]; 4]) -> Board {
    let rows: Vec<Vec<u32>> = rows.iter().map(|r| r.to_vec()).collect();
    Board::from_rows(&rows).unwrap()
}

fn checkerboard() -> Board {
    board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]])
}

fn empty_cells_only() -> WeightedWeights {
    WeightedWeights {
        empty_cells: 1.0,
        monotonicity: 0.0,
        smoothness: 0.0,
        max_tile: 0.0,
        snake: 0.0,
        corner: 0.0,
        score: 0.0,
    }
}

#[test]
fn test_more_empty_cells_never_scores_lower() {
    let heuristic = WeightedHeuristic::new(empty_cells_only(), 1_000_000.0);
    let sparse = board(&[[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    let denser = board(&[[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 4]]);

    assert!(heuristic.evaluate_board(&sparse) > heuristic.evaluate_board(&denser));
}

#[test]
fn test_terminal_penalty_dominates() {
    let config = Config::default_hardcoded();
    let weighted = build_evaluator(&config.heuristic);

    let mut positional_config = config.heuristic.clone();
    positional_config.variant = HeuristicVariant::Positional;
    let positional = build_evaluator(&positional_config);

    let open = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);
    for evaluator in [&weighted, &positional] {
        assert!(evaluator.evaluate_board(&checkerboard()) < evaluator.evaluate_board(&open));
        assert!(evaluator.evaluate_board(&checkerboard()) < -500_000.0);
    }
}

#[test]
fn test_breakdown_flags_game_over() {
    let heuristic = WeightedHeuristic::new(empty_cells_only(), 1_000_000.0);
    assert!(heuristic.breakdown(&checkerboard()).game_over);

    let mergeable = board(&[[2, 2, 4, 8], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 128]]);
    assert!(!heuristic.breakdown(&mergeable).game_over);
}

#[test]
fn test_score_term_is_off_by_default() {
    let config = Config::default_hardcoded();
    let evaluator = build_evaluator(&config.heuristic);
    let start = board(&[[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);

    assert_eq!(evaluator.evaluate(&start, 0), evaluator.evaluate(&start, 10_000));
    assert!(!evaluator.uses_score());

    let mut weights = empty_cells_only();
    weights.score = 1.0;
    let scored = WeightedHeuristic::new(weights, 1_000_000.0);
    assert!(scored.evaluate(&start, 10_000) > scored.evaluate(&start, 0));
    assert!(scored.uses_score());
}

#[test]
fn test_smoothness_penalises_log_gaps() {
    let pair = board(&[[2, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    assert_eq!(smoothness(&pair), -1.0);

    let gap = board(&[[2, 32, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    assert_eq!(smoothness(&gap), -4.0);
}

#[test]
fn test_monotonicity_rewards_ordered_rows() {
    let ordered = board(&[[2, 4, 8, 16], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    assert_eq!(monotonicity(&ordered), 0.0);

    // 2 → 8 rises by 2, 8 → 4 falls by 1; the smaller penalty wins
    let zigzag = board(&[[2, 8, 4, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    assert_eq!(monotonicity(&zigzag), -1.0);
}

#[test]
fn test_snake_and_corner() {
    let snake = board(&[[16, 8, 4, 2], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    assert_eq!(snake_pattern(&snake), 9.0);
    assert_eq!(corner_bonus(&snake), 4.0);

    let centred = board(&[[0, 0, 0, 0], [0, 16, 0, 0], [0, 0, 0, 0], [0, 0, 0, 2]]);
    assert_eq!(corner_bonus(&centred), 0.0);
}

#[test]
fn test_positional_factors() {
    assert!((position_weight(0, 0, 4) - 8.0).abs() < 1e-9);
    assert!((position_weight(1, 1, 4) - 3.0f64.powf(1.5)).abs() < 1e-9);

    let corner = board(&[[64, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 2]]);
    assert_eq!(max_tile_position(&corner), 128.0);

    let edge = board(&[[0, 64, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 2]]);
    assert_eq!(max_tile_position(&edge), 64.0);

    let zigzag = board(&[[2, 8, 4, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    assert_eq!(line_monotonicity(&zigzag), -2.0);
}

#[test]
fn test_positional_prefers_big_tile_in_corner() {
    let config = Config::default_hardcoded();
    let heuristic = PositionalHeuristic::new(config.heuristic.positional.clone(), 1_000_000.0);

    let corner = board(&[[64, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    let centre = board(&[[0, 2, 0, 0], [0, 64, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);

    assert!(heuristic.evaluate_board(&corner) > heuristic.evaluate_board(&centre));
}
