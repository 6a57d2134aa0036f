//! Move Selector Tests
//!
//! End-to-end decisions through Bot: difficulty resolution, name fallbacks,
//! game-over handling and the JSON request/response shapes served on /move.

use fancy_2048_ai::board::Board;
use fancy_2048_ai::bot::Bot;
use fancy_2048_ai::config::Config;
use fancy_2048_ai::types::{Algorithm, Difficulty, Direction, MoveRequest};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

fn bot() -> Bot {
    Bot::new(Config::default_hardcoded())
}

fn checkerboard_rows() -> Vec<Vec<u32>> {
    vec![
        vec![2, 4, 2, 4],
        vec![4, 2, 4, 2],
        vec![2, 4, 2, 4],
        vec![4, 2, 4, 2],
    ]
}

fn opening_rows() -> Vec<Vec<u32>> {
    vec![
        vec![2, 2, 0, 0],
        vec![0, 0, 0, 0],
        vec![0, 0, 0, 0],
        vec![0, 0, 0, 0],
    ]
}

#[test]
fn test_game_over_returns_no_move_for_every_combination() {
    let bot = bot();
    let board = Board::from_rows(&checkerboard_rows()).unwrap();

    for algorithm in Algorithm::all() {
        for difficulty in Difficulty::all() {
            let decision = bot.get_best_move(&board, 128, algorithm, difficulty);
            assert_eq!(
                decision.direction,
                None,
                "{} / {} returned a move",
                algorithm.as_str(),
                difficulty.as_str()
            );
            assert_eq!(decision.nodes_evaluated, 0);
            assert_eq!(decision.evaluation, None);
        }
    }
}

#[test]
fn test_difficulty_sets_search_depth() {
    let bot = bot();
    let board = Board::from_rows(&checkerboard_rows()).unwrap();

    let depths: Vec<u32> = Difficulty::all()
        .iter()
        .map(|&d| bot.get_best_move(&board, 0, Algorithm::Expectimax, d).depth)
        .collect();
    assert_eq!(depths, vec![3, 4, 5, 6]);
}

#[test]
fn test_seeded_decisions_are_reproducible() {
    let mut config = Config::default_hardcoded();
    config.timing.time_budget_ms = 60_000;
    let bot = Bot::new(config);
    let board = Board::from_rows(&opening_rows()).unwrap();

    let mut first_rng = StdRng::seed_from_u64(17);
    let mut second_rng = StdRng::seed_from_u64(17);
    let first = bot.get_best_move_with_rng(
        &board,
        0,
        Algorithm::MonteCarlo,
        Difficulty::Easy,
        &mut first_rng,
    );
    let second = bot.get_best_move_with_rng(
        &board,
        0,
        Algorithm::MonteCarlo,
        Difficulty::Easy,
        &mut second_rng,
    );

    assert_eq!(first.direction, second.direction);
    assert_eq!(first.nodes_evaluated, second.nodes_evaluated);
    assert_eq!(first.evaluation, second.evaluation);
}

#[test]
fn test_unknown_names_fall_back() {
    assert_eq!(
        Algorithm::parse_or(Some("quantum"), Algorithm::Expectimax),
        Algorithm::Expectimax
    );
    assert_eq!(
        Difficulty::parse_or(Some("impossible"), Difficulty::Expert),
        Difficulty::Expert
    );
    assert_eq!(
        Algorithm::parse_or(Some("mcts"), Algorithm::Expectimax),
        Algorithm::MonteCarlo
    );
    assert_eq!(
        Difficulty::parse_or(Some("medium"), Difficulty::Expert),
        Difficulty::Medium
    );
    assert_eq!(
        Algorithm::parse_or(None, Algorithm::AlphaBeta),
        Algorithm::AlphaBeta
    );
}

#[tokio::test]
async fn test_get_move_returns_legal_move() {
    let bot = bot();
    let request: MoveRequest = serde_json::from_value(json!({
        "board": opening_rows(),
        "score": 0,
        "size": 4,
        "algorithm": "alpha_beta",
        "difficulty": "easy"
    }))
    .unwrap();

    let decision = bot.get_move(request).await.unwrap();
    let direction = decision.direction.unwrap();

    let board = Board::from_rows(&opening_rows()).unwrap();
    assert!(board.apply(direction).changed);
    assert_eq!(decision.algorithm, Algorithm::AlphaBeta);
    assert_eq!(decision.difficulty, Difficulty::Easy);
    assert_eq!(decision.depth, 3);
    assert!(decision.nodes_evaluated > 0);

    let body = serde_json::to_value(&decision).unwrap();
    assert_eq!(body["move"], json!(direction.as_str()));
    assert_eq!(body["algorithm"], json!("alpha_beta"));
    assert_eq!(body["difficulty"], json!("easy"));
}

#[tokio::test]
async fn test_get_move_falls_back_to_configured_defaults() {
    let bot = bot();
    let request: MoveRequest = serde_json::from_value(json!({
        "board": opening_rows(),
        "algorithm": "quantum",
        "difficulty": "impossible"
    }))
    .unwrap();

    let decision = bot.get_move(request).await.unwrap();
    assert_eq!(decision.algorithm, Algorithm::Expectimax);
    assert_eq!(decision.difficulty, Difficulty::Expert);
    assert_eq!(decision.depth, 6);
    assert!(decision.direction.is_some());
}

#[tokio::test]
async fn test_get_move_reports_game_over_as_null() {
    let bot = bot();
    let request: MoveRequest = serde_json::from_value(json!({
        "board": checkerboard_rows(),
        "score": 256
    }))
    .unwrap();

    let decision = bot.get_move(request).await.unwrap();
    assert_eq!(decision.direction, None);

    let body = serde_json::to_value(&decision).unwrap();
    assert!(body["move"].is_null());
}

#[tokio::test]
async fn test_get_move_rejects_malformed_boards() {
    let bot = bot();

    let ragged: MoveRequest = serde_json::from_value(json!({
        "board": [[2, 0, 0], [0, 0], [0, 0, 0]]
    }))
    .unwrap();
    assert!(bot.get_move(ragged).await.is_err());

    let wrong_size: MoveRequest = serde_json::from_value(json!({
        "board": opening_rows(),
        "size": 5
    }))
    .unwrap();
    assert!(bot.get_move(wrong_size).await.is_err());
}

#[test]
fn test_info_lists_algorithms() {
    let info = bot().info();

    assert_eq!(info["name"], json!("fancy-2048-ai"));
    assert_eq!(info["algorithms"].as_array().unwrap().len(), 5);
    assert_eq!(info["default_algorithm"], json!("expectimax"));
    assert_eq!(info["default_difficulty"], json!("expert"));
}

#[test]
fn test_direction_parsing() {
    assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
    assert_eq!(" left ".trim().parse::<Direction>().unwrap(), Direction::Left);
    assert!("north".parse::<Direction>().is_err());
}
