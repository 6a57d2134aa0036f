// 2048 AI API Types
// Shared enums and the wire shapes exchanged with the HTTP layer

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the four possible slide directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all directions in the fixed order used by every search
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search algorithm selectable per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "expectimax")]
    Expectimax,
    #[serde(rename = "alpha_beta")]
    AlphaBeta,
    #[serde(rename = "monte_carlo", alias = "mcts")]
    MonteCarlo,
    #[serde(rename = "minimax")]
    Minimax,
    /// Placeholder kept for API compatibility; searches with Expectimax
    #[serde(rename = "neural")]
    NeuralHeuristic,
}

impl Algorithm {
    pub fn all() -> [Algorithm; 5] {
        [
            Algorithm::Expectimax,
            Algorithm::AlphaBeta,
            Algorithm::MonteCarlo,
            Algorithm::Minimax,
            Algorithm::NeuralHeuristic,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Expectimax => "expectimax",
            Algorithm::AlphaBeta => "alpha_beta",
            Algorithm::MonteCarlo => "monte_carlo",
            Algorithm::Minimax => "minimax",
            Algorithm::NeuralHeuristic => "neural",
        }
    }

    /// Parses an algorithm name, falling back to `default` for unknown or missing names
    pub fn parse_or(name: Option<&str>, default: Algorithm) -> Algorithm {
        match name {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, falling back to {}", e, default.as_str());
                default
            }),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expectimax" => Ok(Algorithm::Expectimax),
            "alpha_beta" | "alpha-beta" | "alphabeta" => Ok(Algorithm::AlphaBeta),
            "monte_carlo" | "mcts" => Ok(Algorithm::MonteCarlo),
            "minimax" => Ok(Algorithm::Minimax),
            "neural" => Ok(Algorithm::NeuralHeuristic),
            _ => Err(format!("Unknown algorithm: {}", s)),
        }
    }
}

/// AI difficulty; resolves to a depth, simulation budget and jitter factor via config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[serde(rename = "normal", alias = "medium")]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 4] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Expert]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    /// Parses a difficulty name, falling back to `default` for unknown or missing names
    pub fn parse_or(name: Option<&str>, default: Difficulty) -> Difficulty {
        match name {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, falling back to {}", e, default.as_str());
                default
            }),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" | "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

/// Body of POST /move
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MoveRequest {
    pub board: Vec<Vec<u32>>,
    #[serde(default)]
    pub score: u64,
    /// Board dimension; checked against `board` when present
    #[serde(default)]
    pub size: Option<usize>,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// Result of a single move decision, also the POST /move response body
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MoveDecision {
    /// `None` when no direction changes the board (game over)
    #[serde(rename = "move")]
    pub direction: Option<Direction>,
    pub nodes_evaluated: u64,
    pub computation_time_ms: f64,
    /// Search value of the chosen line, without difficulty jitter
    pub evaluation: Option<f64>,
    pub algorithm: Algorithm,
    pub difficulty: Difficulty,
    pub depth: u32,
}
