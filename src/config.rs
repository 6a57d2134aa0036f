// Configuration module for reading Fancy2048.toml
// All tunable search, heuristic and difficulty parameters live here

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::types::{Algorithm, Difficulty};

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub difficulty: DifficultyConfig,
    pub heuristic: HeuristicConfig,
    pub defaults: DefaultsConfig,
    pub debug: DebugConfig,
}

/// Wall-clock budget for a single move decision
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub time_budget_ms: u64,
}

impl TimingConfig {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

/// Search engine constants shared by every algorithm
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Entries a per-invocation cache may hold before it is cleared
    pub cache_capacity: usize,
    /// UCB1 exploration constant for MCTS
    pub exploration_constant: f64,
    /// Ply cap for MCTS random rollouts
    pub rollout_max_moves: u32,
    /// Probability that a spawned tile is a 2
    pub two_tile_probability: f64,
}

/// Budget for one difficulty level
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct DifficultyLevel {
    pub depth: u32,
    pub randomness: f64,
    pub mcts_simulations: u32,
}

/// Difficulty table
#[derive(Debug, Deserialize, Clone)]
pub struct DifficultyConfig {
    pub easy: DifficultyLevel,
    pub normal: DifficultyLevel,
    pub hard: DifficultyLevel,
    pub expert: DifficultyLevel,
}

impl DifficultyConfig {
    /// Gets the budget for a difficulty
    ///
    /// # Arguments
    /// * `difficulty` - Requested AI difficulty
    ///
    /// # Returns
    /// Reference to the matching DifficultyLevel
    pub fn for_difficulty(&self, difficulty: Difficulty) -> &DifficultyLevel {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.normal,
            Difficulty::Hard => &self.hard,
            Difficulty::Expert => &self.expert,
        }
    }
}

/// Which board evaluator the search uses
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicVariant {
    Weighted,
    Positional,
}

/// Heuristic selection and weights
#[derive(Debug, Deserialize, Clone)]
pub struct HeuristicConfig {
    pub variant: HeuristicVariant,
    /// Subtracted from boards where no move is possible
    pub terminal_penalty: f64,
    pub weighted: WeightedWeights,
    pub positional: PositionalWeights,
}

/// Weights of the empty/smoothness/monotonicity/snake evaluator
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WeightedWeights {
    pub empty_cells: f64,
    pub monotonicity: f64,
    pub smoothness: f64,
    pub max_tile: f64,
    pub snake: f64,
    pub corner: f64,
    /// Weight of log2(score + 1); 0 keeps the evaluation a pure function of the board
    pub score: f64,
}

/// Weights of the position-matrix evaluator
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PositionalWeights {
    pub position: f64,
    pub monotonicity: f64,
    pub smoothness: f64,
    pub empty_cells: f64,
    pub max_tile_position: f64,
}

/// Fallbacks for requests that omit or misspell their AI selection
#[derive(Debug, Deserialize, Clone)]
pub struct DefaultsConfig {
    pub algorithm: String,
    pub difficulty: String,
}

impl DefaultsConfig {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm.parse().unwrap_or(Algorithm::Expectimax)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty.parse().unwrap_or(Difficulty::Expert)
    }
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Fancy2048.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Fancy2048.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Fancy2048.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Fancy2048.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                time_budget_ms: 500,
            },
            search: SearchConfig {
                cache_capacity: 10_000,
                exploration_constant: std::f64::consts::SQRT_2,
                rollout_max_moves: 100,
                two_tile_probability: 0.9,
            },
            difficulty: DifficultyConfig {
                easy: DifficultyLevel {
                    depth: 3,
                    randomness: 0.2,
                    mcts_simulations: 500,
                },
                normal: DifficultyLevel {
                    depth: 4,
                    randomness: 0.08,
                    mcts_simulations: 500,
                },
                hard: DifficultyLevel {
                    depth: 5,
                    randomness: 0.03,
                    mcts_simulations: 500,
                },
                expert: DifficultyLevel {
                    depth: 6,
                    randomness: 0.005,
                    mcts_simulations: 1000,
                },
            },
            heuristic: HeuristicConfig {
                variant: HeuristicVariant::Weighted,
                terminal_penalty: 1_000_000.0,
                weighted: WeightedWeights {
                    empty_cells: 2.7,
                    monotonicity: 1.0,
                    smoothness: 0.1,
                    max_tile: 1.0,
                    snake: 0.25,
                    corner: 0.1,
                    score: 0.0,
                },
                positional: PositionalWeights {
                    position: 1.5,
                    monotonicity: 2.0,
                    smoothness: 0.2,
                    empty_cells: 4.0,
                    max_tile_position: 1.8,
                },
            },
            defaults: DefaultsConfig {
                algorithm: "expectimax".to_string(),
                difficulty: "expert".to_string(),
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "fancy2048_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Fancy2048.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_budget_conversion() {
        let config = Config::default_hardcoded();
        assert_eq!(config.timing.time_budget(), Duration::from_millis(500));
    }

    #[test]
    fn test_difficulty_table_maps_to_depth_budget() {
        let config = Config::default_hardcoded();
        let depths: Vec<u32> = Difficulty::all()
            .iter()
            .map(|&d| config.difficulty.for_difficulty(d).depth)
            .collect();
        assert_eq!(depths, vec![3, 4, 5, 6]);
        assert_eq!(
            config.difficulty.for_difficulty(Difficulty::Expert).mcts_simulations,
            1000
        );
        assert_eq!(
            config.difficulty.for_difficulty(Difficulty::Hard).mcts_simulations,
            500
        );
    }

    #[test]
    fn test_randomness_decreases_with_difficulty() {
        let config = Config::default_hardcoded();
        let levels: Vec<f64> = Difficulty::all()
            .iter()
            .map(|&d| config.difficulty.for_difficulty(d).randomness)
            .collect();
        assert!(levels.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(levels[0], 0.2);
        assert_eq!(levels[3], 0.005);
    }

    #[test]
    fn test_fancy2048_toml_can_be_parsed() {
        let result = Config::from_file("Fancy2048.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Fancy2048.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config =
            Config::from_file("Fancy2048.toml").expect("Fancy2048.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        assert_eq!(
            file_config.timing.time_budget_ms,
            hardcoded.timing.time_budget_ms
        );
        assert_eq!(
            file_config.search.cache_capacity,
            hardcoded.search.cache_capacity
        );
        assert!(
            (file_config.search.exploration_constant - hardcoded.search.exploration_constant)
                .abs()
                < 1e-9
        );
        assert_eq!(
            file_config.search.rollout_max_moves,
            hardcoded.search.rollout_max_moves
        );
        assert_eq!(
            file_config.search.two_tile_probability,
            hardcoded.search.two_tile_probability
        );

        for difficulty in Difficulty::all() {
            assert_eq!(
                file_config.difficulty.for_difficulty(difficulty),
                hardcoded.difficulty.for_difficulty(difficulty),
                "difficulty {} differs",
                difficulty.as_str()
            );
        }

        assert_eq!(file_config.heuristic.variant, hardcoded.heuristic.variant);
        assert_eq!(
            file_config.heuristic.terminal_penalty,
            hardcoded.heuristic.terminal_penalty
        );
        assert_eq!(file_config.heuristic.weighted, hardcoded.heuristic.weighted);
        assert_eq!(
            file_config.heuristic.positional,
            hardcoded.heuristic.positional
        );

        assert_eq!(file_config.defaults.algorithm(), Algorithm::Expectimax);
        assert_eq!(file_config.defaults.difficulty(), Difficulty::Expert);
    }

    #[test]
    fn test_unknown_default_names_fall_back() {
        let mut config = Config::default_hardcoded();
        config.defaults.algorithm = "quantum".to_string();
        config.defaults.difficulty = "impossible".to_string();
        assert_eq!(config.defaults.algorithm(), Algorithm::Expectimax);
        assert_eq!(config.defaults.difficulty(), Difficulty::Expert);
    }

    #[test]
    fn test_missing_file_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
