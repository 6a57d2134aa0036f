// Library exports for the 2048 AI
// This allows the HTTP server, the replay tool and the self-play runner to share the search core

pub mod board;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod heuristic;
pub mod replay;
pub mod search;
pub mod selfplay;
pub mod types;
