// JSONL decision log
//
// One line per HTTP decision: the board and score that were searched plus the
// decision sent back. Writes happen on a spawned tokio task so the response
// never waits on disk. The file is truncated when the server starts.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::board::Board;
use crate::types::MoveDecision;

/// One logged decision, also the unit the replay engine reads back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugLogEntry {
    pub board: Board,
    pub score: u64,
    pub decision: MoveDecision,
    /// RFC 3339, UTC
    pub timestamp: String,
}

/// Cloneable handle to the log file; `None` when logging is off
#[derive(Clone)]
pub struct DebugLogger {
    sink: Option<Arc<Mutex<File>>>,
}

impl DebugLogger {
    /// Opens the log when `enabled`; an unwritable path disables logging instead of failing startup
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match DebugLogger::open(log_file_path).await {
            Ok(logger) => {
                info!("Decision log: {}", log_file_path);
                logger
            }
            Err(e) => {
                error!("{}", e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates (or truncates) the file at `path`
    pub async fn open(path: &str) -> Result<Self, String> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await
            .map_err(|e| format!("Cannot open decision log '{}': {}", path, e))?;

        Ok(DebugLogger {
            sink: Some(Arc::new(Mutex::new(file))),
        })
    }

    pub fn disabled() -> Self {
        DebugLogger { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Queues one decision for writing and returns immediately
    pub fn log_decision(&self, board: Board, score: u64, decision: MoveDecision) {
        let sink = match &self.sink {
            Some(sink) => Arc::clone(sink),
            None => return,
        };

        let entry = DebugLogEntry {
            board,
            score,
            decision,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        tokio::spawn(async move {
            if let Err(e) = append(&sink, &entry).await {
                error!("Decision log write failed: {}", e);
            }
        });
    }
}

async fn append(sink: &Mutex<File>, entry: &DebugLogEntry) -> Result<(), String> {
    let mut line = serde_json::to_vec(entry).map_err(|e| e.to_string())?;
    line.push(b'\n');

    let mut file = sink.lock().await;
    file.write_all(&line).await.map_err(|e| e.to_string())?;
    file.flush().await.map_err(|e| e.to_string())
}
