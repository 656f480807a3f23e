use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Faults that end a session without being an ordinary game over.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum GameError {
    #[error("no free tile left for food on the {width}x{height} board")]
    NoFreeTile { width: u16, height: u16 },
    #[error("cannot put food on ({x}, {y}): not an empty tile")]
    FoodBlocked { x: i32, y: i32 },
}

/// Problems reading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level error for the terminal binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start logger: {0}")]
    Logger(String),
}
