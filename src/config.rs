use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::Topology;

const APP_DIR_NAME: &str = "tile-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default board width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 20;

/// Default board height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 15;

/// Smallest accepted board edge.
pub const MIN_GRID_EDGE: u16 = 5;

/// Segments the snake starts with.
pub const DEFAULT_INITIAL_LENGTH: usize = 4;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Tick interval reduction per point scored.
pub const DEFAULT_TICK_STEP_MS: u64 = 5;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Time after a game over during which restart inputs are ignored.
pub const DEFAULT_RESTART_GRACE_MS: u64 = 500;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Tunables for one game session, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridSize,
    pub topology: Topology,
    pub initial_length: usize,
    pub base_tick_ms: u64,
    pub tick_step_ms: u64,
    pub min_tick_ms: u64,
    pub restart_grace_ms: u64,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: DEFAULT_GRID_WIDTH,
                height: DEFAULT_GRID_HEIGHT,
            },
            topology: Topology::Walled,
            initial_length: DEFAULT_INITIAL_LENGTH,
            base_tick_ms: DEFAULT_TICK_INTERVAL_MS,
            tick_step_ms: DEFAULT_TICK_STEP_MS,
            min_tick_ms: MIN_TICK_INTERVAL_MS,
            restart_grace_ms: DEFAULT_RESTART_GRACE_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Open-field configuration of the given size, mostly for tests.
    #[must_use]
    pub fn open(width: u16, height: u16) -> Self {
        Self {
            grid: GridSize { width, height },
            topology: Topology::Open,
            ..Self::default()
        }
    }

    /// Loads a config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rejects configurations the simulation cannot start from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width < MIN_GRID_EDGE || self.grid.height < MIN_GRID_EDGE {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} is smaller than {MIN_GRID_EDGE}x{MIN_GRID_EDGE}",
                self.grid.width, self.grid.height
            )));
        }

        if self.initial_length == 0 {
            return Err(ConfigError::Invalid(
                "initial length must be at least 1".to_owned(),
            ));
        }

        // The snake spawns at the centre heading right, so its body extends left.
        let border = usize::from(self.topology == Topology::Walled);
        let room_behind_head = usize::from(self.grid.width / 2) + 1 - border;
        if self.initial_length > room_behind_head {
            return Err(ConfigError::Invalid(format!(
                "initial length {} does not fit on a {}-wide grid",
                self.initial_length, self.grid.width
            )));
        }

        if self.min_tick_ms == 0 || self.min_tick_ms > self.base_tick_ms {
            return Err(ConfigError::Invalid(format!(
                "min tick {} ms must be within 1..={} ms",
                self.min_tick_ms, self.base_tick_ms
            )));
        }

        Ok(())
    }

    #[must_use]
    pub fn restart_grace(&self) -> Duration {
        Duration::from_millis(self.restart_grace_ms)
    }
}

/// Returns the platform-correct default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Returns the platform-correct default log file path.
#[must_use]
pub fn log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push("tile-snake.log");
    base
}
