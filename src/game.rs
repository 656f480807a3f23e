use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{GameConfig, GridSize};
use crate::error::GameError;
use crate::grid::{Grid, Tile};
use crate::input::Direction;
use crate::scheduler::TickScheduler;
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    NotStarted,
    Running,
    GameOver,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// What a single call to [`GameState::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepOutcome {
    /// Not running; nothing changed.
    Idle,
    Moved,
    AteFood,
    Collided(DeathReason),
}

/// Read-only copy of the game published after each completed step.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub grid: Grid,
    pub segments: Vec<Position>,
    pub direction: Direction,
    pub score: u32,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    pub fault: Option<GameError>,
    pub tick_count: u64,
    /// Step period that applies at the current score.
    pub tick_interval: Duration,
}

impl Snapshot {
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    #[must_use]
    pub fn has_started(&self) -> bool {
        self.status != GameStatus::NotStarted
    }

    #[must_use]
    pub fn food(&self) -> Option<Position> {
        self.grid.food()
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.grid.size()
    }
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub score: u32,
    pub tick_count: u64,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    pub fault: Option<GameError>,
    config: GameConfig,
    rng: StdRng,
}

impl GameState {
    /// Creates a not-yet-started session; the seed comes from `config` or entropy.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let grid = Grid::generate(config.grid, config.topology);
        let snake = spawn_snake(&config);

        Self {
            grid,
            snake,
            score: 0,
            tick_count: 0,
            status: GameStatus::NotStarted,
            death_reason: None,
            fault: None,
            config,
            rng,
        }
    }

    /// Resets to a fresh running session with score 0 and one food tile.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        self.grid = Grid::generate(self.config.grid, self.config.topology);
        self.snake = spawn_snake(&self.config);
        self.score = 0;
        self.tick_count = 0;
        self.death_reason = None;
        self.fault = None;

        if let Err(error) = self.grid.place_food(&mut self.rng, &self.snake) {
            return Err(self.halt(error));
        }

        self.status = GameStatus::Running;
        Ok(())
    }

    /// Buffers a direction change for the next tick; reversals are dropped.
    pub fn change_direction(&mut self, direction: Direction) {
        if self.status == GameStatus::Running {
            let _ = self.snake.buffer_direction(direction);
        }
    }

    /// Rotates the pending heading clockwise.
    pub fn turn_clockwise(&mut self) {
        if self.status == GameStatus::Running {
            let next = self.snake.latest_direction().clockwise();
            let _ = self.snake.buffer_direction(next);
        }
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> Result<StepOutcome, GameError> {
        if self.status != GameStatus::Running {
            return Ok(StepOutcome::Idle);
        }

        let candidate = self.snake.candidate_head();

        if self.grid.is_blocked(candidate) {
            return Ok(self.end(DeathReason::WallCollision));
        }

        if self.snake.collides_with(candidate) {
            return Ok(self.end(DeathReason::SelfCollision));
        }

        let ate_food = self.grid.tile(candidate) == Some(Tile::Food);
        self.snake.apply_move(candidate);
        self.tick_count += 1;

        if !ate_food {
            return Ok(StepOutcome::Moved);
        }

        self.grid.clear_food();
        self.snake.grow();
        self.score += 1;

        match self.grid.place_food(&mut self.rng, &self.snake) {
            Ok(_) => Ok(StepOutcome::AteFood),
            Err(error) => Err(self.halt(error)),
        }
    }

    /// Copies out everything the renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            segments: self.snake.segments().copied().collect(),
            direction: self.snake.direction(),
            score: self.score,
            status: self.status,
            death_reason: self.death_reason,
            fault: self.fault.clone(),
            tick_count: self.tick_count,
            tick_interval: TickScheduler::from_config(&self.config).interval_for_score(self.score),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.grid.size()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn end(&mut self, reason: DeathReason) -> StepOutcome {
        self.status = GameStatus::GameOver;
        self.death_reason = Some(reason);
        StepOutcome::Collided(reason)
    }

    fn halt(&mut self, error: GameError) -> GameError {
        self.status = GameStatus::GameOver;
        self.fault = Some(error.clone());
        error
    }
}

fn spawn_snake(config: &GameConfig) -> Snake {
    let head = Position {
        x: i32::from(config.grid.width / 2),
        y: i32::from(config.grid.height / 2),
    };
    Snake::new(head, Direction::Right, config.initial_length)
}
