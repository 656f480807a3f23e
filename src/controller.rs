use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{GameState, GameStatus, Snapshot, StepOutcome};
use crate::input::GameInput;
use crate::scheduler::TickScheduler;

/// Sole writer of the game: routes input, drives ticks, publishes snapshots.
#[derive(Debug)]
pub struct GameController {
    state: GameState,
    scheduler: TickScheduler,
    restart_grace: Duration,
    ended_at: Option<Instant>,
    snapshot: Snapshot,
}

impl GameController {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::from_state(GameState::new(config))
    }

    /// Wraps an existing state, e.g. one built with a fixed seed.
    #[must_use]
    pub fn from_state(state: GameState) -> Self {
        let scheduler = TickScheduler::from_config(state.config());
        let restart_grace = state.config().restart_grace();
        let snapshot = state.snapshot();

        Self {
            state,
            scheduler,
            restart_grace,
            ended_at: None,
            snapshot,
        }
    }

    /// Starts a fresh session and arms the tick timer.
    pub fn start_game(&mut self, now: Instant) -> Result<(), GameError> {
        self.scheduler.cancel();
        self.ended_at = None;

        let started = self.state.start_game();
        if let Err(error) = started {
            log::error!("could not start game: {error}");
            self.ended_at = Some(now);
            self.publish();
            return Err(error);
        }

        log::info!(
            "game started on {}x{} board",
            self.state.bounds().width,
            self.state.bounds().height
        );
        self.scheduler.arm(now, self.state.score);
        self.publish();
        Ok(())
    }

    /// Applies one normalized input event.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) -> Result<(), GameError> {
        if input == GameInput::Quit {
            return Ok(());
        }

        match self.state.status {
            GameStatus::NotStarted => self.start_with(input, now),
            GameStatus::Running => {
                match input {
                    GameInput::Direction(direction) => self.state.change_direction(direction),
                    GameInput::Turn => self.state.turn_clockwise(),
                    GameInput::Confirm | GameInput::Quit => {}
                }
                Ok(())
            }
            GameStatus::GameOver => {
                if self.can_restart(now) {
                    self.start_with(input, now)
                } else {
                    log::debug!("ignoring {input:?} during restart grace period");
                    Ok(())
                }
            }
        }
    }

    /// Runs at most one simulation step if the timer is due.
    ///
    /// Returns whether a step ran. The published snapshot only changes here
    /// and in [`start_game`](Self::start_game), after the mutation completes.
    pub fn update(&mut self, now: Instant) -> Result<bool, GameError> {
        if !self.scheduler.poll(now) {
            return Ok(false);
        }

        let outcome = self.state.tick();
        match outcome {
            // Armed after the step so a fresh score already sets the pace.
            Ok(StepOutcome::Moved) => self.scheduler.arm(now, self.state.score),
            Ok(StepOutcome::AteFood) => {
                log::debug!("food eaten, score {}", self.state.score);
                self.scheduler.arm(now, self.state.score);
            }
            Ok(StepOutcome::Idle) => {}
            Ok(StepOutcome::Collided(reason)) => {
                log::info!(
                    "game over: {reason:?} with score {} after {} ticks",
                    self.state.score,
                    self.state.tick_count
                );
                self.finish(now);
            }
            Err(ref error) => {
                log::error!("session halted: {error}");
                self.finish(now);
            }
        }

        self.publish();
        outcome.map(|_| true)
    }

    /// Latest completed state.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Time until the next scheduled step, `None` when no step is pending.
    #[must_use]
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_due(now)
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Starts a session; a direction input also sets the first heading.
    fn start_with(&mut self, input: GameInput, now: Instant) -> Result<(), GameError> {
        self.start_game(now)?;
        if let GameInput::Direction(direction) = input {
            self.state.change_direction(direction);
        }
        Ok(())
    }

    fn can_restart(&self, now: Instant) -> bool {
        self.ended_at
            .is_none_or(|ended_at| now.saturating_duration_since(ended_at) >= self.restart_grace)
    }

    fn finish(&mut self, now: Instant) {
        self.scheduler.cancel();
        self.ended_at = Some(now);
    }

    fn publish(&mut self) {
        self.snapshot = self.state.snapshot();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::config::GameConfig;
    use crate::error::GameError;
    use crate::game::{GameState, GameStatus};
    use crate::grid::{Grid, Topology};
    use crate::input::{Direction, GameInput};
    use crate::snake::{Position, Snake};

    use super::GameController;

    const TICK: Duration = Duration::from_millis(150);

    fn controller() -> GameController {
        GameController::from_state(GameState::new_with_seed(GameConfig::open(10, 10), 21))
    }

    /// Starts the game and steers it into the right-hand edge.
    fn crash(controller: &mut GameController, start: Instant) -> Instant {
        controller.start_game(start).expect("start");
        controller.state.snake = Snake::new(Position::new(9, 5), Direction::Right, 1);
        controller.state.grid.clear_food();

        let crash_at = start + TICK;
        assert!(controller.update(crash_at).expect("tick"));
        assert!(controller.snapshot().is_game_over());
        crash_at
    }

    #[test]
    fn any_input_starts_from_not_started() {
        let mut controller = controller();
        let now = Instant::now();
        assert!(!controller.snapshot().has_started());
        assert!(!controller.is_ticking());

        controller
            .handle_input(GameInput::Direction(Direction::Up), now)
            .expect("start");

        assert_eq!(controller.snapshot().status, GameStatus::Running);
        assert!(controller.is_ticking());
    }

    #[test]
    fn quit_never_starts() {
        let mut controller = controller();
        controller
            .handle_input(GameInput::Quit, Instant::now())
            .expect("quit is a no-op");

        assert!(!controller.snapshot().has_started());
    }

    #[test]
    fn steps_only_when_due() {
        let mut controller = controller();
        let start = Instant::now();
        controller.start_game(start).expect("start");
        let head = controller.snapshot().segments[0];

        assert!(!controller.update(start + TICK / 2).expect("not due"));
        assert_eq!(controller.snapshot().segments[0], head);

        assert!(controller.update(start + TICK).expect("due"));
        assert_eq!(controller.snapshot().segments[0], Position::new(head.x + 1, head.y));
    }

    #[test]
    fn direction_input_applies_on_next_step() {
        let mut controller = controller();
        let start = Instant::now();
        controller.start_game(start).expect("start");
        let head = controller.snapshot().segments[0];

        controller
            .handle_input(GameInput::Direction(Direction::Down), start)
            .expect("input");
        assert_eq!(controller.snapshot().segments[0], head);

        controller.update(start + TICK).expect("tick");
        assert_eq!(controller.snapshot().segments[0], Position::new(head.x, head.y + 1));
    }

    #[test]
    fn game_over_stops_the_timer() {
        let mut controller = controller();
        let crash_at = crash(&mut controller, Instant::now());

        assert!(!controller.is_ticking());
        assert!(!controller.update(crash_at + TICK * 10).expect("no tick"));
    }

    #[test]
    fn restart_waits_for_grace_period() {
        let mut controller = controller();
        let crash_at = crash(&mut controller, Instant::now());

        controller
            .handle_input(GameInput::Confirm, crash_at + Duration::from_millis(100))
            .expect("ignored");
        assert!(controller.snapshot().is_game_over());

        controller
            .handle_input(GameInput::Turn, crash_at + Duration::from_millis(500))
            .expect("restart");
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, GameStatus::Running);
        assert_eq!(snapshot.score, 0);
        assert!(controller.is_ticking());
    }

    #[test]
    fn restart_rearms_a_single_timer() {
        let mut controller = controller();
        let crash_at = crash(&mut controller, Instant::now());
        let restart_at = crash_at + Duration::from_secs(1);

        controller
            .handle_input(GameInput::Confirm, restart_at)
            .expect("restart");

        assert_eq!(controller.time_until_tick(restart_at), Some(TICK));
        assert!(controller.update(restart_at + TICK).expect("tick"));
        assert!(!controller.update(restart_at + TICK).expect("only one tick"));
    }

    #[test]
    fn eating_shortens_the_next_tick() {
        let mut controller = controller();
        let start = Instant::now();
        controller.start_game(start).expect("start");
        controller.state.snake = Snake::new(Position::new(3, 2), Direction::Right, 1);
        controller.state.grid.clear_food();
        controller
            .state
            .grid
            .set_food(Position::new(4, 2))
            .expect("empty tile");

        let ate_at = start + TICK;
        assert!(controller.update(ate_at).expect("tick"));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.score, 1);
        assert_eq!(snapshot.tick_interval, Duration::from_millis(145));
        assert_eq!(
            controller.time_until_tick(ate_at),
            Some(Duration::from_millis(145))
        );
    }

    #[test]
    fn direction_key_from_not_started_sets_first_heading() {
        let mut controller = controller();
        let start = Instant::now();
        controller
            .handle_input(GameInput::Direction(Direction::Up), start)
            .expect("start");
        let head = controller.snapshot().segments[0];

        controller.update(start + TICK).expect("tick");

        assert_eq!(controller.snapshot().segments[0], Position::new(head.x, head.y - 1));
    }

    #[test]
    fn full_board_halts_and_waits_for_grace() {
        let config = GameConfig {
            topology: Topology::Walled,
            ..GameConfig::open(5, 5)
        };
        let mut controller = GameController::from_state(GameState::new_with_seed(config, 14));
        let start = Instant::now();
        controller.start_game(start).expect("start");

        // Every interior tile but (3,3) is snake, and the tail holds still.
        controller.state.grid = Grid::generate(controller.state.bounds(), Topology::Walled);
        controller.state.snake = Snake::from_segments(
            vec![
                Position::new(3, 2),
                Position::new(3, 1),
                Position::new(2, 1),
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(2, 2),
                Position::new(2, 3),
                Position::new(1, 3),
            ],
            Direction::Down,
        );
        controller.state.snake.grow();
        controller
            .state
            .grid
            .set_food(Position::new(3, 3))
            .expect("empty tile");

        let halted_at = start + TICK;
        let error = controller.update(halted_at).expect_err("no room for food");

        assert!(!controller.is_ticking());
        let snapshot = controller.snapshot();
        assert!(snapshot.is_game_over());
        assert_eq!(snapshot.death_reason, None);
        assert_eq!(snapshot.fault, Some(error));

        controller
            .handle_input(GameInput::Confirm, halted_at + Duration::from_millis(100))
            .expect("ignored");
        assert!(controller.snapshot().is_game_over());

        controller
            .handle_input(GameInput::Confirm, halted_at + Duration::from_millis(500))
            .expect("restart");
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, GameStatus::Running);
        assert_eq!(snapshot.fault, None);
        assert!(controller.is_ticking());
    }

    #[test]
    fn failed_start_leaves_timer_disarmed() {
        let config = GameConfig {
            initial_length: 1,
            ..GameConfig::open(1, 1)
        };
        let mut controller = GameController::from_state(GameState::new_with_seed(config, 3));

        let result = controller.handle_input(GameInput::Confirm, Instant::now());

        assert!(matches!(result, Err(GameError::NoFreeTile { .. })));
        assert!(!controller.is_ticking());
        assert!(controller.snapshot().is_game_over());
        assert!(controller.snapshot().fault.is_some());
    }
}
