use std::time::{Duration, Instant};

use crate::config::GameConfig;

/// Single-deadline tick timer whose period shrinks as the score grows.
///
/// Holds at most one pending deadline; arming always replaces the previous
/// one, so a restart can never leave two tick sources running.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    base: Duration,
    step: Duration,
    floor: Duration,
    deadline: Option<Instant>,
}

impl TickScheduler {
    #[must_use]
    pub fn new(base: Duration, step: Duration, floor: Duration) -> Self {
        Self {
            base,
            step,
            floor,
            deadline: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            Duration::from_millis(config.base_tick_ms),
            Duration::from_millis(config.tick_step_ms),
            Duration::from_millis(config.min_tick_ms),
        )
    }

    /// Tick period for `score`: `base - score * step`, clamped at the floor.
    #[must_use]
    pub fn interval_for_score(&self, score: u32) -> Duration {
        self.base
            .saturating_sub(self.step.saturating_mul(score))
            .max(self.floor)
    }

    /// Cancels any pending deadline and arms a new one from `now`.
    pub fn arm(&mut self, now: Instant, score: u32) {
        self.cancel();
        self.deadline = Some(now + self.interval_for_score(score));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Remaining time before the next tick, `None` while disarmed.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns true when a tick is due, consuming the deadline.
    ///
    /// The caller re-arms after the step so the next period uses the score
    /// that step produced. Missed periods are not replayed: a late poll
    /// yields a single tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::config::GameConfig;

    use super::TickScheduler;

    fn scheduler() -> TickScheduler {
        TickScheduler::from_config(&GameConfig::default())
    }

    #[test]
    fn interval_shrinks_linearly_to_floor() {
        let scheduler = scheduler();

        assert_eq!(scheduler.interval_for_score(0), Duration::from_millis(150));
        assert_eq!(scheduler.interval_for_score(4), Duration::from_millis(130));
        assert_eq!(scheduler.interval_for_score(20), Duration::from_millis(50));
        assert_eq!(scheduler.interval_for_score(500), Duration::from_millis(50));
    }

    #[test]
    fn disarmed_scheduler_never_fires() {
        let mut scheduler = scheduler();
        let now = Instant::now();

        assert!(!scheduler.is_armed());
        assert!(!scheduler.poll(now + Duration::from_secs(10)));
        assert_eq!(scheduler.time_until_due(now), None);
    }

    #[test]
    fn fires_once_per_deadline() {
        let mut scheduler = scheduler();
        let start = Instant::now();
        scheduler.arm(start, 0);

        assert!(!scheduler.poll(start + Duration::from_millis(149)));
        let due = start + Duration::from_millis(150);
        assert!(scheduler.poll(due));
        assert!(!scheduler.poll(due));
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn late_poll_does_not_replay_missed_ticks() {
        let mut scheduler = scheduler();
        let start = Instant::now();
        scheduler.arm(start, 0);

        let late = start + Duration::from_secs(2);
        assert!(scheduler.poll(late));
        scheduler.arm(late, 0);
        assert!(!scheduler.poll(late + Duration::from_millis(1)));
        assert_eq!(
            scheduler.time_until_due(late),
            Some(Duration::from_millis(150))
        );
    }

    #[test]
    fn rearming_replaces_previous_deadline() {
        let mut scheduler = scheduler();
        let start = Instant::now();
        scheduler.arm(start, 0);
        scheduler.arm(start + Duration::from_millis(100), 0);

        assert!(!scheduler.poll(start + Duration::from_millis(150)));
        assert!(scheduler.poll(start + Duration::from_millis(250)));
    }

    #[test]
    fn arm_uses_given_score() {
        let mut scheduler = scheduler();
        let start = Instant::now();
        scheduler.arm(start, 10);

        assert_eq!(
            scheduler.time_until_due(start),
            Some(Duration::from_millis(100))
        );
    }

    #[test]
    fn cancel_disarms() {
        let mut scheduler = scheduler();
        let start = Instant::now();
        scheduler.arm(start, 0);
        scheduler.cancel();

        assert!(!scheduler.poll(start + Duration::from_secs(1)));
    }
}
