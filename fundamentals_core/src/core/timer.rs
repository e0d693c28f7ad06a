//! Periodic timer checked from a node's `tick()`
//!
//! A timer does not run anything on its own. The owning node asks
//! [`Timer::fire`] on each tick whether a period has elapsed, which keeps the
//! callback on the scheduler thread and lets tests fire it deterministically.

use crate::error::{CoreError, CoreResult};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Timer {
    period: Duration,
    last_fire: Instant,
    fire_count: u64,
    cancelled: bool,
}

impl Timer {
    /// Arm a timer whose first firing is one period from now
    pub fn new(period: Duration) -> CoreResult<Self> {
        Self::new_at(period, Instant::now())
    }

    /// Arm a timer relative to an explicit start instant
    pub fn new_at(period: Duration, start: Instant) -> CoreResult<Self> {
        if period.is_zero() {
            return Err(CoreError::invalid_input("Timer period must be non-zero"));
        }
        Ok(Self {
            period,
            last_fire: start,
            fire_count: 0,
            cancelled: false,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn fire_count(&self) -> u64 {
        self.fire_count
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// True when at least one period has elapsed since the last firing
    pub fn is_ready(&self, now: Instant) -> bool {
        !self.cancelled && now.saturating_duration_since(self.last_fire) >= self.period
    }

    /// Consume one firing if the timer is due
    ///
    /// The next deadline advances by whole periods. A timer that fell more
    /// than one period behind realigns to `now` instead of firing a burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.is_ready(now) {
            return false;
        }

        let next = self.last_fire + self.period;
        self.last_fire = if now.saturating_duration_since(next) >= self.period {
            now
        } else {
            next
        };
        self.fire_count += 1;
        true
    }

    /// Time left before the next firing, zero when due
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        if self.cancelled {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.last_fire);
        Some(self.period.saturating_sub(elapsed))
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Re-arm from now, clearing a cancellation
    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, now: Instant) {
        self.last_fire = now;
        self.cancelled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(500);

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(
            Timer::new(Duration::ZERO),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_not_ready_before_period() {
        let start = Instant::now();
        let mut timer = Timer::new_at(PERIOD, start).unwrap();
        assert!(!timer.is_ready(start));
        assert!(!timer.fire(start + Duration::from_millis(499)));
        assert_eq!(timer.fire_count(), 0);
    }

    #[test]
    fn test_fires_once_per_period() {
        let start = Instant::now();
        let mut timer = Timer::new_at(PERIOD, start).unwrap();

        assert!(timer.fire(start + PERIOD));
        assert!(!timer.fire(start + PERIOD));
        assert!(timer.fire(start + PERIOD * 2));
        assert_eq!(timer.fire_count(), 2);
    }

    #[test]
    fn test_late_timer_realigns_instead_of_bursting() {
        let start = Instant::now();
        let mut timer = Timer::new_at(PERIOD, start).unwrap();

        let late = start + PERIOD * 5;
        assert!(timer.fire(late));
        assert!(!timer.fire(late));
        assert!(timer.fire(late + PERIOD));
        assert_eq!(timer.fire_count(), 2);
    }

    #[test]
    fn test_cancel_and_reset() {
        let start = Instant::now();
        let mut timer = Timer::new_at(PERIOD, start).unwrap();

        timer.cancel();
        assert!(!timer.fire(start + PERIOD * 2));
        assert_eq!(timer.time_until_next(start), None);

        let later = start + PERIOD * 3;
        timer.reset_at(later);
        assert!(!timer.is_cancelled());
        assert!(!timer.is_ready(later));
        assert!(timer.fire(later + PERIOD));
    }

    #[test]
    fn test_time_until_next() {
        let start = Instant::now();
        let timer = Timer::new_at(PERIOD, start).unwrap();
        assert_eq!(
            timer.time_until_next(start + Duration::from_millis(200)),
            Some(Duration::from_millis(300))
        );
        assert_eq!(timer.time_until_next(start + PERIOD * 2), Some(Duration::ZERO));
    }
}
