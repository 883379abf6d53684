//! Fixed-rate scheduling discipline for the simulation loop: ticks are
//! pinned to `start_time + n * interval` rather than chained
//! sleep-then-run, so a slow tick doesn't permanently drift the schedule.
//! Up to `MAX_CATCHUP_TICKS` owed ticks are run back-to-back; anything
//! further behind is dropped and the schedule resyncs to now.

use crate::constants::{MAX_CATCHUP_TICKS, MAX_CONSEC_SLOW, SLOW_TICK_MS, TICK_INTERVAL_MS};
use std::time::{Duration, Instant};

pub struct TickLoop {
    start: Instant,
    interval: Duration,
    next_tick: u64,
    consecutive_slow: u32,
}

impl TickLoop {
    pub fn new() -> Self {
        Self::with_start(Instant::now())
    }

    pub fn with_start(start: Instant) -> Self {
        Self {
            start,
            interval: Duration::from_millis(TICK_INTERVAL_MS),
            next_tick: 0,
            consecutive_slow: 0,
        }
    }

    /// Block until the next scheduled tick boundary, then return how many
    /// simulation ticks this call should run (always at least 1, capped
    /// at `MAX_CATCHUP_TICKS`). Any backlog beyond the cap is dropped and
    /// the schedule resyncs to the current time.
    pub fn wait_for_next(&mut self) -> u32 {
        let target = self.start + self.interval * self.next_tick as u32;
        let now = Instant::now();
        if now < target {
            std::thread::sleep(target - now);
        }

        let now = Instant::now();
        let elapsed_ticks = (now.duration_since(self.start).as_secs_f64()
            / (self.interval.as_secs_f64()))
        .floor() as u64;

        let owed = owed_ticks(self.next_tick, elapsed_ticks);
        let ticks_to_run = owed.min(MAX_CATCHUP_TICKS as u64) as u32;
        self.next_tick = elapsed_ticks + 1;
        ticks_to_run
    }

    /// Record how long a tick's phases actually took to run. Returns
    /// `true` once `MAX_CONSEC_SLOW` consecutive ticks have overrun
    /// `SLOW_TICK_MS`, signaling the room should log a health warning.
    pub fn record_processing_time(&mut self, elapsed: Duration) -> bool {
        if elapsed.as_millis() as u64 > SLOW_TICK_MS {
            self.consecutive_slow += 1;
        } else {
            self.consecutive_slow = 0;
        }
        self.consecutive_slow >= MAX_CONSEC_SLOW
    }
}

impl Default for TickLoop {
    fn default() -> Self {
        Self::new()
    }
}

fn owed_ticks(next_tick: u64, elapsed_ticks: u64) -> u64 {
    elapsed_ticks.saturating_sub(next_tick) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owed_ticks_is_one_when_on_schedule() {
        assert_eq!(owed_ticks(0, 0), 1);
        assert_eq!(owed_ticks(10, 10), 1);
    }

    #[test]
    fn owed_ticks_grows_with_backlog() {
        assert_eq!(owed_ticks(0, 5), 6);
    }

    #[test]
    fn first_call_on_time_runs_exactly_one_tick() {
        let mut loop_ = TickLoop::with_start(Instant::now());
        assert_eq!(loop_.wait_for_next(), 1);
    }

    #[test]
    fn large_backlog_is_capped_and_schedule_resyncs() {
        let interval = Duration::from_millis(TICK_INTERVAL_MS);
        let start = Instant::now() - interval * 5;
        let mut loop_ = TickLoop::with_start(start);
        let ticks = loop_.wait_for_next();
        assert_eq!(ticks, crate::constants::MAX_CATCHUP_TICKS);
        assert!(loop_.next_tick >= 6);
    }

    #[test]
    fn consecutive_slow_ticks_trip_the_health_check() {
        let mut loop_ = TickLoop::new();
        let slow = Duration::from_millis(SLOW_TICK_MS + 5);
        let mut tripped = false;
        for _ in 0..MAX_CONSEC_SLOW {
            tripped = loop_.record_processing_time(slow);
        }
        assert!(tripped);
    }

    #[test]
    fn a_fast_tick_resets_the_slow_streak() {
        let mut loop_ = TickLoop::new();
        let slow = Duration::from_millis(SLOW_TICK_MS + 5);
        for _ in 0..(MAX_CONSEC_SLOW - 1) {
            loop_.record_processing_time(slow);
        }
        let fast = Duration::from_millis(1);
        let tripped = loop_.record_processing_time(fast);
        assert!(!tripped);
    }
}
