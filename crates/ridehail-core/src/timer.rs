//! Fixed-period timers over an abstract clock.
//!
//! A [`PeriodicTimer`] never schedules anything itself. It remembers when it
//! was started and how many firings have been consumed, and answers "which
//! firings are due at `now`". The owner consumes firings one at a time so it
//! can interleave several timers on one timeline.
//!
//! Firing `n` (1-based) happens at `started + n * period`.

use std::{ops::Sub, time::Duration};

/// Shortest accepted period. Shorter periods are clamped to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A cancellable fixed-period timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTimer<I> {
    /// Instant the timer was started.
    started: I,
    /// Interval between firings.
    period: Duration,
    /// Firings consumed so far.
    fired: u32,
    /// `false` once cancelled.
    active: bool,
}

impl<I> PeriodicTimer<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Start a timer whose first firing is one `period` after `now`.
    pub fn start(now: I, period: Duration) -> Self {
        Self { started: now, period: period.max(MIN_PERIOD), fired: 0, active: true }
    }

    /// Interval between firings.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of firings consumed so far.
    pub fn fired(&self) -> u32 {
        self.fired
    }

    /// Whether the timer can still fire.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop the timer. A cancelled timer never reports firings again.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Offset from the start instant of the next unconsumed firing.
    ///
    /// `None` once cancelled.
    pub fn next_fire_offset(&self) -> Option<Duration> {
        self.active.then(|| self.period.saturating_mul(self.fired.saturating_add(1)))
    }

    /// Time elapsed since the timer started. Zero if `now` precedes the start.
    pub fn elapsed(&self, now: I) -> Duration {
        if now < self.started { Duration::ZERO } else { now - self.started }
    }

    /// Whether the next firing is due at `now`.
    pub fn is_due(&self, now: I) -> bool {
        self.next_fire_offset().is_some_and(|offset| offset <= self.elapsed(now))
    }

    /// Number of unconsumed firings due at `now`.
    pub fn due(&self, now: I) -> u32 {
        if !self.active {
            return 0;
        }

        let total = self.elapsed(now).as_nanos() / self.period.as_nanos();
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        total.saturating_sub(self.fired)
    }

    /// Time from `now` until the next firing. Zero if one is already due.
    pub fn time_until_next(&self, now: I) -> Option<Duration> {
        self.next_fire_offset().map(|offset| offset.saturating_sub(self.elapsed(now)))
    }

    /// Consume the next firing.
    pub fn fire(&mut self) {
        debug_assert!(self.active, "cancelled timer fired");
        self.fired = self.fired.saturating_add(1);
    }
}
