//! Simulated driver approach.
//!
//! While running, every firing of its timer moves the driver by a fixed delta
//! on both axes. Stopping cancels the timer and clears the location so
//! renderers drop the driver marker.

use std::{ops::Sub, time::Duration};

use crate::{location::Location, timer::PeriodicTimer};

/// Periodic driver position generator scoped to one ride.
#[derive(Debug, Clone)]
pub struct DriverPositionSimulator<I> {
    /// Current driver location. `None` while stopped.
    location: Option<Location>,
    /// Position timer. `None` while stopped.
    timer: Option<PeriodicTimer<I>>,
    /// Degrees added to latitude and longitude per firing.
    delta: f64,
}

impl<I> DriverPositionSimulator<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create a stopped simulator.
    pub fn new(delta: f64) -> Self {
        Self { location: None, timer: None, delta }
    }

    /// Place the driver at `initial` and start moving every `period`.
    pub fn start(&mut self, now: I, initial: Location, period: Duration) {
        self.location = Some(initial);
        self.timer = Some(PeriodicTimer::start(now, period));
    }

    /// Cancel the timer and clear the location.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.cancel();
        }
        self.timer = None;
        self.location = None;
    }

    /// Whether the position timer is live.
    pub fn is_running(&self) -> bool {
        self.timer.is_some_and(|timer| timer.is_active())
    }

    /// Current driver location. `None` while stopped.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Degrees moved per firing.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Offset from start of the next firing. `None` while stopped.
    pub fn next_fire_offset(&self) -> Option<Duration> {
        self.timer.and_then(|timer| timer.next_fire_offset())
    }

    /// Time from `now` until the next firing. `None` while stopped.
    pub fn time_until_next(&self, now: I) -> Option<Duration> {
        self.timer.and_then(|timer| timer.time_until_next(now))
    }

    /// Consume one firing and move the driver.
    ///
    /// Returns `false` without moving if stopped.
    pub fn step(&mut self) -> bool {
        match (self.timer.as_mut(), self.location.as_mut()) {
            (Some(timer), Some(location)) if timer.is_active() => {
                timer.fire();
                location.shift(self.delta);
                true
            },
            _ => false,
        }
    }

    /// Apply every firing due at `now`. Returns the number of moves.
    pub fn tick(&mut self, now: I) -> u32 {
        let mut moved = 0;
        while self.timer.is_some_and(|timer| timer.is_due(now)) && self.step() {
            moved += 1;
        }
        moved
    }
}
