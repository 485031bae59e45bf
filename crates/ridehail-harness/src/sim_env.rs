//! Virtual clock implementation of the Environment trait.
//!
//! Time only moves when a test (or a sleeping runtime) says so, which makes
//! every timer firing land on an exact, reproducible instant.

use std::{
    ops::{Add, Sub},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use ridehail_core::Environment;

/// Instant on the virtual clock, measured from the clock's creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// Instant at `offset` from the clock's creation.
    pub fn from_offset(offset: Duration) -> Self {
        Self(offset)
    }

    /// Offset from the clock's creation.
    pub fn offset(self) -> Duration {
        self.0
    }
}

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for SimInstant {
    type Output = SimInstant;

    fn add(self, duration: Duration) -> SimInstant {
        SimInstant(self.0.saturating_add(duration))
    }
}

/// Simulation environment with a shared virtual clock.
///
/// Clones share the clock, so a test can hold one handle and advance time
/// while the App and the driver hold others.
///
/// Sleeping advances the clock by the requested duration when the sleep is
/// first polled. A sleep that loses a `select!` race is never polled and
/// leaves the clock untouched.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    clock: Arc<Mutex<Duration>>,
}

impl SimEnv {
    /// Create a clock at offset zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        advance(&self.clock, duration);
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        *self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn advance(clock: &Mutex<Duration>, duration: Duration) {
    let mut now = clock.lock().unwrap_or_else(PoisonError::into_inner);
    *now = now.saturating_add(duration);
    tracing::trace!(elapsed = ?*now, "virtual clock advanced");
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        SimInstant(self.elapsed())
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        let clock = Arc::clone(&self.clock);
        async move {
            advance(&clock, duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_clock() {
        let env = SimEnv::new();
        let other = env.clone();

        other.advance(Duration::from_secs(3));
        assert_eq!(env.now().offset(), Duration::from_secs(3));
    }

    #[test]
    fn instant_difference_saturates() {
        let early = SimInstant::from_offset(Duration::from_secs(1));
        let late = early + Duration::from_secs(4);

        assert_eq!(late - early, Duration::from_secs(4));
        assert_eq!(early - late, Duration::ZERO);
    }

    #[tokio::test]
    async fn sleep_advances_when_polled() {
        let env = SimEnv::new();
        let sleep = env.sleep(Duration::from_secs(10));
        assert_eq!(env.elapsed(), Duration::ZERO);

        sleep.await;
        assert_eq!(env.elapsed(), Duration::from_secs(10));
    }
}
