//! Production Environment implementation using system time.
//!
//! `SystemEnv` uses `std::time::Instant` for time and `tokio::time::sleep()`
//! for async sleeping, so ride timers fire on the wall clock.

use std::time::Duration;

use ridehail_core::Environment;

/// Production environment using the monotonic system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
