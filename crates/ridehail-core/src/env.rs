//! Environment abstraction for deterministic testing.
//!
//! Decouples the ride simulation from the system clock. Production code runs
//! on real monotonic time; tests drive a virtual clock forward explicitly so
//! status and position ticks happen exactly when the test says they do.

use std::{fmt::Debug, future::Future, ops::Sub, time::Duration};

/// Abstract environment providing time and async sleeping.
///
/// # Invariants
///
/// Implementations MUST guarantee that `now()` never goes backwards within a
/// single execution context.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, simulation
    /// environments use a virtual instant advanced by the test.
    type Instant: Copy + Ord + Send + Sync + Debug + Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only driver code awaits this. State machines never sleep; they are
    /// handed the current instant instead.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}
