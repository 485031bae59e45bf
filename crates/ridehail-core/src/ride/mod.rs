//! Ride lifecycle simulation.
//!
//! A [`RideSession`] owns one ride: the booking, the current
//! [`RideStatus`], a status timer and a [`DriverPositionSimulator`]. Both
//! timers run on the caller's clock and are applied in timestamp order by
//! [`RideSession::tick`].
//!
//! # State Machine
//!
//! ```text
//! ┌───────────┐ T  ┌────────────────┐ T  ┌──────────┐ T  ┌─────────┐ T  ┌────────────┐ T  ┌───────────┐
//! │ Confirmed │───>│ DriverAssigned │───>│ Arriving │───>│ Arrived │───>│ InProgress │───>│ Completed │
//! └───────────┘    └────────────────┘    └──────────┘    └─────────┘    └────────────┘    └───────────┘
//!       │                  │                   │
//!       └──────────────────┴─── cancel ────────┴──────> Cancelled
//! ```
//!
//! `T` is one firing of the status timer. The driver position simulator runs
//! from start until the transition into `Arrived`.

mod position;
mod session;
mod status;

use std::time::Duration;

pub use position::DriverPositionSimulator;
pub use session::{CancelOutcome, CancelRequest, RideBooking, RideSession, RideUpdate, SessionPhase};
pub use status::RideStatus;

use crate::location::Location;

/// Interval between status advances.
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(10);

/// Interval between driver position updates.
pub const DEFAULT_POSITION_INTERVAL: Duration = Duration::from_secs(3);

/// Degrees the driver moves on each axis per position update.
pub const DEFAULT_POSITION_DELTA: f64 = 0.002;

/// Latitude the simulated driver starts from.
pub const DRIVER_START_LATITUDE: f64 = 40.7048;

/// Longitude the simulated driver starts from.
pub const DRIVER_START_LONGITUDE: f64 = -74.016;

/// Address label carried by the simulated driver location.
pub const DRIVER_START_ADDRESS: &str = "Approaching pickup location";

/// Ride simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RideConfig {
    /// Period of the status timer.
    pub status_interval: Duration,
    /// Period of the position timer (usually shorter than `status_interval`).
    pub position_interval: Duration,
    /// Degrees added to latitude and longitude per position update.
    pub position_delta: f64,
    /// Where the driver appears when the ride starts.
    pub driver_start: Location,
}

impl Default for RideConfig {
    fn default() -> Self {
        Self {
            status_interval: DEFAULT_STATUS_INTERVAL,
            position_interval: DEFAULT_POSITION_INTERVAL,
            position_delta: DEFAULT_POSITION_DELTA,
            driver_start: Location::new(
                DRIVER_START_LATITUDE,
                DRIVER_START_LONGITUDE,
                DRIVER_START_ADDRESS,
            ),
        }
    }
}
