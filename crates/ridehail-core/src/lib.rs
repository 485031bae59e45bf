//! Core state machines for the ride-hailing flow.
//!
//! Everything in this crate is pure: no I/O, no spawned tasks, no wall clock.
//! Time is passed in as an instant and every operation returns the state
//! changes it produced, so the same code runs under a real clock and under a
//! virtual clock in tests.
//!
//! # Components
//!
//! - [`Environment`]: clock abstraction (current instant and async sleep)
//! - [`PeriodicTimer`]: computes the firings of a fixed-period timer
//! - [`NavigationStack`]: screen history with per-destination parameters
//! - [`DriverPositionSimulator`]: fabricated driver approach trajectory
//! - [`RideSession`]: ride lifecycle machine owning one ride's state

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod error;
pub mod location;
pub mod navigation;
pub mod ride;
pub mod timer;

pub use env::Environment;
pub use error::SessionError;
pub use location::{DriverProfile, Location, RideOption, Vehicle};
pub use navigation::{
    BookingParams, Destination, NavigationConfig, NavigationEntry, NavigationStack, ParamScope,
    RideDetailsParams, Screen, ScreenParams,
};
pub use ride::{
    CancelOutcome, CancelRequest, DriverPositionSimulator, RideBooking, RideConfig, RideSession,
    RideStatus, RideUpdate, SessionPhase,
};
pub use timer::PeriodicTimer;
