//! Application input events.
//!
//! [`AppEvent`] is the full set of inputs that drive the [`crate::App`].
//! Screen interactions arrive from the driver, clock ticks from the runtime.

use ridehail_core::{Destination, RideBooking, RideOption};

/// Events processed by the App.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A timer may be due.
    Tick,

    /// Open a screen.
    Navigate(Destination),

    /// Return to the previous screen.
    Back,

    /// Home screen "book" button.
    BookRide {
        /// Pickup address label.
        pickup: String,
        /// Dropoff address label.
        dropoff: String,
    },

    /// Booking screen confirmed a ride tier.
    ConfirmRide {
        /// Chosen tier.
        ride: RideOption,
    },

    /// Start a ride session directly.
    StartRide(RideBooking),

    /// Cancel button pressed.
    RequestCancel,

    /// Cancellation prompt accepted.
    ConfirmCancel,

    /// Cancellation prompt dismissed.
    DeclineCancel,

    /// Call button on the driver card.
    CallDriver,

    /// Message button on the driver card.
    MessageDriver,

    /// "Book Another Ride" after completion.
    BookAnother,

    /// "Rate Your Ride" after completion.
    RateRide {
        /// Rating, clamped to one through five.
        stars: u8,
    },

    /// Logout button pressed.
    RequestLogout,

    /// Logout prompt accepted.
    ConfirmLogout,

    /// Logout prompt dismissed.
    DeclineLogout,

    /// Leave the application.
    Quit,
}
