//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, the instructions produced by
//! the [`crate::App`] coordinator for the runtime to execute.

use ridehail_core::{RideStatus, RideUpdate, SessionError};

/// Actions produced by the App.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Render the current screen.
    Render,

    /// Quit the application.
    Quit,

    /// Ride state changed. Forwarded to every subscriber.
    Notify(RideUpdate),

    /// Ask the user to confirm the ride cancellation.
    PromptCancel,

    /// Cancellation was refused because the driver already arrived.
    CancelRejected {
        /// Status the request was evaluated against.
        status: RideStatus,
    },

    /// Start a phone call with the driver.
    CallDriver {
        /// Driver display name.
        driver: String,
    },

    /// Open a message thread with the driver.
    MessageDriver {
        /// Driver display name.
        driver: String,
    },

    /// Ask the user to confirm logging out.
    PromptLogout,

    /// Show a transient message.
    Alert {
        /// Message text.
        message: String,
    },

    /// An operation was refused.
    Error(SessionError),
}
