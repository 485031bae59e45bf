//! Error types for the ride-hailing core.
//!
//! Only caller-contract violations are errors. Boundary no-ops (going back at
//! the root screen) and precondition rejections (cancelling after the driver
//! arrived) are ordinary return values, see [`crate::CancelOutcome`].

use thiserror::Error;

/// Errors raised by ride session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A ride session was requested with partial booking data.
    #[error("incomplete booking: {field} is missing or invalid")]
    IncompleteBooking {
        /// Booking field that failed validation
        field: &'static str,
    },

    /// The operation needs a ride session but none is active.
    #[error("no active ride session")]
    NoActiveSession,

    /// A cancellation was confirmed or declined without being requested.
    #[error("no cancellation request is pending")]
    NoPendingCancel,

    /// The current screen has no booking parameters to confirm a ride with.
    #[error("no booking parameters for the current screen")]
    NoBookingParams,
}

impl SessionError {
    /// Returns true if the caller supplied bad or missing data.
    ///
    /// Contract violations need a fix in the calling screen. The remaining
    /// errors only mean the request arrived at the wrong moment.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::IncompleteBooking { .. } | Self::NoBookingParams)
    }
}
