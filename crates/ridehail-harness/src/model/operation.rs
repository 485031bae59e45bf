//! Operations for model-based testing.
//!
//! Operations represent every input a user or the clock can produce. They
//! are generated randomly by proptest or by the fuzzer and applied to both the
//! model and the real App.

use arbitrary::Arbitrary;
use ridehail_app::{AppAction, AppEvent};
use ridehail_core::{Destination, RideDetailsParams, RideOption, SessionError};

/// Addresses available to generated operations.
const ADDRESSES: [&str; 3] = ["12 Main St", "Central Station", "JFK Airport"];

/// Address picked by an operation (kept small for shrinking).
///
/// Slot 0 is the empty address, so incomplete bookings get generated too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub struct AddressSlot(pub u8);

impl AddressSlot {
    /// Address label, empty for slot 0.
    pub fn address(self) -> String {
        match usize::from(self.0) % (ADDRESSES.len() + 1) {
            0 => String::new(),
            n => ADDRESSES[n - 1].to_string(),
        }
    }
}

/// Ride tier picked by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub struct TierSlot(pub u8);

impl TierSlot {
    /// Ride option for this slot.
    pub fn ride(self) -> RideOption {
        match self.0 % 4 {
            0 => RideOption::new("economy", "Economy", 12.99, 15, 4),
            1 => RideOption::new("comfort", "Comfort", 18.50, 15, 4),
            2 => RideOption::new("premium", "Premium", 25.99, 15, 4),
            _ => RideOption::new("xl", "XL", 29.99, 18, 6),
        }
    }
}

/// Screens reachable without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum SimpleScreen {
    /// Home screen.
    Home,
    /// Driver screen.
    Driver,
    /// Ride history screen.
    Rides,
    /// Payment screen.
    Payment,
    /// Profile screen.
    Profile,
}

impl SimpleScreen {
    /// Navigation request for this screen.
    pub fn destination(self) -> Destination {
        match self {
            SimpleScreen::Home => Destination::Home,
            SimpleScreen::Driver => Destination::Driver,
            SimpleScreen::Rides => Destination::Rides,
            SimpleScreen::Payment => Destination::Payment,
            SimpleScreen::Profile => Destination::Profile,
        }
    }
}

/// Operations that can be applied to the system.
///
/// Operations are small and composable so proptest can explore interesting
/// combinations.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Open a screen without parameters.
    Navigate {
        /// Target screen.
        screen: SimpleScreen,
    },

    /// Home screen "book" button.
    BookRide {
        /// Pickup address.
        pickup: AddressSlot,
        /// Dropoff address.
        dropoff: AddressSlot,
    },

    /// Booking screen tier confirmation.
    ConfirmRide {
        /// Chosen tier.
        tier: TierSlot,
    },

    /// Open ride details directly with parameters.
    OpenDetails {
        /// Pickup address.
        pickup: AddressSlot,
        /// Dropoff address.
        dropoff: AddressSlot,
        /// Chosen tier.
        tier: TierSlot,
    },

    /// Return to the previous screen.
    Back,

    /// Advance simulation time and deliver a tick.
    AdvanceTime {
        /// Milliseconds to advance.
        millis: u16,
    },

    /// Cancel button.
    RequestCancel,

    /// Cancellation prompt accepted.
    ConfirmCancel,

    /// Cancellation prompt dismissed.
    DeclineCancel,

    /// "Book Another Ride".
    BookAnother,

    /// "Rate Your Ride".
    RateRide {
        /// Rating.
        stars: u8,
    },
}

impl Operation {
    /// App event performing this operation.
    ///
    /// `AdvanceTime` maps to a tick; the caller moves the clock first.
    pub fn event(&self) -> AppEvent {
        match self {
            Operation::Navigate { screen } => AppEvent::Navigate(screen.destination()),
            Operation::BookRide { pickup, dropoff } => {
                AppEvent::BookRide { pickup: pickup.address(), dropoff: dropoff.address() }
            },
            Operation::ConfirmRide { tier } => AppEvent::ConfirmRide { ride: tier.ride() },
            Operation::OpenDetails { pickup, dropoff, tier } => {
                AppEvent::Navigate(Destination::RideDetails(RideDetailsParams {
                    pickup: pickup.address(),
                    dropoff: dropoff.address(),
                    ride: tier.ride(),
                }))
            },
            Operation::Back => AppEvent::Back,
            Operation::AdvanceTime { .. } => AppEvent::Tick,
            Operation::RequestCancel => AppEvent::RequestCancel,
            Operation::ConfirmCancel => AppEvent::ConfirmCancel,
            Operation::DeclineCancel => AppEvent::DeclineCancel,
            Operation::BookAnother => AppEvent::BookAnother,
            Operation::RateRide { stars } => AppEvent::RateRide { stars: *stars },
        }
    }
}

/// Result of applying an operation.
///
/// Used to compare model and real system behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded.
    Ok,

    /// Cancellation refused because the driver already arrived.
    Rejected,

    /// Operation failed with expected error.
    Error(OperationError),
}

/// Expected errors that can occur during operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// Cancellation step without a ride.
    NoActiveSession,

    /// Confirm or decline without a pending request.
    NoPendingCancel,

    /// Tier confirmation outside the booking screen.
    NoBookingParams,

    /// Ride details with incomplete parameters.
    IncompleteBooking,
}

impl From<&SessionError> for OperationError {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::IncompleteBooking { .. } => Self::IncompleteBooking,
            SessionError::NoActiveSession => Self::NoActiveSession,
            SessionError::NoPendingCancel => Self::NoPendingCancel,
            SessionError::NoBookingParams => Self::NoBookingParams,
        }
    }
}

impl OperationResult {
    /// Classify the actions the App returned for an operation.
    pub fn from_actions(actions: &[AppAction]) -> Self {
        for action in actions {
            match action {
                AppAction::Error(err) => return OperationResult::Error(err.into()),
                AppAction::CancelRejected { .. } => return OperationResult::Rejected,
                _ => {},
            }
        }
        OperationResult::Ok
    }

    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, OperationResult::Ok)
    }

    /// Check if operation failed.
    pub fn is_err(&self) -> bool {
        matches!(self, OperationResult::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_zero_is_empty_address() {
        assert!(AddressSlot(0).address().is_empty());
        assert!(AddressSlot(4).address().is_empty());
        assert_eq!(AddressSlot(1).address(), "12 Main St");
    }

    #[test]
    fn tiers_cycle() {
        assert_eq!(TierSlot(3).ride().id, "xl");
        assert_eq!(TierSlot(4).ride().id, "economy");
    }
}
