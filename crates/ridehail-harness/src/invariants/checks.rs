//! The individual ride and navigation checks.

use ridehail_core::{RideStatus, SessionPhase};

use super::{Invariant, InvariantResult, SystemSnapshot};

/// Navigation history always holds at least the root entry.
pub struct HistoryNonEmpty;

impl Invariant for HistoryNonEmpty {
    fn name(&self) -> &'static str {
        "history_non_empty"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        if state.app.history_len == 0 {
            return Err(self.violation(format!("empty history on {}", state.app.screen)));
        }
        Ok(())
    }
}

/// Ride status never decreases within one session.
pub struct StatusMonotonicity;

impl Invariant for StatusMonotonicity {
    fn name(&self) -> &'static str {
        "status_monotonicity"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for window in state.status_history.windows(2) {
            if window[1] < window[0] {
                return Err(self.violation(format!(
                    "ride {}: status decreased {} → {}",
                    state.app.rides_started, window[0], window[1]
                )));
            }
        }
        Ok(())
    }
}

/// No driver marker once the driver arrived.
pub struct NoDriverAfterArrival;

impl Invariant for NoDriverAfterArrival {
    fn name(&self) -> &'static str {
        "no_driver_after_arrival"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        match &state.app.ride {
            Some(ride) if ride.status >= RideStatus::Arrived && ride.driver_location.is_some() => {
                Err(self.violation(format!("driver location shown at {}", ride.status)))
            },
            _ => Ok(()),
        }
    }
}

/// Completed or cancelled rides have no live timers.
pub struct TerminalRideHasNoTimers;

impl Invariant for TerminalRideHasNoTimers {
    fn name(&self) -> &'static str {
        "terminal_ride_has_no_timers"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        match &state.app.ride {
            Some(ride) if ride.phase.is_terminal() && ride.live_timers => {
                Err(self.violation(format!("{:?} ride still has live timers", ride.phase)))
            },
            _ => Ok(()),
        }
    }
}

/// A cancelled ride was cancelled before the driver arrived.
pub struct CancelBeforeArrival;

impl Invariant for CancelBeforeArrival {
    fn name(&self) -> &'static str {
        "cancel_before_arrival"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        match &state.app.ride {
            Some(ride) if ride.phase == SessionPhase::Cancelled && !ride.status.driver_en_route() => {
                Err(self.violation(format!("ride cancelled at {}", ride.status)))
            },
            _ => Ok(()),
        }
    }
}
