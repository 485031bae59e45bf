//! Ride lifecycle machine.
//!
//! Uses the same pattern as the rest of the core: methods take the current
//! instant and return what changed. No timers are spawned. A session's timers
//! are values it owns, so dropping the session releases them, and
//! [`RideSession::teardown`] cancels them explicitly on every other exit.

use std::{ops::Sub, time::Duration};

use serde::Serialize;

use super::{DriverPositionSimulator, RideConfig, RideStatus};
use crate::{
    error::SessionError,
    location::{Location, RideOption},
    timer::PeriodicTimer,
};

/// Everything needed to start a ride.
#[derive(Debug, Clone, PartialEq)]
pub struct RideBooking {
    /// Pickup point.
    pub pickup: Location,
    /// Dropoff point.
    pub dropoff: Location,
    /// Chosen ride tier.
    pub ride: RideOption,
}

impl RideBooking {
    /// Create a booking.
    pub fn new(pickup: Location, dropoff: Location, ride: RideOption) -> Self {
        Self { pickup, dropoff, ride }
    }

    /// Booking between two address labels at the mock coordinates.
    pub fn from_addresses(
        pickup: impl Into<String>,
        dropoff: impl Into<String>,
        ride: RideOption,
    ) -> Self {
        Self::new(Location::mock_pickup(pickup), Location::mock_dropoff(dropoff), ride)
    }

    /// Check that every field a ride needs is present.
    ///
    /// # Errors
    ///
    /// - `SessionError::IncompleteBooking` naming the first bad field
    pub fn validate(&self) -> Result<(), SessionError> {
        let missing = if !self.pickup.is_complete() {
            Some("pickup")
        } else if !self.dropoff.is_complete() {
            Some("dropoff")
        } else if self.ride.id.trim().is_empty() {
            Some("ride.id")
        } else if self.ride.name.trim().is_empty() {
            Some("ride.name")
        } else if !self.ride.price.is_finite() || self.ride.price < 0.0 {
            Some("ride.price")
        } else {
            None
        };

        match missing {
            Some(field) => Err(SessionError::IncompleteBooking { field }),
            None => Ok(()),
        }
    }
}

/// Whether a session is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPhase {
    /// Timers running.
    Active,
    /// Reached [`RideStatus::Completed`].
    Completed,
    /// Cancelled before the driver arrived.
    Cancelled,
}

impl SessionPhase {
    /// No further status changes can happen.
    pub fn is_terminal(self) -> bool {
        self != SessionPhase::Active
    }
}

/// Answer to the first step of a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelRequest {
    /// Cancellation is possible; the UI must confirm or decline.
    ConfirmationRequired,
    /// Cancellation is not possible at this status.
    Rejected {
        /// Status when the request was evaluated
        status: RideStatus,
    },
}

/// Result of a cancellation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The ride was cancelled.
    Accepted,
    /// The ride was left untouched.
    Rejected {
        /// Status when the cancellation was evaluated
        status: RideStatus,
    },
}

impl CancelOutcome {
    /// The ride was cancelled.
    pub fn is_accepted(self) -> bool {
        self == CancelOutcome::Accepted
    }
}

/// Observable ride state delivered to renderers on every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideUpdate {
    /// Current status.
    pub status: RideStatus,
    /// Index of `status`, 0 through 5.
    pub status_index: u8,
    /// Display label of `status`.
    pub status_label: &'static str,
    /// Driver marker position. `None` once the driver arrived or the ride
    /// ended.
    pub driver_location: Option<Location>,
    /// Session phase.
    pub phase: SessionPhase,
}

/// Timer firings, ordered so that status wins ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Firing {
    Status,
    Position,
}

/// One ride's lifecycle state machine.
///
/// Generic over the instant type so tests can drive it with virtual time.
/// Both timers are started at the same instant, so their firing offsets share
/// one timeline.
#[derive(Debug, Clone)]
pub struct RideSession<I> {
    /// Booking this session was started with.
    booking: RideBooking,
    /// Current status. Never decreases.
    status: RideStatus,
    /// Running, completed or cancelled.
    phase: SessionPhase,
    /// Advances `status` once per firing.
    status_timer: PeriodicTimer<I>,
    /// Driver approach, stopped on arrival.
    simulator: DriverPositionSimulator<I>,
    /// A cancel request awaits confirmation.
    cancel_pending: bool,
}

impl<I> RideSession<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Validate `booking` and start both timers at `now`.
    ///
    /// # Errors
    ///
    /// - `SessionError::IncompleteBooking` if the booking is partial; no
    ///   session is created
    pub fn start(booking: RideBooking, now: I, config: &RideConfig) -> Result<Self, SessionError> {
        booking.validate()?;

        let mut simulator = DriverPositionSimulator::new(config.position_delta);
        simulator.start(now, config.driver_start.clone(), config.position_interval);

        tracing::info!(
            ride = %booking.ride.name,
            pickup = %booking.pickup.address,
            dropoff = %booking.dropoff.address,
            "ride session started"
        );

        Ok(Self {
            booking,
            status: RideStatus::Confirmed,
            phase: SessionPhase::Active,
            status_timer: PeriodicTimer::start(now, config.status_interval),
            simulator,
            cancel_pending: false,
        })
    }

    /// Booking this session was started with.
    pub fn booking(&self) -> &RideBooking {
        &self.booking
    }

    /// Pickup point.
    pub fn pickup(&self) -> &Location {
        &self.booking.pickup
    }

    /// Dropoff point.
    pub fn dropoff(&self) -> &Location {
        &self.booking.dropoff
    }

    /// Chosen ride tier.
    pub fn ride(&self) -> &RideOption {
        &self.booking.ride
    }

    /// Current status.
    pub fn status(&self) -> RideStatus {
        self.status
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Driver marker position. `None` once the driver arrived.
    pub fn driver_location(&self) -> Option<&Location> {
        self.simulator.location()
    }

    /// Whether a cancel request would currently be accepted.
    pub fn is_cancellable(&self) -> bool {
        self.cancel_blocker().is_none()
    }

    /// A cancel request awaits confirmation.
    pub fn is_cancel_pending(&self) -> bool {
        self.cancel_pending
    }

    /// Whether any timer can still fire.
    pub fn has_live_timers(&self) -> bool {
        self.status_timer.is_active() || self.simulator.is_running()
    }

    /// Time from `now` until the next timer firing. `None` when no timer is
    /// live.
    pub fn time_until_next(&self, now: I) -> Option<Duration> {
        [self.status_timer.time_until_next(now), self.simulator.time_until_next(now)]
            .into_iter()
            .flatten()
            .min()
    }

    /// Current observable state.
    pub fn snapshot(&self) -> RideUpdate {
        RideUpdate {
            status: self.status,
            status_index: self.status.index(),
            status_label: self.status.label(),
            driver_location: self.simulator.location().cloned(),
            phase: self.phase,
        }
    }

    /// Apply every timer firing due at `now`, oldest first.
    ///
    /// Returns one update per firing, each taken after that firing was fully
    /// applied. On equal timestamps the status firing goes first, so no
    /// position update is observed at the moment of arrival.
    pub fn tick(&mut self, now: I) -> Vec<RideUpdate> {
        let mut updates = Vec::new();
        if self.phase.is_terminal() {
            return updates;
        }

        let elapsed = self.status_timer.elapsed(now);
        while let Some(firing) = self.next_firing(elapsed) {
            match firing {
                Firing::Status => self.advance_status(),
                Firing::Position => {
                    self.simulator.step();
                },
            }
            updates.push(self.snapshot());
        }

        updates
    }

    /// First timer firing at or before `elapsed`.
    fn next_firing(&self, elapsed: Duration) -> Option<Firing> {
        let status = self.status_timer.next_fire_offset().filter(|at| *at <= elapsed);
        let position = self.simulator.next_fire_offset().filter(|at| *at <= elapsed);

        match (status, position) {
            (Some(s), Some(p)) if p < s => Some(Firing::Position),
            (Some(_), _) => Some(Firing::Status),
            (None, Some(_)) => Some(Firing::Position),
            (None, None) => None,
        }
    }

    /// Consume one status firing and move to the next stage.
    fn advance_status(&mut self) {
        self.status_timer.fire();

        let Some(next) = self.status.next() else {
            self.status_timer.cancel();
            return;
        };

        tracing::debug!(from = %self.status, to = %next, "ride status advanced");
        self.status = next;

        if !next.driver_en_route() && self.simulator.is_running() {
            self.simulator.stop();
            tracing::debug!("driver arrived, position simulation stopped");
        }

        if next.is_final() {
            self.status_timer.cancel();
            self.phase = SessionPhase::Completed;
            tracing::info!(ride = %self.booking.ride.name, "ride completed");
        }
    }

    /// Status that blocks cancellation, if any.
    fn cancel_blocker(&self) -> Option<RideStatus> {
        let blocked = self.phase.is_terminal() || !self.status.driver_en_route();
        blocked.then_some(self.status)
    }

    /// First step of a cancellation.
    ///
    /// Evaluated against the current status. On success the request is
    /// recorded and must be confirmed or declined.
    pub fn request_cancel(&mut self) -> CancelRequest {
        if let Some(status) = self.cancel_blocker() {
            tracing::warn!(%status, "cancel request rejected");
            return CancelRequest::Rejected { status };
        }

        self.cancel_pending = true;
        CancelRequest::ConfirmationRequired
    }

    /// Second step of a cancellation: the user confirmed.
    ///
    /// Eligibility is evaluated again, so a driver that arrived while the
    /// confirmation was shown still blocks it.
    ///
    /// # Errors
    ///
    /// - `SessionError::NoPendingCancel` if no request was made
    pub fn confirm_cancel(&mut self) -> Result<CancelOutcome, SessionError> {
        if !std::mem::take(&mut self.cancel_pending) {
            return Err(SessionError::NoPendingCancel);
        }
        Ok(self.cancel())
    }

    /// Second step of a cancellation: the user declined.
    ///
    /// # Errors
    ///
    /// - `SessionError::NoPendingCancel` if no request was made
    pub fn decline_cancel(&mut self) -> Result<(), SessionError> {
        if std::mem::take(&mut self.cancel_pending) {
            Ok(())
        } else {
            Err(SessionError::NoPendingCancel)
        }
    }

    /// Cancel in one step.
    ///
    /// Accepted only while the session is active and the driver has not
    /// arrived. A rejection leaves the session untouched.
    pub fn cancel(&mut self) -> CancelOutcome {
        if let Some(status) = self.cancel_blocker() {
            tracing::warn!(%status, phase = ?self.phase, "cancel rejected");
            return CancelOutcome::Rejected { status };
        }

        self.cancel_pending = false;
        self.phase = SessionPhase::Cancelled;
        self.teardown();
        tracing::info!(status = %self.status, "ride cancelled");

        CancelOutcome::Accepted
    }

    /// Cancel both timers and clear the driver location. Idempotent.
    pub fn teardown(&mut self) {
        self.status_timer.cancel();
        self.simulator.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    fn economy() -> RideOption {
        RideOption::new("economy", "Economy", 12.99, 15, 4)
    }

    fn session() -> RideSession<Duration> {
        let booking = RideBooking::from_addresses("X", "Y", economy());
        let started = RideSession::start(booking, Duration::ZERO, &RideConfig::default());
        started.unwrap_or_else(|e| unreachable!("valid booking rejected: {e}"))
    }

    fn status_ticks(n: u32) -> Duration {
        10 * SECOND * n
    }

    #[test]
    fn starts_confirmed_with_driver() {
        let s = session();
        assert_eq!(s.status(), RideStatus::Confirmed);
        assert_eq!(s.phase(), SessionPhase::Active);
        assert!(s.driver_location().is_some());
        assert!(s.has_live_timers());
    }

    #[test]
    fn five_status_ticks_complete_the_ride() {
        let mut s = session();
        s.tick(status_ticks(5));
        assert_eq!(s.status().index(), 5);
        assert_eq!(s.phase(), SessionPhase::Completed);
        assert!(!s.has_live_timers());

        let updates = s.tick(status_ticks(6));
        assert!(updates.is_empty());
        assert_eq!(s.status().index(), 5);
    }

    #[test]
    fn one_update_per_firing_in_time_order() {
        let mut s = session();
        let updates = s.tick(status_ticks(1));

        // Position firings at 3s, 6s, 9s then the status firing at 10s.
        assert_eq!(updates.len(), 4);
        assert!(updates[..3].iter().all(|u| u.status == RideStatus::Confirmed));
        assert_eq!(updates[3].status, RideStatus::DriverAssigned);
    }

    #[test]
    fn arrival_clears_driver_in_same_update() {
        let mut s = session();
        let updates = s.tick(status_ticks(3));

        let arrival = updates.iter().find(|u| u.status == RideStatus::Arrived);
        assert_eq!(arrival.map(|u| u.driver_location.is_none()), Some(true));
        // The position firing at 30s coincides with arrival and is dropped.
        assert_eq!(updates.last().map(|u| u.status), Some(RideStatus::Arrived));
        assert!(s.driver_location().is_none());
    }

    #[test]
    fn no_movement_after_arrival() {
        let mut s = session();
        s.tick(status_ticks(3));
        let updates = s.tick(status_ticks(3) + 9 * SECOND);
        assert!(updates.is_empty());
        assert!(s.driver_location().is_none());
    }

    #[test]
    fn cancel_before_arrival_accepted() {
        let mut s = session();
        s.tick(status_ticks(2));
        assert_eq!(s.status().index(), 2);

        assert_eq!(s.cancel(), CancelOutcome::Accepted);
        assert_eq!(s.phase(), SessionPhase::Cancelled);
        assert!(!s.has_live_timers());
        assert!(s.driver_location().is_none());
        assert!(s.tick(status_ticks(10)).is_empty());
        assert_eq!(s.status().index(), 2);
    }

    #[test]
    fn cancel_after_arrival_rejected() {
        let mut s = session();
        s.tick(status_ticks(3));

        assert_eq!(s.cancel(), CancelOutcome::Rejected { status: RideStatus::Arrived });
        assert_eq!(s.status().index(), 3);
        assert_eq!(s.phase(), SessionPhase::Active);
        assert!(s.has_live_timers());
    }

    #[test]
    fn two_step_cancel_accepted() {
        let mut s = session();
        assert_eq!(s.request_cancel(), CancelRequest::ConfirmationRequired);
        assert!(s.is_cancel_pending());
        assert_eq!(s.confirm_cancel(), Ok(CancelOutcome::Accepted));
        assert!(!s.is_cancel_pending());
    }

    #[test]
    fn confirmation_reevaluated_after_arrival() {
        let mut s = session();
        s.tick(status_ticks(2));
        assert_eq!(s.request_cancel(), CancelRequest::ConfirmationRequired);

        // Driver arrives while the prompt is open.
        s.tick(status_ticks(3));
        assert_eq!(
            s.confirm_cancel(),
            Ok(CancelOutcome::Rejected { status: RideStatus::Arrived })
        );
        assert_eq!(s.phase(), SessionPhase::Active);
    }

    #[test]
    fn decline_leaves_session_running() {
        let mut s = session();
        s.request_cancel();
        assert_eq!(s.decline_cancel(), Ok(()));
        assert_eq!(s.phase(), SessionPhase::Active);
        assert_eq!(s.decline_cancel(), Err(SessionError::NoPendingCancel));
    }

    #[test]
    fn confirm_without_request_is_error() {
        let mut s = session();
        assert_eq!(s.confirm_cancel(), Err(SessionError::NoPendingCancel));
        assert_eq!(s.phase(), SessionPhase::Active);
    }

    #[test]
    fn request_after_completion_rejected() {
        let mut s = session();
        s.tick(status_ticks(5));
        assert_eq!(s.request_cancel(), CancelRequest::Rejected { status: RideStatus::Completed });
    }

    #[test]
    fn incomplete_booking_refused() {
        let mut ride = economy();
        ride.name = String::new();
        let booking = RideBooking::from_addresses("X", "Y", ride);
        let result = RideSession::start(booking, Duration::ZERO, &RideConfig::default());
        assert_eq!(result.err(), Some(SessionError::IncompleteBooking { field: "ride.name" }));

        let booking = RideBooking::from_addresses("", "Y", economy());
        let result = RideSession::start(booking, Duration::ZERO, &RideConfig::default());
        assert_eq!(result.err(), Some(SessionError::IncompleteBooking { field: "pickup" }));
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut s = session();
        s.teardown();
        s.teardown();
        assert!(!s.has_live_timers());
        assert_eq!(s.time_until_next(SECOND), None);
    }

    #[test]
    fn next_deadline_is_nearest_timer() {
        let s = session();
        assert_eq!(s.time_until_next(SECOND), Some(2 * SECOND));
    }
}
