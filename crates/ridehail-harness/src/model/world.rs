//! Model world: the reference implementation.
//!
//! The world is the oracle against which the real App is verified. It keeps
//! the history as a plain vector and derives ride progress from elapsed time
//! instead of running timers.

use std::collections::HashMap;

use ridehail_app::App;
use ridehail_core::{
    Environment, ParamScope, RideConfig, RideStatus, Screen, SessionPhase,
    ride::{DEFAULT_POSITION_INTERVAL, DEFAULT_STATUS_INTERVAL},
};

use super::operation::{Operation, OperationError, OperationResult, TierSlot};

/// Parameters recorded for a model screen.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ModelParams {
    Booking { pickup: String, dropoff: String },
    Details { pickup: String, dropoff: String, tier: TierSlot },
}

#[derive(Debug, Clone)]
struct ModelEntry {
    screen: Screen,
    params: Option<ModelParams>,
}

/// Model of one ride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRide {
    /// Pickup address the ride was started with.
    pub pickup: String,
    /// Dropoff address the ride was started with.
    pub dropoff: String,
    /// Ride tier the ride was started with.
    pub tier: TierSlot,
    /// Virtual time the ride started, in milliseconds.
    pub started_ms: u64,
    /// Status index frozen by a cancellation.
    pub cancelled_at: Option<u8>,
    /// A cancel request awaits confirmation.
    pub cancel_pending: bool,
}

impl ModelRide {
    fn status_period_ms() -> u64 {
        DEFAULT_STATUS_INTERVAL.as_millis() as u64
    }

    fn position_period_ms() -> u64 {
        DEFAULT_POSITION_INTERVAL.as_millis() as u64
    }

    /// Status index at `now_ms`.
    pub fn status_index(&self, now_ms: u64) -> u8 {
        self.cancelled_at.unwrap_or_else(|| {
            let advanced = now_ms.saturating_sub(self.started_ms) / Self::status_period_ms();
            advanced.min(u64::from(RideStatus::Completed.index())) as u8
        })
    }

    /// Phase at `now_ms`.
    pub fn phase(&self, now_ms: u64) -> SessionPhase {
        if self.cancelled_at.is_some() {
            SessionPhase::Cancelled
        } else if self.status_index(now_ms) == RideStatus::Completed.index() {
            SessionPhase::Completed
        } else {
            SessionPhase::Active
        }
    }

    /// Position updates applied by `now_ms`. `None` once the marker is gone.
    pub fn driver_steps(&self, now_ms: u64) -> Option<u32> {
        if !self.cancellable(now_ms) {
            return None;
        }
        let steps = now_ms.saturating_sub(self.started_ms) / Self::position_period_ms();
        Some(steps as u32)
    }

    /// Whether this is the ride booked with these addresses and tier.
    /// Tier slots that wrap onto the same ride option count as equal.
    fn serves(&self, pickup: &str, dropoff: &str, tier: TierSlot) -> bool {
        self.pickup == pickup && self.dropoff == dropoff && self.tier.ride() == tier.ride()
    }

    fn cancellable(&self, now_ms: u64) -> bool {
        self.cancelled_at.is_none() && self.status_index(now_ms) < RideStatus::Arrived.index()
    }
}

/// Observable ride state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableRide {
    /// Pickup address.
    pub pickup: String,
    /// Ride tier identifier.
    pub ride_id: String,
    /// Status index.
    pub status_index: u8,
    /// Phase.
    pub phase: SessionPhase,
    /// Position updates applied, `None` without a driver marker.
    pub driver_steps: Option<u32>,
    /// A cancel request awaits confirmation.
    pub cancel_pending: bool,
}

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Screen on top of the history.
    pub screen: Screen,
    /// Number of history entries.
    pub history_len: usize,
    /// Active ride.
    pub ride: Option<ObservableRide>,
}

impl ObservableState {
    /// Extract the observable state of a real App.
    ///
    /// Position updates are recovered from the driver's displacement, so the
    /// comparison does not depend on floating point accumulation.
    pub fn from_app<E: Environment>(app: &App<E>, config: &RideConfig) -> Self {
        let ride = app.ride().map(|session| ObservableRide {
            pickup: session.pickup().address.clone(),
            ride_id: session.ride().id.clone(),
            status_index: session.status().index(),
            phase: session.phase(),
            driver_steps: session.driver_location().map(|location| {
                let moved = location.latitude - config.driver_start.latitude;
                (moved / config.position_delta).round() as u32
            }),
            cancel_pending: session.is_cancel_pending(),
        });

        Self { screen: app.current_screen(), history_len: app.navigation().len(), ride }
    }
}

/// Model world - the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    /// Parameter storage policy being modelled.
    scope: ParamScope,
    /// History, root first.
    history: Vec<ModelEntry>,
    /// Last parameters recorded per screen.
    params_by_screen: HashMap<Screen, ModelParams>,
    /// Ride bound to ride details.
    ride: Option<ModelRide>,
    /// Virtual time in milliseconds.
    now_ms: u64,
}

impl Default for ModelWorld {
    fn default() -> Self {
        Self::new(ParamScope::default())
    }
}

impl ModelWorld {
    /// Create a world on the home screen.
    pub fn new(scope: ParamScope) -> Self {
        Self {
            scope,
            history: vec![ModelEntry { screen: Screen::Home, params: None }],
            params_by_screen: HashMap::new(),
            ride: None,
            now_ms: 0,
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Active ride.
    pub fn ride(&self) -> Option<&ModelRide> {
        self.ride.as_ref()
    }

    /// Apply an operation and return the result.
    ///
    /// This is the main entry point for model-based testing. The result
    /// should match the real implementation's result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match op {
            Operation::Navigate { screen } => {
                self.push(screen.destination().screen(), None);
                OperationResult::Ok
            },
            Operation::Back => {
                if self.history.len() > 1 {
                    self.history.pop();
                    self.bind();
                }
                OperationResult::Ok
            },
            Operation::BookRide { pickup, dropoff } => {
                let (pickup, dropoff) = (pickup.address(), dropoff.address());
                if !pickup.is_empty() && !dropoff.is_empty() {
                    self.push(Screen::RideBooking, Some(ModelParams::Booking { pickup, dropoff }));
                }
                OperationResult::Ok
            },
            Operation::ConfirmRide { tier } => self.apply_confirm_ride(*tier),
            Operation::OpenDetails { pickup, dropoff, tier } => {
                self.apply_open_details(pickup.address(), dropoff.address(), *tier)
            },
            Operation::AdvanceTime { millis } => {
                self.now_ms += u64::from(*millis);
                OperationResult::Ok
            },
            Operation::RequestCancel => self.apply_request_cancel(),
            Operation::ConfirmCancel => self.apply_confirm_cancel(),
            Operation::DeclineCancel => match self.ride.as_mut() {
                None => OperationResult::Error(OperationError::NoActiveSession),
                Some(ride) if !ride.cancel_pending => {
                    OperationResult::Error(OperationError::NoPendingCancel)
                },
                Some(ride) => {
                    ride.cancel_pending = false;
                    OperationResult::Ok
                },
            },
            Operation::BookAnother | Operation::RateRide { .. } => {
                self.push(Screen::Home, None);
                OperationResult::Ok
            },
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        let now = self.now_ms;
        let ride = self.ride.as_ref().map(|ride| ObservableRide {
            pickup: ride.pickup.clone(),
            ride_id: ride.tier.ride().id,
            status_index: ride.status_index(now),
            phase: ride.phase(now),
            driver_steps: ride.driver_steps(now),
            cancel_pending: ride.cancel_pending,
        });

        ObservableState { screen: self.current_screen(), history_len: self.history.len(), ride }
    }

    fn current_screen(&self) -> Screen {
        self.history.last().map_or(Screen::Home, |entry| entry.screen)
    }

    fn current_params(&self) -> Option<&ModelParams> {
        let entry = self.history.last()?;
        let by_screen = self.params_by_screen.get(&entry.screen);

        match self.scope {
            ParamScope::PerScreen => by_screen,
            ParamScope::PerEntry => entry.params.as_ref().or(by_screen),
        }
    }

    fn push(&mut self, screen: Screen, params: Option<ModelParams>) {
        if let Some(params) = &params {
            self.params_by_screen.insert(screen, params.clone());
        }
        self.history.push(ModelEntry { screen, params });
        self.bind();
    }

    fn start_ride(&mut self, pickup: String, dropoff: String, tier: TierSlot) {
        self.ride = Some(ModelRide {
            pickup,
            dropoff,
            tier,
            started_ms: self.now_ms,
            cancelled_at: None,
            cancel_pending: false,
        });
    }

    fn ride_serves(&self, pickup: &str, dropoff: &str, tier: TierSlot) -> bool {
        self.ride.as_ref().is_some_and(|ride| ride.serves(pickup, dropoff, tier))
    }

    /// Drop the ride off ride details. On ride details, restart it unless it
    /// already is the ride the shown parameters name.
    fn bind(&mut self) {
        if self.current_screen() != Screen::RideDetails {
            self.ride = None;
            return;
        }

        if let Some(ModelParams::Details { pickup, dropoff, tier }) = self.current_params().cloned()
            && !self.ride_serves(&pickup, &dropoff, tier)
            && !pickup.is_empty()
            && !dropoff.is_empty()
        {
            self.start_ride(pickup, dropoff, tier);
        }
    }

    fn apply_confirm_ride(&mut self, tier: TierSlot) -> OperationResult {
        let Some(ModelParams::Booking { pickup, dropoff }) = self.current_params().cloned() else {
            return OperationResult::Error(OperationError::NoBookingParams);
        };

        self.start_ride(pickup.clone(), dropoff.clone(), tier);
        self.push(Screen::RideDetails, Some(ModelParams::Details { pickup, dropoff, tier }));
        OperationResult::Ok
    }

    fn apply_open_details(&mut self, pickup: String, dropoff: String, tier: TierSlot) -> OperationResult {
        if !self.ride_serves(&pickup, &dropoff, tier) {
            if pickup.is_empty() || dropoff.is_empty() {
                return OperationResult::Error(OperationError::IncompleteBooking);
            }
            self.start_ride(pickup.clone(), dropoff.clone(), tier);
        }

        self.push(Screen::RideDetails, Some(ModelParams::Details { pickup, dropoff, tier }));
        OperationResult::Ok
    }

    fn apply_request_cancel(&mut self) -> OperationResult {
        let now = self.now_ms;
        let Some(ride) = self.ride.as_mut() else {
            return OperationResult::Error(OperationError::NoActiveSession);
        };

        if !ride.cancellable(now) {
            return OperationResult::Rejected;
        }
        ride.cancel_pending = true;
        OperationResult::Ok
    }

    fn apply_confirm_cancel(&mut self) -> OperationResult {
        let now = self.now_ms;
        let Some(ride) = self.ride.as_mut() else {
            return OperationResult::Error(OperationError::NoActiveSession);
        };
        if !std::mem::take(&mut ride.cancel_pending) {
            return OperationResult::Error(OperationError::NoPendingCancel);
        }
        if !ride.cancellable(now) {
            return OperationResult::Rejected;
        }

        ride.cancelled_at = Some(ride.status_index(now));
        self.push(Screen::Home, None);
        OperationResult::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::operation::{AddressSlot, SimpleScreen};

    fn open(world: &mut ModelWorld) -> OperationResult {
        world.apply(&Operation::OpenDetails {
            pickup: AddressSlot(1),
            dropoff: AddressSlot(2),
            tier: TierSlot(0),
        })
    }

    #[test]
    fn ride_completes_after_five_periods() {
        let mut world = ModelWorld::default();
        assert!(open(&mut world).is_ok());

        world.apply(&Operation::AdvanceTime { millis: 50_000 });
        let ride = world.observable_state().ride;
        assert_eq!(ride.as_ref().map(|r| r.status_index), Some(5));
        assert_eq!(ride.map(|r| r.phase), Some(SessionPhase::Completed));
    }

    #[test]
    fn driver_steps_stop_at_arrival() {
        let mut world = ModelWorld::default();
        open(&mut world);

        world.apply(&Operation::AdvanceTime { millis: 29_999 });
        assert_eq!(world.observable_state().ride.and_then(|r| r.driver_steps), Some(9));

        world.apply(&Operation::AdvanceTime { millis: 1 });
        assert_eq!(world.observable_state().ride.and_then(|r| r.driver_steps), None);
    }

    #[test]
    fn incomplete_details_refused() {
        let mut world = ModelWorld::default();
        let result = world.apply(&Operation::OpenDetails {
            pickup: AddressSlot(0),
            dropoff: AddressSlot(2),
            tier: TierSlot(0),
        });

        assert_eq!(result, OperationResult::Error(OperationError::IncompleteBooking));
        assert_eq!(world.observable_state().history_len, 1);
    }

    #[test]
    fn leaving_details_drops_ride() {
        let mut world = ModelWorld::default();
        open(&mut world);
        world.apply(&Operation::Navigate { screen: SimpleScreen::Payment });
        assert!(world.ride().is_none());

        world.apply(&Operation::Back);
        assert_eq!(world.ride().map(|r| r.started_ms), Some(world.now_ms()));
    }

    #[test]
    fn details_for_another_tier_restart_the_ride() {
        let mut world = ModelWorld::default();
        open(&mut world);
        world.apply(&Operation::AdvanceTime { millis: 20_000 });

        world.apply(&Operation::OpenDetails {
            pickup: AddressSlot(1),
            dropoff: AddressSlot(2),
            tier: TierSlot(2),
        });
        let ride = world.observable_state().ride;
        assert_eq!(ride.as_ref().map(|r| r.ride_id.as_str()), Some("premium"));
        assert_eq!(ride.map(|r| r.status_index), Some(0));

        // Same booking again keeps the running ride.
        world.apply(&Operation::AdvanceTime { millis: 10_000 });
        world.apply(&Operation::OpenDetails {
            pickup: AddressSlot(1),
            dropoff: AddressSlot(2),
            tier: TierSlot(6),
        });
        assert_eq!(world.observable_state().ride.map(|r| r.status_index), Some(1));
    }
}
