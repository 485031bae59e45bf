//! Observable ride details state.
//!
//! [`RideView`] is the view model of the ride details screen. It is derived
//! from a [`RideSession`] on demand and holds no state of its own.

use std::{ops::Sub, time::Duration};

use ridehail_core::{DriverProfile, Location, RideSession, RideStatus};

/// Progress marker of one timeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Already passed.
    Done,
    /// The ride is at this step.
    Current,
    /// Not reached yet.
    Pending,
}

impl StepState {
    /// Whether the step was reached.
    pub fn is_reached(self) -> bool {
        self != StepState::Pending
    }
}

/// One row of the status timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineStep {
    /// Status this row describes.
    pub status: RideStatus,
    /// Progress marker.
    pub state: StepState,
    /// Secondary line, only present once the step was reached.
    pub detail: Option<String>,
}

/// Ride details view model.
#[derive(Debug, Clone, PartialEq)]
pub struct RideView {
    /// Screen heading.
    pub headline: &'static str,
    /// Ride tier name.
    pub ride_name: String,
    /// Formatted fare.
    pub fare: String,
    /// Pickup address label.
    pub pickup: String,
    /// Dropoff address label.
    pub dropoff: String,
    /// One row per status, in lifecycle order.
    pub timeline: Vec<TimelineStep>,
    /// Driver marker on the map.
    pub driver_location: Option<Location>,
    /// Driver card with call and message buttons.
    pub show_driver_card: bool,
    /// Cancel button.
    pub show_cancel: bool,
    /// "Book Another Ride" and "Rate Your Ride" buttons.
    pub show_completion_actions: bool,
}

impl RideView {
    /// Derive the view for `session`, assigned to `driver`.
    pub fn new<I>(session: &RideSession<I>, driver: &DriverProfile) -> Self
    where
        I: Copy + Ord + Sub<Output = Duration>,
    {
        let current = session.status();
        let completed = current.is_final();

        let timeline = RideStatus::ALL
            .into_iter()
            .map(|status| {
                let state = match status.cmp(&current) {
                    std::cmp::Ordering::Less => StepState::Done,
                    std::cmp::Ordering::Equal => StepState::Current,
                    std::cmp::Ordering::Greater => StepState::Pending,
                };
                let detail = state.is_reached().then(|| step_detail(status, session, driver)).flatten();
                TimelineStep { status, state, detail }
            })
            .collect();

        Self {
            headline: if completed { "Ride Completed" } else { "Ride in Progress" },
            ride_name: session.ride().name.clone(),
            fare: session.ride().price_label(),
            pickup: session.pickup().address.clone(),
            dropoff: session.dropoff().address.clone(),
            timeline,
            driver_location: session.driver_location().cloned(),
            show_driver_card: !completed,
            show_cancel: session.is_cancellable(),
            show_completion_actions: completed,
        }
    }

    /// Current timeline step.
    pub fn current_step(&self) -> Option<&TimelineStep> {
        self.timeline.iter().find(|step| step.state == StepState::Current)
    }
}

fn step_detail<I>(status: RideStatus, session: &RideSession<I>, driver: &DriverProfile) -> Option<String>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    match status {
        RideStatus::Confirmed => None,
        RideStatus::DriverAssigned => Some(format!("{} is on the way", driver.name)),
        RideStatus::Arriving => Some(format!("Driver is {} min away", driver.eta_minutes)),
        RideStatus::Arrived => Some(format!("Driver is waiting at {}", session.pickup().address)),
        RideStatus::InProgress => {
            Some(format!("Estimated arrival: {} min", session.ride().estimated_minutes))
        },
        RideStatus::Completed => Some("Thanks for riding with us!".to_string()),
    }
}
