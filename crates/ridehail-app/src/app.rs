//! Application coordinator.
//!
//! The [`App`] owns the navigation stack and at most one ride session, and is
//! the only writer of either. It consumes [`AppEvent`] inputs and produces
//! [`AppAction`] instructions for the runtime to execute.
//!
//! # Session binding
//!
//! A ride session lives exactly as long as the ride details screen is on top
//! of the history:
//!
//! - navigating to ride details starts a session from the destination
//!   parameters unless the running one already is that booking, and refuses
//!   the navigation if they are incomplete
//! - leaving ride details (forward or back) tears the session down
//! - returning to ride details through `Back` starts a fresh session from the
//!   parameters recorded for that screen
//!
//! A session started with [`App::start_ride_session`] from another screen is
//! kept by a navigation to ride details for the same booking, and dropped by
//! any other navigation.

use std::time::Duration;

use ridehail_core::{
    BookingParams, CancelOutcome, CancelRequest, Destination, DriverProfile, Environment,
    Location, NavigationStack, RideBooking, RideDetailsParams, RideOption, RideSession,
    RideStatus, RideUpdate, Screen, ScreenParams, SessionError,
};

use crate::{AppAction, AppConfig, AppEvent, RideView};

/// Lowest accepted ride rating.
const MIN_STARS: u8 = 1;

/// Highest accepted ride rating.
const MAX_STARS: u8 = 5;

/// Application coordinator.
///
/// Generic over the [`Environment`] so the same code runs on the system clock
/// and on a virtual clock.
pub struct App<E: Environment> {
    /// Clock used to stamp session operations.
    env: E,
    /// Configuration.
    config: AppConfig,
    /// Screen history.
    navigation: NavigationStack,
    /// Ride bound to the ride details screen. `None` when no ride is shown.
    session: Option<RideSession<E::Instant>>,
    /// Driver every ride is assigned to.
    driver: DriverProfile,
    /// Sessions started so far. Distinguishes a restarted ride from the
    /// previous one.
    rides_started: u64,
    /// A logout prompt is open.
    logout_pending: bool,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl<E: Environment> App<E> {
    /// Create an App showing the home screen.
    pub fn new(env: E, config: AppConfig) -> Self {
        let navigation = NavigationStack::new(config.navigation);
        Self {
            env,
            config,
            navigation,
            session: None,
            driver: DriverProfile::mock(),
            rides_started: 0,
            logout_pending: false,
            status_message: None,
        }
    }

    /// Clock this App runs on.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Screen history.
    pub fn navigation(&self) -> &NavigationStack {
        &self.navigation
    }

    /// Screen on top of the history.
    pub fn current_screen(&self) -> Screen {
        self.navigation.current_screen()
    }

    /// Parameters for the current screen.
    pub fn current_params(&self) -> Option<&ScreenParams> {
        self.navigation.current_params()
    }

    /// Active ride session.
    pub fn ride(&self) -> Option<&RideSession<E::Instant>> {
        self.session.as_ref()
    }

    /// Observable state of the active ride.
    pub fn ride_snapshot(&self) -> Option<RideUpdate> {
        self.session.as_ref().map(RideSession::snapshot)
    }

    /// Ride details view model for the active ride.
    pub fn ride_view(&self) -> Option<RideView> {
        self.session.as_ref().map(|session| RideView::new(session, &self.driver))
    }

    /// Driver every ride is assigned to.
    pub fn driver_profile(&self) -> &DriverProfile {
        &self.driver
    }

    /// Number of ride sessions started since the App was created.
    pub fn rides_started(&self) -> u64 {
        self.rides_started
    }

    /// Whether a logout prompt is open.
    pub fn is_logout_pending(&self) -> bool {
        self.logout_pending
    }

    /// Transient status message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Time until the next ride timer fires. `None` without live timers.
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.env.now();
        self.session.as_ref().and_then(|session| session.time_until_next(now))
    }

    /// Process an event and return actions.
    ///
    /// Refused operations are reported as [`AppAction::Error`] rather than
    /// returned, so the caller can feed events blindly.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        let result = match event {
            AppEvent::Tick => Ok(self.tick()),
            AppEvent::Navigate(destination) => self.navigate_to(destination),
            AppEvent::Back => Ok(self.navigate_back()),
            AppEvent::BookRide { pickup, dropoff } => Ok(self.book_ride(pickup, dropoff)),
            AppEvent::ConfirmRide { ride } => self.confirm_ride(ride),
            AppEvent::StartRide(booking) => {
                self.start_ride_session(booking.pickup, booking.dropoff, booking.ride)
            },
            AppEvent::RequestCancel => self.request_cancel_ride(),
            AppEvent::ConfirmCancel => self.confirm_cancel_ride(),
            AppEvent::DeclineCancel => self.decline_cancel_ride(),
            AppEvent::CallDriver => Ok(self.request_driver_call()),
            AppEvent::MessageDriver => Ok(self.request_driver_message()),
            AppEvent::BookAnother => Ok(self.book_another()),
            AppEvent::RateRide { stars } => Ok(self.rate_ride(stars)),
            AppEvent::RequestLogout => Ok(self.request_logout()),
            AppEvent::ConfirmLogout => Ok(self.confirm_logout()),
            AppEvent::DeclineLogout => Ok(self.decline_logout()),
            AppEvent::Quit => Ok(vec![AppAction::Quit]),
        };

        result.unwrap_or_else(|err| self.refuse(err))
    }

    /// Apply every ride timer firing due now.
    ///
    /// One [`AppAction::Notify`] per firing, followed by a single render.
    pub fn tick(&mut self) -> Vec<AppAction> {
        let now = self.env.now();
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };

        let updates = session.tick(now);
        if updates.is_empty() {
            return Vec::new();
        }

        let mut actions: Vec<AppAction> = updates.into_iter().map(AppAction::Notify).collect();
        actions.push(AppAction::Render);
        actions
    }

    /// Push `destination` onto the history.
    ///
    /// Ride details always track the ride named by their parameters: a
    /// running session for another booking is replaced by one started from
    /// the new parameters.
    ///
    /// # Errors
    ///
    /// - `SessionError::IncompleteBooking` if the destination is ride details
    ///   and its parameters cannot start a ride; the history and any running
    ///   session are left unchanged
    pub fn navigate_to(&mut self, destination: Destination) -> Result<Vec<AppAction>, SessionError> {
        let mut actions = Vec::new();

        if let Destination::RideDetails(params) = &destination
            && !self.session_serves(params)
        {
            actions.extend(self.start_from_params(params)?);
        }

        self.navigation.navigate_to(destination);
        actions.extend(self.bind_session());
        actions.push(AppAction::Render);
        Ok(actions)
    }

    /// Pop the current screen. Does nothing at the home screen.
    pub fn navigate_back(&mut self) -> Vec<AppAction> {
        if self.navigation.navigate_back().is_none() {
            return Vec::new();
        }

        let mut actions = self.bind_session();
        actions.push(AppAction::Render);
        actions
    }

    /// Home screen: open the booking screen for `pickup` and `dropoff`.
    ///
    /// Ignored unless both addresses are filled in.
    pub fn book_ride(&mut self, pickup: String, dropoff: String) -> Vec<AppAction> {
        if pickup.trim().is_empty() || dropoff.trim().is_empty() {
            tracing::debug!("booking ignored, pickup or dropoff missing");
            return Vec::new();
        }

        let destination = Destination::RideBooking(BookingParams { pickup, dropoff });
        self.navigate_to(destination).unwrap_or_else(|err| self.refuse(err))
    }

    /// Booking screen: start a ride with `ride` and open its details.
    ///
    /// # Errors
    ///
    /// - `SessionError::NoBookingParams` if the current screen has no booking
    ///   parameters
    /// - `SessionError::IncompleteBooking` if the booking is partial
    pub fn confirm_ride(&mut self, ride: RideOption) -> Result<Vec<AppAction>, SessionError> {
        let Some(BookingParams { pickup, dropoff }) =
            self.current_params().and_then(ScreenParams::as_booking).cloned()
        else {
            return Err(SessionError::NoBookingParams);
        };

        let mut actions = self.start_ride_session(
            Location::mock_pickup(pickup.clone()),
            Location::mock_dropoff(dropoff.clone()),
            ride.clone(),
        )?;
        actions.extend(self.navigate_to(Destination::RideDetails(RideDetailsParams {
            pickup,
            dropoff,
            ride,
        }))?);
        Ok(actions)
    }

    /// Start a ride session, replacing any existing one.
    ///
    /// # Errors
    ///
    /// - `SessionError::IncompleteBooking` if any field is missing; no session
    ///   is created and an existing one is kept
    pub fn start_ride_session(
        &mut self,
        pickup: Location,
        dropoff: Location,
        ride: RideOption,
    ) -> Result<Vec<AppAction>, SessionError> {
        let booking = RideBooking::new(pickup, dropoff, ride);
        let session = RideSession::start(booking, self.env.now(), &self.config.ride)?;
        let snapshot = session.snapshot();
        self.rides_started += 1;

        if let Some(mut previous) = self.session.replace(session) {
            previous.teardown();
            tracing::debug!("previous ride session replaced");
        }

        Ok(vec![AppAction::Notify(snapshot), AppAction::Render])
    }

    /// Cancel the ride in one step.
    ///
    /// Accepted cancellations notify the final state and return home.
    ///
    /// # Errors
    ///
    /// - `SessionError::NoActiveSession` if no ride is running
    pub fn cancel_ride_session(&mut self) -> Result<Vec<AppAction>, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        let outcome = session.cancel();
        Ok(self.finish_cancel(outcome))
    }

    /// First step of a cancellation.
    ///
    /// # Errors
    ///
    /// - `SessionError::NoActiveSession` if no ride is running
    pub fn request_cancel_ride(&mut self) -> Result<Vec<AppAction>, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        match session.request_cancel() {
            CancelRequest::ConfirmationRequired => Ok(vec![AppAction::PromptCancel]),
            CancelRequest::Rejected { status } => Ok(self.cancel_rejected(status)),
        }
    }

    /// Second step of a cancellation: the user confirmed.
    ///
    /// # Errors
    ///
    /// - `SessionError::NoActiveSession` if no ride is running
    /// - `SessionError::NoPendingCancel` if no cancellation was requested
    pub fn confirm_cancel_ride(&mut self) -> Result<Vec<AppAction>, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        let outcome = session.confirm_cancel()?;
        Ok(self.finish_cancel(outcome))
    }

    /// Second step of a cancellation: the user declined.
    ///
    /// # Errors
    ///
    /// - `SessionError::NoActiveSession` if no ride is running
    /// - `SessionError::NoPendingCancel` if no cancellation was requested
    pub fn decline_cancel_ride(&mut self) -> Result<Vec<AppAction>, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        session.decline_cancel()?;
        Ok(vec![AppAction::Render])
    }

    /// Driver card: call the driver.
    pub fn request_driver_call(&self) -> Vec<AppAction> {
        vec![AppAction::CallDriver { driver: self.driver.name.clone() }]
    }

    /// Driver card: message the driver.
    pub fn request_driver_message(&self) -> Vec<AppAction> {
        vec![AppAction::MessageDriver { driver: self.driver.name.clone() }]
    }

    /// Completed ride: go home to book another.
    pub fn book_another(&mut self) -> Vec<AppAction> {
        self.go_home()
    }

    /// Completed ride: rate it and go home.
    pub fn rate_ride(&mut self, stars: u8) -> Vec<AppAction> {
        let stars = stars.clamp(MIN_STARS, MAX_STARS);
        tracing::info!(stars, "ride rated");

        let message = "Thanks for the review!".to_string();
        self.status_message = Some(message.clone());

        let mut actions = vec![AppAction::Alert { message }];
        actions.extend(self.go_home());
        actions
    }

    /// Profile screen: open the logout prompt.
    pub fn request_logout(&mut self) -> Vec<AppAction> {
        self.logout_pending = true;
        vec![AppAction::PromptLogout]
    }

    /// Logout prompt accepted: return home.
    ///
    /// Ignored without an open prompt.
    pub fn confirm_logout(&mut self) -> Vec<AppAction> {
        if !std::mem::take(&mut self.logout_pending) {
            tracing::debug!("logout confirmation without prompt ignored");
            return Vec::new();
        }

        tracing::info!("logged out");
        self.status_message = Some("Logged out".to_string());
        self.go_home()
    }

    /// Logout prompt dismissed.
    pub fn decline_logout(&mut self) -> Vec<AppAction> {
        self.logout_pending = false;
        vec![AppAction::Render]
    }

    fn go_home(&mut self) -> Vec<AppAction> {
        self.navigation.navigate_to(Destination::Home);
        let mut actions = self.bind_session();
        actions.push(AppAction::Render);
        actions
    }

    fn start_from_params(&mut self, params: &RideDetailsParams) -> Result<Vec<AppAction>, SessionError> {
        self.start_ride_session(
            Location::mock_pickup(params.pickup.clone()),
            Location::mock_dropoff(params.dropoff.clone()),
            params.ride.clone(),
        )
    }

    /// Whether the running session is the ride `params` describe.
    fn session_serves(&self, params: &RideDetailsParams) -> bool {
        self.session.as_ref().is_some_and(|session| {
            session.pickup().address == params.pickup
                && session.dropoff().address == params.dropoff
                && session.ride() == &params.ride
        })
    }

    /// Keep the session bound to the ride details screen after a navigation.
    fn bind_session(&mut self) -> Vec<AppAction> {
        let on_details = self.navigation.current_screen() == Screen::RideDetails;

        if !on_details {
            if let Some(mut session) = self.session.take() {
                session.teardown();
                tracing::debug!(status = %session.status(), "ride session torn down");
            }
            return Vec::new();
        }

        let Some(params) = self.current_params().and_then(ScreenParams::as_ride_details).cloned()
        else {
            tracing::warn!("ride details shown without parameters");
            return Vec::new();
        };

        if self.session_serves(&params) {
            return Vec::new();
        }

        self.start_from_params(&params).unwrap_or_else(|err| {
            tracing::warn!(%err, "ride details parameters cannot restart the ride");
            Vec::new()
        })
    }

    fn finish_cancel(&mut self, outcome: CancelOutcome) -> Vec<AppAction> {
        let CancelOutcome::Rejected { status } = outcome else {
            let snapshot = self.ride_snapshot();
            self.status_message = Some("Ride cancelled".to_string());
            let mut actions: Vec<AppAction> = snapshot.into_iter().map(AppAction::Notify).collect();
            actions.extend(self.go_home());
            return actions;
        };

        self.cancel_rejected(status)
    }

    fn cancel_rejected(&mut self, status: RideStatus) -> Vec<AppAction> {
        self.status_message = Some(format!("Ride can no longer be cancelled: {status}"));
        vec![AppAction::CancelRejected { status }, AppAction::Render]
    }

    fn refuse(&mut self, err: SessionError) -> Vec<AppAction> {
        tracing::warn!(%err, "operation refused");
        self.status_message = Some(format!("Error: {err}"));
        vec![AppAction::Error(err), AppAction::Render]
    }
}
