//! Integration tests for App behavior on a virtual clock.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - the screen and history reflect the navigation performed
//! - the ride status matches the virtual time elapsed
//! - the notifications describe every change in order

use std::time::Duration;

use ridehail_app::{App, AppAction, AppConfig, AppEvent};
use ridehail_core::{
    BookingParams, Destination, Location, NavigationConfig, ParamScope, RideDetailsParams,
    RideOption, RideStatus, RideUpdate, Screen, ScreenParams, SessionError, SessionPhase,
};
use ridehail_harness::SimEnv;

const STATUS_TICK: Duration = Duration::from_secs(10);
const POSITION_TICK: Duration = Duration::from_secs(3);

fn economy() -> RideOption {
    RideOption::new("economy", "Economy", 12.99, 15, 4)
}

fn app_with(scope: ParamScope) -> (App<SimEnv>, SimEnv) {
    let env = SimEnv::new();
    let config = AppConfig { navigation: NavigationConfig { param_scope: scope }, ..AppConfig::default() };
    (App::new(env.clone(), config), env)
}

fn app() -> (App<SimEnv>, SimEnv) {
    app_with(ParamScope::PerScreen)
}

fn notifications(actions: &[AppAction]) -> Vec<RideUpdate> {
    actions
        .iter()
        .filter_map(|action| match action {
            AppAction::Notify(update) => Some(update.clone()),
            _ => None,
        })
        .collect()
}

/// Advance the clock one status period at a time, ticking after each.
fn advance_status_ticks(app: &mut App<SimEnv>, env: &SimEnv, n: u32) -> Vec<RideUpdate> {
    let mut updates = Vec::new();
    for _ in 0..n {
        env.advance(STATUS_TICK);
        updates.extend(notifications(&app.handle(AppEvent::Tick)));
    }
    updates
}

#[test]
fn booking_flow_runs_to_completion() {
    let (mut app, env) = app();

    app.navigate_to(Destination::RideBooking(BookingParams {
        pickup: "X".into(),
        dropoff: "Y".into(),
    }))
    .unwrap_or_default();
    assert_eq!(app.current_screen(), Screen::RideBooking);

    let started = app
        .start_ride_session(Location::mock_pickup("X"), Location::mock_dropoff("Y"), economy())
        .unwrap_or_default();
    assert_eq!(notifications(&started).first().map(|u| u.status_index), Some(0));

    app.navigate_to(Destination::RideDetails(RideDetailsParams {
        pickup: "X".into(),
        dropoff: "Y".into(),
        ride: economy(),
    }))
    .unwrap_or_default();
    assert_eq!(app.current_screen(), Screen::RideDetails);
    assert_eq!(app.rides_started(), 1);
    assert_eq!(
        app.current_params().and_then(ScreenParams::as_ride_details).map(|p| p.ride.name.as_str()),
        Some("Economy")
    );

    advance_status_ticks(&mut app, &env, 6);

    let snapshot = app.ride_snapshot();
    assert_eq!(snapshot.as_ref().map(|s| s.status_index), Some(5));
    assert_eq!(snapshot.as_ref().map(|s| s.status_label), Some("Ride Completed"));
    assert_eq!(snapshot.map(|s| s.phase), Some(SessionPhase::Completed));
    assert_eq!(app.time_until_next(), None);
}

#[test]
fn booking_params_round_trip() {
    let (mut app, _) = app();
    app.navigate_to(Destination::RideBooking(BookingParams {
        pickup: "X".into(),
        dropoff: "Y".into(),
    }))
    .unwrap_or_default();

    let params = app.current_params().and_then(ScreenParams::as_booking);
    assert_eq!(params, Some(&BookingParams { pickup: "X".into(), dropoff: "Y".into() }));
}

#[test]
fn back_at_root_is_a_no_op() {
    let (mut app, _) = app();
    assert!(app.navigate_back().is_empty());
    assert_eq!(app.navigation().len(), 1);
    assert_eq!(app.current_screen(), Screen::Home);
}

#[test]
fn status_changes_notify_in_order() {
    let (mut app, env) = app();
    app.book_ride("X".into(), "Y".into());
    app.confirm_ride(economy()).unwrap_or_default();

    let updates = advance_status_ticks(&mut app, &env, 5);
    let statuses: Vec<u8> = updates.iter().map(|u| u.status_index).collect();

    assert!(statuses.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(statuses.last(), Some(&5));
    assert!(updates.iter().filter(|u| u.status_index >= 3).all(|u| u.driver_location.is_none()));
}

#[test]
fn driver_moves_two_deltas_in_two_position_ticks() {
    let (mut app, env) = app();
    app.book_ride("X".into(), "Y".into());
    app.confirm_ride(economy()).unwrap_or_default();

    env.advance(POSITION_TICK * 2);
    let updates = notifications(&app.handle(AppEvent::Tick));
    assert_eq!(updates.len(), 2);

    let start = app.config().ride.driver_start.clone();
    let location = app.ride().and_then(|s| s.driver_location().cloned());
    let moved = location.map(|l| (l.latitude - start.latitude, l.longitude - start.longitude));
    let (lat, lng) = moved.unwrap_or_default();
    assert!((lat - 0.004).abs() < 1e-9);
    assert!((lng - 0.004).abs() < 1e-9);
}

#[test]
fn cancel_at_arriving_is_accepted() {
    let (mut app, env) = app();
    app.book_ride("X".into(), "Y".into());
    app.confirm_ride(economy()).unwrap_or_default();
    advance_status_ticks(&mut app, &env, 2);

    let actions = app.cancel_ride_session().unwrap_or_default();
    let last = notifications(&actions).pop();
    assert_eq!(last.as_ref().map(|u| u.phase), Some(SessionPhase::Cancelled));
    assert_eq!(last.map(|u| u.status_index), Some(2));
    assert_eq!(app.current_screen(), Screen::Home);

    // Nothing keeps ticking after the ride was cancelled.
    env.advance(STATUS_TICK * 10);
    assert!(app.handle(AppEvent::Tick).is_empty());
}

#[test]
fn cancel_after_arrival_is_rejected() {
    let (mut app, env) = app();
    app.book_ride("X".into(), "Y".into());
    app.confirm_ride(economy()).unwrap_or_default();
    advance_status_ticks(&mut app, &env, 3);

    let actions = app.cancel_ride_session().unwrap_or_default();
    assert_eq!(actions.first(), Some(&AppAction::CancelRejected { status: RideStatus::Arrived }));
    assert_eq!(app.ride().map(|s| s.status().index()), Some(3));
    assert!(app.ride().is_some_and(|s| s.driver_location().is_none()));

    advance_status_ticks(&mut app, &env, 1);
    assert!(app.ride().is_some_and(|s| s.driver_location().is_none()));
}

#[test]
fn incomplete_session_start_is_refused() {
    let (mut app, _) = app();
    let result =
        app.start_ride_session(Location::mock_pickup("X"), Location::mock_dropoff(""), economy());

    assert_eq!(result, Err(SessionError::IncompleteBooking { field: "dropoff" }));
    assert!(app.ride().is_none());
}

#[test]
fn two_bookings_overwrite_params_per_screen() {
    let (mut app, _) = app();

    app.book_ride("A".into(), "B".into());
    app.navigate_to(Destination::Payment).unwrap_or_default();
    app.book_ride("C".into(), "D".into());
    app.navigate_back();
    app.navigate_back();

    // Back on the first booking entry, which now reads the second booking.
    assert_eq!(app.current_screen(), Screen::RideBooking);
    let params = app.current_params().and_then(ScreenParams::as_booking).cloned();
    assert_eq!(params.map(|p| p.pickup), Some("C".to_string()));
}

#[test]
fn two_bookings_keep_their_params_per_entry() {
    let (mut app, _) = app_with(ParamScope::PerEntry);

    app.book_ride("A".into(), "B".into());
    app.navigate_to(Destination::Payment).unwrap_or_default();
    app.book_ride("C".into(), "D".into());
    app.navigate_back();
    app.navigate_back();

    assert_eq!(app.current_screen(), Screen::RideBooking);
    let params = app.current_params().and_then(ScreenParams::as_booking).cloned();
    assert_eq!(params.map(|p| p.pickup), Some("A".to_string()));
}

fn premium() -> RideOption {
    RideOption::new("premium", "Premium", 25.99, 15, 4)
}

fn details_for(ride: RideOption) -> Destination {
    Destination::RideDetails(RideDetailsParams { pickup: "X".into(), dropoff: "Y".into(), ride })
}

/// Ride names seen by the shown params, the session and the view model.
fn shown_ride_names(app: &App<SimEnv>) -> [Option<String>; 3] {
    [
        app.current_params().and_then(ScreenParams::as_ride_details).map(|p| p.ride.name.clone()),
        app.ride().map(|s| s.ride().name.clone()),
        app.ride_view().map(|v| v.ride_name),
    ]
}

#[test]
fn details_twice_follow_the_latest_ride() {
    let (mut app, env) = app();

    app.navigate_to(details_for(economy())).unwrap_or_default();
    advance_status_ticks(&mut app, &env, 2);
    app.navigate_to(details_for(premium())).unwrap_or_default();

    let premium_name = Some("Premium".to_string());
    assert_eq!(shown_ride_names(&app), [premium_name.clone(), premium_name.clone(), premium_name]);
    assert_eq!(app.rides_started(), 2);
    assert_eq!(app.ride().map(|s| s.status().index()), Some(0));
}

#[test]
fn back_to_earlier_details_entry_rebinds_its_ride() {
    let (mut app, _) = app_with(ParamScope::PerEntry);

    app.navigate_to(details_for(economy())).unwrap_or_default();
    app.navigate_to(details_for(premium())).unwrap_or_default();
    app.navigate_back();

    let economy_name = Some("Economy".to_string());
    assert_eq!(shown_ride_names(&app), [economy_name.clone(), economy_name.clone(), economy_name]);
    assert_eq!(app.rides_started(), 3);
}

#[test]
fn ride_view_follows_progress() {
    let (mut app, env) = app();
    app.book_ride("Main St".into(), "Airport".into());
    app.confirm_ride(economy()).unwrap_or_default();
    advance_status_ticks(&mut app, &env, 2);

    let view = app.ride_view();
    assert_eq!(view.as_ref().map(|v| v.headline), Some("Ride in Progress"));
    assert_eq!(view.as_ref().map(|v| v.show_cancel), Some(true));
    let detail = view.and_then(|v| v.current_step().and_then(|s| s.detail.clone()));
    assert_eq!(detail.as_deref(), Some("Driver is 3 min away"));
}
