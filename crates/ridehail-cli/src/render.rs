//! Plain text screens.
//!
//! Each render produces the whole screen as one string. Ride details are
//! drawn from [`RideView`], so the console shows exactly what the view model
//! derives.

use ridehail_app::{App, RideView, StepState};
use ridehail_core::{Environment, Screen, ScreenParams};

use crate::catalog;

/// Render the current screen of `app`.
pub fn screen<E: Environment>(app: &App<E>) -> String {
    let mut lines = match app.current_screen() {
        Screen::Home => vec![
            "== Home ==".to_string(),
            "Where to? book <pickup> to <dropoff>".to_string(),
        ],
        Screen::RideBooking => ride_booking(app.current_params()),
        Screen::RideDetails => match app.ride_view() {
            Some(view) => ride_details(&view, app),
            None => vec!["== Ride Details ==".to_string(), "No active ride".to_string()],
        },
        Screen::Driver => {
            let driver = app.driver_profile();
            vec![
                "== Driver ==".to_string(),
                format!("{} ({:.1})", driver.name, driver.rating),
                format!(
                    "{} {} {}",
                    driver.vehicle.color, driver.vehicle.model, driver.vehicle.license_plate
                ),
            ]
        },
        Screen::Rides => vec!["== Your Rides ==".to_string(), "No past rides".to_string()],
        Screen::Payment => vec!["== Payment ==".to_string(), "Cash".to_string()],
        Screen::Profile => vec!["== Profile ==".to_string(), "Actions: logout".to_string()],
    };

    if let Some(message) = app.status_message() {
        lines.push(format!("> {message}"));
    }
    lines.join("\n")
}

fn ride_booking(params: Option<&ScreenParams>) -> Vec<String> {
    let mut lines = vec!["== Choose a Ride ==".to_string()];
    if let Some(params) = params.and_then(ScreenParams::as_booking) {
        lines.push(format!("From: {}", params.pickup));
        lines.push(format!("To:   {}", params.dropoff));
    }
    lines.extend(catalog::ride_options().into_iter().map(|option| {
        format!(
            "  {:<8} {:>7}  {} min  {} seats",
            option.id,
            option.price_label(),
            option.estimated_minutes,
            option.capacity
        )
    }));
    lines.push("Actions: ride <tier>".to_string());
    lines
}

fn ride_details<E: Environment>(view: &RideView, app: &App<E>) -> Vec<String> {
    let mut lines = vec![
        format!("== {} ==", view.headline),
        format!("{} {}", view.ride_name, view.fare),
        format!("From: {}", view.pickup),
        format!("To:   {}", view.dropoff),
    ];

    for step in &view.timeline {
        let marker = match step.state {
            StepState::Done => "[x]",
            StepState::Current => "[>]",
            StepState::Pending => "[ ]",
        };
        match &step.detail {
            Some(detail) => lines.push(format!("  {marker} {}: {detail}", step.status)),
            None => lines.push(format!("  {marker} {}", step.status)),
        }
    }

    if let Some(location) = &view.driver_location {
        lines.push(format!("Driver at {:.4}, {:.4}", location.latitude, location.longitude));
    }
    if view.show_driver_card {
        let driver = app.driver_profile();
        lines.push(format!(
            "Driver: {} ({:.1}), {} {}",
            driver.name, driver.rating, driver.vehicle.color, driver.vehicle.model
        ));
    }

    let mut actions = Vec::new();
    if view.show_cancel {
        actions.push("cancel");
    }
    if view.show_driver_card {
        actions.extend(["call", "message"]);
    }
    if view.show_completion_actions {
        actions.extend(["another", "rate <1-5>"]);
    }
    lines.push(format!("Actions: {}", actions.join(", ")));
    lines
}
