//! Fuzz target for the navigation stack
//!
//! # Strategy
//!
//! - Pushes to every screen, with and without parameters
//! - Back presses at arbitrary depths, including at the root
//! - Both parameter storage policies
//!
//! # Invariants
//!
//! - History NEVER empties
//! - Back at the root is a no-op and returns nothing
//! - The root entry is always home
//! - Per-entry storage returns the parameters an entry was pushed with

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ridehail_core::{
    BookingParams, Destination, NavigationConfig, NavigationStack, ParamScope, RideDetailsParams,
    RideOption, Screen, ScreenParams,
};

#[derive(Debug, Clone, Arbitrary)]
struct Scenario {
    per_entry: bool,
    ops: Vec<NavOp>,
}

#[derive(Debug, Clone, Arbitrary)]
enum NavOp {
    Plain(u8),
    Booking { pickup: String, dropoff: String },
    Details { pickup: String, dropoff: String, tier: u8 },
    Back,
}

fn plain(choice: u8) -> Destination {
    match choice % 5 {
        0 => Destination::Home,
        1 => Destination::Driver,
        2 => Destination::Rides,
        3 => Destination::Payment,
        _ => Destination::Profile,
    }
}

fuzz_target!(|scenario: Scenario| {
    let scope = if scenario.per_entry { ParamScope::PerEntry } else { ParamScope::PerScreen };
    let mut stack = NavigationStack::new(NavigationConfig { param_scope: scope });
    let mut depth = 1usize;

    for op in scenario.ops {
        let destination = match op {
            NavOp::Back => {
                let popped = stack.navigate_back();
                assert_eq!(popped.is_some(), depth > 1, "back at root must be a no-op");
                depth = depth.saturating_sub(1).max(1);
                assert!(stack.len() >= 1);
                continue;
            },
            NavOp::Plain(choice) => plain(choice),
            NavOp::Booking { pickup, dropoff } => {
                Destination::RideBooking(BookingParams { pickup, dropoff })
            },
            NavOp::Details { pickup, dropoff, tier } => {
                let ride = RideOption::new(format!("tier-{tier}"), "Tier", f64::from(tier), 15, 4);
                Destination::RideDetails(RideDetailsParams { pickup, dropoff, ride })
            },
        };

        let (screen, params) = destination.clone().into_parts();
        stack.navigate_to(destination);
        depth += 1;

        assert_eq!(stack.len(), depth);
        assert_eq!(stack.current_screen(), screen);
        if let Some(params) = params {
            let current: Option<&ScreenParams> = stack.current_params();
            assert_eq!(current, Some(&params), "fresh params must be visible");
        }
    }

    let root = stack.history().next().map(|entry| entry.screen);
    assert_eq!(root, Some(Screen::Home));

    while stack.navigate_back().is_some() {}
    assert_eq!(stack.len(), 1);
    assert!(stack.is_at_root());
});
