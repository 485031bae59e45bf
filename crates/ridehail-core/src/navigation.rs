//! Stack-based screen navigation with per-destination parameters.
//!
//! The [`NavigationStack`] records where the user is and carries parameters
//! from the calling screen to the screen it navigates to.
//!
//! # Invariants
//!
//! - The history always holds at least the root entry. The root is stored
//!   apart from the pushed entries, so popping can never remove it.
//! - History grows only through [`NavigationStack::navigate_to`] and shrinks
//!   only through [`NavigationStack::navigate_back`].
//!
//! # Parameter scoping
//!
//! Parameters are typed per destination ([`Destination`]), so a screen that
//! needs data cannot be reached without it. Where they are stored is set by
//! [`ParamScope`]. With the default [`ParamScope::PerScreen`] the last
//! parameters written for a screen replace earlier ones for every entry of
//! that screen, including entries revisited by going back.
//! [`ParamScope::PerEntry`] keeps each entry's own parameters instead.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::location::RideOption;

/// A navigable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    /// Location entry and booking start.
    Home,
    /// Ride tier selection for a pickup/dropoff pair.
    RideBooking,
    /// Live view of an active ride.
    RideDetails,
    /// Driver view.
    Driver,
    /// Past rides.
    Rides,
    /// Payment methods.
    Payment,
    /// User profile.
    Profile,
}

impl Screen {
    /// Every screen, in declaration order.
    pub const ALL: [Screen; 7] = [
        Screen::Home,
        Screen::RideBooking,
        Screen::RideDetails,
        Screen::Driver,
        Screen::Rides,
        Screen::Payment,
        Screen::Profile,
    ];

    /// Stable kebab-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::RideBooking => "ride-booking",
            Screen::RideDetails => "ride-details",
            Screen::Driver => "driver",
            Screen::Rides => "rides",
            Screen::Payment => "payment",
            Screen::Profile => "profile",
        }
    }

    /// Whether the top navigation bar is shown on this screen.
    pub fn shows_navbar(self) -> bool {
        matches!(self, Screen::Home | Screen::Rides | Screen::Payment)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown screen identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown screen: {0}")]
pub struct UnknownScreen(pub String);

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| UnknownScreen(s.to_string()))
    }
}

/// Parameters for [`Screen::RideBooking`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingParams {
    /// Pickup address label.
    pub pickup: String,
    /// Dropoff address label.
    pub dropoff: String,
}

/// Parameters for [`Screen::RideDetails`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideDetailsParams {
    /// Pickup address label.
    pub pickup: String,
    /// Dropoff address label.
    pub dropoff: String,
    /// Chosen ride tier.
    pub ride: RideOption,
}

/// Parameters recorded for a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "kebab-case")]
pub enum ScreenParams {
    /// Ride booking parameters.
    RideBooking(BookingParams),
    /// Ride details parameters.
    RideDetails(RideDetailsParams),
}

impl ScreenParams {
    /// Screen these parameters belong to.
    pub fn screen(&self) -> Screen {
        match self {
            ScreenParams::RideBooking(_) => Screen::RideBooking,
            ScreenParams::RideDetails(_) => Screen::RideDetails,
        }
    }

    /// Booking parameters, if these are for the booking screen.
    pub fn as_booking(&self) -> Option<&BookingParams> {
        match self {
            ScreenParams::RideBooking(params) => Some(params),
            ScreenParams::RideDetails(_) => None,
        }
    }

    /// Ride details parameters, if these are for the ride details screen.
    pub fn as_ride_details(&self) -> Option<&RideDetailsParams> {
        match self {
            ScreenParams::RideDetails(params) => Some(params),
            ScreenParams::RideBooking(_) => None,
        }
    }
}

/// A typed navigation request.
///
/// Destinations that need parameters carry them, so a navigation call only
/// compiles if it supplies what the screen reads.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// Go to [`Screen::Home`].
    Home,
    /// Go to [`Screen::RideBooking`].
    RideBooking(BookingParams),
    /// Go to [`Screen::RideDetails`].
    RideDetails(RideDetailsParams),
    /// Go to [`Screen::Driver`].
    Driver,
    /// Go to [`Screen::Rides`].
    Rides,
    /// Go to [`Screen::Payment`].
    Payment,
    /// Go to [`Screen::Profile`].
    Profile,
}

impl Destination {
    /// Screen this destination opens.
    pub fn screen(&self) -> Screen {
        match self {
            Destination::Home => Screen::Home,
            Destination::RideBooking(_) => Screen::RideBooking,
            Destination::RideDetails(_) => Screen::RideDetails,
            Destination::Driver => Screen::Driver,
            Destination::Rides => Screen::Rides,
            Destination::Payment => Screen::Payment,
            Destination::Profile => Screen::Profile,
        }
    }

    /// Split into the target screen and its parameters.
    pub fn into_parts(self) -> (Screen, Option<ScreenParams>) {
        match self {
            Destination::RideBooking(params) => {
                (Screen::RideBooking, Some(ScreenParams::RideBooking(params)))
            },
            Destination::RideDetails(params) => {
                (Screen::RideDetails, Some(ScreenParams::RideDetails(params)))
            },
            other => (other.screen(), None),
        }
    }
}

/// One visited screen.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEntry {
    /// Screen shown by this entry.
    pub screen: Screen,
    /// Parameters supplied when this entry was pushed.
    pub params: Option<ScreenParams>,
}

impl NavigationEntry {
    fn root() -> Self {
        Self { screen: Screen::Home, params: None }
    }
}

/// Where navigation parameters are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamScope {
    /// One slot per screen. A later write replaces the earlier one for all
    /// entries of that screen.
    #[default]
    PerScreen,
    /// Each entry keeps the parameters it was pushed with. Entries pushed
    /// without parameters fall back to the last ones written for the screen.
    PerEntry,
}

impl FromStr for ParamScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-screen" => Ok(Self::PerScreen),
            "per-entry" => Ok(Self::PerEntry),
            other => Err(format!("unknown parameter scope: {other}")),
        }
    }
}

/// Navigation configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationConfig {
    /// Parameter storage policy.
    pub param_scope: ParamScope,
}

/// Screen history with per-destination parameters.
///
/// Single writer: only the owner calls [`navigate_to`](Self::navigate_to)
/// and [`navigate_back`](Self::navigate_back). Everything else reads.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    /// Entry that is never popped.
    root: NavigationEntry,
    /// Entries pushed on top of the root, oldest first.
    pushed: Vec<NavigationEntry>,
    /// Last parameters written per screen.
    params_by_screen: HashMap<Screen, ScreenParams>,
    /// Configuration.
    config: NavigationConfig,
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}

impl NavigationStack {
    /// Create a stack holding only the home screen.
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            root: NavigationEntry::root(),
            pushed: Vec::new(),
            params_by_screen: HashMap::new(),
            config,
        }
    }

    /// Push a new entry for `destination`.
    ///
    /// Parameters carried by the destination are recorded for its screen.
    /// No validation of their contents happens here.
    pub fn navigate_to(&mut self, destination: Destination) -> &NavigationEntry {
        let (screen, params) = destination.into_parts();

        if let Some(params) = &params {
            let replaced = self.params_by_screen.insert(screen, params.clone()).is_some();
            if replaced {
                tracing::debug!(%screen, "replaced parameters recorded for screen");
            }
        }

        self.pushed.push(NavigationEntry { screen, params });
        tracing::debug!(%screen, depth = self.len(), "navigated forward");

        self.current_entry()
    }

    /// Pop the current entry and return it.
    ///
    /// At the root this does nothing and returns `None`.
    pub fn navigate_back(&mut self) -> Option<NavigationEntry> {
        let popped = self.pushed.pop()?;
        tracing::debug!(from = %popped.screen, to = %self.current_screen(), "navigated back");
        Some(popped)
    }

    /// Entry at the top of the history.
    pub fn current_entry(&self) -> &NavigationEntry {
        self.pushed.last().unwrap_or(&self.root)
    }

    /// Screen at the top of the history.
    pub fn current_screen(&self) -> Screen {
        self.current_entry().screen
    }

    /// Parameters for the current screen. `None` if none were recorded.
    pub fn current_params(&self) -> Option<&ScreenParams> {
        let entry = self.current_entry();
        let by_screen = self.params_by_screen.get(&entry.screen);

        match self.config.param_scope {
            ParamScope::PerScreen => by_screen,
            ParamScope::PerEntry => entry.params.as_ref().or(by_screen),
        }
    }

    /// Entries from root to current.
    pub fn history(&self) -> impl Iterator<Item = &NavigationEntry> {
        std::iter::once(&self.root).chain(self.pushed.iter())
    }

    /// Number of entries, root included. Always at least one.
    pub fn len(&self) -> usize {
        self.pushed.len() + 1
    }

    /// Whether only the root entry remains.
    pub fn is_at_root(&self) -> bool {
        self.pushed.is_empty()
    }

    /// Parameter storage policy in effect.
    pub fn param_scope(&self) -> ParamScope {
        self.config.param_scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(pickup: &str, dropoff: &str) -> Destination {
        Destination::RideBooking(BookingParams {
            pickup: pickup.to_string(),
            dropoff: dropoff.to_string(),
        })
    }

    fn details(name: &str) -> Destination {
        Destination::RideDetails(RideDetailsParams {
            pickup: "A".to_string(),
            dropoff: "B".to_string(),
            ride: RideOption::new(name.to_lowercase(), name, 10.0, 15, 4),
        })
    }

    fn ride_name(stack: &NavigationStack) -> Option<&str> {
        stack.current_params().and_then(ScreenParams::as_ride_details).map(|p| p.ride.name.as_str())
    }

    #[test]
    fn starts_at_home() {
        let stack = NavigationStack::default();
        assert_eq!(stack.current_screen(), Screen::Home);
        assert_eq!(stack.len(), 1);
        assert!(stack.is_at_root());
        assert!(stack.current_params().is_none());
    }

    #[test]
    fn back_at_root_is_noop() {
        let mut stack = NavigationStack::default();
        assert!(stack.navigate_back().is_none());
        assert!(stack.navigate_back().is_none());
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current_screen(), Screen::Home);
    }

    #[test]
    fn booking_params_are_readable() {
        let mut stack = NavigationStack::default();
        stack.navigate_to(booking("A", "B"));

        assert_eq!(stack.current_screen(), Screen::RideBooking);
        let params = stack.current_params().and_then(ScreenParams::as_booking);
        assert_eq!(
            params,
            Some(&BookingParams { pickup: "A".to_string(), dropoff: "B".to_string() })
        );
    }

    #[test]
    fn back_pops_and_returns_entry() {
        let mut stack = NavigationStack::default();
        stack.navigate_to(Destination::Profile);
        stack.navigate_to(Destination::Payment);

        let popped = stack.navigate_back();
        assert_eq!(popped.map(|e| e.screen), Some(Screen::Payment));
        assert_eq!(stack.current_screen(), Screen::Profile);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn screen_without_params_reads_none() {
        let mut stack = NavigationStack::default();
        stack.navigate_to(Destination::Rides);
        assert!(stack.current_params().is_none());
    }

    #[test]
    fn per_screen_second_write_replaces_first() {
        let mut stack = NavigationStack::default();
        stack.navigate_to(details("Economy"));
        stack.navigate_to(details("Premium"));
        assert_eq!(ride_name(&stack), Some("Premium"));

        // Going back to the first entry still reads the second write.
        stack.navigate_back();
        assert_eq!(stack.current_screen(), Screen::RideDetails);
        assert_eq!(ride_name(&stack), Some("Premium"));
    }

    #[test]
    fn per_entry_keeps_each_entry_params() {
        let mut stack = NavigationStack::new(NavigationConfig { param_scope: ParamScope::PerEntry });
        stack.navigate_to(details("Economy"));
        stack.navigate_to(details("Premium"));
        assert_eq!(ride_name(&stack), Some("Premium"));

        stack.navigate_back();
        assert_eq!(ride_name(&stack), Some("Economy"));
    }

    #[test]
    fn screen_ids_round_trip() {
        for screen in Screen::ALL {
            assert_eq!(screen.as_str().parse::<Screen>(), Ok(screen));
        }
        assert!("checkout".parse::<Screen>().is_err());
    }

    #[test]
    fn history_lists_root_first() {
        let mut stack = NavigationStack::default();
        stack.navigate_to(Destination::Profile);
        let screens: Vec<_> = stack.history().map(|e| e.screen).collect();
        assert_eq!(screens, vec![Screen::Home, Screen::Profile]);
    }
}
