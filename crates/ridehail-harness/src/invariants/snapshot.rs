//! Copies of the App's observable state taken between steps, so every check
//! in one pass sees the same state.

use ridehail_app::App;
use ridehail_core::{Environment, Location, RideStatus, Screen, SessionPhase};

/// Snapshot of the App plus the history needed for temporal checks.
#[derive(Debug, Clone)]
pub struct SystemSnapshot {
    /// Current App state.
    pub app: AppSnapshot,
    /// Statuses observed for the current ride, oldest first. Empty when no
    /// ride is running.
    pub status_history: Vec<RideStatus>,
}

impl SystemSnapshot {
    /// Snapshot of a fresh App on the home screen.
    pub fn empty() -> Self {
        Self { app: AppSnapshot::home(), status_history: Vec::new() }
    }

    /// Snapshot without history.
    pub fn single(app: AppSnapshot) -> Self {
        let status_history = app.ride.iter().map(|ride| ride.status).collect();
        Self { app, status_history }
    }
}

/// Snapshot of the App's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    /// Screen on top of the history.
    pub screen: Screen,
    /// Number of history entries.
    pub history_len: usize,
    /// Sessions started so far.
    pub rides_started: u64,
    /// Active ride. `None` if no session exists.
    pub ride: Option<RideSnapshot>,
}

impl AppSnapshot {
    /// Fresh App on the home screen.
    pub fn home() -> Self {
        Self { screen: Screen::Home, history_len: 1, rides_started: 0, ride: None }
    }

    /// Capture `app`.
    pub fn from_app<E: Environment>(app: &App<E>) -> Self {
        Self {
            screen: app.current_screen(),
            history_len: app.navigation().len(),
            rides_started: app.rides_started(),
            ride: app.ride().map(|session| RideSnapshot {
                status: session.status(),
                phase: session.phase(),
                driver_location: session.driver_location().cloned(),
                live_timers: session.has_live_timers(),
            }),
        }
    }
}

/// Snapshot of a ride session.
#[derive(Debug, Clone, PartialEq)]
pub struct RideSnapshot {
    /// Current status.
    pub status: RideStatus,
    /// Session phase.
    pub phase: SessionPhase,
    /// Driver marker.
    pub driver_location: Option<Location>,
    /// Any timer can still fire.
    pub live_timers: bool,
}

/// Builds [`SystemSnapshot`]s from successive observations of one App.
///
/// Status history restarts whenever a new session replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecorder {
    rides_started: u64,
    status_history: Vec<RideStatus>,
}

impl SnapshotRecorder {
    /// Create a recorder with no observations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `app` and return the snapshot including history.
    pub fn observe<E: Environment>(&mut self, app: &App<E>) -> SystemSnapshot {
        let snapshot = AppSnapshot::from_app(app);

        if snapshot.rides_started != self.rides_started {
            self.rides_started = snapshot.rides_started;
            self.status_history.clear();
        }

        match &snapshot.ride {
            Some(ride) => self.status_history.push(ride.status),
            None => self.status_history.clear(),
        }

        SystemSnapshot { app: snapshot, status_history: self.status_history.clone() }
    }
}
