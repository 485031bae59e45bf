//! Ride and navigation invariants.
//!
//! Each run step is reduced to a [`SystemSnapshot`] (screen, history depth and
//! the ride's observable fields, plus the status trail of the current ride)
//! and every check in [`InvariantRegistry::standard`] is evaluated on it.
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let mut recorder = SnapshotRecorder::new();
//! registry.check_all(&recorder.observe(&app))?;
//! ```

mod checks;
mod snapshot;

pub use checks::{
    CancelBeforeArrival, HistoryNonEmpty, NoDriverAfterArrival, StatusMonotonicity,
    TerminalRideHasNoTimers,
};
pub use snapshot::{AppSnapshot, RideSnapshot, SnapshotRecorder, SystemSnapshot};

/// Outcome of one check.
pub type InvariantResult = Result<(), Violation>;

/// A broken invariant, named, with what was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Check that failed.
    pub invariant: &'static str,
    /// Observed state that broke it.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of the app that holds after every step of a run.
pub trait Invariant: Send + Sync {
    /// Short snake_case name used in reports.
    fn name(&self) -> &'static str;

    /// Evaluate against one snapshot.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;

    /// Violation of this check carrying `message`.
    fn violation(&self, message: String) -> Violation {
        Violation { invariant: self.name(), message }
    }
}

/// The ride and navigation checks, evaluated together.
pub struct InvariantRegistry {
    checks: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// All ride and navigation checks:
    ///
    /// - [`HistoryNonEmpty`]
    /// - [`StatusMonotonicity`]
    /// - [`NoDriverAfterArrival`]
    /// - [`TerminalRideHasNoTimers`]
    /// - [`CancelBeforeArrival`]
    pub fn standard() -> Self {
        Self {
            checks: vec![
                Box::new(HistoryNonEmpty),
                Box::new(StatusMonotonicity),
                Box::new(NoDriverAfterArrival),
                Box::new(TerminalRideHasNoTimers),
                Box::new(CancelBeforeArrival),
            ],
        }
    }

    /// Run every check; collects all failures rather than stopping at the first.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.checks.iter().filter_map(|check| check.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// [`Self::check_all`] for tests and fuzz targets: panics listing every
    /// failure, tagged with `context`.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let lines: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("ride invariants broken {context}:\n  {}", lines.join("\n  "));
        }
    }
}
