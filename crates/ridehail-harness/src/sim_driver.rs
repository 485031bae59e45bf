//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` replays a script of events and clock advances on a [`SimEnv`],
//! and records everything the runtime renders or presents. It implements
//! [`Driver`] so the same [`ridehail_app::Runtime`] orchestration code runs in
//! both the command line frontend and simulation.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use ridehail_app::{App, AppAction, AppEvent, Driver};
use ridehail_core::{Environment, RideUpdate, Screen};

use crate::{
    invariants::{InvariantRegistry, SnapshotRecorder, Violation},
    sim_env::SimEnv,
};

/// Error type for simulation driver.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SimDriverError {
    /// A render observed state that breaks an invariant.
    #[error("invariant violation after {context}: {}", format_violations(.violations))]
    InvariantViolation {
        /// Render that observed the violation.
        context: String,
        /// Every violated invariant.
        violations: Vec<Violation>,
    },
}

fn format_violations(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Deliver an event.
    Event(AppEvent),
    /// Move the virtual clock forward, then deliver a tick.
    Advance(Duration),
}

/// What a render showed.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    /// Virtual time of the render.
    pub at: Duration,
    /// Screen on top of the history.
    pub screen: Screen,
    /// Ride state. `None` without a session.
    pub ride: Option<RideUpdate>,
}

/// Shared state between the driver and its inspection handles.
#[derive(Default)]
struct SharedState {
    script: VecDeque<Step>,
    frames: Vec<RenderedFrame>,
    presented: Vec<AppAction>,
    recorder: SnapshotRecorder,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Clones share their state, so a test keeps one clone to inspect what the
/// runtime rendered after [`ridehail_app::Runtime::run`] consumed the other.
#[derive(Clone)]
pub struct SimDriver {
    env: SimEnv,
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
}

impl SimDriver {
    /// Create a driver with an empty script on `env`.
    pub fn new(env: SimEnv) -> Self {
        Self { env, state: Arc::default(), invariants: None }
    }

    /// Check invariants on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    /// Append an event to the script.
    pub fn push_event(&self, event: AppEvent) {
        self.state().script.push_back(Step::Event(event));
    }

    /// Append a clock advance to the script.
    pub fn push_advance(&self, duration: Duration) {
        self.state().script.push_back(Step::Advance(duration));
    }

    /// Append several steps to the script.
    pub fn extend(&self, steps: impl IntoIterator<Item = Step>) {
        self.state().script.extend(steps);
    }

    /// Check if there are scripted steps left.
    pub fn has_pending(&self) -> bool {
        !self.state().script.is_empty()
    }

    /// Every render so far.
    pub fn frames(&self) -> Vec<RenderedFrame> {
        self.state().frames.clone()
    }

    /// Last render.
    pub fn last_frame(&self) -> Option<RenderedFrame> {
        self.state().frames.last().cloned()
    }

    /// Every presented action so far, notifications included.
    pub fn presented(&self) -> Vec<AppAction> {
        self.state().presented.clone()
    }

    /// Ride notifications presented so far.
    pub fn notifications(&self) -> Vec<RideUpdate> {
        self.state()
            .presented
            .iter()
            .filter_map(|action| match action {
                AppAction::Notify(update) => Some(update.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.state().stopped
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    fn poll_event(
        &mut self,
    ) -> impl std::future::Future<Output = Result<Option<AppEvent>, Self::Error>> + Send {
        let step = self.state().script.pop_front();
        let event = match step {
            Some(Step::Event(event)) => Some(event),
            Some(Step::Advance(duration)) => {
                self.env.advance(duration);
                Some(AppEvent::Tick)
            },
            None => None,
        };
        std::future::ready(Ok(event))
    }

    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error> {
        let at = self.env.elapsed();
        let mut state = self.state();

        state.frames.push(RenderedFrame {
            at,
            screen: app.current_screen(),
            ride: app.ride_snapshot(),
        });

        let snapshot = state.recorder.observe(app);
        drop(state);

        if let Some(registry) = &self.invariants
            && let Err(violations) = registry.check_all(&snapshot)
        {
            let context = format!("render at {at:?} on {}", app.current_screen());
            tracing::error!(%context, violations = violations.len(), "invariant violated");
            return Err(SimDriverError::InvariantViolation { context, violations });
        }

        Ok(())
    }

    fn present(&mut self, action: &AppAction) -> Result<(), Self::Error> {
        self.state().presented.push(action.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.state().stopped = true;
    }
}
