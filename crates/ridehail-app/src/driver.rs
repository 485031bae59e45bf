//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from where input
//! comes from and how output is shown. Each frontend implements the trait,
//! while the generic [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use ridehail_core::Environment;

use crate::{App, AppAction, AppEvent};

/// Abstracts input and presentation for the application runtime.
///
/// # Implementations
///
/// - **CLI**: scripted walkthrough rendering to a terminal writer
/// - **Simulation**: scripted events on a virtual clock, recording output
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input event.
    ///
    /// Returns `None` once the input source is exhausted. The runtime keeps
    /// delivering clock ticks after that until no ride timer is live.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error>;

    /// Present an action that is neither a render nor a quit: prompts,
    /// alerts, driver contact requests, refusals and ride notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if presenting fails.
    fn present(&mut self, action: &AppAction) -> Result<(), Self::Error>;

    /// Release resources before the runtime returns.
    fn stop(&mut self);
}
