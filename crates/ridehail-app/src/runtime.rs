//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: coordinator state machine
//! - [`Driver`]: platform-specific input and presentation
//! - ride update subscribers, through a broadcast channel
//!
//! Time only enters through the App's [`Environment`]: the loop sleeps until
//! the next ride timer is due and then feeds [`AppEvent::Tick`].

use ridehail_core::{Environment, RideUpdate};
use tokio::sync::broadcast;

use crate::{App, AppAction, AppEvent, Driver};

/// Buffered ride updates per subscriber before the slowest one lags.
pub const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing the clock
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    app: App<E>,
    updates: broadcast::Sender<RideUpdate>,
    input_open: bool,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a runtime driving `app` with `driver`.
    pub fn new(driver: D, app: App<E>) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self { driver, app, updates, input_open: true }
    }

    /// Subscribe to ride updates.
    ///
    /// Every [`AppAction::Notify`] produced after this call is delivered, in
    /// order.
    pub fn subscribe(&self) -> broadcast::Receiver<RideUpdate> {
        self.updates.subscribe()
    }

    /// Run the main event loop and return the App in its final state.
    ///
    /// The loop:
    /// 1. Waits for the next driver event or the next ride timer deadline
    /// 2. Feeds the event (or a tick) to the App
    /// 3. Executes the returned actions through the driver
    ///
    /// It ends on [`AppAction::Quit`], or once input is exhausted and no ride
    /// timer is live.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<App<E>, D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let Some(event) = self.next_event().await? else {
                break;
            };

            let actions = self.app.handle(event);
            if self.process_actions(actions)? {
                break;
            }
        }

        self.driver.stop();
        Ok(self.app)
    }

    /// Wait for the next event. `None` when there is nothing left to wait for.
    async fn next_event(&mut self) -> Result<Option<AppEvent>, D::Error> {
        loop {
            let deadline = self.app.time_until_next();

            let event = match (self.input_open, deadline) {
                (false, None) => return Ok(None),
                (false, Some(wait)) => {
                    self.app.env().sleep(wait).await;
                    return Ok(Some(AppEvent::Tick));
                },
                (true, None) => self.driver.poll_event().await?,
                (true, Some(wait)) => {
                    let env = self.app.env().clone();
                    tokio::select! {
                        biased;
                        event = self.driver.poll_event() => event?,
                        () = env.sleep(wait) => Some(AppEvent::Tick),
                    }
                },
            };

            match event {
                Some(event) => return Ok(Some(event)),
                None => {
                    tracing::debug!("input exhausted, draining ride timers");
                    self.input_open = false;
                },
            }
        }
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if the application should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
                AppAction::Notify(update) => {
                    self.driver.present(&AppAction::Notify(update.clone()))?;
                    if self.updates.send(update).is_err() {
                        tracing::trace!("no ride update subscribers");
                    }
                },
                other @ (AppAction::PromptCancel
                | AppAction::CancelRejected { .. }
                | AppAction::CallDriver { .. }
                | AppAction::MessageDriver { .. }
                | AppAction::PromptLogout
                | AppAction::Alert { .. }
                | AppAction::Error(_)) => self.driver.present(&other)?,
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App<E> {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App<E> {
        &mut self.app
    }
}
