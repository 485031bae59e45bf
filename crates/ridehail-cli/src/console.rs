//! Console driver.
//!
//! Reads commands line by line from an async reader and writes screens and
//! notifications to a writer. Queued events are delivered before any input
//! line, which is how the binary scripts the initial booking.
//!
//! A scripted cancellation keeps the driver reporting input after the reader
//! hits end of file, so the request is still delivered while the ride runs.

use std::{collections::VecDeque, future::Future, io::Write};

use ridehail_app::{App, AppAction, AppEvent, Driver};
use ridehail_core::{Environment, RideStatus, RideUpdate};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::{command, render};

/// Console I/O failure.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Reading input or writing output failed.
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// [`Driver`] over a line reader and a writer.
pub struct ConsoleDriver<R, W> {
    lines: Lines<R>,
    out: W,
    queued: VecDeque<AppEvent>,
    cancel_at: Option<RideStatus>,
    confirm_scripted_cancel: bool,
    ride_live: bool,
    input_closed: bool,
    last_frame: Option<String>,
}

impl<R, W> ConsoleDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Create a driver reading commands from `input` and writing to `out`.
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
            queued: VecDeque::new(),
            cancel_at: None,
            confirm_scripted_cancel: false,
            ride_live: false,
            input_closed: false,
            last_frame: None,
        }
    }

    /// Deliver `events` before reading any input.
    #[must_use]
    pub fn with_script(mut self, events: impl IntoIterator<Item = AppEvent>) -> Self {
        self.queued.extend(events);
        self
    }

    /// Request and confirm a cancellation once a ride reaches `status`.
    #[must_use]
    pub fn with_cancel_at(mut self, status: Option<RideStatus>) -> Self {
        self.cancel_at = status;
        self
    }

    fn notify(&mut self, update: &RideUpdate) -> Result<(), ConsoleError> {
        match &update.driver_location {
            Some(location) => writeln!(
                self.out,
                "* {} ({}/5), driver at {:.4}, {:.4}",
                update.status_label, update.status_index, location.latitude, location.longitude
            )?,
            None => writeln!(self.out, "* {} ({}/5)", update.status_label, update.status_index)?,
        }

        if update.phase.is_terminal() {
            self.cancel_at = None;
        } else if self.cancel_at == Some(update.status) {
            tracing::info!(status = %update.status, "scripted cancellation");
            self.cancel_at = None;
            self.confirm_scripted_cancel = true;
            self.queued.push_back(AppEvent::RequestCancel);
        }
        Ok(())
    }

    fn awaits_scripted_cancel(&self) -> bool {
        self.cancel_at.is_some() && self.ride_live
    }
}

impl<R, W> Driver for ConsoleDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    type Error = ConsoleError;

    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send {
        async move {
            if let Some(event) = self.queued.pop_front() {
                return Ok(Some(event));
            }

            // `next_line` is cancel safe, so losing a race against a ride
            // timer never drops a partially read line.
            while !self.input_closed {
                let Some(line) = self.lines.next_line().await? else {
                    self.input_closed = true;
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match command::parse(&line) {
                    Ok(event) => return Ok(Some(event)),
                    Err(err) => writeln!(self.out, "! {err}")?,
                }
            }

            if self.awaits_scripted_cancel() {
                // Resolved by the runtime's next timer tick.
                std::future::pending::<()>().await;
            }
            Ok(None)
        }
    }

    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error> {
        self.ride_live = app.ride().is_some_and(|ride| ride.has_live_timers());

        let frame = render::screen(app);
        if self.last_frame.as_ref() == Some(&frame) {
            return Ok(());
        }

        writeln!(self.out, "{frame}\n")?;
        self.out.flush()?;
        self.last_frame = Some(frame);
        Ok(())
    }

    fn present(&mut self, action: &AppAction) -> Result<(), Self::Error> {
        match action {
            AppAction::Notify(update) => self.notify(update)?,
            AppAction::PromptCancel => {
                writeln!(self.out, "? Cancel this ride? (cancel yes | cancel no)")?;
                if std::mem::take(&mut self.confirm_scripted_cancel) {
                    self.queued.push_back(AppEvent::ConfirmCancel);
                }
            },
            AppAction::CancelRejected { status } => {
                self.confirm_scripted_cancel = false;
                writeln!(self.out, "! Cannot cancel: {status}")?;
            },
            AppAction::CallDriver { driver } => writeln!(self.out, "* Calling {driver}...")?,
            AppAction::MessageDriver { driver } => writeln!(self.out, "* Messaging {driver}...")?,
            AppAction::PromptLogout => writeln!(self.out, "? Log out? (logout yes | logout no)")?,
            AppAction::Alert { message } => writeln!(self.out, "* {message}")?,
            AppAction::Error(err) => writeln!(self.out, "! {err}")?,
            AppAction::Render | AppAction::Quit => {},
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Err(err) = self.out.flush() {
            tracing::warn!(%err, "failed to flush console output");
        }
    }
}
