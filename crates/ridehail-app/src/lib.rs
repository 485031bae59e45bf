//! Application layer for the ride-hailing flow.
//!
//! Pure coordinator and generic runtime, so deterministic simulation tests
//! run the same code as the command line frontend.
//!
//! # Components
//!
//! - [`App`]: coordinator owning the navigation stack and the ride session
//! - [`RideView`]: derived ride details view model
//! - [`Driver`]: trait for platform-specific input and rendering
//! - [`Runtime`]: async loop feeding driver events and clock ticks to the App

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod config;
mod driver;
mod event;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use config::AppConfig;
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::{Runtime, UPDATE_CHANNEL_CAPACITY};
pub use state::{RideView, StepState, TimelineStep};
